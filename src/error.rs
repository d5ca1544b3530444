//! Error types for the Skybook library
//!
//! This module provides error types using thiserror for all agent operations.

use crate::types::SessionId;
use thiserror::Error;

/// Main error type for Skybook agent operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AgentError {
    /// Intent extractor error
    #[error("Intent extractor error: {0}")]
    Extractor(#[from] ExtractorError),

    /// Inventory error
    #[error("Inventory error: {0}")]
    Inventory(#[from] InventoryError),

    /// Session is no longer active
    #[error("Session is no longer active: {0}")]
    SessionClosed(SessionId),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Errors from the intent extraction collaborator
///
/// These cover transport and provider failures only. A payload the model
/// returns that cannot be parsed is NOT an error; it is surfaced to the
/// user as a free-text reply.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ExtractorError {
    /// Failed to build the provider request
    #[error("Failed to build extractor request: {0}")]
    RequestBuild(String),

    /// Provider API call failed
    #[error("Extractor API error: {0}")]
    Api(String),

    /// Provider returned no content
    #[error("Extractor returned no content")]
    EmptyResponse,
}

/// Errors loading the flight inventory
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum InventoryError {
    /// I/O failure reading the inventory source
    #[error("Inventory I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A line of the JSONL stream did not parse as a flight record
    #[error("Malformed flight record on line {line}: {source}")]
    MalformedRecord {
        line: usize,
        source: serde_json::Error,
    },
}

/// Type alias for Skybook library Result
pub type Result<T> = std::result::Result<T, AgentError>;

/// Type alias for extractor Result
pub type ExtractorResult<T> = std::result::Result<T, ExtractorError>;

/// Type alias for inventory Result
pub type InventoryResult<T> = std::result::Result<T, InventoryError>;

//! # Skybook - Conversational Flight Booking Agent
//!
//! Skybook resolves natural-language flight requests into a structured
//! search intent across multiple dialogue turns, searches an in-memory
//! inventory deterministically, and drives a confirm/reject booking flow.
//!
//! ## Features
//!
//! - **Intent memory**: partial information merges across turns; a field,
//!   once known, is never silently forgotten
//! - **Date normalization**: free-form expressions ("next friday",
//!   "June 10") become canonical calendar dates, with past-date rejection
//! - **Deterministic search**: composable predicate filters plus a stable
//!   lowest-price selection
//! - **Confirmation sub-dialogue**: yes/no/change with a fixed vocabulary
//! - **Pluggable extraction**: OpenAI and Anthropic backends behind one
//!   trait, so tests inject a scripted stub
//!
//! ## Quick Start
//!
//! ```no_run
//! use skybook::{Agent, InventoryStore, OpenAIExtractor, Session};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let agent = Agent::builder()
//!     .name("Flight Booking Agent")
//!     .extractor(Box::new(OpenAIExtractor::from_env()?))
//!     .inventory(InventoryStore::from_jsonl_path("flights.jsonl")?)
//!     .build()?;
//!
//! let mut session = Session::new();
//! let outcome = agent
//!     .process_turn(&mut session, "I want to fly from London to Paris on 2025-06-10")
//!     .await?;
//!
//! println!("Agent: {}", outcome.message());
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! user text ──▶ Agent (dialogue controller)
//!                ├─ confirmation pending? ──▶ yes/no/change handling
//!                └─ otherwise ──▶ IntentExtractor (OpenAI | Anthropic)
//!                                   │ partial intent
//!                                   ▼
//!                     date normalize ▶ past-date guard ▶ memory merge
//!                                   │ complete?
//!                                   ▼
//!                     search (filter + cheapest) ──▶ pending flight
//! ```
//!
//! ## Module Overview
//!
//! - [`agent`]: Dialogue controller and turn processing
//! - [`session`]: Per-dialogue state (memory, pending flight, status)
//! - [`intent`]: Typed search intent, merge rules, completeness
//! - [`date`]: Free-form date normalization
//! - [`inventory`]: Flight records, JSONL loading, synthetic generation
//! - [`search`]: Deterministic filtering and selection
//! - [`extractor`]: LLM extraction boundary (OpenAI, Anthropic)
//! - [`error`]: Error types and result aliases
//!
//! ## License
//!
//! Licensed under either of Apache License 2.0 or MIT license at your option.

// Core type definitions
pub mod types;

// Error types
pub mod error;

// Date normalization
pub mod date;

// Intent memory and merge rules
pub mod intent;

// Flight inventory
pub mod inventory;

// Deterministic search
pub mod search;

// Intent extraction boundary
pub mod extractor;

// Session state
pub mod session;

// Dialogue controller
pub mod agent;

pub use agent::{Agent, AgentBuilder, AgentConfig, TurnOutcome, AFFIRMATIVES, NEGATIVES};
pub use date::{normalize, DateValue};
pub use error::{AgentError, ExtractorError, InventoryError, Result};
pub use extractor::{
    AnthropicExtractor, ExtractionContext, ExtractorConfig, ExtractorOutput, IntentExtractor,
    OpenAIExtractor,
};
pub use intent::{Intent, IntentPatch};
pub use inventory::{FlightRecord, FlightStatus, InventoryStore};
pub use search::{best_match, matching};
pub use session::{Session, SessionStatus};
pub use types::SessionId;

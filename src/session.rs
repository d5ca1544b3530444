//! Session state for the booking dialogue
//!
//! This module provides the single state value a dialogue owns: the intent
//! memory accumulated across turns, the flight awaiting confirmation, and
//! the session lifecycle status. The value is created at process start,
//! passed mutably into each turn, and never persisted.

use crate::intent::Intent;
use crate::inventory::FlightRecord;
use crate::types::SessionId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status of a dialogue session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// Session is active and can process turns
    Active,
    /// Session ended with a confirmed booking
    Completed,
    /// Session ended by explicit user exit
    Terminated,
}

/// State of one booking dialogue
///
/// Owned exclusively by the dialogue controller's caller and mutated only
/// through controller transitions; there is no ambient global state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Unique identifier for the session
    pub id: SessionId,
    /// Current lifecycle status
    pub status: SessionStatus,
    /// Intent fields accumulated across turns
    pub memory: Intent,
    /// Flight currently offered to the user, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_flight: Option<FlightRecord>,
    /// True while the dialogue waits for a yes/no/change answer
    pub pending_confirmation: bool,
    /// When the session was created
    pub created_at: DateTime<Utc>,
    /// When the session was last updated
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Create a new active session with empty memory
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: SessionId::new(),
            status: SessionStatus::Active,
            memory: Intent::default(),
            pending_flight: None,
            pending_confirmation: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Update the session's updated_at timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Check if the session can still process turns
    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }

    /// True while a candidate flight awaits explicit accept/reject
    pub fn awaiting_confirmation(&self) -> bool {
        self.pending_confirmation
    }

    /// Offer a flight: store it and enter the confirmation sub-dialogue
    pub fn set_pending(&mut self, flight: FlightRecord) {
        self.pending_flight = Some(flight);
        self.pending_confirmation = true;
        self.touch();
    }

    /// Drop the offered flight and leave the confirmation sub-dialogue
    ///
    /// Memory is deliberately preserved so the user can refine the search.
    pub fn clear_pending(&mut self) {
        self.pending_flight = None;
        self.pending_confirmation = false;
        self.touch();
    }

    /// End the session with a confirmed booking
    pub fn complete(&mut self) {
        self.status = SessionStatus::Completed;
        self.touch();
    }

    /// End the session on explicit user exit
    pub fn terminate(&mut self) {
        self.status = SessionStatus::Terminated;
        self.touch();
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

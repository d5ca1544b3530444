// Dialogue controller implementation
//
// This module implements the booking agent: the state machine that routes
// each user turn to the confirmation sub-dialogue or to intent handling,
// and owns every transition of the session state.

use crate::error::{AgentError, Result};
use crate::extractor::{ExtractionContext, ExtractorOutput, IntentExtractor};
use crate::intent::Intent;
use crate::inventory::{FlightRecord, InventoryStore};
use crate::search;
use crate::session::Session;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Words accepted as a booking confirmation, matched case-insensitively
pub const AFFIRMATIVES: [&str; 5] = ["yes", "y", "ok", "confirm", "sure"];

/// Words that reject the offered flight and reopen the search
pub const NEGATIVES: [&str; 4] = ["no", "n", "change", "different"];

/// Agent configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Input that ends the session from the open dialogue state
    #[serde(default = "default_exit_keyword")]
    pub exit_keyword: String,

    /// Whether the extractor is shown the routes the inventory serves
    #[serde(default = "default_share_routes")]
    pub share_routes: bool,
}

fn default_exit_keyword() -> String {
    "exit".to_string()
}

fn default_share_routes() -> bool {
    true
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            exit_keyword: default_exit_keyword(),
            share_routes: default_share_routes(),
        }
    }
}

/// Result of processing one user turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Text to show the user; the dialogue continues
    Reply(String),
    /// Booking confirmed; the session is complete
    Booked(String),
    /// User exited; the session is terminated
    Farewell(String),
}

impl TurnOutcome {
    /// The text to display for this turn
    pub fn message(&self) -> &str {
        match self {
            TurnOutcome::Reply(m) | TurnOutcome::Booked(m) | TurnOutcome::Farewell(m) => m,
        }
    }

    /// True if the session ended on this turn
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TurnOutcome::Reply(_))
    }
}

/// The booking dialogue controller.
///
/// An `Agent` holds the immutable collaborators of a dialogue — the intent
/// extractor and the flight inventory — and processes turns against a
/// [`Session`] owned by the caller. Each turn either answers inside the
/// confirmation sub-dialogue or runs the extract → guard → merge →
/// completeness → search pipeline.
///
/// # Examples
///
/// ```no_run
/// use skybook::{Agent, InventoryStore, OpenAIExtractor, Session};
///
/// # #[tokio::main]
/// # async fn main() -> skybook::Result<()> {
/// let agent = Agent::builder()
///     .name("Flight Booking Agent")
///     .extractor(Box::new(OpenAIExtractor::from_env()?))
///     .inventory(InventoryStore::from_jsonl_path("flights.jsonl")?)
///     .build()?;
///
/// let mut session = Session::new();
/// let outcome = agent
///     .process_turn(&mut session, "I want to fly from London to Paris tomorrow")
///     .await?;
/// println!("{}", outcome.message());
/// # Ok(())
/// # }
/// ```
pub struct Agent {
    name: String,
    extractor: Box<dyn IntentExtractor>,
    inventory: InventoryStore,
    config: AgentConfig,
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("name", &self.name)
            .field("extractor", &"<dyn IntentExtractor>")
            .field("inventory", &self.inventory)
            .field("config", &self.config)
            .finish()
    }
}

impl Agent {
    /// Create a new agent builder
    pub fn builder() -> AgentBuilder {
        AgentBuilder::new()
    }

    /// The agent's display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The inventory this agent searches
    pub fn inventory(&self) -> &InventoryStore {
        &self.inventory
    }

    /// Process one user turn against the current UTC date
    pub async fn process_turn(&self, session: &mut Session, input: &str) -> Result<TurnOutcome> {
        self.process_turn_at(session, input, Utc::now().date_naive())
            .await
    }

    /// Process one user turn with a pinned `today`
    ///
    /// The pinned date drives relative-date normalization and the past-date
    /// guard; tests use it to stay deterministic.
    pub async fn process_turn_at(
        &self,
        session: &mut Session,
        input: &str,
        today: NaiveDate,
    ) -> Result<TurnOutcome> {
        if !session.is_active() {
            return Err(AgentError::SessionClosed(session.id));
        }

        let input = input.trim();
        info!(
            session_id = %session.id,
            awaiting_confirmation = session.awaiting_confirmation(),
            "Processing turn"
        );

        if session.awaiting_confirmation() {
            return Ok(self.handle_confirmation(session, input));
        }

        if input.eq_ignore_ascii_case(&self.config.exit_keyword) {
            session.terminate();
            return Ok(TurnOutcome::Farewell("Goodbye!".to_string()));
        }

        self.handle_request(session, input, today).await
    }

    /// Confirmation sub-dialogue: yes books, no reopens, anything else re-asks
    fn handle_confirmation(&self, session: &mut Session, input: &str) -> TurnOutcome {
        if is_affirmative(input) {
            let Some(flight) = session.pending_flight.clone() else {
                // pending_confirmation without a flight; recover by reopening
                warn!(session_id = %session.id, "Confirmation pending without a flight");
                session.clear_pending();
                return TurnOutcome::Reply(
                    "Something went wrong with that offer. Please search again.".to_string(),
                );
            };

            info!(flight_number = %flight.flight_number, "Booking confirmed");
            session.complete();
            return TurnOutcome::Booked(format_booking_confirmed(&flight));
        }

        if is_negative(input) {
            session.clear_pending();
            return TurnOutcome::Reply(
                "Okay, please provide a new request or modify your search.".to_string(),
            );
        }

        TurnOutcome::Reply("Please reply with yes / no / change.".to_string())
    }

    /// Open dialogue: extract, guard, merge, then search when complete
    async fn handle_request(
        &self,
        session: &mut Session,
        input: &str,
        today: NaiveDate,
    ) -> Result<TurnOutcome> {
        let ctx = ExtractionContext {
            today,
            memory: session.memory.clone(),
            routes: self.config.share_routes.then(|| self.inventory.routes()),
        };

        let patch = match self.extractor.extract(input, &ctx).await? {
            ExtractorOutput::Reply(text) => {
                debug!("Extractor produced a free-text reply");
                return Ok(TurnOutcome::Reply(text));
            }
            ExtractorOutput::Intent(patch) => patch,
        };

        let update = Intent::from_patch(&patch, today);

        if let Some(start) = update.date_start.day() {
            if start < today {
                debug!(start = %start, "Rejected past start date, memory unchanged");
                return Ok(TurnOutcome::Reply(
                    "The date you entered is in the past. Please enter a valid future date."
                        .to_string(),
                ));
            }
        }

        session.memory.apply(&update);
        session.touch();
        debug!(memory = ?session.memory, "Merged turn intent into memory");

        if !session.memory.is_complete() {
            return Ok(TurnOutcome::Reply(format_missing(
                &session.memory.missing_fields(),
            )));
        }

        match search::best_match(self.inventory.flights(), &session.memory) {
            Some(flight) => {
                let flight = flight.clone();
                info!(
                    flight_number = %flight.flight_number,
                    price = flight.price,
                    "Offering flight"
                );
                let offer = format_offer(&flight);
                session.set_pending(flight);
                Ok(TurnOutcome::Reply(offer))
            }
            None => {
                info!("No matching flights");
                Ok(TurnOutcome::Reply("No matching flights found.".to_string()))
            }
        }
    }
}

fn is_affirmative(input: &str) -> bool {
    AFFIRMATIVES.iter().any(|w| input.eq_ignore_ascii_case(w))
}

fn is_negative(input: &str) -> bool {
    NEGATIVES.iter().any(|w| input.eq_ignore_ascii_case(w))
}

fn format_offer(flight: &FlightRecord) -> String {
    format!(
        "--- Found a flight ---\n\
         From: {origin}\n\
         To: {destination}\n\
         Date: {date}\n\
         Price: ${price}\n\
         Flight Number: {number}\n\n\
         Would you like to book this flight? (yes/no/change)",
        origin = flight.origin,
        destination = flight.destination,
        date = flight.date.format("%Y-%m-%d"),
        price = flight.price,
        number = flight.flight_number,
    )
}

fn format_booking_confirmed(flight: &FlightRecord) -> String {
    format!(
        "Booking confirmed!\n\
         Flight {number} from {origin} to {destination} on {date} at price ${price}\n\
         Thank you for using the flight agent. Goodbye!",
        number = flight.flight_number,
        origin = flight.origin,
        destination = flight.destination,
        date = flight.date.format("%Y-%m-%d"),
        price = flight.price,
    )
}

fn format_missing(fields: &[&str]) -> String {
    format!("I still need the following to search: {}.", fields.join(", "))
}

/// Builder for Agent
pub struct AgentBuilder {
    name: Option<String>,
    extractor: Option<Box<dyn IntentExtractor>>,
    inventory: Option<InventoryStore>,
    config: AgentConfig,
}

impl AgentBuilder {
    pub fn new() -> Self {
        Self {
            name: None,
            extractor: None,
            inventory: None,
            config: AgentConfig::default(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn extractor(mut self, extractor: Box<dyn IntentExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    pub fn inventory(mut self, inventory: InventoryStore) -> Self {
        self.inventory = Some(inventory);
        self
    }

    pub fn config(mut self, config: AgentConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<Agent> {
        let name = self
            .name
            .ok_or_else(|| AgentError::Configuration("Agent name is required".to_string()))?;

        let extractor = self
            .extractor
            .ok_or_else(|| AgentError::Configuration("Intent extractor is required".to_string()))?;

        let inventory = self
            .inventory
            .ok_or_else(|| AgentError::Configuration("Flight inventory is required".to_string()))?;

        Ok(Agent {
            name,
            extractor,
            inventory,
            config: self.config,
        })
    }
}

impl Default for AgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

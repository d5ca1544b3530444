//! End-to-end dialogue scenarios
//!
//! These tests drive the public agent API with a scripted extractor stub in
//! place of a live model, covering the full booking flow, offer rejection,
//! past-date rejection, and memory accumulation across turns.

use chrono::NaiveDate;
use skybook::error::ExtractorResult;
use skybook::extractor::{ExtractionContext, ExtractorConfig, ExtractorOutput, IntentExtractor};
use skybook::{
    Agent, FlightRecord, FlightStatus, Intent, IntentPatch, InventoryStore, Session,
    SessionStatus, TurnOutcome,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Deterministic extractor: pops one canned output per turn and records the
/// memory snapshot it was shown
struct ScriptedExtractor {
    outputs: Mutex<VecDeque<ExtractorOutput>>,
    seen: Arc<Mutex<Vec<Intent>>>,
    config: ExtractorConfig,
}

impl ScriptedExtractor {
    fn new(outputs: Vec<ExtractorOutput>) -> Self {
        Self::with_probe(outputs, Arc::new(Mutex::new(Vec::new())))
    }

    fn with_probe(outputs: Vec<ExtractorOutput>, seen: Arc<Mutex<Vec<Intent>>>) -> Self {
        Self {
            outputs: Mutex::new(outputs.into()),
            seen,
            config: ExtractorConfig::new("scripted"),
        }
    }
}

#[async_trait::async_trait]
impl IntentExtractor for ScriptedExtractor {
    async fn extract(
        &self,
        _user_text: &str,
        ctx: &ExtractionContext,
    ) -> ExtractorResult<ExtractorOutput> {
        self.seen.lock().unwrap().push(ctx.memory.clone());
        let mut outputs = self.outputs.lock().unwrap();
        Ok(outputs
            .pop_front()
            .unwrap_or_else(|| ExtractorOutput::Reply("out of script".to_string())))
    }

    fn name(&self) -> &str {
        "scripted"
    }

    fn config(&self) -> &ExtractorConfig {
        &self.config
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
}

fn flight(origin: &str, destination: &str, date: &str, price: u32, number: &str) -> FlightRecord {
    FlightRecord {
        origin: origin.to_string(),
        destination: destination.to_string(),
        date: date.parse().unwrap(),
        price,
        status: FlightStatus::Available,
        flight_number: number.to_string(),
    }
}

fn patch(
    origin: Option<&str>,
    destination: Option<&str>,
    date_start: Option<&str>,
    date_end: Option<&str>,
) -> ExtractorOutput {
    ExtractorOutput::Intent(IntentPatch {
        origin: origin.map(str::to_string),
        destination: destination.map(str::to_string),
        date_start: date_start.map(str::to_string),
        date_end: date_end.map(str::to_string),
    })
}

fn build_agent(outputs: Vec<ExtractorOutput>, flights: Vec<FlightRecord>) -> Agent {
    Agent::builder()
        .name("Test Flight Agent")
        .extractor(Box::new(ScriptedExtractor::new(outputs)))
        .inventory(InventoryStore::new(flights))
        .build()
        .expect("Failed to build test agent")
}

#[tokio::test]
async fn booking_flow_ends_in_confirmed_booking() {
    let agent = build_agent(
        vec![patch(
            Some("London"),
            Some("Paris"),
            Some("2025-06-10"),
            Some("2025-06-10"),
        )],
        vec![flight("London", "Paris", "2025-06-10", 300, "AA123")],
    );
    let mut session = Session::new();

    let offer = agent
        .process_turn_at(
            &mut session,
            "I want to fly from London to Paris on 2025-06-10",
            today(),
        )
        .await
        .unwrap();

    assert!(offer.message().contains("AA123"));
    assert!(session.awaiting_confirmation());

    let outcome = agent
        .process_turn_at(&mut session, "yes", today())
        .await
        .unwrap();

    match outcome {
        TurnOutcome::Booked(message) => {
            assert!(message.contains("Booking confirmed"));
            assert!(message.contains("AA123"));
        }
        other => panic!("expected booking, got {other:?}"),
    }
    assert_eq!(session.status, SessionStatus::Completed);
}

#[tokio::test]
async fn rejecting_offer_reopens_dialogue_with_memory_intact() {
    let agent = build_agent(
        vec![
            patch(Some("London"), Some("Paris"), Some("2025-06-10"), None),
            patch(None, Some("Berlin"), None, None),
        ],
        vec![
            flight("London", "Paris", "2025-06-10", 300, "AA123"),
            flight("London", "Berlin", "2025-06-10", 220, "DD220"),
        ],
    );
    let mut session = Session::new();

    agent
        .process_turn_at(&mut session, "book a flight to Paris", today())
        .await
        .unwrap();
    assert!(session.awaiting_confirmation());

    let outcome = agent
        .process_turn_at(&mut session, "no", today())
        .await
        .unwrap();

    assert!(!outcome.is_terminal());
    assert!(!session.awaiting_confirmation());
    assert!(session.pending_flight.is_none());
    assert_eq!(session.memory.origin.as_deref(), Some("London"));

    // The preserved origin and date carry into the refined search
    let offer = agent
        .process_turn_at(&mut session, "make it Berlin instead", today())
        .await
        .unwrap();
    assert!(offer.message().contains("DD220"));
}

#[tokio::test]
async fn past_start_date_is_rejected_and_memory_unchanged() {
    let agent = build_agent(
        vec![patch(
            Some("London"),
            Some("Paris"),
            Some("2020-01-01"),
            None,
        )],
        vec![flight("London", "Paris", "2025-06-10", 300, "AA123")],
    );
    let mut session = Session::new();
    let memory_before = session.memory.clone();

    let outcome = agent
        .process_turn_at(&mut session, "fly me to Paris on 2020-01-01", today())
        .await
        .unwrap();

    assert!(outcome.message().contains("in the past"));
    assert_eq!(session.memory, memory_before);
    assert!(!session.awaiting_confirmation());
}

#[tokio::test]
async fn memory_accumulates_across_partial_turns() {
    let agent = build_agent(
        vec![
            patch(Some("London"), None, None, None),
            patch(None, Some("Paris"), None, None),
            patch(None, None, Some("2025-06-10"), None),
        ],
        vec![flight("London", "Paris", "2025-06-10", 300, "AA123")],
    );
    let mut session = Session::new();

    let first = agent
        .process_turn_at(&mut session, "from London", today())
        .await
        .unwrap();
    assert_eq!(
        first.message(),
        "I still need the following to search: destination, travel date."
    );

    let second = agent
        .process_turn_at(&mut session, "to Paris", today())
        .await
        .unwrap();
    assert_eq!(
        second.message(),
        "I still need the following to search: travel date."
    );

    let third = agent
        .process_turn_at(&mut session, "on June 10", today())
        .await
        .unwrap();
    assert!(third.message().contains("AA123"));
    assert!(session.awaiting_confirmation());
}

#[tokio::test]
async fn extractor_sees_the_accumulated_memory_snapshot() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let extractor = ScriptedExtractor::with_probe(
        vec![
            patch(Some("London"), None, None, None),
            patch(None, Some("Paris"), None, None),
        ],
        Arc::clone(&seen),
    );

    let agent = Agent::builder()
        .name("Test Flight Agent")
        .extractor(Box::new(extractor))
        .inventory(InventoryStore::new(vec![]))
        .build()
        .unwrap();
    let mut session = Session::new();

    agent
        .process_turn_at(&mut session, "from London", today())
        .await
        .unwrap();
    agent
        .process_turn_at(&mut session, "to Paris", today())
        .await
        .unwrap();

    let snapshots = seen.lock().unwrap();
    assert_eq!(snapshots[0], Intent::default());
    assert_eq!(snapshots[1].origin.as_deref(), Some("London"));
    assert_eq!(session.memory.destination.as_deref(), Some("Paris"));
}

#[tokio::test]
async fn free_text_reply_leaves_state_untouched() {
    let agent = build_agent(
        vec![ExtractorOutput::Reply(
            "I can help with flight bookings. Where to?".to_string(),
        )],
        vec![],
    );
    let mut session = Session::new();

    let outcome = agent
        .process_turn_at(&mut session, "what can you do?", today())
        .await
        .unwrap();

    assert_eq!(
        outcome.message(),
        "I can help with flight bookings. Where to?"
    );
    assert_eq!(session.memory, Intent::default());
    assert!(!session.awaiting_confirmation());
}

#[tokio::test]
async fn empty_search_result_leaves_confirmation_state_untouched() {
    let agent = build_agent(
        vec![patch(
            Some("London"),
            Some("Paris"),
            Some("2025-06-10"),
            None,
        )],
        vec![flight("London", "Paris", "2025-07-01", 300, "AA123")],
    );
    let mut session = Session::new();

    let outcome = agent
        .process_turn_at(&mut session, "London to Paris on June 10", today())
        .await
        .unwrap();

    assert_eq!(outcome.message(), "No matching flights found.");
    assert!(!session.awaiting_confirmation());
    assert!(session.pending_flight.is_none());
}

#[tokio::test]
async fn date_range_search_offers_cheapest_in_window() {
    let agent = build_agent(
        vec![patch(
            Some("London"),
            Some("Paris"),
            Some("2025-06-10"),
            Some("2025-06-12"),
        )],
        vec![
            flight("London", "Paris", "2025-06-10", 300, "AA300"),
            flight("London", "Paris", "2025-06-11", 180, "BB180"),
            flight("London", "Paris", "2025-06-13", 90, "CC090"),
        ],
    );
    let mut session = Session::new();

    let outcome = agent
        .process_turn_at(&mut session, "London to Paris next week", today())
        .await
        .unwrap();

    // CC090 is cheaper but departs outside the requested window
    assert!(outcome.message().contains("BB180"));
}

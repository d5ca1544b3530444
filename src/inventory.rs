//! Flight inventory: records, JSONL loading, and synthetic generation
//!
//! The store is immutable after load and safely shared for the lifetime of
//! the session. Records are identified by the `(flight_number, date)` pair.

use crate::error::{InventoryError, InventoryResult};
use chrono::{Duration, NaiveDate};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;

/// Availability status of a flight record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlightStatus {
    /// Bookable
    Available,
    /// No seats left
    SoldOut,
    /// Cancelled by the carrier
    Cancelled,
}

/// A single flight in the inventory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightRecord {
    pub origin: String,
    pub destination: String,
    /// Departure date, serialized as `YYYY-MM-DD`
    pub date: NaiveDate,
    /// Fare in whole currency units
    pub price: u32,
    pub status: FlightStatus,
    pub flight_number: String,
}

impl FlightRecord {
    /// Record identity: flight number plus departure date
    pub fn key(&self) -> (&str, NaiveDate) {
        (&self.flight_number, self.date)
    }
}

/// In-memory, immutable-after-load table of flight records
#[derive(Debug, Clone, Default)]
pub struct InventoryStore {
    flights: Vec<FlightRecord>,
}

impl InventoryStore {
    /// Create a store from already-loaded records
    pub fn new(flights: Vec<FlightRecord>) -> Self {
        Self { flights }
    }

    /// Load a store from a line-delimited JSON reader
    ///
    /// Blank lines are skipped. A malformed line fails the whole load; the
    /// inventory is consumed once at startup and a partial table would
    /// silently narrow every search afterwards.
    pub fn from_jsonl_reader<R: Read>(reader: R) -> InventoryResult<Self> {
        let mut flights = Vec::new();
        for (index, line) in BufReader::new(reader).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: FlightRecord = serde_json::from_str(&line)
                .map_err(|source| InventoryError::MalformedRecord {
                    line: index + 1,
                    source,
                })?;
            flights.push(record);
        }
        Ok(Self { flights })
    }

    /// Load a store from a JSONL file on disk
    pub fn from_jsonl_path(path: impl AsRef<Path>) -> InventoryResult<Self> {
        Self::from_jsonl_reader(File::open(path)?)
    }

    /// All records, in load order
    pub fn flights(&self) -> &[FlightRecord] {
        &self.flights
    }

    /// Number of records in the store
    pub fn len(&self) -> usize {
        self.flights.len()
    }

    /// True if the store holds no records
    pub fn is_empty(&self) -> bool {
        self.flights.is_empty()
    }

    /// Distinct `(origin, destination)` pairs, sorted
    ///
    /// Handed to the extractor as a hint about which routes exist at all.
    pub fn routes(&self) -> Vec<(String, String)> {
        let mut routes: Vec<(String, String)> = self
            .flights
            .iter()
            .map(|f| (f.origin.clone(), f.destination.clone()))
            .collect();
        routes.sort();
        routes.dedup();
        routes
    }

    /// Write the store in the JSONL load format
    pub fn write_jsonl<W: Write>(&self, mut writer: W) -> InventoryResult<()> {
        for flight in &self.flights {
            serde_json::to_writer(&mut writer, flight)
                .map_err(|source| InventoryError::Io(source.into()))?;
            writer.write_all(b"\n")?;
        }
        Ok(())
    }
}

/// Cities the synthetic generator draws from
pub const CITIES: [&str; 12] = [
    "New York",
    "Los Angeles",
    "London",
    "Paris",
    "Berlin",
    "Dubai",
    "Singapore",
    "Tokyo",
    "Shanghai",
    "Hong Kong",
    "Sydney",
    "Toronto",
];

const CARRIERS: [&str; 5] = ["AA", "BB", "CC", "DD", "EE"];

/// Generate `count` synthetic flight records departing within five days of
/// `today`
///
/// Origin and destination are distinct cities from [`CITIES`]; prices fall
/// in `100..=1500`, flight numbers are a carrier prefix plus three digits.
pub fn generate<R: Rng>(count: usize, today: NaiveDate, rng: &mut R) -> Vec<FlightRecord> {
    (0..count)
        .map(|_| {
            let origin = CITIES[rng.gen_range(0..CITIES.len())];
            let destination = loop {
                let candidate = CITIES[rng.gen_range(0..CITIES.len())];
                if candidate != origin {
                    break candidate;
                }
            };

            FlightRecord {
                origin: origin.to_string(),
                destination: destination.to_string(),
                date: today + Duration::days(rng.gen_range(1..=5)),
                price: rng.gen_range(100..=1500),
                status: FlightStatus::Available,
                flight_number: format!(
                    "{}{}",
                    CARRIERS[rng.gen_range(0..CARRIERS.len())],
                    rng.gen_range(100..=999)
                ),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
    }

    fn record(origin: &str, destination: &str, date: &str, price: u32) -> FlightRecord {
        FlightRecord {
            origin: origin.to_string(),
            destination: destination.to_string(),
            date: date.parse().unwrap(),
            price,
            status: FlightStatus::Available,
            flight_number: "AA100".to_string(),
        }
    }

    #[test]
    fn test_load_from_jsonl_reader() {
        let data = concat!(
            r#"{"origin":"London","destination":"Paris","date":"2025-06-10","price":300,"status":"available","flight_number":"AA123"}"#,
            "\n\n",
            r#"{"origin":"Tokyo","destination":"Sydney","date":"2025-06-11","price":900,"status":"sold_out","flight_number":"BB456"}"#,
            "\n",
        );

        let store = InventoryStore::from_jsonl_reader(data.as_bytes()).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.flights()[0].origin, "London");
        assert_eq!(store.flights()[1].status, FlightStatus::SoldOut);
    }

    #[test]
    fn test_malformed_line_reports_line_number() {
        let data = concat!(
            r#"{"origin":"London","destination":"Paris","date":"2025-06-10","price":300,"status":"available","flight_number":"AA123"}"#,
            "\n",
            "not json\n",
        );

        let err = InventoryStore::from_jsonl_reader(data.as_bytes()).unwrap_err();
        match err {
            InventoryError::MalformedRecord { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_routes_are_distinct_and_sorted() {
        let store = InventoryStore::new(vec![
            record("London", "Paris", "2025-06-10", 300),
            record("Berlin", "Tokyo", "2025-06-11", 700),
            record("London", "Paris", "2025-06-12", 250),
        ]);

        assert_eq!(
            store.routes(),
            vec![
                ("Berlin".to_string(), "Tokyo".to_string()),
                ("London".to_string(), "Paris".to_string()),
            ]
        );
    }

    #[test]
    fn test_write_jsonl_round_trips() {
        let store = InventoryStore::new(vec![
            record("London", "Paris", "2025-06-10", 300),
            record("Berlin", "Tokyo", "2025-06-11", 700),
        ]);

        let mut buffer = Vec::new();
        store.write_jsonl(&mut buffer).unwrap();

        let reloaded = InventoryStore::from_jsonl_reader(buffer.as_slice()).unwrap();
        assert_eq!(reloaded.flights(), store.flights());
    }

    #[test]
    fn test_generated_records_respect_invariants() {
        let mut rng = StdRng::seed_from_u64(42);
        let flights = generate(200, today(), &mut rng);

        assert_eq!(flights.len(), 200);
        for flight in &flights {
            assert_ne!(flight.origin, flight.destination);
            assert!(flight.date > today());
            assert!(flight.date <= today() + Duration::days(5));
            assert!((100..=1500).contains(&flight.price));
            assert_eq!(flight.status, FlightStatus::Available);
            assert_eq!(flight.flight_number.len(), 5);
        }
    }

    #[test]
    fn test_record_key_is_flight_number_and_date() {
        let flight = record("London", "Paris", "2025-06-10", 300);
        assert_eq!(flight.key(), ("AA100", "2025-06-10".parse().unwrap()));
    }
}

//! Deterministic flight search
//!
//! A search is a chain of predicate filters over the inventory followed by a
//! stable lowest-price selection. Pure functions: the dialogue controller
//! owns the pending-flight side effects, and an empty result is a normal
//! outcome rather than an error.

use crate::date::DateValue;
use crate::intent::Intent;
use crate::inventory::FlightRecord;
use chrono::NaiveDate;
use tracing::debug;

/// All records matching the intent, in inventory order
///
/// Unset intent fields do not constrain the result. City comparison is
/// case-insensitive. With both window edges concrete the filter keeps dates
/// in the inclusive `[date_start, date_end]` range; with only `date_start`
/// concrete it keeps exact matches.
pub fn matching<'a>(flights: &'a [FlightRecord], intent: &Intent) -> Vec<&'a FlightRecord> {
    flights
        .iter()
        .filter(|f| city_matches(&f.origin, intent.origin.as_deref()))
        .filter(|f| city_matches(&f.destination, intent.destination.as_deref()))
        .filter(|f| window_matches(f.date, intent.date_start, intent.date_end))
        .collect()
}

/// The single cheapest matching record
///
/// Ties on price resolve to the earliest-loaded record (stable sort), so a
/// given inventory and intent always select the same flight.
pub fn best_match<'a>(flights: &'a [FlightRecord], intent: &Intent) -> Option<&'a FlightRecord> {
    let mut candidates = matching(flights, intent);
    debug!(candidates = candidates.len(), "Search filtered inventory");

    candidates.sort_by_key(|f| f.price);
    candidates.into_iter().next()
}

fn city_matches(actual: &str, wanted: Option<&str>) -> bool {
    wanted.map_or(true, |city| actual.eq_ignore_ascii_case(city))
}

fn window_matches(date: NaiveDate, start: DateValue, end: DateValue) -> bool {
    match (start.day(), end.day()) {
        (Some(start), Some(end)) => date >= start && date <= end,
        (Some(start), None) => date == start,
        (None, _) => true,
    }
}

//! Flight search intent: the typed session memory and its merge rules
//!
//! An [`IntentPatch`] is what the extraction collaborator hands back: raw,
//! optional string fields. An [`Intent`] is the merged, typed form the agent
//! keeps as session memory across turns. The invariant of the merge is that
//! a field, once concrete, is only ever replaced by a newer concrete value;
//! it is never silently cleared.

use crate::date::{self, DateValue};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Partial intent as extracted from a single user turn, unvalidated
///
/// Fields the extractor could not determine are absent or hold the literal
/// `"unknown"`; both are equivalent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_end: Option<String>,
}

/// Merged flight search intent: origin, destination, and a date window
///
/// Serialized as the memory snapshot shown to the extractor, with dates in
/// canonical `YYYY-MM-DD` form or `"unknown"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(default)]
    pub date_start: DateValue,
    #[serde(default)]
    pub date_end: DateValue,
}

impl Intent {
    /// Lift a raw extractor patch into a typed intent
    ///
    /// City fields are trimmed; empty and `"unknown"` cities become unset.
    /// Date fields go through [`date::normalize`] relative to `today`.
    pub fn from_patch(patch: &IntentPatch, today: NaiveDate) -> Self {
        Self {
            origin: clean_city(patch.origin.as_deref()),
            destination: clean_city(patch.destination.as_deref()),
            date_start: normalize_field(patch.date_start.as_deref(), today),
            date_end: normalize_field(patch.date_end.as_deref(), today),
        }
    }

    /// Merge `update` into this memory
    ///
    /// Every concrete field of `update` overwrites the corresponding field
    /// here; unset and unknown fields leave memory untouched. Applying the
    /// same update twice is equivalent to applying it once, and applying an
    /// all-unknown update is a no-op.
    pub fn apply(&mut self, update: &Intent) {
        if let Some(origin) = &update.origin {
            self.origin = Some(origin.clone());
        }
        if let Some(destination) = &update.destination {
            self.destination = Some(destination.clone());
        }
        if update.date_start.is_known() {
            self.date_start = update.date_start;
        }
        if update.date_end.is_known() {
            self.date_end = update.date_end;
        }
    }

    /// The fields still required before a search can run, in display order
    ///
    /// `date_end` is never required; a single-date search is valid.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.origin.is_none() {
            missing.push("departure city");
        }
        if self.destination.is_none() {
            missing.push("destination");
        }
        if !self.date_start.is_known() {
            missing.push("travel date");
        }
        missing
    }

    /// True once origin, destination, and a concrete start date are all set
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

fn clean_city(raw: Option<&str>) -> Option<String> {
    let city = raw?.trim();
    if city.is_empty() || city.eq_ignore_ascii_case(date::UNKNOWN) {
        None
    } else {
        Some(city.to_string())
    }
}

fn normalize_field(raw: Option<&str>, today: NaiveDate) -> DateValue {
    raw.map(|s| date::normalize(s, today)).unwrap_or_default()
}

//! Date normalization for free-form travel date expressions
//!
//! User-supplied dates arrive as anything from a canonical `2025-06-10` to
//! "next friday". [`normalize`] converts them into a [`DateValue`]: either a
//! concrete calendar day or the explicit `unknown` sentinel. The function is
//! total; unparseable input degrades to `Unknown`, never to an error.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::OnceLock;

/// Canonical textual form of an unknown date
pub const UNKNOWN: &str = "unknown";

/// A travel date field: a concrete calendar day or the `unknown` sentinel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateValue {
    /// No usable date was supplied or extracted
    #[default]
    Unknown,
    /// A concrete calendar day
    Day(NaiveDate),
}

impl DateValue {
    /// True if this holds a concrete day
    pub fn is_known(&self) -> bool {
        matches!(self, DateValue::Day(_))
    }

    /// The concrete day, if any
    pub fn day(&self) -> Option<NaiveDate> {
        match self {
            DateValue::Day(d) => Some(*d),
            DateValue::Unknown => None,
        }
    }

    /// Parse the canonical textual form (`YYYY-MM-DD` or `unknown`)
    ///
    /// Anything else degrades to `Unknown`; use [`normalize`] for free-form
    /// input.
    pub fn from_canonical(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case(UNKNOWN) {
            return DateValue::Unknown;
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(DateValue::Day)
            .unwrap_or(DateValue::Unknown)
    }
}

impl fmt::Display for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateValue::Unknown => f.write_str(UNKNOWN),
            DateValue::Day(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl Serialize for DateValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for DateValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(DateValue::from_canonical(&s))
    }
}

impl From<NaiveDate> for DateValue {
    fn from(d: NaiveDate) -> Self {
        DateValue::Day(d)
    }
}

/// Normalize a free-form date expression relative to `today`
///
/// Empty, whitespace-only, `none`, and `unknown` inputs map directly to
/// `Unknown` without invoking the parser. Otherwise the grammar covers
/// canonical and day-first numeric dates, month-name dates (year optional,
/// rolled forward to the next occurrence), and relative phrases such as
/// `tomorrow`, `in 3 days`, `next week`, and weekday names.
pub fn normalize(raw: &str, today: NaiveDate) -> DateValue {
    let trimmed = raw.trim();
    if trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case(UNKNOWN)
        || trimmed.eq_ignore_ascii_case("none")
    {
        return DateValue::Unknown;
    }

    let lowered = trimmed.to_lowercase();

    if let Some(day) = parse_relative(&lowered, today) {
        return DateValue::Day(day);
    }

    if let Some(day) = parse_absolute(trimmed, today) {
        return DateValue::Day(day);
    }

    DateValue::Unknown
}

fn relative_span_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^in\s+(\d{1,3})\s+(day|days|week|weeks)$").expect("valid pattern")
    })
}

fn parse_relative(lowered: &str, today: NaiveDate) -> Option<NaiveDate> {
    match lowered {
        "today" => return Some(today),
        "tomorrow" => return Some(today + Duration::days(1)),
        "day after tomorrow" => return Some(today + Duration::days(2)),
        "next week" => return Some(today + Duration::days(7)),
        _ => {}
    }

    if let Some(caps) = relative_span_re().captures(lowered) {
        let n: i64 = caps[1].parse().ok()?;
        let days = match &caps[2] {
            "week" | "weeks" => n * 7,
            _ => n,
        };
        return Some(today + Duration::days(days));
    }

    let name = lowered.strip_prefix("next ").unwrap_or(lowered);
    if let Ok(weekday) = name.parse::<Weekday>() {
        return Some(next_weekday(today, weekday));
    }

    None
}

/// Next strictly-future occurrence of `weekday` after `today`
fn next_weekday(today: NaiveDate, weekday: Weekday) -> NaiveDate {
    let ahead = (weekday.num_days_from_monday() + 7 - today.weekday().num_days_from_monday()) % 7;
    let ahead = if ahead == 0 { 7 } else { ahead };
    today + Duration::days(ahead as i64)
}

fn parse_absolute(raw: &str, today: NaiveDate) -> Option<NaiveDate> {
    for format in ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"] {
        if let Ok(day) = NaiveDate::parse_from_str(raw, format) {
            return Some(day);
        }
    }

    // Month-name forms, commas tolerated: "June 10, 2025", "10 June 2025"
    let cleaned = raw
        .replace(',', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    for format in ["%d %B %Y", "%B %d %Y", "%d %b %Y", "%b %d %Y"] {
        if let Ok(day) = NaiveDate::parse_from_str(&cleaned, format) {
            return Some(day);
        }
    }

    // Without a year: the next occurrence on or after today
    let with_year = format!("{} {}", cleaned, today.year());
    for format in ["%d %B %Y", "%B %d %Y", "%d %b %Y", "%b %d %Y"] {
        if let Ok(day) = NaiveDate::parse_from_str(&with_year, format) {
            if day >= today {
                return Some(day);
            }
            return NaiveDate::from_ymd_opt(day.year() + 1, day.month(), day.day());
        }
    }

    None
}

//! Intent extraction boundary
//!
//! This module provides a trait-based abstraction over the language model
//! that turns raw user text into either a structured partial intent or a
//! free-text reply. The dialogue controller treats implementations as black
//! boxes, which keeps the core deterministic and lets tests inject a
//! scripted stub.

use crate::error::ExtractorResult;
use crate::intent::{Intent, IntentPatch};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod anthropic;
pub mod openai;

pub use anthropic::AnthropicExtractor;
pub use openai::OpenAIExtractor;

/// System prompt shared by the hosted extractor implementations
pub const SYSTEM_PROMPT: &str =
    "You are an assistant that extracts flight search parameters from user input.";

/// Configuration for an extraction model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Model name to use
    pub model: String,
    /// Sampling temperature; extraction defaults to 0.0 for determinism
    #[serde(default)]
    pub temperature: f32,
    /// Maximum tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl ExtractorConfig {
    /// Create a new extractor configuration with default values
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            temperature: 0.0,
            max_tokens: None,
        }
    }

    /// Set the temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature.clamp(0.0, 2.0);
        self
    }

    /// Set the maximum tokens
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Per-turn context handed to the extractor alongside the user text
#[derive(Debug, Clone)]
pub struct ExtractionContext {
    /// Current calendar date, for resolving relative expressions
    pub today: NaiveDate,
    /// Snapshot of the session memory accumulated so far
    pub memory: Intent,
    /// Distinct routes the inventory can serve, if the agent shares them
    pub routes: Option<Vec<(String, String)>>,
}

/// What the extractor produced for one turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractorOutput {
    /// A structured partial intent
    Intent(IntentPatch),
    /// A conversational reply to show the user verbatim
    Reply(String),
}

/// Trait for intent extraction implementations
///
/// `extract` fails only on transport or provider errors. A payload that
/// comes back but cannot be parsed is not a failure; [`parse_payload`]
/// degrades it to a free-text reply.
#[async_trait]
pub trait IntentExtractor: Send + Sync {
    /// Extract a partial intent (or a conversational reply) from user text
    async fn extract(
        &self,
        user_text: &str,
        ctx: &ExtractionContext,
    ) -> ExtractorResult<ExtractorOutput>;

    /// Get the name of the extractor backend
    fn name(&self) -> &str;

    /// Get the extractor configuration
    fn config(&self) -> &ExtractorConfig;
}

/// Build the extraction prompt for one turn
///
/// Shared by the hosted implementations so both providers see the same
/// contract: today's date, the memory snapshot, optional route hints, and
/// the output format rules.
pub fn build_extraction_prompt(user_text: &str, ctx: &ExtractionContext) -> String {
    let memory = serde_json::to_string(&ctx.memory).unwrap_or_else(|_| "{}".to_string());

    let mut prompt = format!(
        "Today's date is: {today}\n\n\
         The previous search memory is:\n{memory}\n\n\
         User input is:\n\"{user_text}\"\n",
        today = ctx.today.format("%Y-%m-%d"),
    );

    if let Some(routes) = &ctx.routes {
        prompt.push_str("\nRoutes currently served (origin -> destination):\n");
        for (origin, destination) in routes {
            prompt.push_str(&format!("- {origin} -> {destination}\n"));
        }
    }

    prompt.push_str(
        "\nIf the input is a flight search request, return ONLY a JSON object:\n\
         {\"intent\": {\"origin\": ..., \"destination\": ..., \"date_start\": ..., \"date_end\": ...}}\n\
         Rules:\n\
         - If the input only mentions some fields, fill the rest from memory.\n\
         - If the input gives a date range (e.g. \"next week\"), map it to date_start and date_end.\n\
         - If the input gives a single date, set both date_start and date_end to that date.\n\
         - Dates are YYYY-MM-DD strings. Use \"unknown\" for any value you cannot determine.\n\
         Otherwise return ONLY: {\"response\": \"<a short conversational reply>\"}\n",
    );

    prompt
}

/// Parse a raw model payload into an extractor output
///
/// Accepts `{"intent": {...}}`, a bare field object, or `{"response":
/// "..."}`, with or without surrounding prose and markdown fences. Total:
/// anything unparseable becomes a verbatim [`ExtractorOutput::Reply`].
pub fn parse_payload(raw: &str) -> ExtractorOutput {
    let reply = || ExtractorOutput::Reply(raw.trim().to_string());

    let Some(json) = first_json_object(raw) else {
        return reply();
    };
    let Ok(value) = serde_json::from_str::<Value>(json) else {
        return reply();
    };

    payload_from_value(&value).unwrap_or_else(reply)
}

fn payload_from_value(value: &Value) -> Option<ExtractorOutput> {
    let object = value.as_object()?;

    if let Some(text) = object.get("response").and_then(Value::as_str) {
        return Some(ExtractorOutput::Reply(text.to_string()));
    }

    let source = object.get("intent").unwrap_or(value);
    if !has_intent_fields(source) {
        return None;
    }

    serde_json::from_value::<IntentPatch>(source.clone())
        .ok()
        .map(ExtractorOutput::Intent)
}

fn has_intent_fields(value: &Value) -> bool {
    value.as_object().is_some_and(|object| {
        ["origin", "destination", "date_start", "date_end"]
            .iter()
            .any(|key| object.contains_key(*key))
    })
}

fn first_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then(|| &raw[start..=end])
}

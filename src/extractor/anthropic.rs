//! Anthropic-backed intent extractor
//!
//! This module implements the IntentExtractor trait on top of Anthropic's
//! Claude models.

use crate::error::{AgentError, ExtractorError, ExtractorResult};
use crate::extractor::{
    build_extraction_prompt, parse_payload, ExtractionContext, ExtractorConfig, ExtractorOutput,
    IntentExtractor, SYSTEM_PROMPT,
};
use async_trait::async_trait;
use tracing::info;

/// Anthropic intent extractor
pub struct AnthropicExtractor {
    api_key: String,
    config: ExtractorConfig,
}

impl AnthropicExtractor {
    /// Create a new Anthropic extractor with the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            config: ExtractorConfig::new("claude-3-5-haiku-20241022"),
        }
    }

    /// Create a new Anthropic extractor from environment variable ANTHROPIC_API_KEY
    pub fn from_env() -> Result<Self, AgentError> {
        let api_key = std::env::var("ANTHROPIC_API_KEY").map_err(|_| {
            AgentError::Configuration("ANTHROPIC_API_KEY environment variable not set".to_string())
        })?;

        Ok(Self::new(api_key))
    }

    /// Set the model to use
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Set the temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.config = self.config.with_temperature(temperature);
        self
    }

    /// Set the maximum tokens
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.config = self.config.with_max_tokens(max_tokens);
        self
    }
}

#[async_trait]
impl IntentExtractor for AnthropicExtractor {
    async fn extract(
        &self,
        user_text: &str,
        ctx: &ExtractionContext,
    ) -> ExtractorResult<ExtractorOutput> {
        use serde_json::json;
        use std::sync::Arc;
        use tokio::sync::Mutex;

        info!(
            model = %self.config.model,
            input_length = user_text.len(),
            "Requesting Anthropic extraction"
        );

        let prompt = build_extraction_prompt(user_text, ctx);
        let messages_value = json!([{
            "role": "user",
            "content": prompt
        }]);

        // Build request - create a new client each time since Client doesn't implement Clone
        let request = anthropic_sdk::Client::new()
            .auth(&self.api_key)
            .model(&self.config.model)
            .messages(&messages_value)
            .max_tokens(self.config.max_tokens.unwrap_or(1024) as i32)
            .temperature(self.config.temperature)
            .system(SYSTEM_PROMPT)
            .build()
            .map_err(|e| ExtractorError::RequestBuild(e.to_string()))?;

        // Collect response text
        let response_text = Arc::new(Mutex::new(String::new()));
        let response_text_clone = Arc::clone(&response_text);

        request
            .execute(|chunk| {
                let response_text = Arc::clone(&response_text_clone);
                async move {
                    let mut text = response_text.lock().await;
                    text.push_str(&chunk);
                }
            })
            .await
            .map_err(|e| ExtractorError::Api(e.to_string()))?;

        let final_text = response_text.lock().await.clone();
        if final_text.trim().is_empty() {
            return Err(ExtractorError::EmptyResponse);
        }

        Ok(parse_payload(&final_text))
    }

    fn name(&self) -> &str {
        "Anthropic"
    }

    fn config(&self) -> &ExtractorConfig {
        &self.config
    }
}

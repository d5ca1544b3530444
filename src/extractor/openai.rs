//! OpenAI-backed intent extractor
//!
//! This module implements the IntentExtractor trait on top of OpenAI's chat
//! completion API.

use crate::error::{AgentError, ExtractorError, ExtractorResult};
use crate::extractor::{
    build_extraction_prompt, parse_payload, ExtractionContext, ExtractorConfig, ExtractorOutput,
    IntentExtractor, SYSTEM_PROMPT,
};
use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
        ChatCompletionRequestUserMessage, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use tracing::{debug, info, warn};

/// OpenAI intent extractor
pub struct OpenAIExtractor {
    client: Client<OpenAIConfig>,
    config: ExtractorConfig,
}

impl OpenAIExtractor {
    /// Create a new OpenAI extractor with the given API key
    ///
    /// Defaults to `gpt-4o-mini` at temperature 0; extraction wants the
    /// cheapest deterministic model, not the strongest conversational one.
    pub fn new(api_key: impl Into<String>) -> Self {
        let openai_config = OpenAIConfig::new().with_api_key(api_key);
        let client = Client::with_config(openai_config);

        Self {
            client,
            config: ExtractorConfig::new("gpt-4o-mini"),
        }
    }

    /// Create a new OpenAI extractor from environment variable OPENAI_API_KEY
    pub fn from_env() -> Result<Self, AgentError> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            AgentError::Configuration("OPENAI_API_KEY environment variable not set".to_string())
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
impl IntentExtractor for OpenAIExtractor {
    async fn extract(
        &self,
        user_text: &str,
        ctx: &ExtractionContext,
    ) -> ExtractorResult<ExtractorOutput> {
        info!(
            model = %self.config.model,
            input_length = user_text.len(),
            "Requesting OpenAI extraction"
        );

        let prompt = build_extraction_prompt(user_text, ctx);

        let messages = vec![
            ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage {
                content: async_openai::types::ChatCompletionRequestSystemMessageContent::Text(
                    SYSTEM_PROMPT.to_string(),
                ),
                name: None,
            }),
            ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
                content: async_openai::types::ChatCompletionRequestUserMessageContent::Text(prompt),
                name: None,
            }),
        ];

        let mut request_builder = CreateChatCompletionRequestArgs::default();
        request_builder
            .model(&self.config.model)
            .messages(messages)
            .temperature(self.config.temperature);

        if let Some(max_tokens) = self.config.max_tokens {
            request_builder.max_tokens(max_tokens);
        }

        let request = request_builder
            .build()
            .map_err(|e| ExtractorError::RequestBuild(e.to_string()))?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!(error = %e, "OpenAI API error");
            ExtractorError::Api(e.to_string())
        })?;

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or(ExtractorError::EmptyResponse)?;

        debug!(
            response_length = content.len(),
            "OpenAI extraction successful"
        );

        Ok(parse_payload(&content))
    }

    fn name(&self) -> &str {
        "OpenAI"
    }

    fn config(&self) -> &ExtractorConfig {
        &self.config
    }
}

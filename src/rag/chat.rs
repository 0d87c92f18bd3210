//! Chat completion backends.

use crate::error::{Result, VidchatError};
use crate::openai::{client_or_config_error, lazy_client};
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use async_openai::Client;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};

/// A generative model answering a single-turn prompt.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Generate a reply to `user` under the `system` instructions.
    async fn complete(&self, system: &str, user: &str) -> Result<String>;
}

/// OpenAI chat completions.
pub struct OpenAIChatModel {
    client: std::result::Result<Client<OpenAIConfig>, String>,
    model: String,
    temperature: f32,
}

impl OpenAIChatModel {
    pub fn new(api_key: Option<&str>, model: &str, temperature: f32, timeout: Duration) -> Self {
        Self {
            client: lazy_client(api_key, timeout),
            model: model.to_string(),
            temperature,
        }
    }
}

#[async_trait]
impl ChatModel for OpenAIChatModel {
    #[instrument(skip(self, system, user), fields(model = %self.model))]
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let client = client_or_config_error(&self.client)?;

        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system)
                .build()
                .map_err(|e| VidchatError::Rag(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user)
                .build()
                .map_err(|e| VidchatError::Rag(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(self.temperature)
            .build()
            .map_err(|e| VidchatError::Rag(e.to_string()))?;

        let response = client
            .chat()
            .create(request)
            .await
            .map_err(|e| VidchatError::OpenAI(format!("Failed to generate response: {}", e)))?;

        let answer = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| VidchatError::Rag("Empty response from LLM".to_string()))?;

        debug!("Generated {} characters", answer.len());
        Ok(answer)
    }
}

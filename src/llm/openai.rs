//! OpenAI provider.
//!
//! Also home of the chat-completions wire types shared by the other
//! adapters speaking the same REST dialect.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, ProviderConfig, ProviderType};

use super::error::{self, ProviderError};
use super::provider::{ChatProvider, validate_api_key};
use super::types::{ChatMessage, ChatOptions, ModelInfo, ResolvedOptions};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug)]
pub struct OpenAIProvider {
    client: Client,
    config: ProviderConfig,
    base_url: String,
}

impl OpenAIProvider {
    pub fn new(config: ProviderConfig) -> Result<Self, ConfigError> {
        validate_api_key(&config)?;
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Ok(Self {
            client: Client::new(),
            config,
            base_url,
        })
    }
}

#[async_trait]
impl ChatProvider for OpenAIProvider {
    fn provider_type(&self) -> ProviderType {
        ProviderType::OpenAI
    }

    fn available_models(&self) -> Vec<ModelInfo> {
        vec![
            ModelInfo {
                id: "gpt-4.1-mini",
                name: "gpt-4.1-mini",
                description: "Most advanced GPT-4o model with multimodal capabilities",
            },
            ModelInfo {
                id: "gpt-4o-mini",
                name: "GPT-4 Omni Mini",
                description: "Smaller, faster version of GPT-4 Omni",
            },
            ModelInfo {
                id: "gpt-4.1-nano",
                name: "gpt-4.1-nano",
                description: "Fast and capable GPT-4 model",
            },
        ]
    }

    async fn chat_completion(
        &self,
        messages: &[ChatMessage],
        options: Option<&ChatOptions>,
    ) -> Result<String, ProviderError> {
        let opts = ResolvedOptions::resolve(&self.config, options);
        let body = CompletionRequest::new(messages, &opts);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Content-Type", "application/json")
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::request(ProviderType::OpenAI, e))?;

        if !response.status().is_success() {
            return Err(error::api_error(ProviderType::OpenAI, response).await);
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::request(ProviderType::OpenAI, e))?;
        completion.into_text(ProviderType::OpenAI)
    }
}

// --- Wire types (shared by the OpenAI-dialect adapters) ---

#[derive(Serialize)]
pub(super) struct CompletionRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
}

impl<'a> CompletionRequest<'a> {
    pub(super) fn new(messages: &'a [ChatMessage], opts: &'a ResolvedOptions) -> Self {
        Self {
            model: &opts.model,
            messages,
            temperature: opts.temperature,
            max_tokens: opts.max_tokens,
            top_p: opts.top_p,
            frequency_penalty: opts.frequency_penalty,
            presence_penalty: opts.presence_penalty,
        }
    }
}

#[derive(Deserialize)]
pub(super) struct CompletionResponse {
    pub choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
pub(super) struct CompletionChoice {
    pub message: CompletionMessage,
}

#[derive(Deserialize)]
pub(super) struct CompletionMessage {
    pub content: String,
}

impl CompletionResponse {
    /// Extract the single completion string from the envelope.
    pub(super) fn into_text(self, provider: ProviderType) -> Result<String, ProviderError> {
        self.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(ProviderError::Empty { provider })
    }
}

//! DeepSeek provider.
//!
//! Speaks the OpenAI chat-completions dialect. The reasoner model is
//! known to be flaky upstream, so a failed `deepseek-reasoner` call is
//! retried once against `deepseek-chat` before giving up.

use async_trait::async_trait;
use reqwest::Client;
use tracing::warn;

use crate::config::{ConfigError, ProviderConfig, ProviderType};

use super::error::{self, ProviderError};
use super::openai::{CompletionRequest, CompletionResponse};
use super::provider::{ChatProvider, validate_api_key};
use super::types::{ChatMessage, ChatOptions, ModelInfo, ResolvedOptions};

const DEFAULT_BASE_URL: &str = "https://api.deepseek.com/v1";

const REASONER_MODEL: &str = "deepseek-reasoner";
const FALLBACK_MODEL: &str = "deepseek-chat";
const FALLBACK_NOTE: &str = "Note: Fallback to deepseek-chat due to reasoner error.\n\n";

#[derive(Debug)]
pub struct DeepSeekProvider {
    client: Client,
    config: ProviderConfig,
    base_url: String,
}

impl DeepSeekProvider {
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

    async fn request(
        &self,
        messages: &[ChatMessage],
        opts: &ResolvedOptions,
    ) -> Result<String, ProviderError> {
        let body = CompletionRequest::new(messages, opts);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Content-Type", "application/json")
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::request(ProviderType::DeepSeek, e))?;

        if !response.status().is_success() {
            return Err(error::api_error(ProviderType::DeepSeek, response).await);
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::request(ProviderType::DeepSeek, e))?;
        completion.into_text(ProviderType::DeepSeek)
    }
}

#[async_trait]
impl ChatProvider for DeepSeekProvider {
    fn provider_type(&self) -> ProviderType {
        ProviderType::DeepSeek
    }

    fn available_models(&self) -> Vec<ModelInfo> {
        vec![
            ModelInfo {
                id: "deepseek-chat",
                name: "DeepSeek Chat",
                description: "General-purpose chat model optimized for dialogue",
            },
            ModelInfo {
                id: "deepseek-reasoner",
                name: "DeepSeek Reasoner",
                description: "Model optimized for reasoning and problem-solving",
            },
        ]
    }

    async fn chat_completion(
        &self,
        messages: &[ChatMessage],
        options: Option<&ChatOptions>,
    ) -> Result<String, ProviderError> {
        let opts = ResolvedOptions::resolve(&self.config, options);

        match self.request(messages, &opts).await {
            Ok(text) => Ok(text),
            Err(err) if opts.model == REASONER_MODEL => {
                // Single model-downgrade retry; the retry's outcome is
                // what the caller sees.
                warn!(error = %err, "deepseek-reasoner request failed, falling back to deepseek-chat");
                let fallback = ResolvedOptions {
                    model: FALLBACK_MODEL.to_string(),
                    ..opts
                };
                let text = self.request(messages, &fallback).await?;
                Ok(format!("{FALLBACK_NOTE}{text}"))
            }
            Err(err) => Err(err),
        }
    }
}

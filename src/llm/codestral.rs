//! Codestral provider, Mistral's code-specialized endpoint.

use async_trait::async_trait;
use reqwest::Client;

use crate::config::{ConfigError, ProviderConfig, ProviderType};

use super::error::ProviderError;
use super::mistral;
use super::provider::{ChatProvider, validate_api_key};
use super::types::{ChatMessage, ChatOptions, ModelInfo, ResolvedOptions};

const DEFAULT_BASE_URL: &str = "https://codestral.mistral.ai/v1";

#[derive(Debug)]
pub struct CodestralProvider {
    client: Client,
    config: ProviderConfig,
    base_url: String,
}

impl CodestralProvider {
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
impl ChatProvider for CodestralProvider {
    fn provider_type(&self) -> ProviderType {
        ProviderType::Codestral
    }

    fn available_models(&self) -> Vec<ModelInfo> {
        vec![
            ModelInfo {
                id: "codestral-latest",
                name: "Codestral Latest",
                description: "Most recent version of Codestral for code generation and completion",
            },
            ModelInfo {
                id: "codestral-2405",
                name: "Codestral 2405",
                description: "Codestral model specialized for code generation and programming tasks",
            },
        ]
    }

    async fn chat_completion(
        &self,
        messages: &[ChatMessage],
        options: Option<&ChatOptions>,
    ) -> Result<String, ProviderError> {
        let opts = ResolvedOptions::resolve(&self.config, options);
        mistral::chat_request(
            &self.client,
            ProviderType::Codestral,
            &self.base_url,
            &self.config.api_key,
            messages,
            &opts,
        )
        .await
    }
}

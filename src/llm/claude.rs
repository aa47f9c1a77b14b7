//! Claude provider with Anthropic's native messages format.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, ProviderConfig, ProviderType};

use super::error::{self, ProviderError};
use super::provider::{ChatProvider, validate_api_key};
use super::types::{ChatMessage, ChatOptions, ModelInfo, ResolvedOptions, Role};

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
const API_VERSION: &str = "2023-06-01";

#[derive(Debug)]
pub struct ClaudeProvider {
    client: Client,
    config: ProviderConfig,
    base_url: String,
}

impl ClaudeProvider {
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
impl ChatProvider for ClaudeProvider {
    fn provider_type(&self) -> ProviderType {
        ProviderType::Claude
    }

    fn available_models(&self) -> Vec<ModelInfo> {
        vec![
            ModelInfo {
                id: "claude-3-5-sonnet-20241022",
                name: "Claude 3.5 Sonnet",
                description: "Most intelligent model with superior performance on complex tasks",
            },
            ModelInfo {
                id: "claude-3-5-haiku-20241022",
                name: "Claude 3.5 Haiku",
                description: "Fastest and most compact model for near-instant responsiveness",
            },
            ModelInfo {
                id: "claude-3-opus-20240229",
                name: "Claude 3 Opus",
                description: "Most powerful model for highly complex tasks",
            },
            ModelInfo {
                id: "claude-3-sonnet-20240229",
                name: "Claude 3 Sonnet",
                description: "Balance of intelligence and speed",
            },
            ModelInfo {
                id: "claude-3-haiku-20240307",
                name: "Claude 3 Haiku",
                description: "Fast and efficient model for everyday tasks",
            },
        ]
    }

    async fn chat_completion(
        &self,
        messages: &[ChatMessage],
        options: Option<&ChatOptions>,
    ) -> Result<String, ProviderError> {
        let opts = ResolvedOptions::resolve(&self.config, options);
        let body = MessagesRequest {
            model: &opts.model,
            max_tokens: opts.max_tokens,
            messages: to_wire_messages(messages),
            temperature: opts.temperature,
            top_p: opts.top_p,
        };

        let response = self
            .client
            .post(format!("{}/messages", self.base_url))
            .header("Content-Type", "application/json")
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::request(ProviderType::Claude, e))?;

        if !response.status().is_success() {
            return Err(error::api_error(ProviderType::Claude, response).await);
        }

        let completion: MessagesResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::request(ProviderType::Claude, e))?;
        completion
            .content
            .into_iter()
            .next()
            .map(|block| block.text)
            .ok_or(ProviderError::Empty {
                provider: ProviderType::Claude,
            })
    }
}

// --- Wire types and conversions ---

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<WireMessage>,
    temperature: f32,
    top_p: f32,
}

#[derive(Serialize)]
struct WireMessage {
    role: &'static str,
    content: String,
}

/// The messages array has no system role; a system message is demoted to
/// a prefixed user turn. Everything else passes through in order.
fn to_wire_messages(messages: &[ChatMessage]) -> Vec<WireMessage> {
    messages
        .iter()
        .map(|msg| match msg.role {
            Role::System => WireMessage {
                role: "user",
                content: format!("[System]: {}", msg.content),
            },
            Role::User => WireMessage {
                role: "user",
                content: msg.content.clone(),
            },
            Role::Assistant => WireMessage {
                role: "assistant",
                content: msg.content.clone(),
            },
        })
        .collect()
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    text: String,
}

//! Mistral provider.
//!
//! OpenAI-shaped endpoint, but the request body carries no
//! frequency/presence penalties. Codestral shares this dialect.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::config::{ConfigError, ProviderConfig, ProviderType};

use super::error::{self, ProviderError};
use super::openai::CompletionResponse;
use super::provider::{ChatProvider, validate_api_key};
use super::types::{ChatMessage, ChatOptions, ModelInfo, ResolvedOptions};

const DEFAULT_BASE_URL: &str = "https://api.mistral.ai/v1";

#[derive(Debug)]
pub struct MistralProvider {
    client: Client,
    config: ProviderConfig,
    base_url: String,
}

impl MistralProvider {
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
impl ChatProvider for MistralProvider {
    fn provider_type(&self) -> ProviderType {
        ProviderType::Mistral
    }

    fn available_models(&self) -> Vec<ModelInfo> {
        vec![
            ModelInfo {
                id: "mistral-large-latest",
                name: "Mistral Large",
                description: "Most advanced model for complex reasoning tasks",
            },
            ModelInfo {
                id: "mistral-medium-latest",
                name: "Mistral Medium",
                description: "Balanced model for most use cases",
            },
            ModelInfo {
                id: "mistral-small-latest",
                name: "Mistral Small",
                description: "Fast and efficient model for simple tasks",
            },
            ModelInfo {
                id: "open-mistral-7b",
                name: "Open Mistral 7B",
                description: "Open-source 7B parameter model",
            },
            ModelInfo {
                id: "open-mixtral-8x7b",
                name: "Open Mixtral 8x7B",
                description: "Open-source mixture of experts model",
            },
            ModelInfo {
                id: "open-mixtral-8x22b",
                name: "Open Mixtral 8x22B",
                description: "Larger open-source mixture of experts model",
            },
        ]
    }

    async fn chat_completion(
        &self,
        messages: &[ChatMessage],
        options: Option<&ChatOptions>,
    ) -> Result<String, ProviderError> {
        let opts = ResolvedOptions::resolve(&self.config, options);
        chat_request(
            &self.client,
            ProviderType::Mistral,
            &self.base_url,
            &self.config.api_key,
            messages,
            &opts,
        )
        .await
    }
}

// --- Shared Mistral-dialect request ---

#[derive(Serialize)]
pub(super) struct MistralRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
}

/// One chat-completions call in the Mistral dialect; used by both the
/// Mistral and Codestral adapters.
pub(super) async fn chat_request(
    client: &Client,
    provider: ProviderType,
    base_url: &str,
    api_key: &str,
    messages: &[ChatMessage],
    opts: &ResolvedOptions,
) -> Result<String, ProviderError> {
    let body = MistralRequest {
        model: &opts.model,
        messages,
        temperature: opts.temperature,
        max_tokens: opts.max_tokens,
        top_p: opts.top_p,
    };

    let response = client
        .post(format!("{base_url}/chat/completions"))
        .header("Content-Type", "application/json")
        .bearer_auth(api_key)
        .json(&body)
        .send()
        .await
        .map_err(|e| ProviderError::request(provider, e))?;

    if !response.status().is_success() {
        return Err(error::api_error(provider, response).await);
    }

    let completion: CompletionResponse = response
        .json()
        .await
        .map_err(|e| ProviderError::request(provider, e))?;
    completion.into_text(provider)
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::llm::types::Role;

    use super::*;

    fn test_config(base_url: String) -> ProviderConfig {
        ProviderConfig {
            provider_type: ProviderType::Mistral,
            api_key: "test-key".to_string(),
            base_url: Some(base_url),
            models: vec!["mistral-large-latest".to_string()],
            default_model: "mistral-large-latest".to_string(),
        }
    }

    #[test]
    fn test_request_body_has_no_penalty_fields() {
        let opts = ResolvedOptions {
            model: "mistral-large-latest".to_string(),
            temperature: 0.7,
            max_tokens: 8000,
            top_p: 1.0,
            frequency_penalty: 0.1,
            presence_penalty: 0.0,
        };
        let messages = vec![ChatMessage {
            role: Role::User,
            content: "hi".to_string(),
        }];
        let body = MistralRequest {
            model: &opts.model,
            messages: &messages,
            temperature: opts.temperature,
            max_tokens: opts.max_tokens,
            top_p: opts.top_p,
        };

        let rendered = serde_json::to_string(&body).unwrap();
        assert!(!rendered.contains("frequency_penalty"));
        assert!(!rendered.contains("presence_penalty"));
    }

    #[tokio::test]
    async fn test_chat_completion_round_trip() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(json!({"model": "mistral-large-latest"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{
                    "message": {"role": "assistant", "content": "bonjour"},
                    "finish_reason": "stop"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = MistralProvider::new(test_config(server.uri())).unwrap();
        let messages = vec![ChatMessage {
            role: Role::User,
            content: "hi".to_string(),
        }];
        let text = provider.chat_completion(&messages, None).await.unwrap();
        assert_eq!(text, "bonjour");
    }
}

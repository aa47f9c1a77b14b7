//! Azure OpenAI provider.
//!
//! Same dialect as OpenAI, but requests route through a deployment-name
//! path segment plus a pinned API version instead of a `model` field,
//! and authentication uses Azure's `api-key` header.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::config::{ConfigError, ProviderConfig, ProviderType};

use super::error::{self, ProviderError};
use super::openai::CompletionResponse;
use super::provider::{ChatProvider, validate_api_key};
use super::types::{ChatMessage, ChatOptions, ModelInfo, ResolvedOptions};

const API_VERSION: &str = "2024-02-15-preview";

#[derive(Debug)]
pub struct AzureOpenAIProvider {
    client: Client,
    config: ProviderConfig,
    base_url: String,
}

impl AzureOpenAIProvider {
    /// Fails when the config carries no base URL: Azure has no universal
    /// default endpoint.
    pub fn new(config: ProviderConfig) -> Result<Self, ConfigError> {
        validate_api_key(&config)?;
        let base_url = config
            .base_url
            .clone()
            .filter(|url| !url.is_empty())
            .ok_or(ConfigError::MissingBaseUrl(ProviderType::AzureOpenAI))?;
        Ok(Self {
            client: Client::new(),
            config,
            base_url,
        })
    }
}

#[async_trait]
impl ChatProvider for AzureOpenAIProvider {
    fn provider_type(&self) -> ProviderType {
        ProviderType::AzureOpenAI
    }

    fn available_models(&self) -> Vec<ModelInfo> {
        vec![
            ModelInfo {
                id: "gpt-4o",
                name: "GPT-4 Omni",
                description: "Most advanced GPT-4 model with multimodal capabilities",
            },
            ModelInfo {
                id: "gpt-4o-mini",
                name: "GPT-4 Omni Mini",
                description: "Smaller, faster version of GPT-4 Omni",
            },
            ModelInfo {
                id: "gpt-4.1-mini",
                name: "gpt-4.1-mini",
                description: "Fast and capable gpt-4.1 model",
            },
            ModelInfo {
                id: "gpt-4.1",
                name: "gpt-4.1",
                description: "Most advanced gpt-4.1 model with multimodal capabilities",
            },
        ]
    }

    async fn chat_completion(
        &self,
        messages: &[ChatMessage],
        options: Option<&ChatOptions>,
    ) -> Result<String, ProviderError> {
        let opts = ResolvedOptions::resolve(&self.config, options);
        // The resolved model doubles as the deployment name.
        let url = format!(
            "{}/openai/deployments/{}/chat/completions",
            self.base_url, opts.model
        );
        let body = DeploymentRequest {
            messages,
            temperature: opts.temperature,
            max_tokens: opts.max_tokens,
            top_p: opts.top_p,
            frequency_penalty: opts.frequency_penalty,
            presence_penalty: opts.presence_penalty,
        };

        let response = self
            .client
            .post(url)
            .query(&[("api-version", API_VERSION)])
            .header("Content-Type", "application/json")
            .header("api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::request(ProviderType::AzureOpenAI, e))?;

        if !response.status().is_success() {
            return Err(error::api_error(ProviderType::AzureOpenAI, response).await);
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::request(ProviderType::AzureOpenAI, e))?;
        completion.into_text(ProviderType::AzureOpenAI)
    }
}

/// Deployment-routed request; the deployment is in the URL, not the body.
#[derive(Serialize)]
struct DeploymentRequest<'a> {
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    frequency_penalty: f32,
    presence_penalty: f32,
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::llm::types::Role;

    use super::*;

    fn test_config(base_url: Option<String>) -> ProviderConfig {
        ProviderConfig {
            provider_type: ProviderType::AzureOpenAI,
            api_key: "test-key".to_string(),
            base_url,
            models: vec!["gpt-4.1-mini".to_string()],
            default_model: "gpt-4.1-mini".to_string(),
        }
    }

    fn user_message(content: &str) -> Vec<ChatMessage> {
        vec![ChatMessage {
            role: Role::User,
            content: content.to_string(),
        }]
    }

    #[test]
    fn test_missing_base_url_is_rejected_at_construction() {
        let err = AzureOpenAIProvider::new(test_config(None)).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingBaseUrl(ProviderType::AzureOpenAI)
        ));

        let err = AzureOpenAIProvider::new(test_config(Some(String::new()))).unwrap_err();
        assert!(matches!(err, ConfigError::MissingBaseUrl(_)));
    }

    #[tokio::test]
    async fn test_requests_route_through_the_default_deployment() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/openai/deployments/gpt-4.1-mini/chat/completions"))
            .and(query_param("api-version", "2024-02-15-preview"))
            .and(header("api-key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{
                    "message": {"role": "assistant", "content": "deployed"},
                    "finish_reason": "stop"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = AzureOpenAIProvider::new(test_config(Some(server.uri()))).unwrap();
        let text = provider
            .chat_completion(&user_message("hi"), None)
            .await
            .unwrap();
        assert_eq!(text, "deployed");
    }

    #[tokio::test]
    async fn test_model_option_overrides_the_deployment_segment() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/openai/deployments/gpt-4o/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{
                    "message": {"role": "assistant", "content": "ok"},
                    "finish_reason": "stop"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = AzureOpenAIProvider::new(test_config(Some(server.uri()))).unwrap();
        let options = ChatOptions {
            model: Some("gpt-4o".to_string()),
            ..Default::default()
        };
        provider
            .chat_completion(&user_message("hi"), Some(&options))
            .await
            .unwrap();
    }
}

//! Gemini provider with Google's generateContent format.
//!
//! Authentication rides in the query string rather than a header, and
//! generation parameters live under a renamed nested config object.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, ProviderConfig, ProviderType};

use super::error::{self, ProviderError};
use super::provider::{ChatProvider, validate_api_key};
use super::types::{ChatMessage, ChatOptions, ModelInfo, ResolvedOptions, Role};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug)]
pub struct GeminiProvider {
    client: Client,
    config: ProviderConfig,
    base_url: String,
}

impl GeminiProvider {
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
impl ChatProvider for GeminiProvider {
    fn provider_type(&self) -> ProviderType {
        ProviderType::Gemini
    }

    fn available_models(&self) -> Vec<ModelInfo> {
        vec![
            ModelInfo {
                id: "gemini-1.5-pro",
                name: "Gemini 1.5 Pro",
                description: "Most capable model for complex reasoning tasks",
            },
            ModelInfo {
                id: "gemini-1.5-flash",
                name: "Gemini 1.5 Flash",
                description: "Fast and efficient model for most tasks",
            },
            ModelInfo {
                id: "gemini-1.0-pro",
                name: "Gemini 1.0 Pro",
                description: "Previous generation model for general use",
            },
            ModelInfo {
                id: "gemini-exp-1206",
                name: "Gemini Experimental 1206",
                description: "Experimental model with latest improvements",
            },
        ]
    }

    async fn chat_completion(
        &self,
        messages: &[ChatMessage],
        options: Option<&ChatOptions>,
    ) -> Result<String, ProviderError> {
        let opts = ResolvedOptions::resolve(&self.config, options);
        let body = GenerateRequest {
            contents: to_contents(messages),
            generation_config: GenerationConfig {
                temperature: opts.temperature,
                max_output_tokens: opts.max_tokens,
                top_p: opts.top_p,
            },
        };

        let response = self
            .client
            .post(format!(
                "{}/models/{}:generateContent",
                self.base_url, opts.model
            ))
            .query(&[("key", self.config.api_key.as_str())])
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::request(ProviderType::Gemini, e))?;

        if !response.status().is_success() {
            return Err(error::api_error(ProviderType::Gemini, response).await);
        }

        let completion: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::request(ProviderType::Gemini, e))?;
        completion
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text)
            .ok_or(ProviderError::Empty {
                provider: ProviderType::Gemini,
            })
    }
}

// --- Wire types and conversions ---

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
    #[serde(rename = "topP")]
    top_p: f32,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

/// There is no system role: system text is folded into the first user
/// turn (or stands in for one when the conversation has none), and
/// `assistant` is renamed to `model`.
fn to_contents(messages: &[ChatMessage]) -> Vec<Content> {
    let mut contents: Vec<Content> = messages
        .iter()
        .filter(|msg| msg.role != Role::System)
        .map(|msg| {
            let role = match msg.role {
                Role::Assistant => "model",
                _ => "user",
            };
            Content {
                role: role.to_string(),
                parts: vec![Part {
                    text: msg.content.clone(),
                }],
            }
        })
        .collect();

    // Reverse order so several system messages end up in original order
    // after each prepend.
    for msg in messages.iter().filter(|m| m.role == Role::System).rev() {
        let system_text = format!("System: {}", msg.content);
        match contents
            .iter_mut()
            .find(|c| c.role == "user")
            .and_then(|c| c.parts.first_mut())
        {
            Some(part) => {
                let existing = std::mem::take(&mut part.text);
                part.text = format!("{system_text}\n\n{existing}");
            }
            None => contents.insert(
                0,
                Content {
                    role: "user".to_string(),
                    parts: vec![Part { text: system_text }],
                },
            ),
        }
    }

    contents
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Vec<Part>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn test_config(base_url: String) -> ProviderConfig {
        ProviderConfig {
            provider_type: ProviderType::Gemini,
            api_key: "test-key".to_string(),
            base_url: Some(base_url),
            models: vec!["gemini-1.5-pro".to_string()],
            default_model: "gemini-1.5-pro".to_string(),
        }
    }

    fn message(role: Role, content: &str) -> ChatMessage {
        ChatMessage {
            role,
            content: content.to_string(),
        }
    }

    #[test]
    fn test_system_text_merges_into_the_first_user_turn() {
        let contents = to_contents(&[
            message(Role::System, "Be terse."),
            message(Role::User, "hi"),
            message(Role::Assistant, "hello"),
        ]);

        assert_eq!(contents.len(), 2);
        assert_eq!(contents[0].role, "user");
        assert_eq!(contents[0].parts[0].text, "System: Be terse.\n\nhi");
        assert_eq!(contents[1].role, "model");
        assert_eq!(contents[1].parts[0].text, "hello");
    }

    #[test]
    fn test_lone_system_message_becomes_a_user_turn() {
        let contents = to_contents(&[message(Role::System, "Be terse.")]);

        assert_eq!(contents.len(), 1);
        assert_eq!(contents[0].role, "user");
        assert_eq!(contents[0].parts[0].text, "System: Be terse.");
    }

    #[test]
    fn test_system_without_user_turn_leads_the_conversation() {
        let contents = to_contents(&[
            message(Role::Assistant, "hello"),
            message(Role::System, "Be terse."),
        ]);

        assert_eq!(contents.len(), 2);
        assert_eq!(contents[0].role, "user");
        assert_eq!(contents[0].parts[0].text, "System: Be terse.");
        assert_eq!(contents[1].role, "model");
    }

    #[test]
    fn test_payload_never_contains_a_system_role() {
        let contents = to_contents(&[
            message(Role::System, "Be terse."),
            message(Role::User, "hi"),
        ]);
        let rendered = serde_json::to_string(&contents).unwrap();
        assert!(!rendered.contains("system"));
        assert!(rendered.contains("System: Be terse."));
    }

    #[tokio::test]
    async fn test_chat_completion_authenticates_via_query_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-1.5-pro:generateContent"))
            .and(query_param("key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": {"parts": [{"text": "generated"}], "role": "model"},
                    "finishReason": "STOP",
                    "index": 0
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = GeminiProvider::new(test_config(server.uri())).unwrap();
        let text = provider
            .chat_completion(&[message(Role::User, "hi")], None)
            .await
            .unwrap();
        assert_eq!(text, "generated");
    }

    #[tokio::test]
    async fn test_empty_candidate_list_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-1.5-pro:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
            .mount(&server)
            .await;

        let provider = GeminiProvider::new(test_config(server.uri())).unwrap();
        let err = provider
            .chat_completion(&[message(Role::User, "hi")], None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ProviderError::Empty {
                provider: ProviderType::Gemini
            }
        ));
    }
}

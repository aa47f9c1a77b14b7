//! Provider contract shared by every vendor adapter.

use async_trait::async_trait;

use crate::config::{ConfigError, ProviderConfig, ProviderType};

use super::error::ProviderError;
use super::types::{ChatMessage, ChatOptions, ModelInfo};

/// Capability contract for chat completion providers.
///
/// An adapter binds one [`ProviderConfig`] to one HTTP client
/// configuration at construction and holds no per-call mutable state,
/// so concurrent calls against the same instance are safe.
#[async_trait]
pub trait ChatProvider: std::fmt::Debug + Send + Sync {
    /// The vendor this adapter was built for. Always matches the
    /// `provider_type` of the config it was constructed from.
    fn provider_type(&self) -> ProviderType;

    /// Static catalog of vendor-advertised models. No network access.
    fn available_models(&self) -> Vec<ModelInfo>;

    /// Request a completion for the given conversation. Returns the full
    /// completion text in one shot; there is no partial output.
    async fn chat_completion(
        &self,
        messages: &[ChatMessage],
        options: Option<&ChatOptions>,
    ) -> Result<String, ProviderError>;
}

/// Reject configs whose API key is empty before any client is built.
pub(super) fn validate_api_key(config: &ProviderConfig) -> Result<(), ConfigError> {
    if config.api_key.is_empty() {
        return Err(ConfigError::MissingApiKey(config.provider_type));
    }
    Ok(())
}

//! Provider construction.

use std::sync::Arc;

use crate::config::{ConfigError, ProviderConfig};

use super::azure_openai::AzureOpenAIProvider;
use super::claude::ClaudeProvider;
use super::codestral::CodestralProvider;
use super::deepseek::DeepSeekProvider;
use super::gemini::GeminiProvider;
use super::mistral::MistralProvider;
use super::openai::OpenAIProvider;
use super::provider::ChatProvider;

/// Build the adapter matching the config's declared vendor.
///
/// One call, one instance; construction-time validation (empty API key,
/// Azure without a base URL) surfaces here.
pub fn create_provider(config: &ProviderConfig) -> Result<Arc<dyn ChatProvider>, ConfigError> {
    use crate::config::ProviderType::*;

    let provider: Arc<dyn ChatProvider> = match config.provider_type {
        DeepSeek => Arc::new(DeepSeekProvider::new(config.clone())?),
        OpenAI => Arc::new(OpenAIProvider::new(config.clone())?),
        AzureOpenAI => Arc::new(AzureOpenAIProvider::new(config.clone())?),
        Claude => Arc::new(ClaudeProvider::new(config.clone())?),
        Mistral => Arc::new(MistralProvider::new(config.clone())?),
        Codestral => Arc::new(CodestralProvider::new(config.clone())?),
        Gemini => Arc::new(GeminiProvider::new(config.clone())?),
    };
    Ok(provider)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::config::ProviderType;

    use super::*;

    fn config_for(provider_type: ProviderType) -> ProviderConfig {
        ProviderConfig {
            provider_type,
            api_key: "test-key".to_string(),
            base_url: match provider_type {
                ProviderType::AzureOpenAI => Some("https://example.openai.azure.com".to_string()),
                _ => None,
            },
            models: vec![],
            default_model: "default-model".to_string(),
        }
    }

    #[test]
    fn test_every_vendor_constructs_and_reports_its_own_type() {
        for provider_type in ProviderType::ALL {
            let provider = create_provider(&config_for(provider_type)).unwrap();
            assert_eq!(provider.provider_type(), provider_type);
        }
    }

    #[test]
    fn test_every_catalog_is_non_empty_with_unique_ids() {
        for provider_type in ProviderType::ALL {
            let provider = create_provider(&config_for(provider_type)).unwrap();
            let models = provider.available_models();
            assert!(!models.is_empty(), "{provider_type} catalog is empty");

            let ids: HashSet<&str> = models.iter().map(|m| m.id).collect();
            assert_eq!(ids.len(), models.len(), "{provider_type} has duplicate ids");
        }
    }

    #[test]
    fn test_catalogs_are_stable_across_calls() {
        let provider = create_provider(&config_for(ProviderType::Claude)).unwrap();
        let first: Vec<&str> = provider.available_models().iter().map(|m| m.id).collect();
        let second: Vec<&str> = provider.available_models().iter().map(|m| m.id).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_api_key_fails_for_every_vendor() {
        for provider_type in ProviderType::ALL {
            let mut config = config_for(provider_type);
            config.api_key = String::new();
            let err = create_provider(&config).unwrap_err();
            assert!(
                matches!(err, ConfigError::MissingApiKey(t) if t == provider_type),
                "{provider_type} accepted an empty api key"
            );
        }
    }
}

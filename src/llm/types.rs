//! Vendor-neutral types for chat completions.

use serde::{Deserialize, Serialize};

use crate::config::ProviderConfig;

/// The role of a message sender.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A message in a chat conversation. Ordering within a list is
/// conversation order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// A vendor-advertised model, purely descriptive.
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

/// Caller-tunable generation parameters. Every field overrides the
/// provider default field-by-field; unset fields keep the default.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatOptions {
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub top_p: Option<f32>,
    pub frequency_penalty: Option<f32>,
    pub presence_penalty: Option<f32>,
}

impl ChatOptions {
    /// Range-check every numeric field that is set.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(temperature) = self.temperature
            && !(0.0..=2.0).contains(&temperature)
        {
            return Err(format!("temperature must be within [0, 2], got {temperature}"));
        }
        if let Some(max_tokens) = self.max_tokens
            && max_tokens < 1
        {
            return Err("max_tokens must be at least 1".to_string());
        }
        if let Some(top_p) = self.top_p
            && !(0.0..=1.0).contains(&top_p)
        {
            return Err(format!("top_p must be within [0, 1], got {top_p}"));
        }
        if let Some(frequency_penalty) = self.frequency_penalty
            && !(-2.0..=2.0).contains(&frequency_penalty)
        {
            return Err(format!(
                "frequency_penalty must be within [-2, 2], got {frequency_penalty}"
            ));
        }
        if let Some(presence_penalty) = self.presence_penalty
            && !(-2.0..=2.0).contains(&presence_penalty)
        {
            return Err(format!(
                "presence_penalty must be within [-2, 2], got {presence_penalty}"
            ));
        }
        Ok(())
    }
}

/// Fully-resolved generation parameters for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedOptions {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
}

impl ResolvedOptions {
    /// Provider defaults overridden field-by-field by caller options.
    pub fn resolve(config: &ProviderConfig, options: Option<&ChatOptions>) -> Self {
        let defaults = Self::defaults_for(config);
        match options {
            Some(options) => defaults.apply(options),
            None => defaults,
        }
    }

    /// The fixed baseline every adapter starts from.
    pub fn defaults_for(config: &ProviderConfig) -> Self {
        Self {
            model: config.default_model.clone(),
            temperature: 0.7,
            max_tokens: 8000,
            top_p: 1.0,
            frequency_penalty: 0.1,
            presence_penalty: 0.0,
        }
    }

    fn apply(mut self, options: &ChatOptions) -> Self {
        if let Some(ref model) = options.model {
            self.model = model.clone();
        }
        if let Some(temperature) = options.temperature {
            self.temperature = temperature;
        }
        if let Some(max_tokens) = options.max_tokens {
            self.max_tokens = max_tokens;
        }
        if let Some(top_p) = options.top_p {
            self.top_p = top_p;
        }
        if let Some(frequency_penalty) = options.frequency_penalty {
            self.frequency_penalty = frequency_penalty;
        }
        if let Some(presence_penalty) = options.presence_penalty {
            self.presence_penalty = presence_penalty;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use crate::config::ProviderType;

    use super::*;

    fn test_config() -> ProviderConfig {
        ProviderConfig {
            provider_type: ProviderType::OpenAI,
            api_key: "test-key".to_string(),
            base_url: None,
            models: vec!["gpt-4.1-mini".to_string()],
            default_model: "gpt-4.1-mini".to_string(),
        }
    }

    #[test]
    fn test_message_roles() {
        assert_eq!(serde_json::to_string(&Role::System).unwrap(), "\"system\"");
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            "\"assistant\""
        );

        assert_eq!(
            serde_json::from_str::<Role>("\"assistant\"").unwrap(),
            Role::Assistant
        );
        assert!(serde_json::from_str::<Role>("\"tool\"").is_err());
    }

    #[test]
    fn test_empty_options_resolve_to_defaults() {
        let config = test_config();
        let resolved = ResolvedOptions::resolve(&config, Some(&ChatOptions::default()));
        assert_eq!(resolved, ResolvedOptions::defaults_for(&config));
    }

    #[test]
    fn test_defaults_baseline() {
        let defaults = ResolvedOptions::defaults_for(&test_config());
        assert_eq!(defaults.model, "gpt-4.1-mini");
        assert_eq!(defaults.temperature, 0.7);
        assert_eq!(defaults.max_tokens, 8000);
        assert_eq!(defaults.top_p, 1.0);
        assert_eq!(defaults.frequency_penalty, 0.1);
        assert_eq!(defaults.presence_penalty, 0.0);
    }

    #[test]
    fn test_options_override_field_by_field() {
        let options = ChatOptions {
            model: Some("gpt-4o-mini".to_string()),
            temperature: Some(0.2),
            ..Default::default()
        };

        let resolved = ResolvedOptions::resolve(&test_config(), Some(&options));
        assert_eq!(resolved.model, "gpt-4o-mini");
        assert_eq!(resolved.temperature, 0.2);
        // Untouched fields keep the baseline.
        assert_eq!(resolved.max_tokens, 8000);
        assert_eq!(resolved.frequency_penalty, 0.1);
    }

    #[test]
    fn test_validate_rejects_out_of_range_values() {
        let too_hot = ChatOptions {
            temperature: Some(2.5),
            ..Default::default()
        };
        assert!(too_hot.validate().unwrap_err().contains("temperature"));

        let bad_top_p = ChatOptions {
            top_p: Some(1.5),
            ..Default::default()
        };
        assert!(bad_top_p.validate().unwrap_err().contains("top_p"));

        let bad_penalty = ChatOptions {
            presence_penalty: Some(-3.0),
            ..Default::default()
        };
        assert!(bad_penalty.validate().unwrap_err().contains("presence_penalty"));

        let zero_tokens = ChatOptions {
            max_tokens: Some(0),
            ..Default::default()
        };
        assert!(zero_tokens.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_boundary_values() {
        let options = ChatOptions {
            temperature: Some(2.0),
            max_tokens: Some(1),
            top_p: Some(0.0),
            frequency_penalty: Some(-2.0),
            presence_penalty: Some(2.0),
            ..Default::default()
        };
        assert!(options.validate().is_ok());
    }
}

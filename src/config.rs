use std::fmt;
use std::io::ErrorKind;
use std::path::Path;
use std::str::FromStr;

use tokio::fs;

use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// Config (root)
// ============================================================================

/// Server-side settings loaded from an optional YAML file.
///
/// Provider credentials never live here; they come from the environment
/// (see [`ProvidersConfig`]).
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
}

impl Config {
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = match fs::read_to_string(path).await {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(ConfigError::Io(e)),
        };
        Ok(serde_saphyr::from_str(&contents)?)
    }
}

// ============================================================================
// ServerConfig
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    300
}

// ============================================================================
// ProviderType
// ============================================================================

/// The supported chat completion vendors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum ProviderType {
    #[serde(rename = "deepseek")]
    DeepSeek,
    #[serde(rename = "openai")]
    OpenAI,
    #[serde(rename = "azure-openai")]
    AzureOpenAI,
    #[serde(rename = "claude")]
    Claude,
    #[serde(rename = "mistral")]
    Mistral,
    #[serde(rename = "codestral")]
    Codestral,
    #[serde(rename = "gemini")]
    Gemini,
}

impl ProviderType {
    pub const ALL: [ProviderType; 7] = [
        ProviderType::DeepSeek,
        ProviderType::OpenAI,
        ProviderType::AzureOpenAI,
        ProviderType::Claude,
        ProviderType::Mistral,
        ProviderType::Codestral,
        ProviderType::Gemini,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderType::DeepSeek => "deepseek",
            ProviderType::OpenAI => "openai",
            ProviderType::AzureOpenAI => "azure-openai",
            ProviderType::Claude => "claude",
            ProviderType::Mistral => "mistral",
            ProviderType::Codestral => "codestral",
            ProviderType::Gemini => "gemini",
        }
    }

    /// Environment variable prefix for this vendor's settings.
    fn env_prefix(&self) -> &'static str {
        match self {
            ProviderType::DeepSeek => "DEEPSEEK",
            ProviderType::OpenAI => "OPENAI",
            ProviderType::AzureOpenAI => "AZURE_OPENAI",
            ProviderType::Claude => "CLAUDE",
            ProviderType::Mistral => "MISTRAL",
            ProviderType::Codestral => "CODESTRAL",
            ProviderType::Gemini => "GEMINI",
        }
    }
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deepseek" => Ok(ProviderType::DeepSeek),
            "openai" => Ok(ProviderType::OpenAI),
            "azure-openai" => Ok(ProviderType::AzureOpenAI),
            "claude" => Ok(ProviderType::Claude),
            "mistral" => Ok(ProviderType::Mistral),
            "codestral" => Ok(ProviderType::Codestral),
            "gemini" => Ok(ProviderType::Gemini),
            other => Err(ConfigError::UnknownProviderType(other.to_string())),
        }
    }
}

// ============================================================================
// ProviderConfig
// ============================================================================

/// Everything needed to construct one vendor adapter. Immutable for the
/// process lifetime once built.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub provider_type: ProviderType,
    pub api_key: String,
    pub base_url: Option<String>,
    /// Deployment-advertised model ids, informational only.
    pub models: Vec<String>,
    pub default_model: String,
}

// ============================================================================
// ProvidersConfig
// ============================================================================

/// The full provider table plus the vendor selected via `PROVIDER`.
#[derive(Debug, Clone)]
pub struct ProvidersConfig {
    pub selected: ProviderType,
    providers: Vec<ProviderConfig>,
}

impl ProvidersConfig {
    /// Load the provider table from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load the provider table from an arbitrary key/value lookup.
    ///
    /// `PROVIDER` selects the active vendor (default `deepseek`). Each
    /// vendor reads `<PREFIX>_API_KEY`, `<PREFIX>_BASE_URL` and
    /// `<PREFIX>_DEFAULT_MODEL`. The selected vendor must have a
    /// non-empty API key; Azure additionally requires a base URL.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let selected = match lookup("PROVIDER").filter(|v| !v.is_empty()) {
            Some(value) => value.parse()?,
            None => ProviderType::DeepSeek,
        };

        let providers = ProviderType::ALL
            .iter()
            .map(|&provider_type| provider_from_lookup(provider_type, &lookup))
            .collect();

        let config = Self {
            selected,
            providers,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn get(&self, provider_type: ProviderType) -> &ProviderConfig {
        self.providers
            .iter()
            .find(|p| p.provider_type == provider_type)
            .expect("provider table covers every ProviderType")
    }

    /// The config of the vendor selected via `PROVIDER`.
    pub fn selected_config(&self) -> &ProviderConfig {
        self.get(self.selected)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let selected = self.selected_config();
        if selected.api_key.is_empty() {
            return Err(ConfigError::MissingApiKey(self.selected));
        }
        if self.selected == ProviderType::AzureOpenAI
            && selected.base_url.as_deref().unwrap_or("").is_empty()
        {
            return Err(ConfigError::MissingBaseUrl(self.selected));
        }
        Ok(())
    }
}

fn provider_from_lookup(
    provider_type: ProviderType,
    lookup: impl Fn(&str) -> Option<String>,
) -> ProviderConfig {
    let prefix = provider_type.env_prefix();
    let non_empty = |key: String| lookup(&key).filter(|v| !v.is_empty());

    ProviderConfig {
        provider_type,
        api_key: lookup(&format!("{prefix}_API_KEY")).unwrap_or_default(),
        base_url: non_empty(format!("{prefix}_BASE_URL"))
            .or_else(|| default_base_url(provider_type).map(str::to_string)),
        models: default_models(provider_type),
        default_model: non_empty(format!("{prefix}_DEFAULT_MODEL"))
            .unwrap_or_else(|| default_model(provider_type).to_string()),
    }
}

/// Azure has no universal endpoint, so it carries no default.
fn default_base_url(provider_type: ProviderType) -> Option<&'static str> {
    match provider_type {
        ProviderType::DeepSeek => Some("https://api.deepseek.com/v1"),
        ProviderType::OpenAI => Some("https://api.openai.com/v1"),
        ProviderType::AzureOpenAI => None,
        ProviderType::Claude => Some("https://api.anthropic.com/v1"),
        ProviderType::Mistral => Some("https://api.mistral.ai/v1"),
        ProviderType::Codestral => Some("https://codestral.mistral.ai/v1"),
        ProviderType::Gemini => Some("https://generativelanguage.googleapis.com/v1beta"),
    }
}

fn default_model(provider_type: ProviderType) -> &'static str {
    match provider_type {
        ProviderType::DeepSeek => "deepseek-reasoner",
        ProviderType::OpenAI => "gpt-4.1-mini",
        ProviderType::AzureOpenAI => "gpt-4.1-mini",
        ProviderType::Claude => "claude-3-5-sonnet-20241022",
        ProviderType::Mistral => "mistral-large-latest",
        ProviderType::Codestral => "codestral-latest",
        ProviderType::Gemini => "gemini-1.5-pro",
    }
}

fn default_models(provider_type: ProviderType) -> Vec<String> {
    let models: &[&str] = match provider_type {
        ProviderType::DeepSeek => &["deepseek-chat", "deepseek-reasoner"],
        ProviderType::OpenAI => &["gpt-4o-mini", "gpt-4.1-mini", "gpt-4.1-nano"],
        ProviderType::AzureOpenAI => &["gpt-4o", "gpt-4o-mini", "gpt-4.1-mini"],
        ProviderType::Claude => &[
            "claude-3-5-sonnet-20241022",
            "claude-3-5-haiku-20241022",
            "claude-3-opus-20240229",
            "claude-3-sonnet-20240229",
            "claude-3-haiku-20240307",
        ],
        ProviderType::Mistral => &[
            "mistral-large-latest",
            "mistral-medium-latest",
            "mistral-small-latest",
            "open-mistral-7b",
            "open-mixtral-8x7b",
            "open-mixtral-8x22b",
        ],
        ProviderType::Codestral => &["codestral-latest", "codestral-2405"],
        ProviderType::Gemini => &[
            "gemini-1.5-pro",
            "gemini-1.5-flash",
            "gemini-1.0-pro",
            "gemini-exp-1206",
        ],
    };
    models.iter().map(|m| m.to_string()).collect()
}

// ============================================================================
// ConfigError
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Yaml(#[from] serde_saphyr::Error),

    #[error("unknown provider type: {0}")]
    UnknownProviderType(String),

    #[error("api key is required for the {0} provider")]
    MissingApiKey(ProviderType),

    #[error("the {0} provider requires a base url")]
    MissingBaseUrl(ProviderType),
}

// ============================================================================
// Tests
// ============================================================================

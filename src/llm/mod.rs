//! Multi-vendor chat completion providers.

mod azure_openai;
mod claude;
mod codestral;
mod deepseek;
mod error;
mod factory;
mod gemini;
mod mistral;
mod openai;
mod provider;
mod types;

pub use error::ProviderError;
pub use factory::create_provider;
pub use provider::ChatProvider;
pub use types::{ChatMessage, ChatOptions, ModelInfo, ResolvedOptions, Role};

//! Provider error types.

use thiserror::Error;

use crate::config::ProviderType;

/// Errors that can occur during an in-flight completion call. Every
/// variant names the vendor it came from.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// HTTP transport failed before a response envelope arrived.
    #[error("{provider} request failed: {source}")]
    Request {
        provider: ProviderType,
        #[source]
        source: reqwest::Error,
    },

    /// The API returned an error response.
    #[error("{provider} api error (status {status}): {message}")]
    Api {
        provider: ProviderType,
        status: u16,
        message: String,
    },

    /// The response envelope carried no completion.
    #[error("{provider} returned an empty response")]
    Empty { provider: ProviderType },
}

impl ProviderError {
    pub(super) fn request(provider: ProviderType, source: reqwest::Error) -> Self {
        ProviderError::Request { provider, source }
    }
}

/// The error body shape most vendors embed in non-2xx responses.
#[derive(serde::Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(serde::Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Map a non-2xx response to an [`ProviderError::Api`].
///
/// Message priority: the vendor's embedded `error.message`, else the raw
/// body text, else a literal `Unknown error`.
pub(super) async fn api_error(provider: ProviderType, response: reqwest::Response) -> ProviderError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();

    let message = match serde_json::from_str::<ApiErrorBody>(&body) {
        Ok(parsed) if !parsed.error.message.is_empty() => parsed.error.message,
        _ if !body.trim().is_empty() => body,
        _ => "Unknown error".to_string(),
    };

    ProviderError::Api {
        provider,
        status,
        message,
    }
}

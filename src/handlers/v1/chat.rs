//! Single-shot chat completion handler.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::llm::{ChatMessage, ChatOptions, Role};
use crate::response;
use crate::server::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct ChatCompletionRequest {
    /// Shorthand for a single user message.
    message: Option<String>,
    /// Full conversation; ignored when `message` is set.
    messages: Option<Vec<ChatMessage>>,
    options: Option<ChatOptions>,
}

#[derive(Serialize)]
pub struct ChatCompletionResponse {
    content: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/chat/completions
pub async fn chat_completion(
    State(state): State<AppState>,
    Json(req): Json<ChatCompletionRequest>,
) -> Response {
    let messages = match build_messages(req.message, req.messages) {
        Ok(messages) => messages,
        Err(msg) => return response::bad_request(msg),
    };

    if let Some(ref options) = req.options
        && let Err(msg) = options.validate()
    {
        return response::bad_request(msg);
    }

    match state
        .provider
        .chat_completion(&messages, req.options.as_ref())
        .await
    {
        Ok(content) => (StatusCode::OK, Json(ChatCompletionResponse { content })).into_response(),
        Err(e) => response::bad_gateway(e.to_string()),
    }
}

fn build_messages(
    message: Option<String>,
    messages: Option<Vec<ChatMessage>>,
) -> Result<Vec<ChatMessage>, &'static str> {
    match (message, messages) {
        (Some(content), _) => Ok(vec![ChatMessage {
            role: Role::User,
            content,
        }]),
        (None, Some(messages)) if !messages.is_empty() => Ok(messages),
        _ => Err("either 'message' or 'messages' must be provided"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_shorthand_becomes_a_user_turn() {
        let messages = build_messages(Some("hi".to_string()), None).unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[0].content, "hi");
    }

    #[test]
    fn test_message_takes_priority_over_messages() {
        let ignored = vec![ChatMessage {
            role: Role::Assistant,
            content: "stale".to_string(),
        }];
        let messages = build_messages(Some("hi".to_string()), Some(ignored)).unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].content, "hi");
    }

    #[test]
    fn test_neither_field_is_rejected() {
        assert!(build_messages(None, None).is_err());
        assert!(build_messages(None, Some(vec![])).is_err());
    }
}

//! Multi-turn conversation handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::llm::{ChatMessage, Role};
use crate::response;
use crate::server::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Serialize)]
pub struct CreateConversationResponse {
    conversation_id: String,
    created_at: String,
}

#[derive(Serialize)]
pub struct GetConversationResponse {
    conversation_id: String,
    created_at: String,
    updated_at: String,
    message_count: usize,
}

#[derive(Deserialize)]
pub struct SendMessageRequest {
    content: String,
}

#[derive(Serialize)]
pub struct SendMessageResponse {
    message_id: String,
    role: String,
    content: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/conversations
pub async fn create_conversation(State(state): State<AppState>) -> Response {
    let conversation = state.conversations.create();

    let response = CreateConversationResponse {
        conversation_id: conversation.id,
        created_at: conversation.created_at.to_rfc3339(),
    };

    (StatusCode::OK, Json(response)).into_response()
}

/// GET /api/v1/conversations/{conversation_id}
pub async fn get_conversation(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
) -> Response {
    let Some(conversation) = state.conversations.get(&conversation_id) else {
        return response::not_found("Conversation not found");
    };

    let response = GetConversationResponse {
        conversation_id: conversation.id,
        created_at: conversation.created_at.to_rfc3339(),
        updated_at: conversation.updated_at.to_rfc3339(),
        message_count: conversation.messages.len(),
    };

    (StatusCode::OK, Json(response)).into_response()
}

/// POST /api/v1/conversations/{conversation_id}/messages
///
/// Appends the caller's message, sends the full history to the provider
/// with its default options, and appends the assistant's reply.
pub async fn send_message(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
    Json(req): Json<SendMessageRequest>,
) -> Response {
    let user_message = ChatMessage {
        role: Role::User,
        content: req.content,
    };
    if state
        .conversations
        .append(&conversation_id, user_message)
        .is_none()
    {
        return response::not_found("Conversation not found");
    }

    let Some(history) = state.conversations.messages(&conversation_id) else {
        return response::internal_error("Conversation disappeared mid-request");
    };

    let content = match state.provider.chat_completion(&history, None).await {
        Ok(content) => content,
        Err(e) => return response::bad_gateway(e.to_string()),
    };

    let assistant_message = ChatMessage {
        role: Role::Assistant,
        content: content.clone(),
    };
    let _ = state.conversations.append(&conversation_id, assistant_message);

    let response = SendMessageResponse {
        message_id: format!("msg_{}", Uuid::new_v4().simple()),
        role: "assistant".to_string(),
        content,
    };

    (StatusCode::OK, Json(response)).into_response()
}

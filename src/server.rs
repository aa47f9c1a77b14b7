use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::timeout::TimeoutLayer;

use crate::handlers;
use crate::history::ConversationStore;
use crate::llm::ChatProvider;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn ChatProvider>,
    pub conversations: ConversationStore,
}

pub fn build_app(state: AppState, request_timeout_secs: u64) -> Router {
    let api_v1 = Router::new()
        .route("/models", get(handlers::v1::list_models))
        .route("/chat/completions", post(handlers::v1::chat_completion))
        .route("/conversations", post(handlers::v1::create_conversation))
        .route(
            "/conversations/{conversation_id}",
            get(handlers::v1::get_conversation),
        )
        .route(
            "/conversations/{conversation_id}/messages",
            post(handlers::v1::send_message),
        )
        .with_state(state);

    Router::new()
        .route("/livez", get(handlers::livez))
        .route("/readyz", get(handlers::readyz))
        .route("/version", get(handlers::version))
        .nest("/api/v1", api_v1)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(request_timeout_secs),
        ))
}

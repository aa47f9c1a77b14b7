//! Model catalog handler.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::llm::ModelInfo;
use crate::server::AppState;

#[derive(Serialize)]
pub struct ListModelsResponse {
    provider: String,
    models: Vec<ModelInfo>,
}

/// GET /api/v1/models
///
/// The configured provider's static catalog; no upstream call is made.
pub async fn list_models(State(state): State<AppState>) -> Json<ListModelsResponse> {
    Json(ListModelsResponse {
        provider: state.provider.provider_type().to_string(),
        models: state.provider.available_models(),
    })
}

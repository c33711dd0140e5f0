use axum::extract::State;
use axum::Json;

use crate::models::StatusResponse;
use crate::state::AppState;

/// GET /api/status - Summary of the loaded index.
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let index = state.engine.index();
    let meta = index.meta();
    Json(StatusResponse {
        model_name: meta.model_name.clone(),
        source: meta.source.clone(),
        chunks: index.len(),
        dim: index.dim(),
        chat_enabled: state.engine.chat_enabled(),
    })
}

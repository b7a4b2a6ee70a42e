use axum::extract::State;
use axum::Json;
use std::sync::Arc;

use super::AppState;

/// Health check endpoint
pub async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "node_id": state.service.self_id(),
        "peer_count": state.service.peers().len(),
        "count": state.service.counter_value(),
    }))
}

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use std::sync::Arc;
use uuid::Uuid;

use crate::dto::{CountResponse, IncrementResponse, ReplicateRequest};
use crate::handlers::AppState;
use flock::ClusterError;

/// POST /counter/increment
/// Mint a fresh event id, apply it locally, and fan it out to the cluster.
/// The response does not wait for any delivery.
pub async fn increment(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let event_id = Uuid::new_v4().to_string();
    tracing::info!("increment requested, minted event {}", event_id);

    match state.service.increment(&event_id) {
        Ok(()) => (
            StatusCode::OK,
            Json(IncrementResponse {
                status: "accepted".to_string(),
                event_id,
            }),
        ),
        Err(ClusterError::DuplicateEvent(_)) => (
            StatusCode::CONFLICT,
            Json(IncrementResponse {
                status: "duplicate".to_string(),
                event_id,
            }),
        ),
    }
}

/// POST /counter/replicate
/// Apply an increment event received from a peer. A duplicate is a normal
/// ack: the event already landed here through another path.
pub async fn replicate(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ReplicateRequest>,
) -> Json<serde_json::Value> {
    match state.service.increment(&body.event_id) {
        Ok(()) => Json(serde_json::json!({ "status": "applied" })),
        Err(ClusterError::DuplicateEvent(_)) => {
            Json(serde_json::json!({ "status": "duplicate" }))
        }
    }
}

/// GET /counter/count
pub async fn count(State(state): State<Arc<AppState>>) -> Json<CountResponse> {
    Json(CountResponse {
        count: state.service.counter_value(),
    })
}

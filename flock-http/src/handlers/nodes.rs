use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use std::sync::Arc;

use crate::dto::{NodeRequest, PeersResponse};
use crate::handlers::AppState;

/// POST /nodes/join
/// Register the caller as a peer and hand back our current peer list, so a
/// joining node discovers the whole cluster through us.
pub async fn join(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NodeRequest>,
) -> Json<PeersResponse> {
    state.service.add_peer(&body.node_id);

    let peers = state.service.peers();
    tracing::info!("{} joined, {} peers known", body.node_id, peers.len());

    Json(PeersResponse { peers })
}

/// GET /nodes
pub async fn list_peers(State(state): State<Arc<AppState>>) -> Json<PeersResponse> {
    Json(PeersResponse {
        peers: state.service.peers(),
    })
}

/// POST /nodes/heartbeat
/// Refresh the caller's last-contact time (and learn it, if new).
pub async fn heartbeat(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NodeRequest>,
) -> StatusCode {
    state.service.add_peer(&body.node_id);
    StatusCode::OK
}

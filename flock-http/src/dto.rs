use serde::{Deserialize, Serialize};

/// Body of `/nodes/join` and `/nodes/heartbeat`: the caller announcing its
/// own dialable address.
#[derive(Debug, Serialize, Deserialize)]
pub struct NodeRequest {
    pub node_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PeersResponse {
    pub peers: Vec<String>,
}

/// Body of `/counter/replicate`: one increment event from a peer.
#[derive(Debug, Serialize, Deserialize)]
pub struct ReplicateRequest {
    pub node_id: String,
    pub event_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IncrementResponse {
    pub status: String,
    pub event_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CountResponse {
    pub count: i64,
}

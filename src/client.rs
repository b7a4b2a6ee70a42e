use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::ClientError;

/// Outbound calls the cluster service makes against a peer.
///
/// Implementations must bound every call with a timeout; the service holds
/// locks across delivery attempts during retry scans and relies on calls
/// never blocking indefinitely.
#[async_trait]
pub trait ClusterClient: Send + Sync {
    /// Announce `self_id` to `peer` and fetch the peer list it knows about.
    async fn join(&self, peer: &str, self_id: &str) -> Result<Vec<String>, ClientError>;

    /// Liveness ping; the receiver refreshes our last-contact time.
    async fn heartbeat(&self, peer: &str, self_id: &str) -> Result<(), ClientError>;

    /// Deliver one counter increment event.
    async fn replicate(&self, peer: &str, self_id: &str, event_id: &str)
        -> Result<(), ClientError>;
}

#[derive(Debug, Serialize)]
struct NodePayload {
    node_id: String,
}

#[derive(Debug, Serialize)]
struct ReplicatePayload {
    node_id: String,
    event_id: String,
}

#[derive(Debug, Deserialize)]
struct JoinResponse {
    peers: Vec<String>,
}

/// HTTP client speaking the cluster's JSON wire format.
///
/// Peers are addressed as `host:port`; the scheme is always plain HTTP.
pub struct HttpPeerClient {
    http: reqwest::Client,
}

impl HttpPeerClient {
    pub fn new(timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self { http }
    }

    async fn post_json<T: Serialize>(
        &self,
        peer: &str,
        path: &str,
        payload: &T,
    ) -> Result<reqwest::Response, ClientError> {
        let url = format!("http://{}{}", peer, path);

        let response = self
            .http
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|e| ClientError::Request {
                peer: peer.to_string(),
                source: e,
            })?;

        if !response.status().is_success() {
            return Err(ClientError::Status {
                peer: peer.to_string(),
                status: response.status(),
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl ClusterClient for HttpPeerClient {
    async fn join(&self, peer: &str, self_id: &str) -> Result<Vec<String>, ClientError> {
        let payload = NodePayload {
            node_id: self_id.to_string(),
        };

        let response = self.post_json(peer, "/nodes/join", &payload).await?;
        let body: JoinResponse = response.json().await.map_err(|e| ClientError::Request {
            peer: peer.to_string(),
            source: e,
        })?;

        Ok(body.peers)
    }

    async fn heartbeat(&self, peer: &str, self_id: &str) -> Result<(), ClientError> {
        let payload = NodePayload {
            node_id: self_id.to_string(),
        };

        self.post_json(peer, "/nodes/heartbeat", &payload).await?;
        Ok(())
    }

    async fn replicate(
        &self,
        peer: &str,
        self_id: &str,
        event_id: &str,
    ) -> Result<(), ClientError> {
        let payload = ReplicatePayload {
            node_id: self_id.to_string(),
            event_id: event_id.to_string(),
        };

        self.post_json(peer, "/counter/replicate", &payload).await?;
        Ok(())
    }
}

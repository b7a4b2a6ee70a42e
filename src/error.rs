use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClusterError {
    #[error("event {0} already applied")]
    DuplicateEvent(String),
}

/// Failure of an outbound call to a peer. Never fatal: callers either drop
/// it (join, heartbeat) or queue the event for retry (replicate).
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request to {peer} failed: {source}")]
    Request {
        peer: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("peer {peer} returned status {status}")]
    Status {
        peer: String,
        status: reqwest::StatusCode,
    },
}

pub type Result<T> = std::result::Result<T, ClusterError>;

//! # Flock
//!
//! A self-organizing cluster membership layer with a replicated,
//! deduplicating counter on top.
//!
//! Nodes discover each other through a join handshake against any single
//! seed, keep liveness with periodic heartbeats, and evict peers that go
//! silent past a staleness window. Counter increments are applied locally,
//! acknowledged immediately, and fanned out to every known peer on detached
//! tasks; failed deliveries are retried with exponential backoff. Every
//! event carries an opaque id and each node applies it at most once, so the
//! at-least-once delivery of the retry path never double-counts.
//!
//! Flock can be embedded, or run as a standalone HTTP node via the
//! companion `flock-http` and `flock-server` crates.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use flock::{ClusterService, ClusterTiming, HttpPeerClient};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let timing = ClusterTiming::default();
//! let client = Arc::new(HttpPeerClient::new(timing.request_timeout));
//! let service = Arc::new(ClusterService::new("localhost:8010", client, timing));
//!
//! // Discover the cluster through one seed, then start the loops.
//! service.join_peer("localhost:8011").await;
//! let hb = Arc::clone(&service);
//! tokio::spawn(async move { hb.run_heartbeat_loop().await });
//!
//! service.increment("3f0ce0a6-e18f-4a9c-bafd-6d8e4e4519f2").unwrap();
//! # }
//! ```

pub mod client;
pub mod config;
pub mod counter;
pub mod error;
pub mod membership;
pub mod service;

pub use client::{ClusterClient, HttpPeerClient};
pub use config::{ClusterTiming, NodeConfig};
pub use counter::ReplicatedCounter;
pub use error::{ClientError, ClusterError, Result};
pub use membership::PeerRegistry;
pub use service::ClusterService;

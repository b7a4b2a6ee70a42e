use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::handlers::{self, AppState};
use flock::{ClusterService, ClusterTiming, HttpPeerClient, NodeConfig};

/// Build the router for one node. Split out of [`serve`] so tests can drive
/// the API without binding a listener.
pub fn router(service: Arc<ClusterService>) -> Router {
    let state = Arc::new(AppState { service });

    Router::new()
        .route("/nodes/join", post(handlers::join))
        .route("/nodes", get(handlers::list_peers))
        .route("/nodes/heartbeat", post(handlers::heartbeat))
        .route("/counter/increment", post(handlers::increment))
        .route("/counter/replicate", post(handlers::replicate))
        .route("/counter/count", get(handlers::count))
        .route("/health", get(handlers::health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Run one flock node: wire the service, join the seed peers, start the
/// heartbeat/cleanup/retry loops, and serve the API until the process dies.
///
/// The only fatal error is failing to bind the listener.
pub async fn serve(config: NodeConfig) -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let timing = ClusterTiming::default();
    let client = Arc::new(HttpPeerClient::new(timing.request_timeout));
    let service = Arc::new(ClusterService::new(
        config.node_id.clone(),
        client,
        timing,
    ));

    // Best-effort seed joins; a dead seed just means we start alone.
    for seed in &config.peers {
        service.join_peer(seed).await;
    }

    let heartbeat = Arc::clone(&service);
    tokio::spawn(async move { heartbeat.run_heartbeat_loop().await });
    let cleanup = Arc::clone(&service);
    tokio::spawn(async move { cleanup.run_cleanup_loop().await });
    let retry = Arc::clone(&service);
    tokio::spawn(async move { retry.run_retry_loop().await });

    let app = router(Arc::clone(&service));

    tracing::info!(
        "Starting flock node {} on {}",
        config.node_id,
        config.bind_addr
    );

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

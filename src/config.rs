use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Identity and wiring for one node.
///
/// The `node_id` is the address other nodes dial back (`host:port`), so it
/// must be reachable from the rest of the cluster, not just unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    pub node_id: String,
    pub bind_addr: String,
    /// Seed peers to join at startup. Empty means standalone.
    #[serde(default)]
    pub peers: Vec<String>,
}

impl NodeConfig {
    /// Load node configuration from `{data_dir}/node.json` or fall back to a
    /// standalone default built from `FLOCK_NODE_ID` / `FLOCK_BIND_ADDR` and
    /// the machine hostname.
    pub fn load_or_default(data_dir: &Path) -> Self {
        let node_json = data_dir.join("node.json");

        if node_json.exists() {
            match std::fs::read_to_string(&node_json) {
                Ok(content) => match serde_json::from_str::<NodeConfig>(&content) {
                    Ok(config) => {
                        tracing::info!(
                            "Loaded node config: node_id={}, seeds={}",
                            config.node_id,
                            config.peers.len()
                        );
                        return config;
                    }
                    Err(e) => {
                        tracing::error!("Failed to parse node.json: {}, using defaults", e);
                    }
                },
                Err(e) => {
                    tracing::error!("Failed to read node.json: {}, using defaults", e);
                }
            }
        }

        let bind_addr =
            std::env::var("FLOCK_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8010".to_string());
        let port = bind_addr.rsplit(':').next().unwrap_or("8010").to_string();

        let node_id = std::env::var("FLOCK_NODE_ID").unwrap_or_else(|_| {
            let host = hostname::get()
                .ok()
                .and_then(|h| h.into_string().ok())
                .unwrap_or_else(|| "localhost".to_string());
            format!("{}:{}", host, port)
        });

        tracing::info!(
            "No node.json found, running in standalone mode: node_id={}",
            node_id
        );

        NodeConfig {
            node_id,
            bind_addr,
            peers: vec![],
        }
    }
}

/// Protocol timing. Defaults are the wire protocol's constants; tests shrink
/// them to drive the loops quickly.
///
/// `stale_after` must stay strictly greater than `heartbeat_interval`, or
/// healthy peers get evicted on ordinary jitter.
#[derive(Debug, Clone)]
pub struct ClusterTiming {
    /// Tick of the heartbeat loop.
    pub heartbeat_interval: Duration,
    /// Tick of the eviction loop.
    pub cleanup_interval: Duration,
    /// Silence after which a peer is presumed unreachable.
    pub stale_after: Duration,
    /// Tick of the pending-event retry loop.
    pub retry_interval: Duration,
    /// Upper bound on any single outbound call.
    pub request_timeout: Duration,
    /// First retry delay; doubles per failed attempt.
    pub backoff_base: Duration,
    /// Ceiling on the retry delay.
    pub backoff_max: Duration,
}

impl Default for ClusterTiming {
    fn default() -> Self {
        Self {
            heartbeat_interval: Duration::from_secs(2),
            cleanup_interval: Duration::from_secs(5),
            stale_after: Duration::from_secs(6),
            retry_interval: Duration::from_secs(2),
            request_timeout: Duration::from_secs(2),
            backoff_base: Duration::from_millis(100),
            backoff_max: Duration::from_secs(10),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn load_or_default_no_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = NodeConfig::load_or_default(temp_dir.path());

        assert!(config.peers.is_empty());
        assert!(!config.node_id.is_empty());
        assert!(!config.bind_addr.is_empty());
    }

    #[test]
    fn load_or_default_valid_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let node_json_path = temp_dir.path().join("node.json");

        let config_str = r#"{
            "node_id": "localhost:8010",
            "bind_addr": "0.0.0.0:8010",
            "peers": ["localhost:8011", "localhost:8012"]
        }"#;

        let mut file = std::fs::File::create(&node_json_path).unwrap();
        file.write_all(config_str.as_bytes()).unwrap();

        let config = NodeConfig::load_or_default(temp_dir.path());

        assert_eq!(config.node_id, "localhost:8010");
        assert_eq!(config.bind_addr, "0.0.0.0:8010");
        assert_eq!(config.peers, vec!["localhost:8011", "localhost:8012"]);
    }

    #[test]
    fn load_or_default_missing_peers_key() {
        let temp_dir = tempfile::tempdir().unwrap();
        let node_json_path = temp_dir.path().join("node.json");

        let config_str = r#"{"node_id": "localhost:8010", "bind_addr": "0.0.0.0:8010"}"#;
        std::fs::write(&node_json_path, config_str).unwrap();

        let config = NodeConfig::load_or_default(temp_dir.path());
        assert!(config.peers.is_empty());
    }

    #[test]
    fn load_or_default_invalid_json() {
        let temp_dir = tempfile::tempdir().unwrap();
        let node_json_path = temp_dir.path().join("node.json");

        std::fs::write(&node_json_path, b"invalid json").unwrap();

        let config = NodeConfig::load_or_default(temp_dir.path());

        assert!(config.peers.is_empty());
    }

    #[test]
    fn default_timing_keeps_staleness_above_heartbeat() {
        let timing = ClusterTiming::default();
        assert!(timing.stale_after > timing.heartbeat_interval);
    }
}

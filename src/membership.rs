use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Instant;

/// The set of known peers and when each was last heard from.
///
/// Peers are keyed by their network address (`host:port`), which doubles as
/// their identity on the wire. A peer is (re)stamped with the current time on
/// every join or heartbeat it sends us; the cleanup loop evicts peers whose
/// stamp has gone stale. The node's own id is never stored as a peer.
///
/// Writers take the lock exclusively, readers share it, and [`snapshot`]
/// copies under the read lock so callers never observe mutation mid-pass.
///
/// [`snapshot`]: PeerRegistry::snapshot
pub struct PeerRegistry {
    self_id: String,
    peers: RwLock<HashMap<String, Instant>>,
}

impl PeerRegistry {
    pub fn new(self_id: impl Into<String>) -> Self {
        Self {
            self_id: self_id.into(),
            peers: RwLock::new(HashMap::new()),
        }
    }

    /// Insert a peer, or refresh its last-contact time if already known.
    /// Adding our own id is a silent no-op.
    pub fn add_peer(&self, peer_id: &str) {
        if peer_id == self.self_id {
            return;
        }
        let mut peers = self.peers.write().unwrap();
        peers.insert(peer_id.to_string(), Instant::now());
    }

    /// Remove a peer. Removing an unknown id is a no-op, not an error.
    pub fn remove_peer(&self, peer_id: &str) {
        self.peers.write().unwrap().remove(peer_id);
    }

    /// Point-in-time list of known peer ids, in unspecified order.
    pub fn peers(&self) -> Vec<String> {
        self.peers.read().unwrap().keys().cloned().collect()
    }

    pub fn self_id(&self) -> &str {
        &self.self_id
    }

    /// Deep copy of the peer map. Mutating the returned map never affects
    /// registry state.
    pub fn snapshot(&self) -> HashMap<String, Instant> {
        self.peers.read().unwrap().clone()
    }
}

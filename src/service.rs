use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use crate::client::ClusterClient;
use crate::config::ClusterTiming;
use crate::counter::ReplicatedCounter;
use crate::error::ClusterError;
use crate::membership::PeerRegistry;

/// A replication attempt awaiting retry after a failed delivery.
#[derive(Debug, Clone)]
struct PendingEvent {
    event_id: String,
    /// Completed failed attempts, counting the initial fan-out delivery.
    attempt: u32,
    next_retry: Instant,
}

type PendingQueue = HashMap<String, Vec<PendingEvent>>;

/// Orchestrates membership, liveness, and counter replication for one node.
///
/// One instance per process, shared behind `Arc` by the HTTP handlers, the
/// replication fan-out tasks, and the three background loops. All state is
/// owned here; there are no globals.
///
/// Transport failures are never fatal to the service: join and heartbeat
/// failures are dropped, replication failures become pending entries that
/// the retry loop works off with exponential backoff. The only error a
/// caller ever sees is [`ClusterError::DuplicateEvent`].
pub struct ClusterService {
    registry: PeerRegistry,
    counter: ReplicatedCounter,
    client: Arc<dyn ClusterClient>,
    /// Failed deliveries keyed by destination peer. Guarded by its own lock,
    /// distinct from the registry's and the counter's; the retry loop holds
    /// it across a whole scan pass, so it is an async mutex.
    pending: Arc<Mutex<PendingQueue>>,
    timing: ClusterTiming,
}

impl ClusterService {
    pub fn new(
        self_id: impl Into<String>,
        client: Arc<dyn ClusterClient>,
        timing: ClusterTiming,
    ) -> Self {
        Self {
            registry: PeerRegistry::new(self_id),
            counter: ReplicatedCounter::new(),
            client,
            pending: Arc::new(Mutex::new(HashMap::new())),
            timing,
        }
    }

    pub fn self_id(&self) -> &str {
        self.registry.self_id()
    }

    /// Best-effort join against a seed peer.
    ///
    /// On success the seed plus every peer it reported are added to the
    /// registry, so a single seed is enough to discover the whole cluster.
    /// On transport failure we log and give up; there is no join retry.
    pub async fn join_peer(&self, peer: &str) {
        match self.client.join(peer, self.registry.self_id()).await {
            Ok(peers) => {
                tracing::info!("joined {}, it reported {} peers", peer, peers.len());
                self.registry.add_peer(peer);
                for p in &peers {
                    self.registry.add_peer(p);
                }
            }
            Err(e) => {
                tracing::warn!("join to {} failed: {}", peer, e);
            }
        }
    }

    /// Register a peer learned from an inbound join or heartbeat.
    pub fn add_peer(&self, peer: &str) {
        self.registry.add_peer(peer);
    }

    pub fn peers(&self) -> Vec<String> {
        self.registry.peers()
    }

    pub fn counter_value(&self) -> i64 {
        self.counter.get()
    }

    /// Apply one increment locally and fan it out to every known peer.
    ///
    /// Returns as soon as the local application succeeds; delivery runs on a
    /// detached task per destination, so one unreachable peer never delays
    /// the caller or the other peers. A failed delivery enqueues the event
    /// for the retry loop. Peers that join after dispatch never receive this
    /// event.
    ///
    /// Must be called from within a tokio runtime.
    pub fn increment(&self, event_id: &str) -> Result<(), ClusterError> {
        if !self.counter.apply(event_id, 1) {
            return Err(ClusterError::DuplicateEvent(event_id.to_string()));
        }

        let peers = self.registry.peers();
        tracing::info!("applied event {}, replicating to {} peers", event_id, peers.len());

        for peer in peers {
            let client = Arc::clone(&self.client);
            let pending = Arc::clone(&self.pending);
            let self_id = self.registry.self_id().to_string();
            let event_id = event_id.to_string();

            tokio::spawn(async move {
                send_or_queue(client, pending, self_id, peer, event_id).await;
            });
        }

        Ok(())
    }

    /// Ping every current peer once. Failures are logged and otherwise
    /// ignored; eviction belongs to the cleanup loop alone.
    pub async fn heartbeat_pass(&self) {
        for peer in self.registry.peers() {
            if let Err(e) = self.client.heartbeat(&peer, self.registry.self_id()).await {
                tracing::debug!("heartbeat to {} failed: {}", peer, e);
            }
        }
    }

    /// Evict every peer whose last contact is older than the staleness
    /// window. Works off a snapshot, so one pass sees a consistent view even
    /// while joins and heartbeats keep landing.
    pub fn cleanup_pass(&self) {
        let now = Instant::now();
        for (peer, last_contact) in self.registry.snapshot() {
            let silence = now.duration_since(last_contact);
            if silence > self.timing.stale_after {
                tracing::info!("evicting {}: silent for {:?}", peer, silence);
                self.registry.remove_peer(&peer);
            }
        }
    }

    /// One scan over the pending queue.
    ///
    /// Due entries are attempted once: success drops the entry, failure
    /// bumps its attempt count and reschedules it with exponential backoff.
    /// Entries not yet due carry forward untouched. Peers whose queue
    /// drained are dropped from the map.
    pub async fn retry_pass(&self) {
        let mut pending = self.pending.lock().await;
        let now = Instant::now();

        let peers: Vec<String> = pending.keys().cloned().collect();
        for peer in peers {
            let events = pending.remove(&peer).unwrap_or_default();
            let mut remaining = Vec::with_capacity(events.len());

            for mut event in events {
                if now < event.next_retry {
                    remaining.push(event);
                    continue;
                }

                match self
                    .client
                    .replicate(&peer, self.registry.self_id(), &event.event_id)
                    .await
                {
                    Ok(()) => {
                        tracing::info!(
                            "delivered event {} to {} on retry attempt {}",
                            event.event_id,
                            peer,
                            event.attempt + 1
                        );
                    }
                    Err(e) => {
                        event.attempt += 1;
                        let delay = backoff_delay(&self.timing, event.attempt);
                        event.next_retry = Instant::now() + delay;
                        tracing::debug!(
                            "retry of event {} to {} failed (attempt {}, next in {:?}): {}",
                            event.event_id,
                            peer,
                            event.attempt,
                            delay,
                            e
                        );
                        remaining.push(event);
                    }
                }
            }

            if !remaining.is_empty() {
                pending.insert(peer, remaining);
            }
        }
    }

    /// Heartbeat every peer on a fixed tick. Runs forever; spawn once.
    pub async fn run_heartbeat_loop(&self) {
        let mut interval = tokio::time::interval(self.timing.heartbeat_interval);
        interval.tick().await;
        loop {
            interval.tick().await;
            self.heartbeat_pass().await;
        }
    }

    /// Evict stale peers on a fixed tick. Runs forever; spawn once.
    pub async fn run_cleanup_loop(&self) {
        let mut interval = tokio::time::interval(self.timing.cleanup_interval);
        interval.tick().await;
        loop {
            interval.tick().await;
            self.cleanup_pass();
        }
    }

    /// Work off pending replication events on a fixed tick. Runs forever;
    /// spawn once.
    pub async fn run_retry_loop(&self) {
        let mut interval = tokio::time::interval(self.timing.retry_interval);
        interval.tick().await;
        loop {
            interval.tick().await;
            self.retry_pass().await;
        }
    }
}

/// Initial fan-out delivery of one event to one peer. On failure the event
/// goes on the pending queue with a retry due immediately.
async fn send_or_queue(
    client: Arc<dyn ClusterClient>,
    pending: Arc<Mutex<PendingQueue>>,
    self_id: String,
    peer: String,
    event_id: String,
) {
    if let Err(e) = client.replicate(&peer, &self_id, &event_id).await {
        tracing::warn!("replicating {} to {} failed, queued for retry: {}", event_id, peer, e);
        let mut pending = pending.lock().await;
        pending.entry(peer).or_default().push(PendingEvent {
            event_id,
            attempt: 0,
            next_retry: Instant::now(),
        });
    }
}

/// `min(base * 2^(attempt - 1), max)` for the attempt that just failed.
fn backoff_delay(timing: &ClusterTiming, attempt: u32) -> Duration {
    // Past ~2^7 the cap has long taken over; bound the shift so it can't overflow.
    let exp = attempt.saturating_sub(1).min(16);
    let delay = timing.backoff_base * (1u32 << exp);
    delay.min(timing.backoff_max)
}

use std::collections::HashSet;
use std::sync::Mutex;

struct CounterInner {
    value: i64,
    seen: HashSet<String>,
}

/// A replicated counter with at-most-once application per event id.
///
/// The network delivers increment events at-least-once (the retry loop may
/// redeliver, and peers re-fan-out what they apply), so [`apply`] performs
/// the seen-check and the addition inside one critical section. The seen-set
/// grows without bound; that trade-off keeps deduplication a single lookup.
///
/// [`apply`]: ReplicatedCounter::apply
pub struct ReplicatedCounter {
    inner: Mutex<CounterInner>,
}

impl ReplicatedCounter {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(CounterInner {
                value: 0,
                seen: HashSet::new(),
            }),
        }
    }

    /// Apply `delta` under `event_id`. Returns `false` and leaves the total
    /// untouched if the event was applied before.
    pub fn apply(&self, event_id: &str, delta: i64) -> bool {
        let mut inner = self.inner.lock().unwrap();
        if inner.seen.contains(event_id) {
            return false;
        }
        inner.value += delta;
        inner.seen.insert(event_id.to_string());
        true
    }

    /// Current total.
    pub fn get(&self) -> i64 {
        self.inner.lock().unwrap().value
    }
}

impl Default for ReplicatedCounter {
    fn default() -> Self {
        Self::new()
    }
}

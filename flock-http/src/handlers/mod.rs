use flock::ClusterService;
use std::sync::Arc;

pub mod counter;
pub mod health;
pub mod nodes;

pub struct AppState {
    pub service: Arc<ClusterService>,
}

pub use counter::{count, increment, replicate};
pub use health::health;
pub use nodes::{heartbeat, join, list_peers};

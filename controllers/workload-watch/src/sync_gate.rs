//! Warm-up gate.
//!
//! Every Source replays the full current state as `Added` events right after
//! it connects. The gate stays closed for a fixed warm-up window so that
//! replay does not turn into one notification per existing workload.
//!
//! The window is a wall-clock heuristic: if the replay burst outlasts it,
//! the tail of the replay is reported as real additions.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::time::{Instant, sleep};
use tracing::info;

/// Sleep granularity while waiting for the window to pass.
const TICK: Duration = Duration::from_millis(500);

/// One-way flag: false until the warm-up window has elapsed, then true forever.
///
/// Clones share the same flag. Only `run` ever writes it.
#[derive(Debug, Clone, Default)]
pub struct SyncGate {
    synced: Arc<AtomicBool>,
}

impl SyncGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the warm-up window has passed.
    pub fn is_synced(&self) -> bool {
        self.synced.load(Ordering::Acquire)
    }

    /// Wait out `warmup` in small sleeps, then open the gate.
    pub async fn run(&self, warmup: Duration) {
        let start = Instant::now();
        loop {
            let elapsed = start.elapsed();
            if elapsed >= warmup {
                break;
            }
            sleep(TICK.min(warmup - elapsed)).await;
        }

        self.synced.store(true, Ordering::Release);
        info!("sync-up: warm-up window of {:?} elapsed, notifications enabled", warmup);
    }

    /// Open the gate immediately.
    #[cfg(test)]
    pub fn open(&self) {
        self.synced.store(true, Ordering::Release);
    }
}

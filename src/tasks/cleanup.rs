//! Expiry Sweeper
//!
//! Reclaims expired entries from the in-process store on a fixed cadence.
//! Remote stores expire entries themselves and need no sweeper.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::cache::MemoryStore;

/// Starts the expiry sweeper for `store`.
///
/// Reads already skip expired entries, so a late sweep only delays memory
/// reclamation.
///
/// # Arguments
/// * `store` - The in-process store to sweep
/// * `every_secs` - Sweep period in seconds, raised to at least 1
///
/// # Returns
/// A JoinHandle for the spawned task, aborted during graceful shutdown.
pub fn spawn_cleanup_task(store: Arc<MemoryStore>, every_secs: u64) -> JoinHandle<()> {
    let period = Duration::from_secs(every_secs.max(1));

    tokio::spawn(async move {
        info!(period_secs = period.as_secs(), "expiry sweeper started");

        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let removed = store.cleanup_expired().await;
            if removed == 0 {
                debug!("expiry sweep: nothing to reclaim");
                continue;
            }
            let remaining = store.len().await;
            info!(removed, remaining, "expiry sweep");
        }
    })
}

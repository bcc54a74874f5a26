//! Per-owner exclusivity.

use super::errors::{TrackError, TrackResult};
use std::{collections::HashMap, sync::Arc, time::Duration};
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Held while one update for an owner is in flight
pub type OwnerGuard = OwnedMutexGuard<()>;

/// Keyed async locks serialising updates per owner.
///
/// Updates for different owners never contend. A waiter gives up after a
/// bounded wait instead of queueing forever behind a stalled update.
#[derive(Default)]
pub struct OwnerGate {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl OwnerGate {
    /// Create an empty gate
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait up to `wait` for exclusive access to `owner_id`
    ///
    /// # Errors
    ///
    /// * `TrackError::Busy` - The owner stayed locked for the whole wait
    pub async fn acquire(&self, owner_id: &str, wait: Duration) -> TrackResult<OwnerGuard> {
        let lock = {
            let mut locks = self.locks.lock().await;
            // Drop locks nobody holds or waits on
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks.entry(owner_id.to_string()).or_default().clone()
        };

        tokio::time::timeout(wait, lock.lock_owned())
            .await
            .map_err(|_| {
                log::warn!("Gave up waiting {wait:?} for owner {owner_id}");
                TrackError::Busy {
                    owner: owner_id.to_string(),
                    waited: wait,
                }
            })
    }

    /// Number of owners currently locked or awaited
    pub async fn active(&self) -> usize {
        self.locks
            .lock()
            .await
            .values()
            .filter(|lock| Arc::strong_count(lock) > 1)
            .count()
    }
}

//! Pool store trait for dependency injection.

use super::{errors::StoreResult, models::RemotePoolId};
use crate::pool::{CardEntry, CardList};
use async_trait::async_trait;

/// Access to the pool-hosting service
#[async_trait]
pub trait PoolStore: Send + Sync {
    /// Fetch the union of a pool's sideboard, deck and hidden partitions
    ///
    /// # Errors
    ///
    /// * `StoreError::NotFound` - The id does not resolve
    /// * `StoreError::Unavailable` - Retries exhausted
    async fn fetch_pool(&self, id: &RemotePoolId) -> StoreResult<CardList>;

    /// Publish `entries` as a sideboard addition, optionally extending `base`
    ///
    /// Every success mints a new pool on the remote service.
    ///
    /// # Errors
    ///
    /// * `StoreError::Rejected` - The service refused the request
    /// * `StoreError::Unavailable` - Retries exhausted or no usable id returned
    async fn create_or_extend_pool(
        &self,
        entries: &[CardEntry],
        base: Option<&RemotePoolId>,
    ) -> StoreResult<RemotePoolId>;

    /// Public link for a pool id
    fn pool_link(&self, id: &RemotePoolId) -> String;
}

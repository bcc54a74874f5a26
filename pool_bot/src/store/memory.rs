//! In-process pool store for tests and dry runs.

use super::{
    errors::{StoreError, StoreResult},
    models::RemotePoolId,
    repository::PoolStore,
};
use crate::pool::{CardEntry, CardList, merge};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use tokio::sync::Mutex;

/// A publish call observed by the in-memory store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Publication {
    pub id: RemotePoolId,
    pub entries: CardList,
    pub base: Option<RemotePoolId>,
}

#[derive(Default)]
struct StoreState {
    pools: HashMap<RemotePoolId, CardList>,
    unavailable: HashSet<RemotePoolId>,
    publications: Vec<Publication>,
    publish_budget: Option<usize>,
    next_id: u64,
}

/// Pool store holding pools in memory.
///
/// Extending a pool stores the merge of the base pool and the new entries,
/// the way the hosted service presents an extended pool.
pub struct InMemoryPoolStore {
    state: Mutex<StoreState>,
    link_base: String,
}

impl InMemoryPoolStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            state: Mutex::new(StoreState::default()),
            link_base: "https://sealeddeck.tech".to_string(),
        }
    }

    /// Seed a pool under a fixed id
    pub async fn insert_pool(&self, id: &str, cards: CardList) {
        self.state
            .lock()
            .await
            .pools
            .insert(RemotePoolId::new(id), cards);
    }

    /// Make fetches of `id` fail as if the service were down
    pub async fn mark_unavailable(&self, id: &str) {
        self.state
            .lock()
            .await
            .unavailable
            .insert(RemotePoolId::new(id));
    }

    /// Allow only `count` more successful publishes; later ones fail
    pub async fn fail_publishes_after(&self, count: usize) {
        self.state.lock().await.publish_budget = Some(count);
    }

    /// Every successful publish so far, in order
    pub async fn publications(&self) -> Vec<Publication> {
        self.state.lock().await.publications.clone()
    }

    /// Stored contents of a pool, if present
    pub async fn pool(&self, id: &RemotePoolId) -> Option<CardList> {
        self.state.lock().await.pools.get(id).cloned()
    }
}

impl Default for InMemoryPoolStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PoolStore for InMemoryPoolStore {
    async fn fetch_pool(&self, id: &RemotePoolId) -> StoreResult<CardList> {
        let state = self.state.lock().await;
        if state.unavailable.contains(id) {
            return Err(StoreError::Unavailable {
                attempts: 3,
                reason: "marked unavailable".to_string(),
            });
        }
        state
            .pools
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    async fn create_or_extend_pool(
        &self,
        entries: &[CardEntry],
        base: Option<&RemotePoolId>,
    ) -> StoreResult<RemotePoolId> {
        let mut state = self.state.lock().await;

        if let Some(budget) = state.publish_budget.as_mut() {
            if *budget == 0 {
                return Err(StoreError::Unavailable {
                    attempts: 3,
                    reason: "publish budget exhausted".to_string(),
                });
            }
            *budget -= 1;
        }

        let contents = match base {
            Some(base_id) => {
                let existing = state
                    .pools
                    .get(base_id)
                    .ok_or_else(|| StoreError::Rejected {
                        status: 404,
                        body: format!("unknown pool {base_id}"),
                    })?;
                merge(&[existing.as_slice(), entries])
            }
            None => entries.to_vec(),
        };

        state.next_id += 1;
        let id = RemotePoolId::new(format!("mem{:04}", state.next_id));
        state.pools.insert(id.clone(), contents);
        state.publications.push(Publication {
            id: id.clone(),
            entries: entries.to_vec(),
            base: base.cloned(),
        });

        Ok(id)
    }

    fn pool_link(&self, id: &RemotePoolId) -> String {
        id.link(&self.link_base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_extend_merges_base() {
        let store = InMemoryPoolStore::new();
        store
            .insert_pool("start", vec![CardEntry::new("Island", 1)])
            .await;

        let id = store
            .create_or_extend_pool(
                &[CardEntry::new("Island", 1)],
                Some(&RemotePoolId::new("start")),
            )
            .await
            .unwrap();

        assert_eq!(
            store.fetch_pool(&id).await.unwrap(),
            vec![CardEntry::new("Island", 2)]
        );
    }

    #[tokio::test]
    async fn test_publish_budget() {
        let store = InMemoryPoolStore::new();
        store.fail_publishes_after(1).await;

        assert!(store.create_or_extend_pool(&[], None).await.is_ok());
        let err = store.create_or_extend_pool(&[], None).await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable { .. }));
        assert_eq!(store.publications().await.len(), 1);
    }

    #[tokio::test]
    async fn test_unavailable_and_missing() {
        let store = InMemoryPoolStore::new();
        store.insert_pool("down", vec![]).await;
        store.mark_unavailable("down").await;

        assert!(matches!(
            store.fetch_pool(&RemotePoolId::new("down")).await,
            Err(StoreError::Unavailable { .. })
        ));
        assert!(matches!(
            store.fetch_pool(&RemotePoolId::new("nope")).await,
            Err(StoreError::NotFound(_))
        ));
    }
}

//! Change-log replay.
//!
//! A player's pool is never read back from the "current pool" cell. It is
//! recomputed from the append-only change log: pack additions and removals
//! pick which packs count, and card edits adjust single-card counts on top.
//!
//! Unresolvable packs are skipped so that one bad reference does not block
//! the rest of the pool.
//!
//! ## Example
//!
//! ```
//! use pool_bot::ledger::{ChangeOperation, ChangeRecord};
//! use pool_bot::pool::CardEntry;
//! use pool_bot::reconcile::replay;
//! use pool_bot::store::InMemoryPoolStore;
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = InMemoryPoolStore::new();
//!     store.insert_pool("pool1", vec![CardEntry::new("Island", 1)]).await;
//!
//!     let log = vec![
//!         ChangeRecord::new("Sawyer", ChangeOperation::AddPack, "pool1"),
//!         ChangeRecord::new("Sawyer", ChangeOperation::AddCard, "Opt"),
//!     ];
//!     let pool = replay(&log, "Sawyer", &store).await;
//!     assert_eq!(pool, vec![CardEntry::new("Island", 1), CardEntry::new("Opt", 1)]);
//! }
//! ```

use crate::{
    ledger::{ChangeOperation, ChangeRecord},
    pool::{CardList, Tally},
    store::{PoolStore, RemotePoolId},
};
use futures_util::future::join_all;

/// Outcome of folding a change log, before any pack is fetched
#[derive(Debug, Clone, Default)]
pub struct ReplayPlan {
    /// Packs still included, in the order they were added
    pub packs: Vec<RemotePoolId>,

    /// Net single-card edits; counts may be negative
    pub cards: Tally,
}

/// Fold the change log of one player.
///
/// Records of other players are ignored. A `remove pack` drops the earliest
/// matching addition and does nothing when there is none.
///
/// # Arguments
///
/// * `changes` - Change log in chronological order
/// * `player` - Player display name, compared exactly
///
/// # Returns
///
/// * `ReplayPlan` - Included packs and net card edits
pub fn plan<'a, I>(changes: I, player: &str) -> ReplayPlan
where
    I: IntoIterator<Item = &'a ChangeRecord>,
{
    let mut plan = ReplayPlan::default();

    for record in changes
        .into_iter()
        .filter(|record| record.player_name == player)
    {
        match record.operation {
            ChangeOperation::AddPack => match RemotePoolId::from_reference(&record.value) {
                Ok(id) => plan.packs.push(id),
                Err(e) => log::warn!("Ignoring pack addition for {player}: {e}"),
            },
            ChangeOperation::RemovePack => {
                let target = RemotePoolId::from_reference(&record.value).ok();
                match plan
                    .packs
                    .iter()
                    .position(|id| Some(id) == target.as_ref())
                {
                    Some(index) => {
                        plan.packs.remove(index);
                    }
                    None => log::debug!(
                        "Removal of pack {:?} for {player} matched nothing",
                        record.value
                    ),
                }
            }
            ChangeOperation::AddCard => plan.cards.add(record.value.trim(), 1),
            ChangeOperation::RemoveCard => plan.cards.add(record.value.trim(), -1),
        }
    }

    plan
}

/// Fetch every planned pack concurrently and merge in the card edits.
///
/// Packs that cannot be fetched contribute nothing.
pub async fn resolve(plan: ReplayPlan, store: &dyn PoolStore) -> CardList {
    let fetched = join_all(plan.packs.iter().map(|id| store.fetch_pool(id))).await;

    let mut pool = Tally::new();
    for (id, result) in plan.packs.iter().zip(fetched) {
        match result {
            Ok(cards) => pool.extend(&cards, 1),
            Err(e) => log::warn!("Skipping pack {id} during replay: {e}"),
        }
    }
    for (name, delta) in plan.cards.iter() {
        pool.add(name, delta);
    }

    pool.into_list()
}

/// Recompute a player's pool from the change log.
///
/// # Arguments
///
/// * `changes` - Change log in chronological order
/// * `player` - Player display name
/// * `store` - Pool store used to resolve pack ids
///
/// # Returns
///
/// * `CardList` - Pool contents, positive counts only
pub async fn replay(changes: &[ChangeRecord], player: &str, store: &dyn PoolStore) -> CardList {
    resolve(plan(changes, player), store).await
}

//! Pack tracker implementation.

use super::{
    coalescer::{Coalesced, DoublePackCoalescer},
    errors::{TrackError, TrackResult},
    gate::OwnerGate,
    models::{CardEdit, PackEvent, PackSource, PoolUpdate, TrackOutcome, TrackedPack, TrackerConfig},
    owner::mentioned_owner,
};
use crate::{
    ledger::{ChangeOperation, ChangeRecord, Ledger, PlayerRecord},
    pool::{CardEntry, CardList, decode, extract_code_block, merge, total_cards},
    reconcile::replay,
    store::{PoolStore, RemotePoolId},
};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Pack tracker
///
/// Every update runs under the owner's gate and ends by publishing a pool
/// rebuilt from the starting pool plus the full change log. The ledger is
/// only written once every publish has succeeded.
#[derive(Clone)]
pub struct PackTracker {
    store: Arc<dyn PoolStore>,
    ledger: Arc<dyn Ledger>,
    gate: Arc<OwnerGate>,
    double_packs: Arc<Mutex<DoublePackCoalescer>>,
    config: TrackerConfig,
}

impl PackTracker {
    /// Create a new pack tracker
    ///
    /// # Arguments
    ///
    /// * `store` - Pool-hosting service
    /// * `ledger` - Player rows and change log
    /// * `config` - Tracker settings
    ///
    /// # Returns
    ///
    /// * `PackTracker` - New tracker instance
    pub fn new(store: Arc<dyn PoolStore>, ledger: Arc<dyn Ledger>, config: TrackerConfig) -> Self {
        Self {
            store,
            ledger,
            gate: Arc::new(OwnerGate::new()),
            double_packs: Arc::new(Mutex::new(DoublePackCoalescer::new())),
            config,
        }
    }

    /// Track a newly generated pack
    ///
    /// Resolves the owner from the mention in the referenced message,
    /// decodes the pack, publishes it on its own, then publishes the owner's
    /// rebuilt pool and records both in the ledger. When a double pack is
    /// open for the owner, the first half only returns `Pending`.
    ///
    /// # Arguments
    ///
    /// * `event` - Owner message and pack source
    ///
    /// # Returns
    ///
    /// * `TrackResult<TrackOutcome>` - Tracked pack, or pending first half
    ///
    /// # Errors
    ///
    /// * `TrackError::MissingOwnerMention` / `TrackError::OwnerNotFound` - No owner row
    /// * `TrackError::Format` - Pack text is malformed
    /// * `TrackError::PoolService` - A publish failed; nothing was written
    /// * `TrackError::Busy` - The owner is locked by another update
    pub async fn track_pack(&self, event: &PackEvent) -> TrackResult<TrackOutcome> {
        let owner_id =
            mentioned_owner(&event.owner_message).ok_or(TrackError::MissingOwnerMention)?;
        let _guard = self.gate.acquire(&owner_id, self.config.lock_timeout).await?;
        let player = self.resolve_player(&owner_id).await?;

        let result = self.track_for(&player, &event.source).await;
        self.flag_on_failure(&player, result).await
    }

    /// Record a player's sealed starting pool
    ///
    /// The link is written to both the starting and current pool cells.
    ///
    /// # Errors
    ///
    /// * `TrackError::OwnerNotFound` - No row for `owner_id`
    /// * `TrackError::InvalidReference` - `reference` is not a pool link or id
    pub async fn track_starting_pool(
        &self,
        owner_id: &str,
        reference: &str,
    ) -> TrackResult<PoolUpdate> {
        let _guard = self.gate.acquire(owner_id, self.config.lock_timeout).await?;
        let player = self.resolve_player(owner_id).await?;

        let pool_id = parse_reference(reference)?;
        let pool_link = self.store.pool_link(&pool_id);
        self.ledger
            .set_starting_pool(player.row, &pool_link)
            .await?;
        self.ledger.set_current_pool(player.row, &pool_link).await?;

        log::info!("Recorded starting pool {pool_id} for {}", player.name);
        Ok(PoolUpdate {
            player_name: player.name,
            pool_id,
            pool_link,
        })
    }

    /// Add or remove a single card from a player's pool
    ///
    /// # Errors
    ///
    /// * `TrackError::EmptyCardName` - `card` is blank
    /// * `TrackError::PoolService` - The rebuilt pool could not be published
    pub async fn record_card_change(
        &self,
        owner_id: &str,
        edit: CardEdit,
        card: &str,
    ) -> TrackResult<PoolUpdate> {
        let card = card.trim();
        if card.is_empty() {
            return Err(TrackError::EmptyCardName);
        }

        let _guard = self.gate.acquire(owner_id, self.config.lock_timeout).await?;
        let player = self.resolve_player(owner_id).await?;

        let record = ChangeRecord::new(&player.name, edit.operation(), card);
        let result = self.rebuild_for(&player, Some(record)).await;
        self.flag_on_failure(&player, result).await
    }

    /// Drop a previously tracked pack from a player's pool
    ///
    /// Removing a pack that was never added changes nothing but is still
    /// recorded.
    ///
    /// # Errors
    ///
    /// * `TrackError::InvalidReference` - `pack` is not a pool link or id
    /// * `TrackError::PoolService` - The rebuilt pool could not be published
    pub async fn remove_pack(&self, owner_id: &str, pack: &str) -> TrackResult<PoolUpdate> {
        let pack_id = parse_reference(pack)?;

        let _guard = self.gate.acquire(owner_id, self.config.lock_timeout).await?;
        let player = self.resolve_player(owner_id).await?;

        let record = ChangeRecord::new(&player.name, ChangeOperation::RemovePack, pack_id.as_str());
        let result = self.rebuild_for(&player, Some(record)).await;
        self.flag_on_failure(&player, result).await
    }

    /// Recompute and republish a player's pool from the change log
    ///
    /// # Errors
    ///
    /// * `TrackError::MissingStartingPool` - Nothing to anchor the pool on
    /// * `TrackError::PoolService` - The rebuilt pool could not be published
    pub async fn rebuild_pool(&self, owner_id: &str) -> TrackResult<PoolUpdate> {
        let _guard = self.gate.acquire(owner_id, self.config.lock_timeout).await?;
        let player = self.resolve_player(owner_id).await?;

        let result = self.rebuild_for(&player, None).await;
        self.flag_on_failure(&player, result).await
    }

    /// Replay a player's change log without publishing anything
    ///
    /// The result covers tracked packs and card edits, not the starting pool.
    pub async fn current_pool(&self, owner_id: &str) -> TrackResult<CardList> {
        let player = self.resolve_player(owner_id).await?;
        let changes = self.ledger.changes().await?;
        Ok(replay(&changes, &player.name, self.store.as_ref()).await)
    }

    /// Publish a pack as an extension of an arbitrary pool
    ///
    /// Touches no ledger state.
    ///
    /// # Returns
    ///
    /// * `TrackResult<RemotePoolId>` - Id of the extended pool
    pub async fn add_pack_to_pool(
        &self,
        pack_text: &str,
        pool_reference: &str,
    ) -> TrackResult<RemotePoolId> {
        let base = parse_reference(pool_reference)?;
        let pack = decode_inline(pack_text)?;

        let pool_id = self
            .store
            .create_or_extend_pool(&pack, Some(&base))
            .await
            .map_err(TrackError::PoolService)?;
        log::info!("Extended pool {base} with {} card(s) as {pool_id}", total_cards(&pack));
        Ok(pool_id)
    }

    /// Expect the next two packs of `owner_id` to arrive as one double pack
    pub async fn expect_double_pack(&self, owner_id: &str) {
        self.double_packs.lock().await.open(owner_id);
        log::info!("Expecting a double pack for owner {owner_id}");
    }

    /// Number of double packs still waiting for a half
    pub async fn pending_double_packs(&self) -> usize {
        self.double_packs.lock().await.pending_count()
    }

    /// Public link for a pool id
    pub fn pool_link(&self, id: &RemotePoolId) -> String {
        self.store.pool_link(id)
    }

    async fn resolve_player(&self, owner_id: &str) -> TrackResult<PlayerRecord> {
        self.ledger
            .find_player(owner_id)
            .await?
            .ok_or_else(|| {
                log::info!("No pool row for owner {owner_id}");
                TrackError::OwnerNotFound(owner_id.to_string())
            })
    }

    async fn track_for(
        &self,
        player: &PlayerRecord,
        source: &PackSource,
    ) -> TrackResult<TrackOutcome> {
        let starting = starting_pool(player)?;
        let pack = self.decode_pack(source).await?;

        let pack = {
            let mut double_packs = self.double_packs.lock().await;
            if double_packs.is_open(&player.owner_id) {
                match double_packs.submit(&player.owner_id, pack) {
                    Coalesced::Pending => {
                        log::info!("Holding first half of a double pack for {}", player.name);
                        return Ok(TrackOutcome::Pending {
                            owner_id: player.owner_id.clone(),
                        });
                    }
                    Coalesced::Ready(merged) => merged,
                }
            } else {
                pack
            }
        };

        let pack_id = self
            .store
            .create_or_extend_pool(&pack, None)
            .await
            .map_err(TrackError::PoolService)?;

        let changes = self.ledger.changes().await?;
        let replayed = replay(&changes, &player.name, self.store.as_ref()).await;
        let pool_id = self
            .publish_pool(&merge(&[&replayed, &pack]), &starting)
            .await?;
        let pool_link = self.store.pool_link(&pool_id);

        self.ledger
            .append_change(&ChangeRecord::new(
                &player.name,
                ChangeOperation::AddPack,
                pack_id.as_str(),
            ))
            .await?;
        self.ledger.set_current_pool(player.row, &pool_link).await?;

        log::info!(
            "Tracked pack {pack_id} for {}; pool is now {pool_id}",
            player.name
        );
        Ok(TrackOutcome::Tracked(TrackedPack {
            owner_id: player.owner_id.clone(),
            player_name: player.name.clone(),
            pack_link: self.store.pool_link(&pack_id),
            pack_id,
            pool_id,
            pool_link,
            card_count: total_cards(&pack),
        }))
    }

    /// Rebuild with an optional new record, appending it only after publish
    async fn rebuild_for(
        &self,
        player: &PlayerRecord,
        record: Option<ChangeRecord>,
    ) -> TrackResult<PoolUpdate> {
        let starting = starting_pool(player)?;

        let mut changes = self.ledger.changes().await?;
        let appended = record.is_some();
        changes.extend(record);

        let pool = replay(&changes, &player.name, self.store.as_ref()).await;
        let pool_id = self.publish_pool(&pool, &starting).await?;
        let pool_link = self.store.pool_link(&pool_id);

        if let Some(record) = changes.last().filter(|_| appended) {
            self.ledger.append_change(record).await?;
        }
        self.ledger.set_current_pool(player.row, &pool_link).await?;

        log::info!("Rebuilt pool for {} as {pool_id}", player.name);
        Ok(PoolUpdate {
            player_name: player.name.clone(),
            pool_id,
            pool_link,
        })
    }

    async fn decode_pack(&self, source: &PackSource) -> TrackResult<CardList> {
        match source {
            PackSource::Inline(text) => decode_inline(text),
            PackSource::Remote(id) => {
                let pack = self
                    .store
                    .fetch_pool(id)
                    .await
                    .map_err(TrackError::PackUnresolved)?;
                non_empty(pack)
            }
        }
    }

    async fn publish_pool(
        &self,
        pool: &[CardEntry],
        starting: &RemotePoolId,
    ) -> TrackResult<RemotePoolId> {
        self.store
            .create_or_extend_pool(pool, Some(starting))
            .await
            .map_err(TrackError::PoolService)
    }

    async fn flag_on_failure<T>(
        &self,
        player: &PlayerRecord,
        result: TrackResult<T>,
    ) -> TrackResult<T> {
        if let Err(e) = &result {
            log::error!("Pool update for {} failed: {e}", player.name);
            if let Err(flag_error) = self.ledger.flag_current_pool(player.row).await {
                log::error!(
                    "Could not flag row {} for {}: {flag_error}",
                    player.row,
                    player.name
                );
            }
        }
        result
    }
}

fn parse_reference(reference: &str) -> TrackResult<RemotePoolId> {
    RemotePoolId::from_reference(reference)
        .map_err(|_| TrackError::InvalidReference(reference.to_string()))
}

fn starting_pool(player: &PlayerRecord) -> TrackResult<RemotePoolId> {
    let reference = player
        .starting_pool
        .as_deref()
        .ok_or_else(|| TrackError::MissingStartingPool(player.name.clone()))?;
    parse_reference(reference)
}

fn decode_inline(text: &str) -> TrackResult<CardList> {
    let body = extract_code_block(text).unwrap_or(text);
    non_empty(decode(body)?)
}

fn non_empty(pack: CardList) -> TrackResult<CardList> {
    if pack.is_empty() {
        return Err(TrackError::EmptyPack);
    }
    Ok(pack)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ledger::InMemoryLedger, store::InMemoryPoolStore};
    use std::time::Duration;

    fn player(owner_id: &str, name: &str, row: u32, starting: Option<&str>) -> PlayerRecord {
        PlayerRecord {
            row,
            owner_id: owner_id.to_string(),
            name: name.to_string(),
            current_pool: starting.map(str::to_string),
            starting_pool: starting.map(str::to_string),
        }
    }

    async fn setup() -> (PackTracker, Arc<InMemoryPoolStore>, Arc<InMemoryLedger>) {
        let store = Arc::new(InMemoryPoolStore::new());
        store
            .insert_pool("start1", vec![CardEntry::new("Plains", 10)])
            .await;
        let ledger = Arc::new(InMemoryLedger::new(vec![
            player("111", "Ana", 7, Some("https://sealeddeck.tech/start1")),
            player("222", "Bo", 8, None),
        ]));
        let tracker = PackTracker::new(
            store.clone(),
            ledger.clone(),
            TrackerConfig {
                lock_timeout: Duration::from_millis(100),
            },
        );
        (tracker, store, ledger)
    }

    fn inline(owner: &str, text: &str) -> PackEvent {
        PackEvent {
            owner_message: format!("<@{owner}> opened a pack"),
            source: PackSource::Inline(text.to_string()),
        }
    }

    #[tokio::test]
    async fn test_track_pack_publishes_and_records() {
        let (tracker, store, ledger) = setup().await;

        let outcome = tracker
            .track_pack(&inline("111", "```\n2 Opt (XLN)\n1 Shock (M19)\n```"))
            .await
            .unwrap();

        let TrackOutcome::Tracked(tracked) = outcome else {
            panic!("expected a tracked pack");
        };
        assert_eq!(tracked.card_count, 3);
        assert_eq!(tracked.player_name, "Ana");

        let publications = store.publications().await;
        assert_eq!(publications.len(), 2);
        assert_eq!(publications[0].base, None);
        assert_eq!(publications[1].base, Some(RemotePoolId::new("start1")));

        let changes = ledger.changes().await.unwrap();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].operation, ChangeOperation::AddPack);
        assert_eq!(changes[0].value, tracked.pack_id.as_str());

        let row = ledger.find_player("111").await.unwrap().unwrap();
        assert_eq!(row.current_pool.as_deref(), Some(tracked.pool_link.as_str()));
        assert!(ledger.flagged_rows().await.is_empty());
    }

    #[tokio::test]
    async fn test_missing_mention() {
        let (tracker, _, _) = setup().await;
        let event = PackEvent {
            owner_message: "no mention here".to_string(),
            source: PackSource::Inline("1 Opt".to_string()),
        };
        assert!(matches!(
            tracker.track_pack(&event).await,
            Err(TrackError::MissingOwnerMention)
        ));
    }

    #[tokio::test]
    async fn test_missing_starting_pool_flags_row() {
        let (tracker, store, ledger) = setup().await;

        let err = tracker.track_pack(&inline("222", "1 Opt")).await.unwrap_err();
        assert!(matches!(err, TrackError::MissingStartingPool(ref name) if name == "Bo"));
        assert!(store.publications().await.is_empty());
        assert_eq!(ledger.flagged_rows().await, vec![8]);
    }

    #[tokio::test]
    async fn test_empty_pack_rejected() {
        let (tracker, store, _) = setup().await;
        let err = tracker.track_pack(&inline("111", "```\n\n```")).await.unwrap_err();
        assert!(matches!(err, TrackError::EmptyPack));
        assert!(store.publications().await.is_empty());
    }

    #[tokio::test]
    async fn test_record_card_change_rejects_blank_card() {
        let (tracker, _, _) = setup().await;
        assert!(matches!(
            tracker.record_card_change("111", CardEdit::Add, "  ").await,
            Err(TrackError::EmptyCardName)
        ));
    }

    #[tokio::test]
    async fn test_rebuild_without_new_record_appends_nothing() {
        let (tracker, _, ledger) = setup().await;
        let update = tracker.rebuild_pool("111").await.unwrap();

        assert!(ledger.changes().await.unwrap().is_empty());
        let row = ledger.find_player("111").await.unwrap().unwrap();
        assert_eq!(row.current_pool, Some(update.pool_link));
    }

    #[tokio::test]
    async fn test_add_pack_to_pool_leaves_ledger_alone() {
        let (tracker, store, ledger) = setup().await;

        let pool_id = tracker
            .add_pack_to_pool("```\n1 Opt (XLN)\n```", "`start1`")
            .await
            .unwrap();

        let pool = store.pool(&pool_id).await.unwrap();
        assert_eq!(
            pool,
            vec![CardEntry::new("Plains", 10), CardEntry::new("Opt", 1)]
        );
        assert!(ledger.cell_writes().await.is_empty());
    }

    #[tokio::test]
    async fn test_busy_owner() {
        let (tracker, _, _) = setup().await;
        let _held = tracker
            .gate
            .acquire("111", Duration::from_millis(100))
            .await
            .unwrap();

        assert!(matches!(
            tracker.rebuild_pool("111").await,
            Err(TrackError::Busy { .. })
        ));
    }
}

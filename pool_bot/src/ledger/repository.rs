//! Ledger trait for testability and dependency injection.

use super::{
    errors::LedgerResult,
    models::{ChangeRecord, PlayerRecord},
};
use async_trait::async_trait;

/// Player rows and change log of the league spreadsheet
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Read every player row
    async fn players(&self) -> LedgerResult<Vec<PlayerRecord>>;

    /// Find a player by chat identity id
    async fn find_player(&self, owner_id: &str) -> LedgerResult<Option<PlayerRecord>> {
        Ok(self
            .players()
            .await?
            .into_iter()
            .find(|player| player.owner_id == owner_id))
    }

    /// Read the whole change log in chronological order
    async fn changes(&self) -> LedgerResult<Vec<ChangeRecord>>;

    /// Append one record to the change log
    async fn append_change(&self, record: &ChangeRecord) -> LedgerResult<()>;

    /// Write the current-pool cell of a player row
    async fn set_current_pool(&self, row: u32, reference: &str) -> LedgerResult<()>;

    /// Write the starting-pool cell of a player row
    async fn set_starting_pool(&self, row: u32, reference: &str) -> LedgerResult<()>;

    /// Paint the current-pool cell of a row red for human follow-up
    async fn flag_current_pool(&self, row: u32) -> LedgerResult<()>;

    /// Check that the ledger is reachable
    async fn health_check(&self) -> LedgerResult<()>;
}

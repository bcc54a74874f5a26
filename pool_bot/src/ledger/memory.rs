//! In-process ledger for tests and dry runs.

use super::{
    errors::{LedgerError, LedgerResult},
    models::{ChangeRecord, PlayerRecord},
    repository::Ledger,
    schema::PoolsField,
};
use async_trait::async_trait;
use tokio::sync::Mutex;

/// A value written into a pools cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellWrite {
    pub row: u32,
    pub field: PoolsField,
    pub value: String,
}

#[derive(Default)]
struct LedgerState {
    players: Vec<PlayerRecord>,
    changes: Vec<ChangeRecord>,
    writes: Vec<CellWrite>,
    flagged: Vec<u32>,
}

/// Ledger kept entirely in memory
#[derive(Default)]
pub struct InMemoryLedger {
    state: Mutex<LedgerState>,
}

impl InMemoryLedger {
    /// Create a ledger with the given player rows and an empty change log
    pub fn new(players: Vec<PlayerRecord>) -> Self {
        Self {
            state: Mutex::new(LedgerState {
                players,
                ..Default::default()
            }),
        }
    }

    /// Replace the change log wholesale
    pub async fn seed_changes(&self, changes: Vec<ChangeRecord>) {
        self.state.lock().await.changes = changes;
    }

    /// Every cell write so far, in order
    pub async fn cell_writes(&self) -> Vec<CellWrite> {
        self.state.lock().await.writes.clone()
    }

    /// Rows flagged for human follow-up
    pub async fn flagged_rows(&self) -> Vec<u32> {
        self.state.lock().await.flagged.clone()
    }

    async fn write_cell(&self, row: u32, field: PoolsField, value: &str) -> LedgerResult<()> {
        let mut state = self.state.lock().await;
        let player = state
            .players
            .iter_mut()
            .find(|player| player.row == row)
            .ok_or(LedgerError::RowNotFound(row))?;

        match field {
            PoolsField::CurrentPool => player.current_pool = Some(value.to_string()),
            PoolsField::StartingPool => player.starting_pool = Some(value.to_string()),
            PoolsField::OwnerId => player.owner_id = value.to_string(),
            PoolsField::Name => player.name = value.to_string(),
        }

        state.writes.push(CellWrite {
            row,
            field,
            value: value.to_string(),
        });
        Ok(())
    }
}

#[async_trait]
impl Ledger for InMemoryLedger {
    async fn players(&self) -> LedgerResult<Vec<PlayerRecord>> {
        Ok(self.state.lock().await.players.clone())
    }

    async fn changes(&self) -> LedgerResult<Vec<ChangeRecord>> {
        Ok(self.state.lock().await.changes.clone())
    }

    async fn append_change(&self, record: &ChangeRecord) -> LedgerResult<()> {
        self.state.lock().await.changes.push(record.clone());
        Ok(())
    }

    async fn set_current_pool(&self, row: u32, reference: &str) -> LedgerResult<()> {
        self.write_cell(row, PoolsField::CurrentPool, reference).await
    }

    async fn set_starting_pool(&self, row: u32, reference: &str) -> LedgerResult<()> {
        self.write_cell(row, PoolsField::StartingPool, reference).await
    }

    async fn flag_current_pool(&self, row: u32) -> LedgerResult<()> {
        self.state.lock().await.flagged.push(row);
        Ok(())
    }

    async fn health_check(&self) -> LedgerResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::ChangeOperation;

    fn player(row: u32, owner_id: &str, name: &str) -> PlayerRecord {
        PlayerRecord {
            row,
            owner_id: owner_id.to_string(),
            name: name.to_string(),
            current_pool: None,
            starting_pool: None,
        }
    }

    #[tokio::test]
    async fn test_find_player_by_owner_id() {
        let ledger = InMemoryLedger::new(vec![player(7, "111", "Ana"), player(8, "222", "Bo")]);

        let found = ledger.find_player("222").await.unwrap().unwrap();
        assert_eq!(found.name, "Bo");
        assert!(ledger.find_player("333").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_cell_writes_update_rows() {
        let ledger = InMemoryLedger::new(vec![player(7, "111", "Ana")]);
        ledger.set_current_pool(7, "link").await.unwrap();

        let found = ledger.find_player("111").await.unwrap().unwrap();
        assert_eq!(found.current_pool.as_deref(), Some("link"));
        assert_eq!(ledger.cell_writes().await.len(), 1);

        let err = ledger.set_starting_pool(99, "link").await.unwrap_err();
        assert!(matches!(err, LedgerError::RowNotFound(99)));
    }

    #[tokio::test]
    async fn test_append_change_keeps_order() {
        let ledger = InMemoryLedger::default();
        ledger
            .append_change(&ChangeRecord::new("Ana", ChangeOperation::AddPack, "p1"))
            .await
            .unwrap();
        ledger
            .append_change(&ChangeRecord::new("Ana", ChangeOperation::AddCard, "Opt"))
            .await
            .unwrap();

        let changes = ledger.changes().await.unwrap();
        assert_eq!(changes[0].value, "p1");
        assert_eq!(changes[1].operation, ChangeOperation::AddCard);
    }
}

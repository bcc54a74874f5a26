//! Ledger data models.

use super::errors::LedgerError;
use chrono::{NaiveDateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Timestamp layout written to the change log
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Pool-affecting operation recorded in the change log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeOperation {
    AddPack,
    RemovePack,
    AddCard,
    RemoveCard,
}

impl ChangeOperation {
    /// Ledger spelling of the operation
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeOperation::AddPack => "add pack",
            ChangeOperation::RemovePack => "remove pack",
            ChangeOperation::AddCard => "add card",
            ChangeOperation::RemoveCard => "remove card",
        }
    }
}

impl fmt::Display for ChangeOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChangeOperation {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "add pack" => Ok(ChangeOperation::AddPack),
            "remove pack" => Ok(ChangeOperation::RemovePack),
            "add card" => Ok(ChangeOperation::AddCard),
            "remove card" => Ok(ChangeOperation::RemoveCard),
            _ => Err(LedgerError::UnknownOperation(s.to_string())),
        }
    }
}

/// One row of the change log.
///
/// `value` is a pool id for pack operations and a card name for card
/// operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub timestamp: Option<NaiveDateTime>,
    pub player_name: String,
    pub operation: ChangeOperation,
    pub value: String,
}

impl ChangeRecord {
    /// Create a record stamped with the current time
    pub fn new(player_name: &str, operation: ChangeOperation, value: &str) -> Self {
        Self {
            timestamp: Some(Utc::now().naive_utc().trunc_subsecs(6)),
            player_name: player_name.to_string(),
            operation,
            value: value.to_string(),
        }
    }

    /// Timestamp in ledger format, empty when unknown
    pub fn timestamp_cell(&self) -> String {
        self.timestamp
            .map(|ts| ts.format(TIMESTAMP_FORMAT).to_string())
            .unwrap_or_default()
    }
}

/// Parse a ledger timestamp cell, tolerating rows humans typed in
pub fn parse_timestamp(cell: &str) -> Option<NaiveDateTime> {
    let cell = cell.trim();
    NaiveDateTime::parse_from_str(cell, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(cell, "%Y-%m-%d %H:%M:%S"))
        .ok()
}

/// A player's row in the pools tab
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    /// 1-based spreadsheet row
    pub row: u32,
    /// Chat identity id
    pub owner_id: String,
    /// Display name, the key used in the change log
    pub name: String,
    /// Current pool reference, as written in the cell
    pub current_pool: Option<String>,
    /// Starting pool reference, as written in the cell
    pub starting_pool: Option<String>,
}

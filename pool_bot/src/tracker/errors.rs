//! Tracker error types.

use crate::{ledger::LedgerError, pool::FormatError, store::StoreError};
use std::time::Duration;
use thiserror::Error;

/// Pack tracking errors
#[derive(Debug, Error)]
pub enum TrackError {
    /// Pack text could not be decoded
    #[error("Malformed pack: {0}")]
    Format(#[from] FormatError),

    /// The pack decoded to no cards at all
    #[error("Pack contains no cards")]
    EmptyPack,

    /// No player row carries this identity id
    #[error("No player row for owner {0}")]
    OwnerNotFound(String),

    /// The referenced message names no owner
    #[error("No owner mention found in the referenced message")]
    MissingOwnerMention,

    /// The player row has no starting pool to anchor on
    #[error("Player {0} has no starting pool")]
    MissingStartingPool(String),

    /// A pool reference could not be parsed
    #[error("Invalid pool reference: {0:?}")]
    InvalidReference(String),

    /// A card edit named no card
    #[error("Card name must not be empty")]
    EmptyCardName,

    /// The pack given as a remote pool could not be fetched
    #[error("Pack could not be resolved: {0}")]
    PackUnresolved(StoreError),

    /// A publish call failed; later steps were skipped
    #[error("Pool service error: {0}")]
    PoolService(StoreError),

    /// Reading or writing the ledger failed
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Another update for the same owner held the gate too long
    #[error("Owner {owner} still busy after {waited:?}")]
    Busy { owner: String, waited: Duration },
}

impl TrackError {
    /// Get a caller-safe message without upstream details or raw ids
    pub fn client_message(&self) -> String {
        match self {
            TrackError::OwnerNotFound(_) => "No pool found for this player".to_string(),
            TrackError::MissingStartingPool(_) => {
                "This player has no starting pool recorded".to_string()
            }
            TrackError::PackUnresolved(e) | TrackError::PoolService(e) => e.client_message(),
            TrackError::Ledger(e) => e.client_message(),
            TrackError::Busy { .. } => {
                "Another update for this player is still in progress".to_string()
            }
            _ => self.to_string(),
        }
    }

    /// Short outcome label for logs and metrics
    pub fn label(&self) -> &'static str {
        match self {
            TrackError::Format(_) | TrackError::EmptyPack | TrackError::EmptyCardName => "format",
            TrackError::OwnerNotFound(_) | TrackError::MissingOwnerMention => "owner_not_found",
            TrackError::MissingStartingPool(_) => "missing_starting_pool",
            TrackError::InvalidReference(_) => "invalid_reference",
            TrackError::PackUnresolved(_) => "pack_unresolved",
            TrackError::PoolService(_) => "pool_service",
            TrackError::Ledger(_) => "ledger",
            TrackError::Busy { .. } => "busy",
        }
    }
}

/// Result type for tracker operations
pub type TrackResult<T> = Result<T, TrackError>;

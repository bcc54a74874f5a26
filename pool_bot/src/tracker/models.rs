//! Tracker models.

use crate::{ledger::ChangeOperation, store::RemotePoolId};
use serde::{Deserialize, Serialize};
use std::{env, time::Duration};

/// Where the contents of a generated pack come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackSource {
    /// Pack text, optionally wrapped in a code fence
    Inline(String),
    /// A pool already hosted on the pool service
    Remote(RemotePoolId),
}

/// A generated pack awaiting tracking
#[derive(Debug, Clone)]
pub struct PackEvent {
    /// Text of the message the pack replies to; names the owner
    pub owner_message: String,
    pub source: PackSource,
}

/// A pack that was published and folded into its owner's pool
#[derive(Debug, Clone, Serialize)]
pub struct TrackedPack {
    pub owner_id: String,
    pub player_name: String,
    pub pack_id: RemotePoolId,
    pub pack_link: String,
    pub pool_id: RemotePoolId,
    pub pool_link: String,
    pub card_count: i64,
}

/// Result of one pack-tracking call
#[derive(Debug, Clone)]
pub enum TrackOutcome {
    /// First half of a double pack; waiting for the second
    Pending { owner_id: String },
    Tracked(TrackedPack),
}

/// A freshly published canonical pool
#[derive(Debug, Clone, Serialize)]
pub struct PoolUpdate {
    pub player_name: String,
    pub pool_id: RemotePoolId,
    pub pool_link: String,
}

/// A manual single-card edit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardEdit {
    Add,
    Remove,
}

impl CardEdit {
    /// Change-log operation recording this edit
    pub fn operation(self) -> ChangeOperation {
        match self {
            CardEdit::Add => ChangeOperation::AddCard,
            CardEdit::Remove => ChangeOperation::RemoveCard,
        }
    }
}

/// Tracker settings
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Longest wait for another update of the same owner to finish
    pub lock_timeout: Duration,
}

impl TrackerConfig {
    /// Create configuration from environment variables
    ///
    /// Expected environment variables:
    /// - `OWNER_LOCK_TIMEOUT_SECS` (default: 120)
    pub fn from_env() -> Self {
        let secs = env::var("OWNER_LOCK_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(120);

        Self {
            lock_timeout: Duration::from_secs(secs),
        }
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            lock_timeout: Duration::from_secs(120),
        }
    }
}

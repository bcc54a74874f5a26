//! Pack tracking: turns generated packs and manual edits into ledger rows
//! and republished pools.
//!
//! Each update for a player follows the same path:
//!
//! 1. Resolve the owner's row in the ledger
//! 2. Decode the pack (inline text or an already hosted pool)
//! 3. Publish the pack on its own
//! 4. Replay the change log and publish the full pool as an extension of
//!    the starting pool
//! 5. Append the change record and write the new current-pool link
//!
//! A failure at any step stops the flow before the ledger is written and
//! paints the player's current-pool cell so a human can step in.
//!
//! ## Example
//!
//! ```
//! use pool_bot::ledger::{InMemoryLedger, PlayerRecord};
//! use pool_bot::pool::CardEntry;
//! use pool_bot::store::InMemoryPoolStore;
//! use pool_bot::tracker::{PackEvent, PackSource, PackTracker, TrackOutcome, TrackerConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = Arc::new(InMemoryPoolStore::new());
//!     store.insert_pool("start", vec![CardEntry::new("Plains", 10)]).await;
//!     let ledger = Arc::new(InMemoryLedger::new(vec![PlayerRecord {
//!         row: 7,
//!         owner_id: "111".to_string(),
//!         name: "Sawyer".to_string(),
//!         current_pool: None,
//!         starting_pool: Some("https://sealeddeck.tech/start".to_string()),
//!     }]));
//!
//!     let tracker = PackTracker::new(store, ledger, TrackerConfig::default());
//!     let event = PackEvent {
//!         owner_message: "<@111> here is your pack".to_string(),
//!         source: PackSource::Inline("```\n1 Opt (XLN)\n```".to_string()),
//!     };
//!
//!     let outcome = tracker.track_pack(&event).await.unwrap();
//!     assert!(matches!(outcome, TrackOutcome::Tracked(_)));
//! }
//! ```

pub mod coalescer;
pub mod errors;
pub mod gate;
pub mod manager;
pub mod models;
pub mod owner;

pub use coalescer::{Coalesced, DoublePackCoalescer};
pub use errors::{TrackError, TrackResult};
pub use gate::{OwnerGate, OwnerGuard};
pub use manager::PackTracker;
pub use models::{
    CardEdit, PackEvent, PackSource, PoolUpdate, TrackOutcome, TrackedPack, TrackerConfig,
};
pub use owner::mentioned_owner;

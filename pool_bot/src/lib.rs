//! # Pool Bot
//!
//! Pool bookkeeping for a sealed-format trading card game league.
//!
//! Every player starts from a sealed pool and grows it with packs awarded
//! over the season. The league keeps two records: an append-only change log
//! in a shared spreadsheet, and card pools hosted on an external pool service.
//! This crate keeps them consistent by recomputing each player's pool from
//! their starting pool plus the full change log whenever something changes.
//!
//! ## Architecture
//!
//! - **Pool**: card entries, the pack-text codec and name-keyed arithmetic
//! - **Store**: client for the remote pool-hosting service
//! - **Ledger**: player rows and the change log
//! - **Reconcile**: replays a player's change log into a pool
//! - **Tracker**: orchestrates pack tracking, manual edits and double packs
//!
//! ## Core Modules
//!
//! - [`pool`]: `CardEntry`, `decode`, `merge`, `subtract`
//! - [`store`]: `PoolStore` trait with HTTP and in-memory implementations
//! - [`ledger`]: `Ledger` trait with Sheets and in-memory implementations
//! - [`reconcile`]: change-log replay
//! - [`tracker`]: `PackTracker` and the double-pack coalescer
//!
//! ## Example
//!
//! ```
//! use pool_bot::pool::{CardEntry, decode};
//!
//! let pack = decode("2 Lightning Bolt (M11)\n1 Counterspell (7ED)").unwrap();
//! assert_eq!(pack[0], CardEntry::new("Lightning Bolt", 2));
//! ```

/// Card entries, pack-text decoding and pool arithmetic.
pub mod pool;
pub use pool::{CardEntry, CardList, FormatError, decode, merge, subtract};

/// Remote pool-hosting service client.
pub mod store;
pub use store::{HttpPoolStore, InMemoryPoolStore, PoolStore, RemotePoolId, StoreError};

/// Player rows and the pool change log.
pub mod ledger;
pub use ledger::{ChangeOperation, ChangeRecord, InMemoryLedger, Ledger, SheetsLedger};

/// Change-log replay.
pub mod reconcile;
pub use reconcile::replay;

/// Pack tracking orchestration.
pub mod tracker;
pub use tracker::{PackTracker, TrackError, TrackOutcome, TrackerConfig};

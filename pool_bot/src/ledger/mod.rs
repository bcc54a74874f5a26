//! League ledger: player rows and the append-only pool change log.
//!
//! The system of record is a shared spreadsheet with two tabs:
//! - **Pools**: one row per player (identity id, display name, current and
//!   starting pool links)
//! - **Pool Changes**: append-only `timestamp, player, operation, value` rows
//!
//! Column positions are declared by a [`LedgerSchema`] and validated before
//! use, so a layout change fails at startup instead of reading the wrong
//! column.

pub mod config;
pub mod errors;
pub mod memory;
pub mod models;
pub mod repository;
pub mod schema;
pub mod sheets;

pub use config::SheetsConfig;
pub use errors::{LedgerError, LedgerResult};
pub use memory::{CellWrite, InMemoryLedger};
pub use models::{ChangeOperation, ChangeRecord, PlayerRecord};
pub use repository::Ledger;
pub use schema::{LedgerSchema, PoolsField};
pub use sheets::SheetsLedger;

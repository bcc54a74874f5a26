//! Remote pool store: fetches and publishes card pools on the pool-hosting
//! service (sealeddeck.tech).
//!
//! Every call retries transient failures up to a bounded number of attempts
//! with no pause between them. Reads are safe to repeat; publishes mint a new
//! remote pool on every success, so an application-level rejection is never
//! retried.
//!
//! ## Example
//!
//! ```no_run
//! use pool_bot::pool::CardEntry;
//! use pool_bot::store::{HttpPoolStore, PoolStore, PoolStoreConfig, RemotePoolId};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = HttpPoolStore::new(PoolStoreConfig::default())?;
//!
//!     let pack = vec![CardEntry::new("Lightning Bolt", 1)];
//!     let base = RemotePoolId::from_reference("https://sealeddeck.tech/AbCdEf1234")?;
//!     let extended = store.create_or_extend_pool(&pack, Some(&base)).await?;
//!     println!("New pool: {}", store.pool_link(&extended));
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod errors;
pub mod memory;
pub mod models;
pub mod repository;

pub use client::HttpPoolStore;
pub use config::PoolStoreConfig;
pub use errors::{StoreError, StoreResult};
pub use memory::InMemoryPoolStore;
pub use models::{CreatePoolRequest, CreatePoolResponse, PoolContents, RemotePoolId};
pub use repository::PoolStore;

//! Card pools: the entry type, the pack-text codec, and name-keyed arithmetic.
//!
//! Pools and packs are both plain [`CardList`]s. Order is kept for display
//! only; every arithmetic operation treats a list as a multiset keyed by
//! card name and drops entries whose count falls to zero or below.
//!
//! ## Example
//!
//! ```
//! use pool_bot::pool::{decode, merge, subtract};
//!
//! let pack = decode("2 Lightning Bolt (M11)\n1 Counterspell (7ED)").unwrap();
//! let doubled = merge(&[&pack, &pack]);
//! assert_eq!(subtract(&doubled, &pack), pack);
//! ```

pub mod arithmetic;
pub mod codec;
pub mod errors;
pub mod models;

pub use arithmetic::{Tally, merge, negate, subtract};
pub use codec::{decode, extract_code_block};
pub use errors::{FormatError, FormatResult};
pub use models::{CardEntry, CardList, total_cards};

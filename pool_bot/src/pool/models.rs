//! Card entry data models.

use serde::{Deserialize, Serialize};

/// One line of a card list: a card name and how many copies.
///
/// Serialises as `{"name": .., "count": ..}`, the shape the pool-hosting
/// service accepts and returns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardEntry {
    pub name: String,
    pub count: i64,
}

impl CardEntry {
    /// Create a new entry
    pub fn new(name: impl Into<String>, count: i64) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}

/// Ordered card entries. Order is display-only.
pub type CardList = Vec<CardEntry>;

/// Sum of all counts in a list
pub fn total_cards(list: &[CardEntry]) -> i64 {
    list.iter().map(|entry| entry.count).sum()
}

//! Double-pack coalescing.
//!
//! Some rewards grant two packs at once. The generator posts them as two
//! separate events; both halves are merged and tracked as one pack.

use crate::pool::{CardList, merge};
use std::collections::HashMap;

/// Result of submitting one half of a double pack
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Coalesced {
    /// First half stored; nothing to track yet
    Pending,
    /// Both halves merged and ready to track
    Ready(CardList),
}

/// Pending double packs by owner.
///
/// Not synchronised; the tracker keeps it behind a mutex and under the
/// owner gate.
#[derive(Debug, Default)]
pub struct DoublePackCoalescer {
    bundles: HashMap<String, Option<CardList>>,
}

impl DoublePackCoalescer {
    /// Create an empty coalescer
    pub fn new() -> Self {
        Self::default()
    }

    /// Expect the next two packs of `owner_id` to form one bundle.
    ///
    /// Reopening an open bundle keeps any stored first half.
    pub fn open(&mut self, owner_id: &str) {
        self.bundles.entry(owner_id.to_string()).or_default();
    }

    /// Whether a bundle is open for `owner_id`
    pub fn is_open(&self, owner_id: &str) -> bool {
        self.bundles.contains_key(owner_id)
    }

    /// Submit one half.
    ///
    /// The first half is stored and `Pending` returned. The second half
    /// closes the bundle and returns the merge of both.
    pub fn submit(&mut self, owner_id: &str, pack: CardList) -> Coalesced {
        match self.bundles.remove(owner_id).flatten() {
            Some(first) => Coalesced::Ready(merge(&[&first, &pack])),
            None => {
                self.bundles.insert(owner_id.to_string(), Some(pack));
                Coalesced::Pending
            }
        }
    }

    /// Number of open bundles
    pub fn pending_count(&self) -> usize {
        self.bundles.len()
    }
}

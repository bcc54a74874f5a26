//! Name-keyed pool arithmetic.

use super::models::{CardEntry, CardList};
use std::collections::HashMap;

/// Running per-name counts that remember first-seen order.
///
/// Counts may go negative while accumulating; [`Tally::into_list`] prunes
/// everything that is not strictly positive. Arithmetic saturates at the
/// `i64` bounds.
#[derive(Debug, Clone, Default)]
pub struct Tally {
    order: Vec<String>,
    counts: HashMap<String, i64>,
}

impl Tally {
    /// Create an empty tally
    pub fn new() -> Self {
        Self::default()
    }

    /// Adjust the running count for `name` by `delta`
    pub fn add(&mut self, name: &str, delta: i64) {
        match self.counts.get_mut(name) {
            Some(count) => *count = count.saturating_add(delta),
            None => {
                self.order.push(name.to_string());
                self.counts.insert(name.to_string(), delta);
            }
        }
    }

    /// Add every entry of `list`, scaled by `sign`
    pub fn extend(&mut self, list: &[CardEntry], sign: i64) {
        for entry in list {
            self.add(&entry.name, entry.count.saturating_mul(sign));
        }
    }

    /// Current running count for `name`
    pub fn get(&self, name: &str) -> i64 {
        self.counts.get(name).copied().unwrap_or(0)
    }

    /// Running counts in first-seen order, including non-positive ones
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> + '_ {
        self.order.iter().map(|name| (name.as_str(), self.get(name)))
    }

    /// Finalise into a list of positive entries in first-seen order
    pub fn into_list(self) -> CardList {
        let Self { order, mut counts } = self;
        order
            .into_iter()
            .filter_map(|name| {
                let count = counts.remove(&name)?;
                (count > 0).then(|| CardEntry::new(name, count))
            })
            .collect()
    }
}

/// Sum counts per name across all lists, dropping non-positive results.
pub fn merge(lists: &[&[CardEntry]]) -> CardList {
    let mut tally = Tally::new();
    for list in lists {
        tally.extend(list, 1);
    }
    tally.into_list()
}

/// Flip the sign of every count. The result is an intermediate value for
/// `merge`, not a finalised pool.
pub fn negate(list: &[CardEntry]) -> CardList {
    list.iter()
        .map(|entry| CardEntry::new(entry.name.clone(), entry.count.saturating_neg()))
        .collect()
}

/// `merge(base, negate(removals))`
pub fn subtract(base: &[CardEntry], removals: &[CardEntry]) -> CardList {
    let mut tally = Tally::new();
    tally.extend(base, 1);
    tally.extend(removals, -1);
    tally.into_list()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(entries: &[(&str, i64)]) -> CardList {
        entries
            .iter()
            .map(|(name, count)| CardEntry::new(*name, *count))
            .collect()
    }

    #[test]
    fn test_merge_aggregates_duplicates() {
        let a = list(&[("Island", 1), ("Forest", 2)]);
        let b = list(&[("Island", 2), ("Swamp", 1)]);
        assert_eq!(
            merge(&[&a, &b]),
            list(&[("Island", 3), ("Forest", 2), ("Swamp", 1)])
        );
    }

    #[test]
    fn test_merge_single_list_aggregates() {
        let a = list(&[("Island", 1), ("Island", 1)]);
        assert_eq!(merge(&[&a]), list(&[("Island", 2)]));
    }

    #[test]
    fn test_merge_drops_non_positive() {
        let a = list(&[("Island", 1), ("Forest", 1)]);
        let b = list(&[("Island", -1), ("Forest", -3)]);
        assert!(merge(&[&a, &b]).is_empty());
    }

    #[test]
    fn test_merge_with_negation_is_empty() {
        let a = list(&[("Island", 4), ("Opt", 1)]);
        assert!(merge(&[&a, &negate(&a)]).is_empty());
    }

    #[test]
    fn test_subtract() {
        let base = list(&[("Island", 3), ("Opt", 1)]);
        let removals = list(&[("Island", 1), ("Opt", 2), ("Shock", 1)]);
        assert_eq!(subtract(&base, &removals), list(&[("Island", 2)]));
    }

    #[test]
    fn test_tally_tracks_negative_transiently() {
        let mut tally = Tally::new();
        tally.add("Island", -1);
        assert_eq!(tally.get("Island"), -1);
        tally.add("Island", 2);
        assert_eq!(tally.into_list(), list(&[("Island", 1)]));
    }

    #[test]
    fn test_merge_saturates_at_max_count() {
        let a = list(&[("Island", i64::MAX), ("Opt", 1)]);
        assert_eq!(
            merge(&[&a, &a]),
            list(&[("Island", i64::MAX), ("Opt", 2)])
        );

        let pack = crate::pool::decode("9223372036854775807 Island (M21)").unwrap();
        assert_eq!(merge(&[&pack, &pack]), list(&[("Island", i64::MAX)]));
    }

    #[test]
    fn test_negate_and_subtract_saturate() {
        let a = list(&[("Island", i64::MIN), ("Opt", i64::MAX)]);
        assert_eq!(
            negate(&a),
            list(&[("Island", i64::MAX), ("Opt", -i64::MAX)])
        );

        let base = list(&[("Island", 2)]);
        let removals = list(&[("Island", i64::MIN)]);
        assert_eq!(subtract(&base, &removals), list(&[("Island", i64::MAX)]));
    }
}

/// Property-based tests for pool arithmetic and change-log replay
///
/// Lists are compared as name -> count mappings, since arithmetic keeps
/// first-seen order only for display.
use pool_bot::ledger::{ChangeOperation, ChangeRecord};
use pool_bot::pool::{CardEntry, CardList, decode, merge, negate, subtract};
use pool_bot::reconcile::plan;
use proptest::prelude::*;
use std::collections::BTreeMap;

const NAMES: [&str; 6] = [
    "Opt",
    "Shock",
    "Island",
    "Plains",
    "Lightning Bolt",
    "Jace, the Mind Sculptor",
];

// Strategy to generate one entry from a small name pool so names collide
fn entry_strategy() -> impl Strategy<Value = CardEntry> {
    (prop::sample::select(NAMES.to_vec()), 1i64..=4)
        .prop_map(|(name, count)| CardEntry::new(name, count))
}

fn list_strategy() -> impl Strategy<Value = CardList> {
    prop::collection::vec(entry_strategy(), 0..8)
}

// Helper to view a list as a multiset
fn as_map(list: &[CardEntry]) -> BTreeMap<String, i64> {
    let mut map = BTreeMap::new();
    for entry in list {
        *map.entry(entry.name.clone()).or_insert(0) += entry.count;
    }
    map.retain(|_, count| *count > 0);
    map
}

fn encode(list: &[CardEntry]) -> String {
    list.iter()
        .map(|entry| format!("{} {} (SET) 1", entry.count, entry.name))
        .collect::<Vec<_>>()
        .join("\n")
}

proptest! {
    #[test]
    fn test_merge_commutative(a in list_strategy(), b in list_strategy()) {
        prop_assert_eq!(as_map(&merge(&[&a, &b])), as_map(&merge(&[&b, &a])));
    }

    #[test]
    fn test_merge_associative(
        a in list_strategy(),
        b in list_strategy(),
        c in list_strategy(),
    ) {
        let left = merge(&[&merge(&[&a, &b]), &c]);
        let right = merge(&[&a, &merge(&[&b, &c])]);
        prop_assert_eq!(as_map(&left), as_map(&right));
        prop_assert_eq!(as_map(&left), as_map(&merge(&[&a, &b, &c])));
    }

    #[test]
    fn test_merge_with_negation_is_empty(a in list_strategy()) {
        prop_assert!(merge(&[&a, &negate(&a)]).is_empty());
    }

    #[test]
    fn test_merge_output_is_positive_and_unique(a in list_strategy(), b in list_strategy()) {
        let merged = merge(&[&a, &negate(&b)]);
        prop_assert!(merged.iter().all(|entry| entry.count > 0));
        prop_assert_eq!(merged.len(), as_map(&merged).len());
    }

    #[test]
    fn test_decode_add_then_subtract_round_trip(a in list_strategy()) {
        let decoded = decode(&encode(&a)).unwrap();
        prop_assert_eq!(&decoded, &a);

        let doubled = merge(&[&decoded, &decoded]);
        prop_assert_eq!(as_map(&subtract(&doubled, &decoded)), as_map(&a));
    }

    #[test]
    fn test_replay_card_edits_commute_across_names(
        edits in prop::collection::vec(
            (prop::sample::select(NAMES.to_vec()), any::<bool>()),
            0..12,
        ),
        seed in any::<u64>(),
    ) {
        let records: Vec<ChangeRecord> = edits
            .iter()
            .map(|(name, add)| {
                let operation = if *add { ChangeOperation::AddCard } else { ChangeOperation::RemoveCard };
                ChangeRecord::new("P", operation, name)
            })
            .collect();

        // Stable sort by name keeps same-name edits in order
        let mut shuffled = records.clone();
        shuffled.sort_by_key(|record| {
            let name_rank = NAMES.iter().position(|n| *n == record.value).unwrap_or(0) as u64;
            name_rank.wrapping_mul(seed | 1) % 7
        });

        let original: BTreeMap<String, i64> = plan(&records, "P")
            .cards
            .iter()
            .map(|(name, count)| (name.to_string(), count))
            .collect();
        let reordered: BTreeMap<String, i64> = plan(&shuffled, "P")
            .cards
            .iter()
            .map(|(name, count)| (name.to_string(), count))
            .collect();
        prop_assert_eq!(original, reordered);
    }
}

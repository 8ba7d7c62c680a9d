// Sort-merge tests: ordering, dedup, caps, missed and trimmed keys.

mod support;

use std::collections::BTreeMap;

use smget_engine::{
    BKey, DedupMode, Direction, Element, ElementSet, Error, KeyReply, MergeOptions, MissStatus,
    TrimmedKey, merge,
};
use support::{found, init_tracing, int_set, triple, triples, trimmed_int_set};

fn replies(entries: Vec<(&str, KeyReply<String>)>) -> BTreeMap<String, KeyReply<String>> {
    entries
        .into_iter()
        .map(|(k, r)| (k.to_string(), r))
        .collect()
}

fn two_keys() -> BTreeMap<String, KeyReply<String>> {
    replies(vec![
        ("K1", found(&[(1, "a"), (2, "b")])),
        ("K2", found(&[(1, "c"), (3, "d")])),
    ])
}

fn asc(dedup: DedupMode, count: usize) -> MergeOptions {
    MergeOptions::new(Direction::Ascending, dedup, count)
}

fn desc(dedup: DedupMode, count: usize) -> MergeOptions {
    MergeOptions::new(Direction::Descending, dedup, count)
}

// =============================================================================
// Basic ordering
// =============================================================================
// Equal bkeys tie-break by cache key.
#[test]
fn merges_two_keys_ascending() {
    init_tracing();
    let result = merge(two_keys(), &asc(DedupMode::None, 10)).unwrap();

    assert_eq!(
        triples(&result),
        vec![
            triple("K1", 1, "a"),
            triple("K2", 1, "c"),
            triple("K1", 2, "b"),
            triple("K2", 3, "d"),
        ]
    );
    assert!(result.missed_keys().is_empty());
    assert!(result.trimmed_keys().is_empty());
    assert!(result.is_complete());
}

#[test]
fn unique_mode_drops_second_equal_bkey() {
    let result = merge(two_keys(), &asc(DedupMode::Unique, 10)).unwrap();

    assert_eq!(
        triples(&result),
        vec![
            triple("K1", 1, "a"),
            triple("K1", 2, "b"),
            triple("K2", 3, "d"),
        ]
    );
}

#[test]
fn count_caps_output() {
    let result = merge(two_keys(), &asc(DedupMode::None, 2)).unwrap();

    assert_eq!(
        triples(&result),
        vec![triple("K1", 1, "a"), triple("K2", 1, "c")]
    );
}

#[test]
fn descending_walks_each_set_backwards() {
    let result = merge(two_keys(), &desc(DedupMode::None, 10)).unwrap();

    // Ties still resolve by cache key order.
    assert_eq!(
        triples(&result),
        vec![
            triple("K2", 3, "d"),
            triple("K1", 2, "b"),
            triple("K1", 1, "a"),
            triple("K2", 1, "c"),
        ]
    );
}

#[test]
fn descending_unique() {
    let result = merge(two_keys(), &desc(DedupMode::Unique, 10)).unwrap();

    assert_eq!(
        triples(&result),
        vec![
            triple("K2", 3, "d"),
            triple("K1", 2, "b"),
            triple("K1", 1, "a"),
        ]
    );
}

#[test]
fn unique_collapses_three_way_duplicates() {
    let input = replies(vec![
        ("a", found(&[(5, "a5"), (7, "a7")])),
        ("b", found(&[(5, "b5"), (6, "b6")])),
        ("c", found(&[(5, "c5"), (7, "c7"), (8, "c8")])),
    ]);
    let result = merge(input, &asc(DedupMode::Unique, 10)).unwrap();

    assert_eq!(
        triples(&result),
        vec![
            triple("a", 5, "a5"),
            triple("b", 6, "b6"),
            triple("a", 7, "a7"),
            triple("c", 8, "c8"),
        ]
    );
}

#[test]
fn byte_bkeys_merge_lexicographically() {
    let set = |pairs: &[(&[u8], &str)]| {
        KeyReply::Found(
            ElementSet::from_elements(
                pairs
                    .iter()
                    .map(|(b, v)| Element::new(BKey::bytes(b).unwrap(), v.to_string())),
                false,
            )
            .unwrap(),
        )
    };
    let input = replies(vec![
        ("x", set(&[(&[0x01][..], "x1"), (&[0x01, 0x00][..], "x2")])),
        ("y", set(&[(&[0x00, 0xFF][..], "y1"), (&[0x02][..], "y2")])),
    ]);
    let result = merge(input, &asc(DedupMode::None, 10)).unwrap();

    let values: Vec<&str> = result.elements().iter().map(|m| m.value().as_str()).collect();
    assert_eq!(values, vec!["y1", "x1", "x2", "y2"]);
}

// =============================================================================
// Offset paging
// =============================================================================
#[test]
fn offset_skips_leading_elements() {
    let options = asc(DedupMode::None, 2).with_offset(1);
    let result = merge(two_keys(), &options).unwrap();

    assert_eq!(
        triples(&result),
        vec![triple("K2", 1, "c"), triple("K1", 2, "b")]
    );
}

#[test]
fn offset_counts_deduplicated_elements() {
    let options = asc(DedupMode::Unique, 10).with_offset(1);
    let result = merge(two_keys(), &options).unwrap();

    assert_eq!(
        triples(&result),
        vec![triple("K1", 2, "b"), triple("K2", 3, "d")]
    );
}

#[test]
fn offset_past_end_returns_nothing() {
    let options = asc(DedupMode::None, 10).with_offset(10);
    let result = merge(two_keys(), &options).unwrap();
    assert!(result.is_empty());
}

// =============================================================================
// Missed keys
// =============================================================================
#[test]
fn missed_key_is_reported_and_output_unaffected() {
    let mut input = two_keys();
    input.insert("K3".into(), KeyReply::Missed(MissStatus::NotFound));

    let result = merge(input, &asc(DedupMode::None, 10)).unwrap();

    assert_eq!(result.len(), 4);
    assert_eq!(result.missed_keys().len(), 1);
    assert_eq!(result.missed_keys()[0].cache_key, "K3");
    assert_eq!(result.missed_keys()[0].status, MissStatus::NotFound);
    assert!(!result.is_complete());
}

#[test]
fn missed_keys_sorted_by_cache_key() {
    let input = replies(vec![
        ("zeta", KeyReply::Missed(MissStatus::Timeout)),
        ("alpha", KeyReply::Missed(MissStatus::TypeMismatch)),
        ("mid", found(&[(1, "m")])),
        ("beta", KeyReply::Missed(MissStatus::Unreadable)),
    ]);
    let result = merge(input, &asc(DedupMode::None, 10)).unwrap();

    let missed: Vec<(&str, &str)> = result
        .missed_keys()
        .iter()
        .map(|m| (m.cache_key.as_str(), m.status.code()))
        .collect();
    assert_eq!(
        missed,
        vec![
            ("alpha", "TYPE_MISMATCH"),
            ("beta", "UNREADABLE"),
            ("zeta", "TIMEOUT"),
        ]
    );
}

#[test]
fn empty_but_present_set_is_not_a_miss() {
    let input = replies(vec![
        ("empty", found(&[])),
        ("gone", KeyReply::Missed(MissStatus::NotFound)),
    ]);
    let result = merge(input, &asc(DedupMode::None, 10)).unwrap();

    assert!(result.is_empty());
    assert_eq!(result.missed_keys().len(), 1);
    assert_eq!(result.missed_keys()[0].cache_key, "gone");
}

// =============================================================================
// Trimmed keys
// =============================================================================
#[test]
fn trim_beyond_window_is_pruned() {
    let input = replies(vec![
        ("K0", found(&[(1, "x"), (2, "y")])),
        ("K1", KeyReply::Found(trimmed_int_set(&[(3, "p"), (5, "q")]))),
    ]);
    let result = merge(input, &asc(DedupMode::None, 2)).unwrap();

    assert_eq!(result.elements().last().unwrap().bkey(), &BKey::Integer(2));
    assert!(result.trimmed_keys().is_empty());
}

#[test]
fn trim_at_window_edge_is_kept() {
    let input = replies(vec![
        ("K0", found(&[(1, "x"), (3, "z")])),
        ("K1", KeyReply::Found(trimmed_int_set(&[(2, "p")]))),
    ]);
    let result = merge(input, &asc(DedupMode::None, 2)).unwrap();

    assert_eq!(result.elements().last().unwrap().bkey(), &BKey::Integer(2));
    assert_eq!(
        result.trimmed_keys(),
        &[TrimmedKey {
            cache_key: "K1".into(),
            boundary: Some(BKey::Integer(2)),
        }]
    );
}

#[test]
fn trim_inside_window_is_kept_when_exhausted() {
    let input = replies(vec![
        ("a", KeyReply::Found(trimmed_int_set(&[(1, "a1"), (4, "a4")]))),
        ("b", found(&[(2, "b2"), (9, "b9")])),
    ]);
    let result = merge(input, &asc(DedupMode::None, 100)).unwrap();

    assert_eq!(result.len(), 4);
    assert_eq!(result.trimmed_keys().len(), 1);
    assert_eq!(result.trimmed_keys()[0].boundary, Some(BKey::Integer(4)));
}

#[test]
fn descending_trim_pruning_uses_lower_bound() {
    let input = replies(vec![
        ("a", found(&[(7, "a7"), (8, "a8"), (9, "a9")])),
        // Walked descending, b stops at 6: past the last returned key 8.
        ("b", KeyReply::Found(trimmed_int_set(&[(6, "b6"), (7, "b7")]))),
        // c stops at 8, the last returned key.
        ("c", KeyReply::Found(trimmed_int_set(&[(8, "c8")]))),
    ]);
    let result = merge(input, &desc(DedupMode::Unique, 2)).unwrap();

    assert_eq!(
        triples(&result),
        vec![triple("a", 9, "a9"), triple("a", 8, "a8")]
    );
    let trimmed: Vec<&str> = result
        .trimmed_keys()
        .iter()
        .map(|t| t.cache_key.as_str())
        .collect();
    assert_eq!(trimmed, vec!["c"]);
}

#[test]
fn empty_trimmed_set_is_always_reported() {
    let input = replies(vec![
        ("a", found(&[(1, "a1")])),
        ("b", KeyReply::Found(trimmed_int_set(&[]))),
    ]);
    let result = merge(input, &asc(DedupMode::None, 1)).unwrap();

    assert_eq!(
        result.trimmed_keys(),
        &[TrimmedKey {
            cache_key: "b".into(),
            boundary: None,
        }]
    );
}

// =============================================================================
// Zero count and empty inputs
// =============================================================================
#[test]
fn zero_count_still_reports_bookkeeping() {
    let input = replies(vec![
        ("a", KeyReply::Found(trimmed_int_set(&[(1, "a1"), (50, "a50")]))),
        ("b", KeyReply::Missed(MissStatus::OutOfRange)),
        ("c", found(&[(2, "c2")])),
    ]);
    let result = merge(input, &asc(DedupMode::None, 0)).unwrap();

    assert!(result.is_empty());
    assert_eq!(result.missed_keys().len(), 1);
    assert_eq!(result.trimmed_keys().len(), 1);
    assert_eq!(result.trimmed_keys()[0].boundary, Some(BKey::Integer(50)));
}

#[test]
fn no_replies_yield_empty_result() {
    let result = merge(BTreeMap::<String, KeyReply<String>>::new(), &MergeOptions::default())
        .unwrap();
    assert!(result.is_empty());
    assert!(result.is_complete());
}

// =============================================================================
// Errors and determinism
// =============================================================================
#[test]
fn mixed_bkey_types_fail_before_output() {
    let bytes_set = ElementSet::from_elements(
        [Element::new(BKey::bytes(&[1]).unwrap(), "b".to_string())],
        false,
    )
    .unwrap();
    let input = replies(vec![
        ("a", found(&[(1, "a")])),
        ("b", KeyReply::Found(bytes_set)),
    ]);

    let err = merge(input, &asc(DedupMode::None, 10)).unwrap_err();
    assert!(matches!(err, Error::KeyTypeMismatch { .. }));
}

#[test]
fn empty_sets_do_not_count_toward_type_check() {
    let input = replies(vec![
        ("a", found(&[(1, "a")])),
        ("b", KeyReply::Found(ElementSet::builder().build())),
    ]);
    assert!(merge(input, &asc(DedupMode::None, 10)).is_ok());
}

#[test]
fn merge_is_deterministic() {
    let input = replies(vec![
        ("k3", found(&[(1, "a"), (4, "b"), (4, "c")])),
        ("k1", KeyReply::Found(trimmed_int_set(&[(2, "d"), (4, "e")]))),
        ("k2", found(&[(1, "f"), (3, "g")])),
        ("k0", KeyReply::Missed(MissStatus::NotFound)),
    ]);
    let options = asc(DedupMode::Unique, 3);

    let first = merge(input.clone(), &options).unwrap();
    let second = merge(input, &options).unwrap();
    assert_eq!(first, second);
}

#[test]
fn into_elements_hands_back_ownership() {
    let result = merge(
        replies(vec![("only", KeyReply::Found(int_set(&[(1, "one")])))]),
        &asc(DedupMode::None, 10),
    )
    .unwrap();

    let elements = result.into_elements();
    assert_eq!(elements.len(), 1);
    let (bkey, value, _) = elements.into_iter().next().unwrap().element.into_parts();
    assert_eq!(bkey, BKey::Integer(1));
    assert_eq!(value, "one");
}

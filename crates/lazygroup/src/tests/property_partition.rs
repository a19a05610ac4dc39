use alloc::vec::Vec;

use quickcheck::{QuickCheck, TestResult};

use crate::lazy_group_by;

/// Reference grouping: keys in first-occurrence order, items in source order.
fn eager_groups(items: &[u8], modulus: u8) -> Vec<(u8, Vec<u8>)> {
    let mut groups: Vec<(u8, Vec<u8>)> = Vec::new();
    for &item in items {
        let key = item % modulus;
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, group)) => group.push(item),
            None => groups.push((key, alloc::vec![item])),
        }
    }
    groups
}

fn test_count() -> u64 {
    if cfg!(any(miri, feature = "test-fast")) {
        10
    } else if is_ci::cached() {
        10_000
    } else {
        1_000
    }
}

/// Property: draining every group in key order recovers the eager grouping.
#[test]
fn partition_matches_eager_grouping_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(items: Vec<u8>, modulus: u8) -> bool {
        let modulus = modulus % 7 + 1;
        let grouped = lazy_group_by(items.iter().copied(), |n: &u8| n % modulus);
        let actual: Vec<(u8, Vec<u8>)> = grouped
            .iter()
            .map(|(key, group)| (key, group.collect()))
            .collect();
        actual == eager_groups(&items, modulus)
    }

    QuickCheck::new()
        .tests(test_count())
        .quickcheck(prop as fn(Vec<u8>, u8) -> bool);
}

/// Property: any interleaving of outer pulls and single-item group pulls
/// yields the same per-group contents as isolated consumption.
#[test]
fn interleaved_pulls_match_eager_grouping_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(items: Vec<u8>, modulus: u8, schedule: Vec<u8>) -> bool {
        let modulus = modulus % 7 + 1;
        let grouped = lazy_group_by(items.iter().copied(), |n: &u8| n % modulus);
        let mut outer = grouped.iter();
        let mut seen = Vec::new();
        let mut taken: Vec<Vec<u8>> = Vec::new();

        for op in schedule {
            if op % 3 == 0 || seen.is_empty() {
                if let Some(entry) = outer.next() {
                    seen.push(entry);
                    taken.push(Vec::new());
                }
            } else {
                let index = usize::from(op / 3) % seen.len();
                if let Some(item) = seen[index].1.next() {
                    taken[index].push(item);
                }
            }
        }

        for entry in outer {
            seen.push(entry);
            taken.push(Vec::new());
        }
        for (slot, (_, group)) in taken.iter_mut().zip(seen.iter_mut()) {
            slot.extend(group.by_ref());
        }

        let actual: Vec<(u8, Vec<u8>)> = seen.iter().map(|(key, _)| *key).zip(taken).collect();
        actual == eager_groups(&items, modulus)
    }

    QuickCheck::new()
        .tests(test_count())
        .quickcheck(prop as fn(Vec<u8>, u8, Vec<u8>) -> bool);
}

/// Property: a lookup finds a group iff the key occurs, and lookups in any
/// order leave the key order and group contents untouched.
#[test]
fn lookups_in_any_order_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(items: Vec<u8>, probes: Vec<u8>) -> TestResult {
        if items.is_empty() && probes.is_empty() {
            return TestResult::discard();
        }
        let modulus = 5;
        let expected = eager_groups(&items, modulus);
        let grouped = lazy_group_by(items.iter().copied(), |n: &u8| n % modulus);

        let mut taken: Vec<(u8, Vec<u8>)> = Vec::new();
        for probe in probes {
            let key = probe % (modulus + 2);
            let occurs = expected.iter().any(|(k, _)| *k == key);
            match grouped.get_group(&key) {
                Some(mut group) => {
                    if !occurs {
                        return TestResult::failed();
                    }
                    if let Some(item) = group.next() {
                        match taken.iter_mut().find(|(k, _)| *k == key) {
                            Some((_, items)) => items.push(item),
                            None => taken.push((key, alloc::vec![item])),
                        }
                    }
                }
                None if occurs => return TestResult::failed(),
                None => {}
            }
        }

        let actual: Vec<(u8, Vec<u8>)> = grouped
            .iter()
            .map(|(key, group)| {
                let mut items = taken
                    .iter()
                    .find(|(k, _)| *k == key)
                    .map(|(_, items)| items.clone())
                    .unwrap_or_default();
                items.extend(group);
                (key, items)
            })
            .collect();
        TestResult::from_bool(actual == expected)
    }

    QuickCheck::new()
        .tests(test_count())
        .quickcheck(prop as fn(Vec<u8>, Vec<u8>) -> TestResult);
}

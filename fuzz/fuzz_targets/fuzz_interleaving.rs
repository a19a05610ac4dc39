#![no_main]
use std::cell::Cell;

use arbitrary::Arbitrary;
use lazygroup::try_lazy_group_by;
use libfuzzer_sys::fuzz_target;
use rand::rngs::SmallRng; // faster than StdRng
use rand::{Rng, SeedableRng};

#[derive(Debug, Arbitrary)]
struct Plan {
    /// Number of distinct keys is `modulus % 16 + 1`.
    modulus: u8,
    /// Drives the order in which consumers are pulled.
    schedule_seed: u64,
    /// While armed, the selector fails on this item value.
    poison: Option<u8>,
    items: Vec<u8>,
}

/// First-occurrence grouping computed eagerly.
fn expected_groups(items: &[u8], modulus: u8) -> Vec<(u8, Vec<u8>)> {
    let mut groups: Vec<(u8, Vec<u8>)> = Vec::new();
    for &item in items {
        let key = item % modulus;
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, group)) => group.push(item),
            None => groups.push((key, vec![item])),
        }
    }
    groups
}

fn run(plan: Plan) {
    let modulus = plan.modulus % 16 + 1;
    let armed = Cell::new(plan.poison.is_some());
    let grouped = try_lazy_group_by(plan.items.iter().copied(), |n: &u8| {
        if armed.get() && Some(*n) == plan.poison {
            Err(*n)
        } else {
            Ok(n % modulus)
        }
    });

    let mut rng = SmallRng::seed_from_u64(plan.schedule_seed);
    let mut outer = grouped.try_iter();
    let mut seen = Vec::new();
    let mut taken: Vec<Vec<u8>> = Vec::new();

    // Random pulls while the selector may still fail.
    for _ in 0..plan.items.len() * 2 {
        if rng.random_ratio(1, 16) {
            armed.set(false);
        }
        if seen.is_empty() || rng.random_ratio(1, 3) {
            match outer.next() {
                Some(Ok(entry)) => {
                    seen.push(entry);
                    taken.push(Vec::new());
                }
                Some(Err(error)) => assert_eq!(Some(*error.error()), plan.poison),
                None => {}
            }
        } else {
            let index = rng.random_range(0..seen.len());
            match seen[index].1.try_next() {
                Ok(Some(item)) => taken[index].push(item),
                Ok(None) => {}
                Err(error) => assert_eq!(Some(*error.error()), plan.poison),
            }
        }
    }

    // Drain the rest with a selector that always succeeds.
    armed.set(false);
    for entry in outer {
        seen.push(entry.expect("selector no longer fails"));
        taken.push(Vec::new());
    }
    for (slot, (_, group)) in taken.iter_mut().zip(seen.iter_mut()) {
        while let Some(item) = group.try_next().expect("selector no longer fails") {
            slot.push(item);
        }
    }

    let actual: Vec<(u8, Vec<u8>)> = seen.iter().map(|(key, _)| *key).zip(taken).collect();
    assert_eq!(actual, expected_groups(&plan.items, modulus));
    assert!(grouped.is_exhausted());
}

fuzz_target!(|plan: Plan| run(plan));

use std::collections::HashMap as StdHashMap;
use std::collections::HashSet as StdHashSet;

use probe_table::Error;
use probe_table::HashMap;
use probe_table::HashSet;
use probe_table::IdentityBuildHasher;
use probe_table::ProbeStrategy;
use probe_table::Status;
use probe_table::TableConfig;
use probe_table::config::NO_GROW;
use probe_table::config::NO_SHRINK;
use probe_table::prime::is_prime;
use probe_table::probe::ProbeSeq;
use proptest::prelude::*;

#[derive(Debug, Clone, Copy)]
enum Op {
    Insert(u16),
    Remove(u16),
    Search(u16),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0u16..128).prop_map(Op::Insert),
        2 => (0u16..128).prop_map(Op::Remove),
        1 => (0u16..128).prop_map(Op::Search),
    ]
}

fn strategy() -> impl Strategy<Value = ProbeStrategy> {
    prop_oneof![
        Just(ProbeStrategy::Linear),
        Just(ProbeStrategy::Quadratic),
        Just(ProbeStrategy::DoubleHashing),
    ]
}

fn config() -> impl Strategy<Value = TableConfig> {
    (
        3usize..40,
        strategy(),
        prop_oneof![Just(0.5), Just(0.75), Just(NO_GROW)],
        prop_oneof![Just(NO_SHRINK), Just(0.1), Just(0.2)],
    )
        .prop_map(|(capacity, strategy, max, min)| {
            TableConfig::new(capacity, strategy)
                .with_max_load_factor(max)
                .with_min_load_factor(min)
        })
}

/// Runs `ops` against a set and a std model, checking the table invariants
/// after every step.
fn check_ops(config: TableConfig, ops: &[Op]) -> Result<(), TestCaseError> {
    let mut set: HashSet<u16> = HashSet::with_config(config).unwrap();
    let mut model = StdHashSet::new();

    for &op in ops {
        match op {
            Op::Insert(v) => match set.insert(v) {
                Ok(true) => {
                    prop_assert!(model.insert(v), "{v} inserted twice");
                }
                Ok(false) => {
                    // Either a duplicate or a quadratic coverage gap.
                    prop_assert!(
                        model.contains(&v) || config.strategy == ProbeStrategy::Quadratic,
                        "{v} refused by {:?}",
                        config.strategy
                    );
                }
                Err(err) => {
                    prop_assert_eq!(err, Error::Full);
                    prop_assert_eq!(set.len(), set.capacity());
                    prop_assert!(!model.contains(&v));
                }
            },
            Op::Remove(v) => {
                let removed = set.remove(&v);
                if model.is_empty() {
                    prop_assert_eq!(removed, Err(Error::Empty));
                } else {
                    prop_assert_eq!(removed, Ok(model.remove(&v)));
                }
            }
            Op::Search(v) => {
                prop_assert_eq!(set.search(&v), model.contains(&v));
            }
        }

        prop_assert!(is_prime(set.capacity()));
        prop_assert!(set.capacity() >= 3);
        prop_assert_eq!(set.len(), model.len());
        prop_assert!(set.len() <= set.capacity());
        prop_assert_eq!(set.load_factor(), set.len() as f64 / set.capacity() as f64);
        if config.max_load_factor < 1.0 {
            prop_assert!(
                set.load_factor() <= config.max_load_factor,
                "load {} above {} after {op:?} at {} slots",
                set.load_factor(),
                config.max_load_factor,
                set.capacity()
            );
        }
    }

    for v in 0u16..128 {
        prop_assert_eq!(set.search(&v), model.contains(&v));
    }
    let mut live: Vec<u16> = set.iter().copied().collect();
    live.sort_unstable();
    let mut expected: Vec<u16> = model.into_iter().collect();
    expected.sort_unstable();
    prop_assert_eq!(live, expected);
    Ok(())
}

#[test]
fn set_matches_model() {
    proptest!(|(config in config(), ops in prop::collection::vec(op(), 0..300))| {
        check_ops(config, &ops)?;
    });
}

#[test]
fn set_matches_model_growing_from_floor() {
    let config = TableConfig::new(3, ProbeStrategy::Quadratic)
        .with_max_load_factor(0.5)
        .with_min_load_factor(0.2);
    let ops: Vec<Op> = (0..100)
        .map(Op::Insert)
        .chain((0..100).map(Op::Remove))
        .chain((0..10).map(Op::Insert))
        .collect();
    check_ops(config, &ops).unwrap();
}

#[test]
fn shrink_keeps_load_under_max() {
    let config = TableConfig::new(23, ProbeStrategy::Linear)
        .with_max_load_factor(0.5)
        .with_min_load_factor(0.3);
    let ops: Vec<Op> = (1..=6)
        .map(Op::Insert)
        .chain([Op::Remove(6), Op::Remove(5), Op::Insert(6)])
        .collect();
    check_ops(config, &ops).unwrap();
}

#[test]
fn capacity_rounds_up_to_prime() {
    proptest!(|(capacity in 3usize..10_000)| {
        let set: HashSet<u8> = HashSet::new(capacity, ProbeStrategy::Linear).unwrap();
        prop_assert!(is_prime(set.capacity()));
        prop_assert!(set.capacity() >= capacity);
        if is_prime(capacity) {
            prop_assert_eq!(set.capacity(), capacity);
        }
    });
}

#[test]
fn duplicate_insert_is_idempotent() {
    proptest!(|(strategy in strategy(), values in prop::collection::vec(any::<u32>(), 1..50))| {
        let config = TableConfig::new(3, strategy).with_max_load_factor(0.5);
        let mut set: HashSet<u32> = HashSet::with_config(config).unwrap();
        for &v in &values {
            set.insert(v).unwrap();
        }
        let len = set.len();
        let capacity = set.capacity();
        for &v in &values {
            prop_assert_eq!(set.insert(v), Ok(false));
        }
        prop_assert_eq!(set.len(), len);
        prop_assert_eq!(set.capacity(), capacity);
    });
}

#[test]
fn round_trip_until_removed() {
    proptest!(|(strategy in strategy(), values in prop::collection::hash_set(any::<i64>(), 1..100))| {
        let config = TableConfig::new(7, strategy)
            .with_max_load_factor(0.5)
            .with_min_load_factor(0.15);
        let mut set: HashSet<i64> = HashSet::with_config(config).unwrap();
        for &v in &values {
            prop_assert_eq!(set.insert(v), Ok(true));
            prop_assert!(set.search(&v));
        }
        for &v in &values {
            prop_assert!(set.search(&v));
            prop_assert_eq!(set.remove(&v), Ok(true));
            prop_assert!(!set.search(&v));
        }
        prop_assert!(set.is_empty());
        prop_assert_eq!(set.remove(&0), Err(Error::Empty));
    });
}

#[test]
fn tombstone_is_reused_by_colliding_value() {
    proptest!(|(strategy in strategy(), capacity in 3usize..200, a in 0u64..1_000, k in 1u64..10)| {
        let mut set: HashSet<u64, IdentityBuildHasher> = HashSet::new(capacity, strategy).unwrap();
        let capacity = set.capacity() as u64;
        let b = a + k * capacity;
        let index = (a % capacity) as usize;

        set.insert(a).unwrap();
        set.remove(&a).unwrap();
        prop_assert_eq!(set.slot(index).map(|s| s.status()), Some(Status::Tombstone));

        prop_assert_eq!(set.insert(b), Ok(true));
        prop_assert_eq!(set.slot(index).and_then(|s| s.live()), Some(&b));
        prop_assert_eq!(set.len(), 1);
        prop_assert!(!set.search(&a));
    });
}

#[test]
fn probe_sequences_are_bounded() {
    proptest!(|(strategy in strategy(), hash in any::<u64>(), capacity in 3usize..500)| {
        let previous = probe_table::prime::previous_prime(capacity).unwrap();
        let indices: Vec<usize> = ProbeSeq::new(strategy, hash, capacity, previous).collect();
        prop_assert_eq!(indices.len(), capacity);
        prop_assert!(indices.iter().all(|&i| i < capacity));
    });
}

#[test]
fn map_matches_model() {
    proptest!(|(strategy in strategy(), ops in prop::collection::vec((0u8..64, any::<u16>(), any::<bool>()), 0..300))| {
        let config = TableConfig::new(3, strategy)
            .with_max_load_factor(0.5)
            .with_min_load_factor(0.125);
        let mut map: HashMap<u8, u16> = HashMap::with_config(config).unwrap();
        let mut model = StdHashMap::new();

        for (key, value, put) in ops {
            if put {
                let added = map.put(key, value).unwrap();
                prop_assert_eq!(added, model.insert(key, value).is_none());
            } else if model.is_empty() {
                prop_assert_eq!(map.remove_key(&key), Err(Error::Empty));
            } else {
                prop_assert_eq!(map.remove_key(&key), Ok(model.remove(&key).is_some()));
            }
            prop_assert_eq!(map.len(), model.len());
            prop_assert!(is_prime(map.capacity()));
            prop_assert!(map.load_factor() <= 0.5);
        }

        for key in 0u8..64 {
            prop_assert_eq!(map.get(&key), model.get(&key));
            prop_assert_eq!(map.contains_key(&key), model.contains_key(&key));
        }
    });
}

/// Property tests for the pool store invariants: no double-issue of active
/// handles, exhaustion exactly at the ceiling, FIFO reuse

use std::collections::HashSet;

use proptest::prelude::*;

use tether_shared::{EntityKinds, PoolConfig, PoolError, PoolHandle, PoolStore};

const CEILING: usize = 8;

fn enemy_store() -> (PoolStore, tether_shared::EntityKind) {
    let mut kinds = EntityKinds::new();
    let kind = kinds.add_entity_kind("enemy", PoolConfig::new(2, CEILING));
    (PoolStore::new(&kinds), kind)
}

proptest! {
    #[test]
    fn never_hands_out_an_active_handle_twice(ops in prop::collection::vec(any::<u8>(), 1..256)) {
        let (mut store, kind) = enemy_store();
        let mut active: Vec<PoolHandle> = Vec::new();

        for op in ops {
            if op % 2 == 0 {
                match store.acquire(&kind) {
                    Ok(handle) => {
                        prop_assert!(
                            !active.contains(&handle),
                            "handle {:?} was issued while already active",
                            handle
                        );
                        active.push(handle);
                    }
                    Err(PoolError::Exhausted { .. }) => {
                        prop_assert_eq!(active.len(), CEILING);
                    }
                    Err(other) => {
                        prop_assert!(false, "unexpected error: {}", other);
                    }
                }
            } else if !active.is_empty() {
                let index = (op as usize / 2) % active.len();
                let handle = active.remove(index);
                store.release(&handle).unwrap();
            }
        }

        prop_assert_eq!(store.active_count(&kind), active.len());
    }

    #[test]
    fn exhaustion_happens_exactly_at_the_ceiling(extra in 1usize..16) {
        let (mut store, kind) = enemy_store();

        for _ in 0..CEILING {
            prop_assert!(store.acquire(&kind).is_ok());
        }
        for _ in 0..extra {
            let result = store.acquire(&kind);
            let is_exhausted = matches!(result, Err(PoolError::Exhausted { .. }));
            prop_assert!(is_exhausted);
        }
        prop_assert_eq!(store.active_count(&kind), CEILING);
    }

    #[test]
    fn released_handles_are_reused_oldest_first(release_count in 1usize..=CEILING) {
        let (mut store, kind) = enemy_store();

        let mut handles = Vec::new();
        for _ in 0..CEILING {
            handles.push(store.acquire(&kind).unwrap());
        }

        let released: Vec<PoolHandle> = handles.drain(..release_count).collect();
        for handle in &released {
            store.release(handle).unwrap();
        }

        let reacquired: Vec<PoolHandle> = (0..release_count)
            .map(|_| store.acquire(&kind).unwrap())
            .collect();
        prop_assert_eq!(reacquired, released);
    }

    #[test]
    fn all_issued_handles_are_distinct_slots(count in 1usize..=CEILING) {
        let (mut store, kind) = enemy_store();

        let mut seen = HashSet::new();
        for _ in 0..count {
            let handle = store.acquire(&kind).unwrap();
            prop_assert!(seen.insert(handle.index()));
        }
    }
}

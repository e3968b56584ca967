//! Integration tests for object pools and the archetype registry

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use wandcraft::pool::{Initialize, Lifecycle, ObjectPool, PoolHandle, PoolRegistry, Poolable};
use wandcraft::PoolError;

#[derive(Default)]
struct Ember {
    kind: &'static str,
    active: bool,
    life: u32,
}

impl Poolable for Ember {
    fn deactivate(&mut self) {
        self.active = false;
        self.life = 0;
    }
}

impl Initialize<u32> for Ember {
    fn initialize(&mut self, life: u32) {
        self.active = true;
        self.life = life;
    }
}

fn registry() -> PoolRegistry<Ember> {
    let mut registry = PoolRegistry::new();
    registry.add_archetype(
        || Ember {
            kind: "small",
            ..Default::default()
        },
        2,
    );
    registry.add_archetype(
        || Ember {
            kind: "large",
            ..Default::default()
        },
        1,
    );
    registry
}

#[test]
fn test_registry_spawns_from_requested_archetype() {
    let mut registry = registry();
    let handle = registry.get_by_type(1, 5u32).unwrap();

    let ember = registry.get_ref(handle).unwrap();
    assert_eq!(ember.kind, "large");
    assert!(ember.active);
    assert_eq!(ember.life, 5);
    assert_eq!(registry.archetype_of(handle), Some(1));
}

#[test]
fn test_registry_rejects_unknown_archetype() {
    let mut registry = registry();
    assert_eq!(
        registry.get_by_type(7, 1u32).err(),
        Some(PoolError::InvalidArchetype { index: 7, count: 2 })
    );
    assert_eq!(registry.active_count(), 0);
}

#[test]
fn test_registry_release_routes_to_owner() {
    let mut registry = registry();
    let small = registry.get_by_type(0, 3u32).unwrap();
    let large = registry.get_by_type(1, 3u32).unwrap();

    assert_eq!(registry.release(large), Ok(1));
    assert_eq!(registry.release(small), Ok(0));
    assert_eq!(registry.active_count(), 0);

    let stats = registry.stats();
    assert_eq!(stats.len(), 2);
    assert_eq!(stats[0].total, 2);
    assert_eq!(stats[1].total, 1);
    assert!(stats.iter().all(|s| s.active == 0));
}

#[test]
fn test_handle_from_another_registry_is_foreign() {
    let mut ours = registry();
    let mut theirs = registry();
    let handle = theirs.get_by_type(0, 1u32).unwrap();

    assert_eq!(ours.release(handle), Err(PoolError::ForeignHandle));
    assert!(ours.get_ref(handle).is_none());
    // The owner still accepts it
    assert_eq!(theirs.release(handle), Ok(0));
}

#[test]
fn test_double_release_through_registry() {
    let mut registry = registry();
    let handle = registry.get_by_type(0, 1u32).unwrap();
    registry.release(handle).unwrap();

    assert_eq!(
        registry.release(handle),
        Err(PoolError::NotInUse {
            index: handle.index()
        })
    );
    assert_eq!(registry.total_stats().available, 3);
}

#[test]
fn test_clear_makes_handles_stale() {
    let mut registry = registry();
    let handle = registry.get_by_type(1, 1u32).unwrap();
    registry.clear();

    assert_eq!(registry.release(handle), Err(PoolError::StaleHandle));
    assert_eq!(registry.total_stats().total, 0);
}

#[test]
fn test_tick_active_releases_burnt_out_instances() {
    let mut registry = registry();
    registry.get_by_type(0, 1u32).unwrap();
    registry.get_by_type(0, 3u32).unwrap();
    registry.get_by_type(1, 2u32).unwrap();

    let mut released = 0;
    for _ in 0..3 {
        released += registry.tick_active(|_, ember| {
            ember.life = ember.life.saturating_sub(1);
            if ember.life == 0 {
                Lifecycle::Release
            } else {
                Lifecycle::Keep
            }
        });
    }
    assert_eq!(released, 3);
    assert_eq!(registry.active_count(), 0);
    assert!(registry.iter_active().next().is_none());
}

#[test]
fn test_seeded_random_spawns_repeat() {
    let spawn_kinds = |seed: u64| {
        let mut registry = registry();
        let mut rng = StdRng::seed_from_u64(seed);
        (0..12)
            .map(|_| {
                let handle = registry.get_random(&mut rng, 1u32).unwrap();
                registry.get_ref(handle).unwrap().kind
            })
            .collect::<Vec<_>>()
    };
    assert_eq!(spawn_kinds(9), spawn_kinds(9));
}

#[derive(Debug, Clone)]
enum Op {
    Get,
    Release(usize),
    ReleaseAll,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => Just(Op::Get),
        4 => any::<usize>().prop_map(Op::Release),
        1 => Just(Op::ReleaseAll),
    ]
}

proptest! {
    #[test]
    fn prop_occupancy_is_conserved(warmup in 0usize..6, ops in prop::collection::vec(op(), 0..64)) {
        let mut pool = ObjectPool::new(Ember::default, warmup);
        let mut held: Vec<PoolHandle> = Vec::new();

        for op in ops {
            match op {
                Op::Get => held.push(pool.acquire(2u32)),
                Op::Release(pick) => {
                    if !held.is_empty() {
                        let handle = held.swap_remove(pick % held.len());
                        prop_assert!(pool.release(handle).is_ok());
                    }
                }
                Op::ReleaseAll => {
                    prop_assert_eq!(pool.release_all(), held.len());
                    held.clear();
                }
            }

            let stats = pool.stats();
            prop_assert_eq!(stats.available + stats.active, stats.total);
            prop_assert_eq!(stats.active, held.len());
            prop_assert_eq!(pool.iter_active().count(), held.len());
            prop_assert!(pool.total_count() >= warmup);
        }
    }

    #[test]
    fn prop_released_handles_are_never_accepted_twice(count in 1usize..10) {
        let mut pool = ObjectPool::new(Ember::default, 0);
        let handles: Vec<_> = (0..count).map(|_| pool.get()).collect();
        for handle in &handles {
            prop_assert!(pool.release(*handle).is_ok());
        }
        for handle in &handles {
            prop_assert_eq!(
                pool.release(*handle),
                Err(PoolError::NotInUse { index: handle.index() })
            );
        }
        prop_assert_eq!(pool.available_count(), count);
    }
}

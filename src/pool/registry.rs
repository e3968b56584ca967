//! Multi-archetype pool registry
//!
//! Wraps one [`ObjectPool`] per archetype (enemy variant, projectile kind, ...).
//! The registry does not record where each instance came from: releasing a
//! handle scans the archetypes for the owning pool. Registries hold a handful
//! of archetypes, so the scan costs O(archetypes) per release. Callers that
//! already know the archetype can release through [`PoolRegistry::pool_mut`].

use bevy::prelude::*;
use rand::Rng;

use super::object_pool::{Initialize, Lifecycle, ObjectPool, PoolHandle, PoolStats, Poolable};
use crate::error::PoolError;

pub struct PoolRegistry<T> {
    pools: Vec<ObjectPool<T>>,
}

impl<T> Default for PoolRegistry<T> {
    fn default() -> Self {
        Self { pools: Vec::new() }
    }
}

impl<T: Poolable> PoolRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new archetype and warm its pool. Returns the archetype index.
    pub fn add_archetype(
        &mut self,
        factory: impl FnMut() -> T + Send + Sync + 'static,
        warmup: usize,
    ) -> usize {
        self.pools.push(ObjectPool::new(factory, warmup));
        self.pools.len() - 1
    }

    pub fn archetype_count(&self) -> usize {
        self.pools.len()
    }

    pub fn pool(&self, archetype: usize) -> Option<&ObjectPool<T>> {
        self.pools.get(archetype)
    }

    pub fn pool_mut(&mut self, archetype: usize) -> Option<&mut ObjectPool<T>> {
        self.pools.get_mut(archetype)
    }

    /// Pick an archetype uniformly at random and spawn from it.
    pub fn get_random<A, R>(&mut self, rng: &mut R, args: A) -> Option<PoolHandle>
    where
        T: Initialize<A>,
        R: Rng + ?Sized,
    {
        if self.pools.is_empty() {
            warn!("Random spawn requested from a registry with no archetypes");
            return None;
        }
        let archetype = rng.gen_range(0..self.pools.len());
        self.get_by_type(archetype, args).ok()
    }

    /// Spawn from a specific archetype.
    pub fn get_by_type<A>(&mut self, archetype: usize, args: A) -> Result<PoolHandle, PoolError>
    where
        T: Initialize<A>,
    {
        let count = self.pools.len();
        let Some(pool) = self.pools.get_mut(archetype) else {
            warn!(
                "Archetype index {} out of range ({} archetypes registered)",
                archetype, count
            );
            return Err(PoolError::InvalidArchetype {
                index: archetype,
                count,
            });
        };
        Ok(pool.acquire(args))
    }

    /// Which archetype issued this handle.
    pub fn archetype_of(&self, handle: PoolHandle) -> Option<usize> {
        self.pools.iter().position(|pool| pool.owns(handle))
    }

    pub fn get_ref(&self, handle: PoolHandle) -> Option<&T> {
        self.pools
            .iter()
            .find(|pool| pool.id() == handle.pool_id())?
            .get_ref(handle)
    }

    pub fn get_mut(&mut self, handle: PoolHandle) -> Option<&mut T> {
        self.pools
            .iter_mut()
            .find(|pool| pool.id() == handle.pool_id())?
            .get_mut(handle)
    }

    /// Give an instance back to whichever archetype pool owns it.
    /// Returns the archetype index on success.
    pub fn release(&mut self, handle: PoolHandle) -> Result<usize, PoolError> {
        for (archetype, pool) in self.pools.iter_mut().enumerate() {
            if pool.id() == handle.pool_id() {
                return pool.release(handle).map(|_| archetype);
            }
        }
        warn!("Rejected release of {:?}: no archetype owns it", handle);
        Err(PoolError::ForeignHandle)
    }

    /// Run per-tick behaviour over every in-use instance of every archetype.
    pub fn tick_active(&mut self, mut update: impl FnMut(usize, &mut T) -> Lifecycle) -> usize {
        self.pools
            .iter_mut()
            .enumerate()
            .map(|(archetype, pool)| pool.tick_active(|item| update(archetype, item)))
            .sum()
    }

    pub fn iter_active(&self) -> impl Iterator<Item = (PoolHandle, &T)> + '_ {
        self.pools.iter().flat_map(|pool| pool.iter_active())
    }

    pub fn iter_active_mut(&mut self) -> impl Iterator<Item = (PoolHandle, &mut T)> + '_ {
        self.pools.iter_mut().flat_map(|pool| pool.iter_active_mut())
    }

    pub fn active_count(&self) -> usize {
        self.pools.iter().map(|pool| pool.active_count()).sum()
    }

    /// Per-archetype occupancy, in archetype order.
    pub fn stats(&self) -> Vec<PoolStats> {
        self.pools.iter().map(|pool| pool.stats()).collect()
    }

    /// Occupancy summed over every archetype.
    pub fn total_stats(&self) -> PoolStats {
        self.pools.iter().fold(PoolStats::default(), |acc, pool| {
            let s = pool.stats();
            PoolStats {
                available: acc.available + s.available,
                active: acc.active + s.active,
                total: acc.total + s.total,
            }
        })
    }

    pub fn release_all(&mut self) -> usize {
        self.pools.iter_mut().map(|pool| pool.release_all()).sum()
    }

    /// Drop every instance in every archetype pool.
    pub fn clear(&mut self) {
        for pool in self.pools.iter_mut() {
            pool.clear();
        }
    }
}

//! Single-type object pool
//!
//! Instances live in a slab owned by the pool and are addressed through
//! [`PoolHandle`]s. An instance is created once (warm-up or on-demand growth),
//! handed out and reclaimed any number of times, and only dropped when the
//! pool itself is cleared or dropped. Once warmed, `get`/`release` never
//! allocate.
//!
//! Handles carry the owning pool's id and the pool generation, so releasing
//! a handle from another pool, a handle issued before [`ObjectPool::clear`],
//! or the same handle twice is detected and rejected instead of corrupting
//! the available queue.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};

use bevy::prelude::*;
use serde::Serialize;

use crate::combat::events::{Observers, ReturnedToPool, SubscriptionId};
use crate::error::PoolError;

static NEXT_POOL_ID: AtomicU32 = AtomicU32::new(1);

/// Process-unique identity of one pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoolId(u32);

impl PoolId {
    fn next() -> Self {
        PoolId(NEXT_POOL_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Stable reference to one pooled instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoolHandle {
    pool: PoolId,
    index: u32,
    generation: u32,
}

impl PoolHandle {
    pub fn pool_id(&self) -> PoolId {
        self.pool
    }

    /// Slot index of the instance inside its pool
    pub fn index(&self) -> u32 {
        self.index
    }
}

/// Behaviour every pooled entity kind provides.
pub trait Poolable {
    /// Called when the instance goes back into the available queue.
    /// Must leave the instance inert until it is initialized again.
    fn deactivate(&mut self);
}

/// Kind-specific (re)initialization with scenario data, run right after the
/// instance is taken from the pool.
pub trait Initialize<A> {
    fn initialize(&mut self, args: A);
}

/// Outcome of one per-tick update of a pooled instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Still running
    Keep,
    /// Done; give the instance back to its pool
    Release,
}

/// Snapshot of pool occupancy for HUD/telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PoolStats {
    pub available: usize,
    pub active: usize,
    pub total: usize,
}

struct PooledSlot<T> {
    value: T,
    in_use: bool,
}

type Factory<T> = Box<dyn FnMut() -> T + Send + Sync>;

pub struct ObjectPool<T> {
    id: PoolId,
    generation: u32,
    factory: Factory<T>,
    slots: Vec<PooledSlot<T>>,
    available: VecDeque<u32>,
    returned: Observers<ReturnedToPool>,
}

impl<T: Poolable> ObjectPool<T> {
    /// Create a pool and pre-create `warmup` inactive instances.
    pub fn new(factory: impl FnMut() -> T + Send + Sync + 'static, warmup: usize) -> Self {
        let mut pool = Self {
            id: PoolId::next(),
            generation: 0,
            factory: Box::new(factory),
            slots: Vec::with_capacity(warmup),
            available: VecDeque::with_capacity(warmup),
            returned: Observers::new(),
        };
        pool.warm_up(warmup);
        pool
    }

    pub fn id(&self) -> PoolId {
        self.id
    }

    /// Pre-create `count` more inactive instances.
    pub fn warm_up(&mut self, count: usize) {
        self.slots.reserve(count);
        self.available.reserve(count);
        for _ in 0..count {
            let index = self.create_instance();
            self.available.push_back(index);
        }
    }

    fn create_instance(&mut self) -> u32 {
        let mut value = (self.factory)();
        value.deactivate();
        let index = self.slots.len() as u32;
        self.slots.push(PooledSlot {
            value,
            in_use: false,
        });
        index
    }

    fn handle(&self, index: u32) -> PoolHandle {
        PoolHandle {
            pool: self.id,
            index,
            generation: self.generation,
        }
    }

    /// Take an instance out of the pool, growing it if nothing is available.
    ///
    /// The instance is marked in use but carries whatever state it was
    /// deactivated with; callers initialize it right away (see [`Self::acquire`]).
    pub fn get(&mut self) -> PoolHandle {
        let index = match self.available.pop_front() {
            Some(index) => index,
            None => self.create_instance(),
        };
        self.slots[index as usize].in_use = true;
        self.handle(index)
    }

    /// `get` followed by the instance's own initialization.
    pub fn acquire<A>(&mut self, args: A) -> PoolHandle
    where
        T: Initialize<A>,
    {
        let handle = self.get();
        self.slots[handle.index as usize].value.initialize(args);
        handle
    }

    /// Membership test: was this handle issued by this pool since the last clear?
    pub fn owns(&self, handle: PoolHandle) -> bool {
        handle.pool == self.id
            && handle.generation == self.generation
            && (handle.index as usize) < self.slots.len()
    }

    fn check(&self, handle: PoolHandle) -> Result<usize, PoolError> {
        if handle.pool != self.id {
            return Err(PoolError::ForeignHandle);
        }
        if handle.generation != self.generation || handle.index as usize >= self.slots.len() {
            return Err(PoolError::StaleHandle);
        }
        if !self.slots[handle.index as usize].in_use {
            return Err(PoolError::NotInUse {
                index: handle.index,
            });
        }
        Ok(handle.index as usize)
    }

    pub fn get_ref(&self, handle: PoolHandle) -> Option<&T> {
        let index = self.check(handle).ok()?;
        Some(&self.slots[index].value)
    }

    pub fn get_mut(&mut self, handle: PoolHandle) -> Option<&mut T> {
        let index = self.check(handle).ok()?;
        Some(&mut self.slots[index].value)
    }

    /// Deactivate an in-use instance and queue it as available.
    pub fn release(&mut self, handle: PoolHandle) -> Result<(), PoolError> {
        let index = match self.check(handle) {
            Ok(index) => index,
            Err(err) => {
                warn!("Rejected pool release of {:?}: {}", handle, err);
                return Err(err);
            }
        };
        self.release_index(index);
        Ok(())
    }

    fn release_index(&mut self, index: usize) {
        let slot = &mut self.slots[index];
        slot.value.deactivate();
        slot.in_use = false;
        self.available.push_back(index as u32);
        let handle = self.handle(index as u32);
        self.returned.emit(&ReturnedToPool(handle));
    }

    /// Run the per-tick behaviour of every in-use instance, releasing the
    /// ones that report [`Lifecycle::Release`]. Returns how many were released.
    pub fn tick_active(&mut self, mut update: impl FnMut(&mut T) -> Lifecycle) -> usize {
        let mut released = 0;
        for index in 0..self.slots.len() {
            if !self.slots[index].in_use {
                continue;
            }
            if update(&mut self.slots[index].value) == Lifecycle::Release {
                self.release_index(index);
                released += 1;
            }
        }
        released
    }

    /// Release every in-use instance without dropping anything.
    pub fn release_all(&mut self) -> usize {
        self.tick_active(|_| Lifecycle::Release)
    }

    /// Drop every owned instance, available or not. Outstanding handles
    /// become stale; the pool can be warmed up again afterwards.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.available.clear();
        self.generation = self.generation.wrapping_add(1);
    }

    pub fn iter_active(&self) -> impl Iterator<Item = (PoolHandle, &T)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.in_use)
            .map(|(index, slot)| (self.handle(index as u32), &slot.value))
    }

    pub fn iter_active_mut(&mut self) -> impl Iterator<Item = (PoolHandle, &mut T)> + '_ {
        let (id, generation) = (self.id, self.generation);
        self.slots
            .iter_mut()
            .enumerate()
            .filter(|(_, slot)| slot.in_use)
            .map(move |(index, slot)| {
                (
                    PoolHandle {
                        pool: id,
                        index: index as u32,
                        generation,
                    },
                    &mut slot.value,
                )
            })
    }

    /// Subscribe to "entity returned to pool" notifications.
    pub fn on_returned(
        &mut self,
        callback: impl FnMut(&ReturnedToPool) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.returned.subscribe(callback)
    }

    pub fn available_count(&self) -> usize {
        self.available.len()
    }

    pub fn total_count(&self) -> usize {
        self.slots.len()
    }

    pub fn active_count(&self) -> usize {
        self.slots.len() - self.available.len()
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            available: self.available_count(),
            active: self.active_count(),
            total: self.total_count(),
        }
    }
}

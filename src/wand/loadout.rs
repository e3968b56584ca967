//! Ordered slot sequence plus loadout-wide modifiers.
//!
//! Order matters: a buff only modifies spells to its left. The loadout is a
//! plain container; cursor handling and notifications live in
//! [`Wand`](super::Wand).

use std::sync::Arc;

use super::definitions::{BuffDefinition, GlobalMultipliers, SpellDefinition};
use super::slot::WandSlot;
use crate::error::CastError;

#[derive(Debug, Clone)]
pub struct WandLoadout {
    slots: Vec<WandSlot>,
    max_slots: usize,
    passive_buffs: Vec<Arc<BuffDefinition>>,
    pub global: GlobalMultipliers,
}

impl WandLoadout {
    pub fn new(max_slots: usize) -> Self {
        Self {
            slots: Vec::with_capacity(max_slots),
            max_slots,
            passive_buffs: Vec::new(),
            global: GlobalMultipliers::default(),
        }
    }

    /// Build a loadout from initial slots. Fails if there are more slots than
    /// `max_slots`.
    pub fn with_slots(slots: Vec<WandSlot>, max_slots: usize) -> Result<Self, CastError> {
        if slots.len() > max_slots {
            return Err(CastError::CapacityReached { max: max_slots });
        }
        let mut loadout = Self::new(max_slots);
        loadout.slots = slots;
        Ok(loadout)
    }

    pub fn with_passive_buff(mut self, buff: Arc<BuffDefinition>) -> Self {
        self.passive_buffs.push(buff);
        self
    }

    pub fn with_global(mut self, global: GlobalMultipliers) -> Self {
        self.global = global;
        self
    }

    pub fn slots(&self) -> &[WandSlot] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<&WandSlot> {
        self.slots.get(index)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn max_slots(&self) -> usize {
        self.max_slots
    }

    pub fn is_full(&self) -> bool {
        self.slots.len() >= self.max_slots
    }

    pub fn passive_buffs(&self) -> &[Arc<BuffDefinition>] {
        &self.passive_buffs
    }

    pub fn add_passive_buff(&mut self, buff: Arc<BuffDefinition>) {
        self.passive_buffs.push(buff);
    }

    fn check_index(&self, index: usize) -> Result<(), CastError> {
        if index >= self.slots.len() {
            return Err(CastError::InvalidIndex {
                index,
                len: self.slots.len(),
            });
        }
        Ok(())
    }

    /// Append a slot. Returns its index.
    pub fn push(&mut self, slot: WandSlot) -> Result<usize, CastError> {
        if self.is_full() {
            return Err(CastError::CapacityReached {
                max: self.max_slots,
            });
        }
        self.slots.push(slot);
        Ok(self.slots.len() - 1)
    }

    pub fn remove(&mut self, index: usize) -> Result<WandSlot, CastError> {
        self.check_index(index)?;
        Ok(self.slots.remove(index))
    }

    /// Replace a slot, returning the previous occupant.
    pub fn set(&mut self, index: usize, slot: WandSlot) -> Result<WandSlot, CastError> {
        self.check_index(index)?;
        Ok(std::mem::replace(&mut self.slots[index], slot))
    }

    pub fn swap(&mut self, a: usize, b: usize) -> Result<(), CastError> {
        self.check_index(a)?;
        self.check_index(b)?;
        self.slots.swap(a, b);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// First spell slot at or after `start`, wrapping around the end.
    pub fn next_spell_from(&self, start: usize) -> Option<(usize, Arc<SpellDefinition>)> {
        let len = self.slots.len();
        if len == 0 {
            return None;
        }
        (0..len)
            .map(|step| (start + step) % len)
            .find_map(|index| self.slots[index].as_spell().map(|spell| (index, spell.clone())))
    }

    /// Buff slots strictly to the right of `index`, left to right.
    pub fn buffs_right_of(&self, index: usize) -> impl Iterator<Item = &Arc<BuffDefinition>> {
        self.slots
            .iter()
            .skip(index.saturating_add(1))
            .filter_map(WandSlot::as_buff)
    }
}

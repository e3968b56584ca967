//! Cast controller
//!
//! [`Wand`] owns a loadout, the slot cursor and one global cooldown, and runs
//! the cast sequence:
//!
//! 1. Gate on the cooldown
//! 2. Find the next spell slot at or after the cursor, wrapping
//! 3. Compose the cast context from the caster's current aim
//! 4. Check the dispatcher can execute it
//! 5. Ask the caster to pay the mana cost
//! 6. Dispatch, start the cooldown, advance the cursor past the spell
//! 7. Notify observers, then the caster
//!
//! Any failure before step 6 leaves the wand exactly as it was: no cooldown,
//! no cursor movement, no notifications.

use bevy::prelude::*;

use super::composer::compose;
use super::context::{Aim, CastContext};
use super::cooldown::CooldownTimer;
use super::definitions::WandTier;
use super::loadout::WandLoadout;
use super::slot::WandSlot;
use crate::combat::events::{Observers, SubscriptionId, WandEvent};
use crate::error::CastError;
use crate::execution::{EffectPools, ExecutionDispatcher};
use crate::ActorId;

/// What the wand needs from whoever holds it.
pub trait Caster {
    fn actor_id(&self) -> ActorId;

    fn muzzle_position(&self) -> Vec2;

    fn aim_direction(&self) -> Vec2;

    /// Pay `amount` of mana. Returning false aborts the cast.
    fn try_spend_resource(&mut self, amount: f32) -> bool;

    /// Called after a cast went through and observers were notified.
    fn on_cast(&mut self, _context: &CastContext) {}
}

#[derive(Resource)]
pub struct Wand {
    id: String,
    display_name: String,
    tier: WandTier,
    loadout: WandLoadout,
    cursor: usize,
    cooldown: CooldownTimer,
    observers: Observers<WandEvent>,
}

impl Wand {
    pub fn new(id: impl Into<String>, loadout: WandLoadout) -> Self {
        let id = id.into();
        Self {
            display_name: id.clone(),
            id,
            tier: WandTier::default(),
            loadout,
            cursor: 0,
            cooldown: CooldownTimer::default(),
            observers: Observers::new(),
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    pub fn with_tier(mut self, tier: WandTier) -> Self {
        self.tier = tier;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn tier(&self) -> WandTier {
        self.tier
    }

    pub fn loadout(&self) -> &WandLoadout {
        &self.loadout
    }

    pub fn slots(&self) -> &[WandSlot] {
        self.loadout.slots()
    }

    pub fn slot(&self, index: usize) -> Option<&WandSlot> {
        self.loadout.slot(index)
    }

    pub fn slot_count(&self) -> usize {
        self.loadout.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current_slot(&self) -> Option<&WandSlot> {
        self.loadout.slot(self.cursor)
    }

    // === Cooldown ===

    /// Advance the cast cooldown. Call once per simulation step before any cast.
    pub fn tick(&mut self, dt: f32) {
        self.cooldown.update(dt);
    }

    pub fn is_ready(&self) -> bool {
        self.cooldown.is_ready()
    }

    pub fn cooldown(&self) -> &CooldownTimer {
        &self.cooldown
    }

    pub fn cooldown_progress(&self) -> f32 {
        self.cooldown.progress()
    }

    // === Observers ===

    pub fn subscribe(
        &mut self,
        callback: impl FnMut(&WandEvent) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.observers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    // === Casting ===

    /// Cast the next spell in the loadout.
    pub fn try_cast<C: Caster + ?Sized>(
        &mut self,
        caster: &mut C,
        dispatcher: &ExecutionDispatcher,
        pools: &mut EffectPools,
    ) -> Result<CastContext, CastError> {
        if !self.cooldown.is_ready() {
            return Err(CastError::OnCooldown);
        }

        let (index, spell) = self
            .loadout
            .next_spell_from(self.cursor)
            .ok_or(CastError::NoCastableSpell)?;

        let aim = Aim {
            position: caster.muzzle_position(),
            direction: caster.aim_direction(),
        };
        let context = compose(&spell, &self.loadout, index, caster.actor_id(), aim);

        dispatcher.validate(&context, pools)?;

        if !caster.try_spend_resource(context.mana_cost) {
            return Err(CastError::ResourceExhausted {
                required: context.mana_cost,
            });
        }

        dispatcher.dispatch(&context, pools)?;

        self.cooldown.start(context.cooldown);
        self.cursor = (index + 1) % self.loadout.len();
        debug!(
            "{} cast {} from slot {} ({:.1} dmg, next slot {})",
            context.caster,
            context.spell_name(),
            index,
            context.damage,
            self.cursor
        );

        self.observers.emit(&WandEvent::SlotChanged(self.cursor));
        self.observers.emit(&WandEvent::SpellCast(context.clone()));
        caster.on_cast(&context);

        Ok(context)
    }

    // === Slot mutation ===

    /// Append a slot. Returns its index.
    pub fn add_slot(&mut self, slot: WandSlot) -> Result<usize, CastError> {
        let index = self.loadout.push(slot.clone())?;
        self.observers.emit(&WandEvent::SlotAdded(slot));
        Ok(index)
    }

    /// Remove a slot. If the cursor ends up past the end it is clamped onto
    /// the last slot (or 0 when the loadout is now empty).
    pub fn remove_slot(&mut self, index: usize) -> Result<WandSlot, CastError> {
        let removed = self.loadout.remove(index)?;
        self.observers.emit(&WandEvent::SlotRemoved(index));

        if self.cursor >= self.loadout.len() {
            self.cursor = self.loadout.len().saturating_sub(1);
            self.observers.emit(&WandEvent::SlotChanged(self.cursor));
        }
        Ok(removed)
    }

    /// Replace a slot, returning the previous occupant.
    pub fn set_slot(&mut self, index: usize, slot: WandSlot) -> Result<WandSlot, CastError> {
        self.loadout.set(index, slot)
    }

    /// Swap two slots. Leaves the cursor and cooldown alone.
    pub fn swap_slots(&mut self, a: usize, b: usize) -> Result<(), CastError> {
        self.loadout.swap(a, b)
    }

    /// Remove every slot and reset the cursor.
    pub fn clear_slots(&mut self) {
        self.loadout.clear();
        self.cursor = 0;
        self.observers.emit(&WandEvent::SlotChanged(0));
    }

    /// Point the cursor at a slot.
    pub fn select_slot(&mut self, index: usize) -> Result<(), CastError> {
        if index >= self.loadout.len() {
            return Err(CastError::InvalidIndex {
                index,
                len: self.loadout.len(),
            });
        }
        if self.cursor != index {
            self.cursor = index;
            self.observers.emit(&WandEvent::SlotChanged(index));
        }
        Ok(())
    }
}

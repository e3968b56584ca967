//! Modifier composition
//!
//! Resolves a spell's final runtime parameters from its definition and the
//! loadout around it. Application order:
//!
//! 1. Passive buffs of the loadout that match the spell
//! 2. Buff slots strictly to the right of the spell, left to right, that match
//! 3. The loadout's global multipliers, unconditionally
//!
//! Buffs to the left of the spell never apply, even when the cast cursor
//! reached the spell by wrapping around past them.
//!
//! ## Stacking
//! Each multiplicative channel (damage, mana, cooldown, speed) is resolved as
//! `override.unwrap_or(product * (1 + bonus))` where `Multiplicative` buffs
//! multiply into `product`, `Additive` buffs add `factor - 1` to `bonus`, and
//! `Override` buffs replace the value (the last one applied wins). Pierce and
//! crit chance always add; the crit multiplier takes the highest value seen.
//! Range is never modified.

use std::sync::Arc;

use super::context::{Aim, CastContext};
use super::definitions::{BuffDefinition, SpellDefinition, StackingMode};
use super::loadout::WandLoadout;
use crate::ActorId;

#[derive(Debug, Clone, Copy)]
struct Channel {
    product: f32,
    bonus: f32,
    override_value: Option<f32>,
}

impl Default for Channel {
    fn default() -> Self {
        Self {
            product: 1.0,
            bonus: 0.0,
            override_value: None,
        }
    }
}

impl Channel {
    fn apply(&mut self, factor: f32, mode: StackingMode) {
        match mode {
            StackingMode::Multiplicative => self.product *= factor,
            StackingMode::Additive => self.bonus += factor - 1.0,
            StackingMode::Override => self.override_value = Some(factor),
        }
    }

    fn resolve(&self) -> f32 {
        self.override_value
            .unwrap_or(self.product * (1.0 + self.bonus))
            .max(0.0)
    }
}

#[derive(Debug, Clone, Copy)]
struct Modifiers {
    damage: Channel,
    mana: Channel,
    cooldown: Channel,
    speed: Channel,
    pierce: u32,
    crit_chance: f32,
    crit_multiplier: f32,
}

impl Modifiers {
    fn new(base_crit_multiplier: f32) -> Self {
        Self {
            damage: Channel::default(),
            mana: Channel::default(),
            cooldown: Channel::default(),
            speed: Channel::default(),
            pierce: 0,
            crit_chance: 0.0,
            crit_multiplier: base_crit_multiplier,
        }
    }

    fn apply(&mut self, buff: &BuffDefinition) {
        self.damage.apply(buff.damage_multiplier, buff.stacking);
        self.mana.apply(buff.mana_multiplier, buff.stacking);
        self.cooldown.apply(buff.cooldown_multiplier, buff.stacking);
        self.speed.apply(buff.speed_multiplier, buff.stacking);
        self.pierce += buff.pierce_bonus;
        self.crit_chance += buff.crit_chance_bonus;
        self.crit_multiplier = self.crit_multiplier.max(buff.crit_multiplier);
    }
}

/// Resolve the cast of `spell`, sitting at `spell_slot_index` in `loadout`,
/// for a caster currently at `aim`.
pub fn compose(
    spell: &Arc<SpellDefinition>,
    loadout: &WandLoadout,
    spell_slot_index: usize,
    caster: ActorId,
    aim: Aim,
) -> CastContext {
    let mut mods = Modifiers::new(spell.crit_multiplier);

    let matching_passives = loadout.passive_buffs().iter().filter(|b| b.affects(spell));
    let matching_slots = loadout
        .buffs_right_of(spell_slot_index)
        .filter(|b| b.affects(spell));
    for buff in matching_passives.chain(matching_slots) {
        mods.apply(buff);
    }

    let global = loadout.global;
    CastContext {
        damage: spell.damage * mods.damage.resolve() * global.damage,
        mana_cost: spell.mana_cost * mods.mana.resolve() * global.mana,
        cooldown: spell.cooldown * mods.cooldown.resolve() * global.cooldown,
        projectile_speed: spell.speed * mods.speed.resolve(),
        range: spell.range,
        pierce: spell.pierce + mods.pierce,
        crit_chance: mods.crit_chance.clamp(0.0, 1.0),
        crit_multiplier: mods.crit_multiplier,
        spawn_position: aim.position,
        direction: aim.direction.normalize_or_zero(),
        caster,
        spell: spell.clone(),
    }
}

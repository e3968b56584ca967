use std::sync::Arc;

use bevy::prelude::*;

use super::definitions::{ExecutionKind, SpellDefinition};
use crate::ActorId;

/// Where the caster is and where it is pointing, read when a cast is composed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aim {
    pub position: Vec2,
    pub direction: Vec2,
}

impl Default for Aim {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            direction: Vec2::X,
        }
    }
}

/// Fully resolved parameters of one cast.
///
/// Built by the composer, handed to exactly one dispatch and then only read.
#[derive(Debug, Clone)]
pub struct CastContext {
    pub damage: f32,
    pub mana_cost: f32,
    pub cooldown: f32,
    pub projectile_speed: f32,
    pub range: f32,
    pub pierce: u32,
    /// 0.0-1.0
    pub crit_chance: f32,
    pub crit_multiplier: f32,
    pub spawn_position: Vec2,
    /// Unit aim direction (zero if the caster had no aim)
    pub direction: Vec2,
    pub caster: ActorId,
    pub spell: Arc<SpellDefinition>,
}

impl CastContext {
    pub fn execution(&self) -> ExecutionKind {
        self.spell.execution
    }

    pub fn spell_name(&self) -> &str {
        self.spell.name()
    }

    /// Seconds a projectile flies before expiring: range / speed.
    pub fn lifetime(&self) -> f32 {
        if self.projectile_speed <= 0.0 {
            return 0.0;
        }
        self.range / self.projectile_speed
    }

    /// Spawn position shifted by the spell's offset: x along the aim
    /// direction, y world-vertical.
    pub fn effect_origin(&self) -> Vec2 {
        let offset = self.spell.spawn_offset();
        self.spawn_position + self.direction * offset.x + Vec2::Y * offset.y
    }

    /// Damage for one hit given a uniform roll in [0, 1).
    pub fn roll_damage(&self, roll: f32) -> (f32, bool) {
        roll_critical(self.damage, self.crit_chance, self.crit_multiplier, roll)
    }
}

/// Returns (damage, is_critical) for a uniform roll in [0, 1).
pub fn roll_critical(damage: f32, crit_chance: f32, crit_multiplier: f32, roll: f32) -> (f32, bool) {
    if roll < crit_chance {
        (damage * crit_multiplier, true)
    } else {
        (damage, false)
    }
}

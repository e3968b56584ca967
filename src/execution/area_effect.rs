//! Pooled area effects
//!
//! An area effect damages every damageable target inside its radius once,
//! on activation, and then lingers (for visuals and lifetime bookkeeping)
//! without dealing further damage until its lifetime runs out.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::dispatcher::{check_archetype, EffectPools, ExecutionHandler};
use super::HitReport;
use crate::combat::health::Damageable;
use crate::error::CastError;
use crate::pool::{Initialize, Lifecycle, PoolHandle, Poolable};
use crate::wand::context::{roll_critical, CastContext};
use crate::wand::definitions::SpellDefinition;
use crate::ActorId;

fn one() -> f32 {
    1.0
}

/// Authored area-effect kind (one pool per archetype)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AreaEffectArchetype {
    pub name: String,
    #[serde(default = "one")]
    pub radius: f32,
    /// Seconds the effect stays alive unless the spell overrides it
    #[serde(default = "one")]
    pub lifetime: f32,
}

impl Default for AreaEffectArchetype {
    fn default() -> Self {
        Self {
            name: "burst".to_string(),
            radius: 1.0,
            lifetime: 1.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AreaEffect {
    active: bool,
    /// Waiting for its single strike
    armed: bool,
    radius: f32,
    base_lifetime: f32,
    lifetime: f32,
    position: Vec2,
    damage: f32,
    crit_chance: f32,
    crit_multiplier: f32,
    caster: ActorId,
    spell: Option<Arc<SpellDefinition>>,
}

impl AreaEffect {
    pub fn new(archetype: &AreaEffectArchetype) -> Self {
        Self {
            active: false,
            armed: false,
            radius: archetype.radius.max(0.0),
            base_lifetime: archetype.lifetime.max(0.0),
            lifetime: 0.0,
            position: Vec2::ZERO,
            damage: 0.0,
            crit_chance: 0.0,
            crit_multiplier: 1.0,
            caster: ActorId::default(),
            spell: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_armed(&self) -> bool {
        self.active && self.armed
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn lifetime(&self) -> f32 {
        self.lifetime
    }

    pub fn caster(&self) -> ActorId {
        self.caster
    }

    pub fn spell_name(&self) -> Option<&str> {
        self.spell.as_deref().map(SpellDefinition::name)
    }

    pub fn contains(&self, point: Vec2, radius: f32) -> bool {
        let reach = self.radius + radius;
        self.position.distance_squared(point) <= reach * reach
    }

    pub fn tick(&mut self, dt: f32) -> Lifecycle {
        if !self.active {
            return Lifecycle::Release;
        }
        self.lifetime -= dt;
        if self.lifetime <= 0.0 {
            Lifecycle::Release
        } else {
            Lifecycle::Keep
        }
    }

    /// Damage every living target in range (except the caster) and disarm.
    /// Calls after the first return nothing. `roll` yields uniform values in
    /// [0, 1) for crit checks, one per target hit.
    pub fn strike<'a, D, I>(&mut self, targets: I, mut roll: impl FnMut() -> f32) -> Vec<HitReport>
    where
        D: Damageable + 'a,
        I: IntoIterator<Item = &'a mut D>,
    {
        if !self.is_armed() {
            return Vec::new();
        }
        self.armed = false;

        let mut hits = Vec::new();
        for target in targets {
            let id = target.actor_id();
            if id == self.caster
                || !target.is_alive()
                || !self.contains(target.position(), target.hit_radius())
            {
                continue;
            }
            let (amount, is_critical) =
                roll_critical(self.damage, self.crit_chance, self.crit_multiplier, roll());
            let outcome = target.take_damage(amount, self.caster);
            hits.push(HitReport {
                source: self.caster,
                target: id,
                amount: outcome.dealt,
                is_critical,
                killed: outcome.killed,
            });
        }
        hits
    }
}

impl Poolable for AreaEffect {
    fn deactivate(&mut self) {
        self.active = false;
        self.armed = false;
        self.lifetime = 0.0;
        self.position = Vec2::ZERO;
        self.damage = 0.0;
        self.spell = None;
    }
}

impl<'a> Initialize<&'a CastContext> for AreaEffect {
    fn initialize(&mut self, context: &'a CastContext) {
        self.active = true;
        self.armed = true;
        self.position = context.effect_origin();
        self.lifetime = context.spell.effect_duration.unwrap_or(self.base_lifetime);
        self.damage = context.damage;
        self.crit_chance = context.crit_chance;
        self.crit_multiplier = context.crit_multiplier;
        self.caster = context.caster;
        self.spell = Some(context.spell.clone());
    }
}

/// Spawns a pooled area effect at the spell's offset from the caster.
pub struct AreaEffectHandler;

impl ExecutionHandler for AreaEffectHandler {
    fn validate(&self, context: &CastContext, pools: &EffectPools) -> Result<(), CastError> {
        check_archetype(&pools.area_effects, context, "area effect")
    }

    fn execute(
        &self,
        context: &CastContext,
        pools: &mut EffectPools,
    ) -> Result<PoolHandle, CastError> {
        let handle = pools
            .area_effects
            .get_by_type(context.spell.effect_archetype, context)?;
        Ok(handle)
    }
}

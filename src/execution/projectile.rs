//! Pooled projectiles
//!
//! A projectile flies along its aim for `range / speed` seconds. Each
//! damageable target it touches is hit at most once; every hit uses up one
//! point of pierce and the projectile is spent once pierce drops below zero,
//! so a projectile with pierce `p` hits `p + 1` targets. Obstacles stop it
//! outright. Its own caster is never hit.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::sync::Arc;

use super::dispatcher::{check_archetype, EffectPools, ExecutionHandler};
use super::HitReport;
use crate::combat::health::Damageable;
use crate::error::CastError;
use crate::pool::{Initialize, Lifecycle, PoolHandle, Poolable};
use crate::wand::context::{roll_critical, CastContext};
use crate::wand::definitions::SpellDefinition;
use crate::ActorId;

fn default_projectile_radius() -> f32 {
    0.25
}

/// Authored projectile kind (one pool per archetype)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProjectileArchetype {
    pub name: String,
    #[serde(default = "default_projectile_radius")]
    pub radius: f32,
}

impl Default for ProjectileArchetype {
    fn default() -> Self {
        Self {
            name: "bolt".to_string(),
            radius: default_projectile_radius(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Projectile {
    active: bool,
    radius: f32,
    position: Vec2,
    velocity: Vec2,
    damage: f32,
    crit_chance: f32,
    crit_multiplier: f32,
    /// Hits left before the projectile is spent; -1 = spent
    remaining_pierce: i64,
    /// Seconds until expiry
    lifetime: f32,
    caster: ActorId,
    spell: Option<Arc<SpellDefinition>>,
    already_hit: SmallVec<[ActorId; 4]>,
}

impl Projectile {
    pub fn new(archetype: &ProjectileArchetype) -> Self {
        Self {
            active: false,
            radius: archetype.radius.max(0.0),
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            damage: 0.0,
            crit_chance: 0.0,
            crit_multiplier: 1.0,
            remaining_pierce: -1,
            lifetime: 0.0,
            caster: ActorId::default(),
            spell: None,
            already_hit: SmallVec::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn damage(&self) -> f32 {
        self.damage
    }

    pub fn caster(&self) -> ActorId {
        self.caster
    }

    pub fn lifetime(&self) -> f32 {
        self.lifetime
    }

    pub fn remaining_pierce(&self) -> i64 {
        self.remaining_pierce
    }

    pub fn spell_name(&self) -> Option<&str> {
        self.spell.as_deref().map(SpellDefinition::name)
    }

    /// No more targets may be hit; the projectile should go back to its pool.
    pub fn is_spent(&self) -> bool {
        !self.active || self.remaining_pierce < 0
    }

    /// Count down the lifetime. Movement is integrated separately by [`Self::advance`].
    pub fn tick(&mut self, dt: f32) -> Lifecycle {
        if !self.active {
            return Lifecycle::Release;
        }
        self.lifetime -= dt;
        if self.lifetime <= 0.0 || self.is_spent() {
            Lifecycle::Release
        } else {
            Lifecycle::Keep
        }
    }

    pub fn advance(&mut self, dt: f32) {
        if self.active {
            self.position += self.velocity * dt;
        }
    }

    /// Circle overlap test against something at `point` with `radius`.
    pub fn overlaps(&self, point: Vec2, radius: f32) -> bool {
        let reach = self.radius + radius;
        self.position.distance_squared(point) <= reach * reach
    }

    /// Hit `target` if it is a valid, not yet hit victim. `crit_roll` is a
    /// uniform roll in [0, 1).
    pub fn try_hit<D: Damageable + ?Sized>(
        &mut self,
        target: &mut D,
        crit_roll: f32,
    ) -> Option<HitReport> {
        let id = target.actor_id();
        if self.is_spent()
            || id == self.caster
            || !target.is_alive()
            || self.already_hit.contains(&id)
        {
            return None;
        }

        let (amount, is_critical) =
            roll_critical(self.damage, self.crit_chance, self.crit_multiplier, crit_roll);
        let outcome = target.take_damage(amount, self.caster);
        self.already_hit.push(id);
        self.remaining_pierce -= 1;

        Some(HitReport {
            source: self.caster,
            target: id,
            amount: outcome.dealt,
            is_critical,
            killed: outcome.killed,
        })
    }

    /// Colliding with something that cannot be damaged ends the flight.
    pub fn hit_obstacle(&mut self) -> Lifecycle {
        self.remaining_pierce = -1;
        Lifecycle::Release
    }
}

impl Poolable for Projectile {
    fn deactivate(&mut self) {
        self.active = false;
        self.position = Vec2::ZERO;
        self.velocity = Vec2::ZERO;
        self.damage = 0.0;
        self.remaining_pierce = -1;
        self.lifetime = 0.0;
        self.spell = None;
        self.already_hit.clear();
    }
}

impl<'a> Initialize<&'a CastContext> for Projectile {
    fn initialize(&mut self, context: &'a CastContext) {
        self.active = true;
        self.position = context.effect_origin();
        self.velocity = context.direction * context.projectile_speed;
        self.damage = context.damage;
        self.crit_chance = context.crit_chance;
        self.crit_multiplier = context.crit_multiplier;
        self.remaining_pierce = i64::from(context.pierce);
        self.lifetime = context.lifetime();
        self.caster = context.caster;
        self.spell = Some(context.spell.clone());
        self.already_hit.clear();
    }
}

/// Spawns a pooled projectile from the spell's projectile archetype.
pub struct ProjectileHandler;

impl ExecutionHandler for ProjectileHandler {
    fn validate(&self, context: &CastContext, pools: &EffectPools) -> Result<(), CastError> {
        check_archetype(&pools.projectiles, context, "projectile")
    }

    fn execute(
        &self,
        context: &CastContext,
        pools: &mut EffectPools,
    ) -> Result<PoolHandle, CastError> {
        let handle = pools
            .projectiles
            .get_by_type(context.spell.effect_archetype, context)?;
        Ok(handle)
    }
}

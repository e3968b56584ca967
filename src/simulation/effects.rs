//! Projectile and area-effect systems

use bevy::prelude::*;

use crate::combat::events::DamageEvent;
use crate::combat::health::Damageable;
use crate::combat::log::{CombatLog, CombatLogEventType};
use crate::execution::EffectPools;
use crate::pool::PoolHandle;

use super::components::{GameRng, Obstacles};
use super::enemies::Enemies;

/// Count down effect lifetimes and return expired effects to their pools.
pub fn tick_effects(time: Res<Time>, mut pools: ResMut<EffectPools>, mut combat_log: ResMut<CombatLog>) {
    let dt = time.delta_secs();
    let expired = pools.projectiles.tick_active(|_, projectile| projectile.tick(dt))
        + pools.area_effects.tick_active(|_, effect| effect.tick(dt));
    if expired > 0 {
        combat_log.log(
            CombatLogEventType::PoolReturn,
            format!("{} effect(s) returned to their pools", expired),
        );
    }
}

/// FixedUpdate: integrate projectile flight.
pub fn move_projectiles(time: Res<Time>, mut pools: ResMut<EffectPools>) {
    let dt = time.delta_secs();
    for (_, projectile) in pools.projectiles.iter_active_mut() {
        projectile.advance(dt);
    }
}

pub fn resolve_projectile_hits(
    mut pools: ResMut<EffectPools>,
    mut enemies: ResMut<Enemies>,
    obstacles: Res<Obstacles>,
    mut rng: ResMut<GameRng>,
    mut damage_events: EventWriter<DamageEvent>,
) {
    let mut finished: Vec<PoolHandle> = Vec::new();

    for (handle, projectile) in pools.projectiles.iter_active_mut() {
        if obstacles.blocks(projectile.position(), projectile.radius()) {
            projectile.hit_obstacle();
            finished.push(handle);
            continue;
        }

        for (_, enemy) in enemies.iter_mut() {
            if projectile.is_spent() {
                break;
            }
            if !projectile.overlaps(enemy.position(), enemy.hit_radius()) {
                continue;
            }
            let roll = rng.random_f32();
            if let Some(hit) = projectile.try_hit(enemy, roll) {
                damage_events.send(DamageEvent::from_hit(&hit, projectile.spell_name()));
            }
        }

        if projectile.is_spent() {
            finished.push(handle);
        }
    }

    for handle in finished {
        if let Err(e) = pools.projectiles.release(handle) {
            warn!("Projectile release failed: {}", e);
        }
    }
}

/// Newly spawned area effects strike once; lingering ones do nothing here.
pub fn resolve_area_effects(
    mut pools: ResMut<EffectPools>,
    mut enemies: ResMut<Enemies>,
    mut rng: ResMut<GameRng>,
    mut damage_events: EventWriter<DamageEvent>,
) {
    for (_, effect) in pools.area_effects.iter_active_mut() {
        if !effect.is_armed() {
            continue;
        }
        let hits = effect.strike(
            enemies.iter_mut().map(|(_, enemy)| enemy),
            || rng.random_f32(),
        );
        let spell_name = effect.spell_name();
        for hit in &hits {
            damage_events.send(DamageEvent::from_hit(hit, spell_name));
        }
    }
}

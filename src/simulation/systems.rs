//! Simulation Systems API
//!
//! Stable re-exports of the simulation systems plus their ordering. The
//! headless runner and tests import from here rather than from the
//! individual modules.
//!
//! ## System Phases
//!
//! Simulation systems run in three ordered phases each frame:
//!
//! 1. **Timers** - Wand cooldown, mana regen, contact timers, effect lifetimes
//! 2. **Casting** - Aim, cast requests, enemy spawning
//! 3. **Resolution** - Hits, contact damage, deaths, rewards, combat log
//!
//! Movement (projectile flight, enemy chase) integrates in `FixedUpdate`.
//!
//! ## Usage
//!
//! ```ignore
//! use crate::simulation::systems;
//!
//! systems::configure_simulation_ordering(&mut app);
//! systems::add_simulation_systems(&mut app, resource_exists::<Wand>);
//! ```

use bevy::prelude::*;

// === Phase 1: Timers ===
pub use super::casting::{regenerate_player, tick_wand};
pub use super::effects::tick_effects;
pub use super::enemies::{tick_enemies, tick_spawner};
pub use super::logging::advance_log_clock;

// === Phase 2: Casting ===
pub use super::casting::{aim_at_nearest_enemy, process_cast_requests, request_autocast};
pub use super::enemies::spawn_enemies;

// === Phase 3: Resolution ===
pub use super::effects::{resolve_area_effects, resolve_projectile_hits};
pub use super::enemies::{apply_contact_damage, release_dead_enemies};
pub use super::logging::record_combat_log;
pub use super::rewards::grant_rewards;

// === Fixed step ===
pub use super::effects::move_projectiles;
pub use super::enemies::chase_player;

/// System set labels for simulation ordering.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationPhase {
    /// Phase 1: countdowns and regeneration
    Timers,
    /// Phase 2: aiming, casting, spawning
    Casting,
    /// Phase 3: damage, deaths, rewards
    Resolution,
}

/// Configures the ordering between simulation phases.
///
/// Call this once during app setup before adding simulation systems.
pub fn configure_simulation_ordering(app: &mut App) {
    app.configure_sets(
        Update,
        (
            SimulationPhase::Timers,
            SimulationPhase::Casting,
            SimulationPhase::Resolution,
        )
            .chain(),
    );
}

/// Adds the simulation systems to the app.
///
/// # Arguments
/// * `app` - The Bevy App to add systems to
/// * `run_condition` - Gate for every simulation system (e.g. `resource_exists::<Wand>`)
pub fn add_simulation_systems<M>(app: &mut App, run_condition: impl Condition<M> + Clone)
where
    M: 'static,
{
    // Phase 1: Timers
    app.add_systems(
        Update,
        (
            advance_log_clock,
            tick_wand,
            regenerate_player,
            tick_spawner,
            tick_enemies,
            tick_effects,
        )
            .chain()
            .in_set(SimulationPhase::Timers)
            .run_if(run_condition.clone()),
    );

    // Phase 2: Casting
    app.add_systems(
        Update,
        (
            aim_at_nearest_enemy,
            request_autocast,
            process_cast_requests,
            spawn_enemies,
        )
            .chain()
            .in_set(SimulationPhase::Casting)
            .run_if(run_condition.clone()),
    );

    // Phase 3: Resolution
    app.add_systems(
        Update,
        (
            resolve_projectile_hits,
            resolve_area_effects,
            apply_contact_damage,
            release_dead_enemies,
            grant_rewards,
            record_combat_log,
        )
            .chain()
            .in_set(SimulationPhase::Resolution)
            .run_if(run_condition.clone()),
    );

    app.add_systems(
        FixedUpdate,
        (move_projectiles, chase_player)
            .chain()
            .run_if(run_condition),
    );
}

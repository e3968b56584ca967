//! Simulation
//!
//! The bevy side of wandcraft: a player holding a wand, pooled enemies that
//! chase them, pooled projectiles and area effects, kill rewards and the
//! combat log, all advanced by the phases in [`systems`].

pub mod casting;
pub mod components;
pub mod effects;
pub mod enemies;
pub mod logging;
pub mod rewards;
pub mod systems;

use bevy::prelude::*;

use crate::combat::CombatPlugin;
use crate::error::ContentError;
use crate::execution::{EffectPools, ExecutionDispatcher};
use crate::settings::SimSettings;
use crate::wand::{ContentLibrary, Wand};

pub use components::{GameRng, Obstacle, Obstacles, Player};
pub use enemies::{Enemies, Enemy, EnemyArchetype, EnemySpawner};
pub use rewards::{RewardOption, RewardSystem};
pub use systems::SimulationPhase;

/// Sets up every simulation resource and schedules the simulation systems.
///
/// The wand is instantiated from the content library when the plugin is
/// built. [`WandcraftPlugin::new`] checks that this will succeed.
pub struct WandcraftPlugin {
    pub settings: SimSettings,
    pub library: ContentLibrary,
    pub wand_id: String,
    pub enemies: Vec<EnemyArchetype>,
    pub obstacles: Vec<Obstacle>,
    pub player_position: Vec2,
    /// None = seed from entropy
    pub seed: Option<u64>,
}

impl WandcraftPlugin {
    pub fn new(
        settings: SimSettings,
        library: ContentLibrary,
        wand_id: impl Into<String>,
    ) -> Result<Self, ContentError> {
        let wand_id = wand_id.into();
        library.instantiate_wand(&wand_id)?;
        Ok(Self {
            settings,
            library,
            wand_id,
            enemies: vec![EnemyArchetype::default()],
            obstacles: Vec::new(),
            player_position: Vec2::ZERO,
            seed: None,
        })
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_enemies(mut self, enemies: Vec<EnemyArchetype>) -> Self {
        self.enemies = enemies;
        self
    }

    pub fn with_obstacles(mut self, obstacles: Vec<Obstacle>) -> Self {
        self.obstacles = obstacles;
        self
    }

    pub fn with_player_position(mut self, position: Vec2) -> Self {
        self.player_position = position;
        self
    }
}

impl Plugin for WandcraftPlugin {
    fn build(&self, app: &mut App) {
        let settings = &self.settings;

        let rng = match self.seed {
            Some(seed) => {
                info!("Using deterministic RNG with seed: {}", seed);
                GameRng::from_seed(seed)
            }
            None => GameRng::from_entropy(),
        };

        app.add_plugins(CombatPlugin)
            .insert_resource(settings.clone())
            .insert_resource(Time::<Fixed>::from_hz(settings.fixed_hz))
            .insert_resource(rng)
            .insert_resource(self.library.clone())
            .insert_resource(ExecutionDispatcher::default())
            .insert_resource(EffectPools::with_archetypes(
                &settings.pools.projectiles,
                &settings.pools.area_effects,
                settings.pools.projectile_warmup,
                settings.pools.area_effect_warmup,
            ))
            .insert_resource(Enemies::new(self.enemies.clone(), settings.pools.enemy_warmup))
            .insert_resource(EnemySpawner::from_settings(&settings.spawner))
            .insert_resource(RewardSystem::from_settings(&settings.rewards))
            .insert_resource(Player::from_settings(&settings.player).at(self.player_position))
            .insert_resource(Obstacles(self.obstacles.clone()));

        match self.library.instantiate_wand(&self.wand_id) {
            Ok(wand) => {
                info!(
                    "Equipped {} ({} slots, capacity {})",
                    wand.display_name(),
                    wand.slot_count(),
                    wand.loadout().max_slots()
                );
                app.insert_resource(wand);
            }
            // Without a wand the simulation systems stay idle
            Err(e) => error!("Could not equip wand '{}': {}", self.wand_id, e),
        }

        systems::configure_simulation_ordering(app);
        systems::add_simulation_systems(app, resource_exists::<Wand>);
    }
}

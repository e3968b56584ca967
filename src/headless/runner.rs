//! Headless scenario execution
//!
//! Runs a scenario without any graphical output on a manual time step, so a
//! seeded run produces the same result on every machine.

use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::combat::health::Damageable;
use crate::combat::log::{CombatLog, CombatLogEventType, NamedPoolStats, SessionMetadata};
use crate::execution::EffectPools;
use crate::settings::SimSettings;
use crate::simulation::systems::SimulationPhase;
use crate::simulation::{Enemies, EnemySpawner, GameRng, Player, RewardSystem, WandcraftPlugin};
use crate::wand::{ContentLibrary, Wand, WandSlot};
use crate::ActorId;

use super::config::ScenarioConfig;

/// Result of a completed headless scenario
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    pub wand: String,
    /// Random seed used (if deterministic mode)
    pub random_seed: Option<u64>,
    /// Simulated seconds until the scenario ended
    pub duration_secs: f32,
    pub player_survived: bool,
    pub final_health: f32,
    pub final_mana: f32,
    pub casts: u32,
    pub kills: u32,
    pub enemies_spawned: u32,
    /// Damage the player dealt
    pub damage_dealt: f32,
    /// Damage the player took
    pub damage_taken: f32,
    pub damage_by_spell: BTreeMap<String, f32>,
    /// Rewards taken, in order
    pub rewards: Vec<String>,
    /// Slot names at the end of the run
    pub final_slots: Vec<String>,
    pub pools: Vec<NamedPoolStats>,
    /// Where the combat log was written, if it was
    pub log_path: Option<String>,
}

/// Resource to track headless scenario state
#[derive(Resource, Debug)]
pub struct ScenarioState {
    /// Maximum duration before the scenario ends
    pub max_duration: f32,
    /// Elapsed simulated time
    pub elapsed_time: f32,
    pub complete: bool,
}

/// Plugin for headless scenario bookkeeping
pub struct ScenarioPlugin {
    pub max_duration: f32,
}

impl Plugin for ScenarioPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ScenarioState {
            max_duration: self.max_duration,
            elapsed_time: 0.0,
            complete: false,
        })
        .add_systems(Startup, scenario_start)
        .add_systems(
            Update,
            (scenario_track_time, scenario_check_end)
                .chain()
                .after(SimulationPhase::Resolution),
        );
    }
}

fn scenario_start(wand: Option<Res<Wand>>, mut combat_log: ResMut<CombatLog>) {
    combat_log.clear();
    let name = wand.as_deref().map_or("no wand", Wand::display_name);
    combat_log.log(
        CombatLogEventType::SessionEvent,
        format!("Scenario started with {}", name),
    );
}

fn scenario_track_time(time: Res<Time>, mut state: ResMut<ScenarioState>) {
    if !state.complete {
        state.elapsed_time += time.delta_secs();
    }
}

/// The scenario ends when the player dies or time runs out.
fn scenario_check_end(
    player: Res<Player>,
    mut state: ResMut<ScenarioState>,
    mut combat_log: ResMut<CombatLog>,
) {
    if state.complete {
        return;
    }
    if !player.is_alive() {
        info!("Player died after {:.1}s", state.elapsed_time);
        state.complete = true;
    } else if state.elapsed_time >= state.max_duration {
        info!("Scenario timed out after {:.1}s", state.elapsed_time);
        state.complete = true;
    }
    if state.complete {
        combat_log.log(
            CombatLogEventType::SessionEvent,
            format!("Scenario ended at {:.1}s", state.elapsed_time),
        );
    }
}

/// Build a ready-to-step scenario app. Nothing has run yet. `logging`
/// installs bevy's `LogPlugin`, which may only happen once per process.
pub fn build_scenario_app(config: &ScenarioConfig, logging: bool) -> Result<App, String> {
    config.validate()?;
    let settings = config.settings();
    let library = ContentLibrary::load(&config.content_path).map_err(|e| e.to_string())?;
    let plugin = WandcraftPlugin::new(settings.clone(), library, config.wand.clone())
        .map_err(|e| e.to_string())?
        .with_seed(config.random_seed)
        .with_enemies(config.enemy_archetypes())
        .with_obstacles(config.obstacles.clone())
        .with_player_position(config.player_position());

    let mut app = App::new();
    if logging {
        app.add_plugins(LogPlugin::default());
    }
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            1.0 / settings.frame_rate,
        )))
        .add_plugins(plugin)
        .add_plugins(ScenarioPlugin {
            max_duration: config.max_duration_secs,
        });
    app.finish();
    app.cleanup();
    Ok(app)
}

/// Run a headless scenario to completion
pub fn run_scenario(config: &ScenarioConfig, logging: bool) -> Result<ScenarioResult, String> {
    let mut app = build_scenario_app(config, logging)?;
    info!(
        "Starting scenario: wand '{}', up to {:.0}s, seed {:?}",
        config.wand, config.max_duration_secs, config.random_seed
    );
    let frame_rate = app
        .world()
        .get_resource::<SimSettings>()
        .map_or(60.0, |settings| settings.frame_rate);
    // One spare second of frames covers the zero-length first frame and float drift
    let max_frames = ((f64::from(config.max_duration_secs) + 1.0) * frame_rate).ceil() as u64;

    for _ in 0..max_frames {
        app.update();
        if app
            .world()
            .get_resource::<ScenarioState>()
            .map_or(true, |state| state.complete)
        {
            break;
        }
    }

    let mut result = collect_result(app.world(), config)?;
    if let Some(path) = &config.output_path {
        let metadata = SessionMetadata {
            wand: result.wand.clone(),
            random_seed: result.random_seed,
            duration_secs: result.duration_secs,
            player_survived: result.player_survived,
            pools: result.pools.clone(),
        };
        let combat_log = resource::<CombatLog>(app.world())?;
        result.log_path = Some(combat_log.save_to_file(&metadata, Some(path))?);
    }

    info!(
        "Scenario complete: {} casts, {} kills, {:.0} damage dealt, survived: {}",
        result.casts, result.kills, result.damage_dealt, result.player_survived
    );
    Ok(result)
}

fn resource<R: Resource>(world: &World) -> Result<&R, String> {
    world
        .get_resource::<R>()
        .ok_or_else(|| format!("Missing resource {}", std::any::type_name::<R>()))
}

fn collect_result(world: &World, config: &ScenarioConfig) -> Result<ScenarioResult, String> {
    let player = resource::<Player>(world)?;
    let wand = resource::<Wand>(world)?;
    let combat_log = resource::<CombatLog>(world)?;
    let state = resource::<ScenarioState>(world)?;
    let rewards = resource::<RewardSystem>(world)?;
    let spawner = resource::<EnemySpawner>(world)?;
    let seed = resource::<GameRng>(world)?.seed;

    Ok(ScenarioResult {
        wand: wand.id().to_string(),
        random_seed: seed.or(config.random_seed),
        duration_secs: state.elapsed_time,
        player_survived: player.is_alive(),
        final_health: player.health.current(),
        final_mana: player.mana.current(),
        casts: player.casts(),
        kills: rewards.total_kills(),
        enemies_spawned: spawner.spawned(),
        damage_dealt: combat_log.damage_dealt_by(ActorId::PLAYER),
        damage_taken: combat_log.damage_taken_by(ActorId::PLAYER),
        damage_by_spell: combat_log
            .damage_by_spell(ActorId::PLAYER)
            .into_iter()
            .collect(),
        rewards: rewards.granted().to_vec(),
        final_slots: wand
            .slots()
            .iter()
            .map(WandSlot::display_name)
            .map(str::to_string)
            .collect(),
        pools: pool_stats(world)?,
        log_path: None,
    })
}

/// Per-archetype occupancy of every pool in the simulation.
pub fn pool_stats(world: &World) -> Result<Vec<NamedPoolStats>, String> {
    let settings = resource::<SimSettings>(world)?;
    let pools = resource::<EffectPools>(world)?;
    let enemies = resource::<Enemies>(world)?;

    let projectiles = settings
        .pools
        .projectiles
        .iter()
        .map(|a| format!("projectile:{}", a.name))
        .zip(pools.projectiles.stats());
    let areas = settings
        .pools
        .area_effects
        .iter()
        .map(|a| format!("area:{}", a.name))
        .zip(pools.area_effects.stats());
    let foes = enemies
        .archetypes()
        .iter()
        .map(|a| format!("enemy:{}", a.name))
        .zip(enemies.registry().stats());

    Ok(projectiles
        .chain(areas)
        .chain(foes)
        .map(|(name, stats)| NamedPoolStats { name, stats })
        .collect())
}

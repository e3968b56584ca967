//! Simulation settings
//!
//! Tunables that are not content: pool warm-up sizes, tick rates, player
//! stats, spawner and reward pacing. Stored as RON next to the executable;
//! a missing or unreadable file falls back to defaults.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::execution::{AreaEffectArchetype, ProjectileArchetype};

#[derive(Resource, Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SimSettings {
    /// Variable-step frame rate the headless runner simulates
    pub frame_rate: f64,
    /// Fixed-step rate for movement integration
    pub fixed_hz: f64,
    /// Cast every frame the wand allows it
    pub autocast: bool,
    pub pools: PoolSettings,
    pub player: PlayerSettings,
    pub spawner: SpawnerSettings,
    pub rewards: RewardSettings,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            frame_rate: 60.0,
            fixed_hz: 50.0,
            autocast: true,
            pools: PoolSettings::default(),
            player: PlayerSettings::default(),
            spawner: SpawnerSettings::default(),
            rewards: RewardSettings::default(),
        }
    }
}

/// Warm-up sizes and effect archetypes
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolSettings {
    pub projectile_warmup: usize,
    pub area_effect_warmup: usize,
    /// Per enemy archetype
    pub enemy_warmup: usize,
    pub projectiles: Vec<ProjectileArchetype>,
    pub area_effects: Vec<AreaEffectArchetype>,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            projectile_warmup: 32,
            area_effect_warmup: 8,
            enemy_warmup: 20,
            projectiles: vec![ProjectileArchetype::default()],
            area_effects: vec![AreaEffectArchetype::default()],
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    pub max_health: f32,
    /// Seconds of invulnerability after taking a hit
    pub invulnerability: f32,
    pub max_mana: f32,
    pub mana_regen: f32,
    /// Seconds after spending mana before regen resumes
    pub regen_delay: f32,
    pub hit_radius: f32,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            invulnerability: 0.5,
            max_mana: 100.0,
            mana_regen: 10.0,
            regen_delay: 0.5,
            hit_radius: 0.5,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerSettings {
    /// Seconds between spawn waves
    pub interval: f32,
    pub per_spawn: usize,
    /// No spawning while this many enemies are alive
    pub max_alive: usize,
    /// Spawn ring around the player
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for SpawnerSettings {
    fn default() -> Self {
        Self {
            interval: 2.0,
            per_spawn: 1,
            max_alive: 20,
            min_distance: 5.0,
            max_distance: 10.0,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardSettings {
    pub kills_per_reward: u32,
    pub options: usize,
}

impl Default for RewardSettings {
    fn default() -> Self {
        Self {
            kills_per_reward: 10,
            options: 3,
        }
    }
}

impl SimSettings {
    /// Get the path to the settings file
    fn settings_path() -> PathBuf {
        PathBuf::from("settings.ron")
    }

    /// Load `settings.ron`, or defaults if it doesn't exist
    pub fn load() -> Self {
        Self::load_from(Self::settings_path())
    }

    /// Load settings from `path`, or defaults if it is missing or invalid
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            info!("No settings file at {:?}, using defaults", path);
            return Self::default();
        }
        match fs::read_to_string(path) {
            Ok(contents) => match ron::from_str::<SimSettings>(&contents) {
                Ok(settings) => {
                    info!("Loaded settings from {:?}", path);
                    settings.sanitized()
                }
                Err(e) => {
                    warn!("Failed to parse settings file: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read settings file: {}", e);
                Self::default()
            }
        }
    }

    /// Save settings to `settings.ron`
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.save_to(Self::settings_path())
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), Box<dyn std::error::Error>> {
        let contents = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        fs::write(path.as_ref(), contents)?;
        info!("Saved settings to {:?}", path.as_ref());
        Ok(())
    }

    /// Clamp rates and distances into usable ranges.
    pub fn sanitized(mut self) -> Self {
        self.frame_rate = self.frame_rate.max(1.0);
        self.fixed_hz = self.fixed_hz.max(1.0);
        self.spawner.interval = self.spawner.interval.max(0.0);
        self.spawner.min_distance = self.spawner.min_distance.max(0.0);
        self.spawner.max_distance = self.spawner.max_distance.max(self.spawner.min_distance);
        self.rewards.kills_per_reward = self.rewards.kills_per_reward.max(1);
        self
    }
}

//! JSON configuration parsing for headless scenarios

use bevy::math::Vec2;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::settings::SimSettings;
use crate::simulation::{EnemyArchetype, Obstacle};
use crate::wand::content::DEFAULT_CONTENT_PATH;

/// Headless scenario configuration loaded from JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Id of the wand to equip (must exist in the content file)
    pub wand: String,
    /// Content file with spells, buffs and wands
    #[serde(default = "default_content_path")]
    pub content_path: String,
    /// Settings file (default: `settings.ron`, or built-in defaults)
    #[serde(default)]
    pub settings_path: Option<String>,
    /// Maximum scenario duration in seconds (default: 60)
    #[serde(default = "default_max_duration")]
    pub max_duration_secs: f32,
    /// Random seed for deterministic reproduction
    #[serde(default)]
    pub random_seed: Option<u64>,
    /// Enemy archetypes the spawner picks from (default: one basic enemy)
    #[serde(default)]
    pub enemies: Vec<EnemyArchetype>,
    #[serde(default)]
    pub obstacles: Vec<Obstacle>,
    #[serde(default)]
    pub player_position: (f32, f32),
    /// Custom output path for the combat log (optional)
    #[serde(default)]
    pub output_path: Option<String>,
}

fn default_content_path() -> String {
    DEFAULT_CONTENT_PATH.to_string()
}

fn default_max_duration() -> f32 {
    60.0
}

impl ScenarioConfig {
    /// A scenario with every optional field at its default.
    pub fn new(wand: impl Into<String>) -> Self {
        Self {
            wand: wand.into(),
            content_path: default_content_path(),
            settings_path: None,
            max_duration_secs: default_max_duration(),
            random_seed: None,
            enemies: Vec::new(),
            obstacles: Vec::new(),
            player_position: (0.0, 0.0),
            output_path: None,
        }
    }

    /// Load configuration from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;
        Self::from_json_str(&contents)
    }

    pub fn from_json_str(contents: &str) -> Result<Self, String> {
        let config: ScenarioConfig = serde_json::from_str(contents)
            .map_err(|e| format!("Failed to parse JSON: {}", e))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.wand.trim().is_empty() {
            return Err("wand must name a wand from the content file".to_string());
        }

        if !(self.max_duration_secs.is_finite() && self.max_duration_secs > 0.0) {
            return Err("max_duration_secs must be positive".to_string());
        }

        for enemy in &self.enemies {
            if enemy.max_health <= 0.0 {
                return Err(format!("enemy '{}' needs positive max_health", enemy.name));
            }
            if enemy.speed < 0.0 || enemy.radius < 0.0 || enemy.contact_interval < 0.0 {
                return Err(format!(
                    "enemy '{}' has a negative speed, radius or contact_interval",
                    enemy.name
                ));
            }
        }

        for (i, obstacle) in self.obstacles.iter().enumerate() {
            if obstacle.radius <= 0.0 {
                return Err(format!("obstacle {} needs a positive radius", i));
            }
        }

        Ok(())
    }

    /// Configured enemy archetypes, or the default one
    pub fn enemy_archetypes(&self) -> Vec<EnemyArchetype> {
        if self.enemies.is_empty() {
            vec![EnemyArchetype::default()]
        } else {
            self.enemies.clone()
        }
    }

    pub fn player_position(&self) -> Vec2 {
        Vec2::from(self.player_position)
    }

    pub fn settings(&self) -> SimSettings {
        match &self.settings_path {
            Some(path) => SimSettings::load_from(path),
            None => SimSettings::load(),
        }
    }
}

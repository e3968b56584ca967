//! Integration tests for headless scenario execution
//!
//! These tests verify that:
//! - Scenarios run to completion on the bundled content
//! - Results are accessible programmatically
//! - Seeded RNG produces deterministic results

use wandcraft::headless::{build_scenario_app, run_scenario, ScenarioConfig};
use wandcraft::simulation::{EnemyArchetype, Obstacle};

/// Helper to create a short seeded scenario
fn create_config(wand: &str, seed: Option<u64>) -> ScenarioConfig {
    let mut config = ScenarioConfig::new(wand);
    config.max_duration_secs = 6.0;
    config.random_seed = seed;
    config
}

#[test]
fn test_scenario_runs_to_time_limit() {
    let config = create_config("apprentice", Some(12345));
    let result = run_scenario(&config, false).expect("scenario should run");

    assert_eq!(result.wand, "apprentice");
    assert_eq!(result.random_seed, Some(12345));
    assert!(result.casts > 0, "autocast should fire");
    assert!(result.duration_secs > 0.0);
    assert!(result.duration_secs <= config.max_duration_secs + 0.1);
    assert!(result.final_slots.len() >= 3);
    assert!(result.log_path.is_none());
}

#[test]
fn test_seeded_scenarios_are_deterministic() {
    let config = create_config("apprentice", Some(42));

    let first = run_scenario(&config, false).unwrap();
    let second = run_scenario(&config, false).unwrap();

    assert_eq!(first.casts, second.casts);
    assert_eq!(first.kills, second.kills);
    assert_eq!(first.enemies_spawned, second.enemies_spawned);
    assert_eq!(first.damage_dealt, second.damage_dealt);
    assert_eq!(first.damage_taken, second.damage_taken);
    assert_eq!(first.damage_by_spell, second.damage_by_spell);
    assert_eq!(first.rewards, second.rewards);
    assert_eq!(first.final_slots, second.final_slots);
}

#[test]
fn test_unknown_wand_is_rejected() {
    let config = create_config("no_such_wand", Some(1));
    assert!(build_scenario_app(&config, false).is_err());
    assert!(run_scenario(&config, false).is_err());
}

#[test]
fn test_missing_content_file_is_rejected() {
    let mut config = create_config("apprentice", Some(1));
    config.content_path = "assets/config/missing.ron".to_string();
    assert!(run_scenario(&config, false).is_err());
}

#[test]
fn test_invalid_duration_is_rejected() {
    let mut config = create_config("apprentice", Some(1));
    config.max_duration_secs = -1.0;
    assert!(run_scenario(&config, false).is_err());
}

#[test]
fn test_fragile_player_dies_early() {
    let mut config = create_config("apprentice", Some(7));
    config.max_duration_secs = 30.0;
    config.enemies = vec![EnemyArchetype {
        name: "juggernaut".to_string(),
        max_health: 10_000.0,
        speed: 6.0,
        contact_damage: 500.0,
        contact_interval: 0.1,
        radius: 1.0,
    }];
    let result = run_scenario(&config, false).unwrap();

    assert!(!result.player_survived);
    assert!(result.duration_secs < config.max_duration_secs);
    assert!(result.damage_taken > 0.0);
    assert_eq!(result.kills, 0);
}

#[test]
fn test_result_reports_pools_by_archetype() {
    let mut config = create_config("apprentice", Some(3));
    config.max_duration_secs = 1.0;
    config.obstacles = vec![Obstacle {
        center: (4.0, 4.0),
        radius: 0.5,
    }];
    let result = run_scenario(&config, false).unwrap();

    assert!(result.pools.iter().any(|p| p.name.starts_with("projectile:")));
    assert!(result.pools.iter().any(|p| p.name.starts_with("area:")));
    assert!(result.pools.iter().any(|p| p.name == "enemy:slime"));
    for pool in &result.pools {
        assert_eq!(pool.stats.available + pool.stats.active, pool.stats.total);
    }
}

#[test]
fn test_result_serializes_to_json() {
    let config = create_config("apprentice", Some(5));
    let result = run_scenario(&config, false).unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["wand"], "apprentice");
    assert!(json["final_slots"].is_array());
    assert!(json["damage_by_spell"].is_object());
}

//! Unit tests for combat log query and aggregation methods
//!
//! These tests verify that the CombatLog correctly:
//! - Aggregates damage by spell
//! - Separates damage dealt from damage taken
//! - Counts killing blows
//! - Exports entries with session metadata

use wandcraft::combat::log::{
    CombatLog, CombatLogEventType, NamedPoolStats, SessionMetadata, StructuredEventData,
};
use wandcraft::pool::PoolStats;
use wandcraft::ActorId;

const SLIME: ActorId = ActorId(1);
const BAT: ActorId = ActorId(2);

fn create_test_log() -> CombatLog {
    CombatLog::default()
}

fn metadata() -> SessionMetadata {
    SessionMetadata {
        wand: "apprentice".to_string(),
        random_seed: Some(7),
        duration_secs: 12.5,
        player_survived: true,
        pools: vec![NamedPoolStats {
            name: "projectile:bolt".to_string(),
            stats: PoolStats {
                available: 3,
                active: 1,
                total: 4,
            },
        }],
    }
}

// =============================================================================
// Damage Aggregation Tests
// =============================================================================

#[test]
fn test_damage_by_spell_empty_log() {
    let log = create_test_log();
    let damage = log.damage_by_spell(ActorId::PLAYER);
    assert!(damage.is_empty(), "Empty log should return empty damage map");
}

#[test]
fn test_damage_by_spell_groups_hits() {
    let mut log = create_test_log();

    log.log_damage(ActorId::PLAYER, SLIME, Some("Arcane Bolt".to_string()), 15.0, false);
    log.log_damage(ActorId::PLAYER, BAT, Some("Arcane Bolt".to_string()), 30.0, true);
    log.log_damage(ActorId::PLAYER, SLIME, Some("Frost Nova".to_string()), 8.0, false);

    let damage = log.damage_by_spell(ActorId::PLAYER);

    assert_eq!(damage.len(), 2, "Should have 2 different spells");
    assert_eq!(damage.get("Arcane Bolt"), Some(&45.0));
    assert_eq!(damage.get("Frost Nova"), Some(&8.0));
}

#[test]
fn test_contact_damage_is_grouped_as_contact() {
    let mut log = create_test_log();

    log.log_damage(SLIME, ActorId::PLAYER, None, 5.0, false);
    log.log_damage(SLIME, ActorId::PLAYER, None, 5.0, false);

    let damage = log.damage_by_spell(SLIME);
    assert_eq!(damage.get("Contact"), Some(&10.0));
    assert!(log.damage_by_spell(ActorId::PLAYER).is_empty());
}

#[test]
fn test_damage_dealt_and_taken_are_separate() {
    let mut log = create_test_log();

    log.log_damage(ActorId::PLAYER, SLIME, Some("Spark".to_string()), 12.0, false);
    log.log_damage(ActorId::PLAYER, BAT, Some("Spark".to_string()), 12.0, false);
    log.log_damage(SLIME, ActorId::PLAYER, None, 5.0, false);
    log.log_damage(BAT, ActorId::PLAYER, None, 3.0, false);

    assert_eq!(log.damage_dealt_by(ActorId::PLAYER), 24.0);
    assert_eq!(log.damage_taken_by(ActorId::PLAYER), 8.0);
    assert_eq!(log.damage_taken_by(SLIME), 12.0);
    assert_eq!(log.damage_dealt_by(BAT), 3.0);
}

#[test]
fn test_critical_hits_are_marked() {
    let mut log = create_test_log();
    log.log_damage(ActorId::PLAYER, SLIME, Some("Spark".to_string()), 40.0, true);

    let entry = &log.entries[0];
    assert!(entry.message.contains("CRITS"));
    assert!(matches!(
        entry.data,
        Some(StructuredEventData::Damage {
            is_critical: true,
            ..
        })
    ));
}

// =============================================================================
// Deaths and Rewards
// =============================================================================

#[test]
fn test_killing_blows() {
    let mut log = create_test_log();

    log.log_death(SLIME, Some(ActorId::PLAYER));
    log.log_death(BAT, Some(ActorId::PLAYER));
    log.log_death(ActorId::PLAYER, Some(SLIME));
    log.log_death(ActorId(3), None);

    assert_eq!(log.killing_blows(ActorId::PLAYER), 2);
    assert_eq!(log.killing_blows(SLIME), 1);
    assert_eq!(log.killing_blows(BAT), 0);
    assert_eq!(log.count(CombatLogEventType::Death), 4);
}

#[test]
fn test_reward_messages() {
    let mut log = create_test_log();

    log.log_reward("Empower".to_string(), true);
    log.log_reward("Haste".to_string(), false);

    let rewards = log.filter_by_type(CombatLogEventType::Reward);
    assert_eq!(rewards.len(), 2);
    assert!(rewards[0].message.contains("added to the wand"));
    assert!(rewards[1].message.contains("full"));
}

// =============================================================================
// Queries and Export
// =============================================================================

#[test]
fn test_filter_and_recent() {
    let mut log = create_test_log();

    log.log(CombatLogEventType::SessionEvent, "start".to_string());
    log.match_time = 1.0;
    log.log_cast(ActorId::PLAYER, "Arcane Bolt".to_string(), 15.0, 4.8);
    log.match_time = 2.0;
    log.log_cast(ActorId::PLAYER, "Spark".to_string(), 6.0, 2.0);
    log.log(CombatLogEventType::SessionEvent, "end".to_string());

    assert_eq!(log.filter_by_type(CombatLogEventType::SpellCast).len(), 2);

    let recent = log.recent(2);
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].timestamp, 2.0);
    assert_eq!(recent[1].message, "end");

    assert_eq!(log.recent(10).len(), 4);
}

#[test]
fn test_json_export_includes_metadata_and_entries() {
    let mut log = create_test_log();
    log.log_cast(ActorId::PLAYER, "Arcane Bolt".to_string(), 15.0, 4.8);
    log.log_death(SLIME, Some(ActorId::PLAYER));

    let json = log.to_json(&metadata()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["metadata"]["wand"], "apprentice");
    assert_eq!(value["metadata"]["random_seed"], 7);
    assert_eq!(value["metadata"]["pools"][0]["name"], "projectile:bolt");
    // Pool stats are flattened next to the name
    assert_eq!(value["metadata"]["pools"][0]["total"], 4);
    assert_eq!(value["entries"].as_array().map(Vec::len), Some(2));
    assert_eq!(value["entries"][0]["event_type"], "SpellCast");
}

#[test]
fn test_save_to_file_writes_requested_path() {
    let mut log = create_test_log();
    log.log(CombatLogEventType::SessionEvent, "start".to_string());

    let path = std::env::temp_dir().join(format!("wandcraft_log_{}.json", std::process::id()));
    let path_str = path.to_string_lossy().to_string();

    let written = log.save_to_file(&metadata(), Some(&path_str)).unwrap();
    assert_eq!(written, path_str);

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.contains("\"start\""));
    let _ = std::fs::remove_file(&path);
}

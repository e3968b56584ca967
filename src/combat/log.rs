//! Combat logging
//!
//! Records every cast, hit, kill and reward for post-run analysis.
//! Entries carry an optional structured payload so aggregate queries do not
//! have to parse messages, and the whole log can be exported as JSON.

use bevy::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

use crate::pool::PoolStats;
use crate::ActorId;

/// A single entry in the combat log
#[derive(Debug, Clone, Serialize)]
pub struct CombatLogEntry {
    /// Timestamp in session time (seconds since start)
    pub timestamp: f32,
    /// The type of event
    pub event_type: CombatLogEventType,
    /// Human-readable description of the event
    pub message: String,
    /// Machine-readable details, when the event has any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<StructuredEventData>,
}

/// Types of combat log events for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CombatLogEventType {
    /// A spell left the wand
    SpellCast,
    /// Damage dealt
    Damage,
    /// An actor died
    Death,
    /// Pooled entities went back to their pool
    PoolReturn,
    /// A reward was granted
    Reward,
    /// Session event (start, end, ...)
    SessionEvent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum StructuredEventData {
    Cast {
        caster: ActorId,
        spell: String,
        damage: f32,
        mana_cost: f32,
    },
    Damage {
        source: ActorId,
        target: ActorId,
        spell: Option<String>,
        amount: f32,
        is_critical: bool,
    },
    Death {
        victim: ActorId,
        killer: Option<ActorId>,
    },
    Reward {
        name: String,
        added_to_wand: bool,
    },
}

/// Pool occupancy for one named archetype, attached to exported logs
#[derive(Debug, Clone, Serialize)]
pub struct NamedPoolStats {
    pub name: String,
    #[serde(flatten)]
    pub stats: PoolStats,
}

/// Run-level information written next to the entries
#[derive(Debug, Clone, Serialize)]
pub struct SessionMetadata {
    pub wand: String,
    pub random_seed: Option<u64>,
    pub duration_secs: f32,
    pub player_survived: bool,
    pub pools: Vec<NamedPoolStats>,
}

#[derive(Serialize)]
struct LogExport<'a> {
    metadata: &'a SessionMetadata,
    entries: &'a [CombatLogEntry],
}

/// The combat log resource storing all events
#[derive(Resource, Default, Debug, Clone)]
pub struct CombatLog {
    /// All log entries in chronological order
    pub entries: Vec<CombatLogEntry>,
    /// Current session time
    pub match_time: f32,
}

impl CombatLog {
    /// Clear the log for a new session
    pub fn clear(&mut self) {
        self.entries.clear();
        self.match_time = 0.0;
    }

    /// Add a new entry to the log
    pub fn log(&mut self, event_type: CombatLogEventType, message: String) {
        self.push(event_type, message, None);
    }

    fn push(
        &mut self,
        event_type: CombatLogEventType,
        message: String,
        data: Option<StructuredEventData>,
    ) {
        self.entries.push(CombatLogEntry {
            timestamp: self.match_time,
            event_type,
            message,
            data,
        });
    }

    pub fn log_cast(&mut self, caster: ActorId, spell: String, damage: f32, mana_cost: f32) {
        let message = format!(
            "{} casts {} ({:.1} damage, {:.1} mana)",
            caster, spell, damage, mana_cost
        );
        self.push(
            CombatLogEventType::SpellCast,
            message,
            Some(StructuredEventData::Cast {
                caster,
                spell,
                damage,
                mana_cost,
            }),
        );
    }

    pub fn log_damage(
        &mut self,
        source: ActorId,
        target: ActorId,
        spell: Option<String>,
        amount: f32,
        is_critical: bool,
    ) {
        let what = spell.as_deref().unwrap_or("contact");
        let message = if is_critical {
            format!("{}'s {} CRITS {} for {:.1}", source, what, target, amount)
        } else {
            format!("{}'s {} hits {} for {:.1}", source, what, target, amount)
        };
        self.push(
            CombatLogEventType::Damage,
            message,
            Some(StructuredEventData::Damage {
                source,
                target,
                spell,
                amount,
                is_critical,
            }),
        );
    }

    pub fn log_death(&mut self, victim: ActorId, killer: Option<ActorId>) {
        let message = match killer {
            Some(killer) => format!("{} was killed by {}", victim, killer),
            None => format!("{} died", victim),
        };
        self.push(
            CombatLogEventType::Death,
            message,
            Some(StructuredEventData::Death { victim, killer }),
        );
    }

    pub fn log_reward(&mut self, name: String, added_to_wand: bool) {
        let message = if added_to_wand {
            format!("Reward: {} added to the wand", name)
        } else {
            format!("Reward: {} offered but the wand is full", name)
        };
        self.push(
            CombatLogEventType::Reward,
            message,
            Some(StructuredEventData::Reward {
                name,
                added_to_wand,
            }),
        );
    }

    /// Get entries filtered by event type
    pub fn filter_by_type(&self, event_type: CombatLogEventType) -> Vec<&CombatLogEntry> {
        self.entries
            .iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    /// Get the last N entries
    pub fn recent(&self, count: usize) -> Vec<&CombatLogEntry> {
        self.entries.iter().rev().take(count).rev().collect()
    }

    pub fn count(&self, event_type: CombatLogEventType) -> usize {
        self.entries
            .iter()
            .filter(|e| e.event_type == event_type)
            .count()
    }

    fn damage_entries(&self) -> impl Iterator<Item = (ActorId, ActorId, Option<&String>, f32)> + '_ {
        self.entries.iter().filter_map(|e| match &e.data {
            Some(StructuredEventData::Damage {
                source,
                target,
                spell,
                amount,
                ..
            }) => Some((*source, *target, spell.as_ref(), *amount)),
            _ => None,
        })
    }

    /// Total damage dealt by an actor
    pub fn damage_dealt_by(&self, actor: ActorId) -> f32 {
        self.damage_entries()
            .filter(|(source, ..)| *source == actor)
            .map(|(.., amount)| amount)
            .sum()
    }

    /// Total damage taken by an actor
    pub fn damage_taken_by(&self, actor: ActorId) -> f32 {
        self.damage_entries()
            .filter(|(_, target, ..)| *target == actor)
            .map(|(.., amount)| amount)
            .sum()
    }

    /// Damage dealt by an actor, grouped by spell name
    pub fn damage_by_spell(&self, actor: ActorId) -> HashMap<String, f32> {
        let mut totals = HashMap::new();
        for (source, _, spell, amount) in self.damage_entries() {
            if source != actor {
                continue;
            }
            let name = spell.cloned().unwrap_or_else(|| "Contact".to_string());
            *totals.entry(name).or_insert(0.0) += amount;
        }
        totals
    }

    /// Number of deaths credited to an actor
    pub fn killing_blows(&self, actor: ActorId) -> usize {
        self.entries
            .iter()
            .filter(|e| {
                matches!(
                    &e.data,
                    Some(StructuredEventData::Death { killer: Some(killer), .. }) if *killer == actor
                )
            })
            .count()
    }

    pub fn to_json(&self, metadata: &SessionMetadata) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&LogExport {
            metadata,
            entries: &self.entries,
        })
    }

    /// Write the log as JSON. Without an explicit path a timestamped file is
    /// created under `logs/`. Returns the path written.
    pub fn save_to_file(
        &self,
        metadata: &SessionMetadata,
        output_path: Option<&str>,
    ) -> Result<String, String> {
        let path = match output_path {
            Some(path) => path.to_string(),
            None => {
                let stamp = std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .map(|d| d.as_secs())
                    .unwrap_or_default();
                format!("logs/session_{}.json", stamp)
            }
        };

        if let Some(parent) = Path::new(&path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| format!("Failed to create {}: {}", parent.display(), e))?;
            }
        }

        let json = self
            .to_json(metadata)
            .map_err(|e| format!("Failed to serialize combat log: {}", e))?;
        std::fs::write(&path, json).map_err(|e| format!("Failed to write {}: {}", path, e))?;
        info!("Combat log saved to {}", path);
        Ok(path)
    }
}

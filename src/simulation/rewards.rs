//! Kill rewards
//!
//! Every N kills the player is offered K random spells or buffs from the
//! content library. The headless run takes the first option.

use bevy::prelude::*;
use rand::Rng;
use std::sync::Arc;

use crate::combat::events::EnemyKilledEvent;
use crate::combat::log::CombatLog;
use crate::settings::RewardSettings;
use crate::wand::{BuffDefinition, ContentLibrary, SpellDefinition, Wand, WandSlot};

use super::components::GameRng;

#[derive(Debug, Clone)]
pub enum RewardOption {
    Spell(Arc<SpellDefinition>),
    Buff(Arc<BuffDefinition>),
}

impl RewardOption {
    pub fn name(&self) -> &str {
        match self {
            RewardOption::Spell(spell) => spell.name(),
            RewardOption::Buff(buff) => buff.name(),
        }
    }

    pub fn to_slot(&self) -> WandSlot {
        match self {
            RewardOption::Spell(spell) => WandSlot::Spell(spell.clone()),
            RewardOption::Buff(buff) => WandSlot::Buff(buff.clone()),
        }
    }
}

#[derive(Resource, Debug, Clone)]
pub struct RewardSystem {
    kills_per_reward: u32,
    options: usize,
    kills_since_reward: u32,
    total_kills: u32,
    /// Names of rewards taken, in order
    granted: Vec<String>,
}

impl Default for RewardSystem {
    fn default() -> Self {
        Self::from_settings(&RewardSettings::default())
    }
}

impl RewardSystem {
    pub fn from_settings(settings: &RewardSettings) -> Self {
        Self {
            kills_per_reward: settings.kills_per_reward.max(1),
            options: settings.options,
            kills_since_reward: 0,
            total_kills: 0,
            granted: Vec::new(),
        }
    }

    pub fn total_kills(&self) -> u32 {
        self.total_kills
    }

    pub fn granted(&self) -> &[String] {
        &self.granted
    }

    /// Count a kill. Returns true when a reward is due.
    pub fn register_kill(&mut self) -> bool {
        self.total_kills += 1;
        self.kills_since_reward += 1;
        if self.kills_since_reward >= self.kills_per_reward {
            self.kills_since_reward = 0;
            true
        } else {
            false
        }
    }

    /// Draw the reward options. Each is a spell or a buff with equal odds;
    /// if the library has only one kind, every option is of that kind.
    pub fn roll_options<R: Rng + ?Sized>(
        &self,
        library: &ContentLibrary,
        rng: &mut R,
    ) -> Vec<RewardOption> {
        let spells: Vec<&Arc<SpellDefinition>> = library.spells().collect();
        let buffs: Vec<&Arc<BuffDefinition>> = library.buffs().collect();
        if spells.is_empty() && buffs.is_empty() {
            return Vec::new();
        }

        (0..self.options)
            .map(|_| {
                let pick_spell = if buffs.is_empty() {
                    true
                } else if spells.is_empty() {
                    false
                } else {
                    rng.gen_bool(0.5)
                };
                if pick_spell {
                    RewardOption::Spell(spells[rng.gen_range(0..spells.len())].clone())
                } else {
                    RewardOption::Buff(buffs[rng.gen_range(0..buffs.len())].clone())
                }
            })
            .collect()
    }

    pub fn record_grant(&mut self, name: impl Into<String>) {
        self.granted.push(name.into());
    }
}

/// Count kills and hand out rewards, auto-picking the first option.
pub fn grant_rewards(
    mut kill_events: EventReader<EnemyKilledEvent>,
    mut rewards: ResMut<RewardSystem>,
    library: Res<ContentLibrary>,
    mut rng: ResMut<GameRng>,
    mut wand: ResMut<Wand>,
    mut combat_log: ResMut<CombatLog>,
) {
    for _ in kill_events.read() {
        if !rewards.register_kill() {
            continue;
        }
        let options = rewards.roll_options(&library, &mut *rng);
        let Some(choice) = options.first() else {
            continue;
        };

        let added = match wand.add_slot(choice.to_slot()) {
            Ok(index) => {
                info!("Reward: {} added to slot {}", choice.name(), index);
                true
            }
            Err(e) => {
                info!("Reward: {} not added ({})", choice.name(), e);
                false
            }
        };
        combat_log.log_reward(choice.name().to_string(), added);
        rewards.record_grant(choice.name());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTENT: &str = r#"(
        spells: [(id: "bolt"), (id: "spark")],
        buffs: [(id: "power", damage_multiplier: 2.0)],
    )"#;

    #[test]
    fn test_reward_every_n_kills() {
        let mut rewards = RewardSystem::from_settings(&RewardSettings {
            kills_per_reward: 3,
            options: 3,
        });
        let due: Vec<bool> = (0..6).map(|_| rewards.register_kill()).collect();
        assert_eq!(due, vec![false, false, true, false, false, true]);
        assert_eq!(rewards.total_kills(), 6);
    }

    #[test]
    fn test_roll_options_count_and_determinism() {
        let library = ContentLibrary::from_ron_str(CONTENT, "test").unwrap();
        let rewards = RewardSystem::default();

        let a = rewards.roll_options(&library, &mut GameRng::from_seed(5));
        let b = rewards.roll_options(&library, &mut GameRng::from_seed(5));
        assert_eq!(a.len(), 3);
        let names = |options: &[RewardOption]| {
            options.iter().map(|o| o.name().to_string()).collect::<Vec<_>>()
        };
        assert_eq!(names(&a), names(&b));
    }

    #[test]
    fn test_roll_options_single_kind() {
        let library =
            ContentLibrary::from_ron_str(r#"(buffs: [(id: "power")])"#, "test").unwrap();
        let options = RewardSystem::default().roll_options(&library, &mut GameRng::from_seed(1));
        assert!(options.iter().all(|o| matches!(o, RewardOption::Buff(_))));

        let empty = ContentLibrary::default();
        assert!(RewardSystem::default()
            .roll_options(&empty, &mut GameRng::from_seed(1))
            .is_empty());
    }
}

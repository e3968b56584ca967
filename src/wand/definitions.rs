//! Content definitions
//!
//! Spells, buffs and wands as authored in `assets/config/content.ron`.
//! Definitions are immutable once loaded and shared between slots through
//! `Arc`; slots never own them.
//!
//! ## Sanitising
//! Authored values are clamped into their legal ranges on load
//! (see [`SpellDefinition::sanitize`] and [`BuffDefinition::sanitize`]) so the
//! composer never has to guard against negative cooldowns or zero speeds.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Gameplay tags a buff can filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpellTag {
    Fire,
    Ice,
    Lightning,
    Arcane,
    Physical,
    Projectile,
    AoE,
    Beam,
}

pub type TagSet = SmallVec<[SpellTag; 4]>;

/// How a resolved cast turns into something in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ExecutionKind {
    #[default]
    Projectile,
    Beam,
    AoE,
    #[serde(rename = "Self")]
    SelfCast,
}

/// How a buff's multiplicative factors combine with other buffs on the same spell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StackingMode {
    /// `(factor - 1)` is summed with other additive buffs
    Additive,
    /// Factor is multiplied with other multiplicative buffs
    #[default]
    Multiplicative,
    /// Factor replaces the channel value; the last override applied wins
    Override,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum WandTier {
    #[default]
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

fn default_spell_damage() -> f32 {
    10.0
}

fn default_spell_mana_cost() -> f32 {
    5.0
}

fn default_spell_cooldown() -> f32 {
    0.5
}

fn default_spell_speed() -> f32 {
    12.0
}

fn default_spell_range() -> f32 {
    10.0
}

fn default_spell_tags() -> TagSet {
    SmallVec::from_slice(&[SpellTag::Arcane, SpellTag::Projectile])
}

fn default_crit_multiplier() -> f32 {
    2.0
}

fn one() -> f32 {
    1.0
}

fn default_max_slots() -> usize {
    3
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SpellDefinition {
    /// Unique content id
    pub id: String,
    /// Name shown to players (falls back to the id)
    #[serde(default)]
    pub display_name: String,

    // === Base values ===
    #[serde(default = "default_spell_damage")]
    pub damage: f32,
    #[serde(default = "default_spell_mana_cost")]
    pub mana_cost: f32,
    /// Seconds the wand stays on cooldown after this spell
    #[serde(default = "default_spell_cooldown")]
    pub cooldown: f32,
    /// Projectile travel speed in units/second
    #[serde(default = "default_spell_speed")]
    pub speed: f32,
    /// Travel distance; never modified by buffs
    #[serde(default = "default_spell_range")]
    pub range: f32,
    /// Extra targets a projectile passes through
    #[serde(default)]
    pub pierce: u32,
    #[serde(default = "default_crit_multiplier")]
    pub crit_multiplier: f32,

    // === Execution ===
    #[serde(default)]
    pub execution: ExecutionKind,
    #[serde(default = "default_spell_tags")]
    pub tags: TagSet,
    /// Spawn offset: x along the aim direction, y world-vertical
    #[serde(default)]
    pub spawn_offset: Option<(f32, f32)>,
    /// Replaces the effect archetype's own lifetime (area effects)
    #[serde(default)]
    pub effect_duration: Option<f32>,
    /// Which projectile / area-effect archetype this spell spawns
    #[serde(default)]
    pub effect_archetype: usize,
}

impl Default for SpellDefinition {
    fn default() -> Self {
        Self {
            id: String::new(),
            display_name: String::new(),
            damage: default_spell_damage(),
            mana_cost: default_spell_mana_cost(),
            cooldown: default_spell_cooldown(),
            speed: default_spell_speed(),
            range: default_spell_range(),
            pierce: 0,
            crit_multiplier: default_crit_multiplier(),
            execution: ExecutionKind::default(),
            tags: default_spell_tags(),
            spawn_offset: None,
            effect_duration: None,
            effect_archetype: 0,
        }
    }
}

impl SpellDefinition {
    pub fn name(&self) -> &str {
        if self.display_name.is_empty() {
            &self.id
        } else {
            &self.display_name
        }
    }

    pub fn has_tag(&self, tag: SpellTag) -> bool {
        self.tags.contains(&tag)
    }

    pub fn spawn_offset(&self) -> Vec2 {
        self.spawn_offset
            .map(|(x, y)| Vec2::new(x, y))
            .unwrap_or(Vec2::ZERO)
    }

    /// Clamp authored values into their legal ranges.
    pub fn sanitize(&mut self) {
        self.damage = self.damage.max(0.0);
        self.mana_cost = self.mana_cost.max(0.0);
        self.cooldown = self.cooldown.max(0.0);
        self.speed = self.speed.max(0.1);
        self.range = self.range.max(0.1);
        self.crit_multiplier = self.crit_multiplier.max(1.0);
        if let Some(duration) = self.effect_duration.as_mut() {
            *duration = duration.max(0.0);
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BuffDefinition {
    /// Unique content id
    pub id: String,
    #[serde(default)]
    pub display_name: String,

    // === Multiplicative factors ===
    #[serde(default = "one")]
    pub damage_multiplier: f32,
    #[serde(default = "one")]
    pub mana_multiplier: f32,
    #[serde(default = "one")]
    pub cooldown_multiplier: f32,
    #[serde(default = "one")]
    pub speed_multiplier: f32,

    // === Additive factors ===
    #[serde(default)]
    pub pierce_bonus: u32,
    /// Added to crit chance, 0.0-1.0
    #[serde(default)]
    pub crit_chance_bonus: f32,

    /// Raises the spell's crit multiplier to this value if larger.
    /// 1.0 leaves it alone.
    #[serde(default = "one")]
    pub crit_multiplier: f32,
    #[serde(default)]
    pub stacking: StackingMode,
    /// Spells this buff affects; empty affects every spell
    #[serde(default)]
    pub affected_tags: TagSet,
}

impl Default for BuffDefinition {
    fn default() -> Self {
        Self {
            id: String::new(),
            display_name: String::new(),
            damage_multiplier: 1.0,
            mana_multiplier: 1.0,
            cooldown_multiplier: 1.0,
            speed_multiplier: 1.0,
            pierce_bonus: 0,
            crit_chance_bonus: 0.0,
            crit_multiplier: 1.0,
            stacking: StackingMode::default(),
            affected_tags: TagSet::new(),
        }
    }
}

impl BuffDefinition {
    pub fn name(&self) -> &str {
        if self.display_name.is_empty() {
            &self.id
        } else {
            &self.display_name
        }
    }

    /// Whether this buff applies to `spell`: an empty filter matches every
    /// spell, otherwise at least one tag must be shared.
    pub fn affects(&self, spell: &SpellDefinition) -> bool {
        self.affected_tags.is_empty()
            || self.affected_tags.iter().any(|tag| spell.has_tag(*tag))
    }

    /// Clamp authored values into their legal ranges.
    pub fn sanitize(&mut self) {
        self.damage_multiplier = self.damage_multiplier.max(0.1);
        self.mana_multiplier = self.mana_multiplier.max(0.0);
        self.cooldown_multiplier = self.cooldown_multiplier.max(0.1);
        self.speed_multiplier = self.speed_multiplier.max(0.5);
        self.crit_chance_bonus = self.crit_chance_bonus.clamp(0.0, 1.0);
        self.crit_multiplier = self.crit_multiplier.max(1.0);
    }
}

/// Loadout-wide multipliers applied to every spell unconditionally.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GlobalMultipliers {
    #[serde(default = "one")]
    pub damage: f32,
    #[serde(default = "one")]
    pub mana: f32,
    #[serde(default = "one")]
    pub cooldown: f32,
}

impl Default for GlobalMultipliers {
    fn default() -> Self {
        Self {
            damage: 1.0,
            mana: 1.0,
            cooldown: 1.0,
        }
    }
}

/// One authored slot in a wand definition, by content id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotRef {
    Empty,
    Spell(String),
    Buff(String),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WandDefinition {
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub tier: WandTier,
    /// Starting slots, in order
    #[serde(default)]
    pub slots: Vec<SlotRef>,
    #[serde(default = "default_max_slots")]
    pub max_slots: usize,
    /// Buff ids that are always active regardless of slot position
    #[serde(default)]
    pub passive_buffs: Vec<String>,
    #[serde(default)]
    pub global: GlobalMultipliers,
}

impl WandDefinition {
    pub fn name(&self) -> &str {
        if self.display_name.is_empty() {
            &self.id
        } else {
            &self.display_name
        }
    }
}

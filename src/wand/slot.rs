use std::sync::Arc;

use super::definitions::{BuffDefinition, SpellDefinition};

/// One position in a wand loadout.
#[derive(Debug, Clone, Default)]
pub enum WandSlot {
    #[default]
    Empty,
    Spell(Arc<SpellDefinition>),
    Buff(Arc<BuffDefinition>),
}

impl WandSlot {
    pub fn spell(definition: SpellDefinition) -> Self {
        WandSlot::Spell(Arc::new(definition))
    }

    pub fn buff(definition: BuffDefinition) -> Self {
        WandSlot::Buff(Arc::new(definition))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, WandSlot::Empty)
    }

    pub fn is_spell(&self) -> bool {
        matches!(self, WandSlot::Spell(_))
    }

    pub fn is_buff(&self) -> bool {
        matches!(self, WandSlot::Buff(_))
    }

    pub fn as_spell(&self) -> Option<&Arc<SpellDefinition>> {
        match self {
            WandSlot::Spell(spell) => Some(spell),
            _ => None,
        }
    }

    pub fn as_buff(&self) -> Option<&Arc<BuffDefinition>> {
        match self {
            WandSlot::Buff(buff) => Some(buff),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            WandSlot::Empty => "Empty",
            WandSlot::Spell(spell) => spell.name(),
            WandSlot::Buff(buff) => buff.name(),
        }
    }
}

//! Data-driven content
//!
//! Spells, buffs and wands are defined in `assets/config/content.ron` instead
//! of being hardcoded. Loading sanitises every definition and checks that
//! every id a wand references exists, so a bad file fails at startup rather
//! than mid-run.
//!
//! ## Usage
//! ```ignore
//! fn my_system(library: Res<ContentLibrary>) {
//!     let bolt = library.spell("arcane_bolt").unwrap();
//!     println!("Arcane Bolt damage: {}", bolt.damage);
//! }
//! ```

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use super::controller::Wand;
use super::definitions::{BuffDefinition, SlotRef, SpellDefinition, WandDefinition};
use super::loadout::WandLoadout;
use super::slot::WandSlot;
use crate::error::ContentError;

pub const DEFAULT_CONTENT_PATH: &str = "assets/config/content.ron";

/// Root structure of a content file
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ContentFile {
    #[serde(default)]
    pub spells: Vec<SpellDefinition>,
    #[serde(default)]
    pub buffs: Vec<BuffDefinition>,
    #[serde(default)]
    pub wands: Vec<WandDefinition>,
}

/// All loaded content, keyed by id.
///
/// Ordered maps keep iteration stable, which seeded reward draws rely on.
#[derive(Resource, Debug, Default, Clone)]
pub struct ContentLibrary {
    spells: BTreeMap<String, Arc<SpellDefinition>>,
    buffs: BTreeMap<String, Arc<BuffDefinition>>,
    wands: BTreeMap<String, WandDefinition>,
}

impl ContentLibrary {
    /// Load, sanitise and validate a RON content file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ContentError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let library = Self::from_ron_str(&contents, &path.display().to_string())?;
        info!(
            "Loaded {} spells, {} buffs and {} wands from {}",
            library.spells.len(),
            library.buffs.len(),
            library.wands.len(),
            path.display()
        );
        Ok(library)
    }

    /// Parse content from a RON string. `origin` names the source in errors.
    pub fn from_ron_str(contents: &str, origin: &str) -> Result<Self, ContentError> {
        let file: ContentFile = ron::from_str(contents).map_err(|e| ContentError::Parse {
            path: origin.to_string(),
            message: e.to_string(),
        })?;
        Self::from_file(file)
    }

    pub fn from_file(file: ContentFile) -> Result<Self, ContentError> {
        let mut library = Self::default();

        for mut spell in file.spells {
            spell.sanitize();
            if library.spells.contains_key(&spell.id) {
                return Err(ContentError::DuplicateId {
                    kind: "spell",
                    id: spell.id,
                });
            }
            library.spells.insert(spell.id.clone(), Arc::new(spell));
        }

        for mut buff in file.buffs {
            buff.sanitize();
            if library.buffs.contains_key(&buff.id) {
                return Err(ContentError::DuplicateId {
                    kind: "buff",
                    id: buff.id,
                });
            }
            library.buffs.insert(buff.id.clone(), Arc::new(buff));
        }

        for wand in file.wands {
            if library.wands.contains_key(&wand.id) {
                return Err(ContentError::DuplicateId {
                    kind: "wand",
                    id: wand.id,
                });
            }
            library.wands.insert(wand.id.clone(), wand);
        }

        library.validate()?;
        Ok(library)
    }

    /// Check that every id referenced by a wand resolves.
    pub fn validate(&self) -> Result<(), ContentError> {
        for wand in self.wands.values() {
            for slot in &wand.slots {
                match slot {
                    SlotRef::Spell(id) if !self.spells.contains_key(id) => {
                        return Err(self.unknown("spell", id, &wand.id));
                    }
                    SlotRef::Buff(id) if !self.buffs.contains_key(id) => {
                        return Err(self.unknown("buff", id, &wand.id));
                    }
                    _ => {}
                }
            }
            for id in &wand.passive_buffs {
                if !self.buffs.contains_key(id) {
                    return Err(self.unknown("buff", id, &wand.id));
                }
            }
        }
        Ok(())
    }

    fn unknown(&self, kind: &'static str, id: &str, wand: &str) -> ContentError {
        ContentError::UnknownReference {
            kind,
            id: id.to_string(),
            referenced_by: format!("wand '{}'", wand),
        }
    }

    pub fn spell(&self, id: &str) -> Option<&Arc<SpellDefinition>> {
        self.spells.get(id)
    }

    pub fn buff(&self, id: &str) -> Option<&Arc<BuffDefinition>> {
        self.buffs.get(id)
    }

    pub fn wand(&self, id: &str) -> Option<&WandDefinition> {
        self.wands.get(id)
    }

    /// Spells in id order
    pub fn spells(&self) -> impl Iterator<Item = &Arc<SpellDefinition>> {
        self.spells.values()
    }

    /// Buffs in id order
    pub fn buffs(&self) -> impl Iterator<Item = &Arc<BuffDefinition>> {
        self.buffs.values()
    }

    pub fn wand_ids(&self) -> impl Iterator<Item = &str> {
        self.wands.keys().map(String::as_str)
    }

    pub fn spell_count(&self) -> usize {
        self.spells.len()
    }

    pub fn buff_count(&self) -> usize {
        self.buffs.len()
    }

    fn resolve_slot(&self, slot: &SlotRef, wand: &str) -> Result<WandSlot, ContentError> {
        match slot {
            SlotRef::Empty => Ok(WandSlot::Empty),
            SlotRef::Spell(id) => self
                .spell(id)
                .map(|spell| WandSlot::Spell(spell.clone()))
                .ok_or_else(|| self.unknown("spell", id, wand)),
            SlotRef::Buff(id) => self
                .buff(id)
                .map(|buff| WandSlot::Buff(buff.clone()))
                .ok_or_else(|| self.unknown("buff", id, wand)),
        }
    }

    /// Build a ready-to-cast wand from its definition.
    pub fn instantiate_wand(&self, id: &str) -> Result<Wand, ContentError> {
        let definition = self.wand(id).ok_or_else(|| ContentError::UnknownReference {
            kind: "wand",
            id: id.to_string(),
            referenced_by: "wand instantiation".to_string(),
        })?;

        let slots = definition
            .slots
            .iter()
            .map(|slot| self.resolve_slot(slot, id))
            .collect::<Result<Vec<_>, _>>()?;
        // More authored slots than capacity raises the capacity instead of dropping content
        let max_slots = definition.max_slots.max(slots.len());

        let mut loadout = WandLoadout::with_slots(slots, max_slots)
            .map_err(|e| ContentError::Parse {
                path: format!("wand '{}'", id),
                message: e.to_string(),
            })?
            .with_global(definition.global);
        for buff_id in &definition.passive_buffs {
            let buff = self
                .buff(buff_id)
                .ok_or_else(|| self.unknown("buff", buff_id, id))?;
            loadout.add_passive_buff(buff.clone());
        }

        Ok(Wand::new(definition.id.clone(), loadout)
            .with_display_name(definition.name())
            .with_tier(definition.tier))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wand::definitions::WandTier;

    const CONTENT: &str = r#"(
        spells: [
            (id: "bolt", damage: 12.0),
            (id: "nova", execution: AoE, tags: [Ice, AoE], cooldown: -1.0),
        ],
        buffs: [
            (id: "power", damage_multiplier: 1.5),
        ],
        wands: [
            (
                id: "starter",
                tier: Rare,
                slots: [Spell("bolt"), Buff("power"), Empty],
                max_slots: 4,
                passive_buffs: ["power"],
                global: (damage: 2.0),
            ),
        ],
    )"#;

    #[test]
    fn test_load_sanitizes_and_indexes() {
        let library = ContentLibrary::from_ron_str(CONTENT, "test").unwrap();
        assert_eq!(library.spell_count(), 2);
        assert_eq!(library.spell("bolt").unwrap().damage, 12.0);
        assert_eq!(library.spell("nova").unwrap().cooldown, 0.0);
        assert_eq!(library.wand("starter").unwrap().tier, WandTier::Rare);
    }

    #[test]
    fn test_instantiate_wand() {
        let library = ContentLibrary::from_ron_str(CONTENT, "test").unwrap();
        let wand = library.instantiate_wand("starter").unwrap();
        assert_eq!(wand.slot_count(), 3);
        assert_eq!(wand.loadout().max_slots(), 4);
        assert_eq!(wand.loadout().passive_buffs().len(), 1);
        assert_eq!(wand.loadout().global.damage, 2.0);
        assert!(wand.slot(2).unwrap().is_empty());
        assert!(library.instantiate_wand("missing").is_err());
    }

    #[test]
    fn test_unknown_reference_rejected() {
        let content = r#"(wands: [(id: "w", slots: [Spell("ghost")])])"#;
        let err = ContentLibrary::from_ron_str(content, "test").unwrap_err();
        assert!(matches!(
            err,
            ContentError::UnknownReference { kind: "spell", .. }
        ));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let content = r#"(spells: [(id: "a"), (id: "a")])"#;
        let err = ContentLibrary::from_ron_str(content, "test").unwrap_err();
        assert!(matches!(err, ContentError::DuplicateId { kind: "spell", .. }));
    }

    #[test]
    fn test_parse_error_names_origin() {
        let err = ContentLibrary::from_ron_str("(spells: [", "broken.ron").unwrap_err();
        assert!(err.to_string().contains("broken.ron"));
    }

    #[test]
    fn test_default_content_file_loads() {
        let library = ContentLibrary::load(DEFAULT_CONTENT_PATH).unwrap();
        assert!(library.spell_count() > 0);
        assert!(library.buff_count() > 0);
        for id in library.wand_ids() {
            assert!(library.instantiate_wand(id).is_ok(), "wand {} failed", id);
        }
    }
}

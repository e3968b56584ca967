//! Wand core
//!
//! Content definitions, the slot model, modifier composition and the cast
//! controller.
//!
//! ## Usage
//!
//! ```ignore
//! let library = ContentLibrary::load("assets/config/content.ron")?;
//! let mut wand = library.instantiate_wand("apprentice")?;
//! let context = wand.try_cast(&mut player, &dispatcher, &mut pools)?;
//! ```

pub mod composer;
pub mod content;
pub mod context;
pub mod controller;
pub mod cooldown;
pub mod definitions;
pub mod loadout;
pub mod slot;

pub use composer::compose;
pub use content::ContentLibrary;
pub use context::{Aim, CastContext};
pub use controller::{Caster, Wand};
pub use cooldown::CooldownTimer;
pub use definitions::{
    BuffDefinition, ExecutionKind, GlobalMultipliers, SlotRef, SpellDefinition, SpellTag,
    StackingMode, WandDefinition, WandTier,
};
pub use loadout::WandLoadout;
pub use slot::WandSlot;

//! wandcraft - wand-building action game simulation core
//!
//! A wand holds an ordered list of slots (spells, buffs or nothing). Casting
//! walks the slots circularly, composes each spell with the buffs to its
//! right, gates it by cooldown and mana, and hands the result to an
//! execution strategy that spawns pooled projectiles or area effects.
//!
//! This library exposes the core modules for testing and reuse.

pub mod cli;
pub mod combat;
pub mod error;
pub mod execution;
pub mod headless;
pub mod pool;
pub mod settings;
pub mod simulation;
pub mod wand;

// Re-export commonly used types
pub use combat::log::{CombatLog, CombatLogEventType};
pub use combat::ActorId;
pub use error::{CastError, ContentError, PoolError};
pub use headless::{ScenarioConfig, ScenarioResult};
pub use simulation::WandcraftPlugin;
pub use wand::{CastContext, ContentLibrary, Wand, WandLoadout, WandSlot};

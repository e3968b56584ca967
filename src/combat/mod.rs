//! Combat system
//!
//! The gameplay collaborators around the wand core:
//! - Actor identity shared by casters, targets and attackers
//! - Health with invulnerability windows and killer tracking
//! - Mana with delayed regeneration
//! - Per-target contact damage timers
//! - Observer lists and simulation events
//! - Combat logging

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod contact;
pub mod events;
pub mod health;
pub mod log;
pub mod mana;

use events::*;

/// Stable identity of anything that can cast, hit or be hit.
///
/// The player is always [`ActorId::PLAYER`]; enemies receive ids from the
/// spawner's counter, so an id is never reused within a session even when the
/// pooled enemy instance behind it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct ActorId(pub u32);

impl ActorId {
    pub const PLAYER: ActorId = ActorId(0);

    pub fn is_player(&self) -> bool {
        *self == Self::PLAYER
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_player() {
            write!(f, "Player")
        } else {
            write!(f, "Enemy #{}", self.0)
        }
    }
}

/// Plugin for combat events and the combat log
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<CastRequested>()
            .add_event::<SpellCastEvent>()
            .add_event::<DamageEvent>()
            .add_event::<EnemyKilledEvent>()
            .init_resource::<log::CombatLog>();
    }
}

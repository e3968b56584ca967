//! Health and damage intake
//!
//! [`Damageable`] is the seam projectiles, area effects and contact damage
//! use to hurt something without knowing what it is.

use bevy::prelude::*;
use serde::Serialize;

use crate::ActorId;

/// Anything that occupies space and can take damage.
pub trait Damageable {
    fn actor_id(&self) -> ActorId;

    fn position(&self) -> Vec2;

    /// Collision radius around [`Self::position`]
    fn hit_radius(&self) -> f32 {
        0.5
    }

    fn is_alive(&self) -> bool;

    fn take_damage(&mut self, amount: f32, source: ActorId) -> DamageOutcome;
}

/// What one damage application actually did.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DamageOutcome {
    /// Health actually removed (0 when ignored)
    pub dealt: f32,
    /// This application took the target from alive to dead
    pub killed: bool,
}

impl DamageOutcome {
    pub const IGNORED: DamageOutcome = DamageOutcome {
        dealt: 0.0,
        killed: false,
    };
}

#[derive(Debug, Clone, Serialize)]
pub struct Health {
    max: f32,
    current: f32,
    /// Seconds of invulnerability granted after each hit (0 = none)
    invulnerability_window: f32,
    invulnerable_for: f32,
    killer: Option<ActorId>,
}

impl Health {
    pub fn new(max: f32) -> Self {
        let max = max.max(1.0);
        Self {
            max,
            current: max,
            invulnerability_window: 0.0,
            invulnerable_for: 0.0,
            killer: None,
        }
    }

    pub fn with_invulnerability(mut self, window: f32) -> Self {
        self.invulnerability_window = window.max(0.0);
        self
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    /// Health as a fraction of max, for bars
    pub fn fraction(&self) -> f32 {
        self.current / self.max
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_for > 0.0
    }

    /// Who dealt the killing blow, once dead
    pub fn killer(&self) -> Option<ActorId> {
        self.killer
    }

    /// Advance the invulnerability window.
    pub fn tick(&mut self, dt: f32) {
        if self.invulnerable_for > 0.0 {
            self.invulnerable_for = (self.invulnerable_for - dt).max(0.0);
        }
    }

    /// Remove health. Ignored while dead or invulnerable, and for
    /// non-positive amounts.
    pub fn take_damage(&mut self, amount: f32, source: ActorId) -> DamageOutcome {
        if !self.is_alive() || self.is_invulnerable() || amount <= 0.0 {
            return DamageOutcome::IGNORED;
        }

        let dealt = amount.min(self.current);
        self.current -= dealt;
        if self.invulnerability_window > 0.0 {
            self.invulnerable_for = self.invulnerability_window;
        }

        let killed = !self.is_alive();
        if killed {
            self.current = 0.0;
            self.killer = Some(source);
        }
        DamageOutcome { dealt, killed }
    }

    /// Restore health up to max. Returns the amount actually healed.
    pub fn heal(&mut self, amount: f32) -> f32 {
        if !self.is_alive() || amount <= 0.0 {
            return 0.0;
        }
        let healed = amount.min(self.max - self.current);
        self.current += healed;
        healed
    }

    /// Back to full health with no killer and no invulnerability.
    pub fn revive(&mut self) {
        self.current = self.max;
        self.invulnerable_for = 0.0;
        self.killer = None;
    }
}

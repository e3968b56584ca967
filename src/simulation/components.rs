//! Simulation resources
//!
//! The player, the world's static obstacles and the shared RNG.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::combat::health::{DamageOutcome, Damageable, Health};
use crate::combat::mana::Mana;
use crate::settings::PlayerSettings;
use crate::wand::context::CastContext;
use crate::wand::controller::Caster;
use crate::ActorId;

/// Seedable RNG for everything random in the simulation (crits, spawns,
/// rewards). A fixed seed makes a whole run reproducible.
#[derive(Resource)]
pub struct GameRng {
    rng: StdRng,
    /// The seed used to initialize this RNG (if deterministic)
    pub seed: Option<u64>,
}

impl GameRng {
    /// Create a new GameRng with a specific seed for deterministic behavior
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    /// Create a new GameRng with random entropy (non-deterministic)
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            seed: None,
        }
    }

    /// Generate a random f32 in the range [0.0, 1.0)
    pub fn random_f32(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Generate a random f32 in the given range
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        min + self.random_f32() * (max - min)
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl RngCore for GameRng {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.rng.try_fill_bytes(dest)
    }
}

/// The wand holder.
#[derive(Resource, Debug, Clone)]
pub struct Player {
    pub position: Vec2,
    /// Aim direction (not necessarily normalized)
    pub aim: Vec2,
    pub health: Health,
    pub mana: Mana,
    pub hit_radius: f32,
    casts: u32,
}

impl Default for Player {
    fn default() -> Self {
        Self::from_settings(&PlayerSettings::default())
    }
}

impl Player {
    pub fn from_settings(settings: &PlayerSettings) -> Self {
        Self {
            position: Vec2::ZERO,
            aim: Vec2::X,
            health: Health::new(settings.max_health).with_invulnerability(settings.invulnerability),
            mana: Mana::new(settings.max_mana, settings.mana_regen, settings.regen_delay),
            hit_radius: settings.hit_radius,
            casts: 0,
        }
    }

    pub fn at(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    /// Successful casts so far
    pub fn casts(&self) -> u32 {
        self.casts
    }
}

impl Caster for Player {
    fn actor_id(&self) -> ActorId {
        ActorId::PLAYER
    }

    fn muzzle_position(&self) -> Vec2 {
        self.position
    }

    fn aim_direction(&self) -> Vec2 {
        self.aim
    }

    fn try_spend_resource(&mut self, amount: f32) -> bool {
        self.mana.try_spend(amount)
    }

    fn on_cast(&mut self, _context: &CastContext) {
        self.casts += 1;
    }
}

impl Damageable for Player {
    fn actor_id(&self) -> ActorId {
        ActorId::PLAYER
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn hit_radius(&self) -> f32 {
        self.hit_radius
    }

    fn is_alive(&self) -> bool {
        self.health.is_alive()
    }

    fn take_damage(&mut self, amount: f32, source: ActorId) -> DamageOutcome {
        self.health.take_damage(amount, source)
    }
}

/// Circular blocker that stops projectiles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub center: (f32, f32),
    pub radius: f32,
}

impl Obstacle {
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.center.0, self.center.1)
    }
}

#[derive(Resource, Debug, Clone, Default)]
pub struct Obstacles(pub Vec<Obstacle>);

impl Obstacles {
    /// Does a circle at `point` with `radius` touch any obstacle?
    pub fn blocks(&self, point: Vec2, radius: f32) -> bool {
        self.0.iter().any(|obstacle| {
            let reach = obstacle.radius + radius;
            obstacle.center().distance_squared(point) <= reach * reach
        })
    }
}

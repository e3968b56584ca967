//! Cast execution
//!
//! The dispatcher and the pooled entities casts turn into.

pub mod area_effect;
pub mod dispatcher;
pub mod projectile;

use serde::Serialize;

use crate::ActorId;

pub use area_effect::{AreaEffect, AreaEffectArchetype, AreaEffectHandler};
pub use dispatcher::{EffectPools, ExecutionDispatcher, ExecutionHandler};
pub use projectile::{Projectile, ProjectileArchetype, ProjectileHandler};

/// One landed hit from a projectile or area effect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HitReport {
    pub source: ActorId,
    pub target: ActorId,
    /// Health actually removed
    pub amount: f32,
    pub is_critical: bool,
    pub killed: bool,
}

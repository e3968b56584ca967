//! Error types
//!
//! None of these are fatal: every failing operation leaves the simulation
//! state exactly as it was and the tick keeps running.

use thiserror::Error;

use crate::wand::definitions::ExecutionKind;

/// Why a cast request, slot edit or dispatch did not go through.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CastError {
    #[error("wand is on cooldown")]
    OnCooldown,

    #[error("no castable spell in the loadout")]
    NoCastableSpell,

    #[error("insufficient resources: {required:.1} required")]
    ResourceExhausted { required: f32 },

    #[error("slot index {index} out of bounds (slot count {len})")]
    InvalidIndex { index: usize, len: usize },

    #[error("loadout is full ({max} slots)")]
    CapacityReached { max: usize },

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("unsupported execution kind: {0:?}")]
    UnsupportedExecutionKind(ExecutionKind),
}

/// Pool contract violations and registry lookups.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    #[error("handle belongs to another pool")]
    ForeignHandle,

    #[error("handle was issued before the pool was cleared")]
    StaleHandle,

    #[error("instance {index} is not in use")]
    NotInUse { index: u32 },

    #[error("archetype index {index} out of range ({count} archetypes)")]
    InvalidArchetype { index: usize, count: usize },
}

/// Content file loading and validation failures.
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    #[error("unknown {kind} '{id}' referenced by {referenced_by}")]
    UnknownReference {
        kind: &'static str,
        id: String,
        referenced_by: String,
    },

    #[error("duplicate {kind} id '{id}'")]
    DuplicateId { kind: &'static str, id: String },
}

impl From<PoolError> for CastError {
    fn from(err: PoolError) -> Self {
        CastError::Configuration(err.to_string())
    }
}

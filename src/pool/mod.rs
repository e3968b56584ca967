//! Entity pooling
//!
//! Every transient simulation entity (projectiles, area effects, enemies)
//! is recycled through these pools so steady-state play does not allocate.
//! Pools are plain owned values; the simulation plugin stores them as
//! resources and hands them to whoever needs them.

pub mod object_pool;
pub mod registry;

pub use object_pool::{Initialize, Lifecycle, ObjectPool, PoolHandle, PoolId, PoolStats, Poolable};
pub use registry::PoolRegistry;

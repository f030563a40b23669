//! Blockbox Core
//!
//! Contains the engine-independent building blocks of the sandbox:
//! - Pooled entity registry (kind-dispatched object pools)
//! - Spatial occupancy index over an integer grid
//! - Block and effect kinds

pub mod grid;
pub mod kind;
pub mod pool;

pub use glam;

pub use grid::{GridCoord, Occupant, OccupancyError, OccupancyIndex};
pub use kind::{BlockKind, EffectKind};
pub use pool::{Lifecycle, PoolError, PoolRegistry, PoolStats, PooledEntity, ShutdownReport};

/// Sandbox version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

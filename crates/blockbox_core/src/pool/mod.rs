//! Kind-dispatched object pools.
//!
//! A [`PoolRegistry`] owns one pool per entity kind. Callers lease
//! instances with [`PoolRegistry::acquire`] and hand them back with
//! [`PoolRegistry::release`]; the registry sequences the user-supplied
//! [`Lifecycle`] callbacks around those transitions.

mod entity;
mod error;
mod lifecycle;
mod registry;

pub use entity::PooledEntity;
pub use error::PoolError;
pub use lifecycle::Lifecycle;
pub use registry::{PoolRegistry, PoolStats, ShutdownReport};

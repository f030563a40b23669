//! Integer grid and cell occupancy.

mod coord;
mod occupancy;

pub use coord::GridCoord;
pub use occupancy::{Occupant, OccupancyError, OccupancyIndex};

//! Cell occupancy index.
//!
//! Maps each occupied [`GridCoord`] to the kind and entity placed there.
//! The index only records placements; it never owns or destroys the
//! entities it points at.

use crate::grid::GridCoord;
use std::collections::hash_map::{Entry, HashMap};
use thiserror::Error;

/// What sits in an occupied cell.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Occupant<K, E> {
    pub kind: K,
    pub entity: E,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OccupancyError {
    #[error("cell {coord} is already occupied")]
    Occupied { coord: GridCoord },

    #[error("cell {coord} is empty")]
    EmptyCell { coord: GridCoord },
}

/// Authoritative record of which cell holds which entity.
#[derive(Debug, Clone)]
pub struct OccupancyIndex<K, E> {
    cells: HashMap<GridCoord, Occupant<K, E>>,
}

impl<K, E> OccupancyIndex<K, E> {
    pub fn new() -> Self {
        Self {
            cells: HashMap::new(),
        }
    }

    pub fn is_free(&self, coord: GridCoord) -> bool {
        !self.cells.contains_key(&coord)
    }

    /// Record `entity` at `coord`. Fails without touching the index if the
    /// cell is taken, so this doubles as an atomic check-and-set.
    pub fn place(&mut self, coord: GridCoord, kind: K, entity: E) -> Result<(), OccupancyError> {
        match self.cells.entry(coord) {
            Entry::Occupied(_) => Err(OccupancyError::Occupied { coord }),
            Entry::Vacant(v) => {
                v.insert(Occupant { kind, entity });
                Ok(())
            }
        }
    }

    pub fn occupant_at(&self, coord: GridCoord) -> Result<&Occupant<K, E>, OccupancyError> {
        self.cells
            .get(&coord)
            .ok_or(OccupancyError::EmptyCell { coord })
    }

    /// Clear `coord`, returning what was there.
    pub fn remove_at(&mut self, coord: GridCoord) -> Result<Occupant<K, E>, OccupancyError> {
        self.cells
            .remove(&coord)
            .ok_or(OccupancyError::EmptyCell { coord })
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate occupied cells in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (GridCoord, &Occupant<K, E>)> {
        self.cells.iter().map(|(coord, occupant)| (*coord, occupant))
    }

    /// Drain every entry, leaving the index empty.
    pub fn drain(&mut self) -> impl Iterator<Item = (GridCoord, Occupant<K, E>)> + '_ {
        self.cells.drain()
    }
}

impl<K, E> Default for OccupancyIndex<K, E> {
    fn default() -> Self {
        Self::new()
    }
}

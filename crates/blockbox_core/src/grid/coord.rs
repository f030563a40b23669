//! Grid cell coordinates and snapping from world space.
//!
//! Blocks are unit cubes. A cell `(x, y, z)` holds a block centred on
//! `(x, y + 0.5, z)` in world space, so blocks are centred on integer x/z
//! and rest on integer y.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Half a block; offsets a world position into the cell that contains it.
const HALF_BLOCK: f32 = 0.5;

/// Discrete 3D cell key. Hashing and equality are exact.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct GridCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl GridCoord {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Cell containing the world-space point `p`.
    ///
    /// Returns `None` when a component is not finite or does not fit in
    /// an `i32` after flooring.
    pub fn from_world(p: Vec3) -> Option<Self> {
        Some(Self {
            x: floor_to_i32(p.x + HALF_BLOCK)?,
            y: floor_to_i32(p.y)?,
            z: floor_to_i32(p.z + HALF_BLOCK)?,
        })
    }

    /// Cell a block lands in when dropped on a surface.
    ///
    /// `point` is where the pointer ray hit; `top_y` is the top face of
    /// whatever was hit, so the block always sits on top of it.
    pub fn from_surface_hit(point: Vec3, top_y: f32) -> Option<Self> {
        Self::from_world(Vec3::new(point.x, top_y, point.z))
    }

    /// World-space centre of the block occupying this cell.
    pub fn to_world(self) -> Vec3 {
        Vec3::new(self.x as f32, self.y as f32 + HALF_BLOCK, self.z as f32)
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

fn floor_to_i32(v: f32) -> Option<i32> {
    let floored = v.floor();
    if !floored.is_finite() || floored < i32::MIN as f32 || floored >= i32::MAX as f32 {
        return None;
    }
    Some(floored as i32)
}

//! Ground contact
//!
//! The ball is a sphere but contact is approximated by sampling the block
//! grid at the four corners of a small square around its center. Blocks are
//! large relative to the ball, so this is close enough and O(1).

use glam::Vec3;

use super::level::Level;

/// Corner offsets of the sampling square, in units of the collision fudge
pub const CORNERS: [(f32, f32); 4] = [(-1.0, -1.0), (-1.0, 1.0), (1.0, -1.0), (1.0, 1.0)];

/// Whether `y` lies in the band where landing is still possible
///
/// Above `ceiling` the ball is clearly airborne; at or below `floor` it has
/// dropped past the block tops and can only keep falling.
#[inline]
pub fn in_ground_band(y: f32, floor: f32, ceiling: f32) -> bool {
    floor < y && y < ceiling
}

/// Whether any corner of the square of half-size `fudge` around `pos`
/// stands on a solid block
pub fn touches_ground(level: &Level, pos: Vec3, fudge: f32) -> bool {
    CORNERS
        .iter()
        .any(|&(dx, dz)| level.is_solid_at(pos.x + dx * fudge, pos.z + dz * fudge))
}

//! Passive obstacles.

use crate::region::{Region, SpatialFeature};
use crate::Vec2;

/// A rectangle that pushes overlapping particles back out vertically.
///
/// The restoring force grows with distance from the region's horizontal
/// midline, so a particle that has sunk into the upper half is pushed up and
/// one in the lower half is pushed down.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Blockage {
    region: Region,
}

impl Blockage {
    pub fn new(region: Region) -> Self {
        Self { region }
    }

    /// Velocity change for a particle at `position`.
    ///
    /// Returns `None` when the particle is outside, otherwise
    /// `(0, stiffness * (y - mid_y))`.
    pub fn resolve(&self, position: Vec2, stiffness: f32) -> Option<Vec2> {
        if !self.contains(position) {
            return None;
        }
        Some(Vec2::new(0.0, stiffness * (position.y - self.region.mid_y())))
    }
}

impl SpatialFeature for Blockage {
    fn region(&self) -> &Region {
        &self.region
    }
}

//! Directional pumps.
//!
//! A pump draws particles in from below and ejects them above its top edge.
//! Outside the pump this is modelled as a dipole: a negative charge at the
//! midpoint of the bottom edge attracts, a positive one at the top edge
//! repels. A particle that ends up inside is relocated just above the top
//! edge with most of its velocity removed.

use crate::forces::{clamp_axes, coulomb};
use crate::region::{Region, SpatialFeature};
use crate::Vec2;

/// Dipole parameters for [`Pump::force`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DipoleParams {
    /// Magnitude of each pole's charge.
    pub charge: f32,
    /// Per-axis clamp applied to each pole's contribution.
    pub force_limit: f32,
    /// Pairs closer than this contribute nothing.
    pub min_separation: f32,
}

/// A region that transports particles toward its top edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pump {
    region: Region,
}

impl Pump {
    pub fn new(region: Region) -> Self {
        Self { region }
    }

    /// Midpoint of the bottom edge (attracting pole).
    #[inline]
    pub fn intake(&self) -> Vec2 {
        Vec2::new(self.center().x, self.region.bottom())
    }

    /// Midpoint of the top edge (repelling pole).
    #[inline]
    pub fn outlet(&self) -> Vec2 {
        Vec2::new(self.center().x, self.region.top())
    }

    /// Dipole force on a particle at `position`.
    ///
    /// Zero when the particle is inside the pump; [`Pump::collide`] handles
    /// that case.
    pub fn force(&self, position: Vec2, params: &DipoleParams) -> Vec2 {
        if self.contains(position) {
            return Vec2::ZERO;
        }
        let pull = coulomb(position, self.intake(), -params.charge, params.min_separation);
        let push = coulomb(position, self.outlet(), params.charge, params.min_separation);
        let limit = params.force_limit;
        clamp_axes(pull, limit) + clamp_axes(push, limit)
    }

    /// Throughput: if `position` is inside, move it `exit_offset` above the
    /// top edge and scale `velocity` by `damping`.
    ///
    /// Returns `true` when the particle was relocated.
    pub fn collide(
        &self,
        position: &mut Vec2,
        velocity: &mut Vec2,
        exit_offset: f32,
        damping: f32,
    ) -> bool {
        if !self.contains(*position) {
            return false;
        }
        position.y = self.region.top() + exit_offset;
        *velocity *= damping;
        true
    }
}

impl SpatialFeature for Pump {
    fn region(&self) -> &Region {
        &self.region
    }
}

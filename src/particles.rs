//! Fixed-capacity particle storage.
//!
//! Particles live in parallel arrays rather than a struct-of-fields so the
//! position buffer can be handed to a renderer untouched. Slots are allocated
//! once; "spawning" flips a slot active and "deleting" flips it back, parking
//! the particle at an off-domain sentinel.

use crate::region::SpatialFeature;
use crate::Vec2;

/// Parallel position / velocity / active arrays.
///
/// Invariant: every inactive slot has `position == sentinel` and zero
/// velocity.
#[derive(Clone, Debug)]
pub struct Particles {
    positions: Vec<Vec2>,
    velocities: Vec<Vec2>,
    active: Vec<bool>,
    sentinel: Vec2,
}

impl Particles {
    /// `capacity` inactive particles parked at `sentinel`.
    pub fn new(capacity: usize, sentinel: Vec2) -> Self {
        Self {
            positions: vec![sentinel; capacity],
            velocities: vec![Vec2::ZERO; capacity],
            active: vec![false; capacity],
            sentinel,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.active.len()
    }

    #[inline]
    pub fn positions(&self) -> &[Vec2] {
        &self.positions
    }

    #[inline]
    pub fn velocities(&self) -> &[Vec2] {
        &self.velocities
    }

    #[inline]
    pub fn active(&self) -> &[bool] {
        &self.active
    }

    /// `false` for out-of-range indices.
    #[inline]
    pub fn is_active(&self, index: usize) -> bool {
        self.active.get(index).copied().unwrap_or(false)
    }

    pub fn active_count(&self) -> usize {
        self.active.iter().filter(|&&a| a).count()
    }

    /// Number of active particles inside `feature`.
    pub fn count_active_in(&self, feature: &impl SpatialFeature) -> usize {
        self.positions
            .iter()
            .zip(&self.active)
            .filter(|&(&p, &a)| a && feature.contains(p))
            .count()
    }

    pub fn first_inactive(&self) -> Option<usize> {
        self.active.iter().position(|&a| !a)
    }

    pub fn first_active(&self) -> Option<usize> {
        self.active.iter().position(|&a| a)
    }

    /// Activate slot `index` with the given state. Out of range is a no-op.
    pub fn activate(&mut self, index: usize, position: Vec2, velocity: Vec2) {
        if index >= self.capacity() {
            return;
        }
        self.active[index] = true;
        self.positions[index] = position;
        self.velocities[index] = velocity;
    }

    /// Deactivate slot `index` and park it at the sentinel. Out of range is a
    /// no-op.
    pub fn deactivate(&mut self, index: usize) {
        if index >= self.capacity() {
            return;
        }
        self.active[index] = false;
        self.positions[index] = self.sentinel;
        self.velocities[index] = Vec2::ZERO;
    }

    /// Mutable access to the state of one particle.
    #[inline]
    pub(crate) fn state_mut(&mut self, index: usize) -> (&mut Vec2, &mut Vec2) {
        (&mut self.positions[index], &mut self.velocities[index])
    }
}

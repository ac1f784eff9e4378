//! Concentration regulators.
//!
//! A regulator keeps the number of active particles inside its region near a
//! target by turning at most one particle on or off per step. Convergence is
//! gradual over many frames, which stands in for diffusion-limited
//! replenishment from a reservoir.

use crate::particles::Particles;
use crate::region::{Region, SpatialFeature};
use crate::rng::DeterministicRng;
use crate::Vec2;

/// What a single [`ConcentrationRegulator::regulate`] call did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegulatorAction {
    /// Count already matched the target.
    None,
    /// Slot reactivated inside the region.
    Activated(usize),
    /// Slot deactivated.
    Deactivated(usize),
    /// Below target but every slot is already active.
    Saturated,
}

/// Holds the active population inside a region at `target_count`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConcentrationRegulator {
    region: Region,
    target_count: usize,
}

impl ConcentrationRegulator {
    pub fn new(region: Region, target_count: usize) -> Self {
        Self { region, target_count }
    }

    #[inline]
    pub fn target_count(&self) -> usize {
        self.target_count
    }

    /// Nudge the in-region count one particle toward the target.
    ///
    /// - Below target: the lowest-index inactive slot is activated at a
    ///   uniformly random point in the region with zero velocity.
    /// - Above target: the lowest-index active particle is deactivated,
    ///   wherever it is. This treats the target as a cap on the whole
    ///   population once the region saturates, so particles outside the
    ///   region can be evicted.
    pub fn regulate(&self, particles: &mut Particles, rng: &mut DeterministicRng) -> RegulatorAction {
        let count = particles.count_active_in(self);

        if count < self.target_count {
            match particles.first_inactive() {
                Some(index) => {
                    let position = self.region.sample(rng);
                    particles.activate(index, position, Vec2::ZERO);
                    RegulatorAction::Activated(index)
                }
                None => RegulatorAction::Saturated,
            }
        } else if count > self.target_count {
            match particles.first_active() {
                Some(index) => {
                    particles.deactivate(index);
                    RegulatorAction::Deactivated(index)
                }
                // count > 0 implies an active slot exists
                None => RegulatorAction::None,
            }
        } else {
            RegulatorAction::None
        }
    }
}

impl SpatialFeature for ConcentrationRegulator {
    fn region(&self) -> &Region {
        &self.region
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SENTINEL: Vec2 = Vec2::new(1000.0, 1000.0);

    #[test]
    fn test_activates_one_per_call() {
        let mut particles = Particles::new(10, SENTINEL);
        let mut rng = DeterministicRng::new(3);
        let region = Region::new(0.0, 2.0, 0.0, 2.0);
        let reg = ConcentrationRegulator::new(region, 3);

        assert_eq!(reg.regulate(&mut particles, &mut rng), RegulatorAction::Activated(0));
        assert_eq!(particles.active_count(), 1);
        assert!(region.contains(particles.positions()[0]));
        assert_eq!(particles.velocities()[0], Vec2::ZERO);

        assert_eq!(reg.regulate(&mut particles, &mut rng), RegulatorAction::Activated(1));
        assert_eq!(reg.regulate(&mut particles, &mut rng), RegulatorAction::Activated(2));
        assert_eq!(reg.regulate(&mut particles, &mut rng), RegulatorAction::None);
        assert_eq!(particles.count_active_in(&region), 3);
    }

    #[test]
    fn test_saturated_when_no_free_slot() {
        let mut particles = Particles::new(1, SENTINEL);
        let mut rng = DeterministicRng::new(3);
        particles.activate(0, Vec2::new(50.0, 50.0), Vec2::ZERO);
        let reg = ConcentrationRegulator::new(Region::new(0.0, 1.0, 0.0, 1.0), 2);
        assert_eq!(reg.regulate(&mut particles, &mut rng), RegulatorAction::Saturated);
    }

    #[test]
    fn test_over_target_evicts_first_active_anywhere() {
        // eviction is global: the evicted particle need not be in the region
        let mut particles = Particles::new(4, SENTINEL);
        let mut rng = DeterministicRng::new(3);
        let region = Region::new(0.0, 1.0, 0.0, 1.0);
        particles.activate(0, Vec2::new(-5.0, -5.0), Vec2::ZERO);
        particles.activate(1, Vec2::new(0.5, 0.5), Vec2::ZERO);
        particles.activate(2, Vec2::new(0.6, 0.6), Vec2::ZERO);

        let reg = ConcentrationRegulator::new(region, 1);
        assert_eq!(reg.regulate(&mut particles, &mut rng), RegulatorAction::Deactivated(0));
        assert_eq!(particles.positions()[0], SENTINEL);
        assert_eq!(particles.count_active_in(&region), 2);
    }
}

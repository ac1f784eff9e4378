//! Voltage-gated channels.
//!
//! A gate senses a crude local electric field from every particle position
//! and flips between [`GateState::Closed`] and [`GateState::Open`] with
//! hysteresis:
//!
//! | `field.y`                  | Result          |
//! |----------------------------|-----------------|
//! | `< open_threshold`         | Open            |
//! | `> close_threshold`        | Closed          |
//! | in between (dead zone)     | unchanged       |
//!
//! The dead zone keeps a gate from chattering when the field hovers near a
//! threshold. An open gate lets particles through by relocating them just
//! below its bottom edge; a closed gate nudges approaching particles away
//! from its centre.

use crate::forces::coulomb;
use crate::region::{Region, SpatialFeature};
use crate::Vec2;
use serde::{Deserialize, Serialize};

/// Open/closed state of a [`Gate`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateState {
    #[default]
    Closed,
    Open,
}

impl GateState {
    #[inline]
    pub fn is_open(self) -> bool {
        self == GateState::Open
    }
}

/// A state change reported by [`Gate::update`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateTransition {
    Opened,
    Closed,
}

/// Sensing thresholds for [`Gate::update`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GateThresholds {
    /// `field.y` strictly below this opens the gate.
    pub open: f32,
    /// `field.y` strictly above this closes the gate.
    pub close: f32,
}

impl Default for GateThresholds {
    fn default() -> Self {
        Self { open: -0.4, close: 0.0 }
    }
}

/// A voltage-sensitive channel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Gate {
    region: Region,
    state: GateState,
    field: Vec2,
}

impl Gate {
    /// New gate, initially closed.
    pub fn new(region: Region) -> Self {
        Self {
            region,
            state: GateState::Closed,
            field: Vec2::ZERO,
        }
    }

    #[inline]
    pub fn state(&self) -> GateState {
        self.state
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    /// Field estimate from the most recent [`Gate::update`].
    #[inline]
    pub fn field(&self) -> Vec2 {
        self.field
    }

    /// Field at the gate centre: `sum(normalize(center - p) / |center - p|^2)`
    /// over every position given.
    ///
    /// Inactive particles are expected to sit far off-domain, where their
    /// contribution is negligible.
    pub fn sense(&self, positions: &[Vec2], min_separation: f32) -> Vec2 {
        let center = self.center();
        positions
            .iter()
            .fold(Vec2::ZERO, |acc, &p| acc + coulomb(center, p, 1.0, min_separation))
    }

    /// Apply the hysteresis rule to an already computed field.
    pub fn apply_field(&mut self, field: Vec2, thresholds: GateThresholds) -> Option<GateTransition> {
        self.field = field;
        let next = if field.y < thresholds.open {
            GateState::Open
        } else if field.y > thresholds.close {
            GateState::Closed
        } else {
            self.state
        };
        self.set_state(next)
    }

    /// Recompute the field from `positions` and update the state.
    pub fn update(
        &mut self,
        positions: &[Vec2],
        thresholds: GateThresholds,
        min_separation: f32,
    ) -> Option<GateTransition> {
        let field = self.sense(positions, min_separation);
        self.apply_field(field, thresholds)
    }

    /// Open unconditionally. The next [`Gate::update`] re-evaluates.
    pub fn force_open(&mut self) -> Option<GateTransition> {
        self.set_state(GateState::Open)
    }

    fn set_state(&mut self, next: GateState) -> Option<GateTransition> {
        if next == self.state {
            return None;
        }
        self.state = next;
        Some(match next {
            GateState::Open => GateTransition::Opened,
            GateState::Closed => GateTransition::Closed,
        })
    }

    /// Resolve a particle against this gate.
    ///
    /// - Open: a particle inside is moved `exit_offset` below the bottom edge.
    /// - Closed: a particle whose next position `position + velocity` falls
    ///   inside gets `repulsion * (position - center)` added to its velocity.
    ///
    /// Returns `true` when the gate handled the particle.
    pub fn collide(
        &self,
        position: &mut Vec2,
        velocity: &mut Vec2,
        exit_offset: f32,
        repulsion: f32,
    ) -> bool {
        match self.state {
            GateState::Open => {
                if !self.contains(*position) {
                    return false;
                }
                position.y = self.region.bottom() - exit_offset;
                true
            }
            GateState::Closed => {
                if !self.contains(*position + *velocity) {
                    return false;
                }
                *velocity += (*position - self.center()) * repulsion;
                true
            }
        }
    }
}

impl SpatialFeature for Gate {
    fn region(&self) -> &Region {
        &self.region
    }
}

//! Tunable physics constants.
//!
//! Every number the engine uses lives here. [`PhysicsConfig::default`] holds
//! the standard membrane constants; scenario files may override any subset of
//! fields.
//!
//! # Example
//!
//! ```
//! use ionsim::{ParticleSystem, PhysicsConfig, Region};
//!
//! let config = PhysicsConfig::default().with_seed(42).with_drag(0.05);
//! let system = ParticleSystem::with_config(100, Region::new(-10.0, 10.0, -10.0, 10.0), config);
//! assert_eq!(system.config().seed, 42);
//! ```

use crate::rng::DEFAULT_SEED;
use crate::Vec2;
use serde::{Deserialize, Serialize};

/// Physics and feature constants for a [`ParticleSystem`](crate::ParticleSystem).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Seed for spawn positions and regulator reactivation.
    pub seed: u64,
    /// Charge used in the particle-particle force law.
    pub particle_charge: f32,
    /// Per-axis clamp applied to each pairwise force.
    pub particle_force_limit: f32,
    /// Fraction of velocity removed every step.
    pub drag: f32,
    /// Pairs closer than this exert no force on each other.
    pub min_separation: f32,
    /// Half-range of the random velocity given by `create_particles`.
    pub initial_speed: f32,
    /// Where inactive particles are parked.
    pub sentinel: Vec2,

    /// Magnitude of each of the two pump dipole charges.
    pub pump_charge: f32,
    /// Per-axis clamp applied to each pump charge's force.
    pub pump_force_limit: f32,
    /// Velocity multiplier applied when a particle is pumped through.
    pub pump_damping: f32,

    /// Field `y` below which a gate opens.
    pub gate_open_threshold: f32,
    /// Field `y` above which a gate closes.
    pub gate_close_threshold: f32,
    /// Strength of the nudge a closed gate gives approaching particles.
    pub gate_repulsion: f32,

    /// Restoring-force coefficient for blockages.
    pub blockage_stiffness: f32,

    /// Distance past a feature edge at which relocated particles are placed.
    pub exit_offset: f32,
    /// Half-height of the strip around the boundary midline counted by
    /// [`ParticleSystem::membrane_potential`](crate::ParticleSystem::membrane_potential).
    pub membrane_half_width: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            particle_charge: 1.0,
            particle_force_limit: 0.10,
            drag: 0.08,
            min_separation: 1e-3,
            initial_speed: 0.1,
            sentinel: Vec2::new(1000.0, 1000.0),
            pump_charge: 1.0,
            pump_force_limit: 0.10,
            pump_damping: 0.1,
            gate_open_threshold: -0.4,
            gate_close_threshold: 0.0,
            gate_repulsion: 0.01,
            blockage_stiffness: 0.05,
            exit_offset: 0.01,
            membrane_half_width: 0.5,
        }
    }
}

impl PhysicsConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_drag(mut self, drag: f32) -> Self {
        self.drag = drag;
        self
    }

    pub fn with_particle_force_limit(mut self, limit: f32) -> Self {
        self.particle_force_limit = limit;
        self
    }

    pub fn with_initial_speed(mut self, speed: f32) -> Self {
        self.initial_speed = speed;
        self
    }

    /// Set both gate thresholds. `open` should not exceed `close`, otherwise
    /// the dead zone disappears and `open` wins.
    pub fn with_gate_thresholds(mut self, open: f32, close: f32) -> Self {
        self.gate_open_threshold = open;
        self.gate_close_threshold = close;
        self
    }

    pub fn with_membrane_half_width(mut self, half_width: f32) -> Self {
        self.membrane_half_width = half_width;
        self
    }
}

//! # ionsim - membrane ion transport simulation
//!
//! Charged point particles in a 2D box, pushed around by each other and by a
//! handful of stateful features that model a cell membrane:
//!
//! | Feature | Behaviour |
//! |---------|-----------|
//! | [`Blockage`] | Passive obstacle, pushes overlapping particles out vertically |
//! | [`Pump`] | Dipole that draws particles in from below and ejects them above |
//! | [`Gate`] | Voltage-gated channel with hysteresis, passes particles downward when open |
//! | [`ConcentrationRegulator`] | Holds the particle count in a region at a target |
//!
//! The engine is frame-stepped and deterministic: the same seed, capacity and
//! setup calls produce bit-identical buffers after any number of steps.
//! Rendering, windowing and UI are left to the caller, which reads
//! [`ParticleSystem::positions`] once per frame.
//!
//! ## Quick Start
//!
//! ```
//! use ionsim::prelude::*;
//!
//! let mut system = ParticleSystem::new(300, Region::new(-10.0, 10.0, -10.0, 10.0));
//!
//! // membrane along y = 0 with one pump and one gate in it
//! system.add_blockage(Region::new(-10.0, -3.0, -0.5, 0.5));
//! system.add_pump(Region::new(-3.0, -1.0, -0.5, 0.5));
//! system.add_blockage(Region::new(-1.0, 1.0, -0.5, 0.5));
//! system.add_gate(Region::new(1.0, 3.0, -0.5, 0.5));
//! system.add_blockage(Region::new(3.0, 10.0, -0.5, 0.5));
//!
//! // keep the lower compartment topped up
//! system.add_concentration_regulator(Region::new(-10.0, 10.0, -10.0, -1.0), 100);
//! system.create_particles(100, Region::new(-10.0, 10.0, -10.0, -1.0));
//!
//! for _ in 0..60 {
//!     system.update();
//! }
//! println!("membrane potential: {}", system.membrane_potential());
//! ```
//!
//! ## Determinism
//!
//! All randomness comes from a [`DeterministicRng`] seeded from
//! [`PhysicsConfig::seed`]. Pairwise forces for a step are computed from the
//! positions at the start of that step before anything moves, so enabling
//! the `parallel` feature (rayon) does not change results.
//!
//! ## Diagnostics
//!
//! [`ParticleSystem::set_observer`] installs a callback that receives
//! [`StepMetrics`] after every step. The engine also logs through the `log`
//! facade: setup and gate transitions at `debug`, regulator activity at
//! `trace`.

mod blockage;
pub mod config;
mod error;
pub mod forces;
mod gate;
mod metrics;
mod particles;
mod pump;
mod region;
mod regulator;
pub mod rng;
mod system;

pub use blockage::Blockage;
pub use bytemuck;
pub use glam;
pub use glam::Vec2;
pub use config::PhysicsConfig;
pub use error::GeometryError;
pub use gate::{Gate, GateState, GateThresholds, GateTransition};
pub use metrics::{Observer, StepMetrics};
pub use particles::Particles;
pub use pump::{DipoleParams, Pump};
pub use region::{Region, SpatialFeature};
pub use regulator::{ConcentrationRegulator, RegulatorAction};
pub use rng::DeterministicRng;
pub use system::ParticleSystem;

/// Convenient re-exports for common usage.
///
/// ```
/// use ionsim::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::PhysicsConfig;
    pub use crate::gate::GateState;
    pub use crate::metrics::StepMetrics;
    pub use crate::region::{Region, SpatialFeature};
    pub use crate::system::ParticleSystem;
    pub use glam::Vec2;
}

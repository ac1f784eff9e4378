//! Per-step diagnostics.
//!
//! Rather than writing counters into a UI as a side effect of stepping, the
//! engine hands a [`StepMetrics`] to an optional observer after every
//! [`ParticleSystem::update`](crate::ParticleSystem::update).
//!
//! ```
//! use ionsim::{ParticleSystem, Region};
//! use std::sync::{Arc, Mutex};
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//!
//! let mut system = ParticleSystem::new(16, Region::new(-5.0, 5.0, -5.0, 5.0));
//! system.create_particles(8, Region::new(-4.0, 4.0, -4.0, 4.0));
//! system.set_observer(move |m| sink.lock().unwrap().push(m.active_count));
//! system.update();
//!
//! assert_eq!(*seen.lock().unwrap(), vec![8]);
//! ```

/// Snapshot of simulation counters taken at the end of a step.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StepMetrics {
    /// Frames completed, including this one.
    pub frame: u64,
    /// Active particles after the step.
    pub active_count: usize,
    /// See [`ParticleSystem::membrane_potential`](crate::ParticleSystem::membrane_potential).
    pub membrane_potential: f32,
    /// Gates open after sensing.
    pub open_gates: usize,
    /// Gates that changed state during sensing this step.
    pub gate_transitions: usize,
    /// Particles found outside the boundary and deactivated this step.
    pub escaped: usize,
    /// Particles switched on by regulators this step.
    pub regulator_activations: usize,
    /// Particles switched off by regulators this step.
    pub regulator_deactivations: usize,
}

/// Callback invoked with the metrics of each completed step.
pub type Observer = Box<dyn FnMut(&StepMetrics) + Send>;

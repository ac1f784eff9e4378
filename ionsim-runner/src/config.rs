//! Scenario configuration.
//!
//! A [`ScenarioConfig`] holds everything needed to rebuild a
//! [`ParticleSystem`]: the domain, initial spawns, every membrane feature,
//! physics constants, and how long to run. Scenarios are stored as JSON and
//! any field with a sensible default may be omitted:
//!
//! ```json
//! {
//!   "name": "Single pump",
//!   "capacity": 50,
//!   "boundary": { "left": -10.0, "right": 10.0, "bottom": -10.0, "top": 10.0 },
//!   "spawn": [{ "region": { "left": -9.0, "right": 9.0, "bottom": -9.0, "top": -1.0 }, "count": 50 }],
//!   "pumps": [{ "left": -1.0, "right": 1.0, "bottom": -0.5, "top": 0.5 }],
//!   "physics": { "seed": 7 }
//! }
//! ```

use ionsim::{ParticleSystem, PhysicsConfig, Region};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading, saving or validating a scenario.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("scenario file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// Malformed JSON, or a region whose bounds are inverted or not finite.
    #[error("invalid scenario: {0}")]
    Json(#[from] serde_json::Error),
    #[error("scenario capacity must be at least 1")]
    ZeroCapacity,
    #[error("boundary has no area ({width} x {height})")]
    DegenerateBoundary { width: f32, height: f32 },
}

/// Particles to activate when the scenario starts.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SpawnConfig {
    pub region: Region,
    pub count: usize,
}

/// A concentration regulator and its target count.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RegulatorConfig {
    pub region: Region,
    pub target: usize,
}

fn default_steps() -> u64 {
    1000
}

fn default_report_interval() -> u64 {
    100
}

/// Complete scenario description.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ScenarioConfig {
    pub name: String,
    pub capacity: usize,
    pub boundary: Region,
    #[serde(default)]
    pub spawn: Vec<SpawnConfig>,
    #[serde(default)]
    pub blockages: Vec<Region>,
    #[serde(default)]
    pub pumps: Vec<Region>,
    #[serde(default)]
    pub gates: Vec<Region>,
    #[serde(default)]
    pub regulators: Vec<RegulatorConfig>,
    /// Open every gate before the first step.
    #[serde(default)]
    pub gates_open: bool,
    #[serde(default)]
    pub physics: PhysicsConfig,
    /// Steps to run when no count is given on the command line.
    #[serde(default = "default_steps")]
    pub steps: u64,
    /// Log metrics every this many steps. Zero disables periodic reports.
    #[serde(default = "default_report_interval")]
    pub report_interval: u64,
}

impl Default for ScenarioConfig {
    /// 100 particles below a membrane across the middle of a 20 x 20 box,
    /// with one pump and one gate in the membrane.
    fn default() -> Self {
        Self {
            name: "Membrane".into(),
            capacity: 100,
            boundary: Region::new(-10.0, 10.0, -10.0, 10.0),
            spawn: vec![SpawnConfig {
                region: Region::new(-10.0, 10.0, -10.0, -1.0),
                count: 80,
            }],
            blockages: vec![
                Region::new(-10.0, -3.0, -0.5, 0.5),
                Region::new(-1.0, 1.0, -0.5, 0.5),
                Region::new(3.0, 10.0, -0.5, 0.5),
            ],
            pumps: vec![Region::new(-3.0, -1.0, -0.5, 0.5)],
            gates: vec![Region::new(1.0, 3.0, -0.5, 0.5)],
            regulators: vec![RegulatorConfig {
                region: Region::new(-10.0, 10.0, -10.0, -1.0),
                target: 80,
            }],
            gates_open: false,
            physics: PhysicsConfig::default(),
            steps: default_steps(),
            report_interval: default_report_interval(),
        }
    }
}

impl ScenarioConfig {
    /// Save the scenario to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load a scenario from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject scenarios the engine cannot run meaningfully.
    ///
    /// Features that stick out of the boundary are allowed but logged.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        let (width, height) = (self.boundary.width(), self.boundary.height());
        if !(width > 0.0 && height > 0.0) {
            return Err(ConfigError::DegenerateBoundary { width, height });
        }

        let features = self
            .blockages
            .iter()
            .map(|r| ("blockage", r))
            .chain(self.pumps.iter().map(|r| ("pump", r)))
            .chain(self.gates.iter().map(|r| ("gate", r)))
            .chain(self.regulators.iter().map(|r| ("regulator", &r.region)))
            .chain(self.spawn.iter().map(|s| ("spawn", &s.region)));
        for (kind, region) in features {
            if !encloses(&self.boundary, region) {
                warn!("{}: {} {:?} extends past the boundary", self.name, kind, region);
            }
        }

        let spawned = self.spawn_count();
        if spawned > self.capacity {
            warn!(
                "{}: spawns {} particles but capacity is {}",
                self.name, spawned, self.capacity
            );
        }
        Ok(())
    }

    /// Total particles requested by the spawn list.
    pub fn spawn_count(&self) -> usize {
        self.spawn.iter().map(|s| s.count).sum()
    }

    /// Build a ready-to-step system from this scenario.
    ///
    /// Features are added in file order, which is also the order they are
    /// resolved in every step.
    pub fn build(&self) -> Result<ParticleSystem, ConfigError> {
        self.validate()?;

        let mut system = ParticleSystem::with_config(self.capacity, self.boundary, self.physics.clone());
        for &region in &self.blockages {
            system.add_blockage(region);
        }
        for &region in &self.pumps {
            system.add_pump(region);
        }
        for &region in &self.gates {
            system.add_gate(region);
        }
        for r in &self.regulators {
            system.add_concentration_regulator(r.region, r.target);
        }
        for s in &self.spawn {
            system.create_particles(s.count, s.region);
        }
        if self.gates_open {
            system.force_open_gates();
        }
        Ok(system)
    }
}

fn encloses(outer: &Region, inner: &Region) -> bool {
    inner.left() >= outer.left()
        && inner.right() <= outer.right()
        && inner.bottom() >= outer.bottom()
        && inner.top() <= outer.top()
}

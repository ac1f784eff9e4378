//! ionsim runner - headless scenario execution
//!
//! This crate provides:
//! - Serializable scenario configuration ([`ScenarioConfig`])
//! - A table of built-in scenarios ([`PRESETS`])
//! - Run totals accumulated from step metrics ([`RunSummary`])
//! - The `ionsim-runner` binary, which loads a scenario, steps it and logs
//!   metrics

pub mod config;
pub mod presets;
pub mod report;

pub use config::{ConfigError, RegulatorConfig, ScenarioConfig, SpawnConfig};
pub use presets::{Preset, PRESETS};
pub use report::RunSummary;

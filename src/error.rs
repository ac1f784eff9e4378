//! Error types for ionsim.
//!
//! The engine itself never fails at runtime; errors only arise when geometry
//! is constructed from untrusted input (scenario files, UI fields).

use thiserror::Error;

/// Errors raised when validating region geometry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// One of the bounds is NaN or infinite.
    #[error("region bound `{name}` is not finite ({value})")]
    NonFinite {
        /// Which bound was rejected.
        name: &'static str,
        /// The rejected value.
        value: f32,
    },
    /// `left > right` or `bottom > top`.
    #[error("region is inverted: {low_name} ({low}) > {high_name} ({high})")]
    Inverted {
        low_name: &'static str,
        low: f32,
        high_name: &'static str,
        high: f32,
    },
}

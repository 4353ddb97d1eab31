//! Error types for simulation operations.

use sw_core::CoreError;
use thiserror::Error;

/// Errors encountered while integrating.
///
/// The steppers themselves never fail; these come from argument checks,
/// state-size checks and the non-finite guard on finished trajectories.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Dimension mismatch: expected state of length {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("Non-finite state at sample {index} (t = {t})")]
    NonFinite { index: usize, t: f64 },

    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}

pub type SimResult<T> = Result<T, SimError>;

// argus_core/src/error.rs

use thiserror::Error;

/// Everything that can go wrong inside the core routines.
///
/// The routines never try to recover: an error is returned to the caller as
/// soon as an input contract is broken or a matrix cannot be inverted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgusError {
    /// The maneuvering state vector must have exactly 8 or 9 entries.
    #[error("maneuver state must have 8 or 9 elements, got {found}")]
    InvalidStateDimension { found: usize },

    #[error("target step {step} is outside the smoothing window of length {len}")]
    TargetStepOutOfRange { step: usize, len: usize },

    #[error("dimension mismatch in {what}: expected {expected}, found {found}")]
    DimensionMismatch {
        what: &'static str,
        expected: String,
        found: String,
    },

    #[error("the smoothing window contains no measurements")]
    EmptyWindow,

    /// A matrix that has to be inverted is singular (or numerically so).
    #[error("{what} at step {step} is singular")]
    SingularMatrix { what: &'static str, step: usize },
}

impl ArgusError {
    pub(crate) fn shape_mismatch(
        what: &'static str,
        expected: (usize, usize),
        found: (usize, usize),
    ) -> Self {
        Self::DimensionMismatch {
            what,
            expected: format!("{}x{}", expected.0, expected.1),
            found: format!("{}x{}", found.0, found.1),
        }
    }

    pub(crate) fn length_mismatch(what: &'static str, expected: usize, found: usize) -> Self {
        Self::DimensionMismatch {
            what,
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }
}

//! Build errors for session construction.

use crate::core::StateViolation;
use thiserror::Error;

/// Errors that can occur when building a session.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Initial state is invalid: {0}")]
    InvalidInitialState(StateViolation),

    #[error("Seed value '{0}' is not a number")]
    InvalidSeed(String),

    #[error("Both .initial(state) and .seed(value) were given. Pick one")]
    ConflictingStart,
}

//! Session and query errors.

use crate::minimizer::MinimizerError;
use crate::session::Stage;
use eq_core::CoreError;
use thiserror::Error;

/// Result type for session and query operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors surfaced to callers of the session and query façade.
///
/// Nothing here is retried or logged by this crate.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    /// Model parameters could not be located or parsed. The session is reset.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Component or phase index outside `[0, len)`.
    #[error("Index out of range: {what} index {index} not in [0, {len})")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },

    /// Operation issued before the session reached the required stage.
    #[error("Not ready: {operation} requires stage {required}, session is {actual}")]
    NotReady {
        operation: &'static str,
        required: Stage,
        actual: Stage,
    },

    /// Solver did not converge or rejected the inputs.
    #[error("Minimization failed: {message}")]
    MinimizationFailure { message: String },

    /// Solver output violates a documented invariant.
    #[error("Data integrity error: {message}")]
    DataIntegrity { message: String },

    /// Inputs changed since the held result set was produced.
    #[error("Stale result: inputs changed since the last successful minimization")]
    StaleResult,

    /// Name did not resolve to an index.
    #[error("Unknown {what}: {name}")]
    UnknownName { what: &'static str, name: String },
}

impl From<CoreError> for SessionError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::IndexOob { what, index, len } => {
                SessionError::IndexOutOfRange { what, index, len }
            }
            other => SessionError::DataIntegrity {
                message: other.to_string(),
            },
        }
    }
}

impl From<MinimizerError> for SessionError {
    fn from(err: MinimizerError) -> Self {
        match err {
            MinimizerError::Load { message } => SessionError::Configuration { message },
            other => SessionError::MinimizationFailure {
                message: other.to_string(),
            },
        }
    }
}

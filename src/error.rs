//! Error types for TSP solving.
//!
//! Logic defects (a missing Held–Karp state, an ant left without a
//! candidate) are not represented here: they panic, because continuing
//! would report a wrong tour.

use thiserror::Error;

/// Result alias used across the crate.
pub type TspResult<T> = Result<T, TspError>;

/// Errors surfaced to callers of the solvers and the I/O layer.
///
/// # Examples
///
/// ```
/// use u_tsp::{CostMatrix, TspError};
///
/// let err = CostMatrix::new(vec![vec![0.0]]).unwrap_err();
/// assert!(matches!(err, TspError::InvalidInstance(_)));
/// ```
#[derive(Debug, Error)]
pub enum TspError {
    /// The cost matrix cannot describe a tour: too small, not square,
    /// or holding negative / non-finite costs.
    #[error("invalid instance: {0}")]
    InvalidInstance(String),

    /// A solver parameter record failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A node sequence breaks the closed-tour invariants.
    #[error("invalid tour: {0}")]
    InvalidTour(String),

    /// Malformed matrix or run-configuration text.
    #[error("parse error at line {line}: {message}")]
    Parse {
        /// 1-based line number in the source text.
        line: usize,
        /// What was wrong with the line.
        message: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TspError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        TspError::Parse {
            line,
            message: message.into(),
        }
    }
}

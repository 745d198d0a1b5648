//! Error types for solver setup.

use thiserror::Error;

/// Errors that stop the solver before it can iterate.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Invalid solver configuration: {what}")]
    InvalidConfig { what: &'static str },

    /// Newton needs a square system.
    #[error("Dimension mismatch: {unknowns} unknowns but {residuals} residuals")]
    DimensionMismatch { unknowns: usize, residuals: usize },
}

pub type SolverResult<T> = Result<T, SolverError>;

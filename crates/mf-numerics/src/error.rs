//! Error types for operator construction and rescaling.

use thiserror::Error;

/// Errors raised by the operators builder.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NumericsError {
    #[error("At least 2 control points are required, got {requested}")]
    TooFewControlPoints { requested: usize },

    /// Rescaling would divide by a (near) zero span or rate; the segment is malformed.
    #[error("Degenerate operator: {what} = {value}")]
    DegenerateOperator { what: &'static str, value: f64 },

    #[error("Length mismatch for {what}: expected {expected}, got {actual}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Singular matrix while building {what}")]
    Singular { what: &'static str },
}

pub type NumericsResult<T> = Result<T, NumericsError>;

//! Error types for state access.

use thiserror::Error;

/// Errors raised when reading or writing state regions.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StateError {
    /// A step read a key no earlier step has written.
    #[error("Missing field: {path}")]
    MissingField { path: String },

    #[error("Shape mismatch for {path}: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        path: String,
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("Column {column} out of range for {path} ({columns} columns)")]
    ColumnOutOfRange {
        path: String,
        column: usize,
        columns: usize,
    },

    #[error("Flattened length mismatch for {region}: expected {expected}, got {actual}")]
    FlatLength {
        region: &'static str,
        expected: usize,
        actual: usize,
    },
}

pub type StateResult<T> = Result<T, StateError>;

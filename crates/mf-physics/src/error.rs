//! Error types for physics adapters.

use mf_state::StateError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by physics adapters.
#[derive(Error, Debug)]
pub enum PhysicsError {
    #[error("Invalid input: {what}")]
    InvalidInput { what: String },

    #[error("Altitude {altitude} m outside the atmosphere model range")]
    AltitudeOutOfRange { altitude: f64 },

    #[error("Vehicle has no component '{tag}'")]
    MissingComponent { tag: String },

    #[error("{what} used before initialize")]
    NotInitialized { what: &'static str },

    #[error("Invalid training table: {what}")]
    Table { what: String },

    #[error("State error: {0}")]
    State(#[from] StateError),

    #[error("Interpolation setup error: {0}")]
    InterpSetup(#[from] ninterp::error::ValidateError),

    #[error("Interpolation error: {0}")]
    Interp(#[from] ninterp::error::InterpolateError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type PhysicsResult<T> = Result<T, PhysicsError>;

/// Failure of an external collaborator process.
///
/// Never crosses the adapter boundary: training maps it to a failed case.
#[derive(Error, Debug)]
pub enum ExternalProcessError {
    #[error("Failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with status {code:?}")]
    ExitStatus { program: String, code: Option<i32> },

    #[error("Cannot read {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed output in {path}: {what}")]
    Malformed { path: PathBuf, what: String },
}

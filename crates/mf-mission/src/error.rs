//! Error types for segment and mission evaluation.

use mf_core::MfError;
use mf_numerics::NumericsError;
use mf_physics::PhysicsError;
use mf_solver::{FailureCause, SolverError};
use mf_state::StateError;
use thiserror::Error;

/// Errors raised while evaluating segments and missions.
#[derive(Error, Debug)]
pub enum MissionError {
    /// The solver gave up on a segment.
    #[error("Segment '{segment}' did not converge: {cause}")]
    NonConvergence { segment: String, cause: FailureCause },

    #[error("Segment '{segment}': {what}")]
    Profile { segment: String, what: String },

    #[error("Duplicate segment tag '{tag}'")]
    DuplicateSegment { tag: String },

    #[error("Unknown segment '{tag}'")]
    UnknownSegment { tag: String },

    #[error("Invariant violated: {what}")]
    Invariant { what: &'static str },

    #[error("Numeric error: {0}")]
    Core(#[from] MfError),

    #[error("State error: {0}")]
    State(#[from] StateError),

    #[error("Numerics error: {0}")]
    Numerics(#[from] NumericsError),

    #[error("Physics error: {0}")]
    Physics(#[from] PhysicsError),

    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),
}

pub type MissionResult<T> = Result<T, MissionError>;

impl MissionError {
    /// True for errors that mean the unknowns left the physical domain of the
    /// segment (an extent of the wrong sign, an altitude outside the
    /// atmosphere model, a non-finite value). The solver backs off from such
    /// points instead of aborting.
    pub fn is_outside_domain(&self) -> bool {
        matches!(
            self,
            MissionError::Numerics(NumericsError::DegenerateOperator { .. })
                | MissionError::Physics(PhysicsError::AltitudeOutOfRange { .. })
                | MissionError::Core(MfError::NonFinite { .. })
        )
    }

    pub(crate) fn profile(segment: &str, what: impl Into<String>) -> Self {
        MissionError::Profile {
            segment: segment.to_string(),
            what: what.into(),
        }
    }
}

//! Newton-type root finder for segment residual systems.
//!
//! The solver treats the flattened unknowns as the independent vector and the
//! flattened residuals as the dependent vector. The Jacobian is estimated by
//! finite differences, so the residual function must be deterministic.
//!
//! Giving up is not an error: a [`NewtonResult`] always carries a
//! [`SolveStatus`], and `Failed` names the [`FailureCause`]. Errors raised by the
//! residual function itself propagate unmodified through the caller's error type.

pub mod error;
pub mod jacobian;
pub mod newton;

pub use error::{SolverError, SolverResult};
pub use jacobian::{JacobianScheme, central_difference_jacobian, finite_difference_jacobian};
pub use newton::{FailureCause, NewtonConfig, NewtonResult, RootFinder, SolveStatus, newton_solve};

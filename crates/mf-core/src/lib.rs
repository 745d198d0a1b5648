//! mf-core: stable foundation for missionflow.
//!
//! Contains:
//! - units (uom SI types + constructors used at the parameter boundary)
//! - numeric (finiteness and residual norms)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

pub use error::{MfError, MfResult};
pub use numeric::*;
pub use units::*;

//! Physics adapters consumed by segment processes.
//!
//! Each concern is one trait with interchangeable implementations:
//! - [`Atmosphere`]: altitude to air properties ([`StandardAtmosphere`], [`WindTunnel`])
//! - [`Aerodynamics`]: flight condition to force coefficients ([`ParabolicPolar`],
//!   [`SurrogateAerodynamics`], [`ExternalProcessAerodynamics`])
//! - [`Propulsion`]: throttle to thrust and fuel flow ([`ThrottledThrust`])
//! - [`Weights`]: vehicle to mass breakdown ([`FixedWeights`], [`UavBuildup`])
//!
//! Adapters that need expensive setup (CFD training) do it in
//! [`Aerodynamics::initialize`]; `evaluate` only touches in-memory models.

pub mod aerodynamics;
pub mod air;
pub mod atmosphere;
pub mod cfd;
pub mod error;
pub mod propulsion;
pub mod surrogate;
pub mod vehicle;
pub mod weights;

pub use aerodynamics::{AeroCoefficients, Aerodynamics, ParabolicPolar};
pub use air::Air;
pub use atmosphere::{Atmosphere, AtmosphereProperties, StandardAtmosphere, WindTunnel};
pub use cfd::{
    CaseOutcome, CfdCase, CfdCollaborator, ExternalProcessAerodynamics, Su2Runner, TrainingGrid,
};
pub use error::{ExternalProcessError, PhysicsError, PhysicsResult};
pub use propulsion::{Propulsion, ThrottledThrust, ThrustOutput};
pub use surrogate::{CoefficientSample, SurrogateAerodynamics, TrainingTable};
pub use vehicle::{Fuselage, MassProperties, Vehicle, Wing};
pub use weights::{FixedWeights, MassBreakdown, UavBuildup, Weights};

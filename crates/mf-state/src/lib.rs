//! Per-segment state container.
//!
//! A [`State`] holds three regions sampled at the segment's control points:
//! - `unknowns`: free variables the solver adjusts ([`VarSet`], ordered)
//! - `residuals`: equation errors driven to zero ([`VarSet`], ordered)
//! - `conditions`: every derived physical quantity ([`Conditions`], typed)
//!
//! Every array in a state shares the same row count. Reading a condition that
//! no step has written yet is a [`StateError::MissingField`] rather than a
//! silent zero.

pub mod components;
pub mod conditions;
pub mod error;
pub mod series;
pub mod state;
pub mod varset;

pub use components::ComponentMap;
pub use conditions::{
    Aerodynamics, Body, Conditions, Frames, Freestream, Inertial, Propulsion, Weights, Wind,
};
pub use error::{StateError, StateResult};
pub use series::Series;
pub use state::{Numerics, State};
pub use varset::VarSet;

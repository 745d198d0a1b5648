//! The per-segment [`State`] root.

use crate::conditions::Conditions;
use crate::error::{StateError, StateResult};
use crate::varset::VarSet;
use mf_numerics::Operators;

/// Discretization carried by a state.
#[derive(Clone, Debug, PartialEq)]
pub struct Numerics {
    pub control_points: usize,
    pub dimensionless: Option<Operators>,
    /// Operators rescaled to the segment's physical time extent.
    pub time: Option<Operators>,
}

impl Numerics {
    pub fn new(control_points: usize) -> Self {
        Self {
            control_points,
            dimensionless: None,
            time: None,
        }
    }

    pub fn dimensionless(&self) -> StateResult<&Operators> {
        self.dimensionless
            .as_ref()
            .ok_or_else(|| StateError::MissingField {
                path: "numerics.dimensionless".to_string(),
            })
    }

    pub fn time(&self) -> StateResult<&Operators> {
        self.time.as_ref().ok_or_else(|| StateError::MissingField {
            path: "numerics.time".to_string(),
        })
    }
}

/// Unknowns, residuals and conditions for one segment solve.
#[derive(Clone, Debug, PartialEq)]
pub struct State {
    pub numerics: Numerics,
    pub unknowns: VarSet,
    pub residuals: VarSet,
    pub conditions: Conditions,
    /// Final conditions of the previous segment, read-only.
    pub initials: Option<Conditions>,
}

impl State {
    pub fn new(control_points: usize) -> Self {
        Self {
            numerics: Numerics::new(control_points),
            unknowns: VarSet::new("unknowns"),
            residuals: VarSet::new("residuals"),
            conditions: Conditions::default(),
            initials: None,
        }
    }

    pub fn control_points(&self) -> usize {
        self.numerics.control_points
    }

    /// Allocate every region with the state's control point count.
    ///
    /// Operators are dropped; they are rebuilt by the segment's initialize phase.
    pub fn expand(&mut self) {
        let rows = self.numerics.control_points;
        self.numerics.dimensionless = None;
        self.numerics.time = None;
        self.unknowns.expand(rows);
        self.residuals.expand(rows);
        self.conditions.expand(rows);
    }

    /// Start a new pass over the iterate phase.
    ///
    /// Conditions and time operators from the previous pass become unreadable,
    /// so a step that is skipped this pass cannot leak stale values. Unknowns,
    /// initials and the dimensionless operators are kept.
    pub fn begin_pass(&mut self) {
        self.numerics.time = None;
        self.conditions.invalidate();
    }
}

//! Aerodynamics adapter interface and the direct-compute drag polar.

use crate::error::{PhysicsError, PhysicsResult};
use mf_state::{ComponentMap, Conditions};
use nalgebra::DVector;
use std::f64::consts::PI;
use std::fmt;

/// Force and moment coefficients at each control point.
#[derive(Clone, Debug, PartialEq)]
pub struct AeroCoefficients {
    pub lift: DVector<f64>,
    pub drag: DVector<f64>,
    pub moment: DVector<f64>,
    /// Drag contributions keyed by name; sums to `drag`.
    pub drag_breakdown: ComponentMap<DVector<f64>>,
}

/// One interface for every aerodynamics variant.
///
/// `evaluate` reads `aerodynamics.angle_of_attack` and the freestream from the
/// conditions and must not launch external work.
pub trait Aerodynamics: fmt::Debug + Send + Sync {
    /// Build cached models. Runs once per segment initialize; repeated calls
    /// reuse what was built.
    fn initialize(&self) -> PhysicsResult<()> {
        Ok(())
    }

    fn evaluate(&self, conditions: &Conditions) -> PhysicsResult<AeroCoefficients>;
}

/// Linear lift curve with a parabolic drag polar.
///
/// `CL = clamp(cl_zero + cl_alpha α, -cl_max, cl_max)` and
/// `CD = CDp + CL²/(π AR e) + K CDp CL²`.
#[derive(Clone, Debug, PartialEq)]
pub struct ParabolicPolar {
    /// Lift at zero angle of attack [-]
    pub cl_zero: f64,
    /// Lift curve slope [1/rad]
    pub cl_alpha: f64,
    pub cl_max: f64,
    /// Zero-lift parasite drag [-]
    pub cd_parasite: f64,
    pub aspect_ratio: f64,
    /// Span efficiency [-]
    pub span_efficiency: f64,
    /// Viscous lift-dependent drag factor K [-]
    pub viscous_lift_factor: f64,
    /// Pitching moment coefficient, constant [-]
    pub cm_zero: f64,
}

impl Default for ParabolicPolar {
    fn default() -> Self {
        Self {
            cl_zero: 0.2,
            cl_alpha: 2.0 * PI,
            cl_max: 1.5,
            cd_parasite: 0.025,
            aspect_ratio: 8.0,
            span_efficiency: 0.85,
            viscous_lift_factor: 0.0,
            cm_zero: 0.0,
        }
    }
}

impl ParabolicPolar {
    fn validate(&self) -> PhysicsResult<()> {
        if !(self.aspect_ratio > 0.0 && self.span_efficiency > 0.0) {
            return Err(PhysicsError::InvalidInput {
                what: "drag polar needs positive aspect ratio and span efficiency".to_string(),
            });
        }
        if !(self.cl_max > 0.0) {
            return Err(PhysicsError::InvalidInput {
                what: "drag polar needs positive cl_max".to_string(),
            });
        }
        Ok(())
    }

    pub fn lift(&self, angle_of_attack: f64) -> f64 {
        (self.cl_zero + self.cl_alpha * angle_of_attack).clamp(-self.cl_max, self.cl_max)
    }
}

impl Aerodynamics for ParabolicPolar {
    fn initialize(&self) -> PhysicsResult<()> {
        self.validate()
    }

    fn evaluate(&self, conditions: &Conditions) -> PhysicsResult<AeroCoefficients> {
        let alpha = conditions.aerodynamics.angle_of_attack.column(0)?;
        let lift = alpha.map(|a| self.lift(a));

        let k_induced = 1.0 / (PI * self.aspect_ratio * self.span_efficiency);
        let parasite = DVector::from_element(lift.len(), self.cd_parasite);
        let induced = lift.map(|cl| {
            k_induced * cl * cl + self.viscous_lift_factor * self.cd_parasite * cl * cl
        });
        let drag = &parasite + &induced;

        let mut drag_breakdown = ComponentMap::new();
        drag_breakdown.insert("parasite", parasite);
        drag_breakdown.insert("induced", induced);

        Ok(AeroCoefficients {
            moment: DVector::from_element(lift.len(), self.cm_zero),
            lift,
            drag,
            drag_breakdown,
        })
    }
}

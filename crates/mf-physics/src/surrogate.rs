//! Tabulated aerodynamics over (angle of attack, Mach).

use crate::aerodynamics::{AeroCoefficients, Aerodynamics};
use crate::error::{PhysicsError, PhysicsResult};
use mf_state::{ComponentMap, Conditions};
use nalgebra::DVector;
use ndarray::{Array1, Array2};
use ninterp::interpolator::Extrapolate;
use ninterp::prelude::{Interp2DOwned, Interpolator};
use ninterp::strategy::enums::Strategy2DEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coefficients at one grid point.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoefficientSample {
    pub lift: f64,
    pub drag: f64,
    pub moment: f64,
}

/// Coefficients sampled on a rectangular grid.
///
/// `samples` is row-major: index `i * mach.len() + j` holds the sample at
/// `(angle_of_attack[i], mach[j])`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainingTable {
    /// Strictly increasing [rad]
    pub angle_of_attack: Vec<f64>,
    /// Strictly increasing [-]
    pub mach: Vec<f64>,
    pub samples: Vec<CoefficientSample>,
}

impl TrainingTable {
    pub fn validate(&self) -> PhysicsResult<()> {
        for (name, axis) in [("angle_of_attack", &self.angle_of_attack), ("mach", &self.mach)] {
            if axis.len() < 2 {
                return Err(PhysicsError::Table {
                    what: format!("{name} axis needs at least two points"),
                });
            }
            if axis.windows(2).any(|w| !(w[1] > w[0])) {
                return Err(PhysicsError::Table {
                    what: format!("{name} axis must be strictly increasing"),
                });
            }
        }
        let expected = self.angle_of_attack.len() * self.mach.len();
        if self.samples.len() != expected {
            return Err(PhysicsError::Table {
                what: format!("expected {expected} samples, got {}", self.samples.len()),
            });
        }
        Ok(())
    }

    fn grid(&self, pick: impl Fn(&CoefficientSample) -> f64) -> PhysicsResult<Array2<f64>> {
        let shape = (self.angle_of_attack.len(), self.mach.len());
        Array2::from_shape_vec(shape, self.samples.iter().map(pick).collect()).map_err(|e| {
            PhysicsError::Table {
                what: e.to_string(),
            }
        })
    }
}

type Interp = Interp2DOwned<f64, Strategy2DEnum>;

/// Bilinear surrogate over a [`TrainingTable`], clamped at the table edges.
///
/// Built once; evaluation only interpolates.
pub struct SurrogateAerodynamics {
    table: TrainingTable,
    /// Added to the tabulated drag [-]
    parasite_drag: f64,
    lift: Interp,
    drag: Interp,
    moment: Interp,
}

impl fmt::Debug for SurrogateAerodynamics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SurrogateAerodynamics")
            .field("table", &self.table)
            .field("parasite_drag", &self.parasite_drag)
            .finish_non_exhaustive()
    }
}

impl SurrogateAerodynamics {
    pub fn new(table: TrainingTable, parasite_drag: f64) -> PhysicsResult<Self> {
        table.validate()?;
        let build = |pick: fn(&CoefficientSample) -> f64| -> PhysicsResult<Interp> {
            Ok(Interp2DOwned::new(
                Array1::from(table.angle_of_attack.clone()),
                Array1::from(table.mach.clone()),
                table.grid(pick)?,
                ninterp::strategy::Linear.into(),
                Extrapolate::Clamp,
            )?)
        };
        Ok(Self {
            lift: build(|s| s.lift)?,
            drag: build(|s| s.drag)?,
            moment: build(|s| s.moment)?,
            table,
            parasite_drag,
        })
    }

    pub fn table(&self) -> &TrainingTable {
        &self.table
    }

    /// Coefficients at a single (angle of attack, Mach) point.
    pub fn sample(&self, angle_of_attack: f64, mach: f64) -> PhysicsResult<CoefficientSample> {
        let point = [angle_of_attack, mach];
        Ok(CoefficientSample {
            lift: self.lift.interpolate(&point)?,
            drag: self.drag.interpolate(&point)?,
            moment: self.moment.interpolate(&point)?,
        })
    }
}

impl Aerodynamics for SurrogateAerodynamics {
    fn evaluate(&self, conditions: &Conditions) -> PhysicsResult<AeroCoefficients> {
        let alpha = conditions.aerodynamics.angle_of_attack.column(0)?;
        let mach = conditions.freestream.mach_number.column(0)?;
        let n = alpha.len();

        let mut lift = DVector::zeros(n);
        let mut inviscid = DVector::zeros(n);
        let mut moment = DVector::zeros(n);
        for i in 0..n {
            let s = self.sample(alpha[i], mach[i])?;
            lift[i] = s.lift;
            inviscid[i] = s.drag;
            moment[i] = s.moment;
        }

        let parasite = DVector::from_element(n, self.parasite_drag);
        let drag = &inviscid + &parasite;
        let mut drag_breakdown = ComponentMap::new();
        drag_breakdown.insert("inviscid", inviscid);
        drag_breakdown.insert("parasite", parasite);

        Ok(AeroCoefficients {
            lift,
            drag,
            moment,
            drag_breakdown,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> TrainingTable {
        // lift = alpha + mach, drag = 0.01 + alpha * mach
        let angle_of_attack = vec![0.0, 0.1, 0.2];
        let mach = vec![0.2, 0.6];
        let samples = angle_of_attack
            .iter()
            .flat_map(|&a| {
                mach.iter().map(move |&m| CoefficientSample {
                    lift: a + m,
                    drag: 0.01 + a * m,
                    moment: -0.1 * a,
                })
            })
            .collect();
        TrainingTable {
            angle_of_attack,
            mach,
            samples,
        }
    }

    #[test]
    fn bilinear_inside_grid() {
        let s = SurrogateAerodynamics::new(table(), 0.0).unwrap();
        let c = s.sample(0.05, 0.4).unwrap();
        assert!((c.lift - 0.45).abs() < 1e-12);
        assert!((c.drag - (0.01 + 0.05 * 0.4)).abs() < 1e-12);
        assert!((c.moment + 0.005).abs() < 1e-12);
    }

    #[test]
    fn clamped_outside_grid() {
        let s = SurrogateAerodynamics::new(table(), 0.0).unwrap();
        let edge = s.sample(0.2, 0.6).unwrap();
        let beyond = s.sample(0.5, 2.0).unwrap();
        assert_eq!(edge, beyond);
    }

    #[test]
    fn rejects_ragged_table() {
        let mut t = table();
        t.samples.pop();
        assert!(matches!(
            SurrogateAerodynamics::new(t, 0.0),
            Err(PhysicsError::Table { .. })
        ));

        let mut t = table();
        t.mach = vec![0.6, 0.2];
        assert!(SurrogateAerodynamics::new(t, 0.0).is_err());
    }

    #[test]
    fn evaluate_adds_parasite_drag() {
        let s = SurrogateAerodynamics::new(table(), 0.02).unwrap();
        let mut c = Conditions::default();
        c.expand(2);
        c.aerodynamics.angle_of_attack.fill_column(0, 0.1).unwrap();
        c.freestream.mach_number.fill_column(0, 0.2).unwrap();
        let out = s.evaluate(&c).unwrap();
        assert!((out.drag[1] - (0.01 + 0.02 + 0.02)).abs() < 1e-12);
        assert_eq!(out.drag_breakdown.len(), 2);
    }
}

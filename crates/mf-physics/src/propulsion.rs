//! Propulsion adapter interface and a throttled thrust model.

use crate::error::{PhysicsError, PhysicsResult};
use mf_state::Conditions;
use nalgebra::{DMatrix, DVector};
use std::fmt;

/// Thrust in body axes and the mass flow it consumes.
#[derive(Clone, Debug, PartialEq)]
pub struct ThrustOutput {
    /// `(n, 3)`, body frame
    pub thrust_force_vector: DMatrix<f64>,
    /// [kg/s], positive when fuel is burned
    pub vehicle_mass_rate: DVector<f64>,
}

pub trait Propulsion: fmt::Debug + Send + Sync {
    /// Reads `propulsion.throttle` and `freestream.density`.
    fn evaluate_thrust(&self, conditions: &Conditions) -> PhysicsResult<ThrustOutput>;
}

/// Sea-level static thrust scaled by throttle and a density lapse.
///
/// `T = engines * T_sl * throttle * (rho / rho_sl)^lapse_exponent`,
/// fuel flow `= tsfc * T`.
#[derive(Clone, Debug, PartialEq)]
pub struct ThrottledThrust {
    /// Per engine [N]
    pub sea_level_thrust: f64,
    pub engines: usize,
    /// Thrust specific fuel consumption [kg/(N·s)]
    pub tsfc: f64,
    pub lapse_exponent: f64,
    /// [kg/m³]
    pub sea_level_density: f64,
}

impl Default for ThrottledThrust {
    fn default() -> Self {
        Self {
            sea_level_thrust: 2_000.0,
            engines: 1,
            tsfc: 2.0e-5,
            lapse_exponent: 0.7,
            sea_level_density: 1.225,
        }
    }
}

impl ThrottledThrust {
    pub fn max_thrust(&self) -> f64 {
        self.sea_level_thrust * self.engines as f64
    }
}

impl Propulsion for ThrottledThrust {
    fn evaluate_thrust(&self, conditions: &Conditions) -> PhysicsResult<ThrustOutput> {
        if !(self.sea_level_density > 0.0) {
            return Err(PhysicsError::InvalidInput {
                what: "sea level density must be positive".to_string(),
            });
        }
        let throttle = conditions.propulsion.throttle.column(0)?;
        let density = conditions.freestream.density.column(0)?;

        let thrust = throttle.zip_map(&density, |tau, rho| {
            self.max_thrust() * tau * (rho / self.sea_level_density).powf(self.lapse_exponent)
        });

        let mut thrust_force_vector = DMatrix::zeros(thrust.len(), 3);
        thrust_force_vector.set_column(0, &thrust);

        Ok(ThrustOutput {
            thrust_force_vector,
            vehicle_mass_rate: thrust * self.tsfc,
        })
    }
}

//! Typed condition records.
//!
//! Every physical quantity a segment produces lives in one of these records,
//! nested under [`Conditions`]. Fields are [`Series`] so that an unwritten value
//! reads as [`StateError::MissingField`](crate::StateError::MissingField).

use crate::components::ComponentMap;
use crate::error::{StateError, StateResult};
use crate::series::Series;
use nalgebra::DVector;

/// Inertial frame quantities; vectors are `(x, y, z)` with `z` pointing down.
#[derive(Clone, Debug, PartialEq)]
pub struct Inertial {
    pub position_vector: Series,
    pub velocity_vector: Series,
    pub acceleration_vector: Series,
    pub total_force_vector: Series,
    pub gravity_force_vector: Series,
    pub time: Series,
}

impl Default for Inertial {
    fn default() -> Self {
        Self {
            position_vector: Series::new("frames.inertial.position_vector", 3),
            velocity_vector: Series::new("frames.inertial.velocity_vector", 3),
            acceleration_vector: Series::new("frames.inertial.acceleration_vector", 3),
            total_force_vector: Series::new("frames.inertial.total_force_vector", 3),
            gravity_force_vector: Series::new("frames.inertial.gravity_force_vector", 3),
            time: Series::new("frames.inertial.time", 1),
        }
    }
}

/// Body frame: rotations relative to inertial, thrust in body axes.
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    /// `(roll, pitch, yaw)` in radians.
    pub inertial_rotations: Series,
    pub thrust_force_vector: Series,
}

impl Default for Body {
    fn default() -> Self {
        Self {
            inertial_rotations: Series::new("frames.body.inertial_rotations", 3),
            thrust_force_vector: Series::new("frames.body.thrust_force_vector", 3),
        }
    }
}

/// Wind frame: rotations relative to inertial, aerodynamic forces in wind axes.
#[derive(Clone, Debug, PartialEq)]
pub struct Wind {
    pub inertial_rotations: Series,
    pub drag_force_vector: Series,
    pub lift_force_vector: Series,
}

impl Default for Wind {
    fn default() -> Self {
        Self {
            inertial_rotations: Series::new("frames.wind.inertial_rotations", 3),
            drag_force_vector: Series::new("frames.wind.drag_force_vector", 3),
            lift_force_vector: Series::new("frames.wind.lift_force_vector", 3),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frames {
    pub inertial: Inertial,
    pub body: Body,
    pub wind: Wind,
}

/// Local air properties and flight condition.
#[derive(Clone, Debug, PartialEq)]
pub struct Freestream {
    pub altitude: Series,
    pub pressure: Series,
    pub temperature: Series,
    pub density: Series,
    pub speed_of_sound: Series,
    pub dynamic_viscosity: Series,
    pub gravity: Series,
    pub velocity: Series,
    pub mach_number: Series,
    pub dynamic_pressure: Series,
    /// Per unit length.
    pub reynolds_number: Series,
}

impl Default for Freestream {
    fn default() -> Self {
        Self {
            altitude: Series::new("freestream.altitude", 1),
            pressure: Series::new("freestream.pressure", 1),
            temperature: Series::new("freestream.temperature", 1),
            density: Series::new("freestream.density", 1),
            speed_of_sound: Series::new("freestream.speed_of_sound", 1),
            dynamic_viscosity: Series::new("freestream.dynamic_viscosity", 1),
            gravity: Series::new("freestream.gravity", 1),
            velocity: Series::new("freestream.velocity", 1),
            mach_number: Series::new("freestream.mach_number", 1),
            dynamic_pressure: Series::new("freestream.dynamic_pressure", 1),
            reynolds_number: Series::new("freestream.reynolds_number", 1),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Aerodynamics {
    pub angle_of_attack: Series,
    pub lift_coefficient: Series,
    pub drag_coefficient: Series,
    pub moment_coefficient: Series,
    /// Drag coefficient contribution per component tag.
    pub drag_breakdown: ComponentMap<DVector<f64>>,
}

impl Default for Aerodynamics {
    fn default() -> Self {
        Self {
            angle_of_attack: Series::new("aerodynamics.angle_of_attack", 1),
            lift_coefficient: Series::new("aerodynamics.lift_coefficient", 1),
            drag_coefficient: Series::new("aerodynamics.drag_coefficient", 1),
            moment_coefficient: Series::new("aerodynamics.moment_coefficient", 1),
            drag_breakdown: ComponentMap::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Propulsion {
    pub throttle: Series,
}

impl Default for Propulsion {
    fn default() -> Self {
        Self {
            throttle: Series::new("propulsion.throttle", 1),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Weights {
    pub total_mass: Series,
    /// Positive when mass is consumed.
    pub vehicle_mass_rate: Series,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            total_mass: Series::new("weights.total_mass", 1),
            vehicle_mass_rate: Series::new("weights.vehicle_mass_rate", 1),
        }
    }
}

/// Root of all derived physical quantities for one segment.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Conditions {
    pub frames: Frames,
    pub freestream: Freestream,
    pub aerodynamics: Aerodynamics,
    pub propulsion: Propulsion,
    pub weights: Weights,
}

impl Conditions {
    /// Allocate every series with `rows` zero rows and clear breakdowns.
    pub fn expand(&mut self, rows: usize) {
        for series in self.series_mut() {
            series.expand(rows);
        }
        self.aerodynamics.drag_breakdown.clear();
    }

    /// Mark every series unwritten and clear breakdowns, keeping allocations.
    pub fn invalidate(&mut self) {
        for series in self.series_mut() {
            series.invalidate();
        }
        self.aerodynamics.drag_breakdown.clear();
    }

    /// Look up a series by its dotted path, e.g. `"freestream.mach_number"`.
    pub fn get(&self, path: &str) -> StateResult<&Series> {
        self.series()
            .into_iter()
            .find(|s| s.path() == path)
            .ok_or_else(|| StateError::MissingField {
                path: path.to_string(),
            })
    }

    /// All series in declaration order.
    pub fn series(&self) -> Vec<&Series> {
        let Frames {
            inertial,
            body,
            wind,
        } = &self.frames;
        let f = &self.freestream;
        let a = &self.aerodynamics;
        vec![
            &inertial.position_vector,
            &inertial.velocity_vector,
            &inertial.acceleration_vector,
            &inertial.total_force_vector,
            &inertial.gravity_force_vector,
            &inertial.time,
            &body.inertial_rotations,
            &body.thrust_force_vector,
            &wind.inertial_rotations,
            &wind.drag_force_vector,
            &wind.lift_force_vector,
            &f.altitude,
            &f.pressure,
            &f.temperature,
            &f.density,
            &f.speed_of_sound,
            &f.dynamic_viscosity,
            &f.gravity,
            &f.velocity,
            &f.mach_number,
            &f.dynamic_pressure,
            &f.reynolds_number,
            &a.angle_of_attack,
            &a.lift_coefficient,
            &a.drag_coefficient,
            &a.moment_coefficient,
            &self.propulsion.throttle,
            &self.weights.total_mass,
            &self.weights.vehicle_mass_rate,
        ]
    }

    fn series_mut(&mut self) -> Vec<&mut Series> {
        let Frames {
            inertial,
            body,
            wind,
        } = &mut self.frames;
        let f = &mut self.freestream;
        let a = &mut self.aerodynamics;
        vec![
            &mut inertial.position_vector,
            &mut inertial.velocity_vector,
            &mut inertial.acceleration_vector,
            &mut inertial.total_force_vector,
            &mut inertial.gravity_force_vector,
            &mut inertial.time,
            &mut body.inertial_rotations,
            &mut body.thrust_force_vector,
            &mut wind.inertial_rotations,
            &mut wind.drag_force_vector,
            &mut wind.lift_force_vector,
            &mut f.altitude,
            &mut f.pressure,
            &mut f.temperature,
            &mut f.density,
            &mut f.speed_of_sound,
            &mut f.dynamic_viscosity,
            &mut f.gravity,
            &mut f.velocity,
            &mut f.mach_number,
            &mut f.dynamic_pressure,
            &mut f.reynolds_number,
            &mut a.angle_of_attack,
            &mut a.lift_coefficient,
            &mut a.drag_coefficient,
            &mut a.moment_coefficient,
            &mut self.propulsion.throttle,
            &mut self.weights.total_mass,
            &mut self.weights.vehicle_mass_rate,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_sizes_every_series() {
        let mut c = Conditions::default();
        c.expand(6);
        assert!(c.series().iter().all(|s| s.rows() == 6 && !s.is_written()));
        assert_eq!(c.frames.inertial.position_vector.columns(), 3);
    }

    #[test]
    fn dotted_lookup_finds_written_series() {
        let mut c = Conditions::default();
        c.expand(2);
        c.freestream.mach_number.fill_column(0, 0.3).unwrap();
        let mach = c.get("freestream.mach_number").unwrap();
        assert_eq!(mach.last(0).unwrap(), 0.3);
        assert!(c.get("freestream.density").unwrap().get().is_err());
        assert!(matches!(
            c.get("freestream.nonsense"),
            Err(StateError::MissingField { .. })
        ));
    }

    #[test]
    fn paths_are_unique() {
        let c = Conditions::default();
        let mut paths: Vec<_> = c.series().iter().map(|s| s.path()).collect();
        let n = paths.len();
        paths.sort_unstable();
        paths.dedup();
        assert_eq!(paths.len(), n);
    }

    #[test]
    fn expand_clears_breakdown() {
        let mut c = Conditions::default();
        c.aerodynamics
            .drag_breakdown
            .insert("main_wing", DVector::from_element(2, 0.01));
        c.expand(2);
        assert!(c.aerodynamics.drag_breakdown.is_empty());
    }
}

//! Segment catalog.
//!
//! Each parameter struct builds a [`Segment`](crate::Segment) with its layout
//! and process. Parameters are `uom` quantities; steps convert them to SI once
//! per pass through [`Profile`].

mod climb;
mod cruise;
mod single_point;

pub use climb::{
    ClimbConstantSpeedConstantAngle, ClimbConstantStagnationPressureConstantAngle,
    DescentConstantSpeedConstantAngle,
};
pub use cruise::{CruiseConstantSpeedConstantAltitude, CruiseVaryDistance};
pub use single_point::{
    SINGLE_POINT_CONTROL_POINTS, SINGLE_POINT_DURATION, SinglePointSetSpeedSetAltitude,
};

use crate::layout::Layout;
use crate::segment::SegmentProcess;
use crate::steps;
use mf_core::si;
use mf_process::Process;

/// Initial throttle guess at every control point.
pub const DEFAULT_THROTTLE: f64 = 0.5;
/// Initial body pitch guess [rad] (3 degrees).
pub const DEFAULT_BODY_ANGLE: f64 = 3.0 * std::f64::consts::PI / 180.0;

/// Flight profile parameters of a segment.
#[derive(Clone, Debug, PartialEq)]
pub enum Profile {
    Climb(ClimbConstantSpeedConstantAngle),
    ClimbStagnationPressure(ClimbConstantStagnationPressureConstantAngle),
    Descent(DescentConstantSpeedConstantAngle),
    Cruise(CruiseConstantSpeedConstantAltitude),
    CruiseVaryDistance(CruiseVaryDistance),
    SinglePoint(SinglePointSetSpeedSetAltitude),
    /// Caller-supplied process; no catalog parameters.
    Custom,
}

impl Profile {
    pub fn kind(&self) -> &'static str {
        match self {
            Profile::Climb(_) => "climb_constant_speed_constant_angle",
            Profile::ClimbStagnationPressure(_) => {
                "climb_constant_stagnation_pressure_constant_angle"
            }
            Profile::Descent(_) => "descent_constant_speed_constant_angle",
            Profile::Cruise(_) => "cruise_constant_speed_constant_altitude",
            Profile::CruiseVaryDistance(_) => "cruise_vary_distance",
            Profile::SinglePoint(_) => "single_point_set_speed_set_altitude",
            Profile::Custom => "custom",
        }
    }

    /// Explicit start altitude [m], if the profile sets one.
    pub fn altitude_start(&self) -> Option<f64> {
        let altitude = match self {
            Profile::Climb(p) => p.altitude_start,
            Profile::ClimbStagnationPressure(p) => p.altitude_start,
            Profile::Descent(p) => p.altitude_start,
            Profile::Cruise(p) => p.altitude,
            Profile::CruiseVaryDistance(p) => p.altitude,
            Profile::SinglePoint(p) => p.altitude,
            Profile::Custom => None,
        };
        altitude.map(si::meters)
    }

    /// Ground distance [m] of a fixed-distance cruise.
    pub fn cruise_distance(&self) -> Option<f64> {
        match self {
            Profile::Cruise(p) => Some(si::meters(p.distance)),
            _ => None,
        }
    }
}

/// Throttle and body angle unknowns with the two-column force residual.
pub(crate) fn trim_layout() -> Layout {
    Layout::new()
        .unknown("throttle", &[DEFAULT_THROTTLE])
        .unknown("body_angle", &[DEFAULT_BODY_ANGLE])
        .residual("forces", 2)
}

/// Seed time, mass and position from the previous segment or the profile.
pub(crate) fn initials() -> SegmentProcess {
    Process::new()
        .step("time", steps::frames::initialize_time)
        .step("weights", steps::weights::initialize_weights)
        .step("inertial_position", steps::frames::initialize_inertial_position)
}

/// Conditions that follow once velocity, time and altitude are known.
///
/// `head` runs first and must set the time operators and the altitude.
pub(crate) fn conditions(head: SegmentProcess) -> SegmentProcess {
    let mut process = head;
    process.insert_step("acceleration", steps::frames::update_acceleration);
    process.insert_step("gravity", steps::aerodynamics::update_gravity);
    process.insert_step("freestream", steps::aerodynamics::update_freestream);
    process.insert_step("orientations", steps::frames::update_orientations);
    process.insert_step("aerodynamics", steps::aerodynamics::update_aerodynamics);
    process.insert_step("propulsion", steps::energy::update_thrust);
    process.insert_step("weights", steps::weights::update_weights);
    process.insert_step("forces", steps::frames::update_forces);
    process
}

//! Level cruise at constant speed, discretized in time.

use super::{Profile, conditions, initials, trim_layout};
use crate::analyses::Analyses;
use crate::error::{MissionError, MissionResult};
use crate::segment::{Segment, root_process, standard_finalize, standard_initialize};
use crate::steps;
use crate::steps::frames::start_altitude;
use mf_core::{Length, Mass, Velocity, km, mps, si};
use mf_process::Process;
use nalgebra::DVector;

/// Cruise a fixed ground distance at constant speed and altitude.
///
/// Speed is either `air_speed` or `mach` at the cruise altitude; exactly one
/// must be set.
#[derive(Clone, Debug, PartialEq)]
pub struct CruiseConstantSpeedConstantAltitude {
    pub air_speed: Option<Velocity>,
    pub mach: Option<f64>,
    /// Defaults to the previous segment's final altitude.
    pub altitude: Option<Length>,
    pub distance: Length,
}

impl Default for CruiseConstantSpeedConstantAltitude {
    fn default() -> Self {
        Self {
            air_speed: Some(mps(100.0)),
            mach: None,
            altitude: None,
            distance: km(100.0),
        }
    }
}

impl CruiseConstantSpeedConstantAltitude {
    pub fn segment(self, tag: impl Into<String>, analyses: Analyses) -> Segment {
        let iterate = Process::new()
            .sub("initials", initials())
            .sub(
                "unknowns",
                Process::new()
                    .step("mission", steps::unknowns::unpack_throttle_body_angle)
                    .step("velocity", level_velocity),
            )
            .sub(
                "conditions",
                conditions(
                    Process::new()
                        .step("differentials", fixed_distance_differentials)
                        .step("altitude", steps::frames::update_altitude)
                        .step("atmosphere", steps::aerodynamics::update_atmosphere),
                ),
            )
            .sub(
                "residuals",
                Process::new().step("total_forces", steps::residuals::residual_total_forces),
            );
        let process = root_process(standard_initialize(Process::new()), iterate, standard_finalize());
        Segment::new(tag, Profile::Cruise(self), analyses, trim_layout(), process)
    }
}

/// Cruise at constant Mach and altitude until a target landing mass.
///
/// The distance is an unknown: its last row sets the time extent, the other
/// rows are tied to it, and the final mass is driven to
/// `target_landing_weight`.
#[derive(Clone, Debug, PartialEq)]
pub struct CruiseVaryDistance {
    pub mach: f64,
    pub altitude: Option<Length>,
    pub target_landing_weight: Mass,
    /// Initial guess, also the scale of the distance residual.
    pub distance: Length,
}

impl CruiseVaryDistance {
    pub fn segment(self, tag: impl Into<String>, analyses: Analyses) -> Segment {
        let layout = trim_layout()
            .unknown("distance", &[si::meters(self.distance)])
            .residual("landing_weight", 1);

        let iterate = Process::new()
            .sub("initials", initials())
            .sub(
                "unknowns",
                Process::new()
                    .step("mission", steps::unknowns::unpack_throttle_body_angle)
                    .step("velocity", level_velocity),
            )
            .sub(
                "conditions",
                conditions(
                    Process::new()
                        .step("differentials", unknown_distance_differentials)
                        .step("altitude", steps::frames::update_altitude)
                        .step("atmosphere", steps::aerodynamics::update_atmosphere),
                ),
            )
            .sub(
                "residuals",
                Process::new()
                    .step("total_forces", steps::residuals::residual_total_forces)
                    .step("landing_weight", residual_landing_weight),
            );
        let process = root_process(standard_initialize(Process::new()), iterate, standard_finalize());
        Segment::new(tag, Profile::CruiseVaryDistance(self), analyses, layout, process)
    }
}

/// Speed of sound [m/s] at a single altitude.
fn speed_of_sound(segment: &Segment, altitude: f64) -> MissionResult<f64> {
    let props = segment
        .analyses
        .atmosphere
        .compute(&DVector::from_element(1, altitude))?;
    Ok(props.speed_of_sound[0])
}

fn cruise_speed(segment: &Segment) -> MissionResult<f64> {
    let (air_speed, mach) = match &segment.profile {
        Profile::Cruise(p) => (p.air_speed.map(si::meters_per_second), p.mach),
        Profile::CruiseVaryDistance(p) => (None, Some(p.mach)),
        other => {
            return Err(MissionError::profile(
                &segment.tag,
                format!("'{}' is not a cruise profile", other.kind()),
            ));
        }
    };
    let speed = match (air_speed, mach) {
        (Some(v), None) => v,
        (None, Some(mach)) => mach * speed_of_sound(segment, start_altitude(segment)?)?,
        (Some(_), Some(_)) => {
            return Err(MissionError::profile(&segment.tag, "set either air speed or Mach, not both"));
        }
        (None, None) => return Err(MissionError::profile(&segment.tag, "cruise speed is not set")),
    };
    if !(speed > 0.0) {
        return Err(MissionError::profile(&segment.tag, "cruise speed must be positive"));
    }
    Ok(speed)
}

fn level_velocity(segment: &mut Segment) -> MissionResult<()> {
    let speed = cruise_speed(segment)?;
    let velocity = segment.state.conditions.frames.inertial.velocity_vector.write();
    velocity.fill(0.0);
    velocity.column_mut(0).fill(speed);
    Ok(())
}

/// `T = distance / speed`.
fn fixed_distance_differentials(segment: &mut Segment) -> MissionResult<()> {
    let distance = segment.profile.cruise_distance().ok_or_else(|| {
        MissionError::profile(&segment.tag, "fixed-distance cruise has no distance")
    })?;
    if !(distance > 0.0) {
        return Err(MissionError::profile(&segment.tag, "cruise distance must be positive"));
    }
    let speed = segment.state.conditions.frames.inertial.velocity_vector.value(0, 0)?;
    steps::numerics::set_time_extent(segment, distance / speed)
}

/// Time extent from the last row of the `distance` unknown.
fn unknown_distance_differentials(segment: &mut Segment) -> MissionResult<()> {
    let n = segment.state.control_points();
    let distance = segment.state.unknowns.get("distance")?[(n - 1, 0)];
    let vx = segment.state.conditions.frames.inertial.velocity_vector.column(0)?;
    let extent = segment
        .state
        .numerics
        .dimensionless()?
        .segment_extent(distance, &vx)?;
    steps::numerics::set_time_extent(segment, extent)
}

/// Rows `0..n-1` tie the distance unknown to its last row; the last row is
/// the relative landing mass error.
fn residual_landing_weight(segment: &mut Segment) -> MissionResult<()> {
    let Profile::CruiseVaryDistance(p) = &segment.profile else {
        return Err(MissionError::profile(&segment.tag, "expected a vary-distance cruise"));
    };
    let target = si::kilograms(p.target_landing_weight);
    let scale = si::meters(p.distance).abs().max(1.0);
    if !(target > 0.0) {
        return Err(MissionError::profile(&segment.tag, "target landing weight must be positive"));
    }

    let distance = segment.state.unknowns.column("distance", 0)?;
    let landing = segment.state.conditions.weights.total_mass.last(0)?;
    let n = distance.len();
    let last = distance[n - 1];
    let residual = DVector::from_fn(n, |i, _| {
        if i + 1 == n {
            (landing - target) / target
        } else {
            (distance[i] - last) / scale
        }
    });
    segment.state.residuals.set_column("landing_weight", 0, &residual)?;
    Ok(())
}

//! Trim at one flight condition with a prescribed acceleration.

use super::{Profile, conditions, initials, trim_layout};
use crate::analyses::Analyses;
use crate::error::{MissionError, MissionResult};
use crate::segment::{Segment, root_process, standard_finalize, standard_initialize};
use crate::steps;
use mf_core::{Accel, Length, Velocity, mps, mps2, si};
use mf_process::Process;

/// Time span [s] the point is held for; only fuel burn depends on it.
pub const SINGLE_POINT_DURATION: f64 = 1.0;
/// Control points of a single-point segment.
pub const SINGLE_POINT_CONTROL_POINTS: usize = 2;

/// Level flight at a set speed and altitude, trimmed against
/// `(x_accel, 0, z_accel)` rather than the differentiated velocity.
///
/// `z` points down, so a negative `z_accel` is a pull-up and needs more lift
/// than weight. Sweeps of these points are sized by
/// [`size_accel_for_cl`](crate::size_accel_for_cl) and
/// [`size_accel_for_aoa`](crate::size_accel_for_aoa).
#[derive(Clone, Debug, PartialEq)]
pub struct SinglePointSetSpeedSetAltitude {
    pub air_speed: Velocity,
    /// Defaults to the previous segment's final altitude.
    pub altitude: Option<Length>,
    pub x_accel: Accel,
    pub z_accel: Accel,
}

impl Default for SinglePointSetSpeedSetAltitude {
    fn default() -> Self {
        Self {
            air_speed: mps(60.0),
            altitude: None,
            x_accel: mps2(0.0),
            z_accel: mps2(0.0),
        }
    }
}

impl SinglePointSetSpeedSetAltitude {
    pub fn segment(self, tag: impl Into<String>, analyses: Analyses) -> Segment {
        let mut point_conditions = conditions(
            Process::new()
                .step("differentials", hold_differentials)
                .step("altitude", steps::frames::update_altitude)
                .step("atmosphere", steps::aerodynamics::update_atmosphere),
        );
        point_conditions.insert_step("acceleration", prescribed_acceleration);

        let iterate = Process::new()
            .sub("initials", initials())
            .sub(
                "unknowns",
                Process::new()
                    .step("mission", steps::unknowns::unpack_throttle_body_angle)
                    .step("velocity", set_speed_velocity),
            )
            .sub("conditions", point_conditions)
            .sub(
                "residuals",
                Process::new().step("total_forces", steps::residuals::residual_total_forces),
            );
        let process = root_process(standard_initialize(Process::new()), iterate, standard_finalize());
        let mut segment = Segment::new(tag, Profile::SinglePoint(self), analyses, trim_layout(), process);
        segment.control_points = SINGLE_POINT_CONTROL_POINTS;
        segment
    }
}

fn point(segment: &Segment) -> MissionResult<&SinglePointSetSpeedSetAltitude> {
    match &segment.profile {
        Profile::SinglePoint(p) => Ok(p),
        other => Err(MissionError::profile(
            &segment.tag,
            format!("'{}' is not a single-point profile", other.kind()),
        )),
    }
}

fn set_speed_velocity(segment: &mut Segment) -> MissionResult<()> {
    let speed = si::meters_per_second(point(segment)?.air_speed);
    if !(speed > 0.0) {
        return Err(MissionError::profile(&segment.tag, "air speed must be positive"));
    }
    let velocity = segment.state.conditions.frames.inertial.velocity_vector.write();
    velocity.fill(0.0);
    velocity.column_mut(0).fill(speed);
    Ok(())
}

fn hold_differentials(segment: &mut Segment) -> MissionResult<()> {
    steps::numerics::set_time_extent(segment, SINGLE_POINT_DURATION)
}

fn prescribed_acceleration(segment: &mut Segment) -> MissionResult<()> {
    let p = point(segment)?;
    let ax = si::meters_per_second_squared(p.x_accel);
    let az = si::meters_per_second_squared(p.z_accel);
    if !(ax.is_finite() && az.is_finite()) {
        return Err(MissionError::profile(&segment.tag, "prescribed acceleration is not finite"));
    }
    let acceleration = segment.state.conditions.frames.inertial.acceleration_vector.write();
    acceleration.fill(0.0);
    acceleration.column_mut(0).fill(ax);
    acceleration.column_mut(2).fill(az);
    Ok(())
}

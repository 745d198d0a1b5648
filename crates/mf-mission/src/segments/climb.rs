//! Constant-angle climbs and descents, discretized in altitude.

use super::{Profile, conditions, initials, trim_layout};
use crate::analyses::Analyses;
use crate::error::{MissionError, MissionResult};
use crate::segment::{Segment, SegmentProcess, root_process, standard_finalize, standard_initialize};
use crate::steps;
use crate::steps::frames::start_altitude;
use mf_core::{Angle, Length, Pressure, Velocity, deg, km, m, mps, pa, si};
use mf_process::Process;
use nalgebra::DVector;

/// Climb at constant true airspeed along a constant flight path angle.
#[derive(Clone, Debug, PartialEq)]
pub struct ClimbConstantSpeedConstantAngle {
    pub air_speed: Velocity,
    pub climb_angle: Angle,
    /// Defaults to the previous segment's final altitude.
    pub altitude_start: Option<Length>,
    pub altitude_end: Length,
}

impl Default for ClimbConstantSpeedConstantAngle {
    fn default() -> Self {
        Self {
            air_speed: mps(100.0),
            climb_angle: deg(3.0),
            altitude_start: None,
            altitude_end: km(10.0),
        }
    }
}

impl ClimbConstantSpeedConstantAngle {
    pub fn segment(self, tag: impl Into<String>, analyses: Analyses) -> Segment {
        Segment::new(tag, Profile::Climb(self), analyses, trim_layout(), constant_speed_process())
    }
}

/// Descent at constant true airspeed along a constant flight path angle.
///
/// `descent_angle` is positive nose down.
#[derive(Clone, Debug, PartialEq)]
pub struct DescentConstantSpeedConstantAngle {
    pub air_speed: Velocity,
    pub descent_angle: Angle,
    pub altitude_start: Option<Length>,
    pub altitude_end: Length,
}

impl Default for DescentConstantSpeedConstantAngle {
    fn default() -> Self {
        Self {
            air_speed: mps(100.0),
            descent_angle: deg(3.0),
            altitude_start: None,
            altitude_end: m(0.0),
        }
    }
}

impl DescentConstantSpeedConstantAngle {
    pub fn segment(self, tag: impl Into<String>, analyses: Analyses) -> Segment {
        Segment::new(tag, Profile::Descent(self), analyses, trim_layout(), constant_speed_process())
    }
}

/// Climb holding stagnation (pitot) pressure along a constant angle.
///
/// Airspeed depends on the local static pressure, so the altitude profile is an
/// extra unknown `altitudes`, tied to the integrated climb by the third column
/// of the `forces` residual.
#[derive(Clone, Debug, PartialEq)]
pub struct ClimbConstantStagnationPressureConstantAngle {
    pub stagnation_pressure: Pressure,
    pub climb_angle: Angle,
    pub altitude_start: Option<Length>,
    pub altitude_end: Length,
}

impl Default for ClimbConstantStagnationPressureConstantAngle {
    fn default() -> Self {
        Self {
            stagnation_pressure: pa(110_000.0),
            climb_angle: deg(3.0),
            altitude_start: None,
            altitude_end: km(3.0),
        }
    }
}

impl ClimbConstantStagnationPressureConstantAngle {
    pub fn segment(self, tag: impl Into<String>, analyses: Analyses) -> Segment {
        // replaced by the mid-segment altitude at initialize
        let layout = trim_layout()
            .unknown("altitudes", &[si::meters(self.altitude_end)])
            .residual("forces", 3);

        let iterate = Process::new()
            .sub("initials", initials())
            .sub(
                "unknowns",
                Process::new()
                    .step("mission", steps::unknowns::unpack_throttle_body_angle)
                    .step("altitudes", unpack_altitudes),
            )
            .sub(
                "conditions",
                conditions(
                    Process::new()
                        .step("atmosphere", steps::aerodynamics::update_atmosphere)
                        .step("velocity", stagnation_pressure_velocity)
                        .step("differentials", altitude_differentials),
                ),
            )
            .sub(
                "residuals",
                Process::new()
                    .step("total_forces", steps::residuals::residual_total_forces)
                    .step("altitude", residual_altitude),
            );

        let initialize = standard_initialize(Process::new().step("altitudes", guess_altitudes));
        let process = root_process(initialize, iterate, standard_finalize());
        Segment::new(tag, Profile::ClimbStagnationPressure(self), analyses, layout, process)
    }
}

fn constant_speed_process() -> SegmentProcess {
    let iterate = Process::new()
        .sub("initials", initials())
        .sub(
            "unknowns",
            Process::new()
                .step("mission", steps::unknowns::unpack_throttle_body_angle)
                .step("velocity", constant_speed_velocity),
        )
        .sub(
            "conditions",
            conditions(
                Process::new()
                    .step("differentials", altitude_differentials)
                    .step("altitude", steps::frames::update_altitude)
                    .step("atmosphere", steps::aerodynamics::update_atmosphere),
            ),
        )
        .sub(
            "residuals",
            Process::new().step("total_forces", steps::residuals::residual_total_forces),
        );
    root_process(standard_initialize(Process::new()), iterate, standard_finalize())
}

/// Flight path angle (positive up) and end altitude of the profile, in SI.
fn flight_path(segment: &Segment) -> MissionResult<(f64, f64)> {
    match &segment.profile {
        Profile::Climb(p) => Ok((si::radians(p.climb_angle), si::meters(p.altitude_end))),
        Profile::ClimbStagnationPressure(p) => {
            Ok((si::radians(p.climb_angle), si::meters(p.altitude_end)))
        }
        Profile::Descent(p) => Ok((-si::radians(p.descent_angle), si::meters(p.altitude_end))),
        other => Err(MissionError::profile(
            &segment.tag,
            format!("'{}' is not a constant-angle profile", other.kind()),
        )),
    }
}

fn write_velocity(segment: &mut Segment, speed: &DVector<f64>, gamma: f64) -> MissionResult<()> {
    let (s, c) = gamma.sin_cos();
    let velocity = segment.state.conditions.frames.inertial.velocity_vector.write();
    velocity.fill(0.0);
    velocity.set_column(0, &(speed * c));
    velocity.set_column(2, &(speed * -s));
    Ok(())
}

fn constant_speed_velocity(segment: &mut Segment) -> MissionResult<()> {
    let speed = match &segment.profile {
        Profile::Climb(p) => si::meters_per_second(p.air_speed),
        Profile::Descent(p) => si::meters_per_second(p.air_speed),
        other => {
            return Err(MissionError::profile(
                &segment.tag,
                format!("'{}' has no constant air speed", other.kind()),
            ));
        }
    };
    if !(speed > 0.0) {
        return Err(MissionError::profile(&segment.tag, "air speed must be positive"));
    }
    let (gamma, _) = flight_path(segment)?;
    let n = segment.state.control_points();
    write_velocity(segment, &DVector::from_element(n, speed), gamma)
}

/// Seed the altitude unknowns halfway between the start and end altitudes.
fn guess_altitudes(segment: &mut Segment) -> MissionResult<()> {
    let (_, end) = flight_path(segment)?;
    let mid = 0.5 * (start_altitude(segment)? + end);
    let n = segment.state.control_points();
    segment
        .state
        .unknowns
        .set_column("altitudes", 0, &DVector::from_element(n, mid))?;
    Ok(())
}

/// Airspeed from the isentropic Mach at each unknown altitude.
fn stagnation_pressure_velocity(segment: &mut Segment) -> MissionResult<()> {
    let Profile::ClimbStagnationPressure(p) = &segment.profile else {
        return Err(MissionError::profile(&segment.tag, "expected a stagnation pressure climb"));
    };
    let total = si::pascals(p.stagnation_pressure);
    let (gamma, _) = flight_path(segment)?;

    let air = segment.analyses.atmosphere.air();
    let fs = &segment.state.conditions.freestream;
    let pressure = fs.pressure.column(0)?;
    let sound = fs.speed_of_sound.column(0)?;
    let mach = pressure.map(|ps| air.mach_from_pressure_ratio(total / ps));
    write_velocity(segment, &mach.component_mul(&sound), gamma)
}

/// Time extent from the climb rate, then altitude by integration.
///
/// Writes the time operators, `frames.inertial.time` and the vertical position.
fn altitude_differentials(segment: &mut Segment) -> MissionResult<()> {
    let (gamma, altitude_end) = flight_path(segment)?;
    let altitude_start = start_altitude(segment)?;
    let span = altitude_end - altitude_start;
    if !(span * gamma.sin() > 0.0) {
        return Err(MissionError::profile(
            &segment.tag,
            format!("altitude change {span} m does not follow the flight path angle"),
        ));
    }

    let climb_rate = -segment.state.conditions.frames.inertial.velocity_vector.column(2)?;
    let extent = segment
        .state
        .numerics
        .dimensionless()?
        .segment_extent(span, &climb_rate)?;
    steps::numerics::set_time_extent(segment, extent)?;

    let altitude = segment.state.numerics.time()?.integral(&climb_rate, altitude_start);
    segment
        .state
        .conditions
        .frames
        .inertial
        .position_vector
        .set_column(2, &(-altitude))?;
    Ok(())
}

fn unpack_altitudes(segment: &mut Segment) -> MissionResult<()> {
    let altitudes = segment.state.unknowns.column("altitudes", 0)?;
    segment.state.conditions.freestream.altitude.set_column(0, &altitudes)?;
    Ok(())
}

/// Unknown altitudes minus integrated altitudes, scaled by the end altitude.
fn residual_altitude(segment: &mut Segment) -> MissionResult<()> {
    let (_, altitude_end) = flight_path(segment)?;
    let scale = altitude_end.abs().max(1.0);
    let conditions = &segment.state.conditions;
    let assumed = conditions.freestream.altitude.column(0)?;
    let integrated = -conditions.frames.inertial.position_vector.column(2)?;
    let residual = (assumed - integrated) / scale;
    segment.state.residuals.set_column("forces", 2, &residual)?;
    Ok(())
}

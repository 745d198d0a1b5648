//! Atmosphere, freestream and aerodynamic force steps.

use crate::error::MissionResult;
use crate::segment::Segment;
use nalgebra::DVector;

/// Build cached aerodynamic models before the solve.
pub fn initialize_aerodynamics(segment: &mut Segment) -> MissionResult<()> {
    segment.analyses.aerodynamics.initialize()?;
    Ok(())
}

/// Air properties at `freestream.altitude`.
pub fn update_atmosphere(segment: &mut Segment) -> MissionResult<()> {
    let altitude = segment.state.conditions.freestream.altitude.column(0)?;
    let props = segment.analyses.atmosphere.compute(&altitude)?;

    let freestream = &mut segment.state.conditions.freestream;
    freestream.pressure.set_column(0, &props.pressure)?;
    freestream.temperature.set_column(0, &props.temperature)?;
    freestream.density.set_column(0, &props.density)?;
    freestream.speed_of_sound.set_column(0, &props.speed_of_sound)?;
    freestream.dynamic_viscosity.set_column(0, &props.dynamic_viscosity)?;
    Ok(())
}

/// Gravitational acceleration at `freestream.altitude`.
pub fn update_gravity(segment: &mut Segment) -> MissionResult<()> {
    let altitude = segment.state.conditions.freestream.altitude.column(0)?;
    let gravity = segment.analyses.atmosphere.gravity(&altitude);
    segment.state.conditions.freestream.gravity.set_column(0, &gravity)?;
    Ok(())
}

/// Airspeed, Mach, dynamic pressure and unit Reynolds number.
pub fn update_freestream(segment: &mut Segment) -> MissionResult<()> {
    let conditions = &mut segment.state.conditions;
    let velocity = conditions.frames.inertial.velocity_vector.get()?;
    let speed = DVector::from_iterator(velocity.nrows(), velocity.row_iter().map(|r| r.norm()));

    let fs = &mut conditions.freestream;
    let density = fs.density.column(0)?;
    let mach = speed.component_div(&fs.speed_of_sound.column(0)?);
    let q = speed.zip_map(&density, |v, rho| 0.5 * rho * v * v);
    let reynolds = speed
        .zip_map(&density, |v, rho| rho * v)
        .component_div(&fs.dynamic_viscosity.column(0)?);

    fs.velocity.set_column(0, &speed)?;
    fs.mach_number.set_column(0, &mach)?;
    fs.dynamic_pressure.set_column(0, &q)?;
    fs.reynolds_number.set_column(0, &reynolds)?;
    Ok(())
}

/// Coefficients from the aerodynamics adapter, forces in wind axes.
///
/// `L = q S CL` acts along `-z`, `D = q S CD` along `-x`.
pub fn update_aerodynamics(segment: &mut Segment) -> MissionResult<()> {
    let coefficients = segment.analyses.aerodynamics.evaluate(&segment.state.conditions)?;
    let reference_area = segment.analyses.vehicle.reference_area;

    let conditions = &mut segment.state.conditions;
    let q = conditions.freestream.dynamic_pressure.column(0)?;
    let lift = q.component_mul(&coefficients.lift) * reference_area;
    let drag = q.component_mul(&coefficients.drag) * reference_area;

    let aero = &mut conditions.aerodynamics;
    aero.lift_coefficient.set_column(0, &coefficients.lift)?;
    aero.drag_coefficient.set_column(0, &coefficients.drag)?;
    aero.moment_coefficient.set_column(0, &coefficients.moment)?;
    aero.drag_breakdown = coefficients.drag_breakdown;

    let wind = &mut conditions.frames.wind;
    let lift_vector = wind.lift_force_vector.write();
    lift_vector.fill(0.0);
    lift_vector.set_column(2, &(-lift));
    let drag_vector = wind.drag_force_vector.write();
    drag_vector.fill(0.0);
    drag_vector.set_column(0, &(-drag));
    Ok(())
}

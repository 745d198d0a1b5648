//! Frame kinematics and force assembly in the longitudinal plane.
//!
//! The inertial frame has `x` forward and `z` down, so altitude is `-z`.
//! Rotations are about the `y` axis (pitch); rotation vectors carry the
//! angle in their second column.

use crate::error::{MissionError, MissionResult};
use crate::segment::Segment;
use nalgebra::{DMatrix, DVector, Matrix3, Vector3};

/// Rotation about `y` taking frame-local vectors into the inertial frame.
pub(crate) fn pitch_rotation(angle: f64) -> Matrix3<f64> {
    let (s, c) = angle.sin_cos();
    Matrix3::new(c, 0.0, s, 0.0, 1.0, 0.0, -s, 0.0, c)
}

/// Rotate each row of `vectors` by the matching pitch angle.
fn rotate_rows(vectors: &DMatrix<f64>, angles: &DVector<f64>) -> DMatrix<f64> {
    let mut out = DMatrix::zeros(vectors.nrows(), 3);
    for (i, angle) in angles.iter().enumerate() {
        let v = Vector3::new(vectors[(i, 0)], vectors[(i, 1)], vectors[(i, 2)]);
        let r = pitch_rotation(*angle) * v;
        for j in 0..3 {
            out[(i, j)] = r[j];
        }
    }
    out
}

/// Start altitude: the profile's value, else the previous segment's end.
pub(crate) fn start_altitude(segment: &Segment) -> MissionResult<f64> {
    if let Some(altitude) = segment.profile.altitude_start() {
        return Ok(altitude);
    }
    match &segment.state.initials {
        Some(initials) => Ok(-initials.frames.inertial.position_vector.last(2)?),
        None => Err(MissionError::profile(
            &segment.tag,
            "start altitude is not set and there is no previous segment",
        )),
    }
}

/// Seed time from the previous segment's final time, or zero.
pub fn initialize_time(segment: &mut Segment) -> MissionResult<()> {
    let t0 = match &segment.state.initials {
        Some(initials) => initials.frames.inertial.time.last(0)?,
        None => 0.0,
    };
    segment.state.conditions.frames.inertial.time.fill_column(0, t0)?;
    Ok(())
}

/// Seed the inertial position.
///
/// Horizontal components continue from the previous segment; the vertical
/// component comes from the start altitude.
pub fn initialize_inertial_position(segment: &mut Segment) -> MissionResult<()> {
    let (x0, y0) = match &segment.state.initials {
        Some(initials) => {
            let position = &initials.frames.inertial.position_vector;
            (position.last(0)?, position.last(1)?)
        }
        None => (0.0, 0.0),
    };
    let z0 = -start_altitude(segment)?;

    let position = &mut segment.state.conditions.frames.inertial.position_vector;
    position.fill_column(0, x0)?;
    position.fill_column(1, y0)?;
    position.fill_column(2, z0)?;
    Ok(())
}

/// `a = D v`, column by column, on the time-scaled operator.
pub fn update_acceleration(segment: &mut Segment) -> MissionResult<()> {
    let ops = segment.state.numerics.time()?;
    let inertial = &mut segment.state.conditions.frames.inertial;
    let velocity = inertial.velocity_vector.get()?;
    let acceleration = &ops.differentiate * velocity;
    inertial.acceleration_vector.set(acceleration)?;
    Ok(())
}

/// Altitude from the vertical inertial position.
pub fn update_altitude(segment: &mut Segment) -> MissionResult<()> {
    let conditions = &mut segment.state.conditions;
    let altitude = -conditions.frames.inertial.position_vector.column(2)?;
    conditions.freestream.altitude.set_column(0, &altitude)?;
    Ok(())
}

/// Flight path angle from the velocity, angle of attack from body pitch.
///
/// `γ = atan2(-v_z, v_x)` and `α = θ - γ`.
pub fn update_orientations(segment: &mut Segment) -> MissionResult<()> {
    let conditions = &mut segment.state.conditions;
    let velocity = conditions.frames.inertial.velocity_vector.get()?;
    let gamma = DVector::from_fn(velocity.nrows(), |i, _| {
        (-velocity[(i, 2)]).atan2(velocity[(i, 0)])
    });
    let theta = conditions.frames.body.inertial_rotations.column(1)?;

    let rotations = conditions.frames.wind.inertial_rotations.write();
    rotations.fill(0.0);
    rotations.set_column(1, &gamma);
    conditions
        .aerodynamics
        .angle_of_attack
        .set_column(0, &(theta - gamma))?;
    Ok(())
}

/// Sum thrust, aerodynamic and gravity forces in the inertial frame.
pub fn update_forces(segment: &mut Segment) -> MissionResult<()> {
    let conditions = &mut segment.state.conditions;
    let mass = conditions.weights.total_mass.column(0)?;
    let gravity = conditions.freestream.gravity.column(0)?;

    let weight = mass.component_mul(&gravity);
    let gravity_force = conditions.frames.inertial.gravity_force_vector.write();
    gravity_force.fill(0.0);
    gravity_force.set_column(2, &weight);

    let frames = &conditions.frames;
    let aero_wind = frames.wind.drag_force_vector.get()? + frames.wind.lift_force_vector.get()?;
    let aero = rotate_rows(&aero_wind, &frames.wind.inertial_rotations.column(1)?);
    let thrust = rotate_rows(
        frames.body.thrust_force_vector.get()?,
        &frames.body.inertial_rotations.column(1)?,
    );
    let total = aero + thrust + frames.inertial.gravity_force_vector.get()?;

    conditions.frames.inertial.total_force_vector.set(total)?;
    Ok(())
}

/// Integrate horizontal velocity into horizontal position.
///
/// Row 0 keeps the seeded start position exactly.
pub fn integrate_inertial_horizontal_position(segment: &mut Segment) -> MissionResult<()> {
    let ops = segment.state.numerics.time()?;
    let inertial = &mut segment.state.conditions.frames.inertial;
    let x0 = inertial.position_vector.first(0)?;
    let vx = inertial.velocity_vector.column(0)?;
    let x = ops.integral(&vx, x0);
    inertial.position_vector.set_column(0, &x)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pitch_rotation_maps_body_forward_to_climb() {
        let gamma = 0.1_f64;
        let v = pitch_rotation(gamma) * Vector3::new(1.0, 0.0, 0.0);
        assert!((v.x - gamma.cos()).abs() < 1e-15);
        // nose up means negative z
        assert!((v.z + gamma.sin()).abs() < 1e-15);
    }

    #[test]
    fn rotate_rows_uses_each_row_angle() {
        let vectors = DMatrix::from_row_slice(2, 3, &[1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
        let angles = DVector::from_vec(vec![0.0, std::f64::consts::FRAC_PI_2]);
        let out = rotate_rows(&vectors, &angles);
        assert!((out[(0, 0)] - 1.0).abs() < 1e-15);
        assert!(out[(1, 0)].abs() < 1e-15);
        assert!((out[(1, 2)] + 1.0).abs() < 1e-15);
    }
}

//! Unpack solver unknowns shared by every segment kind.

use crate::error::MissionResult;
use crate::segment::Segment;

/// `throttle` into propulsion, `body_angle` into the body pitch.
pub fn unpack_throttle_body_angle(segment: &mut Segment) -> MissionResult<()> {
    let throttle = segment.state.unknowns.column("throttle", 0)?;
    let body_angle = segment.state.unknowns.column("body_angle", 0)?;

    let conditions = &mut segment.state.conditions;
    conditions.propulsion.throttle.set_column(0, &throttle)?;
    let rotations = conditions.frames.body.inertial_rotations.write();
    rotations.fill(0.0);
    rotations.set_column(1, &body_angle);
    Ok(())
}

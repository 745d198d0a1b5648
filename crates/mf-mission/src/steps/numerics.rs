//! Operator construction and rescaling.

use crate::error::MissionResult;
use crate::segment::Segment;
use mf_numerics::chebyshev;
use nalgebra::DVector;

/// Build the dimensionless operators for the segment's control points.
pub fn initialize_operators(segment: &mut Segment) -> MissionResult<()> {
    let n = segment.state.control_points();
    segment.state.numerics.dimensionless = Some(chebyshev(n)?);
    segment.state.numerics.time = None;
    Ok(())
}

/// First step of every iterate pass: nothing from the previous pass is readable.
pub fn begin_pass(segment: &mut Segment) -> MissionResult<()> {
    segment.state.begin_pass();
    Ok(())
}

/// Rescale to a time extent and write `frames.inertial.time`.
///
/// Row 0 keeps the initial time already written by the initials step.
pub(crate) fn set_time_extent(segment: &mut Segment, extent: f64) -> MissionResult<()> {
    let numerics = &mut segment.state.numerics;
    let ops = numerics.dimensionless()?.rescale(extent)?;
    let time = &mut segment.state.conditions.frames.inertial.time;
    let t0 = time.first(0)?;
    let times: DVector<f64> = ops.nodes.map(|x| t0 + x);
    time.set_column(0, &times)?;
    numerics.time = Some(ops);
    Ok(())
}

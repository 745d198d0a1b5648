//! Residual steps.

use crate::error::MissionResult;
use crate::segment::Segment;

/// Newton's second law per unit mass, `F/m - a`, in `x` and `z`.
///
/// Writes the first two columns of the `forces` residual.
pub fn residual_total_forces(segment: &mut Segment) -> MissionResult<()> {
    let inertial = &segment.state.conditions.frames.inertial;
    let mass = segment.state.conditions.weights.total_mass.column(0)?;
    let force = inertial.total_force_vector.get()?;
    let acceleration = inertial.acceleration_vector.get()?;

    let fx = force.column(0).component_div(&mass) - acceleration.column(0);
    let fz = force.column(2).component_div(&mass) - acceleration.column(2);

    let residuals = &mut segment.state.residuals;
    residuals.set_column("forces", 0, &fx)?;
    residuals.set_column("forces", 1, &fz)?;
    Ok(())
}

//! Mass steps.

use crate::error::MissionResult;
use crate::segment::Segment;

/// Evaluate the weights adapter once per segment evaluation.
pub fn initialize_mass(segment: &mut Segment) -> MissionResult<()> {
    let breakdown = segment.analyses.weights.evaluate(&segment.analyses.vehicle)?;
    tracing::debug!(
        segment = %segment.tag,
        takeoff = breakdown.takeoff,
        "mass breakdown"
    );
    segment.set_mass(breakdown);
    Ok(())
}

/// Seed mass from the previous segment's final mass, or the takeoff mass.
pub fn initialize_weights(segment: &mut Segment) -> MissionResult<()> {
    let m0 = match &segment.state.initials {
        Some(initials) => initials.weights.total_mass.last(0)?,
        None => segment.mass()?.takeoff,
    };
    segment.state.conditions.weights.total_mass.fill_column(0, m0)?;
    Ok(())
}

/// `m = m0 - I mdot` on the time-scaled operator.
pub fn update_weights(segment: &mut Segment) -> MissionResult<()> {
    let ops = segment.state.numerics.time()?;
    let weights = &mut segment.state.conditions.weights;
    let m0 = weights.total_mass.first(0)?;
    let mdot = weights.vehicle_mass_rate.column(0)?;
    let mass = ops.integral(&(-mdot), m0);
    weights.total_mass.set_column(0, &mass)?;
    Ok(())
}

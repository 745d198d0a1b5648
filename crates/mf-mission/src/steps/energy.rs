//! Propulsion step.

use crate::error::MissionResult;
use crate::segment::Segment;

/// Body-axis thrust and fuel flow from the propulsion adapter.
pub fn update_thrust(segment: &mut Segment) -> MissionResult<()> {
    let output = segment
        .analyses
        .propulsion
        .evaluate_thrust(&segment.state.conditions)?;
    let conditions = &mut segment.state.conditions;
    conditions
        .frames
        .body
        .thrust_force_vector
        .set(output.thrust_force_vector)?;
    conditions
        .weights
        .vehicle_mass_rate
        .set_column(0, &output.vehicle_mass_rate)?;
    Ok(())
}

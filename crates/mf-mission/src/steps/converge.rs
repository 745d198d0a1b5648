//! The converge phase: drive the iterate phase's residuals to zero.

use crate::error::{MissionError, MissionResult};
use crate::segment::{Segment, SolveReport};
use mf_solver::RootFinder;
use nalgebra::DVector;

/// Solve for the unknowns by repeatedly running the `iterate` phase.
///
/// Leaves the solved (or best) unknowns in the state and records a
/// [`SolveReport`]. Solver give-ups are recorded, not raised. Trial points
/// outside the segment's domain ([`MissionError::is_outside_domain`]) shrink
/// the Newton step; every other error is raised.
pub fn converge_root(segment: &mut Segment) -> MissionResult<()> {
    let process = segment.process_handle();
    let iterate = process.process("iterate").ok_or(MissionError::Invariant {
        what: "segment process has no iterate phase",
    })?;

    let x0 = segment.state.unknowns.flatten();
    let mut finder = RootFinder::new(segment.solver.clone());
    let result = finder.solve_rejecting(
        x0,
        |x: &DVector<f64>| -> MissionResult<DVector<f64>> {
            segment.state.unknowns.unflatten(x)?;
            iterate.run(segment)?;
            Ok(segment.state.residuals.flatten())
        },
        MissionError::is_outside_domain,
    )?;
    segment.state.unknowns.unflatten(&result.x)?;

    if result.status.is_converged() {
        tracing::info!(
            segment = %segment.tag,
            iterations = result.iterations,
            residual_max = result.residual_max,
            "segment converged"
        );
    }
    segment.set_report(SolveReport {
        status: result.status,
        iterations: result.iterations,
        evaluations: result.evaluations,
        residual_max: result.residual_max,
    });
    Ok(())
}

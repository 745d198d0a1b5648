//! Parallel evaluation of independent mission copies.

use crate::error::MissionResult;
use crate::mission::{Mission, MissionResults};
use rayon::prelude::*;

/// Evaluate one deep copy of `base` per case, in parallel.
///
/// `configure` adjusts each copy before evaluation. Results are returned in
/// case order; a failing case does not affect the others.
pub fn evaluate_sweep<T, F>(base: &Mission, cases: &[T], configure: F) -> Vec<MissionResult<MissionResults>>
where
    T: Sync,
    F: Fn(&mut Mission, &T) -> MissionResult<()> + Sync,
{
    tracing::info!(mission = %base.tag, cases = cases.len(), "sweep");
    cases
        .par_iter()
        .map(|case| {
            let mut mission = base.clone();
            configure(&mut mission, case)?;
            mission.evaluate()
        })
        .collect()
}

//! Mission sizing loops: range against a fuel budget, single-point
//! accelerations against target lift coefficients or angles of attack.

use crate::error::{MissionError, MissionResult};
use crate::mission::{Mission, MissionResults, SegmentResult};
use crate::segments::Profile;
use mf_core::{Angle, finite, m, mps2, relative_error, si};

/// Outer iterations of [`size_range_for_fuel`].
pub const MAX_SIZING_ITERATIONS: usize = 10;
/// Relative fuel tolerance of [`size_range_for_fuel`].
pub const SIZING_TOLERANCE: f64 = 1e-6;
/// Outer iterations of the acceleration sizing loops.
pub const MAX_ACCEL_ITERATIONS: usize = 50;
/// Lift coefficient tolerance of [`size_accel_for_cl`].
pub const CL_TOLERANCE: f64 = 0.005;
/// Angle of attack tolerance [deg] of [`size_accel_for_aoa`].
pub const AOA_TOLERANCE_DEG: f64 = 0.001;

#[derive(Clone, Debug)]
pub struct RangeSizing {
    /// Cruise distance of the last evaluation [m].
    pub distance: f64,
    pub fuel_burned: f64,
    pub iterations: usize,
    pub converged: bool,
    pub results: MissionResults,
}

/// Adjust a fixed-distance cruise until the mission burns `target_fuel` [kg].
///
/// Each pass evaluates the mission and changes the cruise distance by the
/// cruise specific range times the fuel error.
pub fn size_range_for_fuel(
    mission: &mut Mission,
    cruise_tag: &str,
    target_fuel: f64,
) -> MissionResult<RangeSizing> {
    if !(target_fuel > 0.0) {
        return Err(MissionError::profile(cruise_tag, "target fuel must be positive"));
    }
    cruise_distance(mission, cruise_tag)?;

    let mut iteration = 0;
    loop {
        iteration += 1;
        let distance = cruise_distance(mission, cruise_tag)?;
        let results = mission.evaluate()?;
        let fuel = finite(results.fuel_burned()?, "mission fuel burned")?;
        let error = target_fuel - fuel;
        let converged = relative_error(fuel, target_fuel) <= SIZING_TOLERANCE;
        tracing::debug!(iteration, distance, fuel, "range sizing");

        if converged || iteration == MAX_SIZING_ITERATIONS {
            if !converged {
                tracing::warn!(iteration, fuel, target_fuel, "range sizing did not converge");
            }
            return Ok(RangeSizing {
                distance,
                fuel_burned: fuel,
                iterations: iteration,
                converged,
                results,
            });
        }

        let cruise = results.get(cruise_tag)?;
        let cruise_fuel = cruise.fuel_burned()?;
        if !(cruise_fuel > 0.0) {
            return Err(MissionError::profile(cruise_tag, "cruise burns no fuel"));
        }
        let specific_range = cruise.distance_flown()? / cruise_fuel;
        let next = finite(distance + specific_range * error, "sized cruise distance")?;
        if !(next > 0.0) {
            return Err(MissionError::profile(
                cruise_tag,
                format!("sized cruise distance {next} m is not positive"),
            ));
        }
        set_cruise_distance(mission, cruise_tag, next)?;
    }
}

fn cruise_distance(mission: &Mission, tag: &str) -> MissionResult<f64> {
    mission
        .segment(tag)?
        .profile
        .cruise_distance()
        .ok_or_else(|| MissionError::profile(tag, "range sizing needs a fixed-distance cruise"))
}

fn set_cruise_distance(mission: &mut Mission, tag: &str, distance: f64) -> MissionResult<()> {
    let segment = mission.segment_mut(tag)?;
    match &mut segment.profile {
        Profile::Cruise(p) => {
            p.distance = m(distance);
            Ok(())
        }
        _ => Err(MissionError::profile(tag, "range sizing needs a fixed-distance cruise")),
    }
}

/// Outcome of [`size_accel_for_cl`] or [`size_accel_for_aoa`].
#[derive(Clone, Debug)]
pub struct AccelSizing {
    /// `z_accel` [m/s^2] of each sized point, in target order.
    pub z_accels: Vec<f64>,
    /// Target minus achieved value of each point.
    pub residuals: Vec<f64>,
    pub iterations: usize,
    pub converged: bool,
    pub results: MissionResults,
}

/// Adjust the `z_accel` of single-point segments until each reaches its
/// target lift coefficient.
///
/// `targets` pairs a single-point segment tag with its target CL.
pub fn size_accel_for_cl(
    mission: &mut Mission,
    targets: &[(&str, f64)],
) -> MissionResult<AccelSizing> {
    let goal = AccelGoal {
        what: "lift coefficient",
        tolerance: CL_TOLERANCE,
        gain: 10.0,
        achieved: |r: &SegmentResult| -> MissionResult<f64> {
            Ok(r.conditions().aerodynamics.lift_coefficient.first(0)?)
        },
    };
    size_accels(mission, targets, &goal)
}

/// Adjust the `z_accel` of single-point segments until each reaches its
/// target angle of attack.
pub fn size_accel_for_aoa(
    mission: &mut Mission,
    targets: &[(&str, Angle)],
) -> MissionResult<AccelSizing> {
    let degrees: Vec<(&str, f64)> = targets
        .iter()
        .map(|(tag, aoa)| (*tag, si::radians(*aoa).to_degrees()))
        .collect();
    let goal = AccelGoal {
        what: "angle of attack",
        tolerance: AOA_TOLERANCE_DEG,
        gain: 1.0,
        achieved: |r: &SegmentResult| -> MissionResult<f64> {
            Ok(r.conditions().aerodynamics.angle_of_attack.first(0)?.to_degrees())
        },
    };
    size_accels(mission, &degrees, &goal)
}

struct AccelGoal<F> {
    what: &'static str,
    tolerance: f64,
    /// Step [m/s^2] per unit residual before a secant slope exists.
    gain: f64,
    achieved: F,
}

/// Per-point secant iteration on `z_accel`.
///
/// More lift needs a more negative `z_accel`, so the first step moves
/// against the residual.
fn size_accels<F>(
    mission: &mut Mission,
    targets: &[(&str, f64)],
    goal: &AccelGoal<F>,
) -> MissionResult<AccelSizing>
where
    F: Fn(&SegmentResult) -> MissionResult<f64>,
{
    if targets.is_empty() {
        return Err(MissionError::Invariant {
            what: "acceleration sizing needs at least one target",
        });
    }
    let mut z_accels = Vec::with_capacity(targets.len());
    for (tag, target) in targets {
        finite(*target, "sizing target")?;
        z_accels.push(z_accel(mission, tag)?);
    }
    let mut previous: Vec<Option<(f64, f64)>> = vec![None; targets.len()];

    let mut iteration = 0;
    loop {
        let results = mission.evaluate()?;
        let mut residuals = Vec::with_capacity(targets.len());
        for (tag, target) in targets {
            let achieved = finite((goal.achieved)(results.get(tag)?)?, goal.what)?;
            residuals.push(target - achieved);
        }
        let worst = mf_core::max_abs(&residuals);
        let converged = worst < goal.tolerance;
        tracing::debug!(iteration, residual_max = worst, what = goal.what, "acceleration sizing");

        if converged || iteration == MAX_ACCEL_ITERATIONS {
            if !converged {
                tracing::warn!(
                    iteration,
                    residual_max = worst,
                    what = goal.what,
                    "acceleration sizing did not converge"
                );
            }
            return Ok(AccelSizing {
                z_accels,
                residuals,
                iterations: iteration,
                converged,
                results,
            });
        }
        iteration += 1;

        for (i, (tag, _)) in targets.iter().enumerate() {
            let (accel, residual) = (z_accels[i], residuals[i]);
            let step = match previous[i] {
                Some((last_accel, last_residual)) if residual != last_residual => {
                    -residual * (accel - last_accel) / (residual - last_residual)
                }
                _ => -goal.gain * residual,
            };
            previous[i] = Some((accel, residual));
            let next = finite(accel + step, "sized z acceleration")?;
            set_z_accel(mission, tag, next)?;
            z_accels[i] = next;
        }
    }
}

fn z_accel(mission: &Mission, tag: &str) -> MissionResult<f64> {
    match &mission.segment(tag)?.profile {
        Profile::SinglePoint(p) => Ok(si::meters_per_second_squared(p.z_accel)),
        _ => Err(MissionError::profile(tag, "acceleration sizing needs a single-point segment")),
    }
}

fn set_z_accel(mission: &mut Mission, tag: &str, accel: f64) -> MissionResult<()> {
    let segment = mission.segment_mut(tag)?;
    match &mut segment.profile {
        Profile::SinglePoint(p) => {
            p.z_accel = mps2(accel);
            Ok(())
        }
        _ => Err(MissionError::profile(tag, "acceleration sizing needs a single-point segment")),
    }
}

mod common;

use common::{analyses, assert_close, climb};
use mf_core::{deg, kg, km, m, mps, mps2, pa};
use mf_mission::{
    ClimbConstantStagnationPressureConstantAngle, CruiseConstantSpeedConstantAltitude,
    CruiseVaryDistance, DescentConstantSpeedConstantAngle, Layout, MissionError, MissionResult,
    Profile, Segment, SinglePointSetSpeedSetAltitude,
};
use mf_process::Process;
use mf_solver::SolveStatus;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[test]
fn constant_angle_climb_converges() {
    let mut segment = climb("climb", Some(0.0), 1000.0);
    let report = segment.evaluate(None).unwrap();

    assert_eq!(report.status, SolveStatus::Converged);
    assert!(report.iterations <= 50, "iterations: {}", report.iterations);
    assert!(report.residual_max < 1e-6);

    let inertial = &segment.state.conditions.frames.inertial;
    assert_close(-inertial.position_vector.first(2).unwrap(), 0.0, 0.0);
    assert_close(-inertial.position_vector.last(2).unwrap(), 1000.0, 1e-3);

    let gamma = 3.0_f64.to_radians();
    let duration = 1000.0 / (60.0 * gamma.sin());
    assert_close(inertial.time.last(0).unwrap(), duration, 1e-6 * duration);
    let ground = 1000.0 / gamma.tan();
    assert_close(inertial.position_vector.last(0).unwrap(), ground, 1e-6 * ground);

    let weights = &segment.state.conditions.weights;
    assert_eq!(weights.total_mass.first(0).unwrap(), 1000.0);
    assert!(weights.total_mass.last(0).unwrap() < 1000.0);

    let throttle = segment.state.conditions.propulsion.throttle.column(0).unwrap();
    assert!(throttle.iter().all(|t| *t > 0.0 && *t < 1.0));
}

#[test]
fn climb_requires_a_start_altitude() {
    let mut segment = climb("climb", None, 1000.0);
    let err = segment.evaluate(None).unwrap_err();
    assert!(matches!(err, MissionError::Profile { .. }));
}

#[test]
fn climb_rejects_altitude_loss() {
    let mut segment = climb("climb", Some(1000.0), 500.0);
    let err = segment.evaluate(None).unwrap_err();
    assert!(matches!(err, MissionError::Profile { .. }));
}

#[test]
fn descent_converges_to_end_altitude() {
    let mut segment = DescentConstantSpeedConstantAngle {
        air_speed: mps(60.0),
        descent_angle: deg(3.0),
        altitude_start: Some(m(1000.0)),
        altitude_end: m(0.0),
    }
    .segment("descent", analyses());
    let report = segment.evaluate(None).unwrap();

    assert!(report.status.is_converged());
    let position = &segment.state.conditions.frames.inertial.position_vector;
    assert_close(-position.last(2).unwrap(), 0.0, 1e-3);
    let gamma = segment.state.conditions.frames.wind.inertial_rotations.column(1).unwrap();
    assert!(gamma.iter().all(|g| (g + 3.0_f64.to_radians()).abs() < 1e-12));
}

#[test]
fn cruise_covers_distance_at_constant_altitude() {
    let mut segment = CruiseConstantSpeedConstantAltitude {
        air_speed: Some(mps(60.0)),
        mach: None,
        altitude: Some(m(1000.0)),
        distance: km(20.0),
    }
    .segment("cruise", analyses());
    let report = segment.evaluate(None).unwrap();

    assert!(report.status.is_converged());
    let inertial = &segment.state.conditions.frames.inertial;
    assert_close(inertial.position_vector.last(0).unwrap(), 20_000.0, 1e-6);
    assert_close(inertial.time.last(0).unwrap(), 20_000.0 / 60.0, 1e-9);
    let altitude = segment.state.conditions.freestream.altitude.column(0).unwrap();
    assert!(altitude.iter().all(|a| *a == 1000.0));
}

#[test]
fn cruise_at_mach_uses_local_speed_of_sound() {
    let mut segment = CruiseConstantSpeedConstantAltitude {
        air_speed: None,
        mach: Some(0.18),
        altitude: Some(m(1000.0)),
        distance: km(10.0),
    }
    .segment("cruise", analyses());
    segment.evaluate(None).unwrap();

    let mach = segment.state.conditions.freestream.mach_number.column(0).unwrap();
    assert!(mach.iter().all(|value| (value - 0.18).abs() < 1e-12));
}

#[test]
fn cruise_with_both_speeds_is_rejected() {
    let mut segment = CruiseConstantSpeedConstantAltitude {
        air_speed: Some(mps(60.0)),
        mach: Some(0.2),
        altitude: Some(m(1000.0)),
        distance: km(10.0),
    }
    .segment("cruise", analyses());
    assert!(matches!(
        segment.evaluate(None),
        Err(MissionError::Profile { .. })
    ));
}

#[test]
fn stagnation_pressure_climb_matches_unknown_altitudes() {
    let mut segment = ClimbConstantStagnationPressureConstantAngle {
        stagnation_pressure: pa(103_550.0),
        climb_angle: deg(3.0),
        altitude_start: Some(m(0.0)),
        altitude_end: m(100.0),
    }
    .segment("climb", analyses());
    let report = segment.evaluate(None).unwrap();

    assert!(report.status.is_converged(), "{report:?}");
    let conditions = &segment.state.conditions;
    let assumed = conditions.freestream.altitude.column(0).unwrap();
    let integrated = -conditions.frames.inertial.position_vector.column(2).unwrap();
    for (a, b) in assumed.iter().zip(integrated.iter()) {
        assert_close(*a, *b, 1e-4);
    }
    assert_close(integrated[integrated.len() - 1], 100.0, 1e-3);

    // pitot pressure is held, so airspeed grows as static pressure drops
    let speed = conditions.freestream.velocity.column(0).unwrap();
    assert!(speed[speed.len() - 1] > speed[0]);
}

fn stagnation_climb_after(previous: &mut Segment) -> Segment {
    previous.evaluate(None).unwrap();
    ClimbConstantStagnationPressureConstantAngle {
        stagnation_pressure: pa(92_000.0),
        climb_angle: deg(3.0),
        altitude_start: None,
        altitude_end: m(1100.0),
    }
    .segment("climb_2", analyses())
}

#[test]
fn stagnation_climb_guesses_from_the_inherited_start_altitude() {
    let mut first = climb("climb_1", Some(0.0), 1000.0);
    let mut segment = stagnation_climb_after(&mut first);
    segment.solver.max_iterations = 0;
    segment.evaluate(Some(&first.state.conditions)).unwrap();

    let start = -first.state.conditions.frames.inertial.position_vector.last(2).unwrap();
    let guess = segment.state.unknowns.column("altitudes", 0).unwrap();
    assert!(guess.iter().all(|h| *h == 0.5 * (start + 1100.0)));
}

#[test]
fn stagnation_climb_without_start_converges_after_a_climb() {
    let mut first = climb("climb_1", Some(0.0), 1000.0);
    let mut segment = stagnation_climb_after(&mut first);
    let report = segment.evaluate(Some(&first.state.conditions)).unwrap();

    assert!(report.status.is_converged(), "{report:?}");
    let altitude = -segment.state.conditions.frames.inertial.position_vector.column(2).unwrap();
    assert_close(altitude[0], 1000.0, 1e-3);
    assert_close(altitude[altitude.len() - 1], 1100.0, 1e-3);
}

#[test]
fn vary_distance_cruise_lands_at_target_weight() {
    let mut segment = CruiseVaryDistance {
        mach: 0.18,
        altitude: Some(m(1000.0)),
        target_landing_weight: kg(997.0),
        distance: km(10.0),
    }
    .segment("cruise", analyses());
    let report = segment.evaluate(None).unwrap();

    assert!(report.status.is_converged(), "{report:?}");
    let final_mass = segment.state.conditions.weights.total_mass.last(0).unwrap();
    assert_close(final_mass, 997.0, 1e-4);

    let distance = segment.state.unknowns.column("distance", 0).unwrap();
    let last = distance[distance.len() - 1];
    assert!(distance.iter().all(|d| (d - last).abs() < 1e-3));
    let flown = segment.state.conditions.frames.inertial.position_vector.last(0).unwrap();
    assert_close(flown, last, 1e-6 * last);
}

fn single_point(z_accel: f64) -> Segment {
    SinglePointSetSpeedSetAltitude {
        air_speed: mps(60.0),
        altitude: Some(m(1000.0)),
        z_accel: mps2(z_accel),
        ..SinglePointSetSpeedSetAltitude::default()
    }
    .segment("point", analyses())
}

#[test]
fn single_point_trims_against_the_prescribed_acceleration() {
    let mut level = single_point(0.0);
    let report = level.evaluate(None).unwrap();
    assert!(report.status.is_converged(), "{report:?}");
    assert_eq!(level.state.control_points(), 2);

    let conditions = &level.state.conditions;
    let force = conditions.frames.inertial.total_force_vector.get().unwrap();
    let mass = conditions.weights.total_mass.column(0).unwrap();
    for row in 0..2 {
        assert!((force[(row, 0)] / mass[row]).abs() < 1e-6);
        assert!((force[(row, 2)] / mass[row]).abs() < 1e-6);
    }
    assert_close(conditions.frames.inertial.time.last(0).unwrap(), 1.0, 1e-12);

    // pulling up takes more lift
    let mut pull_up = single_point(-3.0);
    pull_up.evaluate(None).unwrap();
    let cl = |s: &Segment| s.state.conditions.aerodynamics.lift_coefficient.first(0).unwrap();
    assert!(cl(&pull_up) > cl(&level));
    let force = pull_up.state.conditions.frames.inertial.total_force_vector.get().unwrap();
    let mass = pull_up.state.conditions.weights.total_mass.first(0).unwrap();
    assert_close(force[(0, 2)] / mass, -3.0, 1e-6);
}

#[test]
fn zero_unknowns_skip_the_solver_and_iterate_once() {
    let passes = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&passes);
    let iterate = Process::new().step("count", move |_: &mut Segment| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });

    let mut segment = Segment::custom("hold", analyses(), Layout::new(), iterate);
    let report = segment.evaluate(None).unwrap();

    assert_eq!(passes.load(Ordering::SeqCst), 1);
    assert_eq!(report.status, SolveStatus::Converged);
    assert_eq!(report.evaluations, 0);
    assert_eq!(segment.profile, Profile::Custom);
}

#[test]
fn unwritten_condition_is_reported_by_path() {
    // reads the force residual inputs without any step having written them
    let iterate = Process::new().step("residuals", mf_mission::steps::residuals::residual_total_forces);
    let layout = Layout::new().unknown("throttle", &[0.5]).residual("forces", 1);
    let mut segment = Segment::custom("broken", analyses(), layout, iterate);

    match segment.evaluate(None) {
        Err(MissionError::State(mf_state::StateError::MissingField { path })) => {
            assert_eq!(path, "weights.total_mass");
        }
        other => panic!("expected a missing field, got {other:?}"),
    }
}

#[test]
fn conditions_from_an_earlier_pass_are_not_visible() {
    let passes = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&passes);
    let iterate = Process::new()
        .step("density", move |segment: &mut Segment| -> MissionResult<()> {
            // only the first pass writes the density
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                segment.state.conditions.freestream.density.write().fill(1.2);
            }
            Ok(())
        })
        .step("residual", |segment: &mut Segment| -> MissionResult<()> {
            let rho = segment.state.conditions.freestream.density.column(0)?;
            let throttle = segment.state.unknowns.column("throttle", 0)?;
            let residual = throttle.zip_map(&rho, |t, r| t * r - 0.6);
            segment.state.residuals.set_column("forces", 0, &residual)?;
            Ok(())
        });
    let layout = Layout::new().unknown("throttle", &[0.2]).residual("forces", 1);
    let mut segment = Segment::custom("stale", analyses(), layout, iterate);

    match segment.evaluate(None) {
        Err(MissionError::State(mf_state::StateError::MissingField { path })) => {
            assert_eq!(path, "freestream.density");
        }
        other => panic!("expected a missing field, got {other:?}"),
    }
    assert!(passes.load(Ordering::SeqCst) >= 2);
}

#[test]
fn fewer_than_two_control_points_is_rejected() {
    let mut segment = climb("climb", Some(0.0), 1000.0);
    segment.control_points = 1;
    assert!(matches!(
        segment.evaluate(None),
        Err(MissionError::Profile { .. })
    ));
}

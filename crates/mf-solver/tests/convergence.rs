use mf_solver::{FailureCause, NewtonConfig, RootFinder, SolveStatus, SolverError, newton_solve};
use nalgebra::DVector;

#[test]
fn linear_residual_converges_in_two_iterations() {
    let c = 42.5;
    let result = newton_solve(
        DVector::from_element(1, 0.0),
        |x: &DVector<f64>| Ok::<_, SolverError>(x.map(|v| v - c)),
        &NewtonConfig::default(),
    )
    .unwrap();

    assert_eq!(result.status, SolveStatus::Converged);
    assert!(result.iterations <= 2);
    assert!((result.x[0] - c).abs() < 1e-8);
    assert!(result.residual_max < 1e-8);
}

#[test]
fn rootless_residual_stagnates_before_the_budget() {
    // x^2 + 1 has its minimum norm at x = 0; backtracking stops there.
    let config = NewtonConfig::default();
    for start in [-3.0, 0.0, 0.7, 5.0] {
        let mut finder = RootFinder::new(config.clone());
        let result = finder
            .solve(DVector::from_element(1, start), |x: &DVector<f64>| {
                Ok::<_, SolverError>(x.map(|v| v * v + 1.0))
            })
            .unwrap();

        assert_eq!(
            result.status,
            SolveStatus::Failed(FailureCause::Stagnated),
            "start {start}"
        );
        assert!(result.iterations <= config.max_iterations);
        assert!(result.residual_max >= 1.0);
        assert!(!finder.status().is_converged());
    }
}

#[test]
fn rootless_residual_exhausts_the_budget_with_full_steps() {
    let config = NewtonConfig {
        max_iterations: 25,
        max_line_search_iters: 0,
        ..NewtonConfig::default()
    };
    for start in [0.7, 3.0] {
        let result = newton_solve(
            DVector::from_element(1, start),
            |x: &DVector<f64>| Ok::<_, SolverError>(x.map(|v| v * v + 1.0)),
            &config,
        )
        .unwrap();

        assert_eq!(
            result.status,
            SolveStatus::Failed(FailureCause::MaxIterations),
            "start {start}"
        );
        assert_eq!(result.iterations, config.max_iterations);
        assert!(result.residual_max >= 1.0);
    }
}

#[test]
fn iteration_budget_is_a_hard_cap() {
    // Slow convergence: the root is at x = 0 with a quintic flat spot.
    let config = NewtonConfig {
        max_iterations: 3,
        ..NewtonConfig::default()
    };
    let result = newton_solve(
        DVector::from_element(1, 1.0),
        |x: &DVector<f64>| Ok::<_, SolverError>(x.map(|v| v.powi(5))),
        &config,
    )
    .unwrap();

    assert_eq!(result.status, SolveStatus::Failed(FailureCause::MaxIterations));
    assert_eq!(result.iterations, 3);
}

#[test]
fn zero_unknowns_short_circuit() {
    let mut calls = 0;
    let result = newton_solve(
        DVector::zeros(0),
        |x: &DVector<f64>| {
            calls += 1;
            Ok::<_, SolverError>(x.clone())
        },
        &NewtonConfig::default(),
    )
    .unwrap();

    assert_eq!(result.status, SolveStatus::Converged);
    assert_eq!(result.evaluations, 0);
    assert_eq!(calls, 0);
}

#[test]
fn unknown_without_effect_is_singular() {
    let result = newton_solve(
        DVector::from_vec(vec![0.0, 0.0]),
        |x: &DVector<f64>| {
            Ok::<_, SolverError>(DVector::from_vec(vec![x[0] - 1.0, 2.0 * x[0] - 3.0]))
        },
        &NewtonConfig::default(),
    )
    .unwrap();

    assert_eq!(
        result.status,
        SolveStatus::Failed(FailureCause::SingularJacobian { column: Some(1) })
    );
}

#[derive(Debug, PartialEq)]
enum StepError {
    Missing(&'static str),
    Solver(SolverError),
}

impl From<SolverError> for StepError {
    fn from(e: SolverError) -> Self {
        StepError::Solver(e)
    }
}

#[test]
fn residual_errors_propagate_unmodified() {
    let mut calls = 0;
    let err = newton_solve(
        DVector::from_element(1, 0.0),
        |x: &DVector<f64>| {
            calls += 1;
            if calls > 1 {
                Err(StepError::Missing("freestream.density"))
            } else {
                Ok(x.map(|v| v - 1.0))
            }
        },
        &NewtonConfig::default(),
    )
    .unwrap_err();

    assert_eq!(err, StepError::Missing("freestream.density"));
}

#[test]
fn rejected_trial_points_shrink_the_step() {
    // Defined only for x > 0; the full Newton step from x = 1 lands at x < 0.
    let result = RootFinder::new(NewtonConfig::default())
        .solve_rejecting(
            DVector::from_element(1, 1.0),
            |x: &DVector<f64>| {
                if x[0] <= 0.0 {
                    Err(StepError::Missing("log domain"))
                } else {
                    Ok(x.map(|v| v.ln() + 3.0))
                }
            },
            |e: &StepError| matches!(e, StepError::Missing("log domain")),
        )
        .unwrap();

    assert_eq!(result.status, SolveStatus::Converged);
    assert!((result.x[0] - (-3.0f64).exp()).abs() < 1e-8);
}

#[test]
fn rejected_start_point_is_infeasible() {
    let result = RootFinder::new(NewtonConfig::default())
        .solve_rejecting(
            DVector::from_element(1, -1.0),
            |x: &DVector<f64>| {
                if x[0] <= 0.0 {
                    Err(StepError::Missing("log domain"))
                } else {
                    Ok(x.map(f64::ln))
                }
            },
            |_: &StepError| true,
        )
        .unwrap();

    assert_eq!(result.status, SolveStatus::Failed(FailureCause::Infeasible));
    assert_eq!(result.iterations, 0);
    assert_eq!(result.evaluations, 1);
}

#[test]
fn unrejected_errors_still_propagate() {
    let err = RootFinder::new(NewtonConfig::default())
        .solve_rejecting(
            DVector::from_element(1, 0.0),
            |_: &DVector<f64>| Err::<DVector<f64>, _>(StepError::Missing("weights.total_mass")),
            |e: &StepError| matches!(e, StepError::Missing("log domain")),
        )
        .unwrap_err();

    assert_eq!(err, StepError::Missing("weights.total_mass"));
}

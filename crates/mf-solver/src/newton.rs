//! Newton solver with backtracking line search.

use crate::error::SolverError;
use crate::jacobian::{JacobianScheme, central_difference_jacobian, finite_difference_jacobian};
use mf_core::max_abs;
use nalgebra::DVector;
use std::cell::Cell;
use std::fmt;

/// Newton solver configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct NewtonConfig {
    /// Maximum Newton iterations
    pub max_iterations: usize,
    /// Converged when every residual component is below this magnitude
    pub tolerance: f64,
    /// Relative finite difference step
    pub fd_step: f64,
    pub jacobian: JacobianScheme,
    /// Line search backtracking factor
    pub line_search_beta: f64,
    /// Maximum line search iterations; 0 takes full Newton steps
    pub max_line_search_iters: usize,
    /// Smallest accepted line search factor
    pub min_step: f64,
}

impl Default for NewtonConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 1e-8,
            fd_step: 1e-7,
            jacobian: JacobianScheme::Forward,
            line_search_beta: 0.5,
            max_line_search_iters: 20,
            min_step: 1e-10,
        }
    }
}

impl NewtonConfig {
    fn validate(&self) -> Result<(), SolverError> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(SolverError::InvalidConfig { what: "tolerance" });
        }
        if !(self.fd_step.is_finite() && self.fd_step > 0.0) {
            return Err(SolverError::InvalidConfig { what: "fd_step" });
        }
        if !(self.line_search_beta > 0.0 && self.line_search_beta < 1.0) {
            return Err(SolverError::InvalidConfig {
                what: "line_search_beta",
            });
        }
        if !(self.min_step > 0.0 && self.min_step <= 1.0) {
            return Err(SolverError::InvalidConfig { what: "min_step" });
        }
        Ok(())
    }
}

/// Why the solver gave up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureCause {
    MaxIterations,
    /// `column` names the unknown with no effect on any residual, when known.
    SingularJacobian { column: Option<usize> },
    NonFiniteResidual,
    /// The line search found no step that reduces the residual.
    Stagnated,
    /// The residual could not be evaluated at the start point, a Jacobian
    /// perturbation or a full Newton step.
    Infeasible,
}

impl fmt::Display for FailureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureCause::MaxIterations => f.write_str("maximum iterations reached"),
            FailureCause::SingularJacobian { column: Some(c) } => {
                write!(f, "singular Jacobian (unknown {c} has no effect)")
            }
            FailureCause::SingularJacobian { column: None } => f.write_str("singular Jacobian"),
            FailureCause::NonFiniteResidual => f.write_str("non-finite residual"),
            FailureCause::Stagnated => f.write_str("line search stagnated"),
            FailureCause::Infeasible => f.write_str("residual undefined at trial point"),
        }
    }
}

/// Solver state machine: `Unsolved -> Iterating -> Converged | Failed`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SolveStatus {
    #[default]
    Unsolved,
    Iterating,
    Converged,
    Failed(FailureCause),
}

impl SolveStatus {
    pub fn is_converged(&self) -> bool {
        matches!(self, SolveStatus::Converged)
    }
}

/// Newton iteration result.
#[derive(Clone, Debug, PartialEq)]
pub struct NewtonResult {
    /// Last accepted unknown vector
    pub x: DVector<f64>,
    /// max |r| at `x`
    pub residual_max: f64,
    /// Newton iterations performed
    pub iterations: usize,
    /// Residual function calls, Jacobian columns included
    pub evaluations: usize,
    pub status: SolveStatus,
}

/// Stateful Newton driver.
#[derive(Clone, Debug, Default)]
pub struct RootFinder {
    config: NewtonConfig,
    status: SolveStatus,
}

impl RootFinder {
    pub fn new(config: NewtonConfig) -> Self {
        Self {
            config,
            status: SolveStatus::Unsolved,
        }
    }

    pub fn config(&self) -> &NewtonConfig {
        &self.config
    }

    pub fn status(&self) -> SolveStatus {
        self.status
    }

    /// Drive `residual_fn` to zero starting from `x0`.
    ///
    /// An empty `x0` converges immediately without calling `residual_fn`.
    /// Every error from `residual_fn` is returned as is.
    pub fn solve<F, E>(&mut self, x0: DVector<f64>, residual_fn: F) -> Result<NewtonResult, E>
    where
        F: FnMut(&DVector<f64>) -> Result<DVector<f64>, E>,
        E: From<SolverError>,
    {
        self.solve_rejecting(x0, residual_fn, |_: &E| false)
    }

    /// Like [`RootFinder::solve`], but errors for which `rejects` returns true
    /// mark the trial point as outside the residual's domain.
    ///
    /// A rejected line search point shrinks the step. A rejected starting
    /// point or Jacobian column ends the solve with
    /// [`FailureCause::Infeasible`]. Other errors are returned as is.
    pub fn solve_rejecting<F, E, P>(
        &mut self,
        x0: DVector<f64>,
        mut residual_fn: F,
        rejects: P,
    ) -> Result<NewtonResult, E>
    where
        F: FnMut(&DVector<f64>) -> Result<DVector<f64>, E>,
        E: From<SolverError>,
        P: Fn(&E) -> bool,
    {
        self.config.validate()?;
        self.status = SolveStatus::Iterating;

        if x0.is_empty() {
            return Ok(self.finish(x0, 0.0, 0, 0, SolveStatus::Converged));
        }

        let calls = Cell::new(0usize);
        let mut counted = |x: &DVector<f64>| {
            calls.set(calls.get() + 1);
            residual_fn(x)
        };

        let mut x = x0;
        let Some(mut r) = trial(&mut counted, &x, &rejects)? else {
            return Ok(self.fail(x, f64::INFINITY, 0, calls.get(), FailureCause::Infeasible));
        };
        if r.len() != x.len() {
            self.status = SolveStatus::Unsolved;
            return Err(SolverError::DimensionMismatch {
                unknowns: x.len(),
                residuals: r.len(),
            }
            .into());
        }
        let mut r_max = max_abs(r.as_slice());

        for iter in 0..self.config.max_iterations {
            if !r_max.is_finite() {
                return Ok(self.fail(x, r_max, iter, calls.get(), FailureCause::NonFiniteResidual));
            }
            if r_max < self.config.tolerance {
                return Ok(self.finish(x, r_max, iter, calls.get(), SolveStatus::Converged));
            }

            let jac = match self.config.jacobian {
                JacobianScheme::Forward => {
                    finite_difference_jacobian(&x, &r, &mut counted, self.config.fd_step)
                }
                JacobianScheme::Central => {
                    central_difference_jacobian(&x, r.len(), &mut counted, self.config.fd_step)
                }
            };
            let jac = match jac {
                Ok(jac) => jac,
                Err(e) if rejects(&e) => {
                    return Ok(self.fail(x, r_max, iter, calls.get(), FailureCause::Infeasible));
                }
                Err(e) => return Err(e),
            };

            if let Some(column) = (0..jac.ncols()).find(|&j| jac.column(j).iter().all(|v| *v == 0.0))
            {
                let cause = FailureCause::SingularJacobian {
                    column: Some(column),
                };
                return Ok(self.fail(x, r_max, iter, calls.get(), cause));
            }

            // Solve J * dx = -r
            let dx = match jac.lu().solve(&(-&r)) {
                Some(dx) if dx.iter().all(|v| v.is_finite()) => dx,
                _ => {
                    let cause = FailureCause::SingularJacobian { column: None };
                    return Ok(self.fail(x, r_max, iter, calls.get(), cause));
                }
            };

            let mut alpha = 1.0;
            let mut accepted = None;
            if self.config.max_line_search_iters == 0 {
                // Full Newton step
                let x_new = &x + &dx;
                match trial(&mut counted, &x_new, &rejects)? {
                    Some(r_new) => accepted = Some((x_new, r_new)),
                    None => {
                        let cause = FailureCause::Infeasible;
                        return Ok(self.fail(x, r_max, iter + 1, calls.get(), cause));
                    }
                }
            } else {
                // Backtrack on the residual 2-norm
                let r_norm = r.norm();
                for _ in 0..=self.config.max_line_search_iters {
                    if alpha < self.config.min_step {
                        break;
                    }
                    let x_new = &x + alpha * &dx;
                    if let Some(r_new) = trial(&mut counted, &x_new, &rejects)? {
                        let r_new_norm = r_new.norm();
                        if r_new_norm.is_finite() && r_new_norm < r_norm {
                            accepted = Some((x_new, r_new));
                            break;
                        }
                    }
                    alpha *= self.config.line_search_beta;
                }
            }

            let Some((x_new, r_new)) = accepted else {
                return Ok(self.fail(x, r_max, iter + 1, calls.get(), FailureCause::Stagnated));
            };
            x = x_new;
            r = r_new;
            r_max = max_abs(r.as_slice());

            tracing::debug!(iteration = iter + 1, residual_max = r_max, step = alpha, "newton");
        }

        let iterations = self.config.max_iterations;
        if r_max < self.config.tolerance {
            Ok(self.finish(x, r_max, iterations, calls.get(), SolveStatus::Converged))
        } else {
            Ok(self.fail(x, r_max, iterations, calls.get(), FailureCause::MaxIterations))
        }
    }

    fn fail(
        &mut self,
        x: DVector<f64>,
        residual_max: f64,
        iterations: usize,
        evaluations: usize,
        cause: FailureCause,
    ) -> NewtonResult {
        self.finish(x, residual_max, iterations, evaluations, SolveStatus::Failed(cause))
    }

    fn finish(
        &mut self,
        x: DVector<f64>,
        residual_max: f64,
        iterations: usize,
        evaluations: usize,
        status: SolveStatus,
    ) -> NewtonResult {
        self.status = status;
        NewtonResult {
            x,
            residual_max,
            iterations,
            evaluations,
            status,
        }
    }
}

/// Residual at `x`, or `None` when the error marks `x` as rejected.
fn trial<F, E, P>(f: &mut F, x: &DVector<f64>, rejects: &P) -> Result<Option<DVector<f64>>, E>
where
    F: FnMut(&DVector<f64>) -> Result<DVector<f64>, E>,
    P: Fn(&E) -> bool,
{
    match f(x) {
        Ok(r) => Ok(Some(r)),
        Err(e) if rejects(&e) => Ok(None),
        Err(e) => Err(e),
    }
}

/// One-shot solve with a fresh [`RootFinder`].
pub fn newton_solve<F, E>(
    x0: DVector<f64>,
    residual_fn: F,
    config: &NewtonConfig,
) -> Result<NewtonResult, E>
where
    F: FnMut(&DVector<f64>) -> Result<DVector<f64>, E>,
    E: From<SolverError>,
{
    RootFinder::new(config.clone()).solve(x0, residual_fn)
}

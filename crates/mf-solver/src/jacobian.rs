//! Finite difference Jacobian computation.

use nalgebra::{DMatrix, DVector};

/// Difference scheme used to estimate the Jacobian.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum JacobianScheme {
    #[default]
    Forward,
    /// Twice the residual evaluations, second-order accurate.
    Central,
}

fn step_size(x: f64, epsilon: f64) -> f64 {
    epsilon * x.abs().max(1.0)
}

/// Compute Jacobian using forward finite differences.
///
/// `f_x` is the residual already evaluated at `x`. For each column j, perturbs
/// x[j] and computes (f(x+e) - f(x))/e.
pub fn finite_difference_jacobian<F, E>(
    x: &DVector<f64>,
    f_x: &DVector<f64>,
    f: &mut F,
    epsilon: f64,
) -> Result<DMatrix<f64>, E>
where
    F: FnMut(&DVector<f64>) -> Result<DVector<f64>, E>,
{
    let mut jac = DMatrix::zeros(f_x.len(), x.len());
    let mut x_perturbed = x.clone();

    for j in 0..x.len() {
        let dx = step_size(x[j], epsilon);
        x_perturbed[j] = x[j] + dx;
        let f_perturbed = f(&x_perturbed)?;
        x_perturbed[j] = x[j];

        jac.set_column(j, &((f_perturbed - f_x) / dx));
    }

    Ok(jac)
}

/// Compute Jacobian using central finite differences.
pub fn central_difference_jacobian<F, E>(
    x: &DVector<f64>,
    rows: usize,
    f: &mut F,
    epsilon: f64,
) -> Result<DMatrix<f64>, E>
where
    F: FnMut(&DVector<f64>) -> Result<DVector<f64>, E>,
{
    let mut jac = DMatrix::zeros(rows, x.len());
    let mut x_perturbed = x.clone();

    for j in 0..x.len() {
        let dx = step_size(x[j], epsilon);

        x_perturbed[j] = x[j] + dx;
        let f_plus = f(&x_perturbed)?;
        x_perturbed[j] = x[j] - dx;
        let f_minus = f(&x_perturbed)?;
        x_perturbed[j] = x[j];

        jac.set_column(j, &((f_plus - f_minus) / (2.0 * dx)));
    }

    Ok(jac)
}

#[cfg(test)]
mod tests {
    use super::*;

    type Never = std::convert::Infallible;

    #[test]
    fn jacobian_linear() {
        // f(x) = 2*x, J = 2
        let mut f = |x: &DVector<f64>| -> Result<DVector<f64>, Never> {
            Ok(DVector::from_element(1, 2.0 * x[0]))
        };

        let x = DVector::from_element(1, 3.0);
        let f_x = DVector::from_element(1, 6.0);
        let jac = finite_difference_jacobian(&x, &f_x, &mut f, 1e-7).unwrap();

        assert!((jac[(0, 0)] - 2.0).abs() < 1e-5);
    }

    #[test]
    fn jacobian_quadratic_central() {
        // f(x) = x^2, J = 2*x
        let mut f = |x: &DVector<f64>| -> Result<DVector<f64>, Never> {
            Ok(DVector::from_element(1, x[0] * x[0]))
        };

        let x = DVector::from_element(1, 3.0);
        let jac = central_difference_jacobian(&x, 1, &mut f, 1e-6).unwrap();

        assert!((jac[(0, 0)] - 6.0).abs() < 1e-6);
    }

    #[test]
    fn ignored_unknown_gives_exact_zero_column() {
        let mut f = |x: &DVector<f64>| -> Result<DVector<f64>, Never> {
            Ok(DVector::from_vec(vec![x[0] - 1.0, x[0] + 1.0]))
        };

        let x = DVector::from_vec(vec![0.3, 7.0]);
        let f_x = f(&x).unwrap();
        let jac = finite_difference_jacobian(&x, &f_x, &mut f, 1e-7).unwrap();

        assert!(jac.column(1).iter().all(|v| *v == 0.0));
        assert!(jac[(0, 0)] != 0.0);
    }
}

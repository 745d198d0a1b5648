//! Chebyshev-Gauss-Lobatto collocation on `[0, 1]`.

use crate::error::{NumericsError, NumericsResult};
use crate::operators::Operators;
use nalgebra::{DMatrix, DVector};
use std::f64::consts::PI;

/// Build dimensionless operators for `n` control points.
///
/// Nodes are `x_j = (1 - cos(pi j / (n-1))) / 2`, so `x_0 = 0` and `x_{n-1} = 1`.
/// The differentiation matrix is the classic Chebyshev collocation matrix with
/// its diagonal taken as the negative off-diagonal row sum, which makes `D`
/// annihilate constants to rounding. The integration matrix inverts `D` on the
/// subspace of functions that vanish at node 0, so its first row and column are
/// exactly zero and `I * f'` reproduces `f - f(0)`.
pub fn chebyshev(n: usize) -> NumericsResult<Operators> {
    if n < 2 {
        return Err(NumericsError::TooFewControlPoints { requested: n });
    }

    let last = (n - 1) as f64;
    let nodes = DVector::from_fn(n, |j, _| 0.5 * (1.0 - (PI * j as f64 / last).cos()));

    let weight = |j: usize| -> f64 {
        let c = if j == 0 || j == n - 1 { 2.0 } else { 1.0 };
        if j % 2 == 0 { c } else { -c }
    };

    let mut differentiate = DMatrix::zeros(n, n);
    for i in 0..n {
        let mut row_sum = 0.0;
        for j in 0..n {
            if i == j {
                continue;
            }
            let d = (weight(i) / weight(j)) / (nodes[i] - nodes[j]);
            differentiate[(i, j)] = d;
            row_sum += d;
        }
        differentiate[(i, i)] = -row_sum;
    }

    let inner = differentiate
        .view((1, 1), (n - 1, n - 1))
        .clone_owned()
        .try_inverse()
        .ok_or(NumericsError::Singular {
            what: "integration matrix",
        })?;

    let mut integrate = DMatrix::zeros(n, n);
    integrate.view_mut((1, 1), (n - 1, n - 1)).copy_from(&inner);

    Ok(Operators {
        nodes,
        differentiate,
        integrate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_single_point() {
        assert_eq!(
            chebyshev(1).unwrap_err(),
            NumericsError::TooFewControlPoints { requested: 1 }
        );
    }

    #[test]
    fn two_points_is_linear_collocation() {
        let ops = chebyshev(2).unwrap();
        assert_eq!(ops.nodes.as_slice(), &[0.0, 1.0]);
        assert_eq!(ops.differentiate[(0, 0)], -1.0);
        assert_eq!(ops.differentiate[(0, 1)], 1.0);
        assert_eq!(ops.integrate[(0, 0)], 0.0);
        assert!((ops.integrate[(1, 1)] - 1.0).abs() < 1e-15);
    }

    #[test]
    fn nodes_span_unit_interval() {
        let ops = chebyshev(16).unwrap();
        assert_eq!(ops.nodes[0], 0.0);
        assert!((ops.nodes[15] - 1.0).abs() < 1e-15);
        for j in 1..16 {
            assert!(ops.nodes[j] > ops.nodes[j - 1]);
        }
    }

    #[test]
    fn integration_first_row_is_exactly_zero() {
        let ops = chebyshev(12).unwrap();
        for j in 0..12 {
            assert_eq!(ops.integrate[(0, j)], 0.0);
            assert_eq!(ops.integrate[(j, 0)], 0.0);
        }
    }

    #[test]
    fn constants_have_zero_derivative() {
        let ops = chebyshev(10).unwrap();
        let f = DVector::from_element(10, 3.5);
        let df = &ops.differentiate * &f;
        assert!(df.amax() < 1e-11);
    }
}

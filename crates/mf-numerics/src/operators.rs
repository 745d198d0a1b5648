//! Operator quadruple and its rescaling to physical extents.

use crate::error::{NumericsError, NumericsResult};
use nalgebra::{DMatrix, DVector};

/// Smallest magnitude accepted for a weighted-average rate or an extent.
const MIN_MAGNITUDE: f64 = 1e-12;

/// Node locations with matching differentiation and integration matrices.
///
/// Dimensionless operators live on `[0, 1]`. After [`Operators::rescale`] by an
/// extent `T` they act on `[0, T]`: nodes are multiplied by `T`, `D` is divided
/// by `T` and `I` is multiplied by `T`.
#[derive(Clone, Debug, PartialEq)]
pub struct Operators {
    pub nodes: DVector<f64>,
    pub differentiate: DMatrix<f64>,
    pub integrate: DMatrix<f64>,
}

impl Operators {
    /// Number of control points (rows of every operator).
    pub fn control_points(&self) -> usize {
        self.nodes.len()
    }

    /// Rescale to a physical extent `T > 0`.
    pub fn rescale(&self, extent: f64) -> NumericsResult<Operators> {
        if !extent.is_finite() || extent < MIN_MAGNITUDE {
            return Err(NumericsError::DegenerateOperator {
                what: "extent",
                value: extent,
            });
        }
        Ok(Operators {
            nodes: &self.nodes * extent,
            differentiate: &self.differentiate / extent,
            integrate: &self.integrate * extent,
        })
    }

    /// Estimate the extent of a segment from its total span and a rate profile.
    ///
    /// `T = span / (I[-1, :] . rate)`: the span divided by the weighted average of
    /// the rate over the dimensionless interval. `T` multiplies the very operator
    /// used to compute it, so this is evaluated once on the unscaled operator
    /// rather than solved self-consistently.
    pub fn segment_extent(&self, span: f64, rate: &DVector<f64>) -> NumericsResult<f64> {
        let n = self.control_points();
        if rate.len() != n {
            return Err(NumericsError::LengthMismatch {
                what: "rate profile",
                expected: n,
                actual: rate.len(),
            });
        }

        let average_rate = self.integrate.row(n - 1).transpose().dot(rate);
        if !average_rate.is_finite() || average_rate.abs() < MIN_MAGNITUDE {
            return Err(NumericsError::DegenerateOperator {
                what: "average rate",
                value: average_rate,
            });
        }

        let extent = span / average_rate;
        if !extent.is_finite() || extent < MIN_MAGNITUDE {
            return Err(NumericsError::DegenerateOperator {
                what: "extent",
                value: extent,
            });
        }
        Ok(extent)
    }

    /// Apply `D` to a sampled profile.
    pub fn derivative(&self, f: &DVector<f64>) -> DVector<f64> {
        &self.differentiate * f
    }

    /// Apply `I` to a sampled rate and offset by the initial value.
    ///
    /// Row 0 of `I` is exactly zero, so the first entry equals `initial` exactly.
    pub fn integral(&self, rate: &DVector<f64>, initial: f64) -> DVector<f64> {
        (&self.integrate * rate).add_scalar(initial)
    }
}

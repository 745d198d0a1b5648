//! Float checks shared by the solver and the sizing loops.

use crate::{MfError, MfResult};

/// Pass `value` through, or name it in a [`MfError::NonFinite`].
pub fn finite(value: f64, what: &'static str) -> MfResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(MfError::NonFinite { what, value })
    }
}

/// `|value - target| / |target|`, or `|value|` when the target is zero.
pub fn relative_error(value: f64, target: f64) -> f64 {
    let diff = (value - target).abs();
    if target == 0.0 { diff } else { diff / target.abs() }
}

/// Infinity norm of a residual vector; zero when empty.
///
/// A NaN entry makes the result NaN.
pub fn max_abs(values: &[f64]) -> f64 {
    values.iter().fold(0.0, |acc: f64, v| {
        if v.is_nan() || acc.is_nan() {
            f64::NAN
        } else {
            acc.max(v.abs())
        }
    })
}

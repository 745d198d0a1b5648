//! A single named array inside a typed conditions record.

use crate::error::{StateError, StateResult};
use nalgebra::{DMatrix, DVector};

/// Fixed-column array sampled at control points.
///
/// `expand` allocates zeros; the series only becomes readable once a step has
/// written it through [`Series::write`], [`Series::set`] or [`Series::set_column`].
#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    path: &'static str,
    data: DMatrix<f64>,
    written: bool,
}

impl Series {
    pub fn new(path: &'static str, columns: usize) -> Self {
        Self {
            path,
            data: DMatrix::zeros(0, columns),
            written: false,
        }
    }

    pub fn path(&self) -> &'static str {
        self.path
    }

    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn columns(&self) -> usize {
        self.data.ncols()
    }

    pub fn is_written(&self) -> bool {
        self.written
    }

    /// Allocate `rows` zero rows and mark the series unwritten.
    pub fn expand(&mut self, rows: usize) {
        self.data = DMatrix::zeros(rows, self.columns());
        self.written = false;
    }

    /// Mark the series unwritten, keeping its allocation.
    pub fn invalidate(&mut self) {
        self.written = false;
    }

    pub fn get(&self) -> StateResult<&DMatrix<f64>> {
        if self.written {
            Ok(&self.data)
        } else {
            Err(StateError::MissingField {
                path: self.path.to_string(),
            })
        }
    }

    pub fn column(&self, column: usize) -> StateResult<DVector<f64>> {
        self.check_column(column)?;
        Ok(self.get()?.column(column).clone_owned())
    }

    /// Value at (`row`, `column`).
    pub fn value(&self, row: usize, column: usize) -> StateResult<f64> {
        self.check_column(column)?;
        let data = self.get()?;
        data.get((row, column))
            .copied()
            .ok_or_else(|| StateError::ShapeMismatch {
                path: self.path.to_string(),
                expected: (row + 1, self.columns()),
                actual: data.shape(),
            })
    }

    pub fn first(&self, column: usize) -> StateResult<f64> {
        self.value(0, column)
    }

    pub fn last(&self, column: usize) -> StateResult<f64> {
        let rows = self.rows();
        if rows == 0 {
            return Err(StateError::MissingField {
                path: self.path.to_string(),
            });
        }
        self.value(rows - 1, column)
    }

    /// Mutable access to the whole array; marks the series written.
    pub fn write(&mut self) -> &mut DMatrix<f64> {
        self.written = true;
        &mut self.data
    }

    pub fn set(&mut self, value: DMatrix<f64>) -> StateResult<()> {
        if value.shape() != self.data.shape() {
            return Err(StateError::ShapeMismatch {
                path: self.path.to_string(),
                expected: self.data.shape(),
                actual: value.shape(),
            });
        }
        self.data = value;
        self.written = true;
        Ok(())
    }

    pub fn set_column(&mut self, column: usize, values: &DVector<f64>) -> StateResult<()> {
        self.check_column(column)?;
        if values.len() != self.rows() {
            return Err(StateError::ShapeMismatch {
                path: self.path.to_string(),
                expected: (self.rows(), 1),
                actual: (values.len(), 1),
            });
        }
        self.data.set_column(column, values);
        self.written = true;
        Ok(())
    }

    pub fn fill_column(&mut self, column: usize, value: f64) -> StateResult<()> {
        self.check_column(column)?;
        self.data.column_mut(column).fill(value);
        self.written = true;
        Ok(())
    }

    fn check_column(&self, column: usize) -> StateResult<()> {
        if column >= self.columns() {
            return Err(StateError::ColumnOutOfRange {
                path: self.path.to_string(),
                column,
                columns: self.columns(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwritten_series_is_missing() {
        let mut s = Series::new("freestream.density", 1);
        s.expand(4);
        assert_eq!(
            s.get().unwrap_err(),
            StateError::MissingField {
                path: "freestream.density".to_string()
            }
        );
    }

    #[test]
    fn set_column_marks_written_and_keeps_zeros() {
        let mut s = Series::new("frames.inertial.velocity_vector", 3);
        s.expand(3);
        s.set_column(0, &DVector::from_element(3, 50.0)).unwrap();
        let data = s.get().unwrap();
        assert_eq!(data[(2, 0)], 50.0);
        assert_eq!(data[(2, 2)], 0.0);
        assert_eq!(s.last(0).unwrap(), 50.0);
    }

    #[test]
    fn set_rejects_wrong_shape() {
        let mut s = Series::new("weights.total_mass", 1);
        s.expand(5);
        let err = s.set(DMatrix::zeros(4, 1)).unwrap_err();
        assert!(matches!(err, StateError::ShapeMismatch { .. }));
    }

    #[test]
    fn column_out_of_range() {
        let mut s = Series::new("propulsion.throttle", 1);
        s.expand(2);
        assert!(matches!(
            s.fill_column(1, 0.5),
            Err(StateError::ColumnOutOfRange { column: 1, .. })
        ));
    }

    #[test]
    fn invalidate_keeps_shape_but_hides_values() {
        let mut s = Series::new("freestream.density", 1);
        s.expand(3);
        s.fill_column(0, 1.2).unwrap();
        s.invalidate();
        assert_eq!(s.rows(), 3);
        assert!(matches!(s.last(0), Err(StateError::MissingField { .. })));
    }

    #[test]
    fn expand_resets_written_flag() {
        let mut s = Series::new("freestream.altitude", 1);
        s.expand(2);
        s.fill_column(0, 100.0).unwrap();
        assert!(s.is_written());
        s.expand(2);
        assert!(!s.is_written());
    }
}

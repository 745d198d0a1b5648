//! Ordered named arrays for the `unknowns` and `residuals` regions.

use crate::error::{StateError, StateResult};
use nalgebra::{DMatrix, DVector};

#[derive(Clone, Debug, PartialEq)]
struct Entry {
    name: String,
    initial: Vec<f64>,
    data: DMatrix<f64>,
}

/// Insertion-ordered set of named `(rows, columns)` arrays.
///
/// The solver sees the concatenation of all entries in declaration order, each
/// entry flattened column by column. Unknowns and residuals must be declared in
/// an order that keeps this correspondence stable between iterations.
#[derive(Clone, Debug, PartialEq)]
pub struct VarSet {
    region: &'static str,
    entries: Vec<Entry>,
}

impl VarSet {
    pub fn new(region: &'static str) -> Self {
        Self {
            region,
            entries: Vec::new(),
        }
    }

    pub fn region(&self) -> &'static str {
        self.region
    }

    /// Declare an entry whose every row starts as `initial_row`.
    ///
    /// Re-declaring a name replaces its initial row and keeps its position.
    pub fn declare(&mut self, name: impl Into<String>, initial_row: &[f64]) {
        let name = name.into();
        let rows = self.entries.first().map_or(0, |e| e.data.nrows());
        let data = broadcast(initial_row, rows);
        if let Some(entry) = self.entries.iter_mut().find(|e| e.name == name) {
            entry.initial = initial_row.to_vec();
            entry.data = data;
        } else {
            self.entries.push(Entry {
                name,
                initial: initial_row.to_vec(),
                data,
            });
        }
    }

    /// Allocate `rows` rows for every entry, broadcasting each initial row.
    pub fn expand(&mut self, rows: usize) {
        for entry in &mut self.entries {
            entry.data = broadcast(&entry.initial, rows);
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    /// Total number of scalars across all entries.
    pub fn len(&self) -> usize {
        self.entries.iter().map(|e| e.data.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, name: &str) -> StateResult<&DMatrix<f64>> {
        self.entry(name).map(|e| &e.data)
    }

    pub fn get_mut(&mut self, name: &str) -> StateResult<&mut DMatrix<f64>> {
        let path = self.path(name);
        self.entries
            .iter_mut()
            .find(|e| e.name == name)
            .map(|e| &mut e.data)
            .ok_or(StateError::MissingField { path })
    }

    pub fn column(&self, name: &str, column: usize) -> StateResult<DVector<f64>> {
        let data = self.get(name)?;
        if column >= data.ncols() {
            return Err(StateError::ColumnOutOfRange {
                path: self.path(name),
                column,
                columns: data.ncols(),
            });
        }
        Ok(data.column(column).clone_owned())
    }

    pub fn set(&mut self, name: &str, value: DMatrix<f64>) -> StateResult<()> {
        let path = self.path(name);
        let data = self.get_mut(name)?;
        if data.shape() != value.shape() {
            return Err(StateError::ShapeMismatch {
                path,
                expected: data.shape(),
                actual: value.shape(),
            });
        }
        *data = value;
        Ok(())
    }

    pub fn set_column(&mut self, name: &str, column: usize, values: &DVector<f64>) -> StateResult<()> {
        let path = self.path(name);
        let data = self.get_mut(name)?;
        if column >= data.ncols() {
            return Err(StateError::ColumnOutOfRange {
                path,
                column,
                columns: data.ncols(),
            });
        }
        if values.len() != data.nrows() {
            return Err(StateError::ShapeMismatch {
                path,
                expected: (data.nrows(), 1),
                actual: (values.len(), 1),
            });
        }
        data.set_column(column, values);
        Ok(())
    }

    /// Concatenate all entries in declaration order.
    pub fn flatten(&self) -> DVector<f64> {
        DVector::from_iterator(
            self.len(),
            self.entries
                .iter()
                .flat_map(|e| e.data.as_slice().iter().copied()),
        )
    }

    /// Inverse of [`VarSet::flatten`]; the length must match exactly.
    pub fn unflatten(&mut self, x: &DVector<f64>) -> StateResult<()> {
        let expected = self.len();
        if x.len() != expected {
            return Err(StateError::FlatLength {
                region: self.region,
                expected,
                actual: x.len(),
            });
        }
        let mut offset = 0;
        for entry in &mut self.entries {
            let n = entry.data.len();
            entry
                .data
                .as_mut_slice()
                .copy_from_slice(&x.as_slice()[offset..offset + n]);
            offset += n;
        }
        Ok(())
    }

    fn entry(&self, name: &str) -> StateResult<&Entry> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .ok_or_else(|| StateError::MissingField {
                path: self.path(name),
            })
    }

    fn path(&self, name: &str) -> String {
        format!("{}.{}", self.region, name)
    }
}

fn broadcast(row: &[f64], rows: usize) -> DMatrix<f64> {
    DMatrix::from_fn(rows, row.len(), |_, j| row[j])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unknowns() -> VarSet {
        let mut u = VarSet::new("unknowns");
        u.declare("throttle", &[0.5]);
        u.declare("body_angle", &[0.05]);
        u.expand(3);
        u
    }

    #[test]
    fn expand_broadcasts_initial_rows() {
        let u = unknowns();
        assert_eq!(u.len(), 6);
        assert_eq!(u.get("throttle").unwrap()[(2, 0)], 0.5);
        assert_eq!(u.get("body_angle").unwrap()[(0, 0)], 0.05);
    }

    #[test]
    fn flatten_follows_declaration_order() {
        let u = unknowns();
        let x = u.flatten();
        assert_eq!(x.as_slice(), &[0.5, 0.5, 0.5, 0.05, 0.05, 0.05]);
    }

    #[test]
    fn unflatten_round_trips_and_checks_length() {
        let mut u = unknowns();
        let x = DVector::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        u.unflatten(&x).unwrap();
        assert_eq!(u.get("body_angle").unwrap()[(1, 0)], 5.0);
        assert_eq!(u.flatten(), x);

        let short = DVector::from_vec(vec![1.0]);
        assert_eq!(
            u.unflatten(&short).unwrap_err(),
            StateError::FlatLength {
                region: "unknowns",
                expected: 6,
                actual: 1
            }
        );
    }

    #[test]
    fn multi_column_entries_flatten_column_major() {
        let mut r = VarSet::new("residuals");
        r.declare("forces", &[0.0, 0.0]);
        r.expand(2);
        r.set(
            "forces",
            DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 4.0]),
        )
        .unwrap();
        assert_eq!(r.flatten().as_slice(), &[1.0, 3.0, 2.0, 4.0]);
    }

    #[test]
    fn redeclare_keeps_position() {
        let mut u = unknowns();
        u.declare("throttle", &[0.8]);
        u.expand(2);
        let names: Vec<_> = u.names().collect();
        assert_eq!(names, ["throttle", "body_angle"]);
        assert_eq!(u.get("throttle").unwrap()[(1, 0)], 0.8);
    }

    #[test]
    fn unknown_name_is_missing_field() {
        let u = unknowns();
        assert_eq!(
            u.get("distance").unwrap_err(),
            StateError::MissingField {
                path: "unknowns.distance".to_string()
            }
        );
    }
}

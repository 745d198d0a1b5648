//! Declared unknowns and residuals of a segment.

use mf_state::State;

/// Ordered declarations used to build a fresh [`State`] per evaluation.
///
/// Unknowns and residuals are flattened in the order declared here.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Layout {
    unknowns: Vec<(String, Vec<f64>)>,
    residuals: Vec<(String, usize)>,
}

impl Layout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an unknown with its initial guess row.
    pub fn unknown(mut self, name: impl Into<String>, initial_row: &[f64]) -> Self {
        self.set_unknown(name, initial_row);
        self
    }

    /// Declare a residual with `columns` columns.
    pub fn residual(mut self, name: impl Into<String>, columns: usize) -> Self {
        let name = name.into();
        match self.residuals.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = columns,
            None => self.residuals.push((name, columns)),
        }
        self
    }

    /// Replace (or add) the initial guess of an unknown; position is kept.
    pub fn set_unknown(&mut self, name: impl Into<String>, initial_row: &[f64]) {
        let name = name.into();
        match self.unknowns.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = initial_row.to_vec(),
            None => self.unknowns.push((name, initial_row.to_vec())),
        }
    }

    pub fn unknown_names(&self) -> impl Iterator<Item = &str> {
        self.unknowns.iter().map(|(n, _)| n.as_str())
    }

    pub fn residual_names(&self) -> impl Iterator<Item = &str> {
        self.residuals.iter().map(|(n, _)| n.as_str())
    }

    /// Scalar count per control point, for unknowns and residuals.
    pub fn widths(&self) -> (usize, usize) {
        (
            self.unknowns.iter().map(|(_, r)| r.len()).sum(),
            self.residuals.iter().map(|(_, c)| *c).sum(),
        )
    }

    /// A fresh state with every region expanded to `control_points` rows.
    pub fn state(&self, control_points: usize) -> State {
        let mut state = State::new(control_points);
        for (name, row) in &self.unknowns {
            state.unknowns.declare(name.clone(), row);
        }
        for (name, columns) in &self.residuals {
            state.residuals.declare(name.clone(), &vec![0.0; *columns]);
        }
        state.expand();
        state
    }
}

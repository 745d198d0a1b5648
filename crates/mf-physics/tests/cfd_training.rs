use mf_physics::{
    Aerodynamics, CfdCase, CfdCollaborator, CoefficientSample, ExternalProcessAerodynamics,
    ExternalProcessError, PhysicsError, TrainingGrid,
};
use mf_state::Conditions;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Linear lift curve; fails every case above Mach 0.8.
#[derive(Debug, Default)]
struct FakeSolver {
    calls: AtomicUsize,
}

impl CfdCollaborator for FakeSolver {
    fn run_case(&self, case: &CfdCase) -> Result<CoefficientSample, ExternalProcessError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if case.mach > 0.8 {
            return Err(ExternalProcessError::ExitStatus {
                program: "fake".to_string(),
                code: Some(3),
            });
        }
        Ok(CoefficientSample {
            lift: 0.1 + 5.0 * case.angle_of_attack,
            drag: 0.01 + 0.01 * case.mach,
            moment: -0.02,
        })
    }
}

fn grid() -> TrainingGrid {
    TrainingGrid {
        angle_of_attack: vec![0.0, 0.1],
        mach: vec![0.3, 0.6, 0.9],
    }
}

fn adapter(solver: Arc<FakeSolver>, cache: Option<PathBuf>) -> ExternalProcessAerodynamics {
    let mut aero = ExternalProcessAerodynamics::new("glider", solver);
    aero.grid = grid();
    aero.cache_dir = cache;
    aero
}

fn conditions(alpha: f64, mach: f64) -> Conditions {
    let mut c = Conditions::default();
    c.expand(1);
    c.aerodynamics.angle_of_attack.fill_column(0, alpha).unwrap();
    c.freestream.mach_number.fill_column(0, mach).unwrap();
    c
}

#[test]
fn failed_cases_degrade_to_placeholder() {
    let solver = Arc::new(FakeSolver::default());
    let aero = adapter(solver.clone(), None);
    let table = aero.train().unwrap();

    assert_eq!(solver.calls.load(Ordering::SeqCst), 6);
    // Row-major over (alpha, mach); Mach 0.9 is the last column.
    assert_eq!(table.samples[2], aero.placeholder);
    assert_eq!(table.samples[5], aero.placeholder);
    assert!((table.samples[4].lift - 0.6).abs() < 1e-12);
}

#[test]
fn evaluate_before_initialize_is_an_error() {
    let aero = adapter(Arc::new(FakeSolver::default()), None);
    let err = aero.evaluate(&conditions(0.05, 0.4)).unwrap_err();
    assert!(matches!(err, PhysicsError::NotInitialized { .. }));
}

#[test]
fn initialize_trains_once() {
    let solver = Arc::new(FakeSolver::default());
    let aero = adapter(solver.clone(), None);
    aero.initialize().unwrap();
    aero.initialize().unwrap();
    assert_eq!(solver.calls.load(Ordering::SeqCst), 6);

    let out = aero.evaluate(&conditions(0.05, 0.45)).unwrap();
    assert!((out.lift[0] - 0.35).abs() < 1e-12);
    assert!((out.drag[0] - 0.0145).abs() < 1e-12);
}

#[test]
fn cached_table_is_reused() {
    let dir = tempfile::tempdir().unwrap();

    let first = Arc::new(FakeSolver::default());
    adapter(first.clone(), Some(dir.path().to_path_buf()))
        .initialize()
        .unwrap();
    assert_eq!(first.calls.load(Ordering::SeqCst), 6);

    let second = Arc::new(FakeSolver::default());
    let aero = adapter(second.clone(), Some(dir.path().to_path_buf()));
    aero.initialize().unwrap();
    assert_eq!(second.calls.load(Ordering::SeqCst), 0);

    // A different grid is a different cache entry.
    let third = Arc::new(FakeSolver::default());
    let mut other = adapter(third.clone(), Some(dir.path().to_path_buf()));
    other.grid.mach = vec![0.3, 0.6];
    assert_ne!(other.cache_key(), aero.cache_key());
    other.initialize().unwrap();
    assert_eq!(third.calls.load(Ordering::SeqCst), 4);
}

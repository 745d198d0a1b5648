//! mf-mission: segments and missions solved with pseudospectral collocation.
//!
//! A [`Segment`] owns a process with four phases (`initialize`, `converge`,
//! `iterate`, `finalize`). `converge` runs a Newton solver whose residual
//! function is one pass of `iterate`. A [`Mission`] evaluates segments in
//! order, seeding each one from the previous segment's final conditions.
//!
//! ```no_run
//! use mf_core::{deg, m, mps};
//! use mf_mission::{Analyses, ClimbConstantSpeedConstantAngle, Mission};
//! use mf_physics::Vehicle;
//!
//! let analyses = Analyses::base(Vehicle::default());
//! let climb = ClimbConstantSpeedConstantAngle {
//!     air_speed: mps(60.0),
//!     climb_angle: deg(3.0),
//!     altitude_start: Some(m(0.0)),
//!     altitude_end: m(1000.0),
//! }
//! .segment("climb", analyses);
//!
//! let mut mission = Mission::new("demo");
//! mission.push(climb)?;
//! let results = mission.evaluate()?;
//! assert!(results.all_converged());
//! # Ok::<(), mf_mission::MissionError>(())
//! ```

pub mod analyses;
pub mod error;
pub mod layout;
pub mod mission;
pub mod performance;
pub mod segment;
pub mod segments;
pub mod steps;
pub mod sweep;

pub use analyses::Analyses;
pub use error::{MissionError, MissionResult};
pub use layout::Layout;
pub use mission::{Mission, MissionResults, NonConvergencePolicy, SegmentResult};
pub use performance::{
    AccelSizing, RangeSizing, size_accel_for_aoa, size_accel_for_cl, size_range_for_fuel,
};
pub use segment::{
    DEFAULT_CONTROL_POINTS, Segment, SegmentProcess, SolveReport, root_process, standard_finalize,
    standard_initialize,
};
pub use segments::{
    ClimbConstantSpeedConstantAngle, ClimbConstantStagnationPressureConstantAngle,
    CruiseConstantSpeedConstantAltitude, CruiseVaryDistance, DescentConstantSpeedConstantAngle,
    Profile, SINGLE_POINT_CONTROL_POINTS, SINGLE_POINT_DURATION, SinglePointSetSpeedSetAltitude,
};
pub use sweep::evaluate_sweep;

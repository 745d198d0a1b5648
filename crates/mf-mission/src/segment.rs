//! A mission segment: parameters, process and state.

use crate::analyses::Analyses;
use crate::error::{MissionError, MissionResult};
use crate::layout::Layout;
use crate::segments::Profile;
use crate::steps;
use mf_physics::MassBreakdown;
use mf_process::Process;
use mf_solver::{NewtonConfig, SolveStatus};
use mf_state::{Conditions, State};
use std::sync::Arc;

/// Root process type of every segment.
pub type SegmentProcess = Process<Segment, MissionError>;

/// Default number of control points per segment.
pub const DEFAULT_CONTROL_POINTS: usize = 16;

/// Outcome of one segment's converge phase.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolveReport {
    pub status: SolveStatus,
    pub iterations: usize,
    pub evaluations: usize,
    pub residual_max: f64,
}

/// One flight phase solved as a nonlinear boundary value problem.
///
/// Lifecycle: build with defaults, override parameters (`profile`, `layout`,
/// `solver`, `control_points`), then [`Segment::evaluate`]. Each evaluation
/// starts from a fresh [`State`] and rebuilt operators.
#[derive(Clone, Debug)]
pub struct Segment {
    pub tag: String,
    pub profile: Profile,
    pub analyses: Analyses,
    pub solver: NewtonConfig,
    pub control_points: usize,
    pub layout: Layout,
    pub state: State,
    process: Arc<SegmentProcess>,
    mass: Option<MassBreakdown>,
    report: Option<SolveReport>,
}

impl Segment {
    pub fn new(
        tag: impl Into<String>,
        profile: Profile,
        analyses: Analyses,
        layout: Layout,
        process: SegmentProcess,
    ) -> Self {
        Self {
            tag: tag.into(),
            profile,
            analyses,
            solver: NewtonConfig::default(),
            control_points: DEFAULT_CONTROL_POINTS,
            state: layout.state(DEFAULT_CONTROL_POINTS),
            layout,
            process: Arc::new(process),
            mass: None,
            report: None,
        }
    }

    /// A segment whose iterate phase is supplied by the caller.
    ///
    /// Initialize and converge are the standard phases; finalize is empty.
    pub fn custom(
        tag: impl Into<String>,
        analyses: Analyses,
        layout: Layout,
        iterate: SegmentProcess,
    ) -> Self {
        let process = root_process(standard_initialize(Process::new()), iterate, Process::new());
        Self::new(tag, Profile::Custom, analyses, layout, process)
    }

    pub fn process(&self) -> &SegmentProcess {
        &self.process
    }

    /// Shared handle, so a step can run a phase on this segment.
    pub(crate) fn process_handle(&self) -> Arc<SegmentProcess> {
        Arc::clone(&self.process)
    }

    /// Report of the last evaluation, if any.
    pub fn report(&self) -> Option<&SolveReport> {
        self.report.as_ref()
    }

    /// Mass breakdown computed in the last initialize phase.
    pub fn mass(&self) -> MissionResult<&MassBreakdown> {
        self.mass.as_ref().ok_or(MissionError::Invariant {
            what: "mass breakdown read before initialize",
        })
    }

    pub(crate) fn set_mass(&mut self, mass: MassBreakdown) {
        self.mass = Some(mass);
    }

    pub(crate) fn set_report(&mut self, report: SolveReport) {
        self.report = Some(report);
    }

    /// Run the root process on a fresh state.
    ///
    /// `initials` are the previous segment's final conditions; the first
    /// row of this segment is seeded from their last row.
    pub fn evaluate(&mut self, initials: Option<&Conditions>) -> MissionResult<SolveReport> {
        if self.control_points < 2 {
            return Err(MissionError::profile(&self.tag, "needs at least two control points"));
        }
        self.state = self.layout.state(self.control_points);
        self.state.initials = initials.cloned();
        self.mass = None;
        self.report = None;

        let process = Arc::clone(&self.process);
        match process.run(self) {
            Ok(()) => {}
            // A solve that failed on infeasible unknowns cannot be replayed;
            // its report still reaches the mission policy.
            Err(e)
                if e.is_outside_domain()
                    && self.report.is_some_and(|r| !r.status.is_converged()) =>
            {
                tracing::warn!(
                    segment = %self.tag,
                    error = %e,
                    "failed segment left partially evaluated"
                );
            }
            Err(e) => return Err(e),
        }

        self.report.ok_or(MissionError::Invariant {
            what: "segment process has no converge step",
        })
    }
}

/// Initialize phase shared by every segment kind.
///
/// Builds operators, evaluates weights and initializes the aerodynamics adapter,
/// then runs the segment-specific `extra` steps.
pub fn standard_initialize(extra: SegmentProcess) -> SegmentProcess {
    Process::new()
        .step("expand_numerics", steps::numerics::initialize_operators)
        .step("weights", steps::weights::initialize_mass)
        .step("aerodynamics", steps::aerodynamics::initialize_aerodynamics)
        .sub("segment", extra)
}

/// Finalize phase: integrate the horizontal inertial position.
pub fn standard_finalize() -> SegmentProcess {
    Process::new().step(
        "inertial_position",
        steps::frames::integrate_inertial_horizontal_position,
    )
}

/// Root process with the four phases in their fixed order.
///
/// `converge` runs the solver over `iterate`; `iterate` then runs once more on
/// the solved unknowns before `finalize`. Each iterate pass starts by hiding
/// the conditions of the previous pass.
pub fn root_process(
    initialize: SegmentProcess,
    iterate: SegmentProcess,
    finalize: SegmentProcess,
) -> SegmentProcess {
    let iterate = Process::new()
        .step("begin_pass", steps::numerics::begin_pass)
        .sub("segment", iterate);
    Process::new()
        .sub("initialize", initialize)
        .sub(
            "converge",
            Process::new().step("converge_root", steps::converge::converge_root),
        )
        .sub("iterate", iterate)
        .sub("finalize", finalize)
}

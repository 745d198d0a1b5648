//! Ordered segments evaluated with state continuity.

use crate::error::{MissionError, MissionResult};
use crate::segment::{Segment, SolveReport};
use mf_solver::SolveStatus;
use mf_state::{Conditions, State};

/// What to do when a segment's solver gives up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NonConvergencePolicy {
    /// Stop and return [`MissionError::NonConvergence`].
    #[default]
    Abort,
    /// Record the failure and go on with the next segment.
    Continue,
}

/// A flight profile: segments run in insertion order.
///
/// Each segment after the first is seeded from the previous segment's final
/// conditions, so time, position and mass are continuous.
#[derive(Clone, Debug)]
pub struct Mission {
    pub tag: String,
    pub policy: NonConvergencePolicy,
    segments: Vec<Segment>,
}

impl Mission {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            policy: NonConvergencePolicy::default(),
            segments: Vec::new(),
        }
    }

    pub fn with_policy(mut self, policy: NonConvergencePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Append a segment; tags are unique within a mission.
    pub fn push(&mut self, segment: Segment) -> MissionResult<()> {
        if self.segments.iter().any(|s| s.tag == segment.tag) {
            return Err(MissionError::DuplicateSegment { tag: segment.tag });
        }
        self.segments.push(segment);
        Ok(())
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn segment(&self, tag: &str) -> MissionResult<&Segment> {
        self.segments
            .iter()
            .find(|s| s.tag == tag)
            .ok_or_else(|| MissionError::UnknownSegment { tag: tag.to_string() })
    }

    pub fn segment_mut(&mut self, tag: &str) -> MissionResult<&mut Segment> {
        self.segments
            .iter_mut()
            .find(|s| s.tag == tag)
            .ok_or_else(|| MissionError::UnknownSegment { tag: tag.to_string() })
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Evaluate every segment in order.
    pub fn evaluate(&mut self) -> MissionResult<MissionResults> {
        let policy = self.policy;
        let mut results = Vec::with_capacity(self.segments.len());
        let mut initials: Option<Conditions> = None;

        for segment in &mut self.segments {
            tracing::debug!(segment = %segment.tag, kind = segment.profile.kind(), "evaluate segment");
            let report = segment.evaluate(initials.as_ref())?;

            if let SolveStatus::Failed(cause) = report.status {
                tracing::warn!(
                    segment = %segment.tag,
                    %cause,
                    residual_max = report.residual_max,
                    "segment did not converge"
                );
                if policy == NonConvergencePolicy::Abort {
                    return Err(MissionError::NonConvergence {
                        segment: segment.tag.clone(),
                        cause,
                    });
                }
            }

            initials = Some(segment.state.conditions.clone());
            results.push(SegmentResult {
                tag: segment.tag.clone(),
                kind: segment.profile.kind(),
                state: segment.state.clone(),
                report,
            });
        }

        Ok(MissionResults {
            tag: self.tag.clone(),
            segments: results,
        })
    }
}

/// Final state and solver report of one segment.
#[derive(Clone, Debug)]
pub struct SegmentResult {
    pub tag: String,
    pub kind: &'static str,
    pub state: State,
    pub report: SolveReport,
}

impl SegmentResult {
    pub fn converged(&self) -> bool {
        self.report.status.is_converged()
    }

    pub fn conditions(&self) -> &Conditions {
        &self.state.conditions
    }

    pub fn final_time(&self) -> MissionResult<f64> {
        Ok(self.conditions().frames.inertial.time.last(0)?)
    }

    pub fn final_altitude(&self) -> MissionResult<f64> {
        Ok(-self.conditions().frames.inertial.position_vector.last(2)?)
    }

    /// Horizontal inertial position at the end of the segment [m].
    pub fn final_distance(&self) -> MissionResult<f64> {
        Ok(self.conditions().frames.inertial.position_vector.last(0)?)
    }

    pub fn final_mass(&self) -> MissionResult<f64> {
        Ok(self.conditions().weights.total_mass.last(0)?)
    }

    /// Horizontal distance covered within this segment [m].
    pub fn distance_flown(&self) -> MissionResult<f64> {
        let x = &self.conditions().frames.inertial.position_vector;
        Ok(x.last(0)? - x.first(0)?)
    }

    pub fn fuel_burned(&self) -> MissionResult<f64> {
        let m = &self.conditions().weights.total_mass;
        Ok(m.first(0)? - m.last(0)?)
    }
}

/// Per-segment results in mission order.
#[derive(Clone, Debug)]
pub struct MissionResults {
    pub tag: String,
    pub segments: Vec<SegmentResult>,
}

impl MissionResults {
    pub fn get(&self, tag: &str) -> MissionResult<&SegmentResult> {
        self.segments
            .iter()
            .find(|s| s.tag == tag)
            .ok_or_else(|| MissionError::UnknownSegment { tag: tag.to_string() })
    }

    pub fn iter(&self) -> impl Iterator<Item = &SegmentResult> {
        self.segments.iter()
    }

    /// True only if every segment converged.
    pub fn all_converged(&self) -> bool {
        self.segments.iter().all(SegmentResult::converged)
    }

    pub fn failed(&self) -> impl Iterator<Item = &SegmentResult> {
        self.segments.iter().filter(|s| !s.converged())
    }

    /// Mass at the start of the first segment minus mass at the end of the last.
    pub fn fuel_burned(&self) -> MissionResult<f64> {
        match (self.segments.first(), self.segments.last()) {
            (Some(first), Some(last)) => Ok(first.conditions().weights.total_mass.first(0)?
                - last.final_mass()?),
            _ => Ok(0.0),
        }
    }
}

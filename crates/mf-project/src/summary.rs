//! Serializable mission result summaries.

use crate::ProjectResult;
use mf_mission::{MissionResults, SegmentResult};
use mf_solver::SolveStatus;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SegmentSummary {
    pub tag: String,
    pub kind: String,
    pub status: String,
    pub iterations: usize,
    pub evaluations: usize,
    pub residual_max: f64,
    pub final_time_s: f64,
    pub final_altitude_m: f64,
    pub final_distance_m: f64,
    pub final_mass_kg: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MissionSummary {
    pub project: String,
    pub mission: String,
    pub all_converged: bool,
    pub fuel_burned_kg: f64,
    pub segments: Vec<SegmentSummary>,
}

fn status_label(status: &SolveStatus) -> String {
    match status {
        SolveStatus::Converged => "converged".to_string(),
        SolveStatus::Failed(cause) => format!("failed: {cause}"),
        SolveStatus::Unsolved => "unsolved".to_string(),
        SolveStatus::Iterating => "iterating".to_string(),
    }
}

fn summarize_segment(result: &SegmentResult) -> ProjectResult<SegmentSummary> {
    Ok(SegmentSummary {
        tag: result.tag.clone(),
        kind: result.kind.to_string(),
        status: status_label(&result.report.status),
        iterations: result.report.iterations,
        evaluations: result.report.evaluations,
        residual_max: result.report.residual_max,
        final_time_s: result.final_time()?,
        final_altitude_m: result.final_altitude()?,
        final_distance_m: result.final_distance()?,
        final_mass_kg: result.final_mass()?,
    })
}

pub fn summarize(project_name: &str, results: &MissionResults) -> ProjectResult<MissionSummary> {
    Ok(MissionSummary {
        project: project_name.to_string(),
        mission: results.tag.clone(),
        all_converged: results.all_converged(),
        fuel_burned_kg: results.fuel_burned()?,
        segments: results
            .iter()
            .map(summarize_segment)
            .collect::<ProjectResult<Vec<_>>>()?,
    })
}

pub fn save_summary_json(path: &Path, summary: &MissionSummary) -> ProjectResult<()> {
    let content = serde_json::to_string_pretty(summary)?;
    std::fs::write(path, content)?;
    Ok(())
}

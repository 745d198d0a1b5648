//! mf-project: project file format, validation and compilation.
//!
//! A project names a vehicle, its analyses, solver settings and a mission.
//! Loaders validate before returning; [`build_mission`] turns a validated
//! project into an evaluable [`mf_mission::Mission`].

pub mod compile;
pub mod schema;
pub mod summary;
pub mod validate;

pub use compile::{build_analyses, build_mission, build_solver, build_vehicle};
pub use schema::*;
pub use summary::{MissionSummary, SegmentSummary, save_summary_json, summarize};
pub use validate::{LATEST_VERSION, ValidationError, validate_project};

use std::fs;
use std::path::Path;

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Physics error: {0}")]
    Physics(#[from] mf_physics::PhysicsError),

    #[error("Mission error: {0}")]
    Mission(#[from] mf_mission::MissionError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// On-disk encoding of a project file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Json,
}

impl Format {
    /// `.json` is JSON; anything else is treated as YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Format::Json,
            _ => Format::Yaml,
        }
    }

    pub fn parse(self, text: &str) -> ProjectResult<Project> {
        let project: Project = match self {
            Format::Yaml => serde_yaml::from_str(text)?,
            Format::Json => serde_json::from_str(text)?,
        };
        validate_project(&project)?;
        Ok(project)
    }

    pub fn render(self, project: &Project) -> ProjectResult<String> {
        validate_project(project)?;
        Ok(match self {
            Format::Yaml => serde_yaml::to_string(project)?,
            Format::Json => serde_json::to_string_pretty(project)?,
        })
    }
}

fn read(path: &Path, format: Format) -> ProjectResult<Project> {
    let project = format.parse(&fs::read_to_string(path)?)?;
    tracing::debug!(path = %path.display(), name = %project.name, "project loaded");
    Ok(project)
}

fn write(path: &Path, project: &Project, format: Format) -> ProjectResult<()> {
    fs::write(path, format.render(project)?)?;
    Ok(())
}

pub fn load_yaml(path: &Path) -> ProjectResult<Project> {
    read(path, Format::Yaml)
}

pub fn load_json(path: &Path) -> ProjectResult<Project> {
    read(path, Format::Json)
}

pub fn save_yaml(path: &Path, project: &Project) -> ProjectResult<()> {
    write(path, project, Format::Yaml)
}

pub fn save_json(path: &Path, project: &Project) -> ProjectResult<()> {
    write(path, project, Format::Json)
}

/// Load by extension.
pub fn load(path: &Path) -> ProjectResult<Project> {
    read(path, Format::from_path(path))
}

//! CFD-backed aerodynamics.
//!
//! An external solver is run over a grid of (angle of attack, Mach) cases at
//! initialize time only. The resulting table is cached on disk, keyed by a
//! content hash of the geometry tag, grid and placeholder coefficients, and a
//! bilinear [`SurrogateAerodynamics`] built from it serves every evaluation.

use crate::aerodynamics::{AeroCoefficients, Aerodynamics};
use crate::error::{ExternalProcessError, PhysicsError, PhysicsResult};
use crate::surrogate::{CoefficientSample, SurrogateAerodynamics, TrainingTable};
use mf_state::Conditions;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{Arc, OnceLock};

/// One CFD run.
#[derive(Clone, Debug, PartialEq)]
pub struct CfdCase {
    /// Unique per case; names the config and history files.
    pub tag: String,
    /// [rad]
    pub angle_of_attack: f64,
    pub mach: f64,
}

/// Result of one training case after the adapter boundary.
#[derive(Clone, Debug, PartialEq)]
pub enum CaseOutcome {
    Solved(CoefficientSample),
    Failed { reason: String },
}

/// External solver producing coefficients for a single case.
pub trait CfdCollaborator: fmt::Debug + Send + Sync {
    fn run_case(&self, case: &CfdCase) -> Result<CoefficientSample, ExternalProcessError>;
}

/// Runs SU2 on a per-case config rendered from a template.
///
/// The template may use `{TAG}`, `{MACH}` and `{AOA}` (degrees). Coefficients
/// are read from the last line of `<tag>_history.csv` in the working directory:
/// columns 1, 2 and 5 are lift, drag and pitching moment.
#[derive(Clone, Debug, PartialEq)]
pub struct Su2Runner {
    pub executable: PathBuf,
    pub working_dir: PathBuf,
    pub config_template: String,
    /// Above one, the executable is launched through `mpirun`.
    pub processors: usize,
}

impl Su2Runner {
    pub fn new(executable: impl Into<PathBuf>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            working_dir: working_dir.into(),
            config_template: String::new(),
            processors: 1,
        }
    }

    fn render_config(&self, case: &CfdCase) -> String {
        self.config_template
            .replace("{TAG}", &case.tag)
            .replace("{MACH}", &format!("{}", case.mach))
            .replace("{AOA}", &format!("{}", case.angle_of_attack.to_degrees()))
    }

    fn command(&self, config: &Path) -> Command {
        if self.processors > 1 {
            let mut cmd = Command::new("mpirun");
            cmd.arg("-n")
                .arg(self.processors.to_string())
                .arg(&self.executable);
            cmd.arg(config);
            cmd
        } else {
            let mut cmd = Command::new(&self.executable);
            cmd.arg(config);
            cmd
        }
    }
}

/// Parse the final row of an SU2 history file.
pub fn parse_history(path: &Path, contents: &str) -> Result<CoefficientSample, ExternalProcessError> {
    let malformed = |what: String| ExternalProcessError::Malformed {
        path: path.to_path_buf(),
        what,
    };
    let last = contents
        .lines()
        .rev()
        .find(|l| !l.trim().is_empty())
        .ok_or_else(|| malformed("empty history".to_string()))?;
    let fields: Vec<&str> = last.split(',').map(|f| f.trim().trim_matches('"')).collect();

    let column = |i: usize| -> Result<f64, ExternalProcessError> {
        let raw = fields
            .get(i)
            .ok_or_else(|| malformed(format!("missing column {i}")))?;
        let value: f64 = raw
            .parse()
            .map_err(|_| malformed(format!("column {i} is not a number: '{raw}'")))?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(malformed(format!("column {i} is not finite")))
        }
    };

    Ok(CoefficientSample {
        lift: column(1)?,
        drag: column(2)?,
        moment: column(5)?,
    })
}

impl CfdCollaborator for Su2Runner {
    fn run_case(&self, case: &CfdCase) -> Result<CoefficientSample, ExternalProcessError> {
        let config = self.working_dir.join(format!("{}.cfg", case.tag));
        fs::write(&config, self.render_config(case)).map_err(|source| {
            ExternalProcessError::Output {
                path: config.clone(),
                source,
            }
        })?;

        let program = self.executable.display().to_string();
        let status = self
            .command(&config)
            .current_dir(&self.working_dir)
            .status()
            .map_err(|source| ExternalProcessError::Spawn {
                program: program.clone(),
                source,
            })?;
        if !status.success() {
            return Err(ExternalProcessError::ExitStatus {
                program,
                code: status.code(),
            });
        }

        let history = self.working_dir.join(format!("{}_history.csv", case.tag));
        let contents = fs::read_to_string(&history).map_err(|source| {
            ExternalProcessError::Output {
                path: history.clone(),
                source,
            }
        })?;
        parse_history(&history, &contents)
    }
}

/// Training grid for the CFD sweep.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainingGrid {
    /// [rad]
    pub angle_of_attack: Vec<f64>,
    pub mach: Vec<f64>,
}

impl Default for TrainingGrid {
    fn default() -> Self {
        Self {
            angle_of_attack: vec![-2f64.to_radians(), 3f64.to_radians(), 8f64.to_radians()],
            mach: vec![0.3, 0.7, 0.85],
        }
    }
}

/// On-disk cache record.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct CachedTable {
    key: String,
    created_at: String,
    failed_cases: usize,
    table: TrainingTable,
}

/// Aerodynamics trained from an external CFD collaborator.
pub struct ExternalProcessAerodynamics {
    pub geometry_tag: String,
    pub grid: TrainingGrid,
    /// Drag added on top of the inviscid CFD result [-]
    pub parasite_drag: f64,
    /// Stands in for failed cases: no lift, high drag.
    pub placeholder: CoefficientSample,
    /// Directory for `<tag>-<hash>.json` cache files; `None` disables caching.
    pub cache_dir: Option<PathBuf>,
    collaborator: Arc<dyn CfdCollaborator>,
    surrogate: OnceLock<SurrogateAerodynamics>,
}

impl fmt::Debug for ExternalProcessAerodynamics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExternalProcessAerodynamics")
            .field("geometry_tag", &self.geometry_tag)
            .field("grid", &self.grid)
            .field("collaborator", &self.collaborator)
            .field("trained", &self.surrogate.get().is_some())
            .finish_non_exhaustive()
    }
}

impl ExternalProcessAerodynamics {
    pub fn new(geometry_tag: impl Into<String>, collaborator: Arc<dyn CfdCollaborator>) -> Self {
        Self {
            geometry_tag: geometry_tag.into(),
            grid: TrainingGrid::default(),
            parasite_drag: 0.0,
            placeholder: CoefficientSample {
                lift: 0.0,
                drag: 1.0,
                moment: 0.0,
            },
            cache_dir: None,
            collaborator,
            surrogate: OnceLock::new(),
        }
    }

    /// Content hash identifying a training table.
    pub fn cache_key(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.geometry_tag.as_bytes());
        hasher.update(serde_json::to_string(&self.grid).unwrap_or_default().as_bytes());
        hasher.update(
            serde_json::to_string(&self.placeholder)
                .unwrap_or_default()
                .as_bytes(),
        );
        format!("{:x}", hasher.finalize())
    }

    fn cache_path(&self, key: &str) -> Option<PathBuf> {
        self.cache_dir
            .as_ref()
            .map(|dir| dir.join(format!("{}-{}.json", self.geometry_tag, &key[..16])))
    }

    /// Run every training case, mapping collaborator failures to [`CaseOutcome::Failed`].
    pub fn sample_training(&self) -> Vec<CaseOutcome> {
        let mut outcomes = Vec::with_capacity(self.grid.angle_of_attack.len() * self.grid.mach.len());
        for (i, &angle_of_attack) in self.grid.angle_of_attack.iter().enumerate() {
            for (j, &mach) in self.grid.mach.iter().enumerate() {
                let case = CfdCase {
                    tag: format!("{}_{i}_{j}", self.geometry_tag),
                    angle_of_attack,
                    mach,
                };
                let outcome = match self.collaborator.run_case(&case) {
                    Ok(sample) => CaseOutcome::Solved(sample),
                    Err(e) => {
                        tracing::warn!(case = %case.tag, error = %e, "CFD case failed, using placeholder");
                        CaseOutcome::Failed {
                            reason: e.to_string(),
                        }
                    }
                };
                outcomes.push(outcome);
            }
        }
        outcomes
    }

    /// Load the cached table or run the training sweep, then cache it.
    pub fn train(&self) -> PhysicsResult<TrainingTable> {
        let key = self.cache_key();
        let path = self.cache_path(&key);

        if let Some(path) = path.as_ref().filter(|p| p.exists()) {
            let cached: CachedTable = serde_json::from_str(&fs::read_to_string(path)?)?;
            if cached.key == key {
                tracing::info!(path = %path.display(), "reusing CFD training table");
                return Ok(cached.table);
            }
        }

        let outcomes = self.sample_training();
        let failed_cases = outcomes
            .iter()
            .filter(|o| matches!(o, CaseOutcome::Failed { .. }))
            .count();
        let table = TrainingTable {
            angle_of_attack: self.grid.angle_of_attack.clone(),
            mach: self.grid.mach.clone(),
            samples: outcomes
                .into_iter()
                .map(|o| match o {
                    CaseOutcome::Solved(sample) => sample,
                    CaseOutcome::Failed { .. } => self.placeholder,
                })
                .collect(),
        };
        table.validate()?;

        if let Some(path) = path {
            if let Some(dir) = path.parent() {
                fs::create_dir_all(dir)?;
            }
            let record = CachedTable {
                key,
                created_at: chrono::Utc::now().to_rfc3339(),
                failed_cases,
                table: table.clone(),
            };
            fs::write(&path, serde_json::to_string_pretty(&record)?)?;
        }
        Ok(table)
    }
}

impl Aerodynamics for ExternalProcessAerodynamics {
    fn initialize(&self) -> PhysicsResult<()> {
        if self.surrogate.get().is_none() {
            let surrogate = SurrogateAerodynamics::new(self.train()?, self.parasite_drag)?;
            // A concurrent initializer may have won; either table is equivalent.
            let _ = self.surrogate.set(surrogate);
        }
        Ok(())
    }

    fn evaluate(&self, conditions: &Conditions) -> PhysicsResult<AeroCoefficients> {
        self.surrogate
            .get()
            .ok_or(PhysicsError::NotInitialized {
                what: "external process aerodynamics",
            })?
            .evaluate(conditions)
    }
}

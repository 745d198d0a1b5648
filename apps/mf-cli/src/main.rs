use clap::{Parser, Subcommand};
use mf_project::{MissionSummary, ProjectError, build_mission, load, save_summary_json, summarize};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mf-cli")]
#[command(about = "MissionFlow CLI - aircraft mission segment analysis", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate project file syntax and structure
    Validate {
        /// Path to the project YAML or JSON file
        project_path: PathBuf,
    },
    /// List mission segments in a project
    Segments {
        /// Path to the project YAML or JSON file
        project_path: PathBuf,
    },
    /// Evaluate the project's mission
    Run {
        /// Path to the project YAML or JSON file
        project_path: PathBuf,
        /// Write a JSON summary to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Project(#[from] ProjectError),

    #[error(transparent)]
    Mission(#[from] mf_mission::MissionError),

    #[error("{failed} segment(s) did not converge")]
    NotConverged { failed: usize },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Validate { project_path } => cmd_validate(&project_path),
        Commands::Segments { project_path } => cmd_segments(&project_path),
        Commands::Run {
            project_path,
            output,
        } => cmd_run(&project_path, output.as_deref()),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn cmd_validate(project_path: &Path) -> Result<(), CliError> {
    println!("Validating project: {}", project_path.display());
    let project = load(project_path)?;
    build_mission(&project)?;
    println!("✓ Project is valid");
    Ok(())
}

fn cmd_segments(project_path: &Path) -> Result<(), CliError> {
    let project = load(project_path)?;
    let mission = build_mission(&project)?;

    if mission.is_empty() {
        println!("No segments found in project");
    } else {
        println!("Segments in mission '{}':", mission.tag);
        for segment in mission.segments() {
            let (unknowns, residuals) = segment.layout.widths();
            println!(
                "  {} - {} ({} control points, {} unknowns, {} residuals)",
                segment.tag,
                segment.profile.kind(),
                segment.control_points,
                unknowns * segment.control_points,
                residuals * segment.control_points,
            );
        }
    }
    Ok(())
}

fn cmd_run(project_path: &Path, output: Option<&Path>) -> Result<(), CliError> {
    let project = load(project_path)?;
    let mut mission = build_mission(&project)?;
    println!("Evaluating mission '{}' ({} segments)", mission.tag, mission.len());

    let results = mission.evaluate()?;
    let summary = summarize(&project.name, &results)?;
    print_summary(&summary);

    if let Some(path) = output {
        save_summary_json(path, &summary)?;
        println!("Summary written to {}", path.display());
    }

    let failed = results.failed().count();
    if failed > 0 {
        return Err(CliError::NotConverged { failed });
    }
    Ok(())
}

fn print_summary(summary: &MissionSummary) {
    println!(
        "{:<16} {:<12} {:>5} {:>12} {:>12} {:>12} {:>10}",
        "segment", "status", "iter", "time [s]", "alt [m]", "dist [m]", "mass [kg]"
    );
    for s in &summary.segments {
        println!(
            "{:<16} {:<12} {:>5} {:>12.1} {:>12.1} {:>12.1} {:>10.2}",
            s.tag,
            if s.status == "converged" { "✓ converged" } else { "✗ failed" },
            s.iterations,
            s.final_time_s,
            s.final_altitude_m,
            s.final_distance_m,
            s.final_mass_kg,
        );
    }
    println!("Fuel burned: {:.3} kg", summary.fuel_burned_kg);
}

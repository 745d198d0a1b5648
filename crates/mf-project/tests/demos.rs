use mf_project::{build_mission, load_yaml, save_summary_json, summarize};
use std::path::PathBuf;

fn demo(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../demos")
        .join(name)
}

#[test]
fn ferry_demo_loads_and_flies() {
    let project = load_yaml(&demo("trainer_ferry.yaml")).unwrap();
    let mut mission = build_mission(&project).unwrap();
    assert_eq!(mission.len(), 3);

    let results = mission.evaluate().unwrap();
    let summary = summarize(&project.name, &results).unwrap();

    assert!(summary.all_converged);
    assert_eq!(summary.segments.len(), 3);
    assert_eq!(summary.segments[0].status, "converged");
    assert!(summary.fuel_burned_kg > 0.0);

    let descent = &summary.segments[2];
    assert!(descent.final_altitude_m.abs() < 1e-3);
    assert!(descent.final_distance_m > 20_000.0);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("summary.json");
    save_summary_json(&path, &summary).unwrap();
    let reloaded: mf_project::MissionSummary =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(reloaded, summary);
}

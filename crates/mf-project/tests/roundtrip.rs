use mf_project::schema::*;
use mf_project::{Format, load, load_json, load_yaml, save_json, save_yaml, validate_project};

fn project() -> Project {
    Project {
        version: 1,
        name: "Roundtrip".to_string(),
        vehicle: VehicleDef {
            tag: "uav".to_string(),
            mass_properties: MassPropertiesDef {
                takeoff_kg: 25.0,
                max_takeoff_kg: 30.0,
                operating_empty_kg: 18.0,
            },
            reference_area_m2: 1.2,
            wings: vec![WingDef {
                tag: "main_wing".to_string(),
                reference_area_m2: 1.2,
                wetted_area_m2: 2.5,
                aspect_ratio: 9.0,
                span_efficiency: 0.9,
                fuel_volume_m3: 0.004,
            }],
            fuselages: vec![FuselageDef {
                tag: "fuselage".to_string(),
                wetted_area_m2: 0.8,
                fuel_volume_m3: 0.002,
            }],
        },
        analyses: AnalysesDef {
            atmosphere: AtmosphereDef::WindTunnel {
                temperature_k: 293.15,
                pressure_pa: 101_325.0,
            },
            aerodynamics: AerodynamicsDef::Surrogate {
                angle_of_attack_deg: vec![-2.0, 8.0],
                mach: vec![0.1, 0.3],
                lift: vec![0.0, 0.0, 1.0, 1.1],
                drag: vec![0.01, 0.012, 0.05, 0.06],
                moment: vec![0.0; 4],
                parasite_drag: 0.02,
            },
            propulsion: PropulsionDef::default(),
            weights: WeightsDef::Fixed,
        },
        solver: SolverDef {
            jacobian: JacobianDef::Central,
            on_nonconvergence: NonConvergenceDef::Continue,
            ..SolverDef::default()
        },
        mission: MissionDef {
            tag: "survey".to_string(),
            segments: vec![
                SegmentDef {
                    tag: "climb".to_string(),
                    control_points: Some(8),
                    kind: SegmentKindDef::ClimbConstantStagnationPressureConstantAngle {
                        stagnation_pressure_pa: 102_000.0,
                        climb_angle_deg: 4.0,
                        altitude_start_m: Some(0.0),
                        altitude_end_m: 300.0,
                    },
                },
                SegmentDef {
                    tag: "cruise".to_string(),
                    control_points: None,
                    kind: SegmentKindDef::CruiseVaryDistance {
                        mach: 0.08,
                        altitude_m: None,
                        target_landing_weight_kg: 24.5,
                        distance_guess_m: 50_000.0,
                    },
                },
            ],
        },
    }
}

#[test]
fn roundtrip_yaml() {
    let project = project();
    validate_project(&project).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("project.yaml");
    save_yaml(&path, &project).unwrap();
    assert_eq!(load_yaml(&path).unwrap(), project);
}

#[test]
fn roundtrip_json() {
    let project = project();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("project.json");
    save_json(&path, &project).unwrap();
    assert_eq!(load_json(&path).unwrap(), project);
    assert_eq!(load(&path).unwrap(), project);
}

#[test]
fn defaults_fill_omitted_sections() {
    let yaml = r#"
version: 1
name: Minimal
vehicle:
  tag: trainer
  mass_properties:
    takeoff_kg: 1000
  reference_area_m2: 16
mission:
  tag: hop
  segments:
    - tag: cruise
      type: cruise_constant_speed_constant_altitude
      air_speed_mps: 60
      altitude_m: 500
      distance_m: 10000
"#;
    let project: Project = serde_yaml::from_str(yaml).unwrap();
    validate_project(&project).unwrap();

    assert_eq!(project.analyses, AnalysesDef::default());
    assert_eq!(project.solver, SolverDef::default());
    assert_eq!(project.mission.segments[0].control_points, None);
    assert!(matches!(
        project.mission.segments[0].kind,
        SegmentKindDef::CruiseConstantSpeedConstantAltitude {
            air_speed_mps: Some(v),
            mach: None,
            ..
        } if v == 60.0
    ));
}

#[test]
fn format_follows_extension() {
    use std::path::Path;
    assert_eq!(Format::from_path(Path::new("ferry.json")), Format::Json);
    assert_eq!(Format::from_path(Path::new("ferry.yaml")), Format::Yaml);
    assert_eq!(Format::from_path(Path::new("ferry")), Format::Yaml);
}

#[test]
fn invalid_project_is_not_written() {
    let mut project = project();
    project.version = 99;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("project.yaml");
    assert!(matches!(
        save_yaml(&path, &project),
        Err(mf_project::ProjectError::Validation(
            mf_project::ValidationError::UnsupportedVersion { .. }
        ))
    ));
    assert!(!path.exists());
}

use mf_project::schema::*;
use mf_project::{ValidationError, build_mission, validate_project};

fn climb(tag: &str, start: Option<f64>, end: f64) -> SegmentDef {
    SegmentDef {
        tag: tag.to_string(),
        control_points: None,
        kind: SegmentKindDef::ClimbConstantSpeedConstantAngle {
            air_speed_mps: 60.0,
            climb_angle_deg: 3.0,
            altitude_start_m: start,
            altitude_end_m: end,
        },
    }
}

fn project(segments: Vec<SegmentDef>) -> Project {
    Project {
        version: 1,
        name: "Validation".to_string(),
        vehicle: VehicleDef {
            tag: "trainer".to_string(),
            mass_properties: MassPropertiesDef {
                takeoff_kg: 1000.0,
                max_takeoff_kg: 1100.0,
                operating_empty_kg: 700.0,
            },
            reference_area_m2: 16.0,
            wings: vec![],
            fuselages: vec![],
        },
        analyses: AnalysesDef::default(),
        solver: SolverDef::default(),
        mission: MissionDef {
            tag: "m".to_string(),
            segments,
        },
    }
}

#[test]
fn valid_project_passes() {
    validate_project(&project(vec![climb("climb", Some(0.0), 1000.0)])).unwrap();
}

#[test]
fn future_version_is_rejected() {
    let mut p = project(vec![climb("climb", Some(0.0), 1000.0)]);
    p.version = 7;
    assert!(matches!(
        validate_project(&p),
        Err(ValidationError::UnsupportedVersion { version: 7 })
    ));
}

#[test]
fn duplicate_segment_tags_are_rejected() {
    let p = project(vec![
        climb("climb", Some(0.0), 500.0),
        climb("climb", None, 1000.0),
    ]);
    match validate_project(&p) {
        Err(ValidationError::DuplicateId { id, .. }) => assert_eq!(id, "climb"),
        other => panic!("expected duplicate id, got {other:?}"),
    }
}

#[test]
fn first_segment_needs_start_altitude() {
    let p = project(vec![climb("climb", None, 1000.0)]);
    assert!(matches!(
        validate_project(&p),
        Err(ValidationError::InvalidValue { .. })
    ));
}

#[test]
fn climb_must_gain_altitude() {
    let p = project(vec![climb("climb", Some(1000.0), 500.0)]);
    assert!(matches!(
        validate_project(&p),
        Err(ValidationError::InvalidValue { .. })
    ));
}

#[test]
fn cruise_needs_exactly_one_speed() {
    let cruise = SegmentDef {
        tag: "cruise".to_string(),
        control_points: None,
        kind: SegmentKindDef::CruiseConstantSpeedConstantAltitude {
            air_speed_mps: Some(60.0),
            mach: Some(0.2),
            altitude_m: Some(1000.0),
            distance_m: 1000.0,
        },
    };
    assert!(matches!(
        validate_project(&project(vec![cruise])),
        Err(ValidationError::InvalidValue { .. })
    ));
}

#[test]
fn standard_atmosphere_ceiling_is_enforced() {
    let p = project(vec![climb("climb", Some(0.0), 50_000.0)]);
    assert!(matches!(
        validate_project(&p),
        Err(ValidationError::Unsupported { .. })
    ));

    let mut tunnel = p.clone();
    tunnel.analyses.atmosphere = AtmosphereDef::WindTunnel {
        temperature_k: 288.15,
        pressure_pa: 101_325.0,
    };
    validate_project(&tunnel).unwrap();
}

#[test]
fn buildup_weights_need_named_components() {
    let mut p = project(vec![climb("climb", Some(0.0), 1000.0)]);
    p.analyses.weights = WeightsDef::UavBuildup {
        max_thrust_n: 200.0,
        max_mach: 0.2,
        main_wing: "main_wing".to_string(),
        fuselage: "fuselage".to_string(),
    };
    assert!(matches!(
        validate_project(&p),
        Err(ValidationError::InvalidValue { .. })
    ));
}

#[test]
fn surrogate_table_shape_is_checked() {
    let mut p = project(vec![climb("climb", Some(0.0), 1000.0)]);
    p.analyses.aerodynamics = AerodynamicsDef::Surrogate {
        angle_of_attack_deg: vec![0.0, 5.0],
        mach: vec![0.1, 0.2, 0.3],
        lift: vec![0.2; 5],
        drag: vec![0.03; 6],
        moment: vec![0.0; 6],
        parasite_drag: 0.0,
    };
    assert!(matches!(
        validate_project(&p),
        Err(ValidationError::InvalidValue { .. })
    ));
}

#[test]
fn too_few_control_points_are_rejected() {
    let mut p = project(vec![climb("climb", Some(0.0), 1000.0)]);
    p.solver.control_points = 1;
    assert!(matches!(
        validate_project(&p),
        Err(ValidationError::InvalidValue { .. })
    ));
}

fn single_point(z_accel_mps2: f64) -> SegmentDef {
    SegmentDef {
        tag: "point".to_string(),
        control_points: None,
        kind: SegmentKindDef::SinglePointSetSpeedSetAltitude {
            air_speed_mps: 60.0,
            altitude_m: Some(1000.0),
            x_accel_mps2: 0.0,
            z_accel_mps2,
        },
    }
}

#[test]
fn single_point_compiles_with_two_control_points() {
    let p = project(vec![climb("climb", Some(0.0), 1000.0), single_point(-2.0)]);
    validate_project(&p).unwrap();

    let mission = build_mission(&p).unwrap();
    assert_eq!(mission.segment("point").unwrap().control_points, 2);
    assert_eq!(
        mission.segment("climb").unwrap().control_points,
        p.solver.control_points
    );
}

#[test]
fn single_point_acceleration_must_be_finite() {
    assert!(matches!(
        validate_project(&project(vec![single_point(f64::NAN)])),
        Err(ValidationError::InvalidValue { .. })
    ));
}

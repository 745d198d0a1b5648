#![allow(dead_code)]

use mf_core::{deg, km, m, mps};
use mf_mission::{
    Analyses, ClimbConstantSpeedConstantAngle, CruiseConstantSpeedConstantAltitude, Segment,
};
use mf_physics::{MassProperties, ParabolicPolar, ThrottledThrust, Vehicle};

/// Light single-engine airplane: 1000 kg, 16 m², 4 kN static thrust.
pub fn vehicle() -> Vehicle {
    Vehicle {
        tag: "trainer".to_string(),
        mass_properties: MassProperties {
            max_takeoff: 1100.0,
            takeoff: 1000.0,
            operating_empty: 700.0,
        },
        reference_area: 16.0,
        ..Vehicle::default()
    }
}

pub fn analyses() -> Analyses {
    Analyses::base(vehicle())
        .with_aerodynamics(ParabolicPolar::default())
        .with_propulsion(ThrottledThrust {
            sea_level_thrust: 4_000.0,
            ..ThrottledThrust::default()
        })
}

pub fn climb(tag: &str, start: Option<f64>, end: f64) -> Segment {
    ClimbConstantSpeedConstantAngle {
        air_speed: mps(60.0),
        climb_angle: deg(3.0),
        altitude_start: start.map(m),
        altitude_end: m(end),
    }
    .segment(tag, analyses())
}

pub fn cruise(tag: &str, distance_km: f64) -> Segment {
    CruiseConstantSpeedConstantAltitude {
        air_speed: Some(mps(60.0)),
        mach: None,
        altitude: None,
        distance: km(distance_km),
    }
    .segment(tag, analyses())
}

pub fn assert_close(actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() <= tol,
        "expected {expected}, got {actual} (tol {tol})"
    );
}

//! Project validation logic.

use crate::schema::{
    AerodynamicsDef, AtmosphereDef, Project, SegmentDef, SegmentKindDef, SolverDef, VehicleDef,
    WeightsDef,
};
use std::collections::HashSet;

pub const LATEST_VERSION: u32 = 1;

/// Ceiling of the standard atmosphere model [m].
const STANDARD_ATMOSPHERE_CEILING_M: f64 = 47_000.0;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported feature: {feature} - {reason}")]
    Unsupported { feature: String, reason: String },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: impl Into<String>, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.into(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn positive(field: impl Into<String>, value: f64) -> Result<(), ValidationError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, value, "must be positive"))
    }
}

fn non_negative(field: impl Into<String>, value: f64) -> Result<(), ValidationError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, value, "must not be negative"))
    }
}

fn unique<'a>(
    tags: impl IntoIterator<Item = &'a String>,
    context: &str,
) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for tag in tags {
        if !seen.insert(tag) {
            return Err(ValidationError::DuplicateId {
                id: tag.clone(),
                context: context.to_string(),
            });
        }
    }
    Ok(())
}

pub fn validate_project(project: &Project) -> Result<(), ValidationError> {
    if project.version != LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: project.version,
        });
    }

    validate_vehicle(&project.vehicle)?;
    validate_analyses(project)?;
    validate_solver(&project.solver)?;

    let segments = &project.mission.segments;
    if segments.is_empty() {
        return Err(invalid("mission.segments", "[]", "a mission needs at least one segment"));
    }
    unique(segments.iter().map(|s| &s.tag), "mission segments")?;
    if segments[0].kind.altitude_start_m().is_none() {
        return Err(invalid(
            format!("segment '{}' altitude", segments[0].tag),
            "unset",
            "the first segment must set its start altitude",
        ));
    }

    let standard = matches!(project.analyses.atmosphere, AtmosphereDef::Standard { .. });
    for segment in segments {
        validate_segment(segment)?;
        if let Some(top) = segment.kind.altitude_max_m() {
            if standard && top > STANDARD_ATMOSPHERE_CEILING_M {
                return Err(ValidationError::Unsupported {
                    feature: format!("segment '{}' above 47 km", segment.tag),
                    reason: "the standard atmosphere model ends at 47 km".to_string(),
                });
            }
        }
    }

    Ok(())
}

fn validate_vehicle(vehicle: &VehicleDef) -> Result<(), ValidationError> {
    positive("vehicle.mass_properties.takeoff_kg", vehicle.mass_properties.takeoff_kg)?;
    non_negative(
        "vehicle.mass_properties.max_takeoff_kg",
        vehicle.mass_properties.max_takeoff_kg,
    )?;
    non_negative(
        "vehicle.mass_properties.operating_empty_kg",
        vehicle.mass_properties.operating_empty_kg,
    )?;
    positive("vehicle.reference_area_m2", vehicle.reference_area_m2)?;

    unique(vehicle.wings.iter().map(|w| &w.tag), "vehicle wings")?;
    unique(vehicle.fuselages.iter().map(|f| &f.tag), "vehicle fuselages")?;
    for wing in &vehicle.wings {
        positive(format!("wing '{}' reference_area_m2", wing.tag), wing.reference_area_m2)?;
        positive(format!("wing '{}' aspect_ratio", wing.tag), wing.aspect_ratio)?;
    }
    Ok(())
}

fn validate_analyses(project: &Project) -> Result<(), ValidationError> {
    let analyses = &project.analyses;
    if let AtmosphereDef::WindTunnel {
        temperature_k,
        pressure_pa,
    } = &analyses.atmosphere
    {
        positive("analyses.atmosphere.temperature_k", *temperature_k)?;
        positive("analyses.atmosphere.pressure_pa", *pressure_pa)?;
    }

    match &analyses.aerodynamics {
        AerodynamicsDef::ParabolicPolar {
            cl_max,
            cd_parasite,
            aspect_ratio,
            span_efficiency,
            ..
        } => {
            positive("analyses.aerodynamics.cl_max", *cl_max)?;
            non_negative("analyses.aerodynamics.cd_parasite", *cd_parasite)?;
            positive("analyses.aerodynamics.aspect_ratio", *aspect_ratio)?;
            positive("analyses.aerodynamics.span_efficiency", *span_efficiency)?;
        }
        AerodynamicsDef::Surrogate {
            angle_of_attack_deg,
            mach,
            lift,
            drag,
            moment,
            ..
        } => {
            validate_axis("analyses.aerodynamics.angle_of_attack_deg", angle_of_attack_deg)?;
            validate_axis("analyses.aerodynamics.mach", mach)?;
            let expected = angle_of_attack_deg.len() * mach.len();
            for (name, values) in [("lift", lift), ("drag", drag), ("moment", moment)] {
                if values.len() != expected {
                    return Err(invalid(
                        format!("analyses.aerodynamics.{name}"),
                        values.len(),
                        "needs one value per (angle of attack, Mach) pair",
                    ));
                }
            }
        }
        AerodynamicsDef::ExternalProcess {
            executable,
            processors,
            angle_of_attack_deg,
            mach,
            ..
        } => {
            if executable.trim().is_empty() {
                return Err(invalid("analyses.aerodynamics.executable", "''", "must be set"));
            }
            if *processors == 0 {
                return Err(invalid("analyses.aerodynamics.processors", 0, "must be at least 1"));
            }
            validate_axis("analyses.aerodynamics.angle_of_attack_deg", angle_of_attack_deg)?;
            validate_axis("analyses.aerodynamics.mach", mach)?;
        }
    }

    let crate::schema::PropulsionDef::ThrottledThrust {
        sea_level_thrust_n,
        engines,
        tsfc_kg_per_ns,
        ..
    } = &analyses.propulsion;
    positive("analyses.propulsion.sea_level_thrust_n", *sea_level_thrust_n)?;
    if *engines == 0 {
        return Err(invalid("analyses.propulsion.engines", 0, "must be at least 1"));
    }
    non_negative("analyses.propulsion.tsfc_kg_per_ns", *tsfc_kg_per_ns)?;

    if let WeightsDef::UavBuildup {
        max_thrust_n,
        max_mach,
        main_wing,
        fuselage,
    } = &analyses.weights
    {
        positive("analyses.weights.max_thrust_n", *max_thrust_n)?;
        positive("analyses.weights.max_mach", *max_mach)?;
        let vehicle = &project.vehicle;
        if !vehicle.wings.iter().any(|w| &w.tag == main_wing) {
            return Err(invalid("analyses.weights.main_wing", main_wing, "no such wing"));
        }
        if !vehicle.fuselages.iter().any(|f| &f.tag == fuselage) {
            return Err(invalid("analyses.weights.fuselage", fuselage, "no such fuselage"));
        }
    }
    Ok(())
}

fn validate_axis(field: &str, axis: &[f64]) -> Result<(), ValidationError> {
    if axis.len() < 2 {
        return Err(invalid(field, axis.len(), "needs at least two points"));
    }
    if axis.windows(2).any(|w| !(w[1] > w[0])) {
        return Err(invalid(field, format!("{axis:?}"), "must be strictly increasing"));
    }
    Ok(())
}

fn validate_solver(solver: &SolverDef) -> Result<(), ValidationError> {
    positive("solver.tolerance", solver.tolerance)?;
    positive("solver.fd_step", solver.fd_step)?;
    if solver.max_iterations == 0 {
        return Err(invalid("solver.max_iterations", 0, "must be at least 1"));
    }
    if solver.control_points < 2 {
        return Err(invalid("solver.control_points", solver.control_points, "must be at least 2"));
    }
    Ok(())
}

fn validate_angle(field: String, degrees: f64) -> Result<(), ValidationError> {
    if degrees > 0.0 && degrees < 90.0 {
        Ok(())
    } else {
        Err(invalid(field, degrees, "must be between 0 and 90 degrees"))
    }
}

fn validate_segment(segment: &SegmentDef) -> Result<(), ValidationError> {
    let field = |name: &str| format!("segment '{}' {name}", segment.tag);
    if let Some(n) = segment.control_points {
        if n < 2 {
            return Err(invalid(field("control_points"), n, "must be at least 2"));
        }
    }

    match &segment.kind {
        SegmentKindDef::ClimbConstantSpeedConstantAngle {
            air_speed_mps,
            climb_angle_deg,
            altitude_start_m,
            altitude_end_m,
        } => {
            positive(field("air_speed_mps"), *air_speed_mps)?;
            validate_angle(field("climb_angle_deg"), *climb_angle_deg)?;
            check_direction(&field("altitude_end_m"), *altitude_start_m, *altitude_end_m, true)?;
        }
        SegmentKindDef::ClimbConstantStagnationPressureConstantAngle {
            stagnation_pressure_pa,
            climb_angle_deg,
            altitude_start_m,
            altitude_end_m,
        } => {
            positive(field("stagnation_pressure_pa"), *stagnation_pressure_pa)?;
            validate_angle(field("climb_angle_deg"), *climb_angle_deg)?;
            check_direction(&field("altitude_end_m"), *altitude_start_m, *altitude_end_m, true)?;
        }
        SegmentKindDef::DescentConstantSpeedConstantAngle {
            air_speed_mps,
            descent_angle_deg,
            altitude_start_m,
            altitude_end_m,
        } => {
            positive(field("air_speed_mps"), *air_speed_mps)?;
            validate_angle(field("descent_angle_deg"), *descent_angle_deg)?;
            check_direction(&field("altitude_end_m"), *altitude_start_m, *altitude_end_m, false)?;
        }
        SegmentKindDef::CruiseConstantSpeedConstantAltitude {
            air_speed_mps,
            mach,
            distance_m,
            ..
        } => {
            match (air_speed_mps, mach) {
                (Some(v), None) => positive(field("air_speed_mps"), *v)?,
                (None, Some(m)) => positive(field("mach"), *m)?,
                _ => {
                    return Err(invalid(
                        field("air_speed_mps"),
                        format!("{air_speed_mps:?} / mach {mach:?}"),
                        "set exactly one of air_speed_mps and mach",
                    ));
                }
            }
            positive(field("distance_m"), *distance_m)?;
        }
        SegmentKindDef::CruiseVaryDistance {
            mach,
            target_landing_weight_kg,
            distance_guess_m,
            ..
        } => {
            positive(field("mach"), *mach)?;
            positive(field("target_landing_weight_kg"), *target_landing_weight_kg)?;
            positive(field("distance_guess_m"), *distance_guess_m)?;
        }
        SegmentKindDef::SinglePointSetSpeedSetAltitude {
            air_speed_mps,
            x_accel_mps2,
            z_accel_mps2,
            ..
        } => {
            positive(field("air_speed_mps"), *air_speed_mps)?;
            for (name, value) in [("x_accel_mps2", x_accel_mps2), ("z_accel_mps2", z_accel_mps2)] {
                if !value.is_finite() {
                    return Err(invalid(field(name), value, "must be finite"));
                }
            }
        }
    }
    Ok(())
}

fn check_direction(
    field: &str,
    start: Option<f64>,
    end: f64,
    climbing: bool,
) -> Result<(), ValidationError> {
    let Some(start) = start else {
        return Ok(());
    };
    let ok = if climbing { end > start } else { end < start };
    if ok {
        Ok(())
    } else {
        let reason = if climbing {
            "a climb must end above its start altitude"
        } else {
            "a descent must end below its start altitude"
        };
        Err(invalid(field, end, reason))
    }
}

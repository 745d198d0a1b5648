//! Compile a validated project into analyses and a mission.

use crate::schema::{
    AerodynamicsDef, AtmosphereDef, JacobianDef, NonConvergenceDef, Project, PropulsionDef,
    SegmentDef, SegmentKindDef, SolverDef, VehicleDef, WeightsDef,
};
use crate::ProjectResult;
use mf_core::{deg, kg, m, mps, mps2, pa};
use mf_mission::{
    Analyses, ClimbConstantSpeedConstantAngle, ClimbConstantStagnationPressureConstantAngle,
    CruiseConstantSpeedConstantAltitude, CruiseVaryDistance, DescentConstantSpeedConstantAngle,
    Mission, NonConvergencePolicy, SINGLE_POINT_CONTROL_POINTS, Segment,
    SinglePointSetSpeedSetAltitude,
};
use mf_physics::{
    CoefficientSample, ExternalProcessAerodynamics, FixedWeights, Fuselage, MassProperties,
    ParabolicPolar, StandardAtmosphere, Su2Runner, SurrogateAerodynamics, ThrottledThrust,
    TrainingGrid, TrainingTable, UavBuildup, Vehicle, WindTunnel, Wing,
};
use mf_solver::{JacobianScheme, NewtonConfig};
use std::sync::Arc;

pub fn build_vehicle(def: &VehicleDef) -> Vehicle {
    let mut vehicle = Vehicle {
        tag: def.tag.clone(),
        mass_properties: MassProperties {
            max_takeoff: def.mass_properties.max_takeoff_kg,
            takeoff: def.mass_properties.takeoff_kg,
            operating_empty: def.mass_properties.operating_empty_kg,
        },
        reference_area: def.reference_area_m2,
        ..Vehicle::default()
    };
    for wing in &def.wings {
        vehicle.wings.insert(
            wing.tag.clone(),
            Wing {
                reference_area: wing.reference_area_m2,
                wetted_area: wing.wetted_area_m2,
                aspect_ratio: wing.aspect_ratio,
                span_efficiency: wing.span_efficiency,
                fuel_volume: wing.fuel_volume_m3,
            },
        );
    }
    for fuselage in &def.fuselages {
        vehicle.fuselages.insert(
            fuselage.tag.clone(),
            Fuselage {
                wetted_area: fuselage.wetted_area_m2,
                fuel_volume: fuselage.fuel_volume_m3,
            },
        );
    }
    vehicle
}

/// Build every physics adapter named by the project.
pub fn build_analyses(project: &Project) -> ProjectResult<Analyses> {
    let vehicle = build_vehicle(&project.vehicle);
    let tag = vehicle.tag.clone();
    let mut analyses = Analyses::base(vehicle);
    let defs = &project.analyses;

    analyses = match &defs.atmosphere {
        AtmosphereDef::Standard {
            temperature_offset_k,
        } => analyses.with_atmosphere(StandardAtmosphere::with_offset(*temperature_offset_k)),
        AtmosphereDef::WindTunnel {
            temperature_k,
            pressure_pa,
        } => analyses.with_atmosphere(WindTunnel {
            temperature: *temperature_k,
            pressure: *pressure_pa,
            ..WindTunnel::default()
        }),
    };

    analyses = match &defs.aerodynamics {
        AerodynamicsDef::ParabolicPolar {
            cl_zero,
            cl_alpha_per_rad,
            cl_max,
            cd_parasite,
            aspect_ratio,
            span_efficiency,
            viscous_lift_factor,
            cm_zero,
        } => analyses.with_aerodynamics(ParabolicPolar {
            cl_zero: *cl_zero,
            cl_alpha: *cl_alpha_per_rad,
            cl_max: *cl_max,
            cd_parasite: *cd_parasite,
            aspect_ratio: *aspect_ratio,
            span_efficiency: *span_efficiency,
            viscous_lift_factor: *viscous_lift_factor,
            cm_zero: *cm_zero,
        }),
        AerodynamicsDef::Surrogate {
            angle_of_attack_deg,
            mach,
            lift,
            drag,
            moment,
            parasite_drag,
        } => {
            let samples = lift
                .iter()
                .zip(drag)
                .zip(moment)
                .map(|((lift, drag), moment)| CoefficientSample {
                    lift: *lift,
                    drag: *drag,
                    moment: *moment,
                })
                .collect();
            let table = TrainingTable {
                angle_of_attack: angle_of_attack_deg.iter().map(|a| a.to_radians()).collect(),
                mach: mach.clone(),
                samples,
            };
            analyses.with_aerodynamics(SurrogateAerodynamics::new(table, *parasite_drag)?)
        }
        AerodynamicsDef::ExternalProcess {
            executable,
            working_dir,
            config_template,
            processors,
            cache_dir,
            angle_of_attack_deg,
            mach,
            parasite_drag,
        } => {
            let mut runner = Su2Runner::new(executable, working_dir);
            runner.config_template = config_template.clone();
            runner.processors = *processors;

            let mut aero = ExternalProcessAerodynamics::new(tag, Arc::new(runner));
            aero.grid = TrainingGrid {
                angle_of_attack: angle_of_attack_deg.iter().map(|a| a.to_radians()).collect(),
                mach: mach.clone(),
            };
            aero.parasite_drag = *parasite_drag;
            aero.cache_dir = cache_dir.as_ref().map(Into::into);
            analyses.with_aerodynamics(aero)
        }
    };

    let PropulsionDef::ThrottledThrust {
        sea_level_thrust_n,
        engines,
        tsfc_kg_per_ns,
        lapse_exponent,
    } = &defs.propulsion;
    analyses = analyses.with_propulsion(ThrottledThrust {
        sea_level_thrust: *sea_level_thrust_n,
        engines: *engines,
        tsfc: *tsfc_kg_per_ns,
        lapse_exponent: *lapse_exponent,
        ..ThrottledThrust::default()
    });

    analyses = match &defs.weights {
        WeightsDef::Fixed => analyses.with_weights(FixedWeights),
        WeightsDef::UavBuildup {
            max_thrust_n,
            max_mach,
            main_wing,
            fuselage,
        } => analyses.with_weights(UavBuildup {
            max_thrust: *max_thrust_n,
            max_mach: *max_mach,
            main_wing: main_wing.clone(),
            fuselage: fuselage.clone(),
            ..UavBuildup::default()
        }),
    };

    Ok(analyses)
}

pub fn build_solver(def: &SolverDef) -> NewtonConfig {
    NewtonConfig {
        max_iterations: def.max_iterations,
        tolerance: def.tolerance,
        fd_step: def.fd_step,
        jacobian: match def.jacobian {
            JacobianDef::Forward => JacobianScheme::Forward,
            JacobianDef::Central => JacobianScheme::Central,
        },
        ..NewtonConfig::default()
    }
}

fn build_segment(def: &SegmentDef, analyses: Analyses) -> Segment {
    let tag = def.tag.clone();
    match &def.kind {
        SegmentKindDef::ClimbConstantSpeedConstantAngle {
            air_speed_mps,
            climb_angle_deg,
            altitude_start_m,
            altitude_end_m,
        } => ClimbConstantSpeedConstantAngle {
            air_speed: mps(*air_speed_mps),
            climb_angle: deg(*climb_angle_deg),
            altitude_start: altitude_start_m.map(m),
            altitude_end: m(*altitude_end_m),
        }
        .segment(tag, analyses),
        SegmentKindDef::ClimbConstantStagnationPressureConstantAngle {
            stagnation_pressure_pa,
            climb_angle_deg,
            altitude_start_m,
            altitude_end_m,
        } => ClimbConstantStagnationPressureConstantAngle {
            stagnation_pressure: pa(*stagnation_pressure_pa),
            climb_angle: deg(*climb_angle_deg),
            altitude_start: altitude_start_m.map(m),
            altitude_end: m(*altitude_end_m),
        }
        .segment(tag, analyses),
        SegmentKindDef::DescentConstantSpeedConstantAngle {
            air_speed_mps,
            descent_angle_deg,
            altitude_start_m,
            altitude_end_m,
        } => DescentConstantSpeedConstantAngle {
            air_speed: mps(*air_speed_mps),
            descent_angle: deg(*descent_angle_deg),
            altitude_start: altitude_start_m.map(m),
            altitude_end: m(*altitude_end_m),
        }
        .segment(tag, analyses),
        SegmentKindDef::CruiseConstantSpeedConstantAltitude {
            air_speed_mps,
            mach,
            altitude_m,
            distance_m,
        } => CruiseConstantSpeedConstantAltitude {
            air_speed: air_speed_mps.map(mps),
            mach: *mach,
            altitude: altitude_m.map(m),
            distance: m(*distance_m),
        }
        .segment(tag, analyses),
        SegmentKindDef::CruiseVaryDistance {
            mach,
            altitude_m,
            target_landing_weight_kg,
            distance_guess_m,
        } => CruiseVaryDistance {
            mach: *mach,
            altitude: altitude_m.map(m),
            target_landing_weight: kg(*target_landing_weight_kg),
            distance: m(*distance_guess_m),
        }
        .segment(tag, analyses),
        SegmentKindDef::SinglePointSetSpeedSetAltitude {
            air_speed_mps,
            altitude_m,
            x_accel_mps2,
            z_accel_mps2,
        } => SinglePointSetSpeedSetAltitude {
            air_speed: mps(*air_speed_mps),
            altitude: altitude_m.map(m),
            x_accel: mps2(*x_accel_mps2),
            z_accel: mps2(*z_accel_mps2),
        }
        .segment(tag, analyses),
    }
}

/// Compile the project's mission. The project is expected to be validated.
pub fn build_mission(project: &Project) -> ProjectResult<Mission> {
    let analyses = build_analyses(project)?;
    let solver = build_solver(&project.solver);
    let policy = match project.solver.on_nonconvergence {
        NonConvergenceDef::Abort => NonConvergencePolicy::Abort,
        NonConvergenceDef::Continue => NonConvergencePolicy::Continue,
    };

    let mut mission = Mission::new(project.mission.tag.clone()).with_policy(policy);
    for def in &project.mission.segments {
        let mut segment = build_segment(def, analyses.clone());
        segment.solver = solver.clone();
        let default_points = match def.kind {
            SegmentKindDef::SinglePointSetSpeedSetAltitude { .. } => SINGLE_POINT_CONTROL_POINTS,
            _ => project.solver.control_points,
        };
        segment.control_points = def.control_points.unwrap_or(default_points);
        mission.push(segment)?;
    }
    tracing::debug!(mission = %mission.tag, segments = mission.len(), "compiled mission");
    Ok(mission)
}

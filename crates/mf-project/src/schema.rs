//! Project schema definitions.
//!
//! Field names carry their unit (`_m`, `_mps`, `_deg`, ...). Everything is
//! converted to SI when the project is compiled into a mission.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub version: u32,
    pub name: String,
    pub vehicle: VehicleDef,
    #[serde(default)]
    pub analyses: AnalysesDef,
    #[serde(default)]
    pub solver: SolverDef,
    pub mission: MissionDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VehicleDef {
    pub tag: String,
    pub mass_properties: MassPropertiesDef,
    pub reference_area_m2: f64,
    #[serde(default)]
    pub wings: Vec<WingDef>,
    #[serde(default)]
    pub fuselages: Vec<FuselageDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MassPropertiesDef {
    pub takeoff_kg: f64,
    #[serde(default)]
    pub max_takeoff_kg: f64,
    #[serde(default)]
    pub operating_empty_kg: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WingDef {
    pub tag: String,
    pub reference_area_m2: f64,
    #[serde(default)]
    pub wetted_area_m2: f64,
    pub aspect_ratio: f64,
    #[serde(default = "default_span_efficiency")]
    pub span_efficiency: f64,
    #[serde(default)]
    pub fuel_volume_m3: f64,
}

fn default_span_efficiency() -> f64 {
    0.85
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FuselageDef {
    pub tag: String,
    #[serde(default)]
    pub wetted_area_m2: f64,
    #[serde(default)]
    pub fuel_volume_m3: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AnalysesDef {
    #[serde(default)]
    pub atmosphere: AtmosphereDef,
    #[serde(default)]
    pub aerodynamics: AerodynamicsDef,
    #[serde(default)]
    pub propulsion: PropulsionDef,
    #[serde(default)]
    pub weights: WeightsDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AtmosphereDef {
    Standard {
        #[serde(default)]
        temperature_offset_k: f64,
    },
    WindTunnel {
        temperature_k: f64,
        pressure_pa: f64,
    },
}

impl Default for AtmosphereDef {
    fn default() -> Self {
        AtmosphereDef::Standard {
            temperature_offset_k: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AerodynamicsDef {
    ParabolicPolar {
        cl_zero: f64,
        cl_alpha_per_rad: f64,
        cl_max: f64,
        cd_parasite: f64,
        aspect_ratio: f64,
        #[serde(default = "default_span_efficiency")]
        span_efficiency: f64,
        #[serde(default)]
        viscous_lift_factor: f64,
        #[serde(default)]
        cm_zero: f64,
    },
    /// Tabulated coefficients, row-major over (angle of attack, Mach).
    Surrogate {
        angle_of_attack_deg: Vec<f64>,
        mach: Vec<f64>,
        lift: Vec<f64>,
        drag: Vec<f64>,
        moment: Vec<f64>,
        #[serde(default)]
        parasite_drag: f64,
    },
    /// Surrogate trained by running an external CFD solver over a grid.
    ExternalProcess {
        executable: String,
        working_dir: String,
        #[serde(default)]
        config_template: String,
        #[serde(default = "default_processors")]
        processors: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cache_dir: Option<String>,
        angle_of_attack_deg: Vec<f64>,
        mach: Vec<f64>,
        #[serde(default)]
        parasite_drag: f64,
    },
}

fn default_processors() -> usize {
    1
}

impl Default for AerodynamicsDef {
    fn default() -> Self {
        AerodynamicsDef::ParabolicPolar {
            cl_zero: 0.2,
            cl_alpha_per_rad: 2.0 * std::f64::consts::PI,
            cl_max: 1.5,
            cd_parasite: 0.025,
            aspect_ratio: 8.0,
            span_efficiency: 0.85,
            viscous_lift_factor: 0.0,
            cm_zero: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropulsionDef {
    ThrottledThrust {
        sea_level_thrust_n: f64,
        #[serde(default = "default_engines")]
        engines: usize,
        tsfc_kg_per_ns: f64,
        #[serde(default = "default_lapse_exponent")]
        lapse_exponent: f64,
    },
}

fn default_engines() -> usize {
    1
}

fn default_lapse_exponent() -> f64 {
    0.7
}

impl Default for PropulsionDef {
    fn default() -> Self {
        PropulsionDef::ThrottledThrust {
            sea_level_thrust_n: 2_000.0,
            engines: 1,
            tsfc_kg_per_ns: 2.0e-5,
            lapse_exponent: 0.7,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WeightsDef {
    #[default]
    Fixed,
    UavBuildup {
        max_thrust_n: f64,
        max_mach: f64,
        #[serde(default = "default_main_wing")]
        main_wing: String,
        #[serde(default = "default_fuselage")]
        fuselage: String,
    },
}

fn default_main_wing() -> String {
    "main_wing".to_string()
}

fn default_fuselage() -> String {
    "fuselage".to_string()
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JacobianDef {
    #[default]
    Forward,
    Central,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NonConvergenceDef {
    #[default]
    Abort,
    Continue,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SolverDef {
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    #[serde(default = "default_fd_step")]
    pub fd_step: f64,
    #[serde(default)]
    pub jacobian: JacobianDef,
    #[serde(default = "default_control_points")]
    pub control_points: usize,
    #[serde(default)]
    pub on_nonconvergence: NonConvergenceDef,
}

fn default_tolerance() -> f64 {
    1e-8
}

fn default_max_iterations() -> usize {
    100
}

fn default_fd_step() -> f64 {
    1e-7
}

fn default_control_points() -> usize {
    16
}

impl Default for SolverDef {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
            max_iterations: default_max_iterations(),
            fd_step: default_fd_step(),
            jacobian: JacobianDef::default(),
            control_points: default_control_points(),
            on_nonconvergence: NonConvergenceDef::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MissionDef {
    pub tag: String,
    pub segments: Vec<SegmentDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SegmentDef {
    pub tag: String,
    /// Overrides `solver.control_points` for this segment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_points: Option<usize>,
    #[serde(flatten)]
    pub kind: SegmentKindDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SegmentKindDef {
    ClimbConstantSpeedConstantAngle {
        air_speed_mps: f64,
        climb_angle_deg: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        altitude_start_m: Option<f64>,
        altitude_end_m: f64,
    },
    ClimbConstantStagnationPressureConstantAngle {
        stagnation_pressure_pa: f64,
        climb_angle_deg: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        altitude_start_m: Option<f64>,
        altitude_end_m: f64,
    },
    DescentConstantSpeedConstantAngle {
        air_speed_mps: f64,
        descent_angle_deg: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        altitude_start_m: Option<f64>,
        altitude_end_m: f64,
    },
    CruiseConstantSpeedConstantAltitude {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        air_speed_mps: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mach: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        altitude_m: Option<f64>,
        distance_m: f64,
    },
    CruiseVaryDistance {
        mach: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        altitude_m: Option<f64>,
        target_landing_weight_kg: f64,
        distance_guess_m: f64,
    },
    SinglePointSetSpeedSetAltitude {
        air_speed_mps: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        altitude_m: Option<f64>,
        #[serde(default)]
        x_accel_mps2: f64,
        #[serde(default)]
        z_accel_mps2: f64,
    },
}

impl SegmentKindDef {
    /// Explicit start altitude [m], if set.
    pub fn altitude_start_m(&self) -> Option<f64> {
        match self {
            SegmentKindDef::ClimbConstantSpeedConstantAngle { altitude_start_m, .. }
            | SegmentKindDef::ClimbConstantStagnationPressureConstantAngle {
                altitude_start_m, ..
            }
            | SegmentKindDef::DescentConstantSpeedConstantAngle { altitude_start_m, .. } => {
                *altitude_start_m
            }
            SegmentKindDef::CruiseConstantSpeedConstantAltitude { altitude_m, .. }
            | SegmentKindDef::CruiseVaryDistance { altitude_m, .. }
            | SegmentKindDef::SinglePointSetSpeedSetAltitude { altitude_m, .. } => *altitude_m,
        }
    }

    /// Highest altitude the segment reaches [m], where known.
    pub fn altitude_max_m(&self) -> Option<f64> {
        let end = match self {
            SegmentKindDef::ClimbConstantSpeedConstantAngle { altitude_end_m, .. }
            | SegmentKindDef::ClimbConstantStagnationPressureConstantAngle {
                altitude_end_m, ..
            }
            | SegmentKindDef::DescentConstantSpeedConstantAngle { altitude_end_m, .. } => {
                Some(*altitude_end_m)
            }
            _ => None,
        };
        match (self.altitude_start_m(), end) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        }
    }
}

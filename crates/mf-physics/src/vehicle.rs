//! Vehicle description consumed by weights and aerodynamics setup.

use mf_state::ComponentMap;

/// Mass properties [kg].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MassProperties {
    pub max_takeoff: f64,
    pub takeoff: f64,
    pub operating_empty: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Wing {
    /// [m²]
    pub reference_area: f64,
    /// [m²]
    pub wetted_area: f64,
    pub aspect_ratio: f64,
    pub span_efficiency: f64,
    /// [m³]
    pub fuel_volume: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Fuselage {
    /// [m²]
    pub wetted_area: f64,
    /// [m³]
    pub fuel_volume: f64,
}

/// Top-level vehicle with components keyed by tag.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Vehicle {
    pub tag: String,
    pub mass_properties: MassProperties,
    /// Reference area for force coefficients [m²]
    pub reference_area: f64,
    pub wings: ComponentMap<Wing>,
    pub fuselages: ComponentMap<Fuselage>,
}

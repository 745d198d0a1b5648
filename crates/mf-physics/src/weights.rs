//! Weights adapter interface and mass estimates.

use crate::error::{PhysicsError, PhysicsResult};
use crate::vehicle::Vehicle;
use mf_state::ComponentMap;
use std::fmt;

/// Mass estimate for a vehicle [kg].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MassBreakdown {
    pub max_takeoff: f64,
    pub takeoff: f64,
    pub operating_empty: f64,
    pub payload: f64,
    pub fuel: f64,
    pub components: ComponentMap<f64>,
}

/// Evaluated outside the per-iteration loop, once per segment initialize.
pub trait Weights: fmt::Debug + Send + Sync {
    fn evaluate(&self, vehicle: &Vehicle) -> PhysicsResult<MassBreakdown>;
}

/// Uses the vehicle's declared mass properties as-is.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FixedWeights;

impl Weights for FixedWeights {
    fn evaluate(&self, vehicle: &Vehicle) -> PhysicsResult<MassBreakdown> {
        let m = &vehicle.mass_properties;
        if !(m.takeoff > 0.0) {
            return Err(PhysicsError::InvalidInput {
                what: format!("vehicle '{}' has no takeoff mass", vehicle.tag),
            });
        }
        Ok(MassBreakdown {
            max_takeoff: m.max_takeoff,
            takeoff: m.takeoff,
            operating_empty: m.operating_empty,
            payload: 0.0,
            fuel: (m.takeoff - m.operating_empty).max(0.0),
            components: ComponentMap::new(),
        })
    }
}

/// Small UAV buildup from wetted areas, a thrust fit and fuel volume.
///
/// Structure is aluminium skin of fixed gauge per component, propulsion is a
/// linear fit against thrust, fuel is kerosene filling the tank volume, and
/// payload is whatever remains of the maximum takeoff mass.
#[derive(Clone, Debug, PartialEq)]
pub struct UavBuildup {
    /// Maximum installed thrust [N]
    pub max_thrust: f64,
    pub max_mach: f64,
    /// [kg/m³]
    pub aluminium_density: f64,
    pub main_wing: String,
    pub fuselage: String,
}

impl Default for UavBuildup {
    fn default() -> Self {
        Self {
            max_thrust: 2_000.0,
            max_mach: 0.5,
            aluminium_density: 2_700.0,
            main_wing: "main_wing".to_string(),
            fuselage: "fuselage".to_string(),
        }
    }
}

impl UavBuildup {
    const WING_GAUGE: f64 = 0.004_762_5;
    const FUSELAGE_GAUGE: f64 = 0.006_35;
    const TAIL_GAUGE: f64 = 0.003_175;
    const KEROSENE_DENSITY: f64 = 810.0;
    const TAIL_TAGS: [&'static str; 2] = ["vertical_stabilizer", "v_tail"];
}

impl Weights for UavBuildup {
    fn evaluate(&self, vehicle: &Vehicle) -> PhysicsResult<MassBreakdown> {
        let missing = |tag: &str| PhysicsError::MissingComponent {
            tag: tag.to_string(),
        };
        let wing = vehicle
            .wings
            .get(&self.main_wing)
            .ok_or_else(|| missing(self.main_wing.as_str()))?;
        let fuselage = vehicle
            .fuselages
            .get(&self.fuselage)
            .ok_or_else(|| missing(self.fuselage.as_str()))?;
        let tail = Self::TAIL_TAGS
            .iter()
            .find_map(|t| vehicle.wings.get(t))
            .ok_or_else(|| missing(Self::TAIL_TAGS[0]))?;

        let rho = self.aluminium_density;
        let wing_mass = wing.wetted_area * rho * Self::WING_GAUGE;
        let fuselage_mass = fuselage.wetted_area * rho * Self::FUSELAGE_GAUGE;
        let tail_mass = tail.wetted_area * rho * Self::TAIL_GAUGE;
        let propulsion_mass = 0.014 * self.max_thrust - 1.2374;
        let fuel = (wing.fuel_volume + fuselage.fuel_volume) * Self::KEROSENE_DENSITY;

        let total_area = wing.wetted_area + fuselage.wetted_area + tail.wetted_area;
        let airframe = 5.907 * total_area.powf(1.4907) * self.max_mach;

        let max_takeoff = vehicle.mass_properties.max_takeoff;
        let payload = max_takeoff - (airframe + fuel + propulsion_mass);
        if payload < 0.0 {
            return Err(PhysicsError::InvalidInput {
                what: format!(
                    "vehicle '{}' exceeds its maximum takeoff mass by {:.1} kg",
                    vehicle.tag, -payload
                ),
            });
        }

        let mut components = ComponentMap::new();
        components.insert("wing", wing_mass);
        components.insert("fuselage", fuselage_mass);
        components.insert("tail", tail_mass);
        components.insert("propulsion", propulsion_mass);
        components.insert("airframe", airframe);

        Ok(MassBreakdown {
            max_takeoff,
            takeoff: airframe + propulsion_mass + fuel,
            operating_empty: airframe + propulsion_mass + 0.008 * airframe,
            payload,
            fuel,
            components,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vehicle::{Fuselage, MassProperties, Wing};

    fn uav() -> Vehicle {
        let mut v = Vehicle {
            tag: "uav".to_string(),
            mass_properties: MassProperties {
                max_takeoff: 500.0,
                takeoff: 450.0,
                operating_empty: 300.0,
            },
            reference_area: 4.0,
            ..Vehicle::default()
        };
        v.wings.insert(
            "main_wing",
            Wing {
                wetted_area: 8.0,
                fuel_volume: 0.05,
                ..Wing::default()
            },
        );
        v.wings.insert(
            "v_tail",
            Wing {
                wetted_area: 1.0,
                ..Wing::default()
            },
        );
        v.fuselages.insert(
            "fuselage",
            Fuselage {
                wetted_area: 3.0,
                fuel_volume: 0.05,
            },
        );
        v
    }

    #[test]
    fn buildup_closes_on_max_takeoff() {
        let b = UavBuildup::default().evaluate(&uav()).unwrap();
        assert!((b.fuel - 81.0).abs() < 1e-9);
        let airframe = *b.components.get("airframe").unwrap();
        let propulsion = *b.components.get("propulsion").unwrap();
        assert!((airframe + propulsion + b.fuel + b.payload - b.max_takeoff).abs() < 1e-9);
        assert!((propulsion - 26.7626).abs() < 1e-9);
    }

    #[test]
    fn buildup_needs_tail() {
        let mut v = uav();
        v.wings = v
            .wings
            .iter()
            .filter(|(t, _)| *t != "v_tail")
            .map(|(t, w)| (t.to_string(), w.clone()))
            .collect();
        assert!(matches!(
            UavBuildup::default().evaluate(&v),
            Err(PhysicsError::MissingComponent { .. })
        ));
    }

    #[test]
    fn fixed_weights_pass_through() {
        let b = FixedWeights.evaluate(&uav()).unwrap();
        assert_eq!(b.takeoff, 450.0);
        assert_eq!(b.fuel, 150.0);
    }
}

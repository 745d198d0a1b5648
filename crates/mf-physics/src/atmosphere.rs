//! Atmosphere adapters: altitude to air properties.

use crate::air::Air;
use crate::error::{PhysicsError, PhysicsResult};
use mf_core::constants::G0_MPS2;
use nalgebra::DVector;
use std::fmt;

/// Air properties sampled at the requested altitudes.
#[derive(Clone, Debug, PartialEq)]
pub struct AtmosphereProperties {
    pub pressure: DVector<f64>,
    pub temperature: DVector<f64>,
    pub density: DVector<f64>,
    pub speed_of_sound: DVector<f64>,
    pub dynamic_viscosity: DVector<f64>,
}

pub trait Atmosphere: fmt::Debug + Send + Sync {
    /// Properties at each geometric altitude [m]; same length as the input.
    fn compute(&self, altitude: &DVector<f64>) -> PhysicsResult<AtmosphereProperties>;

    fn air(&self) -> Air {
        Air::default()
    }

    /// Gravitational acceleration [m/s²] at each altitude.
    fn gravity(&self, altitude: &DVector<f64>) -> DVector<f64> {
        DVector::from_element(altitude.len(), G0_MPS2)
    }
}

fn properties(air: &Air, pressure: DVector<f64>, temperature: DVector<f64>) -> AtmosphereProperties {
    let density = pressure.zip_map(&temperature, |p, t| air.density(p, t));
    let speed_of_sound = temperature.map(|t| air.speed_of_sound(t));
    let dynamic_viscosity = temperature.map(|t| air.dynamic_viscosity(t));
    AtmosphereProperties {
        pressure,
        temperature,
        density,
        speed_of_sound,
        dynamic_viscosity,
    }
}

/// U.S. Standard Atmosphere 1976 up to 47 km geopotential altitude.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StandardAtmosphere {
    /// Added to the standard temperature [K]; pressure is unaffected.
    pub temperature_offset: f64,
    pub air: Air,
}

impl StandardAtmosphere {
    /// Effective Earth radius for geopotential conversion [m]
    const EARTH_RADIUS: f64 = 6_356_766.0;
    /// g0 M0 / R* [K/m]
    const GMR: f64 = 0.034_163_2;
    const LOWEST: f64 = -2_000.0;
    const BASE_ALTITUDE: [f64; 4] = [0.0, 11_000.0, 20_000.0, 32_000.0];
    const TOP: f64 = 47_000.0;
    const LAPSE: [f64; 4] = [-0.0065, 0.0, 0.001, 0.0028];
    const SEA_LEVEL_TEMPERATURE: f64 = 288.15;
    const SEA_LEVEL_PRESSURE: f64 = 101_325.0;

    pub fn with_offset(temperature_offset: f64) -> Self {
        Self {
            temperature_offset,
            ..Self::default()
        }
    }

    /// Standard (temperature, pressure) at a geometric altitude.
    fn standard(altitude: f64) -> PhysicsResult<(f64, f64)> {
        let h = Self::EARTH_RADIUS * altitude / (Self::EARTH_RADIUS + altitude);
        if !h.is_finite() || !(Self::LOWEST..=Self::TOP).contains(&h) {
            return Err(PhysicsError::AltitudeOutOfRange { altitude });
        }

        let mut t_base = Self::SEA_LEVEL_TEMPERATURE;
        let mut p_base = Self::SEA_LEVEL_PRESSURE;
        let mut layer = 0;
        // Walk up to the layer containing h, carrying base values.
        while layer + 1 < Self::BASE_ALTITUDE.len() && h > Self::BASE_ALTITUDE[layer + 1] {
            let dh = Self::BASE_ALTITUDE[layer + 1] - Self::BASE_ALTITUDE[layer];
            (t_base, p_base) = Self::layer_top(t_base, p_base, Self::LAPSE[layer], dh);
            layer += 1;
        }

        Ok(Self::layer_top(
            t_base,
            p_base,
            Self::LAPSE[layer],
            h - Self::BASE_ALTITUDE[layer],
        ))
    }

    fn layer_top(t_base: f64, p_base: f64, lapse: f64, dh: f64) -> (f64, f64) {
        if lapse == 0.0 {
            (t_base, p_base * (-Self::GMR * dh / t_base).exp())
        } else {
            let t = t_base + lapse * dh;
            (t, p_base * (t_base / t).powf(Self::GMR / lapse))
        }
    }
}

impl Atmosphere for StandardAtmosphere {
    fn compute(&self, altitude: &DVector<f64>) -> PhysicsResult<AtmosphereProperties> {
        let n = altitude.len();
        let mut temperature = DVector::zeros(n);
        let mut pressure = DVector::zeros(n);
        for (i, &z) in altitude.iter().enumerate() {
            let (t, p) = Self::standard(z)?;
            temperature[i] = t + self.temperature_offset;
            pressure[i] = p;
        }
        Ok(properties(&self.air, pressure, temperature))
    }

    fn air(&self) -> Air {
        self.air
    }
}

/// Constant test-section conditions at every altitude.
#[derive(Clone, Debug, PartialEq)]
pub struct WindTunnel {
    /// [K]
    pub temperature: f64,
    /// [Pa]
    pub pressure: f64,
    pub air: Air,
}

impl Default for WindTunnel {
    fn default() -> Self {
        Self {
            temperature: 293.15,
            pressure: 101_325.0,
            air: Air::default(),
        }
    }
}

impl Atmosphere for WindTunnel {
    fn compute(&self, altitude: &DVector<f64>) -> PhysicsResult<AtmosphereProperties> {
        let n = altitude.len();
        Ok(properties(
            &self.air,
            DVector::from_element(n, self.pressure),
            DVector::from_element(n, self.temperature),
        ))
    }

    fn air(&self) -> Air {
        self.air
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(z: f64) -> AtmosphereProperties {
        StandardAtmosphere::default()
            .compute(&DVector::from_element(1, z))
            .unwrap()
    }

    #[test]
    fn sea_level() {
        let p = at(0.0);
        assert!((p.temperature[0] - 288.15).abs() < 1e-12);
        assert!((p.pressure[0] - 101_325.0).abs() < 1e-9);
        assert!((p.density[0] - 1.2250).abs() < 1e-3);
    }

    #[test]
    fn tropopause_and_stratosphere() {
        // Geometric altitudes for 11 km and 20 km geopotential.
        let p11 = at(11_019.1);
        assert!((p11.temperature[0] - 216.65).abs() < 0.01);
        assert!((p11.pressure[0] - 22_632.0).abs() < 5.0);

        let p20 = at(20_063.1);
        assert!((p20.temperature[0] - 216.65).abs() < 0.01);
        assert!((p20.pressure[0] - 5_474.9).abs() < 2.0);
    }

    #[test]
    fn upper_layers_warm() {
        let p = at(30_000.0);
        assert!(p.temperature[0] > 216.65);
        assert!(p.pressure[0] < 1_250.0);
    }

    #[test]
    fn offset_shifts_temperature_only() {
        let std = at(1_000.0);
        let hot = StandardAtmosphere::with_offset(15.0)
            .compute(&DVector::from_element(1, 1_000.0))
            .unwrap();
        assert!((hot.temperature[0] - std.temperature[0] - 15.0).abs() < 1e-12);
        assert_eq!(hot.pressure[0], std.pressure[0]);
        assert!(hot.density[0] < std.density[0]);
    }

    #[test]
    fn out_of_range_altitude() {
        let err = StandardAtmosphere::default()
            .compute(&DVector::from_vec(vec![0.0, 60_000.0]))
            .unwrap_err();
        assert!(matches!(err, PhysicsError::AltitudeOutOfRange { .. }));
    }

    #[test]
    fn wind_tunnel_is_constant() {
        let p = WindTunnel::default()
            .compute(&DVector::from_vec(vec![0.0, 5_000.0, 10_000.0]))
            .unwrap();
        assert!(p.temperature.iter().all(|t| *t == 293.15));
        assert!(p.density.iter().all(|d| *d == p.density[0]));
    }
}

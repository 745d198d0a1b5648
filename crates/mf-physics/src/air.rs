//! Dry air as a calorically perfect ideal gas.

/// Gas constants for dry air.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Air {
    /// Specific gas constant [J/(kg·K)]
    pub gas_constant: f64,
    /// Ratio of specific heats [-]
    pub gamma: f64,
}

impl Default for Air {
    fn default() -> Self {
        Self {
            gas_constant: 287.0528,
            gamma: 1.4,
        }
    }
}

impl Air {
    /// Sutherland reference viscosity [Pa·s]
    const MU_REF: f64 = 1.716e-5;
    /// Sutherland reference temperature [K]
    const T_REF: f64 = 273.15;
    /// Sutherland constant [K]
    const SUTHERLAND: f64 = 110.4;

    /// Density from the ideal gas law.
    pub fn density(&self, pressure: f64, temperature: f64) -> f64 {
        pressure / (self.gas_constant * temperature)
    }

    pub fn speed_of_sound(&self, temperature: f64) -> f64 {
        (self.gamma * self.gas_constant * temperature).sqrt()
    }

    /// Dynamic viscosity from Sutherland's law.
    pub fn dynamic_viscosity(&self, temperature: f64) -> f64 {
        Self::MU_REF
            * (temperature / Self::T_REF).powf(1.5)
            * (Self::T_REF + Self::SUTHERLAND)
            / (temperature + Self::SUTHERLAND)
    }

    /// Mach number from the isentropic total-to-static pressure ratio.
    pub fn mach_from_pressure_ratio(&self, total_over_static: f64) -> f64 {
        let g = self.gamma;
        let inside = total_over_static.powf((g - 1.0) / g) - 1.0;
        (2.0 / (g - 1.0) * inside.max(0.0)).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sea_level_values() {
        let air = Air::default();
        let rho = air.density(101_325.0, 288.15);
        assert!((rho - 1.225).abs() < 1e-3);
        assert!((air.speed_of_sound(288.15) - 340.29).abs() < 0.05);
        assert!((air.dynamic_viscosity(288.15) - 1.789e-5).abs() < 1e-7);
    }

    #[test]
    fn mach_from_ratio_inverts_isentropic_relation() {
        let air = Air::default();
        let mach: f64 = 0.8;
        let ratio = (1.0 + 0.2 * mach * mach).powf(3.5);
        assert!((air.mach_from_pressure_ratio(ratio) - mach).abs() < 1e-12);
        assert_eq!(air.mach_from_pressure_ratio(0.9), 0.0);
    }
}

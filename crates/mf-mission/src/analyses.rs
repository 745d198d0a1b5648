//! The physics adapters a segment calls.

use mf_physics::{
    Aerodynamics, Atmosphere, FixedWeights, ParabolicPolar, Propulsion, StandardAtmosphere,
    ThrottledThrust, Vehicle, Weights,
};
use std::sync::Arc;

/// Vehicle plus one adapter per physics concern.
///
/// Adapters are immutable behind `Arc`; cached models are built through
/// `Aerodynamics::initialize`, which is safe to share between mission copies.
#[derive(Clone, Debug)]
pub struct Analyses {
    pub vehicle: Arc<Vehicle>,
    pub atmosphere: Arc<dyn Atmosphere>,
    pub aerodynamics: Arc<dyn Aerodynamics>,
    pub propulsion: Arc<dyn Propulsion>,
    pub weights: Arc<dyn Weights>,
}

impl Analyses {
    /// Standard atmosphere, drag polar, throttled thrust and fixed weights.
    pub fn base(vehicle: Vehicle) -> Self {
        Self {
            vehicle: Arc::new(vehicle),
            atmosphere: Arc::new(StandardAtmosphere::default()),
            aerodynamics: Arc::new(ParabolicPolar::default()),
            propulsion: Arc::new(ThrottledThrust::default()),
            weights: Arc::new(FixedWeights),
        }
    }

    pub fn with_atmosphere(mut self, atmosphere: impl Atmosphere + 'static) -> Self {
        self.atmosphere = Arc::new(atmosphere);
        self
    }

    pub fn with_aerodynamics(mut self, aerodynamics: impl Aerodynamics + 'static) -> Self {
        self.aerodynamics = Arc::new(aerodynamics);
        self
    }

    pub fn with_propulsion(mut self, propulsion: impl Propulsion + 'static) -> Self {
        self.propulsion = Arc::new(propulsion);
        self
    }

    pub fn with_weights(mut self, weights: impl Weights + 'static) -> Self {
        self.weights = Arc::new(weights);
        self
    }
}

// mf-core/src/units.rs
//
// The solve loop works in raw SI f64. These quantity types are used for
// segment parameters and configuration so that conversions happen once,
// at the boundary.

use uom::si::f64::{
    Acceleration as UomAcceleration, Angle as UomAngle, Area as UomArea, Force as UomForce,
    Length as UomLength, Mass as UomMass, MassRate as UomMassRate, Pressure as UomPressure,
    ThermodynamicTemperature as UomThermodynamicTemperature, Time as UomTime,
    Velocity as UomVelocity,
};

// Public canonical unit types (SI, f64)
pub type Accel = UomAcceleration;
pub type Angle = UomAngle;
pub type Area = UomArea;
pub type Force = UomForce;
pub type Length = UomLength;
pub type Mass = UomMass;
pub type MassRate = UomMassRate;
pub type Pressure = UomPressure;
pub type Temperature = UomThermodynamicTemperature;
pub type Time = UomTime;
pub type Velocity = UomVelocity;

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

#[inline]
pub fn km(v: f64) -> Length {
    use uom::si::length::kilometer;
    Length::new::<kilometer>(v)
}

#[inline]
pub fn ft(v: f64) -> Length {
    use uom::si::length::foot;
    Length::new::<foot>(v)
}

#[inline]
pub fn mps(v: f64) -> Velocity {
    use uom::si::velocity::meter_per_second;
    Velocity::new::<meter_per_second>(v)
}

#[inline]
pub fn knots(v: f64) -> Velocity {
    use uom::si::velocity::knot;
    Velocity::new::<knot>(v)
}

#[inline]
pub fn mps2(v: f64) -> Accel {
    use uom::si::acceleration::meter_per_second_squared;
    Accel::new::<meter_per_second_squared>(v)
}

#[inline]
pub fn deg(v: f64) -> Angle {
    use uom::si::angle::degree;
    Angle::new::<degree>(v)
}

#[inline]
pub fn rad(v: f64) -> Angle {
    use uom::si::angle::radian;
    Angle::new::<radian>(v)
}

#[inline]
pub fn kg(v: f64) -> Mass {
    use uom::si::mass::kilogram;
    Mass::new::<kilogram>(v)
}

#[inline]
pub fn s(v: f64) -> Time {
    use uom::si::time::second;
    Time::new::<second>(v)
}

#[inline]
pub fn newtons(v: f64) -> Force {
    use uom::si::force::newton;
    Force::new::<newton>(v)
}

#[inline]
pub fn pa(v: f64) -> Pressure {
    use uom::si::pressure::pascal;
    Pressure::new::<pascal>(v)
}

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

#[inline]
pub fn sq_m(v: f64) -> Area {
    use uom::si::area::square_meter;
    Area::new::<square_meter>(v)
}

#[inline]
pub fn kgps(v: f64) -> MassRate {
    use uom::si::mass_rate::kilogram_per_second;
    MassRate::new::<kilogram_per_second>(v)
}

/// Raw SI readers for the quantities above.
pub mod si {
    use super::*;

    #[inline]
    pub fn meters(v: Length) -> f64 {
        v.get::<uom::si::length::meter>()
    }

    #[inline]
    pub fn meters_per_second(v: Velocity) -> f64 {
        v.get::<uom::si::velocity::meter_per_second>()
    }

    #[inline]
    pub fn meters_per_second_squared(v: Accel) -> f64 {
        v.get::<uom::si::acceleration::meter_per_second_squared>()
    }

    #[inline]
    pub fn radians(v: Angle) -> f64 {
        v.get::<uom::si::angle::radian>()
    }

    #[inline]
    pub fn kilograms(v: Mass) -> f64 {
        v.get::<uom::si::mass::kilogram>()
    }

    #[inline]
    pub fn pascals(v: Pressure) -> f64 {
        v.get::<uom::si::pressure::pascal>()
    }

    #[inline]
    pub fn kelvin(v: Temperature) -> f64 {
        v.get::<uom::si::thermodynamic_temperature::kelvin>()
    }

    #[inline]
    pub fn square_meters(v: Area) -> f64 {
        v.get::<uom::si::area::square_meter>()
    }

    #[inline]
    pub fn newtons(v: Force) -> f64 {
        v.get::<uom::si::force::newton>()
    }
}

pub mod constants {
    use super::*;

    pub const G0_MPS2: f64 = 9.806_65;

    #[inline]
    pub fn g0() -> Accel {
        use uom::si::acceleration::meter_per_second_squared;
        Accel::new::<meter_per_second_squared>(G0_MPS2)
    }
}

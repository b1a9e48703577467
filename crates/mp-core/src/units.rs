// mp-core/src/units.rs

use uom::si::f64::{
    DynamicViscosity as UomDynamicViscosity, KinematicViscosity as UomKinematicViscosity,
    Length as UomLength, MassDensity as UomMassDensity, Pressure as UomPressure,
    Ratio as UomRatio, ThermodynamicTemperature as UomThermodynamicTemperature,
    Velocity as UomVelocity,
};

// Public canonical unit types (SI, f64)
pub type Density = UomMassDensity;
pub type DynVisc = UomDynamicViscosity;
pub type KinVisc = UomKinematicViscosity;
pub type Length = UomLength;
pub type Pressure = UomPressure;
pub type Ratio = UomRatio;
pub type Temperature = UomThermodynamicTemperature;
pub type Velocity = UomVelocity;

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
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

#[inline]
pub fn mps(v: f64) -> Velocity {
    use uom::si::velocity::meter_per_second;
    Velocity::new::<meter_per_second>(v)
}

#[inline]
pub fn m2ps(v: f64) -> KinVisc {
    use uom::si::kinematic_viscosity::square_meter_per_second;
    KinVisc::new::<square_meter_per_second>(v)
}

#[inline]
pub fn kgpm3(v: f64) -> Density {
    use uom::si::mass_density::kilogram_per_cubic_meter;
    Density::new::<kilogram_per_cubic_meter>(v)
}

#[inline]
pub fn unitless(v: f64) -> Ratio {
    use uom::si::ratio::ratio;
    Ratio::new::<ratio>(v)
}

/// Plain-f64 temperature/pressure conversions.
///
/// Substance data tables are keyed in °C or K and evaluated as raw SI
/// floats, so these stay off the uom type system on purpose.
pub mod convert {
    /// Offset between the Celsius and Kelvin scales.
    pub const ZERO_CELSIUS_K: f64 = 273.15;

    /// Standard atmosphere [Pa].
    pub const STANDARD_ATMOSPHERE_PA: f64 = 101_325.0;

    /// Celsius to Kelvin.
    #[inline]
    pub fn c2k(celsius: f64) -> f64 {
        celsius + ZERO_CELSIUS_K
    }

    /// Kelvin to Celsius.
    #[inline]
    pub fn k2c(kelvin: f64) -> f64 {
        kelvin - ZERO_CELSIUS_K
    }

    /// Standard atmosphere [Pa].
    #[inline]
    pub fn atm() -> f64 {
        STANDARD_ATMOSPHERE_PA
    }
}

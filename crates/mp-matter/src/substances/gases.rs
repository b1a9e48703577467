//! Gas substances: measured-table air and argon, plus a generic
//! source-backed gas.

use std::sync::Arc;

use mp_core::convert::{atm, c2k, k2c};

use crate::builder::MatterBuilder;
use crate::error::MatterResult;
use crate::interp::InterpolationTable;
use crate::matter::{Matter, MatterKind, PhaseTransitions};
use crate::property::{CalcRule, PropertyKey};
use crate::range::Range;
use crate::source::{PropertySource, SourceProperty};

/// Sample temperatures [K] shared by the air data tables.
const AIR_SAMPLE_T: [f64; 35] = [
    100.0, 150.0, 200.0, 250.0, 300.0, 350.0, 400.0, 450.0, 500.0, 550.0, 600.0, 650.0, 700.0,
    750.0, 800.0, 850.0, 900.0, 950.0, 1000.0, 1100.0, 1200.0, 1300.0, 1400.0, 1500.0, 1600.0,
    1700.0, 1800.0, 1900.0, 2000.0, 2100.0, 2200.0, 2300.0, 2400.0, 2500.0, 3000.0,
];

/// Specific heat capacity of air [J/(kg K)].
const AIR_C_P: [f64; 35] = [
    1.032e3, 1.012e3, 1.007e3, 1.006e3, 1.007e3, 1.009e3, 1.014e3, 1.021e3, 1.030e3, 1.040e3,
    1.051e3, 1.063e3, 1.075e3, 1.087e3, 1.099e3, 1.110e3, 1.121e3, 1.131e3, 1.141e3, 1.159e3,
    1.175e3, 1.189e3, 1.207e3, 1.230e3, 1.248e3, 1.267e3, 1.286e3, 1.307e3, 1.337e3, 1.372e3,
    1.417e3, 1.478e3, 1.558e3, 1.665e3, 2.726e3,
];

/// Thermal conductivity of air [W/(m K)].
const AIR_LAMBDA: [f64; 35] = [
    9.34e-3, 13.8e-3, 18.1e-3, 22.3e-3, 26.3e-3, 30.0e-3, 33.8e-3, 37.3e-3, 40.7e-3, 43.9e-3,
    46.9e-3, 49.7e-3, 52.4e-3, 54.9e-3, 57.3e-3, 59.6e-3, 62e-3, 64.3e-3, 66.7e-3, 71.5e-3,
    76.3e-3, 82e-3, 91e-3, 100e-3, 106e-3, 113e-3, 120e-3, 128e-3, 137e-3, 147e-3, 160e-3,
    175e-3, 196e-3, 222e-3, 486e-3,
];

/// Kinematic viscosity of air [m^2/s].
const AIR_NU: [f64; 35] = [
    2e-6, 4.426e-6, 7.59e-6, 11.44e-6, 15.89e-6, 20.92e-6, 26.41e-6, 32.39e-6, 38.79e-6,
    45.57e-6, 52.69e-6, 60.21e-6, 68.10e-6, 76.37e-6, 84.93e-6, 93.8e-6, 102.9e-6, 112.2e-6,
    121.9e-6, 141.8e-6, 162.9e-6, 185.1e-6, 213.0e-6, 240.0e-6, 268.0e-6, 298.0e-6, 329.0e-6,
    362.0e-6, 396.0e-6, 431.0e-6, 468.0e-6, 506.0e-6, 547.0e-6, 589.0e-6, 841.0e-6,
];

/// Density of air [kg/m^3].
const AIR_RHO: [f64; 35] = [
    3.5562, 2.3364, 1.7458, 1.3947, 1.1614, 0.9950, 0.8711, 0.7740, 0.6964, 0.6329, 0.5804,
    0.5356, 0.4975, 0.4643, 0.4354, 0.4097, 0.3868, 0.3666, 0.3482, 0.3166, 0.2902, 0.2679,
    0.2488, 0.2322, 0.2177, 0.2049, 0.1935, 0.1833, 0.1741, 0.1658, 0.1582, 0.1513, 0.1448,
    0.1389, 0.1135,
];

fn air_table(values: &[f64; 35]) -> MatterResult<InterpolationTable> {
    InterpolationTable::new(AIR_SAMPLE_T.to_vec(), values.to_vec())
}

/// Air from measured tables over 100–3000 K.
///
/// Dynamic viscosity stays the inherited `nu * rho` rule; both factors are
/// table-backed here, so the pair is acyclic.
pub fn air() -> MatterResult<Matter> {
    MatterBuilder::new(MatterKind::Gas, "Air")
        .version("2020-12-11")
        .comment("composition N2: 0.78, O2: 0.21, Ar+CO2: 0.01")
        .reference(c2k(15.0), atm())
        .operational_range(
            Range::new(c2k(0.0), c2k(100.0)),
            Range::new(atm(), 100e5 + atm()),
        )
        .molar_mass(29e-3)
        .transitions(PhaseTransitions {
            t_liq: c2k(0.0),
            t_boil: 83.0,
            h_melt: 334e3,
            h_vap: 2270e3,
            ..PhaseTransitions::default()
        })
        .rule(PropertyKey::Beta, CalcRule::formula(|t, _p, _x| 1.0 / t))
        .rule(PropertyKey::CP, CalcRule::Table(air_table(&AIR_C_P)?))
        .rule(
            PropertyKey::CSound,
            CalcRule::formula(|t, _p, _x| 331.3 * (1.0 + k2c(t) / 273.15).sqrt()),
        )
        .rule(PropertyKey::Lambda, CalcRule::Table(air_table(&AIR_LAMBDA)?))
        .rule(PropertyKey::Nu, CalcRule::Table(air_table(&AIR_NU)?))
        .rule(PropertyKey::Rho, CalcRule::Table(air_table(&AIR_RHO)?))
        .rule(PropertyKey::EModulus, CalcRule::Constant(2.2e9))
        .build()
}

/// Argon from measured tables over 0–800 °C.
///
/// Kinematic viscosity stays the inherited `mu / rho` rule. Density is the
/// constant reference-state value the source data degenerates to.
pub fn argon() -> MatterResult<Matter> {
    let cp_t: Vec<f64> = [0.0, 100.0, 200.0, 300.0, 400.0, 500.0, 600.0, 700.0, 800.0]
        .iter()
        .map(|theta| c2k(*theta))
        .collect();
    let cp_v = vec![522.0, 521.0, 521.0, 521.0, 521.0, 520.0, 520.0, 520.0, 520.0];

    let six_hundred_c: Vec<f64> = [0.0, 100.0, 200.0, 300.0, 400.0, 500.0, 600.0]
        .iter()
        .map(|theta| c2k(*theta))
        .collect();
    let lambda_v = vec![16.51e-3, 21.17e-3, 25.59e-3, 29.89e-3, 33.96e-3, 37.91e-3, 39.43e-3];
    let mu_v = vec![21.2e-6, 27.1e-6, 32.1e-6, 36.7e-6, 41.0e-6, 45.22e-6, 48.7e-6];

    MatterBuilder::new(MatterKind::Gas, "Ar")
        .version("2016-01-18")
        .reference(c2k(15.0), atm())
        .operational_range(
            Range::new(c2k(0.0), c2k(100.0)),
            Range::new(atm(), 100e5 + atm()),
        )
        .composition_entry("Ar", 100.0)
        .molar_mass(39.948e-3)
        .rule(
            PropertyKey::CP,
            CalcRule::Table(InterpolationTable::new(cp_t, cp_v)?),
        )
        .rule(
            PropertyKey::Lambda,
            CalcRule::Table(InterpolationTable::new(six_hundred_c.clone(), lambda_v)?),
        )
        .rule(
            PropertyKey::Mu,
            CalcRule::Table(InterpolationTable::new(six_hundred_c, mu_v)?),
        )
        .rule(PropertyKey::Rho, CalcRule::Constant(1.6339))
        .build()
}

/// Validity window of the external source queries [K].
const SOURCE_T_WINDOW: Range = Range::new(273.16, 600.0);

/// Generic gas whose transport and caloric properties delegate to an
/// external property source.
///
/// The temperature is clamped to the source's validity window before each
/// query; kinematic viscosity stays the inherited `mu / rho` rule. Molar
/// mass is fetched once at construction, so an unknown identifier fails
/// here rather than on first evaluation.
pub fn source_backed_gas(
    identifier: &str,
    source: Arc<dyn PropertySource>,
) -> MatterResult<Matter> {
    let molar_mass = source.query(identifier, SourceProperty::MolarMass, c2k(20.0), atm())?;

    let delegate = |property: SourceProperty| CalcRule::Source {
        source: Arc::clone(&source),
        substance: identifier.to_string(),
        property,
        t_clamp: Some(SOURCE_T_WINDOW),
    };

    MatterBuilder::new(MatterKind::Gas, identifier)
        .version("2020-12-15")
        .reference(c2k(20.0), atm())
        .operational_range(
            Range::new(273.16, 600.0),
            Range::new(atm(), 100e5 + atm()),
        )
        .composition_entry(identifier, 100.0)
        .molar_mass(molar_mass)
        .rule(PropertyKey::CP, delegate(SourceProperty::SpecificHeat))
        .rule(PropertyKey::Rho, delegate(SourceProperty::Density))
        .rule(
            PropertyKey::Lambda,
            delegate(SourceProperty::ThermalConductivity),
        )
        .rule(PropertyKey::Mu, delegate(SourceProperty::DynamicViscosity))
        .build()
}

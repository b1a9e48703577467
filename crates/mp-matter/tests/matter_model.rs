//! End-to-end tests of the property/matter evaluation model.

use std::sync::Arc;

use mp_core::convert::{atm, c2k};
use mp_core::numeric::{Tolerances, nearly_equal};
use mp_core::units::{k, pa};
use mp_matter::{
    CalcRule, MatterBuilder, MatterError, MatterKind, PropertyKey, PropertySource, SourceError,
    SourceProperty, SourceResult, StatePoint, substances,
};

fn state(t_k: f64, p_pa: f64) -> StatePoint {
    StatePoint::new(k(t_k), pa(p_pa))
}

/// Ideal-gas nitrogen stand-in for an external thermodynamic database.
struct IdealGasSource;

impl PropertySource for IdealGasSource {
    fn name(&self) -> &str {
        "ideal-gas-stub"
    }

    fn query(
        &self,
        substance: &str,
        property: SourceProperty,
        t_k: f64,
        p_pa: f64,
    ) -> SourceResult<f64> {
        if substance != "N2" {
            return Err(SourceError::UnknownSubstance {
                identifier: substance.to_string(),
            });
        }
        let molar_mass = 28.014e-3;
        match property {
            SourceProperty::MolarMass => Ok(molar_mass),
            SourceProperty::Density => Ok(p_pa * molar_mass / (8.314462618 * t_k)),
            SourceProperty::SpecificHeat => Ok(1040.0),
            SourceProperty::ThermalConductivity => Ok(26e-3),
            SourceProperty::DynamicViscosity => Ok(17.9e-6),
        }
    }
}

#[test]
fn source_backed_gas_queries_the_source() {
    let source = Arc::new(IdealGasSource);
    let n2 = substances::source_backed_gas("N2", source).unwrap();

    assert_eq!(n2.molar_mass, 28.014e-3);

    let s = state(300.0, atm());
    let tol = Tolerances::default();
    let rho = n2.rho(&s).unwrap();
    let expected = atm() * 28.014e-3 / (8.314462618 * 300.0);
    assert!(nearly_equal(rho, expected, tol));

    // nu falls out of the inherited mu / rho rule, pulling both source
    // delegations.
    let nu = n2.nu(&s).unwrap();
    assert!(nearly_equal(nu, 17.9e-6 / expected, tol));
}

#[test]
fn source_backed_gas_clamps_temperature() {
    let source = Arc::new(IdealGasSource);
    let n2 = substances::source_backed_gas("N2", source).unwrap();

    // 100 K is below the 273.16 K validity window; the query is clamped,
    // so the result matches the window edge rather than 100 K.
    let clamped = n2.rho(&state(100.0, atm())).unwrap();
    let at_edge = n2.rho(&state(273.16, atm())).unwrap();
    assert_eq!(clamped, at_edge);
}

#[test]
fn unknown_substance_fails_at_construction() {
    let source = Arc::new(IdealGasSource);
    let err = substances::source_backed_gas("Unobtainium", source).unwrap_err();
    assert!(matches!(
        err,
        MatterError::Source(SourceError::UnknownSubstance { .. })
    ));
}

#[test]
fn source_failure_propagates_from_evaluation() {
    struct FlakySource;
    impl PropertySource for FlakySource {
        fn name(&self) -> &str {
            "flaky"
        }
        fn query(
            &self,
            _substance: &str,
            property: SourceProperty,
            _t_k: f64,
            _p_pa: f64,
        ) -> SourceResult<f64> {
            match property {
                SourceProperty::MolarMass => Ok(4e-3),
                _ => Err(SourceError::Backend {
                    message: "state solver diverged".into(),
                }),
            }
        }
    }

    let he = substances::source_backed_gas("He", Arc::new(FlakySource)).unwrap();
    let err = he.rho(&state(300.0, atm())).unwrap_err();
    assert!(matches!(err, MatterError::Source(SourceError::Backend { .. })));
    assert!(err.to_string().contains("diverged"));
}

#[test]
fn override_after_construction_rewires_dependents() {
    // With rho and mu re-pointed to constants, nu == mu / rho exactly,
    // at arbitrary states.
    let mut fluid = MatterBuilder::new(MatterKind::Liquid, "test-fluid")
        .build()
        .unwrap();
    fluid
        .set_rule(PropertyKey::Rho, CalcRule::Constant(800.0))
        .unwrap();
    fluid
        .set_rule(PropertyKey::Mu, CalcRule::Constant(2.4e-3))
        .unwrap();

    for (t, p) in [(250.0, 5e4), (300.0, atm()), (900.0, 5e7)] {
        let s = state(t, p);
        let nu = fluid.nu(&s).unwrap();
        let mu = fluid.mu(&s).unwrap();
        let rho = fluid.rho(&s).unwrap();
        assert_eq!(nu, mu / rho);
    }
}

#[test]
fn prandtl_number_chains_through_defaults() {
    let fluid = MatterBuilder::new(MatterKind::Gas, "chained")
        .rule(PropertyKey::Rho, CalcRule::Constant(1.2))
        .rule(PropertyKey::CP, CalcRule::Constant(1000.0))
        .rule(PropertyKey::Lambda, CalcRule::Constant(0.026))
        .rule(PropertyKey::Mu, CalcRule::Constant(1.8e-5))
        .build()
        .unwrap();

    let s = state(300.0, atm());
    let a = 0.026 / (1000.0 * 1.2);
    let nu = 1.8e-5 / 1.2;
    let pr = fluid.pr(&s).unwrap();
    assert!((pr - a / nu).abs() < 1e-12);
}

#[test]
fn properties_are_owned_per_instance() {
    // Two airs: overriding one must not affect the other.
    let mut first = substances::air().unwrap();
    let second = substances::air().unwrap();

    first
        .set_rule(PropertyKey::Rho, CalcRule::Constant(999.0))
        .unwrap();

    let s = state(300.0, atm());
    assert_eq!(first.rho(&s).unwrap(), 999.0);
    assert_eq!(second.rho(&s).unwrap(), 1.1614);
}

#[test]
fn out_of_envelope_states_compute_anyway() {
    let air = substances::air().unwrap();
    // 150 degC is outside the advisory envelope but well inside the data
    // tables; evaluation returns a value regardless.
    let t = c2k(150.0);
    assert!(!air.is_in_range("operational", Some(t), None));
    let rho = air.rho(&state(t, atm())).unwrap();
    assert!(rho.is_finite() && rho > 0.0);
}

#[test]
fn mixture_carries_composition_without_validation() {
    // Deliberate gap: fractions are caller-maintained, nothing checks
    // that they sum to one.
    let mix = MatterBuilder::new(MatterKind::Mixture, "flue-gas")
        .composition_entry("N2", 0.8)
        .composition_entry("CO2", 0.9)
        .build()
        .unwrap();
    assert!(mix.is_kind(MatterKind::Mixture));
    assert_eq!(mix.composition.len(), 2);
}

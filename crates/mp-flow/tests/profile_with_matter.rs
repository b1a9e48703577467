//! Pipe profile driven by substance data from mp-matter.

use mp_core::convert::atm;
use mp_core::units::{k, m, m2ps, mps, pa};
use mp_flow::{FlowRegime, TurbulentProfile, axial_velocity, reynolds};
use mp_matter::{StatePoint, substances};

#[test]
fn air_duct_flow_is_turbulent() {
    let air = substances::air().unwrap();
    let state = StatePoint::new(k(300.0), pa(atm()));
    let nu = m2ps(air.nu(&state).unwrap());

    // 10 m/s through a 0.2 m duct: far beyond the laminar threshold.
    let re = reynolds(mps(10.0), m(0.2), nu);
    assert_eq!(FlowRegime::from_reynolds(re), FlowRegime::Turbulent);

    let center = axial_velocity(mps(10.0), m(0.2), m(0.0), nu, TurbulentProfile::default());
    assert!(center.value > 10.0 && center.value < 2.0 * 10.0);

    let wall = axial_velocity(mps(10.0), m(0.2), m(0.1), nu, TurbulentProfile::default());
    assert_eq!(wall.value, 0.0);
}

#[test]
fn molten_iron_capillary_is_laminar() {
    let iron = substances::iron().unwrap();
    let state = StatePoint::new(k(1900.0), pa(atm()));
    let nu = m2ps(iron.nu(&state).unwrap());

    // Slow drain through a narrow channel stays laminar; centerline
    // velocity is exactly twice the mean.
    let v_mean = mps(0.001);
    let d = m(0.002);
    assert_eq!(
        FlowRegime::from_reynolds(reynolds(v_mean, d, nu)),
        FlowRegime::Laminar
    );
    let center = axial_velocity(v_mean, d, m(0.0), nu, TurbulentProfile::default());
    assert!((center.value - 0.002).abs() < 1e-15);
}

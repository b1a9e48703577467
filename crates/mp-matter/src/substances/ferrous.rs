//! Ferrous metals: AISI 304 stainless steel and iron.

use mp_core::convert::{atm, c2k, k2c};

use crate::builder::MatterBuilder;
use crate::error::MatterResult;
use crate::interp::InterpolationTable;
use crate::matter::{Matter, MatterKind, PhaseTransitions};
use crate::property::{CalcRule, PropertyKey};

/// Stainless steel AISI 304 (1.4301, X5CrNi1810).
///
/// Room-temperature constants except for the yield strength, which falls
/// linearly from 200 MPa at 20 °C to 157 MPa at 100 °C.
pub fn aisi304() -> MatterResult<Matter> {
    MatterBuilder::new(MatterKind::Ferrous, "AISI304")
        .version("2017-08-24")
        .comment("1.4301, AISI 304, X5CrNi1810")
        .reference(c2k(20.0), atm())
        .poisson_ratio(0.28)
        .transitions(PhaseTransitions {
            t_sol: c2k(1400.0),
            ..PhaseTransitions::default()
        })
        .rule(PropertyKey::EModulus, CalcRule::Constant(193e9))
        .rule(
            PropertyKey::YieldStrength,
            CalcRule::formula(|t, _p, _x| {
                (k2c(t) - 20.0) / (100.0 - 20.0) * (157e6 - 200e6) + 200e6
            }),
        )
        .rule(PropertyKey::TensileStrength, CalcRule::Constant(600e6))
        .rule(PropertyKey::Beta, CalcRule::Constant(17e-6))
        .rule(PropertyKey::CP, CalcRule::Constant(480.0))
        .rule(PropertyKey::Lambda, CalcRule::Constant(16.0))
        .rule(PropertyKey::Rho, CalcRule::Constant(8030.0))
        .build()
}

/// Iron across the solid-liquid transition.
///
/// Combines the ferrous and liquid categories so both the strength slots
/// and the viscosity slots exist on one instance. Heat capacity and
/// conductivity tables span 300–3000 K; the melt viscosity is an Arrhenius
/// law gated on the deformation temperature, below which the value is a
/// large solid-phase sentinel. The elastic modulus is deliberately left
/// undefined.
pub fn iron() -> MatterResult<Matter> {
    let t_sol = c2k(1430.0);
    let t_liq = t_sol + 50.0;
    let t_deform = t_sol + 0.66 * (t_liq - t_sol);

    // Kubaschewski/Alcock heat capacity data; jumps at the alpha-gamma,
    // gamma-delta and melting transitions.
    let c_p = InterpolationTable::new(
        vec![
            300.0, 600.0, 900.0, 1033.0, 1040.0, 1184.0, 1184.1, 1400.0, 1673.0, 1673.1, 1809.0,
            1809.1, 2000.0, 3000.0,
        ],
        vec![
            430.0, 580.0, 760.0, 1260.0, 1160.0, 720.0, 610.0, 640.0, 680.0, 730.0, 760.0, 790.0,
            790.0, 790.0,
        ],
    )?;

    let lambda = InterpolationTable::new(
        vec![
            300.0, 600.0, 900.0, 1184.0, 1400.0, 1673.0, 1673.1, 1809.0, 1809.1, 2000.0, 3000.0,
        ],
        vec![9.6, 54.6, 37.4, 28.2, 30.6, 33.7, 33.4, 34.6, 40.3, 42.6, 48.0],
    )?;

    MatterBuilder::new(MatterKind::Ferrous, "Fe")
        .with_kind(MatterKind::Liquid)
        .version("2018-01-11")
        .reference(c2k(20.0), atm())
        .molar_mass(55.845e-3)
        .transitions(PhaseTransitions {
            t_sol,
            t_liq,
            t_boil: c2k(2700.0),
            h_melt: 270e3,
            h_vap: 6.35e6,
            ..PhaseTransitions::default()
        })
        .rule(PropertyKey::Beta, CalcRule::Constant(23.1e-6))
        .rule(PropertyKey::CP, CalcRule::Table(c_p))
        .rule(PropertyKey::Lambda, CalcRule::Table(lambda))
        .rule(
            PropertyKey::Mu,
            // Jones: eta0 * exp(E_a / (R T)) for the melt.
            CalcRule::formula(move |t, _p, _x| {
                if t > t_deform {
                    0.3699e-3 * (41.4e3 / (8.3144 * t)).exp()
                } else {
                    1e20
                }
            }),
        )
        .rule(
            PropertyKey::Rho,
            // Steinberg fit; Celsius polynomial, capped at 1600 degC.
            CalcRule::formula(|t, _p, _x| {
                let theta = k2c(t).min(1600.0);
                if theta > 1536.0 {
                    7030.0 - 0.88 * (theta - 1536.0)
                } else if theta > 723.0 {
                    (-1e-4 * theta - 0.2) * theta + 7852.3
                } else {
                    (-1e-4 * theta - 0.3) * theta + 7849.1
                }
            }),
        )
        .rule(
            PropertyKey::RhoEl,
            // Rykalin resistivity fit, Ohm m.
            CalcRule::formula(move |t, _p, _x| {
                let theta = k2c(t).max(20.0);
                if theta < 800.0 {
                    ((1.081e-8 * theta + 2.53e-6) * theta + 1.26e-3) * 1e-4
                } else if t < t_sol {
                    ((-3.75e-9 * theta + 1.2e-5) * theta + 3e-3) * 1e-4
                } else {
                    2.0 * 1.2e-6
                }
            }),
        )
        .build()
}

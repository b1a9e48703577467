//! mp-flow: axial velocity distribution v_z(r) in a pipe.
//!
//! A single regime decision per call: the Reynolds number selects between
//! the parabolic Hagen-Poiseuille profile (laminar) and an empirical
//! power-law profile (turbulent). Nothing is validated and nothing is
//! retained across calls; garbage states (negative viscosity, radii
//! outside the pipe) produce garbage numbers, mirroring the property
//! model's compute-don't-refuse policy.
//!
//! Reference: Glueck, Hydrodynamische und gasdynamische Rohrstroemung,
//! Verlag fuer Bauwesen, Berlin 1988.

use mp_core::units::{KinVisc, Length, Velocity, mps};

/// Reynolds number separating laminar from turbulent pipe flow.
pub const RE_LAMINAR_TURBULENT: f64 = 2300.0;

/// Pipe-flow regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowRegime {
    Laminar,
    Turbulent,
}

impl FlowRegime {
    pub fn from_reynolds(re: f64) -> Self {
        if re < RE_LAMINAR_TURBULENT {
            FlowRegime::Laminar
        } else {
            FlowRegime::Turbulent
        }
    }
}

/// Reynolds number `v_mean * d_pipe / nu` (dimensionless).
pub fn reynolds(v_mean: Velocity, d_pipe: Length, nu: KinVisc) -> f64 {
    v_mean.value * d_pipe.value / nu.value
}

/// Shape parameter of the turbulent power-law profile.
///
/// The profile exponent `m` comes either from a measured friction
/// coefficient (`m = sqrt(lambda)`, 0.01 <= lambda <= 0.1) or from the
/// parabel coefficient `n` (`m = 1/n`; smooth pipe surface n = 6..10,
/// rough surface n = 4). Neither range is enforced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TurbulentProfile {
    FrictionCoeff(f64),
    Exponent(u32),
}

impl Default for TurbulentProfile {
    fn default() -> Self {
        TurbulentProfile::Exponent(6)
    }
}

impl TurbulentProfile {
    /// The power-law exponent `m`.
    pub fn reciprocal_exponent(&self) -> f64 {
        match self {
            TurbulentProfile::FrictionCoeff(lambda) => lambda.sqrt(),
            TurbulentProfile::Exponent(n) => 1.0 / f64::from(*n),
        }
    }
}

/// Axial velocity at radius `r` (0 = centerline) for a pipe of diameter
/// `d_pipe` carrying mean velocity `v_mean`.
///
/// Laminar (`Re < 2300`): `v(r) = 2 v_mean (1 - (2r/d)^2)`.
/// Turbulent: `v(r) = v_max (1 - 2r/d)^m` with
/// `v_max = v_mean (m+2)(m+1)/2`; `profile` only matters here.
pub fn axial_velocity(
    v_mean: Velocity,
    d_pipe: Length,
    r: Length,
    nu: KinVisc,
    profile: TurbulentProfile,
) -> Velocity {
    let re = reynolds(v_mean, d_pipe, nu);
    let v = match FlowRegime::from_reynolds(re) {
        FlowRegime::Laminar => {
            let v_max = 2.0 * v_mean.value;
            v_max * (1.0 - 4.0 * (r.value / d_pipe.value).powi(2))
        }
        FlowRegime::Turbulent => {
            let m = profile.reciprocal_exponent();
            let x = (m + 2.0) * (m + 1.0);
            let v_max = v_mean.value * x / 2.0;
            v_max * (1.0 - 2.0 * r.value / d_pipe.value).powf(m)
        }
    };
    mps(v)
}

//! Matter construction: category contributions, overrides, freeze.

use std::collections::BTreeMap;

use mp_core::convert::{atm, c2k};
use mp_core::units::{k, pa};

use crate::error::{MatterError, MatterResult};
use crate::matter::{EvalCtx, Matter, MatterKind, PhaseTransitions, StatePoint};
use crate::property::{CalcRule, Property, PropertyKey};
use crate::range::Range;

/// Threshold below which an elastic modulus counts as absent when the
/// density default rule is selected.
const E_NEGLIGIBLE: f64 = 1e-20;

/// Builder for a [`Matter`] instance.
///
/// Construction is a fixed sequence: the lineage of the given category
/// tag(s) contributes property slots and default rules root-first, then
/// substance overrides are recorded, then [`build`](Self::build) freezes
/// the instance. Default rules reference sibling properties by late-bound
/// lookup, so overrides recorded in any order behave identically.
#[derive(Debug)]
pub struct MatterBuilder {
    kinds: Vec<MatterKind>,
    identifier: String,
    label: Option<String>,
    comment: Option<String>,
    version: Option<&'static str>,
    t_ref: f64,
    p_ref: f64,
    t_ranges: BTreeMap<String, Range>,
    p_ranges: BTreeMap<String, Range>,
    composition: BTreeMap<String, f64>,
    compressible: bool,
    molar_mass: f64,
    poisson_ratio: f64,
    transitions: PhaseTransitions,
    t_recrystallization: Option<f64>,
    props: BTreeMap<PropertyKey, Property>,
    overrides: Vec<(PropertyKey, CalcRule)>,
}

impl MatterBuilder {
    pub fn new(kind: MatterKind, identifier: impl Into<String>) -> Self {
        let mut builder = Self {
            kinds: Vec::new(),
            identifier: identifier.into(),
            label: None,
            comment: None,
            version: None,
            t_ref: c2k(20.0),
            p_ref: atm(),
            t_ranges: BTreeMap::new(),
            p_ranges: BTreeMap::new(),
            composition: BTreeMap::new(),
            compressible: false,
            molar_mass: 0.0,
            poisson_ratio: 0.0,
            transitions: PhaseTransitions::default(),
            t_recrystallization: None,
            props: BTreeMap::new(),
            overrides: Vec::new(),
        };
        for tag in kind.lineage() {
            builder.apply_kind(tag);
        }
        builder
    }

    /// Apply an additional category lineage (e.g. `Liquid` on top of
    /// `Ferrous` for molten iron). Categories already applied are skipped.
    pub fn with_kind(mut self, kind: MatterKind) -> Self {
        for tag in kind.lineage() {
            if !self.kinds.contains(&tag) {
                self.apply_kind(tag);
            }
        }
        self
    }

    fn apply_kind(&mut self, kind: MatterKind) {
        self.kinds.push(kind);
        match kind {
            MatterKind::Generic => {
                self.props.insert(
                    PropertyKey::Rho,
                    Property::new("rho", "kg/m^3")
                        .label(r"$\varrho$")
                        .comment("density")
                        .reference_value(1.0),
                );
                self.props.insert(
                    PropertyKey::Beta,
                    Property::new("beta", "1/K").label(r"$\beta_{th}$"),
                );
                self.props.insert(
                    PropertyKey::CP,
                    Property::new("c_p", "J/(kg K)").comment("specific heat capacity"),
                );
                self.props.insert(
                    PropertyKey::CSound,
                    Property::new("c_sound", "m/s")
                        .label("$c_{sound}$")
                        .rule(CalcRule::Constant(1.0)),
                );
                self.props.insert(
                    PropertyKey::Lambda,
                    Property::new("lambda", "W/(m K)")
                        .label(r"$\lambda$")
                        .comment("thermal conductivity"),
                );
                self.props.insert(
                    PropertyKey::ThermalDiffusivity,
                    Property::new("a", "m^2/s")
                        .comment("thermal diffusivity")
                        .rule(CalcRule::derived(thermal_diffusivity_default)),
                );
                self.props.insert(
                    PropertyKey::EModulus,
                    Property::new("E", "Pa").comment("Young's (elastic) modulus"),
                );
                self.props.insert(
                    PropertyKey::RhoEl,
                    Property::new("rho_el", "Ohm m")
                        .label(r"$\varrho_{el}$")
                        .comment("electrical resistivity"),
                );
            }
            MatterKind::Solid => {
                self.props.insert(
                    PropertyKey::YieldStrength,
                    Property::new("Rp0.2", "Pa")
                        .label("$R_{p,0.2}$")
                        .comment("yield strength"),
                );
                self.props.insert(
                    PropertyKey::TensileStrength,
                    Property::new("R_m", "Pa")
                        .label("$R_{m}$")
                        .comment("tensile strength"),
                );
                self.props.insert(
                    PropertyKey::CompressiveStrength,
                    Property::new("R_compr", "Pa")
                        .label("$R_{compr}$")
                        .comment("compressive strength"),
                );
                self.t_recrystallization = Some(0.0);
            }
            MatterKind::Fluid => {
                self.props.insert(
                    PropertyKey::Mu,
                    Property::new("mu", "Pa s")
                        .label(r"$\mu$")
                        .comment("dynamic viscosity")
                        .rule(CalcRule::derived(mu_default)),
                );
                self.props.insert(
                    PropertyKey::Nu,
                    Property::new("nu", "m^2/s")
                        .label(r"$\nu$")
                        .comment("kinematic viscosity")
                        .rule(CalcRule::derived(nu_default)),
                );
                self.props.insert(
                    PropertyKey::Pr,
                    Property::new("Pr", "/")
                        .comment("Prandtl number")
                        .rule(CalcRule::derived(pr_default)),
                );
            }
            MatterKind::Liquid => {
                self.t_ref = c2k(20.0);
            }
            MatterKind::Gas => {
                self.t_ref = c2k(15.0);
            }
            // Pure categorization; Mixture deliberately contributes no
            // fraction-consistency check.
            MatterKind::NonMetal
            | MatterKind::Metal
            | MatterKind::NonFerrous
            | MatterKind::Ferrous
            | MatterKind::Mixture => {}
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn version(mut self, version: &'static str) -> Self {
        self.version = Some(version);
        self
    }

    /// Reference state `(T [K], p [Pa])` of the substance.
    pub fn reference(mut self, t_ref_k: f64, p_ref_pa: f64) -> Self {
        self.t_ref = t_ref_k;
        self.p_ref = p_ref_pa;
        self
    }

    /// Operational envelope under the conventional `"operational"` tag.
    pub fn operational_range(self, t: Range, p: Range) -> Self {
        self.t_range("operational", t).p_range("operational", p)
    }

    pub fn t_range(mut self, tag: impl Into<String>, range: Range) -> Self {
        self.t_ranges.insert(tag.into(), range);
        self
    }

    pub fn p_range(mut self, tag: impl Into<String>, range: Range) -> Self {
        self.p_ranges.insert(tag.into(), range);
        self
    }

    pub fn composition_entry(mut self, substance: impl Into<String>, fraction: f64) -> Self {
        self.composition.insert(substance.into(), fraction);
        self
    }

    pub fn compressible(mut self, compressible: bool) -> Self {
        self.compressible = compressible;
        self
    }

    /// Molar mass [kg/mol].
    pub fn molar_mass(mut self, molar_mass: f64) -> Self {
        self.molar_mass = molar_mass;
        self
    }

    pub fn poisson_ratio(mut self, poisson_ratio: f64) -> Self {
        self.poisson_ratio = poisson_ratio;
        self
    }

    pub fn transitions(mut self, transitions: PhaseTransitions) -> Self {
        self.transitions = transitions;
        self
    }

    pub fn t_recrystallization(mut self, t_k: f64) -> Self {
        self.t_recrystallization = Some(t_k);
        self
    }

    /// Record a substance override for a property slot.
    ///
    /// Overrides are applied at `build()`; recording an override for a slot
    /// the lineage never contributed fails the build with
    /// `UnknownProperty`.
    pub fn rule(mut self, key: PropertyKey, rule: CalcRule) -> Self {
        self.overrides.push((key, rule));
        self
    }

    /// Freeze into a [`Matter`].
    ///
    /// Applies the recorded overrides, then makes the one-time structural
    /// choice for the density default rule: if the elastic modulus
    /// evaluates to a non-negligible value at the reference state, the
    /// default divides by the pressure-correction term; otherwise it is
    /// pressure-independent. The choice is not revisited by later
    /// `set_rule` calls.
    pub fn build(self) -> MatterResult<Matter> {
        let mut matter = Matter {
            identifier: self.identifier,
            label: self.label,
            comment: self.comment,
            version: self.version,
            kinds: self.kinds,
            composition: self.composition,
            compressible: self.compressible,
            molar_mass: self.molar_mass,
            poisson_ratio: self.poisson_ratio,
            transitions: self.transitions,
            t_recrystallization: self.t_recrystallization,
            t_ref: self.t_ref,
            p_ref: self.p_ref,
            t_ranges: self.t_ranges,
            p_ranges: self.p_ranges,
            props: self.props,
        };

        let mut rho_overridden = false;
        for (key, rule) in self.overrides {
            if key == PropertyKey::Rho {
                rho_overridden = true;
            }
            let prop = matter
                .property_mut(key)
                .ok_or(MatterError::UnknownProperty { property: key })?;
            prop.set_calc(rule);
        }

        if !rho_overridden {
            let reference = StatePoint::new(k(matter.t_ref()), pa(matter.p_ref()));
            let pressure_term = match matter.eval(PropertyKey::EModulus, &reference) {
                Ok(e) => e.abs() >= E_NEGLIGIBLE,
                Err(_) => false,
            };
            tracing::trace!(
                matter = %matter.identifier(),
                pressure_term,
                "selected density default rule"
            );
            let rule = if pressure_term {
                CalcRule::derived(rho_default_compressible)
            } else {
                CalcRule::derived(rho_default_incompressible)
            };
            matter.set_rule(PropertyKey::Rho, rule)?;
        }

        Ok(matter)
    }
}

// Category-default derived rules. All sibling references go through the
// context so that overrides are visible at evaluation time.

fn rho_default_incompressible(ctx: &mut EvalCtx<'_>) -> MatterResult<f64> {
    let (ref_value, ref_t) = {
        let prop = ctx.property(PropertyKey::Rho)?;
        (prop.ref_value().unwrap_or(1.0), prop.ref_t())
    };
    let beta = ctx.eval(PropertyKey::Beta)?;
    Ok(ref_value / (1.0 + (ctx.t_k() - ref_t) * beta))
}

fn rho_default_compressible(ctx: &mut EvalCtx<'_>) -> MatterResult<f64> {
    let (ref_value, ref_t, ref_p) = {
        let prop = ctx.property(PropertyKey::Rho)?;
        (prop.ref_value().unwrap_or(1.0), prop.ref_t(), prop.ref_p())
    };
    let beta = ctx.eval(PropertyKey::Beta)?;
    let e = ctx.eval(PropertyKey::EModulus)?;
    Ok(ref_value / (1.0 + (ctx.t_k() - ref_t) * beta) / (1.0 - (ctx.p_pa() - ref_p) / e))
}

fn thermal_diffusivity_default(ctx: &mut EvalCtx<'_>) -> MatterResult<f64> {
    Ok(ctx.eval(PropertyKey::Lambda)?
        / (ctx.eval(PropertyKey::CP)? * ctx.eval(PropertyKey::Rho)?))
}

fn mu_default(ctx: &mut EvalCtx<'_>) -> MatterResult<f64> {
    Ok(ctx.eval(PropertyKey::Nu)? * ctx.eval(PropertyKey::Rho)?)
}

fn nu_default(ctx: &mut EvalCtx<'_>) -> MatterResult<f64> {
    Ok(ctx.eval(PropertyKey::Mu)? / ctx.eval(PropertyKey::Rho)?)
}

fn pr_default(ctx: &mut EvalCtx<'_>) -> MatterResult<f64> {
    Ok(ctx.eval(PropertyKey::ThermalDiffusivity)? / ctx.eval(PropertyKey::Nu)?)
}

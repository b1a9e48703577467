//! Matter: a substance or substance category as a set of properties.

use std::collections::BTreeMap;

use mp_core::units::{Pressure, Temperature};

use crate::error::{MatterError, MatterResult};
use crate::property::{CalcRule, Property, PropertyKey};
use crate::range::Range;

/// Category tags of the matter hierarchy.
///
/// Categories form a tree (`Generic` at the root); a matter instance is
/// built by applying the lineage of one or more tags in root-first order,
/// each contributing its property slots and default rules. Combining tags
/// (e.g. `Ferrous` + `Liquid` for molten iron) replaces the diamond
/// inheritance of classical designs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MatterKind {
    /// Root category: generic matter.
    Generic,
    Solid,
    NonMetal,
    Metal,
    NonFerrous,
    Ferrous,
    Fluid,
    Liquid,
    Gas,
    /// Fluid mixture. Carries no fraction-consistency validation; the
    /// composition map is caller-maintained.
    Mixture,
}

impl MatterKind {
    pub fn parent(self) -> Option<MatterKind> {
        match self {
            MatterKind::Generic => None,
            MatterKind::Solid => Some(MatterKind::Generic),
            MatterKind::NonMetal => Some(MatterKind::Solid),
            MatterKind::Metal => Some(MatterKind::Solid),
            MatterKind::NonFerrous => Some(MatterKind::Metal),
            MatterKind::Ferrous => Some(MatterKind::Metal),
            MatterKind::Fluid => Some(MatterKind::Generic),
            MatterKind::Liquid => Some(MatterKind::Fluid),
            MatterKind::Gas => Some(MatterKind::Fluid),
            MatterKind::Mixture => Some(MatterKind::Fluid),
        }
    }

    /// Root-first chain of categories from `Generic` down to `self`.
    pub fn lineage(self) -> Vec<MatterKind> {
        let mut chain = vec![self];
        let mut cursor = self;
        while let Some(parent) = cursor.parent() {
            chain.push(parent);
            cursor = parent;
        }
        chain.reverse();
        chain
    }
}

/// Operating point `(T, p, x)` at which properties are evaluated.
///
/// `x` is a spare state variable (e.g. vapor fraction) passed through to
/// calculation rules unchanged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatePoint {
    pub t: Temperature,
    pub p: Pressure,
    pub x: f64,
}

impl StatePoint {
    pub fn new(t: Temperature, p: Pressure) -> Self {
        Self { t, p, x: 0.0 }
    }

    pub fn with_x(t: Temperature, p: Pressure, x: f64) -> Self {
        Self { t, p, x }
    }

    /// Temperature in kelvin.
    pub fn t_k(&self) -> f64 {
        self.t.value
    }

    /// Pressure in pascal.
    pub fn p_pa(&self) -> f64 {
        self.p.value
    }
}

/// Phase-transition temperatures [K] and latent heats [J/kg].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhaseTransitions {
    pub t_melt: f64,
    pub t_boil: f64,
    pub t_sol: f64,
    pub t_liq: f64,
    pub t_flash: f64,
    pub h_melt: f64,
    pub h_vap: f64,
}

/// A substance or substance category: a fixed set of properties plus
/// scalar physical constants.
///
/// All evaluation is pull-based and side-effect-free: querying a property
/// re-evaluates its current rule from the state, which may in turn pull
/// sibling properties. Nothing is cached.
///
/// Concurrency: concurrent evaluation through `&Matter` is safe; rule
/// replacement requires `&mut Matter`, so the single-writer/many-reader
/// discipline is enforced by the borrow checker. Configure a substance
/// fully, then share it.
#[derive(Debug, Clone)]
pub struct Matter {
    pub(crate) identifier: String,
    pub(crate) label: Option<String>,
    pub(crate) comment: Option<String>,
    pub(crate) version: Option<&'static str>,
    pub(crate) kinds: Vec<MatterKind>,
    /// Substance -> mole/mass fraction, caller-maintained.
    pub composition: BTreeMap<String, f64>,
    pub compressible: bool,
    /// Molar mass [kg/mol].
    pub molar_mass: f64,
    /// Mechanical Poisson ratio [/].
    pub poisson_ratio: f64,
    pub transitions: PhaseTransitions,
    /// Recrystallization temperature [K]; present for solids.
    pub t_recrystallization: Option<f64>,
    pub(crate) t_ref: f64,
    pub(crate) p_ref: f64,
    pub(crate) t_ranges: BTreeMap<String, Range>,
    pub(crate) p_ranges: BTreeMap<String, Range>,
    pub(crate) props: BTreeMap<PropertyKey, Property>,
}

impl Matter {
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.identifier)
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn version(&self) -> Option<&'static str> {
        self.version
    }

    /// Categories applied when this matter was built, root first.
    pub fn kinds(&self) -> &[MatterKind] {
        &self.kinds
    }

    pub fn is_kind(&self, kind: MatterKind) -> bool {
        self.kinds.contains(&kind)
    }

    /// Reference temperature [K].
    pub fn t_ref(&self) -> f64 {
        self.t_ref
    }

    /// Reference pressure [Pa].
    pub fn p_ref(&self) -> f64 {
        self.p_ref
    }

    pub fn property(&self, key: PropertyKey) -> Option<&Property> {
        self.props.get(&key)
    }

    pub fn property_mut(&mut self, key: PropertyKey) -> Option<&mut Property> {
        self.props.get_mut(&key)
    }

    pub fn property_keys(&self) -> impl Iterator<Item = PropertyKey> + '_ {
        self.props.keys().copied()
    }

    /// Replace the calculation rule of a property slot.
    ///
    /// Allowed at any time; derived rules of sibling properties see the new
    /// rule on their next evaluation without re-wiring.
    pub fn set_rule(&mut self, key: PropertyKey, rule: CalcRule) -> MatterResult<()> {
        let prop = self
            .props
            .get_mut(&key)
            .ok_or(MatterError::UnknownProperty { property: key })?;
        if prop.is_defined() {
            tracing::debug!(matter = %self.identifier, property = %key, "replacing calculation rule");
        }
        prop.set_calc(rule);
        Ok(())
    }

    /// Evaluate one property at the given state.
    pub fn eval(&self, key: PropertyKey, state: &StatePoint) -> MatterResult<f64> {
        EvalCtx::new(self, *state).eval(key)
    }

    /// Advisory check of a state against the tagged operational ranges.
    ///
    /// Evaluation never refuses out-of-range states; this is for callers
    /// that care about data trustworthiness. A supplied axis with no range
    /// recorded under `tag` reports `false`.
    pub fn is_in_range(&self, tag: &str, t: Option<f64>, p: Option<f64>) -> bool {
        let t_ok = match t {
            Some(t) => self.t_ranges.get(tag).is_some_and(|r| r.contains(t)),
            None => true,
        };
        let p_ok = match p {
            Some(p) => self.p_ranges.get(tag).is_some_and(|r| r.contains(p)),
            None => true,
        };
        t_ok && p_ok
    }

    pub fn t_range(&self, tag: &str) -> Option<&Range> {
        self.t_ranges.get(tag)
    }

    pub fn p_range(&self, tag: &str) -> Option<&Range> {
        self.p_ranges.get(tag)
    }

    // Convenience accessors, one per property slot.

    pub fn rho(&self, state: &StatePoint) -> MatterResult<f64> {
        self.eval(PropertyKey::Rho, state)
    }

    pub fn beta(&self, state: &StatePoint) -> MatterResult<f64> {
        self.eval(PropertyKey::Beta, state)
    }

    pub fn c_p(&self, state: &StatePoint) -> MatterResult<f64> {
        self.eval(PropertyKey::CP, state)
    }

    pub fn c_sound(&self, state: &StatePoint) -> MatterResult<f64> {
        self.eval(PropertyKey::CSound, state)
    }

    pub fn lambda_(&self, state: &StatePoint) -> MatterResult<f64> {
        self.eval(PropertyKey::Lambda, state)
    }

    pub fn mu(&self, state: &StatePoint) -> MatterResult<f64> {
        self.eval(PropertyKey::Mu, state)
    }

    pub fn nu(&self, state: &StatePoint) -> MatterResult<f64> {
        self.eval(PropertyKey::Nu, state)
    }

    pub fn pr(&self, state: &StatePoint) -> MatterResult<f64> {
        self.eval(PropertyKey::Pr, state)
    }

    pub fn thermal_diffusivity(&self, state: &StatePoint) -> MatterResult<f64> {
        self.eval(PropertyKey::ThermalDiffusivity, state)
    }

    pub fn e_modulus(&self, state: &StatePoint) -> MatterResult<f64> {
        self.eval(PropertyKey::EModulus, state)
    }

    pub fn rho_el(&self, state: &StatePoint) -> MatterResult<f64> {
        self.eval(PropertyKey::RhoEl, state)
    }

    pub fn yield_strength(&self, state: &StatePoint) -> MatterResult<f64> {
        self.eval(PropertyKey::YieldStrength, state)
    }

    pub fn tensile_strength(&self, state: &StatePoint) -> MatterResult<f64> {
        self.eval(PropertyKey::TensileStrength, state)
    }

    pub fn compressive_strength(&self, state: &StatePoint) -> MatterResult<f64> {
        self.eval(PropertyKey::CompressiveStrength, state)
    }
}

/// Per-evaluation context: the owning matter, the state, and the stack of
/// properties currently being evaluated.
///
/// `Derived` rules resolve siblings through [`EvalCtx::eval`], which looks
/// up the *current* rule in the owning matter — this is what makes rule
/// replacement late-bound. Re-entering a property already on the stack
/// fails with `CircularEvaluation` instead of recursing forever.
pub struct EvalCtx<'m> {
    matter: &'m Matter,
    state: StatePoint,
    stack: Vec<PropertyKey>,
}

impl<'m> EvalCtx<'m> {
    pub(crate) fn new(matter: &'m Matter, state: StatePoint) -> Self {
        Self {
            matter,
            state,
            stack: Vec::new(),
        }
    }

    pub fn matter(&self) -> &'m Matter {
        self.matter
    }

    pub fn state(&self) -> StatePoint {
        self.state
    }

    pub fn t_k(&self) -> f64 {
        self.state.t_k()
    }

    pub fn p_pa(&self) -> f64 {
        self.state.p_pa()
    }

    pub fn x(&self) -> f64 {
        self.state.x
    }

    /// Sibling property lookup; fails if the slot is not part of the set.
    pub fn property(&self, key: PropertyKey) -> MatterResult<&'m Property> {
        self.matter
            .property(key)
            .ok_or(MatterError::UnknownProperty { property: key })
    }

    /// Evaluate a sibling property's current rule at this context's state.
    pub fn eval(&mut self, key: PropertyKey) -> MatterResult<f64> {
        let prop = self.property(key)?;
        if self.stack.contains(&key) {
            return Err(MatterError::CircularEvaluation { property: key });
        }
        self.stack.push(key);
        let result = match prop.calc() {
            CalcRule::Unset => Err(MatterError::PropertyNotDefined { property: key }),
            CalcRule::Constant(v) => Ok(*v),
            CalcRule::Table(table) => Ok(table.lookup(self.t_k())),
            CalcRule::Formula(f) => Ok((f.as_ref())(self.t_k(), self.p_pa(), self.x())),
            CalcRule::Derived(f) => (f.as_ref())(self),
            CalcRule::Source {
                source,
                substance,
                property,
                t_clamp,
            } => {
                let t = match t_clamp {
                    Some(clamp) => clamp.clamp(self.t_k()),
                    None => self.t_k(),
                };
                source
                    .query(substance, *property, t, self.p_pa())
                    .map_err(|err| {
                        tracing::debug!(
                            source = source.name(),
                            substance = %substance,
                            property = %property,
                            %err,
                            "external property query failed"
                        );
                        MatterError::Source(err)
                    })
            }
        };
        self.stack.pop();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::MatterBuilder;
    use mp_core::convert::{atm, c2k};
    use mp_core::units::{k, pa};

    fn state(t_k: f64, p_pa: f64) -> StatePoint {
        StatePoint::new(k(t_k), pa(p_pa))
    }

    #[test]
    fn lineage_root_first() {
        assert_eq!(MatterKind::Generic.lineage(), vec![MatterKind::Generic]);
        assert_eq!(
            MatterKind::Ferrous.lineage(),
            vec![
                MatterKind::Generic,
                MatterKind::Solid,
                MatterKind::Metal,
                MatterKind::Ferrous
            ]
        );
        assert_eq!(
            MatterKind::Gas.lineage(),
            vec![MatterKind::Generic, MatterKind::Fluid, MatterKind::Gas]
        );
    }

    #[test]
    fn unset_property_fails_not_zero() {
        let matter = MatterBuilder::new(MatterKind::Generic, "bare").build().unwrap();
        let err = matter.beta(&state(300.0, atm())).unwrap_err();
        assert_eq!(
            err,
            MatterError::PropertyNotDefined {
                property: PropertyKey::Beta
            }
        );
    }

    #[test]
    fn missing_slot_is_unknown_property() {
        // A solid has no viscosity slot at all.
        let matter = MatterBuilder::new(MatterKind::Metal, "slab").build().unwrap();
        let err = matter.mu(&state(300.0, atm())).unwrap_err();
        assert_eq!(
            err,
            MatterError::UnknownProperty {
                property: PropertyKey::Mu
            }
        );
    }

    #[test]
    fn mu_nu_circularity_is_detected() {
        // Bare fluid: neither mu nor nu overridden, both defaults pull the
        // other. Must surface as an error, not a stack overflow.
        let matter = MatterBuilder::new(MatterKind::Fluid, "bare-fluid")
            .build()
            .unwrap();
        let err = matter.nu(&state(300.0, atm())).unwrap_err();
        assert!(matches!(err, MatterError::CircularEvaluation { .. }));
        let err = matter.mu(&state(300.0, atm())).unwrap_err();
        assert!(matches!(err, MatterError::CircularEvaluation { .. }));
    }

    #[test]
    fn overriding_one_of_the_pair_breaks_the_cycle() {
        let mut matter = MatterBuilder::new(MatterKind::Fluid, "fluid")
            .rule(PropertyKey::Rho, CalcRule::Constant(2.0))
            .build()
            .unwrap();
        matter
            .set_rule(PropertyKey::Mu, CalcRule::Constant(10.0))
            .unwrap();

        let s = state(350.0, 2e5);
        assert_eq!(matter.nu(&s).unwrap(), 5.0);
        assert_eq!(matter.mu(&s).unwrap(), 10.0);
    }

    #[test]
    fn late_binding_sees_rule_replacement() {
        let mut matter = MatterBuilder::new(MatterKind::Fluid, "fluid")
            .rule(PropertyKey::Rho, CalcRule::Constant(4.0))
            .rule(PropertyKey::Mu, CalcRule::Constant(8.0))
            .build()
            .unwrap();
        let s = state(300.0, atm());
        assert_eq!(matter.nu(&s).unwrap(), 2.0);

        // Re-pointing rho must be visible through nu's default rule
        // without re-wiring anything.
        matter
            .set_rule(PropertyKey::Rho, CalcRule::Constant(16.0))
            .unwrap();
        assert_eq!(matter.nu(&s).unwrap(), 0.5);
    }

    #[test]
    fn thermal_diffusivity_pulls_current_rules() {
        let matter = MatterBuilder::new(MatterKind::Generic, "block")
            .rule(PropertyKey::Lambda, CalcRule::Constant(16.0))
            .rule(PropertyKey::CP, CalcRule::Constant(500.0))
            .rule(PropertyKey::Rho, CalcRule::Constant(8000.0))
            .build()
            .unwrap();
        let a = matter.thermal_diffusivity(&state(300.0, atm())).unwrap();
        assert!((a - 16.0 / (500.0 * 8000.0)).abs() < 1e-18);
    }

    #[test]
    fn rho_default_without_e_is_pressure_independent() {
        let matter = MatterBuilder::new(MatterKind::Generic, "thing")
            .rule(PropertyKey::Beta, CalcRule::Constant(1e-3))
            .build()
            .unwrap();

        let t = c2k(30.0);
        let expected = 1.0 / (1.0 + (t - c2k(20.0)) * 1e-3);
        let at_atm = matter.rho(&state(t, atm())).unwrap();
        let at_high_p = matter.rho(&state(t, atm() + 1e7)).unwrap();
        assert!((at_atm - expected).abs() < 1e-15);
        assert_eq!(at_atm, at_high_p);
    }

    #[test]
    fn rho_default_with_e_divides_by_pressure_term() {
        let e = 2.2e9;
        let matter = MatterBuilder::new(MatterKind::Generic, "compressible-thing")
            .rule(PropertyKey::Beta, CalcRule::Constant(1e-3))
            .rule(PropertyKey::EModulus, CalcRule::Constant(e))
            .build()
            .unwrap();

        let t = c2k(30.0);
        let p = atm() + 1e5;
        let thermal = 1.0 / (1.0 + (t - c2k(20.0)) * 1e-3);
        let expected = thermal / (1.0 - (p - atm()) / e);
        let got = matter.rho(&state(t, p)).unwrap();
        assert!((got - expected).abs() < 1e-15);
        assert_ne!(got, thermal);
    }

    #[test]
    fn set_rule_rejects_missing_slot() {
        let mut matter = MatterBuilder::new(MatterKind::Generic, "thing").build().unwrap();
        let err = matter
            .set_rule(PropertyKey::Mu, CalcRule::Constant(1.0))
            .unwrap_err();
        assert!(matches!(err, MatterError::UnknownProperty { .. }));
    }

    #[test]
    fn evaluation_does_not_mutate() {
        let matter = MatterBuilder::new(MatterKind::Fluid, "fluid")
            .rule(PropertyKey::Rho, CalcRule::Constant(2.0))
            .rule(PropertyKey::Mu, CalcRule::Constant(6.0))
            .build()
            .unwrap();
        let s = state(300.0, atm());
        let first = matter.nu(&s).unwrap();
        let second = matter.nu(&s).unwrap();
        assert_eq!(first, second);
        assert_eq!(matter.property(PropertyKey::Rho).unwrap().ref_value(), Some(1.0));
    }

    #[test]
    fn is_in_range_advisory() {
        let matter = MatterBuilder::new(MatterKind::Gas, "gas")
            .operational_range(
                Range::new(c2k(0.0), c2k(100.0)),
                Range::new(atm(), 100e5 + atm()),
            )
            .build()
            .unwrap();
        assert!(matter.is_in_range("operational", Some(c2k(50.0)), Some(2e5)));
        assert!(!matter.is_in_range("operational", Some(c2k(150.0)), None));
        assert!(!matter.is_in_range("operational", None, Some(0.5 * atm())));
        assert!(!matter.is_in_range("storage", Some(c2k(50.0)), None));
    }
}

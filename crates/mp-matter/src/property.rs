//! Named, unit-tagged physical quantities with pluggable calculation rules.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::MatterResult;
use crate::interp::InterpolationTable;
use crate::matter::EvalCtx;
use crate::range::Range;
use crate::source::{PropertySource, SourceProperty};

/// Names every property slot the matter hierarchy can contribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PropertyKey {
    /// Density [kg/m^3]
    Rho,
    /// Volumetric thermal expansion coefficient [1/K]
    Beta,
    /// Specific heat capacity [J/(kg K)]
    CP,
    /// Speed of sound [m/s]
    CSound,
    /// Thermal conductivity [W/(m K)]
    Lambda,
    /// Dynamic viscosity [Pa s] (fluids)
    Mu,
    /// Kinematic viscosity [m^2/s] (fluids)
    Nu,
    /// Prandtl number [/] (fluids)
    Pr,
    /// Thermal diffusivity [m^2/s]
    ThermalDiffusivity,
    /// Young's (elastic) modulus [Pa]
    EModulus,
    /// Electrical resistivity [Ohm m]
    RhoEl,
    /// Yield strength R_p0.2 [Pa] (solids)
    YieldStrength,
    /// Tensile strength R_m [Pa] (solids)
    TensileStrength,
    /// Compressive strength [Pa] (solids)
    CompressiveStrength,
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            PropertyKey::Rho => "rho",
            PropertyKey::Beta => "beta",
            PropertyKey::CP => "c_p",
            PropertyKey::CSound => "c_sound",
            PropertyKey::Lambda => "lambda",
            PropertyKey::Mu => "mu",
            PropertyKey::Nu => "nu",
            PropertyKey::Pr => "Pr",
            PropertyKey::ThermalDiffusivity => "a",
            PropertyKey::EModulus => "E",
            PropertyKey::RhoEl => "rho_el",
            PropertyKey::YieldStrength => "Rp0.2",
            PropertyKey::TensileStrength => "R_m",
            PropertyKey::CompressiveStrength => "R_compr",
        };
        f.write_str(symbol)
    }
}

/// Closed-form rule over the raw state `(T [K], p [Pa], x)`.
pub type FormulaFn = Arc<dyn Fn(f64, f64, f64) -> f64 + Send + Sync>;

/// Rule expressed in terms of sibling properties, resolved late through the
/// evaluation context so overrides are visible without re-wiring.
pub type DerivedFn = Arc<dyn Fn(&mut EvalCtx<'_>) -> MatterResult<f64> + Send + Sync>;

/// The calculation strategy currently assigned to a property slot.
#[derive(Clone)]
pub enum CalcRule {
    /// No rule assigned; evaluation fails with `PropertyNotDefined`.
    Unset,
    /// State-independent value.
    Constant(f64),
    /// Measured data with clamped linear interpolation over temperature.
    Table(InterpolationTable),
    /// Closed-form expression of the state.
    Formula(FormulaFn),
    /// Expression over sibling properties of the owning matter.
    Derived(DerivedFn),
    /// Delegation to an external property source, with an optional
    /// temperature clamp applied before querying.
    Source {
        source: Arc<dyn PropertySource>,
        substance: String,
        property: SourceProperty,
        t_clamp: Option<Range>,
    },
}

impl CalcRule {
    pub fn formula(f: impl Fn(f64, f64, f64) -> f64 + Send + Sync + 'static) -> Self {
        CalcRule::Formula(Arc::new(f))
    }

    pub fn derived(
        f: impl Fn(&mut EvalCtx<'_>) -> MatterResult<f64> + Send + Sync + 'static,
    ) -> Self {
        CalcRule::Derived(Arc::new(f))
    }

    pub fn is_set(&self) -> bool {
        !matches!(self, CalcRule::Unset)
    }
}

impl fmt::Debug for CalcRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalcRule::Unset => f.write_str("Unset"),
            CalcRule::Constant(v) => write!(f, "Constant({v})"),
            CalcRule::Table(t) => write!(f, "Table({} samples)", t.len()),
            CalcRule::Formula(_) => f.write_str("Formula(..)"),
            CalcRule::Derived(_) => f.write_str("Derived(..)"),
            CalcRule::Source {
                source,
                substance,
                property,
                ..
            } => write!(f, "Source({}, {substance}, {property})", source.name()),
        }
    }
}

/// A named, unit-tagged scalar quantity owned by exactly one `Matter`.
///
/// Holds a reference state, tagged operational ranges per axis, and the
/// currently assigned calculation rule. Evaluation happens through the
/// owning matter so `Derived` rules can resolve siblings.
#[derive(Debug, Clone)]
pub struct Property {
    name: &'static str,
    unit: &'static str,
    label: Option<&'static str>,
    comment: Option<String>,
    reference_value: Option<f64>,
    reference_t: f64,
    reference_p: f64,
    t_ranges: BTreeMap<String, Range>,
    p_ranges: BTreeMap<String, Range>,
    rule: CalcRule,
}

impl Property {
    pub fn new(name: &'static str, unit: &'static str) -> Self {
        use mp_core::convert::{atm, c2k};
        Self {
            name,
            unit,
            label: None,
            comment: None,
            reference_value: None,
            reference_t: c2k(20.0),
            reference_p: atm(),
            t_ranges: BTreeMap::new(),
            p_ranges: BTreeMap::new(),
            rule: CalcRule::Unset,
        }
    }

    pub fn label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn reference_value(mut self, value: f64) -> Self {
        self.reference_value = Some(value);
        self
    }

    pub fn rule(mut self, rule: CalcRule) -> Self {
        self.rule = rule;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn unit(&self) -> &'static str {
        self.unit
    }

    /// Display label, falling back to the property name.
    pub fn display_label(&self) -> &str {
        self.label.unwrap_or(self.name)
    }

    pub fn comment_text(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn ref_value(&self) -> Option<f64> {
        self.reference_value
    }

    pub fn ref_t(&self) -> f64 {
        self.reference_t
    }

    pub fn ref_p(&self) -> f64 {
        self.reference_p
    }

    pub fn set_ref_value(&mut self, value: Option<f64>) {
        self.reference_value = value;
    }

    pub fn set_ref_state(&mut self, t_k: f64, p_pa: f64) {
        self.reference_t = t_k;
        self.reference_p = p_pa;
    }

    pub fn calc(&self) -> &CalcRule {
        &self.rule
    }

    pub fn set_calc(&mut self, rule: CalcRule) {
        self.rule = rule;
    }

    pub fn is_defined(&self) -> bool {
        self.rule.is_set()
    }

    pub fn set_t_range(&mut self, tag: impl Into<String>, range: Range) {
        self.t_ranges.insert(tag.into(), range);
    }

    pub fn set_p_range(&mut self, tag: impl Into<String>, range: Range) {
        self.p_ranges.insert(tag.into(), range);
    }

    pub fn t_range(&self, tag: &str) -> Option<&Range> {
        self.t_ranges.get(tag)
    }

    pub fn p_range(&self, tag: &str) -> Option<&Range> {
        self.p_ranges.get(tag)
    }

    /// Advisory validity check of a state against the tagged ranges.
    ///
    /// Evaluation never refuses out-of-range inputs; callers consult this
    /// when accuracy matters. A supplied axis with no range recorded under
    /// `tag` reports `false` (nothing known, nothing validated).
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
}

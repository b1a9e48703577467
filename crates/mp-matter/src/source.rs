//! Seam to an external thermodynamic property database.
//!
//! Substances with no local formula or table delegate to a
//! [`PropertySource`] (e.g. a CoolProp-style backend). The core treats the
//! source as opaque: values come back in SI units and failures propagate
//! without local recovery.

use std::fmt;
use thiserror::Error;

/// Result type for property-source queries.
pub type SourceResult<T> = Result<T, SourceError>;

/// Failures from the external property-source collaborator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SourceError {
    /// The source does not know the substance identifier.
    #[error("Unknown substance: {identifier}")]
    UnknownSubstance { identifier: String },

    /// The substance is known but the requested property is not available.
    #[error("Property {property} not available for {identifier}")]
    PropertyUnavailable {
        identifier: String,
        property: SourceProperty,
    },

    /// The source rejected the requested state.
    #[error("State out of range for {identifier}: {what}")]
    OutOfRange {
        identifier: String,
        what: &'static str,
    },

    /// Backend-level failure.
    #[error("Backend error: {message}")]
    Backend { message: String },
}

/// Properties a source can be asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceProperty {
    /// Molar mass [kg/mol]; state arguments are ignored.
    MolarMass,
    /// Mass density [kg/m^3]
    Density,
    /// Specific heat capacity [J/(kg K)]
    SpecificHeat,
    /// Thermal conductivity [W/(m K)]
    ThermalConductivity,
    /// Dynamic viscosity [Pa s]
    DynamicViscosity,
}

impl SourceProperty {
    /// Conventional backend key for the property.
    pub fn key(&self) -> &'static str {
        match self {
            SourceProperty::MolarMass => "molemass",
            SourceProperty::Density => "Dmass",
            SourceProperty::SpecificHeat => "C",
            SourceProperty::ThermalConductivity => "conductivity",
            SourceProperty::DynamicViscosity => "viscosity",
        }
    }
}

impl fmt::Display for SourceProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// External thermodynamic property source.
///
/// Implementations must be thread-safe; a source is shared by every
/// property rule that delegates to it.
pub trait PropertySource: Send + Sync {
    /// Source name (for debugging/logging).
    fn name(&self) -> &str;

    /// Query one property of one substance at `(T [K], p [Pa])`, in SI units.
    fn query(
        &self,
        substance: &str,
        property: SourceProperty,
        t_k: f64,
        p_pa: f64,
    ) -> SourceResult<f64>;
}

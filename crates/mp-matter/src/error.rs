//! Property evaluation errors.

use crate::property::PropertyKey;
use crate::source::SourceError;
use thiserror::Error;

/// Result type for property and matter operations.
pub type MatterResult<T> = Result<T, MatterError>;

/// Errors that can occur while configuring or evaluating matter properties.
///
/// Out-of-range physical states are deliberately *not* errors: tables clamp
/// and formulas extrapolate. Hard failures are reserved for structurally
/// missing or contradictory configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatterError {
    /// The property slot exists but no calculation rule was ever assigned.
    #[error("Property {property} has no calculation rule")]
    PropertyNotDefined { property: PropertyKey },

    /// The property's rule depends on itself through other properties
    /// (e.g. the default mu/nu pair with neither overridden).
    #[error("Circular evaluation detected for property {property}")]
    CircularEvaluation { property: PropertyKey },

    /// The property slot is not part of this matter's property set.
    #[error("Matter has no property slot {property}")]
    UnknownProperty { property: PropertyKey },

    /// Interpolation table construction with malformed samples.
    #[error("Invalid interpolation table: {what}")]
    InvalidTable { what: &'static str },

    /// Failure from the external property-source collaborator.
    #[error(transparent)]
    Source(#[from] SourceError),
}

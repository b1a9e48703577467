//! mp-matter: physical/chemical properties of matter as functions of state.
//!
//! Provides:
//! - `Range` intervals and `InterpolationTable` sample data
//! - `Property` slots with pluggable calculation rules (`CalcRule`)
//! - The matter category hierarchy (`MatterKind`) and `MatterBuilder`
//! - A `PropertySource` seam to external thermodynamic databases
//! - A library of concrete substances (air, argon, AISI 304, iron)
//!
//! # Architecture
//!
//! A [`Matter`] owns a fixed set of [`Property`] slots determined by its
//! category lineage. Each slot carries a replaceable calculation rule;
//! category defaults express derived quantities (thermal diffusivity,
//! the viscosity pair, Prandtl number) in terms of sibling slots, resolved
//! late through the evaluation context so a substance override is visible
//! everywhere immediately. Evaluation is pull-based and never cached.
//!
//! Out-of-envelope states are computed, not refused: tables clamp and
//! formulas extrapolate. Use `is_in_range` when trustworthiness matters.
//!
//! # Example
//!
//! ```
//! use mp_matter::substances;
//! use mp_matter::StatePoint;
//! use mp_core::units::{k, pa};
//!
//! let air = substances::air().unwrap();
//! let state = StatePoint::new(k(300.0), pa(101_325.0));
//! let rho = air.rho(&state).unwrap();
//! assert!(rho > 1.0 && rho < 1.3);
//! ```

pub mod builder;
pub mod error;
pub mod interp;
pub mod matter;
pub mod property;
pub mod range;
pub mod source;
pub mod substances;

// Re-exports for ergonomics
pub use builder::MatterBuilder;
pub use error::{MatterError, MatterResult};
pub use interp::InterpolationTable;
pub use matter::{EvalCtx, Matter, MatterKind, PhaseTransitions, StatePoint};
pub use property::{CalcRule, Property, PropertyKey};
pub use range::Range;
pub use source::{PropertySource, SourceError, SourceProperty, SourceResult};

//! mp-core: stable foundation for matprop.
//!
//! Contains:
//! - units (uom SI types + constructors + temperature/pressure conversions)
//! - numeric (Real + tolerances + float helpers)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{MpError, MpResult};
pub use numeric::*;
pub use units::*;

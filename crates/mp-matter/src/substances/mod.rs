//! Concrete substances built on the category hierarchy.
//!
//! Each constructor applies its category lineage, narrows the operational
//! envelope, and overrides the property rules it has data for; everything
//! else falls back to the inherited defaults.

mod ferrous;
mod gases;

pub use ferrous::{aisi304, iron};
pub use gases::{air, argon, source_backed_gas};

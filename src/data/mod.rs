//! Built-in table data.
//!
//! Production tables are loaded from the generator's JSON bundle (`io::tables`);
//! this module only carries the reduced fixture set used by tests and as the
//! CLI fallback when no bundle is configured.

pub mod fixture;

pub use fixture::*;

//! Forward scoring engine.
//!
//! Responsibilities:
//!
//! - single-table lookups (raw → standard, standard → percentile, raw → age
//!   equivalent, sum → composite)
//! - per-child orchestration with chained provenance and bound-aware domain sums

pub mod calculate;
pub mod lookup;

pub use calculate::*;
pub use lookup::*;

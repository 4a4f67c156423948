//! Reporting utilities: plain-text rendering of scores, goal plans, bands and
//! provenance trails.

pub mod format;

pub use format::*;

//! Domain types used throughout the engine.
//!
//! This module defines:
//!
//! - table cell values (`ParsedNumeric`)
//! - subtest/domain identifiers (`SubtestKey`, `DomainKey`)
//! - reference table shapes (`RawToStandardTable`, etc.)
//! - provenance (`ProvenanceStep`, `ValueWithProvenance`)
//! - run inputs and outputs (`ScoreInput`, `CalculationResult`, `GoalPlan`)

pub mod keys;
pub mod provenance;
pub mod results;
pub mod tables;
pub mod value;

pub use keys::*;
pub use provenance::*;
pub use results::*;
pub use tables::*;
pub use value::*;

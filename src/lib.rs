//! `devscore` library crate.
//!
//! Score-conversion engine for a standardized child-development assessment:
//! raw score → standard score → percentile → age equivalent, plus domain
//! composites, each value carrying a provenance trail back to its source table.
//! Reverse lookups turn a target percentile into the raw scores needed.
//!
//! The binary (`devscore`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the engine can be embedded by other front-ends

pub mod age;
pub mod app;
pub mod cli;
pub mod context;
pub mod data;
pub mod domain;
pub mod error;
pub mod goals;
pub mod io;
pub mod report;
pub mod scoring;

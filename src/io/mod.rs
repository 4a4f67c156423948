//! Input/output helpers.
//!
//! - table bundle JSON read/write (`tables`)
//! - result exports as JSON (`results`)

pub mod results;
pub mod tables;

pub use results::*;
pub use tables::*;

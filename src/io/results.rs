//! Export calculation results and goal plans as JSON.
//!
//! The JSON keeps every `ValueWithProvenance` intact so downstream tools can
//! render the full audit trail.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::AppError;

/// Serialize any result type as pretty JSON.
pub fn to_json_string<T: Serialize>(value: &T) -> Result<String, AppError> {
    serde_json::to_string_pretty(value).map_err(|e| AppError::output(format!("Failed to serialize JSON: {e}")))
}

/// Write any result type as pretty JSON to `path`.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::output(format!("Failed to create '{}': {e}", path.display())))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)
        .map_err(|e| AppError::output(format!("Failed to write JSON: {e}")))?;
    writeln!(writer).map_err(|e| AppError::output(format!("Failed to write JSON: {e}")))?;
    Ok(())
}

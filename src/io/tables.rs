//! Read/write table bundle JSON files.
//!
//! The bundle is produced by the table generator (CSV → JSON) and is the only
//! way production tables enter the engine. The schema is `context::TableBundle`.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::context::{LookupContext, TableBundle};
use crate::error::AppError;

/// Read a table bundle JSON file.
pub fn read_table_bundle(path: &Path) -> Result<TableBundle, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open table bundle '{}': {e}", path.display())))?;
    let bundle: TableBundle = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| AppError::input(format!("Invalid table bundle '{}': {e}", path.display())))?;
    Ok(bundle)
}

/// Read and validate a table bundle into a lookup context.
pub fn load_context(path: &Path) -> Result<LookupContext, AppError> {
    let bundle = read_table_bundle(path)?;
    log::debug!(
        "loaded table bundle '{}' ({} raw-to-standard tables)",
        path.display(),
        bundle.raw_to_standard.len()
    );
    LookupContext::new(bundle)
}

/// Write a table bundle JSON file.
pub fn write_table_bundle(path: &Path, bundle: &TableBundle) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::output(format!("Failed to create table bundle '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(BufWriter::new(file), bundle)
        .map_err(|e| AppError::output(format!("Failed to write table bundle: {e}")))?;
    Ok(())
}

//! JSON document writer.
//!
//! Writes the model's JSON projection to disk with pretty formatting.

use crate::utils::error::OutputError;
use log::{debug, info};
use serde_json::Value;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Write a JSON document produced by the model's `to_json` projection.
///
/// Parent directories are created when missing.
pub fn write_json(document: &Value, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("writing JSON to: {}", output_path.display());
    validate_output_path(output_path)?;

    if let Some(parent) = output_path.parent() {
        if !parent.exists() {
            debug!("creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let file = File::create(output_path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, document)?;
    Ok(())
}

/// Validate that the output path is usable before touching the filesystem.
fn validate_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("path is empty".to_string()));
    }
    if path.exists() && path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "path is a directory: {}",
            path.display()
        )));
    }
    Ok(())
}

//! Show and json command implementations.
//!
//! Both read a binary wire message back; `show` prints the human-readable
//! nested repr, `json` emits the JSON projection to stdout or a file.

use crate::output::{read_device_stats, read_perf_stats, write_json};
use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Print the human-readable repr of a stored stats file.
pub fn execute_show(file: &Path, device: bool) -> Result<()> {
    if device {
        let stats = read_device_stats(file)
            .with_context(|| format!("failed to read device stats from {}", file.display()))?;
        println!("{stats}");
    } else {
        let stats = read_perf_stats(file)
            .with_context(|| format!("failed to read performance stats from {}", file.display()))?;
        println!("{stats}");
    }
    Ok(())
}

/// Emit the JSON projection of a stored stats file.
pub fn execute_json(file: &Path, device: bool, out: Option<PathBuf>) -> Result<()> {
    let document = read_projection(file, device)?;
    match out {
        Some(path) => write_json(&document, &path)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{}", serde_json::to_string_pretty(&document)?),
    }
    Ok(())
}

fn read_projection(file: &Path, device: bool) -> Result<Value> {
    if device {
        let stats = read_device_stats(file)
            .with_context(|| format!("failed to read device stats from {}", file.display()))?;
        Ok(stats.to_json())
    } else {
        let stats = read_perf_stats(file)
            .with_context(|| format!("failed to read performance stats from {}", file.display()))?;
        Ok(stats.to_json())
    }
}

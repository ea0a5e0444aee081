//! Parse command implementation.
//!
//! The parse command:
//! 1. Reads the dump text (and optionally the build-info file)
//! 2. Parses it into a `PerformanceStats`
//! 3. Writes the binary wire message, and optionally the device-wrapped
//!    message and a JSON projection

use crate::output::{write_device_stats, write_json, write_perf_stats};
use crate::parser::{parse_build_info, DumpFormat, DumpParser};
use anyhow::{bail, Context, Result};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

/// Arguments for the parse command
///
/// Constructed from CLI args in main.rs
#[derive(Debug, Clone)]
pub struct ParseArgs {
    /// Path to the dump text file
    pub dump: PathBuf,

    /// Output path for the binary performance-stats message
    pub out: PathBuf,

    /// Optional path to the build-info `key: value` file
    pub build_info: Option<PathBuf>,

    /// Output path for the device-wrapped message (requires build info)
    pub device_out: Option<PathBuf>,

    /// Optional output path for the JSON projection
    pub json: Option<PathBuf>,

    /// Use the legacy percent grammar of older dumps
    pub legacy_percent: bool,
}

/// Execute the parse command.
pub fn execute_parse(args: ParseArgs) -> Result<()> {
    let dump_text = read_text(&args.dump)
        .with_context(|| format!("failed to read dump file {}", args.dump.display()))?;

    let format = if args.legacy_percent {
        DumpFormat::Legacy
    } else {
        DumpFormat::Modern
    };
    let stats = DumpParser::with_format(format).parse(&dump_text);
    if stats.is_empty() {
        bail!("no performance stats parsed, check the input");
    }
    debug!("parsed stats: {stats}");

    write_perf_stats(&stats, &args.out)
        .with_context(|| format!("failed to write {}", args.out.display()))?;
    info!("performance stats written to {}", args.out.display());

    if let Some(build_info_path) = &args.build_info {
        let build_info_text = read_text(build_info_path).with_context(|| {
            format!("failed to read build info file {}", build_info_path.display())
        })?;
        let build_info = parse_build_info(&build_info_text);

        if let Some(device_out) = &args.device_out {
            write_device_stats(&stats, &build_info, device_out)
                .with_context(|| format!("failed to write {}", device_out.display()))?;
            info!("device performance stats written to {}", device_out.display());
        }
    } else if args.device_out.is_some() {
        bail!("--device-out requires --build-info");
    }

    if let Some(json_path) = &args.json {
        write_json(&stats.to_json(), json_path)
            .with_context(|| format!("failed to write {}", json_path.display()))?;
        info!("JSON projection written to {}", json_path.display());
    }

    Ok(())
}

/// Read a text file, ignoring invalid UTF-8 sequences (dumps occasionally
/// carry stray bytes).
fn read_text(path: &Path) -> Result<String> {
    if !path.exists() {
        bail!("file not found: {}", path.display());
    }
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

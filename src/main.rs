//! CarWatchdog Stats CLI
//!
//! Thin wrapper over the library: parse a dumpsys performance-stats report
//! to a binary file, or read a binary file back as text or JSON.

use anyhow::Result;
use carwatchdog_stats::commands::{execute_json, execute_parse, execute_show, ParseArgs};
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

/// CarWatchdog Stats - dump parsing and stats persistence
#[derive(Parser, Debug)]
#[command(name = "carwatchdog-stats")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse a dump text file and write the binary stats file
    Parse {
        /// Path to the CarWatchdog dumpsys output
        #[arg(short, long)]
        dump: PathBuf,

        /// Output path for the binary performance-stats file
        #[arg(short, long, default_value = "perf_stats.bin")]
        out: PathBuf,

        /// Path to the build-info key:value file
        #[arg(short, long)]
        build_info: Option<PathBuf>,

        /// Output path for the device-wrapped stats file (needs --build-info)
        #[arg(long)]
        device_out: Option<PathBuf>,

        /// Also write the JSON projection to this path
        #[arg(short, long)]
        json: Option<PathBuf>,

        /// Dump uses the legacy split percent fields of older builds
        #[arg(long)]
        legacy_percent: bool,
    },

    /// Print a stored binary stats file in human-readable form
    Show {
        /// Path to the binary stats file
        #[arg(short, long)]
        file: PathBuf,

        /// The file holds the device-wrapped schema
        #[arg(long)]
        device: bool,
    },

    /// Emit a stored binary stats file as JSON
    Json {
        /// Path to the binary stats file
        #[arg(short, long)]
        file: PathBuf,

        /// The file holds the device-wrapped schema
        #[arg(long)]
        device: bool,

        /// Write to this path instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Parse {
            dump,
            out,
            build_info,
            device_out,
            json,
            legacy_percent,
        } => {
            execute_parse(ParseArgs {
                dump,
                out,
                build_info,
                device_out,
                json,
                legacy_percent,
            })?;
        }

        Commands::Show { file, device } => {
            execute_show(&file, device)?;
        }

        Commands::Json { file, device, out } => {
            execute_json(&file, device, out)?;
        }
    }

    Ok(())
}

//! CarWatchdog Stats
//!
//! Parses the Android CarWatchdog dumpsys performance-stats report into a
//! structured model, persists it through a binary wire schema, and projects
//! it to JSON.
//!
//! This crate provides the core implementation for the
//! `carwatchdog-stats` CLI tool.
//!
//! ## Getting Started
//!
//! ```ignore
//! use carwatchdog_stats::parser::parse_dump;
//!
//! let stats = parse_dump(&dump_text);
//! if let Some(boot) = stats.boot_time_stats() {
//!     println!("{} boot-time collections", boot.collections.len());
//! }
//! ```

pub mod commands;
pub mod model;
pub mod output;
pub mod parser;
pub mod utils;
pub mod wire;

//! CarWatchdog dump parsing.
//!
//! This module handles:
//! - Parsing the dumpsys performance-stats report into the record model
//! - Parsing the separate build-info `key: value` file
//! - Tolerating the historical variants of the dump grammar

pub mod build_info;
pub mod dump;

// Re-export main entry points
pub use build_info::parse_build_info;
pub use dump::{parse_dump, DumpFormat, DumpParser};

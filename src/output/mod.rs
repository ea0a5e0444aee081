//! Readers and writers for persisted stats.
//!
//! This module handles the file ends of the pipeline:
//! - Binary wire messages (read and write)
//! - JSON documents from the model projection

pub mod binary;
pub mod json;

// Re-export main functions
pub use binary::{read_device_stats, read_perf_stats, write_device_stats, write_perf_stats};
pub use json::write_json;

//! Wire schema and model bridge.
//!
//! This module handles:
//! - Defining the binary-serializable wire messages
//! - Mapping the record model to and from those messages
//! - Guarding against serializing empty stats

pub mod bridge;
pub mod schema;

// Re-export the bridge operations
pub use bridge::{
    deserialize_device_stats, deserialize_perf_stats, serialize_device_stats, serialize_perf_stats,
};

//! Wire schema for persisted performance stats.
//!
//! These structs mirror the binary schema field for field; the model types
//! never touch the disk directly. Encoded with bincode. Two top-level
//! messages exist: a bare `PerformanceStats` and the device-wrapped
//! `DevicePerformanceStats` pairing one build identity with one or more
//! captures.

use serde::{Deserialize, Serialize};

/// Calendar date of a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Date {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

/// Wall-clock time of a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeOfDay {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessCpuStats {
    pub command: String,
    pub cpu_time_ms: i64,
    pub package_cpu_time_percent: f64,
    pub cpu_cycles: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageCpuStats {
    pub user_id: i32,
    pub package_name: String,
    pub cpu_time_ms: i64,
    pub total_cpu_time_percent: f64,
    pub cpu_cycles: i64,
    pub process_cpu_stats: Vec<ProcessCpuStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageStorageIoStats {
    pub user_id: i32,
    pub package_name: String,
    pub fg_bytes: i64,
    pub fg_bytes_percent: f64,
    pub fg_fsync: i64,
    pub fg_fsync_percent: f64,
    pub bg_bytes: i64,
    pub bg_bytes_percent: f64,
    pub bg_fsync: i64,
    pub bg_fsync_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsCollection {
    pub id: i32,
    pub date: Option<Date>,
    pub time: Option<TimeOfDay>,
    pub total_cpu_time_ms: i64,
    pub total_cpu_cycles: i64,
    pub idle_cpu_time_ms: i64,
    pub io_wait_time_ms: i64,
    pub context_switches: i64,
    pub io_blocked_processes: i64,
    pub major_page_faults: i64,
    pub package_cpu_stats: Vec<PackageCpuStats>,
    pub package_storage_io_read_stats: Vec<PackageStorageIoStats>,
    pub package_storage_io_write_stats: Vec<PackageStorageIoStats>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemEventStats {
    pub collections: Vec<StatsCollection>,
}

/// Top-level bare message. Absent aggregates were either missing from the
/// dump or empty at serialization time; the two are indistinguishable here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceStats {
    pub boot_time_stats: Option<SystemEventStats>,
    pub last_n_minutes_stats: Option<SystemEventStats>,
    pub user_switch_stats: Vec<SystemEventStats>,
    pub custom_collection_stats: Option<SystemEventStats>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildInformation {
    pub fingerprint: Option<String>,
    pub brand: Option<String>,
    pub product: Option<String>,
    pub device: Option<String>,
    pub version_release: Option<String>,
    pub id: Option<String>,
    pub version_incremental: Option<String>,
    pub build_type: Option<String>,
    pub tags: Option<String>,
    pub sdk: Option<String>,
    pub platform_minor: Option<String>,
    pub codename: Option<String>,
}

/// Top-level device-wrapped message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DevicePerformanceStats {
    pub build_info: BuildInformation,
    pub perf_stats: Vec<PerformanceStats>,
}

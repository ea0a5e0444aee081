//! Record types for parsed CarWatchdog performance stats.
//!
//! All types are plain owned data, built once by the dump parser or the wire
//! bridge and read-only afterwards. The only behavior they carry is the
//! emptiness checks used to filter noise collections and the JSON projection.

use crate::utils::config::DATETIME_FORMAT;
use chrono::NaiveDateTime;
use serde_json::{json, Value};
use std::fmt;

/// Android build identity, parsed from a separate `key: value` text file.
#[derive(Debug, Clone, Default, PartialEq)]
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

impl BuildInformation {
    pub fn to_json(&self) -> Value {
        json!({
            "fingerprint": self.fingerprint,
            "brand": self.brand,
            "product": self.product,
            "device": self.device,
            "version_release": self.version_release,
            "id": self.id,
            "version_incremental": self.version_incremental,
            "type": self.build_type,
            "tags": self.tags,
            "sdk": self.sdk,
            "platform_minor": self.platform_minor,
            "codename": self.codename,
        })
    }
}

impl fmt::Display for BuildInformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BuildInformation (fingerprint={:?}, brand={:?}, product={:?}, device={:?}, \
             version_release={:?}, id={:?}, version_incremental={:?}, type={:?}, tags={:?}, \
             sdk={:?}, platform_minor={:?}, codename={:?})",
            self.fingerprint,
            self.brand,
            self.product,
            self.device,
            self.version_release,
            self.id,
            self.version_incremental,
            self.build_type,
            self.tags,
            self.sdk,
            self.platform_minor,
            self.codename,
        )
    }
}

/// CPU stats for one top process within a package.
///
/// `cpu_cycles == -1` means the dump predates cycle accounting; it is distinct
/// from a measured zero.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessCpuStats {
    pub command: String,
    pub cpu_time_ms: i64,
    pub package_cpu_time_percent: f64,
    pub cpu_cycles: i64,
}

impl ProcessCpuStats {
    pub fn to_json(&self) -> Value {
        json!({
            "command": self.command,
            "cpu_time_ms": self.cpu_time_ms,
            "package_cpu_time_percent": self.package_cpu_time_percent,
            "cpu_cycles": self.cpu_cycles,
        })
    }
}

impl fmt::Display for ProcessCpuStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ProcessCpuStats (command={}, CPU time={}ms, percent of package's CPU time={}%, \
             CPU cycles={})",
            self.command, self.cpu_time_ms, self.package_cpu_time_percent, self.cpu_cycles
        )
    }
}

/// CPU stats for one top package, with the process breakdown in dump order.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageCpuStats {
    pub user_id: i32,
    pub package_name: String,
    pub cpu_time_ms: i64,
    pub total_cpu_time_percent: f64,
    pub cpu_cycles: i64,
    pub process_cpu_stats: Vec<ProcessCpuStats>,
}

impl PackageCpuStats {
    pub fn to_json(&self) -> Value {
        json!({
            "user_id": self.user_id,
            "package_name": self.package_name,
            "cpu_time_ms": self.cpu_time_ms,
            "total_cpu_time_percent": self.total_cpu_time_percent,
            "cpu_cycles": self.cpu_cycles,
            "process_cpu_stats": self.process_cpu_stats.iter().map(|p| p.to_json()).collect::<Vec<_>>(),
        })
    }
}

impl fmt::Display for PackageCpuStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PackageCpuStats (user id={}, package name={}, CPU time={}ms, \
             percent of total CPU time={}%, CPU cycles={}, process CPU stats=",
            self.user_id,
            self.package_name,
            self.cpu_time_ms,
            self.total_cpu_time_percent,
            self.cpu_cycles
        )?;
        if self.process_cpu_stats.is_empty() {
            write!(f, "[])")
        } else {
            for process in &self.process_cpu_stats {
                write!(f, "\n      {process}")?;
            }
            write!(f, "\n    )")
        }
    }
}

/// One package's storage I/O read or write stats.
#[derive(Debug, Clone, PartialEq)]
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

impl PackageStorageIoStats {
    pub fn to_json(&self) -> Value {
        json!({
            "user_id": self.user_id,
            "package_name": self.package_name,
            "fg_bytes": self.fg_bytes,
            "fg_bytes_percent": self.fg_bytes_percent,
            "fg_fsync": self.fg_fsync,
            "fg_fsync_percent": self.fg_fsync_percent,
            "bg_bytes": self.bg_bytes,
            "bg_bytes_percent": self.bg_bytes_percent,
            "bg_fsync": self.bg_fsync,
            "bg_fsync_percent": self.bg_fsync_percent,
        })
    }
}

impl fmt::Display for PackageStorageIoStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PackageStorageIoStats (user id={}, package name={}, foreground bytes={}, \
             foreground bytes percent={}, foreground fsync={}, foreground fsync percent={}, \
             background bytes={}, background bytes percent={}, background fsync={}, \
             background fsync percent={})",
            self.user_id,
            self.package_name,
            self.fg_bytes,
            self.fg_bytes_percent,
            self.fg_fsync,
            self.fg_fsync_percent,
            self.bg_bytes,
            self.bg_bytes_percent,
            self.bg_fsync,
            self.bg_fsync_percent,
        )
    }
}

/// Stats recorded during a single collection polling.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsCollection {
    pub id: i32,
    pub date: Option<NaiveDateTime>,
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

impl Default for StatsCollection {
    fn default() -> Self {
        Self {
            // -1 marks a collection whose header was never parsed
            id: -1,
            date: None,
            total_cpu_time_ms: 0,
            total_cpu_cycles: 0,
            idle_cpu_time_ms: 0,
            io_wait_time_ms: 0,
            context_switches: 0,
            io_blocked_processes: 0,
            major_page_faults: 0,
            package_cpu_stats: Vec::new(),
            package_storage_io_read_stats: Vec::new(),
            package_storage_io_write_stats: Vec::new(),
        }
    }
}

impl StatsCollection {
    /// True only for the exact conjunction: uninitialized id, absent date,
    /// every counter zero, and all three child lists empty. Used to discard
    /// spurious collections produced by partial headers.
    pub fn is_empty(&self) -> bool {
        let counters = self.total_cpu_time_ms
            + self.total_cpu_cycles
            + self.idle_cpu_time_ms
            + self.io_wait_time_ms
            + self.context_switches
            + self.io_blocked_processes
            + self.major_page_faults;
        self.id == -1
            && self.date.is_none()
            && counters == 0
            && self.package_cpu_stats.is_empty()
            && self.package_storage_io_read_stats.is_empty()
            && self.package_storage_io_write_stats.is_empty()
    }

    fn date_string(&self) -> String {
        self.date
            .map(|d| d.format(DATETIME_FORMAT).to_string())
            .unwrap_or_default()
    }

    pub fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "date": self.date_string(),
            "total_cpu_time_ms": self.total_cpu_time_ms,
            "total_cpu_cycles": self.total_cpu_cycles,
            "idle_cpu_time_ms": self.idle_cpu_time_ms,
            "io_wait_time_ms": self.io_wait_time_ms,
            "context_switches": self.context_switches,
            "io_blocked_processes": self.io_blocked_processes,
            "major_page_faults": self.major_page_faults,
            "package_cpu_stats": self.package_cpu_stats.iter().map(|p| p.to_json()).collect::<Vec<_>>(),
            "package_storage_io_read_stats": self.package_storage_io_read_stats.iter().map(|p| p.to_json()).collect::<Vec<_>>(),
            "package_storage_io_write_stats": self.package_storage_io_write_stats.iter().map(|p| p.to_json()).collect::<Vec<_>>(),
        })
    }
}

impl fmt::Display for StatsCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "StatsCollection (id={}, date={}, total CPU time={}ms, total CPU cycles={}, \
             idle CPU time={}ms, I/O wait time={}ms, total context switches={}, \
             total I/O blocked processes={}, major page faults={}",
            self.id,
            self.date_string(),
            self.total_cpu_time_ms,
            self.total_cpu_cycles,
            self.idle_cpu_time_ms,
            self.io_wait_time_ms,
            self.context_switches,
            self.io_blocked_processes,
            self.major_page_faults,
        )?;
        if !self.package_cpu_stats.is_empty() {
            write!(f, ", package CPU stats=")?;
            for stats in &self.package_cpu_stats {
                write!(f, "\n    {stats}")?;
            }
        }
        if !self.package_storage_io_read_stats.is_empty() {
            write!(f, ", package storage I/O read stats=")?;
            for stats in &self.package_storage_io_read_stats {
                write!(f, "\n    {stats}")?;
            }
        }
        if !self.package_storage_io_write_stats.is_empty() {
            write!(f, ", package storage I/O write stats=")?;
            for stats in &self.package_storage_io_write_stats {
                write!(f, "\n    {stats}")?;
            }
        }
        write!(f, ")")
    }
}

/// Full polling history of one system event (a boot, a user switch, one
/// custom collection run).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SystemEventStats {
    pub collections: Vec<StatsCollection>,
}

impl SystemEventStats {
    pub fn add(&mut self, collection: StatsCollection) {
        self.collections.push(collection);
    }

    pub fn is_empty(&self) -> bool {
        self.collections.iter().all(|c| c.is_empty())
    }

    pub fn to_json(&self) -> Value {
        Value::Array(self.collections.iter().map(|c| c.to_json()).collect())
    }
}

impl fmt::Display for SystemEventStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SystemEventStats (")?;
        for collection in &self.collections {
            writeln!(f, "  {collection}")?;
        }
        write!(f, ")")
    }
}

/// Everything CarWatchdog reported in one dump: up to four system-event
/// aggregates, each independently present or absent.
///
/// Setters store whatever they are given; the getters only expose an
/// aggregate when it is present *and* non-empty, so a section header with no
/// data underneath reads back as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerformanceStats {
    boot_time_stats: Option<SystemEventStats>,
    last_n_minutes_stats: Option<SystemEventStats>,
    user_switch_stats: Vec<SystemEventStats>,
    custom_collection_stats: Option<SystemEventStats>,
}

impl PerformanceStats {
    pub fn set_boot_time_stats(&mut self, stats: SystemEventStats) {
        self.boot_time_stats = Some(stats);
    }

    pub fn set_last_n_minutes_stats(&mut self, stats: SystemEventStats) {
        self.last_n_minutes_stats = Some(stats);
    }

    pub fn add_user_switch_stats(&mut self, stats: SystemEventStats) {
        self.user_switch_stats.push(stats);
    }

    pub fn set_custom_collection_stats(&mut self, stats: SystemEventStats) {
        self.custom_collection_stats = Some(stats);
    }

    pub fn boot_time_stats(&self) -> Option<&SystemEventStats> {
        self.boot_time_stats.as_ref().filter(|s| !s.is_empty())
    }

    pub fn last_n_minutes_stats(&self) -> Option<&SystemEventStats> {
        self.last_n_minutes_stats.as_ref().filter(|s| !s.is_empty())
    }

    pub fn user_switch_stats(&self) -> &[SystemEventStats] {
        &self.user_switch_stats
    }

    pub fn custom_collection_stats(&self) -> Option<&SystemEventStats> {
        self.custom_collection_stats
            .as_ref()
            .filter(|s| !s.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.boot_time_stats().is_none()
            && self.last_n_minutes_stats().is_none()
            && self.custom_collection_stats().is_none()
            && self.user_switch_stats.iter().all(|s| s.is_empty())
    }

    pub fn to_json(&self) -> Value {
        let event_json = |stats: &Option<SystemEventStats>| {
            stats.as_ref().map(|s| s.to_json()).unwrap_or(Value::Null)
        };
        json!({
            "boot_time_stats": event_json(&self.boot_time_stats),
            "last_n_minutes_stats": event_json(&self.last_n_minutes_stats),
            "user_switch_stats": self.user_switch_stats.iter().map(|s| s.to_json()).collect::<Vec<_>>(),
            "custom_collection_stats": event_json(&self.custom_collection_stats),
        })
    }
}

impl fmt::Display for PerformanceStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let event_repr = |stats: &Option<SystemEventStats>| match stats {
            Some(s) => s.to_string(),
            None => "None".to_string(),
        };
        writeln!(f, "PerformanceStats (")?;
        writeln!(f, "boot-time stats={}", event_repr(&self.boot_time_stats))?;
        writeln!(
            f,
            "\nlast n minutes stats={}",
            event_repr(&self.last_n_minutes_stats)
        )?;
        writeln!(f, "\nuser-switch stats=[")?;
        for stats in &self.user_switch_stats {
            writeln!(f, "{stats}")?;
        }
        writeln!(f, "]")?;
        write!(
            f,
            "\ncustom-collection stats={}\n)",
            event_repr(&self.custom_collection_stats)
        )
    }
}

/// One device run: the build identity paired with one or more performance
/// stats captures. Supports comparing stats across runs of the same device.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DevicePerformanceStats {
    pub build_info: BuildInformation,
    pub perf_stats: Vec<PerformanceStats>,
}

impl DevicePerformanceStats {
    pub fn to_json(&self) -> Value {
        json!({
            "build_info": self.build_info.to_json(),
            "perf_stats": self.perf_stats.iter().map(|s| s.to_json()).collect::<Vec<_>>(),
        })
    }
}

impl fmt::Display for DevicePerformanceStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "DevicePerformanceStats (")?;
        writeln!(f, "build_info={}", self.build_info)?;
        writeln!(f, "\nperf_stats=[")?;
        for stats in &self.perf_stats {
            writeln!(f, "{stats}")?;
        }
        write!(f, "]\n)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_collection() -> StatsCollection {
        StatsCollection {
            id: 3,
            date: NaiveDate::from_ymd_opt(2024, 1, 1).and_then(|d| d.and_hms_opt(0, 0, 0)),
            total_cpu_time_ms: 1000,
            ..Default::default()
        }
    }

    #[test]
    fn default_collection_is_empty() {
        assert!(StatsCollection::default().is_empty());
    }

    #[test]
    fn collection_with_id_only_is_not_empty() {
        let collection = StatsCollection {
            id: 3,
            ..Default::default()
        };
        assert!(!collection.is_empty());
    }

    #[test]
    fn collection_with_child_stats_only_is_not_empty() {
        let collection = StatsCollection {
            id: 3,
            package_cpu_stats: vec![PackageCpuStats {
                user_id: 10,
                package_name: "com.example.app".to_string(),
                cpu_time_ms: 0,
                total_cpu_time_percent: 0.0,
                cpu_cycles: 0,
                process_cpu_stats: Vec::new(),
            }],
            ..Default::default()
        };
        assert!(!collection.is_empty());
    }

    #[test]
    fn any_single_counter_flips_emptiness() {
        for field in 0..7 {
            let mut collection = StatsCollection::default();
            match field {
                0 => collection.total_cpu_time_ms = 1,
                1 => collection.total_cpu_cycles = 1,
                2 => collection.idle_cpu_time_ms = 1,
                3 => collection.io_wait_time_ms = 1,
                4 => collection.context_switches = 1,
                5 => collection.io_blocked_processes = 1,
                _ => collection.major_page_faults = 1,
            }
            assert!(!collection.is_empty(), "counter {field} should flip emptiness");
        }
    }

    #[test]
    fn date_alone_flips_emptiness() {
        let mut collection = StatsCollection::default();
        collection.date = NaiveDate::from_ymd_opt(2024, 1, 1).and_then(|d| d.and_hms_opt(0, 0, 0));
        assert!(!collection.is_empty());
    }

    #[test]
    fn system_event_stats_empty_with_only_empty_collections() {
        let mut stats = SystemEventStats::default();
        stats.add(StatsCollection::default());
        assert!(stats.is_empty());

        stats.add(sample_collection());
        assert!(!stats.is_empty());
    }

    #[test]
    fn present_but_empty_aggregate_reads_back_absent() {
        let mut stats = PerformanceStats::default();
        stats.set_boot_time_stats(SystemEventStats::default());
        assert!(stats.boot_time_stats().is_none());
        assert!(stats.is_empty());
    }

    #[test]
    fn non_empty_aggregate_reads_back_present() {
        let mut event = SystemEventStats::default();
        event.add(sample_collection());

        let mut stats = PerformanceStats::default();
        stats.set_boot_time_stats(event);
        assert!(stats.boot_time_stats().is_some());
        assert!(!stats.is_empty());
    }

    #[test]
    fn collection_json_formats_date_and_nests_children() {
        let mut collection = sample_collection();
        collection.package_cpu_stats.push(PackageCpuStats {
            user_id: 10,
            package_name: "com.example.app".to_string(),
            cpu_time_ms: 500,
            total_cpu_time_percent: 50.0,
            cpu_cycles: -1,
            process_cpu_stats: vec![ProcessCpuStats {
                command: "com.example.app_process".to_string(),
                cpu_time_ms: 480,
                package_cpu_time_percent: 96.0,
                cpu_cycles: -1,
            }],
        });

        let value = collection.to_json();
        assert_eq!(value["date"], "2024-01-01 00:00:00");
        assert_eq!(value["total_cpu_time_ms"], 1000);
        assert_eq!(
            value["package_cpu_stats"][0]["process_cpu_stats"][0]["command"],
            "com.example.app_process"
        );
    }

    #[test]
    fn absent_aggregates_project_to_null() {
        let stats = PerformanceStats::default();
        let value = stats.to_json();
        assert_eq!(value["boot_time_stats"], Value::Null);
        assert_eq!(value["custom_collection_stats"], Value::Null);
        assert_eq!(value["user_switch_stats"], json!([]));
    }
}

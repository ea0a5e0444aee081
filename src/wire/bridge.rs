//! Bidirectional mapping between the record model and the wire schema.
//!
//! Serialization is a field-for-field copy with one policy decision: only
//! present, non-empty aggregates are written, so an absent aggregate and an
//! empty-but-present one collapse to the same wire form. Deserialization is
//! the exact inverse and never yields a partially populated record.

use crate::model;
use crate::utils::error::WireError;
use crate::wire::schema;
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

/// Encode a bare performance-stats message.
///
/// Fails with [`WireError::EmptyStats`] instead of writing a degenerate
/// message when nothing was parsed.
pub fn serialize_perf_stats(stats: &model::PerformanceStats) -> Result<Vec<u8>, WireError> {
    let message = perf_stats_to_wire(stats)?;
    bincode::serialize(&message).map_err(WireError::Encode)
}

/// Encode the device-wrapped message: one build identity plus this capture.
pub fn serialize_device_stats(
    stats: &model::PerformanceStats,
    build_info: &model::BuildInformation,
) -> Result<Vec<u8>, WireError> {
    let message = schema::DevicePerformanceStats {
        build_info: build_info_to_wire(build_info),
        perf_stats: vec![perf_stats_to_wire(stats)?],
    };
    bincode::serialize(&message).map_err(WireError::Encode)
}

/// Decode a bare performance-stats message.
pub fn deserialize_perf_stats(bytes: &[u8]) -> Result<model::PerformanceStats, WireError> {
    let message: schema::PerformanceStats =
        bincode::deserialize(bytes).map_err(WireError::Decode)?;
    Ok(perf_stats_from_wire(&message))
}

/// Decode a device-wrapped message.
pub fn deserialize_device_stats(bytes: &[u8]) -> Result<model::DevicePerformanceStats, WireError> {
    let message: schema::DevicePerformanceStats =
        bincode::deserialize(bytes).map_err(WireError::Decode)?;
    Ok(model::DevicePerformanceStats {
        build_info: build_info_from_wire(&message.build_info),
        perf_stats: message.perf_stats.iter().map(perf_stats_from_wire).collect(),
    })
}

fn perf_stats_to_wire(
    stats: &model::PerformanceStats,
) -> Result<schema::PerformanceStats, WireError> {
    if stats.is_empty() {
        return Err(WireError::EmptyStats);
    }
    Ok(schema::PerformanceStats {
        boot_time_stats: stats.boot_time_stats().map(system_event_to_wire),
        last_n_minutes_stats: stats.last_n_minutes_stats().map(system_event_to_wire),
        user_switch_stats: stats
            .user_switch_stats()
            .iter()
            .filter(|s| !s.is_empty())
            .map(system_event_to_wire)
            .collect(),
        custom_collection_stats: stats.custom_collection_stats().map(system_event_to_wire),
    })
}

fn perf_stats_from_wire(message: &schema::PerformanceStats) -> model::PerformanceStats {
    let mut stats = model::PerformanceStats::default();
    if let Some(event) = message.boot_time_stats.as_ref().and_then(system_event_from_wire) {
        stats.set_boot_time_stats(event);
    }
    if let Some(event) = message
        .last_n_minutes_stats
        .as_ref()
        .and_then(system_event_from_wire)
    {
        stats.set_last_n_minutes_stats(event);
    }
    for wire_event in &message.user_switch_stats {
        if let Some(event) = system_event_from_wire(wire_event) {
            stats.add_user_switch_stats(event);
        }
    }
    if let Some(event) = message
        .custom_collection_stats
        .as_ref()
        .and_then(system_event_from_wire)
    {
        stats.set_custom_collection_stats(event);
    }
    stats
}

fn system_event_to_wire(stats: &model::SystemEventStats) -> schema::SystemEventStats {
    schema::SystemEventStats {
        collections: stats.collections.iter().map(collection_to_wire).collect(),
    }
}

/// `None` when the wire message carries no collections, so an empty message
/// reads back as an absent aggregate.
fn system_event_from_wire(message: &schema::SystemEventStats) -> Option<model::SystemEventStats> {
    if message.collections.is_empty() {
        return None;
    }
    Some(model::SystemEventStats {
        collections: message.collections.iter().map(collection_from_wire).collect(),
    })
}

fn collection_to_wire(collection: &model::StatsCollection) -> schema::StatsCollection {
    let (date, time) = match collection.date {
        Some(datetime) => {
            let (d, t) = split_datetime(datetime);
            (Some(d), Some(t))
        }
        None => (None, None),
    };
    schema::StatsCollection {
        id: collection.id,
        date,
        time,
        total_cpu_time_ms: collection.total_cpu_time_ms,
        total_cpu_cycles: collection.total_cpu_cycles,
        idle_cpu_time_ms: collection.idle_cpu_time_ms,
        io_wait_time_ms: collection.io_wait_time_ms,
        context_switches: collection.context_switches,
        io_blocked_processes: collection.io_blocked_processes,
        major_page_faults: collection.major_page_faults,
        package_cpu_stats: collection
            .package_cpu_stats
            .iter()
            .map(package_cpu_to_wire)
            .collect(),
        package_storage_io_read_stats: collection
            .package_storage_io_read_stats
            .iter()
            .map(storage_io_to_wire)
            .collect(),
        package_storage_io_write_stats: collection
            .package_storage_io_write_stats
            .iter()
            .map(storage_io_to_wire)
            .collect(),
    }
}

fn collection_from_wire(message: &schema::StatsCollection) -> model::StatsCollection {
    model::StatsCollection {
        id: message.id,
        date: join_datetime(message.date, message.time),
        total_cpu_time_ms: message.total_cpu_time_ms,
        total_cpu_cycles: message.total_cpu_cycles,
        idle_cpu_time_ms: message.idle_cpu_time_ms,
        io_wait_time_ms: message.io_wait_time_ms,
        context_switches: message.context_switches,
        io_blocked_processes: message.io_blocked_processes,
        major_page_faults: message.major_page_faults,
        package_cpu_stats: message
            .package_cpu_stats
            .iter()
            .map(package_cpu_from_wire)
            .collect(),
        package_storage_io_read_stats: message
            .package_storage_io_read_stats
            .iter()
            .map(storage_io_from_wire)
            .collect(),
        package_storage_io_write_stats: message
            .package_storage_io_write_stats
            .iter()
            .map(storage_io_from_wire)
            .collect(),
    }
}

fn package_cpu_to_wire(stats: &model::PackageCpuStats) -> schema::PackageCpuStats {
    schema::PackageCpuStats {
        user_id: stats.user_id,
        package_name: stats.package_name.clone(),
        cpu_time_ms: stats.cpu_time_ms,
        total_cpu_time_percent: stats.total_cpu_time_percent,
        cpu_cycles: stats.cpu_cycles,
        process_cpu_stats: stats
            .process_cpu_stats
            .iter()
            .map(process_cpu_to_wire)
            .collect(),
    }
}

fn package_cpu_from_wire(message: &schema::PackageCpuStats) -> model::PackageCpuStats {
    model::PackageCpuStats {
        user_id: message.user_id,
        package_name: message.package_name.clone(),
        cpu_time_ms: message.cpu_time_ms,
        total_cpu_time_percent: message.total_cpu_time_percent,
        cpu_cycles: message.cpu_cycles,
        process_cpu_stats: message
            .process_cpu_stats
            .iter()
            .map(process_cpu_from_wire)
            .collect(),
    }
}

fn process_cpu_to_wire(stats: &model::ProcessCpuStats) -> schema::ProcessCpuStats {
    schema::ProcessCpuStats {
        command: stats.command.clone(),
        cpu_time_ms: stats.cpu_time_ms,
        package_cpu_time_percent: stats.package_cpu_time_percent,
        cpu_cycles: stats.cpu_cycles,
    }
}

fn process_cpu_from_wire(message: &schema::ProcessCpuStats) -> model::ProcessCpuStats {
    model::ProcessCpuStats {
        command: message.command.clone(),
        cpu_time_ms: message.cpu_time_ms,
        package_cpu_time_percent: message.package_cpu_time_percent,
        cpu_cycles: message.cpu_cycles,
    }
}

fn storage_io_to_wire(stats: &model::PackageStorageIoStats) -> schema::PackageStorageIoStats {
    schema::PackageStorageIoStats {
        user_id: stats.user_id,
        package_name: stats.package_name.clone(),
        fg_bytes: stats.fg_bytes,
        fg_bytes_percent: stats.fg_bytes_percent,
        fg_fsync: stats.fg_fsync,
        fg_fsync_percent: stats.fg_fsync_percent,
        bg_bytes: stats.bg_bytes,
        bg_bytes_percent: stats.bg_bytes_percent,
        bg_fsync: stats.bg_fsync,
        bg_fsync_percent: stats.bg_fsync_percent,
    }
}

fn storage_io_from_wire(message: &schema::PackageStorageIoStats) -> model::PackageStorageIoStats {
    model::PackageStorageIoStats {
        user_id: message.user_id,
        package_name: message.package_name.clone(),
        fg_bytes: message.fg_bytes,
        fg_bytes_percent: message.fg_bytes_percent,
        fg_fsync: message.fg_fsync,
        fg_fsync_percent: message.fg_fsync_percent,
        bg_bytes: message.bg_bytes,
        bg_bytes_percent: message.bg_bytes_percent,
        bg_fsync: message.bg_fsync,
        bg_fsync_percent: message.bg_fsync_percent,
    }
}

fn build_info_to_wire(build_info: &model::BuildInformation) -> schema::BuildInformation {
    schema::BuildInformation {
        fingerprint: build_info.fingerprint.clone(),
        brand: build_info.brand.clone(),
        product: build_info.product.clone(),
        device: build_info.device.clone(),
        version_release: build_info.version_release.clone(),
        id: build_info.id.clone(),
        version_incremental: build_info.version_incremental.clone(),
        build_type: build_info.build_type.clone(),
        tags: build_info.tags.clone(),
        sdk: build_info.sdk.clone(),
        platform_minor: build_info.platform_minor.clone(),
        codename: build_info.codename.clone(),
    }
}

fn build_info_from_wire(message: &schema::BuildInformation) -> model::BuildInformation {
    model::BuildInformation {
        fingerprint: message.fingerprint.clone(),
        brand: message.brand.clone(),
        product: message.product.clone(),
        device: message.device.clone(),
        version_release: message.version_release.clone(),
        id: message.id.clone(),
        version_incremental: message.version_incremental.clone(),
        build_type: message.build_type.clone(),
        tags: message.tags.clone(),
        sdk: message.sdk.clone(),
        platform_minor: message.platform_minor.clone(),
        codename: message.codename.clone(),
    }
}

fn split_datetime(datetime: NaiveDateTime) -> (schema::Date, schema::TimeOfDay) {
    (
        schema::Date {
            year: datetime.year(),
            month: datetime.month(),
            day: datetime.day(),
        },
        schema::TimeOfDay {
            hours: datetime.hour(),
            minutes: datetime.minute(),
            seconds: datetime.second(),
        },
    )
}

/// Rebuild the timestamp; time defaults to midnight when absent. Out-of-range
/// wire values leave the date absent rather than failing the decode.
fn join_datetime(
    date: Option<schema::Date>,
    time: Option<schema::TimeOfDay>,
) -> Option<NaiveDateTime> {
    let date = date?;
    let time = time.unwrap_or(schema::TimeOfDay {
        hours: 0,
        minutes: 0,
        seconds: 0,
    });
    NaiveDate::from_ymd_opt(date.year, date.month, date.day)
        .and_then(|d| d.and_hms_opt(time.hours, time.minutes, time.seconds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_perf_stats() -> model::PerformanceStats {
        let collection = model::StatsCollection {
            id: 1,
            date: NaiveDate::from_ymd_opt(2024, 1, 1).and_then(|d| d.and_hms_opt(12, 30, 45)),
            total_cpu_time_ms: 1000,
            total_cpu_cycles: 5_000_000,
            idle_cpu_time_ms: 200,
            io_wait_time_ms: 50,
            context_switches: 4000,
            io_blocked_processes: 2,
            major_page_faults: 17,
            package_cpu_stats: vec![model::PackageCpuStats {
                user_id: 10,
                package_name: "com.example.app".to_string(),
                cpu_time_ms: 500,
                total_cpu_time_percent: 50.0,
                cpu_cycles: 12345,
                process_cpu_stats: vec![model::ProcessCpuStats {
                    command: "com.example.app_process".to_string(),
                    cpu_time_ms: 480,
                    package_cpu_time_percent: 96.0,
                    cpu_cycles: 12000,
                }],
            }],
            package_storage_io_read_stats: vec![model::PackageStorageIoStats {
                user_id: 10,
                package_name: "com.example.app".to_string(),
                fg_bytes: 4096,
                fg_bytes_percent: 80.0,
                fg_fsync: 10,
                fg_fsync_percent: 50.0,
                bg_bytes: 1024,
                bg_bytes_percent: 20.0,
                bg_fsync: 2,
                bg_fsync_percent: 25.0,
            }],
            package_storage_io_write_stats: Vec::new(),
        };

        let mut event = model::SystemEventStats::default();
        event.add(collection);

        let mut stats = model::PerformanceStats::default();
        stats.set_boot_time_stats(event);
        stats
    }

    #[test]
    fn round_trip_reproduces_every_field() {
        let stats = sample_perf_stats();
        let bytes = serialize_perf_stats(&stats).expect("serialize");
        let decoded = deserialize_perf_stats(&bytes).expect("deserialize");
        assert_eq!(decoded, stats);
    }

    #[test]
    fn round_trip_preserves_user_switch_events() {
        let mut stats = sample_perf_stats();
        let mut user_switch = model::SystemEventStats::default();
        user_switch.add(model::StatsCollection {
            id: 7,
            total_cpu_time_ms: 11,
            ..Default::default()
        });
        stats.add_user_switch_stats(user_switch);

        let bytes = serialize_perf_stats(&stats).expect("serialize");
        let decoded = deserialize_perf_stats(&bytes).expect("deserialize");
        assert_eq!(decoded.user_switch_stats().len(), 1);
        assert_eq!(decoded, stats);
    }

    #[test]
    fn empty_stats_refuse_to_serialize() {
        let stats = model::PerformanceStats::default();
        assert!(matches!(
            serialize_perf_stats(&stats),
            Err(WireError::EmptyStats)
        ));
    }

    #[test]
    fn present_but_empty_aggregate_becomes_absent_after_round_trip() {
        let mut stats = sample_perf_stats();
        // Present but empty: dropped at serialization time, by contract
        stats.set_custom_collection_stats(model::SystemEventStats::default());

        let bytes = serialize_perf_stats(&stats).expect("serialize");
        let decoded = deserialize_perf_stats(&bytes).expect("deserialize");
        assert!(decoded.custom_collection_stats().is_none());
        assert!(decoded.boot_time_stats().is_some());
        // The raw storage differs (Some(empty) vs None), so decoded != stats
        assert_ne!(decoded, stats);
    }

    #[test]
    fn device_round_trip_carries_build_info() {
        let stats = sample_perf_stats();
        let build_info = model::BuildInformation {
            fingerprint: Some("google/car/emulator:userdebug".to_string()),
            brand: Some("google".to_string()),
            sdk: Some("34".to_string()),
            ..Default::default()
        };

        let bytes = serialize_device_stats(&stats, &build_info).expect("serialize");
        let decoded = deserialize_device_stats(&bytes).expect("deserialize");
        assert_eq!(decoded.build_info, build_info);
        assert_eq!(decoded.perf_stats, vec![stats]);
    }

    #[test]
    fn garbage_bytes_fail_with_decode_error() {
        let garbage = b"not a performance stats message at all";
        assert!(matches!(
            deserialize_perf_stats(garbage),
            Err(WireError::Decode(_))
        ));
    }
}

use carwatchdog_stats::model::{
    BuildInformation, PackageCpuStats, PackageStorageIoStats, PerformanceStats, ProcessCpuStats,
    StatsCollection, SystemEventStats,
};
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use serde_json::Value;

fn sample_date() -> Option<chrono::NaiveDateTime> {
    NaiveDate::from_ymd_opt(2024, 6, 2).and_then(|d| d.and_hms_opt(8, 15, 0))
}

#[test]
fn emptiness_requires_the_full_conjunction() {
    // Uninitialized in every respect: empty.
    assert!(StatsCollection::default().is_empty());

    // Each single deviation from the default makes it non-empty.
    let with_id = StatsCollection {
        id: 3,
        ..Default::default()
    };
    assert!(!with_id.is_empty());

    let with_date = StatsCollection {
        date: sample_date(),
        ..Default::default()
    };
    assert!(!with_date.is_empty());

    let with_counter = StatsCollection {
        major_page_faults: 1,
        ..Default::default()
    };
    assert!(!with_counter.is_empty());

    let with_reads = StatsCollection {
        package_storage_io_read_stats: vec![PackageStorageIoStats {
            user_id: 10,
            package_name: "com.example.app".to_string(),
            fg_bytes: 0,
            fg_bytes_percent: 0.0,
            fg_fsync: 0,
            fg_fsync_percent: 0.0,
            bg_bytes: 0,
            bg_bytes_percent: 0.0,
            bg_fsync: 0,
            bg_fsync_percent: 0.0,
        }],
        ..Default::default()
    };
    assert!(!with_reads.is_empty());
}

#[test]
fn aggregate_of_empty_collections_is_empty() {
    let mut event = SystemEventStats::default();
    assert!(event.is_empty());

    event.add(StatsCollection::default());
    event.add(StatsCollection::default());
    assert!(event.is_empty());

    event.add(StatsCollection {
        id: 0,
        total_cpu_time_ms: 1,
        ..Default::default()
    });
    assert!(!event.is_empty());
}

#[test]
fn getters_hide_empty_aggregates() {
    let mut stats = PerformanceStats::default();
    stats.set_boot_time_stats(SystemEventStats::default());
    stats.set_last_n_minutes_stats(SystemEventStats::default());
    stats.set_custom_collection_stats(SystemEventStats::default());

    assert!(stats.boot_time_stats().is_none());
    assert!(stats.last_n_minutes_stats().is_none());
    assert!(stats.custom_collection_stats().is_none());
    assert!(stats.is_empty());

    let mut event = SystemEventStats::default();
    event.add(StatsCollection {
        id: 0,
        context_switches: 31_125,
        ..Default::default()
    });
    stats.set_last_n_minutes_stats(event);

    assert!(stats.last_n_minutes_stats().is_some());
    assert!(!stats.is_empty());
}

#[test]
fn json_projection_uses_wall_clock_date_format() {
    let collection = StatsCollection {
        id: 3,
        date: sample_date(),
        total_cpu_time_ms: 64567,
        ..Default::default()
    };
    let value = collection.to_json();

    assert_eq!(value["id"], 3);
    assert_eq!(value["date"], "2024-06-02 08:15:00");
    assert_eq!(value["total_cpu_time_ms"], 64567);

    let undated = StatsCollection {
        id: 4,
        total_cpu_time_ms: 1,
        ..Default::default()
    };
    assert_eq!(undated.to_json()["date"], "");
}

#[test]
fn json_projection_nests_package_and_process_stats() {
    let collection = StatsCollection {
        id: 0,
        package_cpu_stats: vec![PackageCpuStats {
            user_id: 10,
            package_name: "com.google.android.car.kitchensink".to_string(),
            cpu_time_ms: 15000,
            total_cpu_time_percent: 23.23,
            cpu_cycles: -1,
            process_cpu_stats: vec![ProcessCpuStats {
                command: "KitchenSinkApp".to_string(),
                cpu_time_ms: 14000,
                package_cpu_time_percent: 93.33,
                cpu_cycles: -1,
            }],
        }],
        ..Default::default()
    };

    let value = collection.to_json();
    let package = &value["package_cpu_stats"][0];
    assert_eq!(package["package_name"], "com.google.android.car.kitchensink");
    assert_eq!(package["cpu_cycles"], -1);
    assert_eq!(package["process_cpu_stats"][0]["command"], "KitchenSinkApp");
    assert_eq!(package["process_cpu_stats"][0]["package_cpu_time_percent"], 93.33);
}

#[test]
fn build_info_json_maps_type_keyword() {
    let build_info = BuildInformation {
        build_type: Some("userdebug".to_string()),
        sdk: Some("34".to_string()),
        ..Default::default()
    };
    let value = build_info.to_json();

    assert_eq!(value["type"], "userdebug");
    assert_eq!(value["sdk"], "34");
    assert_eq!(value["fingerprint"], Value::Null);
}

#[test]
fn display_renders_nested_structure() {
    let mut event = SystemEventStats::default();
    event.add(StatsCollection {
        id: 0,
        date: sample_date(),
        total_cpu_time_ms: 1000,
        ..Default::default()
    });
    let mut stats = PerformanceStats::default();
    stats.set_boot_time_stats(event);

    let rendered = stats.to_string();
    assert!(rendered.contains("PerformanceStats ("));
    assert!(rendered.contains("boot-time stats=SystemEventStats ("));
    assert!(rendered.contains("id=0, date=2024-06-02 08:15:00"));
    assert!(rendered.contains("custom-collection stats=None"));
}

//! Binary wire-message file I/O.
//!
//! Reads check for file existence up front so a missing file is reported as
//! such rather than surfacing as a decode failure. File handles are scoped
//! to each call.

use crate::model::{BuildInformation, DevicePerformanceStats, PerformanceStats};
use crate::utils::error::OutputError;
use crate::wire;
use log::{debug, info};
use std::fs;
use std::path::Path;

/// Write a bare performance-stats message.
///
/// Refuses empty stats (via the bridge guard); nothing is written on error.
pub fn write_perf_stats(
    stats: &PerformanceStats,
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();
    let bytes = wire::serialize_perf_stats(stats)?;
    info!(
        "writing performance stats to {} ({} bytes)",
        output_path.display(),
        bytes.len()
    );
    fs::write(output_path, bytes)?;
    Ok(())
}

/// Write the device-wrapped message pairing stats with build info.
pub fn write_device_stats(
    stats: &PerformanceStats,
    build_info: &BuildInformation,
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();
    let bytes = wire::serialize_device_stats(stats, build_info)?;
    info!(
        "writing device performance stats to {} ({} bytes)",
        output_path.display(),
        bytes.len()
    );
    fs::write(output_path, bytes)?;
    Ok(())
}

/// Read a bare performance-stats message back into the model.
pub fn read_perf_stats(input_path: impl AsRef<Path>) -> Result<PerformanceStats, OutputError> {
    let input_path = input_path.as_ref();
    let bytes = read_bytes(input_path)?;
    let stats = wire::deserialize_perf_stats(&bytes)?;
    debug!("read performance stats from {}", input_path.display());
    Ok(stats)
}

/// Read a device-wrapped message back into the model.
pub fn read_device_stats(
    input_path: impl AsRef<Path>,
) -> Result<DevicePerformanceStats, OutputError> {
    let input_path = input_path.as_ref();
    let bytes = read_bytes(input_path)?;
    let stats = wire::deserialize_device_stats(&bytes)?;
    debug!("read device performance stats from {}", input_path.display());
    Ok(stats)
}

fn read_bytes(path: &Path) -> Result<Vec<u8>, OutputError> {
    if !path.exists() {
        return Err(OutputError::FileNotFound(path.to_path_buf()));
    }
    Ok(fs::read(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{StatsCollection, SystemEventStats};
    use crate::utils::error::WireError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn sample_stats() -> PerformanceStats {
        let mut event = SystemEventStats::default();
        event.add(StatsCollection {
            id: 1,
            total_cpu_time_ms: 1000,
            ..Default::default()
        });
        let mut stats = PerformanceStats::default();
        stats.set_boot_time_stats(event);
        stats
    }

    #[test]
    fn write_and_read_perf_stats_file() {
        let stats = sample_stats();
        let temp_file = NamedTempFile::new().unwrap();

        write_perf_stats(&stats, temp_file.path()).unwrap();
        let loaded = read_perf_stats(temp_file.path()).unwrap();
        assert_eq!(loaded, stats);
    }

    #[test]
    fn write_and_read_device_stats_file() {
        let stats = sample_stats();
        let build_info = BuildInformation {
            brand: Some("google".to_string()),
            ..Default::default()
        };
        let temp_file = NamedTempFile::new().unwrap();

        write_device_stats(&stats, &build_info, temp_file.path()).unwrap();
        let loaded = read_device_stats(temp_file.path()).unwrap();
        assert_eq!(loaded.build_info.brand.as_deref(), Some("google"));
        assert_eq!(loaded.perf_stats.len(), 1);
    }

    #[test]
    fn missing_file_is_reported_before_decoding() {
        let result = read_perf_stats("/nonexistent/perf_stats.bin");
        assert!(matches!(result, Err(OutputError::FileNotFound(_))));
    }

    #[test]
    fn corrupt_file_is_a_decode_error() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"definitely not a wire message").unwrap();

        let result = read_perf_stats(temp_file.path());
        assert!(matches!(
            result,
            Err(OutputError::Wire(WireError::Decode(_)))
        ));
    }

    #[test]
    fn empty_stats_write_nothing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("perf_stats.bin");

        let result = write_perf_stats(&PerformanceStats::default(), &path);
        assert!(matches!(
            result,
            Err(OutputError::Wire(WireError::EmptyStats))
        ));
        assert!(!path.exists());
    }
}

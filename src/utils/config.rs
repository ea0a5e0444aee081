//! Constants for the dump grammar and output formats.

/// Header of the boot-time section. Two historical spellings exist.
pub const BOOT_TIME_REPORT_HEADER_PATTERN: &str = r"Boot-time (?:performance|collection) report:";

/// Headers of the periodic section. The label changed across releases.
pub const PERIODIC_COLLECTION_HEADER: &str = "Periodic collection report:";
pub const LAST_N_MINUTES_COLLECTION_HEADER: &str = "Last N minutes performance report:";

pub const CUSTOM_COLLECTION_REPORT_HEADER: &str = "Custom performance data report:";

pub const TOP_N_CPU_TIME_HEADER: &str = "Top N CPU Times:";

/// Storage I/O subsection headers, old and new spelling.
pub const TOP_N_STORAGE_IO_READS_HEADER_PATTERN: &str = r"Top N (?:Storage I/O )?Reads:";
pub const TOP_N_STORAGE_IO_WRITES_HEADER_PATTERN: &str = r"Top N (?:Storage I/O )?Writes:";

/// One polling snapshot: `Collection <id>: <date>`.
pub const STATS_COLLECTION_PATTERN: &str = r"Collection (?P<id>\d+): <(?P<date>.+)>";

pub const TOTAL_CPU_TIME_PATTERN: &str = r"Total CPU time \(ms\): (?P<totalCpuTimeMs>\d+)";
pub const TOTAL_CPU_CYCLES_PATTERN: &str = r"Total CPU cycles: (?P<totalCpuCycles>\d+)";
pub const TOTAL_IDLE_CPU_TIME_PATTERN: &str =
    r"Total idle CPU time \(ms\)/percent: (?P<idleCpuTimeMs>\d+) / .+";
pub const CPU_IO_WAIT_TIME_PATTERN: &str =
    r"CPU I/O wait time(?: \(ms\))?/percent: (?P<iowaitCpuTimeMs>\d+) / .+";
pub const CONTEXT_SWITCHES_PATTERN: &str = r"Number of context switches: (?P<totalCtxtSwitches>\d+)";
pub const IO_BLOCKED_PROCESSES_PATTERN: &str =
    r"Number of I/O blocked processes/percent: (?P<totalIoBlkProc>\d+) / .+";
pub const MAJOR_PAGE_FAULTS_PATTERN: &str =
    r"Number of major page faults since last collection: (?P<totalMajPgFaults>\d+)";

/// A section terminator is a line starting with at least this many dashes.
pub const COLLECTION_END_LINE_MIN_LEN: usize = 50;

/// Timestamp format inside `Collection <id>: <...>` headers, after the
/// trailing timezone name has been split off (chrono cannot parse `%Z`).
pub const DUMP_DATETIME_FORMAT: &str = "%a %b %d %H:%M:%S %Y";

/// Timestamp format used in the JSON projection.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

//! Parser for the CarWatchdog dumpsys performance-stats report.
//!
//! The dump is a line-oriented, human-readable report. Parsing walks the
//! lines with an explicit scanner; section sub-parsers consume a variable
//! number of lines and leave the scanner on the line that ended them.
//! Malformed lines are skipped, never fatal: the parser always returns a
//! `PerformanceStats`, possibly a fully empty one.

use crate::model::{
    PackageCpuStats, PackageStorageIoStats, PerformanceStats, ProcessCpuStats, StatsCollection,
    SystemEventStats,
};
use crate::utils::config::{
    BOOT_TIME_REPORT_HEADER_PATTERN, COLLECTION_END_LINE_MIN_LEN, CONTEXT_SWITCHES_PATTERN,
    CPU_IO_WAIT_TIME_PATTERN, CUSTOM_COLLECTION_REPORT_HEADER, DUMP_DATETIME_FORMAT,
    IO_BLOCKED_PROCESSES_PATTERN, LAST_N_MINUTES_COLLECTION_HEADER, MAJOR_PAGE_FAULTS_PATTERN,
    PERIODIC_COLLECTION_HEADER, STATS_COLLECTION_PATTERN, TOP_N_CPU_TIME_HEADER,
    TOP_N_STORAGE_IO_READS_HEADER_PATTERN, TOP_N_STORAGE_IO_WRITES_HEADER_PATTERN,
    TOTAL_CPU_CYCLES_PATTERN, TOTAL_CPU_TIME_PATTERN, TOTAL_IDLE_CPU_TIME_PATTERN,
};
use chrono::NaiveDateTime;
use log::{debug, warn};
use regex::{Captures, Regex};

/// Which percent-field grammar the dump uses.
///
/// Older dumps split every percent value across two integer capture groups
/// (whole and fractional part); newer dumps print a single float. The format
/// is a property of the dump's schema version, chosen when constructing the
/// parser, not inferred per line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DumpFormat {
    #[default]
    Modern,
    Legacy,
}

/// Parse a dump with the modern pattern set.
///
/// Convenience wrapper around [`DumpParser`]; never fails.
pub fn parse_dump(dump: &str) -> PerformanceStats {
    DumpParser::new().parse(dump)
}

/// Line cursor over the dump text. Sub-parsers advance it and leave it on
/// the boundary line that ended them.
struct Scanner<'a> {
    lines: Vec<&'a str>,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.split('\n').collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<&'a str> {
        self.lines.get(self.pos).copied()
    }

    fn advance(&mut self) {
        self.pos += 1;
    }
}

/// Fields recognized inside a collection block, tried in declaration order.
/// First match wins; the literal prefixes keep them mutually exclusive.
#[derive(Debug, Clone, Copy)]
enum CollectionField {
    TotalCpuTime,
    TotalCpuCycles,
    IdleCpuTime,
    IoWaitTime,
    ContextSwitches,
    IoBlockedProcesses,
    MajorPageFaults,
}

/// Recursive-descent parser over the dump's line grammar.
pub struct DumpParser {
    format: DumpFormat,
    boot_time_header: Regex,
    collection_header: Regex,
    storage_reads_header: Regex,
    storage_writes_header: Regex,
    package_cpu: Regex,
    process_cpu: Regex,
    storage_io: Regex,
    collection_fields: Vec<(Regex, CollectionField)>,
}

impl Default for DumpParser {
    fn default() -> Self {
        Self::new()
    }
}

impl DumpParser {
    pub fn new() -> Self {
        Self::with_format(DumpFormat::Modern)
    }

    pub fn with_format(format: DumpFormat) -> Self {
        let collection_fields = vec![
            (fullmatch(TOTAL_CPU_TIME_PATTERN), CollectionField::TotalCpuTime),
            (fullmatch(TOTAL_CPU_CYCLES_PATTERN), CollectionField::TotalCpuCycles),
            (fullmatch(TOTAL_IDLE_CPU_TIME_PATTERN), CollectionField::IdleCpuTime),
            (fullmatch(CPU_IO_WAIT_TIME_PATTERN), CollectionField::IoWaitTime),
            (fullmatch(CONTEXT_SWITCHES_PATTERN), CollectionField::ContextSwitches),
            (fullmatch(IO_BLOCKED_PROCESSES_PATTERN), CollectionField::IoBlockedProcesses),
            (fullmatch(MAJOR_PAGE_FAULTS_PATTERN), CollectionField::MajorPageFaults),
        ];
        Self {
            format,
            boot_time_header: fullmatch(BOOT_TIME_REPORT_HEADER_PATTERN),
            collection_header: fullmatch(STATS_COLLECTION_PATTERN),
            storage_reads_header: fullmatch(TOP_N_STORAGE_IO_READS_HEADER_PATTERN),
            storage_writes_header: fullmatch(TOP_N_STORAGE_IO_WRITES_HEADER_PATTERN),
            package_cpu: fullmatch(&package_cpu_pattern(format)),
            process_cpu: fullmatch(&process_cpu_pattern(format)),
            storage_io: fullmatch(&storage_io_pattern(format)),
            collection_fields,
        }
    }

    /// Parse the full dump text into a `PerformanceStats`.
    pub fn parse(&self, dump: &str) -> PerformanceStats {
        let mut scanner = Scanner::new(dump);
        let mut performance_stats = PerformanceStats::default();

        while let Some(raw) = scanner.peek() {
            let line = raw.trim();
            if self.boot_time_header.is_match(line) {
                let stats = self.parse_stats_collections(&mut scanner);
                if !stats.is_empty() {
                    performance_stats.set_boot_time_stats(stats);
                }
                continue;
            }
            if line == PERIODIC_COLLECTION_HEADER || line == LAST_N_MINUTES_COLLECTION_HEADER {
                let stats = self.parse_stats_collections(&mut scanner);
                if !stats.is_empty() {
                    performance_stats.set_last_n_minutes_stats(stats);
                }
                continue;
            }
            if line == CUSTOM_COLLECTION_REPORT_HEADER {
                // Skip the header and the dashed line printed right below it
                scanner.advance();
                scanner.advance();
                let stats = self.parse_stats_collections(&mut scanner);
                if !stats.is_empty() {
                    performance_stats.set_custom_collection_stats(stats);
                }
                continue;
            }
            scanner.advance();
        }

        performance_stats
    }

    /// Parse all `Collection <id>: <date>` blocks until the dashed section
    /// terminator. Empty collections are dropped, which filters spurious or
    /// partial headers with no data underneath.
    fn parse_stats_collections(&self, scanner: &mut Scanner) -> SystemEventStats {
        let mut system_event_stats = SystemEventStats::default();
        while let Some(raw) = scanner.peek() {
            let line = raw.trim();
            if is_terminator(line) {
                break;
            }
            if let Some(caps) = self.collection_header.captures(line) {
                let id = group_i32(&caps, "id", -1);
                let date = caps.name("date").and_then(|m| parse_dump_date(m.as_str()));
                scanner.advance(); // Skip the collection header
                let collection = self.parse_collection(scanner, id, date);
                if !collection.is_empty() {
                    system_event_stats.add(collection);
                }
            } else {
                scanner.advance();
            }
        }
        system_event_stats
    }

    /// Parse the stats recorded for a single polling. Stops at the next
    /// collection header or the section terminator without consuming it.
    fn parse_collection(
        &self,
        scanner: &mut Scanner,
        id: i32,
        date: Option<NaiveDateTime>,
    ) -> StatsCollection {
        let mut collection = StatsCollection {
            id,
            date,
            ..Default::default()
        };

        while let Some(raw) = scanner.peek() {
            let line = raw.trim();
            if is_terminator(line) || self.collection_header.is_match(line) {
                break;
            }
            if self.apply_collection_field(line, &mut collection) {
                scanner.advance();
                continue;
            }
            if line == TOP_N_CPU_TIME_HEADER {
                scanner.advance(); // Skip subsection header
                collection.package_cpu_stats = self.parse_cpu_stats(scanner);
                continue;
            }
            if self.storage_reads_header.is_match(line) {
                scanner.advance();
                collection.package_storage_io_read_stats = self.parse_storage_io_stats(scanner);
                continue;
            }
            if self.storage_writes_header.is_match(line) {
                scanner.advance();
                collection.package_storage_io_write_stats = self.parse_storage_io_stats(scanner);
                continue;
            }
            scanner.advance();
        }

        collection
    }

    /// Try the ordered field patterns against the line; apply the first match.
    fn apply_collection_field(&self, line: &str, collection: &mut StatsCollection) -> bool {
        for (pattern, field) in &self.collection_fields {
            let Some(caps) = pattern.captures(line) else {
                continue;
            };
            match field {
                CollectionField::TotalCpuTime => {
                    collection.total_cpu_time_ms = group_i64(&caps, "totalCpuTimeMs");
                }
                CollectionField::TotalCpuCycles => {
                    collection.total_cpu_cycles = group_i64(&caps, "totalCpuCycles");
                }
                CollectionField::IdleCpuTime => {
                    collection.idle_cpu_time_ms = group_i64(&caps, "idleCpuTimeMs");
                }
                CollectionField::IoWaitTime => {
                    collection.io_wait_time_ms = group_i64(&caps, "iowaitCpuTimeMs");
                }
                CollectionField::ContextSwitches => {
                    collection.context_switches = group_i64(&caps, "totalCtxtSwitches");
                }
                CollectionField::IoBlockedProcesses => {
                    collection.io_blocked_processes = group_i64(&caps, "totalIoBlkProc");
                }
                CollectionField::MajorPageFaults => {
                    collection.major_page_faults = group_i64(&caps, "totalMajPgFaults");
                }
            }
            return true;
        }
        false
    }

    /// Parse the `Top N CPU Times:` subsection. A package line opens a new
    /// current package; process lines (leading whitespace) attach to it.
    fn parse_cpu_stats(&self, scanner: &mut Scanner) -> Vec<PackageCpuStats> {
        let mut package_cpu_stats: Vec<PackageCpuStats> = Vec::new();

        while let Some(raw) = scanner.peek() {
            let line = raw.trim_end();
            if self.is_stats_section_end(line) {
                break;
            }
            if let Some(caps) = self.package_cpu.captures(line) {
                package_cpu_stats.push(PackageCpuStats {
                    user_id: group_i32(&caps, "userId", 0),
                    package_name: group_string(&caps, "packageName"),
                    cpu_time_ms: group_i64(&caps, "cpuTimeMs"),
                    total_cpu_time_percent: self.percent_value(&caps, "cpuTimePercent"),
                    cpu_cycles: group_cycles(&caps),
                    process_cpu_stats: Vec::new(),
                });
            } else if let Some(caps) = self.process_cpu.captures(line) {
                let command = group_string(&caps, "command");
                if let Some(current) = package_cpu_stats.last_mut() {
                    current.process_cpu_stats.push(ProcessCpuStats {
                        command,
                        cpu_time_ms: group_i64(&caps, "cpuTimeMs"),
                        package_cpu_time_percent: self.percent_value(&caps, "uidCpuPercent"),
                        cpu_cycles: group_cycles(&caps),
                    });
                } else {
                    warn!("no package CPU stats parsed for process: {command}");
                }
            }
            scanner.advance();
        }

        package_cpu_stats
    }

    /// Parse a `Top N Reads:`/`Top N Writes:` subsection. Non-matching lines
    /// are skipped silently.
    fn parse_storage_io_stats(&self, scanner: &mut Scanner) -> Vec<PackageStorageIoStats> {
        let mut package_storage_io_stats = Vec::new();

        while let Some(raw) = scanner.peek() {
            let line = raw.trim_end();
            if self.is_stats_section_end(line) {
                break;
            }
            if let Some(caps) = self.storage_io.captures(line) {
                package_storage_io_stats.push(PackageStorageIoStats {
                    user_id: group_i32(&caps, "userId", 0),
                    package_name: group_string(&caps, "packageName"),
                    fg_bytes: group_i64(&caps, "fgBytes"),
                    fg_bytes_percent: self.percent_value(&caps, "fgBytesPercent"),
                    fg_fsync: group_i64(&caps, "fgFsync"),
                    fg_fsync_percent: self.percent_value(&caps, "fgFsyncPercent"),
                    bg_bytes: group_i64(&caps, "bgBytes"),
                    bg_bytes_percent: self.percent_value(&caps, "bgBytesPercent"),
                    bg_fsync: group_i64(&caps, "bgFsync"),
                    bg_fsync_percent: self.percent_value(&caps, "bgFsyncPercent"),
                });
            }
            scanner.advance();
        }

        package_storage_io_stats
    }

    /// Subsection boundary: the next `Top N` header, a bare collection
    /// header, or the dashed terminator.
    ///
    /// The bare collection-header check means a package or process line that
    /// happens to textually match `Collection <id>: <date>` would end the
    /// subsection early. This mirrors the service's historical behavior and
    /// is kept as-is; see DESIGN.md.
    fn is_stats_section_end(&self, line: &str) -> bool {
        line.starts_with("Top N") || self.collection_header.is_match(line) || is_terminator(line)
    }

    /// Extract a percent value according to the active format.
    fn percent_value(&self, caps: &Captures, name: &str) -> f64 {
        let value = match self.format {
            DumpFormat::Modern => caps.name(name).and_then(|m| m.as_str().parse().ok()),
            DumpFormat::Legacy => {
                let whole = caps.name(&format!("{name}Whole"));
                let frac = caps.name(&format!("{name}Frac"));
                match (whole, frac) {
                    (Some(w), Some(f)) => format!("{}.{}", w.as_str(), f.as_str()).parse().ok(),
                    _ => None,
                }
            }
        };
        value.unwrap_or(0.0)
    }
}

/// Percent capture fragment for the given group name.
fn percent_fragment(format: DumpFormat, name: &str) -> String {
    match format {
        DumpFormat::Modern => format!(r"(?P<{name}>\d+\.\d+)"),
        DumpFormat::Legacy => format!(r"(?P<{name}Whole>\d+)\.(?P<{name}Frac>\d+)"),
    }
}

fn package_cpu_pattern(format: DumpFormat) -> String {
    format!(
        r"(?P<userId>\d+), (?P<packageName>.+), (?P<cpuTimeMs>\d+), {}%(?:, (?P<cpuCycles>\d+))?",
        percent_fragment(format, "cpuTimePercent")
    )
}

fn process_cpu_pattern(format: DumpFormat) -> String {
    format!(
        r"\s+(?P<command>.+), (?P<cpuTimeMs>\d+), {}%(?:, (?P<cpuCycles>\d+))?",
        percent_fragment(format, "uidCpuPercent")
    )
}

fn storage_io_pattern(format: DumpFormat) -> String {
    format!(
        r"(?P<userId>\d+), (?P<packageName>.+), (?P<fgBytes>\d+), {}%, (?P<fgFsync>\d+), {}%, (?P<bgBytes>\d+), {}%, (?P<bgFsync>\d+), {}%",
        percent_fragment(format, "fgBytesPercent"),
        percent_fragment(format, "fgFsyncPercent"),
        percent_fragment(format, "bgBytesPercent"),
        percent_fragment(format, "bgFsyncPercent"),
    )
}

/// Compile a pattern with whole-line anchors; every dump line is matched in
/// full, never as a substring.
fn fullmatch(pattern: &str) -> Regex {
    Regex::new(&format!("^(?:{pattern})$")).expect("hard-coded dump pattern")
}

fn is_terminator(line: &str) -> bool {
    line.len() >= COLLECTION_END_LINE_MIN_LEN
        && line
            .bytes()
            .take(COLLECTION_END_LINE_MIN_LEN)
            .all(|b| b == b'-')
}

/// Parse a collection timestamp such as `Mon Jan 01 00:00:00 2024 UTC`.
///
/// chrono cannot parse `%Z` timezone names, so the trailing token is split
/// off and the rest read as a naive timestamp.
fn parse_dump_date(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    let head = trimmed.rsplit_once(' ').map_or(trimmed, |(head, _)| head);
    NaiveDateTime::parse_from_str(head, DUMP_DATETIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, DUMP_DATETIME_FORMAT))
        .map_err(|e| {
            debug!("unparseable collection date {trimmed:?}: {e}");
            e
        })
        .ok()
}

fn group_string(caps: &Captures, name: &str) -> String {
    caps.name(name).map_or_else(String::new, |m| m.as_str().to_string())
}

fn group_i64(caps: &Captures, name: &str) -> i64 {
    caps.name(name)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

fn group_i32(caps: &Captures, name: &str, default: i32) -> i32 {
    caps.name(name)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(default)
}

/// CPU cycles are optional in older dumps; -1 marks "not reported".
fn group_cycles(caps: &Captures) -> i64 {
    caps.name("cpuCycles")
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(-1)
}

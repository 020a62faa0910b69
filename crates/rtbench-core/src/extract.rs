//! Log extraction: classify each captured log and pull the numeric metrics.
//!
//! A freshly opened log is presumed to be a crash until a throughput line
//! proves otherwise. An `Error` line poisons the whole file and stops the
//! scan; `Warning` lines are sticky but non-terminal. Metrics come from two
//! line shapes: the `BENCHMARK_BUILD` record (build time and memory) and the
//! ` Mrps` throughput suffix.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::warn;

use crate::aggregate::{Aggregator, Sample};
use crate::error::{BenchError, BenchResult};
use crate::render::log_path;
use crate::space::{Config, ConfigSpace};

/// A metric cell: either a measured number or the reason none exists
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Metric {
    Value(f64),
    /// Log existed but never produced a throughput line
    Crash,
    /// Log contained an `Error` line
    Error,
    /// Log file was missing or unreadable
    NotRun,
}

impl Metric {
    pub fn value(&self) -> Option<f64> {
        match self {
            Metric::Value(v) => Some(*v),
            _ => None,
        }
    }

    /// Sentinel text for non-numeric cells
    pub fn sentinel(&self) -> Option<&'static str> {
        match self {
            Metric::Value(_) => None,
            Metric::Crash => Some("Crash"),
            Metric::Error => Some("Error"),
            Metric::NotRun => Some("N/A"),
        }
    }
}

/// Everything the scan learned about one log file
#[derive(Debug, Clone, PartialEq)]
pub struct LogSummary {
    pub build_time: Metric,
    pub memory_mb: Metric,
    pub mrps: Metric,
    pub warning: bool,
    pub error: bool,
    pub crash: bool,
}

impl LogSummary {
    /// State for a configuration whose log never appeared
    pub fn not_run() -> Self {
        Self {
            build_time: Metric::NotRun,
            memory_mb: Metric::NotRun,
            mrps: Metric::NotRun,
            warning: false,
            error: false,
            crash: false,
        }
    }

    /// Pre-scan state: assume a crash until throughput is extracted
    fn assume_crash() -> Self {
        Self {
            build_time: Metric::Crash,
            memory_mb: Metric::Crash,
            mrps: Metric::Crash,
            warning: false,
            error: false,
            crash: true,
        }
    }

    /// Numeric sample for aggregation; `None` unless all three metrics
    /// were measured
    pub fn sample(&self) -> Option<Sample> {
        Some(Sample {
            build_time: self.build_time.value()?,
            memory_mb: self.memory_mb.value()?,
            mrps: self.mrps.value()?,
        })
    }
}

const BUILD_MARKER: &str = "BENCHMARK_BUILD ";

/// Optional sign, digits, optional fraction, optional exponent, then the
/// throughput suffix
static MRPS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[+-]? *(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)? Mrps").expect("valid regex")
});

/// Pull the single float preceding " Mrps"; zero or several candidates is a
/// malformed log and aborts the sweep
fn extract_mrps(line: &str) -> BenchResult<f64> {
    let mut matches = MRPS_RE.find_iter(line);
    let (first, rest) = (matches.next(), matches.next());
    match (first, rest) {
        (Some(m), None) => {
            let text = m.as_str().strip_suffix(" Mrps").unwrap_or(m.as_str());
            text.trim().parse().map_err(|_| BenchError::throughput(line))
        }
        _ => Err(BenchError::throughput(line)),
    }
}

/// Build time and memory from a `BENCHMARK_BUILD` record: the marker-width
/// prefix is stripped and the remainder must be space-separated numbers,
/// of which the first is seconds and the third is bytes
fn parse_build_line(line: &str) -> BenchResult<(f64, f64)> {
    let rest = line
        .get(BUILD_MARKER.len()..)
        .ok_or_else(|| BenchError::build_line(line))?;
    let numbers = rest
        .split(' ')
        .map(|token| token.trim().parse::<f64>())
        .collect::<Result<Vec<f64>, _>>()
        .map_err(|_| BenchError::build_line(line))?;
    if numbers.len() < 3 {
        return Err(BenchError::build_line(line));
    }
    Ok((numbers[0], 1e-6 * numbers[2]))
}

/// Scan log lines in order, first to last
pub fn scan_lines<I>(lines: I) -> BenchResult<LogSummary>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut summary = LogSummary::assume_crash();
    for line in lines {
        let line = line.as_ref().replace("mrps", "Mrps");
        if line.contains("Error") {
            summary.error = true;
            summary.build_time = Metric::Error;
            summary.memory_mb = Metric::Error;
            summary.mrps = Metric::Error;
            break;
        }
        if line.contains("Warning") {
            summary.warning = true;
        }
        if line.matches(BUILD_MARKER).count() == 1 {
            let (build_time, memory_mb) = parse_build_line(&line)?;
            summary.build_time = Metric::Value(build_time);
            summary.memory_mb = Metric::Value(memory_mb);
        } else if line.contains("Mrps") {
            summary.mrps = Metric::Value(extract_mrps(&line)?);
            summary.crash = false;
        }
    }
    Ok(summary)
}

/// Scan one log file; a missing file is reported on stdout and yields the
/// not-run summary rather than an error
pub fn scan_log(path: &Path) -> BenchResult<LogSummary> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(_) => {
            println!("cannot open {}", path.display());
            return Ok(LogSummary::not_run());
        }
    };
    scan_lines(BufReader::new(file).lines().map_while(Result::ok))
}

/// Per-configuration summaries plus the average buckets for one extract run
#[derive(Debug, Default)]
pub struct SweepResults {
    pub summaries: HashMap<Config, LogSummary>,
    pub aggregator: Aggregator,
}

/// Scan every log of the given spaces, recording one aggregated sample per
/// fully-parsed file
pub fn extract_sweep(spaces: &[ConfigSpace], test_dir: &Path) -> BenchResult<SweepResults> {
    let mut results = SweepResults::default();
    for space in spaces {
        for config in space.all_configs() {
            let summary = scan_log(&log_path(test_dir, &config))?;
            if summary.warning {
                warn!(config = %config.base_name(), "renderer emitted warnings");
            }
            if let Some(sample) = summary.sample() {
                results.aggregator.record_config(&config, sample);
            }
            results.summaries.insert(config, summary);
        }
    }
    Ok(results)
}

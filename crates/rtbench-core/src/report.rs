//! Fixed-width ASCII report tables.
//!
//! The layout constants are part of the tool's contract with the people who
//! eyeball decades of these sweeps side by side, so cells are padded by hand
//! rather than delegated to a table library. Sentinel cells are painted red;
//! that is what operators scan for.

use colored::Colorize;
use std::collections::HashMap;

use crate::aggregate::{AggregateKey, Aggregator, Sample};
use crate::extract::{LogSummary, Metric, SweepResults};
use crate::space::{Config, ConfigSpace};

const TABLE_WIDTH: usize = 109;
const METRIC_HEADER: &str = "|  build  memory   mrps |";

/// Name of the synthetic scene holding cross-scene averages
pub const AVERAGE_SCENE: &str = "average";

fn pad(mut line: String, width: usize, fill: char) -> String {
    while line.chars().count() < width {
        line.push(fill);
    }
    line
}

/// One metric cell: integers for build time, one decimal for memory and
/// throughput, sentinels right-aligned and colored
fn cell(metric: Metric, width: usize, decimals: bool) -> String {
    match metric {
        Metric::Value(v) => {
            if decimals {
                format!("{v:>width$.1}")
            } else {
                format!("{:>width$}", v.trunc() as i64)
            }
        }
        other => {
            let padded = format!("{:>width$}", other.sentinel().unwrap_or(""));
            match other {
                Metric::Crash | Metric::Error => padded.red().to_string(),
                _ => padded,
            }
        }
    }
}

fn metric_cells(build_time: Metric, memory_mb: Metric, mrps: Metric) -> String {
    format!(
        "{} {} {}",
        cell(build_time, 6, false),
        cell(memory_mb, 7, true),
        cell(mrps, 6, true)
    )
}

fn scene_row(device: &str, isa: &str, build_time: Metric, memory_mb: Metric, mrps: Metric) -> String {
    format!(
        "  {device:<13} |   {isa:<8} | {} | \n",
        metric_cells(build_time, memory_mb, mrps)
    )
}

fn sample_metrics(sample: Option<Sample>) -> (Metric, Metric, Metric) {
    match sample {
        Some(s) => (
            Metric::Value(s.build_time),
            Metric::Value(s.memory_mb),
            Metric::Value(s.mrps),
        ),
        None => (Metric::NotRun, Metric::NotRun, Metric::NotRun),
    }
}

/// One table for one scene (or the synthetic average scene), covering every
/// selected OS
pub fn scene_table(
    scene: &str,
    spaces: &[ConfigSpace],
    summaries: &HashMap<Config, LogSummary>,
    aggregator: &Aggregator,
) -> String {
    let mut out = String::new();
    out.push_str(&pad(format!("{scene} "), TABLE_WIDTH + 8, '='));
    out.push('\n');
    out.push_str(&" ".repeat(29));
    out.push_str(METRIC_HEADER);
    out.push('\n');

    for space in spaces {
        for platform in &space.platforms {
            for compiler in &space.compilers {
                for build in &space.builds {
                    out.push_str(&pad(
                        format!("{compiler} {platform} {build} "),
                        TABLE_WIDTH,
                        '.',
                    ));
                    out.push('\n');
                    for device in &space.devices {
                        for isa in space.isas() {
                            let (build_time, memory_mb, mrps) = if scene == AVERAGE_SCENE {
                                let key = AggregateKey::BySceneAverage {
                                    os: space.os,
                                    compiler: compiler.clone(),
                                    platform: platform.clone(),
                                    build: build.clone(),
                                    device: device.clone(),
                                    isa: isa.clone(),
                                };
                                sample_metrics(aggregator.average(&key))
                            } else {
                                let config = Config {
                                    os: space.os,
                                    compiler: compiler.clone(),
                                    platform: platform.clone(),
                                    build: build.clone(),
                                    scene: scene.to_string(),
                                    device: device.clone(),
                                    isa: isa.clone(),
                                };
                                match summaries.get(&config) {
                                    Some(s) => (s.build_time, s.memory_mb, s.mrps),
                                    None => (Metric::NotRun, Metric::NotRun, Metric::NotRun),
                                }
                            };
                            out.push_str(&scene_row(device, &isa, build_time, memory_mb, mrps));
                        }
                    }
                }
            }
        }
    }

    out.push_str(&"=".repeat(TABLE_WIDTH));
    out.push_str("\n\n\n");
    out
}

fn summary_row(name: &str, average: Option<Sample>) -> String {
    let cells = match average {
        Some(s) => metric_cells(
            Metric::Value(s.build_time),
            Metric::Value(s.memory_mb),
            Metric::Value(s.mrps),
        ),
        None => format!("{:>6} {:>7} {:>6}", "n/a", "n/a", "n/a"),
    };
    format!("  {name:<14}| {cells} | \n")
}

/// Order-preserving union of a per-space list across all selected spaces
fn union<F>(spaces: &[ConfigSpace], list: F) -> Vec<String>
where
    F: Fn(&ConfigSpace) -> Vec<String>,
{
    let mut seen = Vec::new();
    for space in spaces {
        for item in list(space) {
            if !seen.contains(&item) {
                seen.push(item);
            }
        }
    }
    seen
}

/// The closing per-compiler and per-isa average tables
pub fn summary_tables(spaces: &[ConfigSpace], aggregator: &Aggregator) -> String {
    let mut out = String::new();

    out.push_str(&" ".repeat(16));
    out.push_str(METRIC_HEADER);
    out.push('\n');
    out.push_str("Average by Compiler............................\n");
    for compiler in union(spaces, |s| s.compilers.clone()) {
        let key = AggregateKey::ByCompiler(compiler.clone());
        out.push_str(&summary_row(&compiler, aggregator.average(&key)));
    }
    out.push('\n');

    out.push_str(&" ".repeat(16));
    out.push_str(METRIC_HEADER);
    out.push('\n');
    out.push_str("Average by ISA .................................\n");
    for isa in union(spaces, |s| s.isas()) {
        let key = AggregateKey::ByIsa(isa.clone());
        out.push_str(&summary_row(&isa, aggregator.average(&key)));
    }
    out.push('\n');

    out
}

/// Every scene table, the average table, and the two summary tables
pub fn full_report(spaces: &[ConfigSpace], results: &SweepResults) -> String {
    let mut out = String::new();
    let scenes = spaces.first().map(|s| s.scenes.clone()).unwrap_or_default();
    for scene in &scenes {
        out.push_str(&scene_table(scene, spaces, &results.summaries, &results.aggregator));
    }
    out.push_str(&scene_table(
        AVERAGE_SCENE,
        spaces,
        &results.summaries,
        &results.aggregator,
    ));
    out.push_str(&summary_tables(spaces, &results.aggregator));
    out
}

//! Binary-level tests for the rtbench CLI: usage errors, the extract
//! pipeline over a synthetic log directory, and render-phase resumability.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn rtbench() -> Command {
    Command::cargo_bin("rtbench").expect("rtbench binary")
}

/// Minimal single-isa matrix so sweeps stay tiny
fn write_config(dir: &Path, isas4: &str) -> std::path::PathBuf {
    let path = dir.join("config.toml");
    fs::write(
        &path,
        format!(
            "[matrix]\n\
             builds = [\"Release\"]\n\
             devices = [\"singleray\"]\n\
             scenes = [\"conference\"]\n\n\
             [matrix.unix]\n\
             compilers = [\"ICC\"]\n\
             platforms = [\"x64\"]\n\
             isas4 = {isas4}\n\
             isas8 = []\n\
             isas16 = []\n\n\
             [engine]\n\
             unix_source_dir = \"/nonexistent/rtcore\"\n"
        ),
    )
    .unwrap();
    path
}

#[test]
fn test_no_arguments_prints_usage() {
    rtbench()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_unrecognized_os_is_a_usage_error() {
    rtbench()
        .args(["compile", "beos"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_render_requires_model_and_test_dirs() {
    rtbench()
        .args(["render", "unix"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_extract_reports_metrics_and_missing_logs() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), "[\"sse3\", \"sse41\"]");

    // one parsed log; the sse41 log is deliberately absent
    fs::write(
        dir.path().join("unix_ICC_x64_Release_conference_singleray_sse3.log"),
        "BENCHMARK_BUILD 10.0 0 2000000\nframe 0: 5.0 Mrps\n",
    )
    .unwrap();

    let assert = rtbench()
        .args(["extract", "unix"])
        .arg(dir.path())
        .arg("-C")
        .arg(&config)
        .env("NO_COLOR", "1")
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains("conference ="));
    assert!(stdout.contains("ICC x64 Release ."));
    assert!(stdout.contains("    10     2.0    5.0 | "));
    assert!(stdout.contains("cannot open"));
    assert!(stdout.contains("N/A"));
    assert!(stdout.contains("Average by Compiler"));
    assert!(stdout.contains("Average by ISA"));
    // sse41 never parsed, so its average bucket is empty
    assert!(stdout.contains("  sse41         |    n/a     n/a    n/a | "));
}

#[test]
fn test_extract_all_covers_both_operating_systems() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), "[\"sse3\"]");

    let assert = rtbench()
        .args(["extract", "all"])
        .arg(dir.path())
        .arg("-C")
        .arg(&config)
        .env("NO_COLOR", "1")
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    // group rows for both OS spaces appear in one table; no logs exist, so
    // every configuration is reported missing
    assert!(stdout.contains("cannot open"));
    assert!(stdout.matches("ICC x64 Release .").count() >= 2);
}

#[test]
fn test_render_skips_tuples_whose_log_exists() {
    let dir = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let config = write_config(dir.path(), "[\"sse3\"]");

    // pre-seed the only log in the matrix; the render phase must leave it
    // untouched instead of re-running the renderer over it
    let log = dir.path().join("unix_ICC_x64_Release_conference_singleray_sse3.log");
    fs::write(&log, "already rendered\n").unwrap();

    rtbench()
        .current_dir(work.path())
        .args(["render", "unix"])
        .arg("/nonexistent/models")
        .arg(dir.path())
        .arg("-C")
        .arg(&config)
        .assert()
        .success();

    assert_eq!(fs::read_to_string(&log).unwrap(), "already rendered\n");
}

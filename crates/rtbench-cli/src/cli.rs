use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;

use rtbench_core::TargetOs;

/// Log level options for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    Off,
    /// Error messages only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages (default)
    Info,
    /// Debug messages
    Debug,
    /// Trace-level messages (most verbose)
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// Operating system selector for compile and render
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OsArg {
    Windows,
    Unix,
}

impl From<OsArg> for TargetOs {
    fn from(os: OsArg) -> Self {
        match os {
            OsArg::Windows => TargetOs::Windows,
            OsArg::Unix => TargetOs::Unix,
        }
    }
}

/// Operating system selector for extract, which may cover both
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OsSelector {
    Windows,
    Unix,
    All,
}

impl OsSelector {
    /// The OSes an extract run walks, in report order
    pub fn targets(&self) -> Vec<TargetOs> {
        match self {
            OsSelector::Windows => vec![TargetOs::Windows],
            OsSelector::Unix => vec![TargetOs::Unix],
            OsSelector::All => vec![TargetOs::Windows, TargetOs::Unix],
        }
    }
}

#[derive(Parser)]
#[command(name = "rtbench")]
#[command(about = "rtbench - benchmark sweep driver for the ray-tracing engine and renderer")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Set log level (off, error, warn, info, debug, trace)
    #[arg(short = 'l', long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Enable verbose logging (shortcut for --log-level=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (defaults to ~/.config/rtbench/config.toml)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the engine and renderer across the configuration matrix
    Compile {
        /// Operating system to build for
        #[arg(value_enum)]
        os: OsArg,
    },

    /// Render every configuration, capturing one log file per tuple
    ///
    /// Tuples whose log file already exists are skipped, so an interrupted
    /// sweep can simply be re-run.
    Render {
        /// Operating system the sweep runs on
        #[arg(value_enum)]
        os: OsArg,

        /// Directory holding the test scenes
        #[arg(value_name = "MODEL_DIR")]
        model_dir: PathBuf,

        /// Directory receiving log and image files
        #[arg(value_name = "TEST_DIR")]
        test_dir: PathBuf,
    },

    /// Parse captured logs and print the aggregated tables
    Extract {
        /// Operating system whose logs to read, or `all` for both
        #[arg(value_enum)]
        os: OsSelector,

        /// Directory holding the captured log files
        #[arg(value_name = "TEST_DIR")]
        test_dir: PathBuf,
    },
}

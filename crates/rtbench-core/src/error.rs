//! Sweep error types

use std::io;
use thiserror::Error;

/// Sweep error type
#[derive(Debug, Error)]
pub enum BenchError {
    /// IO error reading a log or spawning a tool
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Compiler identifier not known to the command builder
    #[error("unknown compiler: {0}")]
    UnknownCompiler(String),

    /// Platform identifier not known to the command builder
    #[error("unknown platform: {0}")]
    UnknownPlatform(String),

    /// BENCHMARK_BUILD line did not split into parseable numbers
    #[error("malformed build metrics line: {line:?}")]
    MalformedBuildLine {
        /// Offending log line
        line: String,
    },

    /// Throughput line did not contain exactly one float before " Mrps"
    #[error("could not extract floating point value from {line:?}")]
    MalformedThroughput {
        /// Offending log line
        line: String,
    },
}

/// Specialized Result type for sweep operations
pub type BenchResult<T> = Result<T, BenchError>;

impl BenchError {
    /// Create a malformed build line error
    pub fn build_line(line: impl Into<String>) -> Self {
        Self::MalformedBuildLine { line: line.into() }
    }

    /// Create a malformed throughput error
    pub fn throughput(line: impl Into<String>) -> Self {
        Self::MalformedThroughput { line: line.into() }
    }

    /// Check if this error aborts the whole sweep (as opposed to a single log)
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Io(_))
    }
}

//! Core library for the rtbench sweep driver.
//!
//! The sweep walks a configuration matrix (OS × compiler × platform × build ×
//! device × scene × instruction set) through three phases:
//!
//! - [`compile`] builds the engine and renderer per matrix cell and SIMD width
//! - [`render`] runs the renderer per tuple, capturing one log file each
//! - [`extract`] scans the logs and [`aggregate`]s metrics for [`report`]ing
//!
//! External tools are reached through the [`invoke::CommandRunner`] seam so
//! the sweeps stay testable without a toolchain installed.

pub mod aggregate;
pub mod compile;
pub mod error;
pub mod extract;
pub mod invoke;
pub mod render;
pub mod report;
pub mod space;

pub use error::{BenchError, BenchResult};
pub use space::{Config, ConfigSpace, MatrixConfig, SimdWidth, TargetOs};

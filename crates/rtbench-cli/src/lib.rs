//! rtbench CLI library
//!
//! Exposes the argument definitions, configuration loading, and the
//! per-subcommand execute functions the `rtbench` binary dispatches to.

pub mod cli;
pub mod commands;
pub mod config;

//! External command invocation.
//!
//! Build and render tooling is driven through a shell so that the command
//! strings can carry redirections and multi-step `;` sequences. The
//! [`CommandRunner`] trait is the seam the sweeps go through; tests substitute
//! a recording double to verify what would run without running anything.

use std::process::Command;
use tracing::{debug, warn};

/// One shell command to run, blocking until it completes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Full shell command line, including any redirections
    pub command: String,
}

impl Invocation {
    pub fn new(command: impl Into<String>) -> Self {
        Self { command: command.into() }
    }
}

/// What became of an invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationOutcome {
    /// Process ran to completion with this exit code
    Completed { code: i32 },
    /// Process was killed by a signal before exiting
    Terminated,
    /// The shell itself could not be spawned
    SpawnFailed { message: String },
}

impl InvocationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, InvocationOutcome::Completed { code: 0 })
    }
}

/// Executes invocations, blocking the sweep until each completes
pub trait CommandRunner {
    fn run(&mut self, invocation: &Invocation) -> InvocationOutcome;
}

/// Runs invocations through the platform shell
#[derive(Debug, Default)]
pub struct ShellRunner;

impl ShellRunner {
    #[cfg(windows)]
    fn shell_command(command: &str) -> Command {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").arg(command);
        cmd
    }

    #[cfg(not(windows))]
    fn shell_command(command: &str) -> Command {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command);
        cmd
    }
}

impl CommandRunner for ShellRunner {
    fn run(&mut self, invocation: &Invocation) -> InvocationOutcome {
        debug!(command = %invocation.command, "running shell command");
        match Self::shell_command(&invocation.command).status() {
            Ok(status) => match status.code() {
                Some(code) => {
                    if code != 0 {
                        warn!(command = %invocation.command, code, "command exited nonzero");
                    }
                    InvocationOutcome::Completed { code }
                }
                None => {
                    warn!(command = %invocation.command, "command terminated by signal");
                    InvocationOutcome::Terminated
                }
            },
            Err(e) => {
                warn!(command = %invocation.command, error = %e, "failed to spawn shell");
                InvocationOutcome::SpawnFailed { message: e.to_string() }
            }
        }
    }
}

/// Test double that records every invocation and reports success
#[derive(Debug, Default)]
pub struct RecordingRunner {
    pub invocations: Vec<Invocation>,
}

impl CommandRunner for RecordingRunner {
    fn run(&mut self, invocation: &Invocation) -> InvocationOutcome {
        self.invocations.push(invocation.clone());
        InvocationOutcome::Completed { code: 0 }
    }
}

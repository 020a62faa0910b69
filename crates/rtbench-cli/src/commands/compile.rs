use anyhow::Result;
use tracing::info;

use rtbench_core::compile::compile_sweep;
use rtbench_core::invoke::ShellRunner;
use rtbench_core::TargetOs;

use crate::config::SweepConfig;

pub fn execute(config: SweepConfig, os: TargetOs) -> Result<()> {
    let space = config.matrix.space(os);
    info!(os = %os, "starting compile sweep");
    let mut runner = ShellRunner;
    compile_sweep(&mut runner, &space, &config.engine)?;
    Ok(())
}

use anyhow::Result;
use std::path::PathBuf;
use tracing::info;

use rtbench_core::invoke::ShellRunner;
use rtbench_core::render::render_sweep;
use rtbench_core::TargetOs;

use crate::config::SweepConfig;

pub fn execute(
    config: SweepConfig,
    os: TargetOs,
    model_dir: PathBuf,
    test_dir: PathBuf,
) -> Result<()> {
    let space = config.matrix.space(os);
    info!(os = %os, test_dir = %test_dir.display(), "starting render sweep");
    let mut runner = ShellRunner;
    render_sweep(&mut runner, &space, &config.engine, &model_dir, &test_dir)?;
    Ok(())
}

use anyhow::Result;
use std::path::PathBuf;

use rtbench_core::extract::extract_sweep;
use rtbench_core::report::full_report;
use rtbench_core::{ConfigSpace, TargetOs};

use crate::config::SweepConfig;

pub fn execute(config: SweepConfig, targets: Vec<TargetOs>, test_dir: PathBuf) -> Result<()> {
    let spaces: Vec<ConfigSpace> = targets
        .into_iter()
        .map(|os| config.matrix.space(os))
        .collect();
    let results = extract_sweep(&spaces, &test_dir)?;
    print!("{}", full_report(&spaces, &results));
    Ok(())
}

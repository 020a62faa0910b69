//! Render phase: run the renderer once per configuration tuple, capturing
//! combined output into a per-tuple log file.
//!
//! An existing log means the tuple already ran; it is skipped, which makes a
//! long sweep safe to restart. Failures are not interpreted here at all —
//! whatever the renderer printed is judged later by the extract phase.

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::compile::{compile_config, EngineConfig};
use crate::error::BenchResult;
use crate::invoke::{CommandRunner, Invocation};
use crate::space::{Config, ConfigSpace, SimdWidth, TargetOs, COPROC_ISA};

/// Log file for a configuration tuple
pub fn log_path(test_dir: &Path, config: &Config) -> PathBuf {
    test_dir.join(format!("{}.log", config.base_name()))
}

/// Image file the renderer writes for a configuration tuple
pub fn image_path(test_dir: &Path, config: &Config) -> PathBuf {
    test_dir.join(format!("{}.{}", config.base_name(), config.os.image_extension()))
}

/// Renderer binary location relative to the working directory
fn renderer_executable(os: TargetOs, platform: &str, build: &str) -> String {
    match os {
        TargetOs::Windows => format!("{platform}\\{build}\\renderer.exe"),
        TargetOs::Unix => "build/renderer".to_string(),
    }
}

/// Renderer command line for one tuple, with output redirected into the log
pub fn render_command(config: &Config, model_dir: &Path, test_dir: &Path) -> Invocation {
    let executable = renderer_executable(config.os, &config.platform, &config.build);
    let mut device = config.device.clone();
    if config.isa == COPROC_ISA {
        device.push_str("_xeon_phi");
    }
    let scene_file = model_dir
        .join(&config.scene)
        .join(format!("{}_test.ecs", config.scene));
    Invocation::new(format!(
        "{} -rtcore benchmark=1,isa={} -device {} -c {} -spp 16 -frames 2 -o {} > {} 2>&1",
        executable,
        config.isa,
        device,
        scene_file.display(),
        image_path(test_dir, config).display(),
        log_path(test_dir, config).display(),
    ))
}

/// Render one tuple unless its log already exists
pub fn render_config(
    runner: &mut dyn CommandRunner,
    config: &Config,
    model_dir: &Path,
    test_dir: &Path,
) {
    let log = log_path(test_dir, config);
    if log.exists() {
        debug!(log = %log.display(), "log exists, skipping render");
        return;
    }
    let outcome = runner.run(&render_command(config, model_dir, test_dir));
    debug!(?outcome, "render finished");
}

/// Walk the matrix, rebuilding the width-matched binaries before each group
/// of renders (16-wide targets are extract-only and never rendered)
pub fn render_sweep(
    runner: &mut dyn CommandRunner,
    space: &ConfigSpace,
    engine: &EngineConfig,
    model_dir: &Path,
    test_dir: &Path,
) -> BenchResult<()> {
    for (compiler, platform, build) in space.build_triples() {
        for width in [SimdWidth::W4, SimdWidth::W8] {
            let isas = space.isa_subset(width);
            if isas.is_empty() {
                continue;
            }
            compile_config(runner, space, engine, &compiler, &platform, &build, width)?;
            for scene in &space.scenes {
                for device in &space.devices {
                    for isa in isas {
                        info!("{compiler} {platform} {build} {scene} {device} {isa}");
                        let config = Config {
                            os: space.os,
                            compiler: compiler.clone(),
                            platform: platform.clone(),
                            build: build.clone(),
                            scene: scene.clone(),
                            device: device.clone(),
                            isa: isa.clone(),
                        };
                        render_config(runner, &config, model_dir, test_dir);
                    }
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoke::RecordingRunner;
    use crate::space::{MatrixConfig, TargetOs};

    fn unix_config(isa: &str) -> Config {
        Config {
            os: TargetOs::Unix,
            compiler: "ICC".to_string(),
            platform: "x64".to_string(),
            build: "Release".to_string(),
            scene: "conference".to_string(),
            device: "ispc".to_string(),
            isa: isa.to_string(),
        }
    }

    #[test]
    fn test_render_command_arguments() {
        let config = unix_config("avx");
        let invocation =
            render_command(&config, Path::new("/models"), Path::new("/tmp/sweep"));
        assert!(invocation.command.starts_with("build/renderer "));
        assert!(invocation.command.contains("-rtcore benchmark=1,isa=avx"));
        assert!(invocation.command.contains("-device ispc "));
        assert!(invocation.command.contains("-c /models/conference/conference_test.ecs"));
        assert!(invocation.command.contains("-spp 16 -frames 2"));
        assert!(invocation
            .command
            .contains("-o /tmp/sweep/unix_ICC_x64_Release_conference_ispc_avx.jpg"));
        assert!(invocation
            .command
            .ends_with("> /tmp/sweep/unix_ICC_x64_Release_conference_ispc_avx.log 2>&1"));
    }

    #[test]
    fn test_coproc_isa_selects_suffixed_device() {
        let config = unix_config(COPROC_ISA);
        let invocation = render_command(&config, Path::new("m"), Path::new("t"));
        assert!(invocation.command.contains("-device ispc_xeon_phi"));
    }

    #[test]
    fn test_image_extension_per_os() {
        let mut config = unix_config("sse3");
        assert!(image_path(Path::new("t"), &config).to_string_lossy().ends_with(".jpg"));
        config.os = TargetOs::Windows;
        assert!(image_path(Path::new("t"), &config).to_string_lossy().ends_with(".tga"));
    }

    #[test]
    fn test_existing_log_skips_renderer() {
        let dir = tempfile::tempdir().unwrap();
        let config = unix_config("sse41");
        std::fs::write(log_path(dir.path(), &config), "12.5 Mrps\n").unwrap();

        let mut runner = RecordingRunner::default();
        render_config(&mut runner, &config, Path::new("m"), dir.path());
        assert!(runner.invocations.is_empty());

        // a tuple without a log still renders
        let fresh = unix_config("sse3");
        render_config(&mut runner, &fresh, Path::new("m"), dir.path());
        assert_eq!(runner.invocations.len(), 1);
    }

    #[test]
    fn test_render_sweep_rebuilds_per_width_and_skips_coproc() {
        let space = MatrixConfig::default().space(TargetOs::Unix);
        let engine = EngineConfig::default();
        let dir = tempfile::tempdir().unwrap();
        let mut runner = RecordingRunner::default();
        render_sweep(&mut runner, &space, &engine, Path::new("m"), dir.path()).unwrap();

        let renders: Vec<_> = runner
            .invocations
            .iter()
            .filter(|i| i.command.starts_with("build/renderer"))
            .collect();
        // 2 devices x (2 four-wide + 1 eight-wide) isas; knc never renders
        assert_eq!(renders.len(), 6);
        assert!(!renders.iter().any(|i| i.command.contains("isa=knc")));

        let builds = runner.invocations.len() - renders.len();
        // two widths, engine + renderer tree each
        assert_eq!(builds, 4);
    }
}

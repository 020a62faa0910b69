//! Compile phase: build the engine and the renderer for one SIMD width.
//!
//! Windows drives two msbuild solutions; Unix runs a CMake + make sequence
//! per tree, with feature toggles that depend on the compiler and width.
//! Each (compiler, platform, build) triple is built twice, once per width,
//! producing two distinct binaries.

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{BenchError, BenchResult};
use crate::invoke::{CommandRunner, Invocation};
use crate::space::{ConfigSpace, SimdWidth, TargetOs, COPROC_ISA};

/// Where the engine lives on each OS.
///
/// On Windows the install directory usually arrives via `RTBENCH_ENGINE_DIR`;
/// on Unix the source tree is configured (tilde-expanded by the config
/// loader). The renderer is always built in the working directory.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Engine install directory holding the Windows solution file
    pub windows_install_dir: String,
    /// Engine source tree on Unix
    pub unix_source_dir: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            windows_install_dir: String::new(),
            unix_source_dir: "~/Projects/rtcore".to_string(),
        }
    }
}

/// msbuild platform toolset for a compiler name
fn windows_toolset(compiler: &str) -> BenchResult<&'static str> {
    match compiler {
        "ICC" => Ok("\"Intel C++ Compiler XE 14.0\""),
        "V100" => Ok("v100"),
        other => Err(BenchError::UnknownCompiler(other.to_string())),
    }
}

fn windows_commands(
    engine: &EngineConfig,
    compiler: &str,
    platform: &str,
    build: &str,
    width: SimdWidth,
) -> BenchResult<Vec<Invocation>> {
    // 8-wide binaries come out of the AVX build configuration
    let build = match width {
        SimdWidth::W8 => format!("{build}AVX"),
        _ => build.to_string(),
    };
    let cfg = format!(
        "/p:Configuration={};Platform={};PlatformToolset={}",
        build,
        platform,
        windows_toolset(compiler)?
    );

    let engine_sln = format!("{}\\engine_vs2010.sln", engine.windows_install_dir);
    let renderer_sln = "renderer_vs2010.sln";

    let mut commands = Vec::new();
    for sln in [engine_sln.as_str(), renderer_sln] {
        commands.push(Invocation::new(format!("msbuild {sln} {cfg} /t:Clean")));
        commands.push(Invocation::new(format!("msbuild {sln} {cfg}")));
        commands.push(Invocation::new(format!("msbuild {sln} {cfg}")));
    }
    Ok(commands)
}

/// `-D COMPILER=<name>` define for the CMake trees
fn unix_compiler_define(compiler: &str) -> BenchResult<String> {
    match compiler {
        "ICC" | "GCC" | "CLANG" => Ok(format!("-D COMPILER={compiler}")),
        other => Err(BenchError::UnknownCompiler(other.to_string())),
    }
}

fn cmake_make(dir: Option<&str>, defines: &[String]) -> Invocation {
    let cd = dir.map(|d| format!("cd {d}; ")).unwrap_or_default();
    Invocation::new(format!(
        "{cd}mkdir -p build; cd build; cmake {} ..; make clean; make -j 8",
        defines.join(" ")
    ))
}

fn unix_commands(
    engine: &EngineConfig,
    compiler: &str,
    platform: &str,
    build: &str,
    isas: &[String],
    width: SimdWidth,
) -> BenchResult<Vec<Invocation>> {
    if platform != "x64" {
        return Err(BenchError::UnknownPlatform(platform.to_string()));
    }

    let compiler_define = unix_compiler_define(compiler)?;
    let coproc = isas.iter().any(|isa| isa == COPROC_ISA);
    let on_off = |on: bool| if on { "ON" } else { "OFF" };

    // Engine tree: all wide targets on for ICC, feature toggles fixed
    let mut defines = vec![compiler_define.clone()];
    for toggle in [
        "RTCORE_BACKFACE_CULLING=OFF",
        "RTCORE_ENABLE_RAY_MASK=OFF",
        "RTCORE_ENABLE_SPINLOCKS=OFF",
        "RTCORE_ENABLE_STAT_COUNTERS=OFF",
        "RTCORE_ENABLE_TASKLOGGER=OFF",
        "RTCORE_EXIT_ON_ERROR=ON",
        "RTCORE_FIX_RAYS=OFF",
    ] {
        defines.push(format!("-D {toggle}"));
    }
    let icc = compiler == "ICC";
    defines.push(format!("-D TARGET_SSE41={}", on_off(icc)));
    defines.push(format!("-D TARGET_AVX={}", on_off(icc)));
    defines.push(format!("-D TARGET_AVX2={}", on_off(icc)));
    defines.push(format!("-D TARGET_XEON_PHI={}", on_off(coproc)));
    defines.push(format!("-D CMAKE_BUILD_TYPE={build}"));
    let engine_cmd = cmake_make(Some(&engine.unix_source_dir), &defines);

    // Renderer tree: wide targets only for ICC at width 8
    let wide = icc && width == SimdWidth::W8;
    let mut defines = vec![compiler_define];
    defines.push("-D TARGET_SSE2=ON".to_string());
    defines.push(format!("-D TARGET_SSE41={}", on_off(icc)));
    defines.push(format!("-D TARGET_AVX={}", on_off(wide)));
    defines.push(format!("-D TARGET_AVX2={}", on_off(wide)));
    defines.push(format!("-D BUILD_ISPC_DEVICE_XEON_PHI={}", on_off(coproc)));
    defines.push(format!("-D BUILD_SINGLERAY_DEVICE_XEON_PHI={}", on_off(coproc)));
    defines.push("-D BUILD_SINGLERAY_DEVICE=ON".to_string());
    defines.push("-D BUILD_ISPC_DEVICE=ON".to_string());
    defines.push(format!("-D CMAKE_BUILD_TYPE={build}"));
    let renderer_cmd = cmake_make(None, &defines);

    Ok(vec![engine_cmd, renderer_cmd])
}

/// Build engine and renderer for one (compiler, platform, build) at one width
pub fn compile_config(
    runner: &mut dyn CommandRunner,
    space: &ConfigSpace,
    engine: &EngineConfig,
    compiler: &str,
    platform: &str,
    build: &str,
    width: SimdWidth,
) -> BenchResult<()> {
    let commands = match space.os {
        TargetOs::Windows => windows_commands(engine, compiler, platform, build, width)?,
        TargetOs::Unix => unix_commands(engine, compiler, platform, build, &space.isas(), width)?,
    };
    for command in &commands {
        let outcome = runner.run(command);
        debug!(?outcome, "build step finished");
    }
    Ok(())
}

/// Walk the (compiler, platform, build) triples, building 4- and 8-wide
/// binaries for each
pub fn compile_sweep(
    runner: &mut dyn CommandRunner,
    space: &ConfigSpace,
    engine: &EngineConfig,
) -> BenchResult<()> {
    for (compiler, platform, build) in space.build_triples() {
        info!("{} {} {} {}", space.os, compiler, platform, build);
        compile_config(runner, space, engine, &compiler, &platform, &build, SimdWidth::W4)?;
        compile_config(runner, space, engine, &compiler, &platform, &build, SimdWidth::W8)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoke::RecordingRunner;
    use crate::space::{MatrixConfig, TargetOs};

    fn engine() -> EngineConfig {
        EngineConfig {
            windows_install_dir: "C:\\rtcore".to_string(),
            unix_source_dir: "/home/ci/rtcore".to_string(),
        }
    }

    #[test]
    fn test_windows_commands_clean_then_two_builds_per_solution() {
        let commands =
            windows_commands(&engine(), "ICC", "x64", "Release", SimdWidth::W4).unwrap();
        assert_eq!(commands.len(), 6);
        assert!(commands[0].command.starts_with("msbuild C:\\rtcore\\engine_vs2010.sln"));
        assert!(commands[0].command.ends_with("/t:Clean"));
        assert!(commands[1].command.contains("PlatformToolset=\"Intel C++ Compiler XE 14.0\""));
        assert_eq!(commands[1], commands[2]);
        assert!(commands[3].command.starts_with("msbuild renderer_vs2010.sln"));
    }

    #[test]
    fn test_windows_wide_build_gets_avx_suffix() {
        let commands =
            windows_commands(&engine(), "V100", "win32", "Release", SimdWidth::W8).unwrap();
        assert!(commands[0].command.contains("/p:Configuration=ReleaseAVX;Platform=win32"));
        assert!(commands[0].command.contains("PlatformToolset=v100"));
    }

    #[test]
    fn test_unknown_compiler_is_fatal_on_both_branches() {
        let err = windows_commands(&engine(), "MINGW", "x64", "Release", SimdWidth::W4)
            .unwrap_err();
        assert!(matches!(err, BenchError::UnknownCompiler(_)));

        let err = unix_commands(&engine(), "TCC", "x64", "Release", &[], SimdWidth::W4)
            .unwrap_err();
        assert!(matches!(err, BenchError::UnknownCompiler(_)));
    }

    #[test]
    fn test_unix_rejects_non_x64_platform() {
        let err = unix_commands(&engine(), "GCC", "arm", "Release", &[], SimdWidth::W4)
            .unwrap_err();
        assert!(matches!(err, BenchError::UnknownPlatform(_)));
    }

    #[test]
    fn test_unix_engine_defines_follow_compiler_and_coproc() {
        let isas = vec!["sse3".to_string(), "knc".to_string()];
        let commands =
            unix_commands(&engine(), "ICC", "x64", "Release", &isas, SimdWidth::W4).unwrap();
        let engine_cmd = &commands[0].command;
        assert!(engine_cmd.starts_with("cd /home/ci/rtcore;"));
        assert!(engine_cmd.contains("-D COMPILER=ICC"));
        assert!(engine_cmd.contains("-D TARGET_AVX2=ON"));
        assert!(engine_cmd.contains("-D TARGET_XEON_PHI=ON"));
        assert!(engine_cmd.contains("-D CMAKE_BUILD_TYPE=Release"));
        assert!(engine_cmd.ends_with("make clean; make -j 8"));

        let gcc = unix_commands(&engine(), "GCC", "x64", "Release", &[], SimdWidth::W4).unwrap();
        assert!(gcc[0].command.contains("-D TARGET_SSE41=OFF"));
        assert!(gcc[0].command.contains("-D TARGET_XEON_PHI=OFF"));
    }

    #[test]
    fn test_unix_renderer_wide_targets_only_for_icc_at_width_8() {
        let narrow =
            unix_commands(&engine(), "ICC", "x64", "Release", &[], SimdWidth::W4).unwrap();
        assert!(narrow[1].command.contains("-D TARGET_AVX=OFF"));
        assert!(narrow[1].command.contains("-D TARGET_SSE41=ON"));

        let wide = unix_commands(&engine(), "ICC", "x64", "Release", &[], SimdWidth::W8).unwrap();
        assert!(wide[1].command.contains("-D TARGET_AVX=ON"));
        assert!(wide[1].command.contains("-D TARGET_AVX2=ON"));
        assert!(wide[1].command.contains("-D BUILD_SINGLERAY_DEVICE=ON"));
    }

    #[test]
    fn test_compile_sweep_builds_both_widths_per_triple() {
        let space = MatrixConfig::default().space(TargetOs::Unix);
        let mut runner = RecordingRunner::default();
        compile_sweep(&mut runner, &space, &engine()).unwrap();
        // one triple, two widths, two trees each
        assert_eq!(runner.invocations.len(), 4);
    }
}

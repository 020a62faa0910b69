use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use tracing::warn;

use rtbench_core::compile::EngineConfig;
use rtbench_core::MatrixConfig;

/// Sweep configuration: the matrix lists plus the engine locations.
///
/// Loaded with precedence defaults < file < environment; every field has a
/// default mirroring the historical sweep, so running without a config file
/// is fine.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Configuration matrix the sweeps walk
    pub matrix: MatrixConfig,
    /// Engine install/source directories
    pub engine: EngineConfig,
}

impl SweepConfig {
    /// Load configuration, apply environment overrides, expand paths
    pub fn load(config_file: Option<PathBuf>) -> Result<Self> {
        let mut config = Self::from_file_or_default(config_file)?;

        if let Ok(dir) = std::env::var("RTBENCH_ENGINE_DIR") {
            config.engine.windows_install_dir = dir;
        } else if config.engine.windows_install_dir.is_empty() {
            warn!("RTBENCH_ENGINE_DIR not set; Windows build commands would be malformed");
        }

        config.engine.unix_source_dir =
            shellexpand::tilde(&config.engine.unix_source_dir).into_owned();

        Ok(config)
    }

    fn from_file_or_default(config_file: Option<PathBuf>) -> Result<Self> {
        let path = config_file.or_else(default_config_path);
        match path {
            Some(path) if path.exists() => {
                let content = std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read config file {}", path.display()))?;
                toml::from_str(&content)
                    .with_context(|| format!("failed to parse config file {}", path.display()))
            }
            _ => Ok(Self::default()),
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("rtbench").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_mirror_the_historical_sweep() {
        let config = SweepConfig::default();
        assert_eq!(config.matrix.scenes, vec!["conference"]);
        assert_eq!(config.matrix.builds, vec!["Release"]);
        assert_eq!(config.matrix.unix.isas16, vec!["knc"]);
        assert!(config.matrix.windows.isas16.is_empty());
        assert_eq!(config.engine.unix_source_dir, "~/Projects/rtcore");
    }

    #[test]
    fn test_file_values_override_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[matrix]\nscenes = [\"crown\", \"headlight\"]\n\n\
             [matrix.unix]\ncompilers = [\"GCC\", \"ICC\"]\n\n\
             [engine]\nunix_source_dir = \"/src/rtcore\"\n"
        )
        .unwrap();

        let config = SweepConfig::load(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.matrix.scenes, vec!["crown", "headlight"]);
        assert_eq!(config.matrix.unix.compilers, vec!["GCC", "ICC"]);
        assert_eq!(config.engine.unix_source_dir, "/src/rtcore");
        // untouched sections keep their defaults
        assert_eq!(config.matrix.devices, vec!["singleray", "ispc"]);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config =
            SweepConfig::load(Some(PathBuf::from("/nonexistent/rtbench.toml"))).unwrap();
        assert_eq!(config.matrix.scenes, vec!["conference"]);
    }

    #[test]
    fn test_tilde_expansion_on_unix_source_dir() {
        let config = SweepConfig::load(None).unwrap();
        assert!(!config.engine.unix_source_dir.starts_with('~'));
    }
}

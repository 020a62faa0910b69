//! Configuration space: the cross product of operating system, compiler,
//! platform, build type, device, scene, and instruction-set target that one
//! sweep walks.
//!
//! The lists are data (deserialized from the sweep config file); the cross
//! product itself is generated on the fly by the phase loops, never stored.

use serde::Deserialize;
use std::fmt;

/// Instruction-set target that runs on the co-processor; it gets a device
/// suffix at render time and a dedicated set of build toggles
pub const COPROC_ISA: &str = "knc";

/// Operating system a sweep targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TargetOs {
    Windows,
    Unix,
}

impl TargetOs {
    /// Identifier used in log file names and progress output
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetOs::Windows => "windows",
            TargetOs::Unix => "unix",
        }
    }

    /// Image format the renderer writes on this OS
    pub fn image_extension(&self) -> &'static str {
        match self {
            TargetOs::Windows => "tga",
            TargetOs::Unix => "jpg",
        }
    }
}

impl fmt::Display for TargetOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// SIMD width of a binary build; 16-wide exists only for the co-processor
/// targets on Unix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimdWidth {
    W4,
    W8,
    W16,
}

/// One fully-specified unit of compile/render/extract work.
///
/// Used directly as a map key; the string form produced by [`Config::base_name`]
/// only names files on disk.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Config {
    pub os: TargetOs,
    pub compiler: String,
    pub platform: String,
    pub build: String,
    pub scene: String,
    pub device: String,
    pub isa: String,
}

impl Config {
    /// Canonical file-name stem for this configuration's log and image
    pub fn base_name(&self) -> String {
        format!(
            "{}_{}_{}_{}_{}_{}_{}",
            self.os, self.compiler, self.platform, self.build, self.scene, self.device, self.isa
        )
    }
}

/// Per-OS matrix lists
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OsLists {
    pub compilers: Vec<String>,
    pub platforms: Vec<String>,
    /// 4-wide instruction-set targets
    pub isas4: Vec<String>,
    /// 8-wide instruction-set targets
    pub isas8: Vec<String>,
    /// 16-wide (co-processor) targets; empty on Windows
    pub isas16: Vec<String>,
}

impl Default for OsLists {
    fn default() -> Self {
        Self {
            compilers: vec!["ICC".to_string()],
            platforms: vec!["x64".to_string()],
            isas4: vec!["sse3".to_string(), "sse41".to_string()],
            isas8: vec!["avx".to_string()],
            isas16: Vec::new(),
        }
    }
}

/// The full sweep matrix, shared lists plus per-OS lists
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MatrixConfig {
    pub builds: Vec<String>,
    pub devices: Vec<String>,
    pub scenes: Vec<String>,
    pub windows: OsLists,
    pub unix: OsLists,
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            builds: vec!["Release".to_string()],
            devices: vec!["singleray".to_string(), "ispc".to_string()],
            scenes: vec!["conference".to_string()],
            windows: OsLists::default(),
            unix: OsLists {
                isas16: vec!["knc".to_string()],
                ..OsLists::default()
            },
        }
    }
}

impl MatrixConfig {
    /// Resolve the matrix for one OS
    pub fn space(&self, os: TargetOs) -> ConfigSpace {
        let lists = match os {
            TargetOs::Windows => &self.windows,
            TargetOs::Unix => &self.unix,
        };
        ConfigSpace {
            os,
            compilers: lists.compilers.clone(),
            platforms: lists.platforms.clone(),
            builds: self.builds.clone(),
            devices: self.devices.clone(),
            scenes: self.scenes.clone(),
            isas4: lists.isas4.clone(),
            isas8: lists.isas8.clone(),
            isas16: lists.isas16.clone(),
        }
    }
}

/// Resolved configuration space for a single OS
#[derive(Debug, Clone)]
pub struct ConfigSpace {
    pub os: TargetOs,
    pub compilers: Vec<String>,
    pub platforms: Vec<String>,
    pub builds: Vec<String>,
    pub devices: Vec<String>,
    pub scenes: Vec<String>,
    pub isas4: Vec<String>,
    pub isas8: Vec<String>,
    pub isas16: Vec<String>,
}

impl ConfigSpace {
    /// All instruction-set targets, 4-wide then 8-wide then 16-wide
    pub fn isas(&self) -> Vec<String> {
        let mut all = self.isas4.clone();
        all.extend(self.isas8.iter().cloned());
        all.extend(self.isas16.iter().cloned());
        all
    }

    /// Targets of a single width; compile builds one binary per width
    pub fn isa_subset(&self, width: SimdWidth) -> &[String] {
        match width {
            SimdWidth::W4 => &self.isas4,
            SimdWidth::W8 => &self.isas8,
            SimdWidth::W16 => &self.isas16,
        }
    }

    /// (compiler, platform, build) triples in sweep order
    pub fn build_triples(&self) -> Vec<(String, String, String)> {
        let mut triples = Vec::new();
        for compiler in &self.compilers {
            for platform in &self.platforms {
                for build in &self.builds {
                    triples.push((compiler.clone(), platform.clone(), build.clone()));
                }
            }
        }
        triples
    }

    /// Every configuration tuple this OS's extract phase visits, in sweep
    /// order: compiler, platform, build, scene, device, isa
    pub fn all_configs(&self) -> Vec<Config> {
        let isas = self.isas();
        let mut configs = Vec::new();
        for (compiler, platform, build) in self.build_triples() {
            for scene in &self.scenes {
                for device in &self.devices {
                    for isa in &isas {
                        configs.push(Config {
                            os: self.os,
                            compiler: compiler.clone(),
                            platform: platform.clone(),
                            build: build.clone(),
                            scene: scene.clone(),
                            device: device.clone(),
                            isa: isa.clone(),
                        });
                    }
                }
            }
        }
        configs
    }
}

//! Running averages over the sweep, keyed by a closed set of aggregation
//! dimensions instead of ad hoc concatenated strings.
//!
//! One aggregator is built per extract run; a fully-parsed log contributes
//! exactly one sample to each of its four buckets.

use std::collections::HashMap;

use crate::space::{Config, TargetOs};

/// The three numeric metrics of one successfully parsed log
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Sample {
    /// Acceleration structure build time in seconds
    pub build_time: f64,
    /// Peak memory in megabytes
    pub memory_mb: f64,
    /// Throughput in million rays per second
    pub mrps: f64,
}

/// Aggregation dimension a sample lands in
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AggregateKey {
    ByCompiler(String),
    ByPlatform(String),
    ByIsa(String),
    /// Synthetic "average" scene: everything but the scene field
    BySceneAverage {
        os: TargetOs,
        compiler: String,
        platform: String,
        build: String,
        device: String,
        isa: String,
    },
}

impl AggregateKey {
    /// The scene-average bucket a configuration belongs to
    pub fn scene_average(config: &Config) -> Self {
        AggregateKey::BySceneAverage {
            os: config.os,
            compiler: config.compiler.clone(),
            platform: config.platform.clone(),
            build: config.build.clone(),
            device: config.device.clone(),
            isa: config.isa.clone(),
        }
    }
}

#[derive(Debug, Default)]
struct Bucket {
    build_time: f64,
    memory_mb: f64,
    mrps: f64,
    count: u32,
}

/// Sum/count accumulators for every key seen so far
#[derive(Debug, Default)]
pub struct Aggregator {
    buckets: HashMap<AggregateKey, Bucket>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one sample to one bucket
    pub fn record(&mut self, key: AggregateKey, sample: Sample) {
        let bucket = self.buckets.entry(key).or_default();
        bucket.build_time += sample.build_time;
        bucket.memory_mb += sample.memory_mb;
        bucket.mrps += sample.mrps;
        bucket.count += 1;
    }

    /// Add one sample to all four buckets a configuration belongs to
    pub fn record_config(&mut self, config: &Config, sample: Sample) {
        self.record(AggregateKey::ByCompiler(config.compiler.clone()), sample);
        self.record(AggregateKey::ByPlatform(config.platform.clone()), sample);
        self.record(AggregateKey::ByIsa(config.isa.clone()), sample);
        self.record(AggregateKey::scene_average(config), sample);
    }

    /// Number of samples recorded under a key
    pub fn count(&self, key: &AggregateKey) -> u32 {
        self.buckets.get(key).map(|b| b.count).unwrap_or(0)
    }

    /// Per-metric mean for a key; `None` when no samples landed there
    pub fn average(&self, key: &AggregateKey) -> Option<Sample> {
        let bucket = self.buckets.get(key)?;
        if bucket.count == 0 {
            return None;
        }
        let n = f64::from(bucket.count);
        Some(Sample {
            build_time: bucket.build_time / n,
            memory_mb: bucket.memory_mb / n,
            mrps: bucket.mrps / n,
        })
    }
}

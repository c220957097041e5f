//! Demangler benchmark harness
//!
//! Feeds mangled names of growing size to an external demangler running
//! under `time`, and collects wall time and peak memory per size:
//! - Payloads are generated from a [`Pattern`] and a repeat count `n`
//! - Each run goes through a [`Runner`], normally a [`TimedCommand`]
//! - The wrapper's stderr is parsed with [`parse_usage`]

mod config;
mod payload;
mod runner;
mod size;
mod usage;

pub use config::BenchConfig;
pub use payload::Pattern;
pub use runner::{Runner, TimedCommand};
pub use size::{format_size, format_size_with_suffix};
pub use usage::{parse_usage, ResourceUsage, TimeFormat};

use crate::Result;
use log::debug;
use serde::Serialize;
use std::fmt;

/// Measurement for one payload size
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Sample {
    pub n: usize,
    pub real_secs: f64,
    /// Peak resident set size in bytes
    pub max_rss: u64,
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.n, self.real_secs, format_size(self.max_rss))
    }
}

/// Run the benchmark for every size in `config`
///
/// `on_sample` sees each sample as soon as it is measured. The first
/// failing run aborts the whole benchmark.
pub fn run<R: Runner + ?Sized>(
    runner: &R,
    config: &BenchConfig,
    mut on_sample: impl FnMut(&Sample),
) -> Result<Vec<Sample>> {
    config.validate()?;

    let mut samples = Vec::new();
    for n in config.sizes() {
        let input = config.pattern.generate(n);
        debug!("n={}: {} byte payload", n, input.len());

        let stderr = runner.run(input.as_bytes())?;
        let usage = parse_usage(&stderr, config.time_format)?;
        let sample = Sample {
            n,
            real_secs: usage.real_secs,
            max_rss: usage.max_rss,
        };
        on_sample(&sample);
        samples.push(sample);
    }
    Ok(samples)
}

//! Benchmark configuration
//!
//! Loaded from `~/.config/devscripts/bench.json` when present, or from an
//! explicit path. Missing fields fall back to the defaults below.

use super::{Pattern, TimeFormat};
use crate::{Error, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    /// Resource-usage wrapper
    pub time_bin: PathBuf,
    pub time_args: Vec<String>,
    pub time_format: TimeFormat,
    /// Demangler under test
    pub demangler: PathBuf,
    pub demangler_args: Vec<String>,
    pub pattern: Pattern,
    /// First repeat count
    pub start: usize,
    /// Last repeat count (inclusive)
    pub limit: usize,
    /// Growth factor between runs
    pub factor: usize,
}

impl Default for BenchConfig {
    fn default() -> Self {
        BenchConfig {
            time_bin: PathBuf::from("/usr/bin/time"),
            time_args: vec!["-l".to_string()],
            time_format: TimeFormat::Bsd,
            demangler: PathBuf::from("out/gn/bin/llvm-undname"),
            demangler_args: Vec::new(),
            pattern: Pattern::NestedStatic,
            start: 1000,
            limit: 100_000_000,
            factor: 10,
        }
    }
}

impl BenchConfig {
    /// Default config file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("devscripts").join("bench.json"))
    }

    /// Load from `path`, or from the default location if it exists
    ///
    /// An explicit path must exist; a missing default file yields the
    /// built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Some(p) if p.exists() => p,
                _ => return Ok(Self::default()),
            },
        };

        debug!("loading bench config from {}", path.display());
        let content = std::fs::read_to_string(&path)?;
        serde_json::from_str(&content).map_err(|e| {
            Error::Config(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.start == 0 {
            return Err(Error::Config("start must be at least 1".into()));
        }
        if self.factor < 2 {
            return Err(Error::Config("factor must be at least 2".into()));
        }
        if let Some(largest) = self.sizes().last() {
            if self.pattern.checked_len(largest).is_none() {
                return Err(Error::Config(format!(
                    "payload for n={} does not fit in memory",
                    largest
                )));
            }
        }
        Ok(())
    }

    /// Repeat counts `start, start*factor, ...` up to `limit`
    pub fn sizes(&self) -> impl Iterator<Item = usize> {
        let (factor, limit) = (self.factor, self.limit);
        std::iter::successors(Some(self.start), move |n| n.checked_mul(factor))
            .take_while(move |n| *n <= limit)
    }
}

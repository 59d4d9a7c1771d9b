//! Time series sources.
//!
//! Resolving a lazy data source into a materialized series is a loader
//! collaborator's job, not the estimator's. The estimator consumes a
//! plain `&[f64]`; this module models the collaborator boundary as a
//! capability trait so pipeline code can hand the estimator anything that
//! can produce a series.

use anyhow::Context;
use std::path::{Path, PathBuf};

/// Capability to produce a materialized time series.
pub trait TimeSeriesSource {
    /// Produce the full series. Sampling interval and units are the
    /// producer's contract with its own upstream, not the estimator's.
    fn produce(&self) -> anyhow::Result<Vec<f64>>;
}

/// A series already held in memory.
#[derive(Debug, Clone)]
pub struct InMemorySource {
    samples: Vec<f64>,
}

impl InMemorySource {
    pub fn new(samples: Vec<f64>) -> Self {
        Self { samples }
    }
}

impl TimeSeriesSource for InMemorySource {
    fn produce(&self) -> anyhow::Result<Vec<f64>> {
        Ok(self.samples.clone())
    }
}

/// A line-delimited text file of samples, one float per line.
///
/// Blank lines and `#` comment lines are skipped; anything else that
/// fails to parse aborts the load with the offending line number.
#[derive(Debug, Clone)]
pub struct SampleFile {
    path: PathBuf,
}

impl SampleFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl TimeSeriesSource for SampleFile {
    fn produce(&self) -> anyhow::Result<Vec<f64>> {
        let raw = std::fs::read_to_string(&self.path)
            .with_context(|| format!("reading samples from {}", self.path.display()))?;

        let mut samples = Vec::new();
        for (lineno, line) in raw.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let value: f64 = trimmed.parse().with_context(|| {
                format!("{}:{}: not a number: {trimmed:?}", self.path.display(), lineno + 1)
            })?;
            samples.push(value);
        }

        tracing::debug!(
            samples = samples.len(),
            path = %self.path.display(),
            "loaded sample file"
        );
        Ok(samples)
    }
}

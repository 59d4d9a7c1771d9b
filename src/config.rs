//! Estimator configuration.
//!
//! All tuning knobs of the estimation pipeline live in one explicit struct
//! with named fields and documented defaults, validated up front at
//! construction time — no parameter defaults silently mid-computation.
//!
//! The four required fields (`expected_tp`, `delta`, `repetitions`,
//! `window_size`) have no sensible universal default and must always be
//! supplied; everything else defaults to the values the estimation
//! workflow was tuned with.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::EstimatorError;

// ============================================================================
// Defaults
// ============================================================================

/// Fraction of the window length used as inter-window shift.
pub const DEFAULT_WINDOW_SHIFT_RATE: f64 = 0.01;

/// Divisions per repeated window when sizing averaging segments.
pub const DEFAULT_WINDOW_DIVISION: usize = 1;

/// Overlap fraction between consecutive averaging segments.
pub const DEFAULT_SEGMENT_OVERLAP_RATE: f64 = 0.5;

/// Sampling frequency in Hz (unit sample spacing).
pub const DEFAULT_SAMPLING_FREQUENCY: f64 = 1.0;

const fn default_window_shift_rate() -> f64 {
    DEFAULT_WINDOW_SHIFT_RATE
}

const fn default_window_division() -> usize {
    DEFAULT_WINDOW_DIVISION
}

const fn default_segment_overlap_rate() -> f64 {
    DEFAULT_SEGMENT_OVERLAP_RATE
}

const fn default_sampling_frequency() -> f64 {
    DEFAULT_SAMPLING_FREQUENCY
}

const fn default_true() -> bool {
    true
}

// ============================================================================
// EstimatorConfig
// ============================================================================

/// Configuration for [`PeriodEstimator`](crate::estimator::PeriodEstimator).
///
/// The spectrum is filtered to `[1/expected_tp - delta, 1/expected_tp + delta]`
/// before moment integration, so `delta` must be wide enough to retain at
/// least two spectral bins at the configured frequency resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EstimatorConfig {
    /// Expected natural period in seconds; band center = `1/expected_tp` Hz.
    pub expected_tp: f64,

    /// Half-width of the frequency band around the center, in Hz.
    pub delta: f64,

    /// How many times each window is tiled before spectral estimation.
    /// Lengthens the signal so averaging segments can exceed the raw
    /// window, at the cost of spurious low-frequency content at the
    /// repetition boundaries.
    pub repetitions: usize,

    /// Length of each extracted window, in samples.
    pub window_size: usize,

    /// Fraction of `window_size` used as shift between windows, in (0, 1].
    #[serde(default = "default_window_shift_rate")]
    pub window_shift_rate: f64,

    /// Segment divisor: `segment_size = repetitions * window_size / window_division`.
    #[serde(default = "default_window_division")]
    pub window_division: usize,

    /// Overlap fraction between averaging segments, in [0, 1).
    #[serde(default = "default_segment_overlap_rate")]
    pub segment_overlap_rate: f64,

    /// Sampling frequency of the input series, in Hz.
    #[serde(default = "default_sampling_frequency")]
    pub sampling_frequency: f64,

    /// Report min/max period bounds from the last processed window rather
    /// than a true reduction across windows. This mirrors the historical
    /// behavior of the estimator (a probable defect kept for fidelity);
    /// set to `false` for a true min/max across all windows.
    #[serde(default = "default_true")]
    pub use_last_window_bounds: bool,

    /// Estimate windows in parallel. Output is bit-identical to the
    /// sequential path; window order is preserved by index.
    #[serde(default)]
    pub parallel: bool,
}

impl EstimatorConfig {
    /// Build a config with the given required parameters and all optional
    /// fields at their defaults.
    pub fn new(expected_tp: f64, delta: f64, repetitions: usize, window_size: usize) -> Self {
        Self {
            expected_tp,
            delta,
            repetitions,
            window_size,
            window_shift_rate: DEFAULT_WINDOW_SHIFT_RATE,
            window_division: DEFAULT_WINDOW_DIVISION,
            segment_overlap_rate: DEFAULT_SEGMENT_OVERLAP_RATE,
            sampling_frequency: DEFAULT_SAMPLING_FREQUENCY,
            use_last_window_bounds: true,
            parallel: false,
        }
    }

    /// Load and validate a config from a TOML file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all fields, reporting the first offending one.
    ///
    /// Called by [`PeriodEstimator::new`](crate::estimator::PeriodEstimator::new),
    /// so library callers constructing the struct directly cannot smuggle
    /// an invalid value past the orchestrator.
    pub fn validate(&self) -> Result<(), EstimatorError> {
        if !(self.expected_tp.is_finite() && self.expected_tp > 0.0) {
            return Err(EstimatorError::InvalidConfiguration {
                field: "expected_tp",
                value: self.expected_tp,
                reason: "must be positive and finite",
            });
        }
        if !(self.delta.is_finite() && self.delta > 0.0) {
            return Err(EstimatorError::InvalidConfiguration {
                field: "delta",
                value: self.delta,
                reason: "must be positive and finite",
            });
        }
        if self.repetitions == 0 {
            return Err(EstimatorError::InvalidConfiguration {
                field: "repetitions",
                value: 0.0,
                reason: "must be at least 1",
            });
        }
        if self.window_size < 2 {
            return Err(EstimatorError::InvalidConfiguration {
                field: "window_size",
                value: self.window_size as f64,
                reason: "must be at least 2",
            });
        }
        if !(self.window_shift_rate > 0.0 && self.window_shift_rate <= 1.0) {
            return Err(EstimatorError::InvalidConfiguration {
                field: "window_shift_rate",
                value: self.window_shift_rate,
                reason: "must be in (0, 1]",
            });
        }
        if self.window_shift() == 0 {
            return Err(EstimatorError::InvalidConfiguration {
                field: "window_shift_rate",
                value: self.window_shift_rate,
                reason: "shift rounds down to zero samples for this window_size",
            });
        }
        if self.window_division == 0 {
            return Err(EstimatorError::InvalidConfiguration {
                field: "window_division",
                value: 0.0,
                reason: "must be at least 1",
            });
        }
        if !(self.segment_overlap_rate >= 0.0 && self.segment_overlap_rate < 1.0) {
            return Err(EstimatorError::InvalidConfiguration {
                field: "segment_overlap_rate",
                value: self.segment_overlap_rate,
                reason: "must be in [0, 1)",
            });
        }
        if !(self.sampling_frequency.is_finite() && self.sampling_frequency > 0.0) {
            return Err(EstimatorError::InvalidConfiguration {
                field: "sampling_frequency",
                value: self.sampling_frequency,
                reason: "must be positive and finite",
            });
        }
        Ok(())
    }

    /// Shift between consecutive windows, in samples.
    pub fn window_shift(&self) -> usize {
        (self.window_shift_rate * self.window_size as f64) as usize
    }

    /// Band center frequency, `1/expected_tp` Hz.
    pub fn center_frequency(&self) -> f64 {
        1.0 / self.expected_tp
    }
}

//! Spectral density estimation and band filtering.

mod band;
mod welch;

pub use band::band_filter;
pub use welch::WelchEstimator;

use serde::{Deserialize, Serialize};

/// One-sided power spectral density estimate for a single window.
///
/// `frequencies` and `power` have equal length; frequency bins are
/// monotonically increasing with uniform step `fs / segment_size`,
/// spanning `[0, fs/2]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpectralEstimate {
    /// Frequency bins (Hz).
    pub frequencies: Vec<f64>,
    /// Power spectral density at each bin (power/Hz).
    pub power: Vec<f64>,
}

impl SpectralEstimate {
    /// Frequency resolution (Hz per bin), 0 for degenerate estimates.
    pub fn resolution(&self) -> f64 {
        if self.frequencies.len() < 2 {
            return 0.0;
        }
        self.frequencies[1] - self.frequencies[0]
    }
}

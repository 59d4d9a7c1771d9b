//! Error types for the natural period estimator.
//!
//! Every failure mode is detected at the point of occurrence and surfaced
//! immediately — the computation is deterministic, so nothing is retried,
//! and no failure is papered over with a default value (a fabricated
//! period estimate would corrupt downstream statistics).

use thiserror::Error;

/// Pipeline stage that produced a per-window failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Welch spectral density estimation.
    Spectral,
    /// Frequency-band filtering around the expected center frequency.
    Filter,
    /// Spectral moment integration and period derivation.
    Moments,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Spectral => write!(f, "spectral estimation"),
            Self::Filter => write!(f, "band filtering"),
            Self::Moments => write!(f, "moment integration"),
        }
    }
}

/// Errors in natural period estimation.
#[derive(Error, Debug)]
pub enum EstimatorError {
    /// A configuration field failed validation.
    #[error("invalid configuration: {field} = {value} ({reason})")]
    InvalidConfiguration {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// The window extractor produced zero windows for this series.
    #[error(
        "no windows: series of {series_len} samples with window_size {window_size} \
         and shift {shift} yields zero windows"
    )]
    NoWindows {
        series_len: usize,
        window_size: usize,
        shift: usize,
    },

    /// The repeated signal is shorter than one averaging segment.
    #[error("insufficient samples: need {needed} for one segment, have {available}")]
    InsufficientSamples { needed: usize, available: usize },

    /// The filtered frequency band has too few points for quadrature, or
    /// starts at 0 Hz (period bound would divide by zero).
    #[error(
        "empty band: [{low:.6}, {high:.6}] Hz retains {retained} spectral bins \
         (need at least 2, first bin must be above 0 Hz)"
    )]
    EmptyBand {
        low: f64,
        high: f64,
        retained: usize,
    },

    /// The second-order moment vanished, leaving t0 = sqrt(m0/m2) undefined.
    #[error("degenerate moments: m2 = 0 with m0 = {m0:.6e}, period is undefined")]
    DegenerateMoments { m0: f64 },

    /// A per-window failure, annotated with the window index and stage so
    /// misconfiguration (e.g. a delta too small for the bin spacing) is
    /// diagnosable from the message alone.
    #[error("window {index} failed during {stage}: {source}")]
    AtWindow {
        index: usize,
        stage: Stage,
        #[source]
        source: Box<EstimatorError>,
    },
}

impl EstimatorError {
    /// Attach window index and stage context to a per-window failure.
    pub fn at_window(self, index: usize, stage: Stage) -> Self {
        Self::AtWindow {
            index,
            stage,
            source: Box::new(self),
        }
    }
}

//! Natural period estimation: the window loop that ties extraction,
//! Welch estimation, band filtering, and moment integration together.
//!
//! The whole estimation is a pure computation over an in-memory series —
//! no I/O happens here. Per-window estimation reads only the shared
//! immutable series, so the parallel path is a plain rayon fan-out with
//! index-ordered collection and produces bit-identical output to the
//! sequential path.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::config::EstimatorConfig;
use crate::error::{EstimatorError, Stage};
use crate::moments::{compute_moments, SpectralMoments};
use crate::spectral::{band_filter, SpectralEstimate, WelchEstimator};
use crate::windowing::WindowIter;

/// Integration step handed to the moment quadrature. The historical
/// workflow integrates over bin index, not frequency; the m0/m2 ratio and
/// hence t0 are invariant to this choice.
const MOMENT_INTEGRATION_STEP: f64 = 1.0;

// ============================================================================
// Result types
// ============================================================================

/// An opaque `(x, y)` pair handed to an external plotting collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticSeries {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

/// Aggregate result of one estimation run over a series.
///
/// Created fresh per [`PeriodEstimator::estimate`] call and consumed by
/// the caller; nothing is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodReport {
    /// Period estimate `t0` for each window, in window order.
    pub periods: Vec<f64>,
    /// End sample index of each window (the historical time axis of the
    /// per-window diagnostic).
    pub window_ends: Vec<f64>,
    /// Mean of the per-window periods.
    pub mean: f64,
    /// Shortest period bound. With `use_last_window_bounds` this is the
    /// LAST window's `t_min`, not a reduction — see config docs.
    pub t_min: f64,
    /// Longest period bound; same caveat as `t_min`.
    pub t_max: f64,
    /// The last processed window's spectral estimate, kept for diagnostics.
    pub spectrum: SpectralEstimate,
}

impl PeriodReport {
    /// Frequency/PSD curve of the last window, for external plotting.
    pub fn spectral_diagnostic(&self) -> DiagnosticSeries {
        DiagnosticSeries {
            x: self.spectrum.frequencies.clone(),
            y: self.spectrum.power.clone(),
        }
    }

    /// Per-window period curve (x = window number), for external plotting.
    pub fn period_diagnostic(&self) -> DiagnosticSeries {
        DiagnosticSeries {
            x: (0..self.periods.len()).map(|i| i as f64).collect(),
            y: self.periods.clone(),
        }
    }
}

/// Outcome of one window's spectral → filter → moments pipeline.
struct WindowOutcome {
    period: f64,
    moments: SpectralMoments,
    spectrum: SpectralEstimate,
    end_index: usize,
}

// ============================================================================
// PeriodEstimator
// ============================================================================

/// Orchestrates natural period estimation over all windows of a series.
pub struct PeriodEstimator {
    config: EstimatorConfig,
    welch: WelchEstimator,
}

impl PeriodEstimator {
    /// Build an estimator, validating the configuration up front.
    pub fn new(config: EstimatorConfig) -> Result<Self, EstimatorError> {
        config.validate()?;
        let welch = WelchEstimator::new(
            config.window_size,
            config.repetitions,
            config.window_division,
            config.segment_overlap_rate,
            config.sampling_frequency,
        )?;
        Ok(Self { config, welch })
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Estimate the natural period of `series`.
    ///
    /// Runs the per-window pipeline over every window the extractor
    /// yields and aggregates the results. A single failing window aborts
    /// the whole estimate: partial aggregates (especially the
    /// last-window-dependent min/max bounds) would be misleading.
    pub fn estimate(&self, series: &[f64]) -> Result<PeriodReport, EstimatorError> {
        let windows = WindowIter::new(
            series,
            self.config.window_size,
            self.config.window_shift_rate,
        )?;

        let total = windows.total_windows();
        if total == 0 {
            return Err(EstimatorError::NoWindows {
                series_len: series.len(),
                window_size: self.config.window_size,
                shift: windows.shift(),
            });
        }

        let center = self.config.center_frequency();
        let low = center - self.config.delta;
        let high = center + self.config.delta;

        tracing::debug!(
            windows = total,
            shift = windows.shift(),
            band_low = low,
            band_high = high,
            "starting natural period estimation"
        );

        let outcomes = if self.config.parallel {
            // Collect every outcome first, then surface the lowest-index
            // failure, so the reported window matches the sequential path.
            let results: Vec<Result<WindowOutcome, EstimatorError>> = (0..total)
                .into_par_iter()
                .map(|i| self.analyze_window(i, &windows, low, high))
                .collect();
            let mut outcomes = Vec::with_capacity(total);
            for result in results {
                outcomes.push(result?);
            }
            outcomes
        } else {
            let mut outcomes = Vec::with_capacity(total);
            for i in 0..total {
                outcomes.push(self.analyze_window(i, &windows, low, high)?);
            }
            outcomes
        };

        Ok(self.aggregate(outcomes))
    }

    /// Run spectral → filter → moments for window `i`.
    fn analyze_window(
        &self,
        index: usize,
        windows: &WindowIter<'_>,
        low: f64,
        high: f64,
    ) -> Result<WindowOutcome, EstimatorError> {
        let window = windows.window(index);

        let spectrum = self
            .welch
            .estimate(window)
            .map_err(|e| e.at_window(index, Stage::Spectral))?;

        let (f_band, s_band) = band_filter(&spectrum.frequencies, &spectrum.power, low, high);
        if f_band.len() < 2 {
            return Err(EstimatorError::EmptyBand {
                low,
                high,
                retained: f_band.len(),
            }
            .at_window(index, Stage::Filter));
        }

        let moments = compute_moments(&f_band, &s_band, MOMENT_INTEGRATION_STEP)
            .map_err(|e| e.at_window(index, Stage::Moments))?;
        let period = moments
            .period()
            .map_err(|e| e.at_window(index, Stage::Moments))?;

        tracing::trace!(
            window = index,
            t0 = period,
            m0 = moments.m0,
            m2 = moments.m2,
            "window period estimated"
        );

        Ok(WindowOutcome {
            period,
            moments,
            spectrum,
            end_index: windows.start_of(index) + self.config.window_size,
        })
    }

    fn aggregate(&self, mut outcomes: Vec<WindowOutcome>) -> PeriodReport {
        let periods: Vec<f64> = outcomes.iter().map(|o| o.period).collect();
        let window_ends: Vec<f64> = outcomes.iter().map(|o| o.end_index as f64).collect();
        let mean = Statistics::mean(&periods);

        // outcomes is non-empty: estimate() rejects the zero-window case.
        let (t_min, t_max) = if self.config.use_last_window_bounds {
            let last = &outcomes[outcomes.len() - 1].moments;
            (last.t_min, last.t_max)
        } else {
            outcomes.iter().fold(
                (f64::INFINITY, f64::NEG_INFINITY),
                |(t_min, t_max), o| (t_min.min(o.moments.t_min), t_max.max(o.moments.t_max)),
            )
        };

        // The caller guarantees at least one outcome; the fallback keeps
        // this path panic-free anyway.
        let spectrum = outcomes.pop().map_or_else(
            || SpectralEstimate {
                frequencies: Vec::new(),
                power: Vec::new(),
            },
            |o| o.spectrum,
        );

        tracing::debug!(
            windows = periods.len(),
            mean_period = mean,
            t_min,
            t_max,
            "estimation complete"
        );

        PeriodReport {
            periods,
            window_ends,
            mean,
            t_min,
            t_max,
            spectrum,
        }
    }
}

/// Estimate the natural period of a series with all optional parameters
/// at their defaults.
///
/// This is the single logical operation the crate exposes to pipeline
/// collaborators; the returned report carries the mean/min/max periods
/// plus both diagnostic curves.
pub fn estimate_natural_period(
    series: &[f64],
    expected_tp: f64,
    delta: f64,
    repetitions: usize,
    window_size: usize,
) -> Result<PeriodReport, EstimatorError> {
    let estimator = PeriodEstimator::new(EstimatorConfig::new(
        expected_tp,
        delta,
        repetitions,
        window_size,
    ))?;
    estimator.estimate(series)
}

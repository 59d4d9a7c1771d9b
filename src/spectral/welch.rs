//! Welch power spectral density estimation over repeated windows.
//!
//! The estimator tiles each raw window `repetitions` times so the
//! averaging-segment length can exceed the window itself while keeping the
//! window's spectral content. Tiling introduces spurious low-frequency
//! artifacts at the repetition boundaries; the downstream band filter
//! removes them for any band away from DC, so this is an accepted
//! approximation of the workflow.
//!
//! Normalization follows the standard one-sided power/Hz convention:
//! `PSD[k] = mean(|X[k]|^2) * 2 / (fs * S2)` with no doubling at DC and
//! Nyquist, where `S2` is the sum of squared taper coefficients.

use num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::f64::consts::PI;
use std::sync::Arc;

use super::SpectralEstimate;
use crate::error::EstimatorError;

/// Pre-planned Welch estimator for windows of a fixed size.
///
/// Plan once, estimate many: all windows of a series share the same
/// segment geometry, so the FFT plan and taper are built once up front.
pub struct WelchEstimator {
    fft: Arc<dyn Fft<f64>>,
    repetitions: usize,
    segment_size: usize,
    segment_step: usize,
    sampling_frequency: f64,
    taper: Vec<f64>,
    taper_s2: f64,
}

impl WelchEstimator {
    /// Plan a Welch estimator.
    ///
    /// `segment_size = floor(repetitions * window_size / division)`,
    /// clamped to a minimum of 2 so the fractional-division case degrades
    /// to the shortest usable segment instead of failing.
    /// `segment_overlap = floor(overlap_rate * segment_size)`; with
    /// `overlap_rate` in [0, 1) this is always below the segment length.
    pub fn new(
        window_size: usize,
        repetitions: usize,
        division: usize,
        overlap_rate: f64,
        sampling_frequency: f64,
    ) -> Result<Self, EstimatorError> {
        if repetitions == 0 {
            return Err(EstimatorError::InvalidConfiguration {
                field: "repetitions",
                value: 0.0,
                reason: "must be at least 1",
            });
        }
        if division == 0 {
            return Err(EstimatorError::InvalidConfiguration {
                field: "window_division",
                value: 0.0,
                reason: "must be at least 1",
            });
        }
        if !(overlap_rate >= 0.0 && overlap_rate < 1.0) {
            return Err(EstimatorError::InvalidConfiguration {
                field: "segment_overlap_rate",
                value: overlap_rate,
                reason: "must be in [0, 1)",
            });
        }
        if !(sampling_frequency.is_finite() && sampling_frequency > 0.0) {
            return Err(EstimatorError::InvalidConfiguration {
                field: "sampling_frequency",
                value: sampling_frequency,
                reason: "must be positive and finite",
            });
        }

        let segment_size = ((repetitions * window_size) / division).max(2);
        let segment_overlap = (overlap_rate * segment_size as f64) as usize;
        let segment_step = segment_size - segment_overlap;

        // Periodic Hann taper, as Welch averaging conventionally uses.
        let taper: Vec<f64> = (0..segment_size)
            .map(|n| 0.5 * (1.0 - (2.0 * PI * n as f64 / segment_size as f64).cos()))
            .collect();
        let taper_s2: f64 = taper.iter().map(|w| w * w).sum();

        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(segment_size);

        Ok(Self {
            fft,
            repetitions,
            segment_size,
            segment_step,
            sampling_frequency,
            taper,
            taper_s2,
        })
    }

    /// Averaging segment length in samples.
    pub fn segment_size(&self) -> usize {
        self.segment_size
    }

    /// Frequency resolution of the estimate (Hz per bin).
    pub fn resolution(&self) -> f64 {
        self.sampling_frequency / self.segment_size as f64
    }

    /// Estimate the one-sided PSD of one window.
    ///
    /// Tiles the window, partitions the repeated signal into overlapping
    /// tapered segments, and averages the segment periodograms bin-wise.
    /// Fails with `InsufficientSamples` if the repeated signal is shorter
    /// than one segment.
    pub fn estimate(&self, window: &[f64]) -> Result<SpectralEstimate, EstimatorError> {
        let repeated_len = self.repetitions * window.len();
        if repeated_len < self.segment_size {
            return Err(EstimatorError::InsufficientSamples {
                needed: self.segment_size,
                available: repeated_len,
            });
        }

        let mut repeated = Vec::with_capacity(repeated_len);
        for _ in 0..self.repetitions {
            repeated.extend_from_slice(window);
        }

        let n_positive = self.segment_size / 2 + 1;
        let mut accumulated = vec![0.0_f64; n_positive];
        let mut buffer = vec![Complex::new(0.0, 0.0); self.segment_size];

        let mut n_segments = 0usize;
        let mut start = 0usize;
        while start + self.segment_size <= repeated.len() {
            for (slot, (&sample, &w)) in buffer
                .iter_mut()
                .zip(repeated[start..start + self.segment_size].iter().zip(&self.taper))
            {
                *slot = Complex::new(sample * w, 0.0);
            }

            self.fft.process(&mut buffer);

            for (acc, bin) in accumulated.iter_mut().zip(buffer.iter().take(n_positive)) {
                *acc += bin.norm_sqr();
            }

            n_segments += 1;
            start += self.segment_step;
        }

        // The length check above guarantees at least one full segment.
        debug_assert!(n_segments > 0);

        let resolution = self.resolution();
        let frequencies: Vec<f64> = (0..n_positive).map(|k| k as f64 * resolution).collect();

        // One-sided scaling: double interior bins; DC (and Nyquist, which
        // only exists for even segment sizes) appear once in the full
        // spectrum and are not doubled.
        let has_nyquist_bin = self.segment_size % 2 == 0;
        let base = 1.0 / (self.sampling_frequency * self.taper_s2 * n_segments as f64);
        let power: Vec<f64> = accumulated
            .iter()
            .enumerate()
            .map(|(k, &sum)| {
                let single_sided = k == 0 || (has_nyquist_bin && k == n_positive - 1);
                let scale = if single_sided { base } else { 2.0 * base };
                sum * scale
            })
            .collect();

        tracing::trace!(
            segments = n_segments,
            segment_size = self.segment_size,
            bins = n_positive,
            "welch estimate computed"
        );

        Ok(SpectralEstimate { frequencies, power })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(n: usize, freq: f64, fs: f64) -> Vec<f64> {
        (0..n)
            .map(|i| (2.0 * PI * freq * i as f64 / fs).sin())
            .collect()
    }

    #[test]
    fn test_peak_at_tone_frequency() {
        // 0.1 Hz tone at 1 Hz sampling; segment of 1500 bins resolves it.
        let window = sine(500, 0.1, 1.0);
        let estimator = WelchEstimator::new(500, 3, 1, 0.5, 1.0).expect("valid plan");
        let estimate = estimator.estimate(&window).expect("estimate");

        let peak_idx = estimate
            .power
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(i, _)| i)
            .expect("non-empty spectrum");
        let peak_freq = estimate.frequencies[peak_idx];
        assert!(
            (peak_freq - 0.1).abs() < 0.01,
            "peak at {peak_freq} Hz, expected ~0.1 Hz"
        );
    }

    #[test]
    fn test_bins_span_zero_to_nyquist_uniformly() {
        let window = sine(200, 0.05, 1.0);
        let estimator = WelchEstimator::new(200, 2, 1, 0.5, 1.0).expect("valid plan");
        let estimate = estimator.estimate(&window).expect("estimate");

        assert_eq!(estimate.frequencies.len(), estimate.power.len());
        assert!((estimate.frequencies[0]).abs() < 1e-12);
        let last = *estimate.frequencies.last().expect("bins");
        assert!((last - 0.5).abs() < 1e-9, "last bin {last}, expected fs/2");

        let step = estimate.resolution();
        for pair in estimate.frequencies.windows(2) {
            assert!(((pair[1] - pair[0]) - step).abs() < 1e-9);
        }
    }

    #[test]
    fn test_power_is_non_negative() {
        let window: Vec<f64> = (0..300)
            .map(|i| (i as f64 * 0.13).sin() + 0.5 * (i as f64 * 0.71).cos())
            .collect();
        let estimator = WelchEstimator::new(300, 3, 2, 0.5, 1.0).expect("valid plan");
        let estimate = estimator.estimate(&window).expect("estimate");
        assert!(estimate.power.iter().all(|&p| p >= 0.0));
    }

    #[test]
    fn test_total_power_approximates_signal_power() {
        // Integral of the PSD over [0, fs/2] should land near the mean
        // squared value of the tone (0.5 for a unit sinusoid).
        let fs = 4.0;
        let window = sine(1024, 0.5, fs);
        let estimator = WelchEstimator::new(1024, 1, 2, 0.5, fs).expect("valid plan");
        let estimate = estimator.estimate(&window).expect("estimate");

        let df = estimate.resolution();
        let total: f64 = estimate.power.iter().sum::<f64>() * df;
        assert!(
            (total - 0.5).abs() < 0.1,
            "total power {total}, expected ~0.5"
        );
    }

    #[test]
    fn test_insufficient_samples_rejected() {
        // Segment of 2*500/1 = 1000 samples, but window of 100 repeated
        // twice gives only 200.
        let estimator = WelchEstimator::new(500, 2, 1, 0.5, 1.0).expect("valid plan");
        let short = vec![0.0; 100];
        assert!(matches!(
            estimator.estimate(&short),
            Err(EstimatorError::InsufficientSamples {
                needed: 1000,
                available: 200
            })
        ));
    }

    #[test]
    fn test_fractional_division_floors_segment_size() {
        // 3 * 100 / 7 = 42.857... -> 42
        let estimator = WelchEstimator::new(100, 3, 7, 0.5, 1.0).expect("valid plan");
        assert_eq!(estimator.segment_size(), 42);
    }

    #[test]
    fn test_invalid_overlap_rejected() {
        assert!(WelchEstimator::new(100, 2, 1, 1.0, 1.0).is_err());
        assert!(WelchEstimator::new(100, 2, 1, -0.1, 1.0).is_err());
    }
}

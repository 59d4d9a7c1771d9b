//! End-to-end estimation scenarios.
//!
//! Exercises the full pipeline through the public API: window extraction,
//! Welch estimation, band filtering, moment integration, and aggregation,
//! including the documented error paths.

use natural_period::{
    estimate_natural_period, EstimatorConfig, EstimatorError, PeriodEstimator, Stage,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;

/// 0.1 Hz sinusoid sampled at 1 Hz.
fn reference_series(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| (2.0 * PI * 0.1 * i as f64).sin())
        .collect()
}

#[test]
fn pure_sinusoid_period_within_five_percent() {
    let series = reference_series(2000);
    let report = estimate_natural_period(&series, 10.0, 0.02, 3, 500)
        .expect("pure tone should estimate cleanly");

    let relative_error = (report.mean - 10.0).abs() / 10.0;
    assert!(
        relative_error < 0.05,
        "mean period {:.4}s deviates {:.1}% from 10s",
        report.mean,
        relative_error * 100.0
    );

    // Period bounds come from the retained band edges and must bracket
    // the true period.
    assert!(report.t_min <= 10.0 && 10.0 <= report.t_max);

    // Every per-window estimate should be positive and finite.
    assert!(report
        .periods
        .iter()
        .all(|t0| t0.is_finite() && *t0 > 0.0));
}

#[test]
fn window_size_equal_to_series_length_is_no_windows() {
    let series = reference_series(500);
    let result = estimate_natural_period(&series, 10.0, 0.02, 3, 500);

    match result {
        Err(EstimatorError::NoWindows {
            series_len,
            window_size,
            ..
        }) => {
            assert_eq!(series_len, 500);
            assert_eq!(window_size, 500);
        }
        other => panic!("expected NoWindows, got {other:?}"),
    }
}

#[test]
fn vanishing_delta_is_empty_band_on_first_window() {
    let series = reference_series(2000);
    // Center the band between two spectral bins: segment size is 1500,
    // so bins sit at k/1500 Hz; 0.1003 Hz with a 1e-5 half-width misses
    // them all.
    let config = EstimatorConfig::new(1.0 / 0.1003, 1e-5, 3, 500);
    let result = PeriodEstimator::new(config)
        .expect("config is valid")
        .estimate(&series);

    match result {
        Err(EstimatorError::AtWindow {
            index: 0,
            stage: Stage::Filter,
            source,
        }) => {
            assert!(matches!(*source, EstimatorError::EmptyBand { .. }));
        }
        other => panic!("expected first-window EmptyBand, got {other:?}"),
    }
}

#[test]
fn repeated_invocation_is_bit_identical() {
    let series = reference_series(2000);
    let first = estimate_natural_period(&series, 10.0, 0.02, 3, 500).expect("estimate");
    let second = estimate_natural_period(&series, 10.0, 0.02, 3, 500).expect("estimate");

    assert_eq!(first.mean.to_bits(), second.mean.to_bits());
    assert_eq!(first.t_max.to_bits(), second.t_max.to_bits());
    assert_eq!(first.t_min.to_bits(), second.t_min.to_bits());
    for (a, b) in first.periods.iter().zip(second.periods.iter()) {
        assert_eq!(a.to_bits(), b.to_bits());
    }
}

#[test]
fn parallel_path_reproduces_sequential_output() {
    let series = reference_series(2000);

    let mut config = EstimatorConfig::new(10.0, 0.02, 3, 500);
    let sequential = PeriodEstimator::new(config.clone())
        .expect("estimator")
        .estimate(&series)
        .expect("estimate");

    config.parallel = true;
    let parallel = PeriodEstimator::new(config)
        .expect("estimator")
        .estimate(&series)
        .expect("estimate");

    assert_eq!(sequential.mean.to_bits(), parallel.mean.to_bits());
    assert_eq!(sequential.t_min.to_bits(), parallel.t_min.to_bits());
    assert_eq!(sequential.t_max.to_bits(), parallel.t_max.to_bits());
    assert_eq!(sequential.periods.len(), parallel.periods.len());
    for (s, p) in sequential.periods.iter().zip(parallel.periods.iter()) {
        assert_eq!(s.to_bits(), p.to_bits());
    }
}

#[test]
fn noisy_sinusoid_stays_near_true_period() {
    let mut rng = StdRng::seed_from_u64(42);
    let series: Vec<f64> = (0..2000)
        .map(|i| {
            let t = i as f64;
            (2.0 * PI * 0.1 * t).sin() + 0.3 * rng.gen_range(-1.0..1.0)
        })
        .collect();

    let report = estimate_natural_period(&series, 10.0, 0.02, 3, 500)
        .expect("noisy tone should still estimate");

    // Band filtering rejects the broadband noise; allow a looser 10%.
    let relative_error = (report.mean - 10.0).abs() / 10.0;
    assert!(
        relative_error < 0.10,
        "mean period {:.4}s deviates {:.1}% from 10s under noise",
        report.mean,
        relative_error * 100.0
    );
}

#[test]
fn diagnostics_are_plot_ready_pairs() {
    let series = reference_series(2000);
    let report = estimate_natural_period(&series, 10.0, 0.02, 3, 500).expect("estimate");

    let spectral = report.spectral_diagnostic();
    assert_eq!(spectral.x.len(), spectral.y.len());
    // Frequency axis spans [0, fs/2] with fs = 1.
    assert!((spectral.x[0]).abs() < 1e-12);
    let nyquist = spectral.x.last().copied().unwrap_or(f64::NAN);
    assert!((nyquist - 0.5).abs() < 1e-9);

    let period = report.period_diagnostic();
    assert_eq!(period.x.len(), report.periods.len());
    assert_eq!(period.y, report.periods);
}

#[test]
fn bounds_reduction_mode_brackets_every_window() {
    let series = reference_series(2000);
    let mut config = EstimatorConfig::new(10.0, 0.02, 3, 500);
    config.use_last_window_bounds = false;

    let report = PeriodEstimator::new(config)
        .expect("estimator")
        .estimate(&series)
        .expect("estimate");

    assert!(report.t_min < report.t_max);
    assert!(report.t_min <= 10.0 && 10.0 <= report.t_max);
}

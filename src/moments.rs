//! Spectral moment integration over a filtered frequency band.
//!
//! Moments are computed by composite Simpson quadrature with a fixed step.
//! When the band holds an even number of points (odd interval count,
//! Simpson needs an even one) the final interval is closed with a
//! trapezoid, which only costs accuracy on that single interval.

use serde::{Deserialize, Serialize};

use crate::error::EstimatorError;

/// Zero- and second-order spectral moments with the band's period bounds.
///
/// `t_max = 1/f_first` and `t_min = 1/f_last` — the names track period
/// bounds, not frequency bounds: the lowest retained frequency bounds the
/// longest period and vice versa.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SpectralMoments {
    /// Zero-order moment, `∫ S(f) df` over the band.
    pub m0: f64,
    /// Second-order moment, `∫ f² S(f) df` over the band.
    pub m2: f64,
    /// Shortest period in the band, `1 / f_last`.
    pub t_min: f64,
    /// Longest period in the band, `1 / f_first`.
    pub t_max: f64,
}

impl SpectralMoments {
    /// Characteristic period `t0 = sqrt(m0/m2)`.
    ///
    /// Fails with `DegenerateMoments` when `m2 = 0`, which leaves the
    /// ratio undefined.
    pub fn period(&self) -> Result<f64, EstimatorError> {
        if self.m2 == 0.0 {
            return Err(EstimatorError::DegenerateMoments { m0: self.m0 });
        }
        Ok((self.m0 / self.m2).sqrt())
    }
}

/// Integrate the moments of a filtered `(f, S)` band with step `dx`.
///
/// Fails with `EmptyBand` if the band has fewer than 2 points (quadrature
/// undefined) or starts at 0 Hz (the `t_max = 1/f_first` bound would
/// divide by zero).
pub fn compute_moments(
    frequencies: &[f64],
    power: &[f64],
    dx: f64,
) -> Result<SpectralMoments, EstimatorError> {
    if frequencies.len() < 2 || frequencies[0] == 0.0 {
        return Err(EstimatorError::EmptyBand {
            low: frequencies.first().copied().unwrap_or(f64::NAN),
            high: frequencies.last().copied().unwrap_or(f64::NAN),
            retained: frequencies.len(),
        });
    }
    debug_assert_eq!(frequencies.len(), power.len());

    let m0 = integrate(power, dx);

    let weighted: Vec<f64> = frequencies
        .iter()
        .zip(power.iter())
        .map(|(&f, &s)| f * f * s)
        .collect();
    let m2 = integrate(&weighted, dx);

    let f_first = frequencies[0];
    let f_last = frequencies[frequencies.len() - 1];

    Ok(SpectralMoments {
        m0,
        m2,
        t_min: 1.0 / f_last,
        t_max: 1.0 / f_first,
    })
}

/// Composite Simpson quadrature with uniform step `dx`.
///
/// Requires at least 2 samples. An even sample count is handled by
/// Simpson over the leading odd count plus a trapezoid on the last
/// interval; exactly 2 samples degrade to a single trapezoid.
fn integrate(samples: &[f64], dx: f64) -> f64 {
    let n = samples.len();
    debug_assert!(n >= 2);

    if n == 2 {
        return dx * (samples[0] + samples[1]) / 2.0;
    }

    // Largest odd point count gives an even interval count for Simpson.
    let m = if n % 2 == 1 { n } else { n - 1 };

    let mut sum = samples[0] + samples[m - 1];
    for (i, &y) in samples.iter().enumerate().take(m - 1).skip(1) {
        sum += if i % 2 == 1 { 4.0 * y } else { 2.0 * y };
    }
    let mut total = sum * dx / 3.0;

    if n % 2 == 0 {
        total += dx * (samples[n - 2] + samples[n - 1]) / 2.0;
    }

    total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simpson_exact_for_quadratic() {
        // Simpson integrates polynomials up to cubic exactly:
        // ∫ x² dx over [0, 4] = 64/3 with dx = 1.
        let samples: Vec<f64> = (0..=4).map(|x| (x * x) as f64).collect();
        let result = integrate(&samples, 1.0);
        assert!((result - 64.0 / 3.0).abs() < 1e-12, "got {result}");
    }

    #[test]
    fn test_even_count_falls_back_to_trapezoid_tail() {
        // Constant function: every rule integrates it exactly.
        let samples = vec![2.0; 6];
        assert!((integrate(&samples, 0.5) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_two_points_is_single_trapezoid() {
        assert!((integrate(&[1.0, 3.0], 1.0) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_moment_positivity() {
        let f = vec![0.05, 0.10, 0.15, 0.20, 0.25];
        let s = vec![0.3, 1.2, 2.5, 0.8, 0.1];
        let moments = compute_moments(&f, &s, 1.0).expect("valid band");

        assert!(moments.m0 >= 0.0);
        assert!(moments.m2 >= 0.0);
        let t0 = moments.period().expect("m2 > 0");
        assert!(t0 > 0.0 && t0.is_finite());
    }

    #[test]
    fn test_period_bounds_invert_frequency_bounds() {
        let f = vec![0.08, 0.10, 0.12];
        let s = vec![1.0, 2.0, 1.0];
        let moments = compute_moments(&f, &s, 1.0).expect("valid band");

        assert!((moments.t_max - 1.0 / 0.08).abs() < 1e-12);
        assert!((moments.t_min - 1.0 / 0.12).abs() < 1e-12);
        assert!(moments.t_min < moments.t_max);
    }

    #[test]
    fn test_single_point_band_rejected() {
        let result = compute_moments(&[0.1], &[1.0], 1.0);
        assert!(matches!(
            result,
            Err(EstimatorError::EmptyBand { retained: 1, .. })
        ));
    }

    #[test]
    fn test_empty_band_rejected() {
        let result = compute_moments(&[], &[], 1.0);
        assert!(matches!(
            result,
            Err(EstimatorError::EmptyBand { retained: 0, .. })
        ));
    }

    #[test]
    fn test_band_starting_at_zero_hz_rejected() {
        let result = compute_moments(&[0.0, 0.1, 0.2], &[1.0, 1.0, 1.0], 1.0);
        assert!(matches!(result, Err(EstimatorError::EmptyBand { .. })));
    }

    #[test]
    fn test_degenerate_moments() {
        // Zero power everywhere: m2 = 0, period undefined.
        let moments = compute_moments(&[0.1, 0.2, 0.3], &[0.0, 0.0, 0.0], 1.0).expect("band ok");
        assert!(matches!(
            moments.period(),
            Err(EstimatorError::DegenerateMoments { .. })
        ));
    }

    #[test]
    fn test_pure_tone_moments_recover_period() {
        // Narrow triangular peak centered at 0.1 Hz: t0 should be close
        // to 1/0.1 = 10 s because f²S is dominated by f near 0.1.
        let f: Vec<f64> = (80..=120).map(|i| i as f64 * 0.001).collect();
        let s: Vec<f64> = f
            .iter()
            .map(|&x| (0.02 - (x - 0.1).abs()).max(0.0))
            .collect();
        let moments = compute_moments(&f, &s, 1.0).expect("valid band");
        let t0 = moments.period().expect("m2 > 0");
        assert!((t0 - 10.0).abs() / 10.0 < 0.02, "t0 = {t0}");
    }
}

//! Closed-band filtering of a (frequency, power) spectrum.

/// Restrict a `(f, S)` pair to the closed band `[low, high]`.
///
/// Keeps exactly the bins with `low <= f <= high`, preserving relative
/// order and the coupling between each frequency and its power value.
/// Returns an empty pair if no bin qualifies — the caller must check
/// before dividing by a boundary frequency.
pub fn band_filter(
    frequencies: &[f64],
    power: &[f64],
    low: f64,
    high: f64,
) -> (Vec<f64>, Vec<f64>) {
    frequencies
        .iter()
        .zip(power.iter())
        .filter(|(&f, _)| f >= low && f <= high)
        .map(|(&f, &s)| (f, s))
        .unzip()
}

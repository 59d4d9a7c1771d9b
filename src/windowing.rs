//! Window extraction: overlapping fixed-length slices of a time series.
//!
//! Windows are taken at a fixed shift of `floor(shift_rate * window_size)`
//! samples, so consecutive windows overlap whenever the shift is smaller
//! than the window. The iterator is lazy, finite, and restartable (it is
//! `Clone`), and yields borrowed slices — no sample is copied until the
//! spectral estimator tiles the window.

use crate::error::EstimatorError;

/// Lazy iterator over overlapping fixed-length windows of a series.
///
/// Window `i` covers `[i*shift, i*shift + window_size)`. The number of
/// windows is `floor((len - window_size) / shift)`, which can be zero —
/// an empty extractor is a valid terminal state, and the orchestrator
/// decides whether to treat it as an error.
#[derive(Debug, Clone)]
pub struct WindowIter<'a> {
    series: &'a [f64],
    window_size: usize,
    shift: usize,
    next: usize,
    total: usize,
}

impl<'a> WindowIter<'a> {
    /// Plan window extraction over `series`.
    ///
    /// Fails with `InvalidConfiguration` if the shift rounds down to zero
    /// samples, which would repeat the first window forever.
    pub fn new(
        series: &'a [f64],
        window_size: usize,
        shift_rate: f64,
    ) -> Result<Self, EstimatorError> {
        let shift = (shift_rate * window_size as f64) as usize;
        if shift == 0 {
            return Err(EstimatorError::InvalidConfiguration {
                field: "window_shift_rate",
                value: shift_rate,
                reason: "shift rounds down to zero samples for this window_size",
            });
        }

        let total = if series.len() > window_size {
            (series.len() - window_size) / shift
        } else {
            0
        };

        Ok(Self {
            series,
            window_size,
            shift,
            next: 0,
            total,
        })
    }

    /// Total number of windows this iterator will yield.
    pub fn total_windows(&self) -> usize {
        self.total
    }

    /// Shift between consecutive windows, in samples.
    pub fn shift(&self) -> usize {
        self.shift
    }

    /// Start offset of window `i`, valid for `i < total_windows()`.
    pub fn start_of(&self, i: usize) -> usize {
        i * self.shift
    }

    /// The slice covered by window `i`, without consuming the iterator.
    pub fn window(&self, i: usize) -> &'a [f64] {
        let start = self.start_of(i);
        &self.series[start..start + self.window_size]
    }
}

impl<'a> Iterator for WindowIter<'a> {
    type Item = &'a [f64];

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.total {
            return None;
        }
        let window = self.window(self.next);
        self.next += 1;
        Some(window)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for WindowIter<'_> {}

//! natural-period: spectral natural period estimation
//!
//! Estimates the dominant oscillation period of a noisy, non-stationary
//! motion time series. The pipeline slices the series into overlapping
//! windows, tiles each window to lengthen the signal, estimates its power
//! spectral density with Welch's method, filters the spectrum to a band
//! around the expected frequency, and derives a per-window period from
//! the zero- and second-order spectral moments (`t0 = sqrt(m0/m2)`).
//!
//! ## Quick start
//!
//! ```ignore
//! use natural_period::estimate_natural_period;
//!
//! let series: Vec<f64> = load_motion_data();
//! let report = estimate_natural_period(&series, 10.0, 0.02, 3, 500)?;
//! println!("Tp_mean = {:.2}s", report.mean);
//! ```
//!
//! Remote data retrieval, coordinate rotation, model training, and
//! plotting live in external collaborators; this crate only consumes a
//! materialized `&[f64]` (see [`source::TimeSeriesSource`]) and hands
//! diagnostic `(x, y)` curves back to the caller.

pub mod config;
pub mod error;
pub mod estimator;
pub mod moments;
pub mod source;
pub mod spectral;
pub mod windowing;

// Re-export the primary entry points
pub use config::EstimatorConfig;
pub use error::{EstimatorError, Stage};
pub use estimator::{estimate_natural_period, DiagnosticSeries, PeriodEstimator, PeriodReport};
pub use moments::{compute_moments, SpectralMoments};
pub use source::{InMemorySource, SampleFile, TimeSeriesSource};
pub use spectral::{band_filter, SpectralEstimate, WelchEstimator};
pub use windowing::WindowIter;

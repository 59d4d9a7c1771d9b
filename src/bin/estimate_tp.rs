//! Natural period estimation CLI.
//!
//! Thin collaborator shell around the library: loads a line-delimited
//! sample file, runs the estimator, and prints the report.
//!
//! Usage:
//!   estimate-tp --file motion.txt --expected-tp 10.0 --delta 0.02 \
//!       --repetitions 3 --window-size 500
//!   estimate-tp --file motion.txt --config estimator.toml --json

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use natural_period::{EstimatorConfig, PeriodEstimator, SampleFile, TimeSeriesSource};

#[derive(Parser, Debug)]
#[command(name = "estimate-tp")]
#[command(about = "Estimate the natural period of a motion time series")]
#[command(version)]
struct CliArgs {
    /// Sample file: one float per line, blank and '#' lines skipped
    #[arg(short, long)]
    file: PathBuf,

    /// Estimator config TOML; overrides the individual parameter flags
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Expected natural period in seconds
    #[arg(long, required_unless_present = "config")]
    expected_tp: Option<f64>,

    /// Half-width of the frequency band around 1/expected_tp, in Hz
    #[arg(long, required_unless_present = "config")]
    delta: Option<f64>,

    /// Window repetitions before spectral estimation
    #[arg(long, required_unless_present = "config")]
    repetitions: Option<usize>,

    /// Window size in samples
    #[arg(long, required_unless_present = "config")]
    window_size: Option<usize>,

    /// Estimate windows in parallel
    #[arg(long)]
    parallel: bool,

    /// Emit the full report as JSON instead of a summary
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();

    let mut config = match &args.config {
        Some(path) => EstimatorConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => {
            // clap enforces presence of all four when --config is absent.
            let missing = || anyhow::anyhow!("missing estimator parameter");
            EstimatorConfig::new(
                args.expected_tp.ok_or_else(missing)?,
                args.delta.ok_or_else(missing)?,
                args.repetitions.ok_or_else(missing)?,
                args.window_size.ok_or_else(missing)?,
            )
        }
    };
    if args.parallel {
        config.parallel = true;
    }

    let series = SampleFile::new(&args.file).produce()?;
    tracing::info!(samples = series.len(), "series loaded");

    let estimator = PeriodEstimator::new(config)?;
    let report = estimator.estimate(&series)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "Tp_mean = {:.2}s, Tp_max = {:.2}s, Tp_min = {:.2}s ({} windows)",
            report.mean,
            report.t_max,
            report.t_min,
            report.periods.len()
        );
    }

    Ok(())
}

use std::path::PathBuf;

use clap::Parser;

use crate::data::filter::{InvalidRangeError, PayloadRange, SiteSelection, ALL_SITES};
use crate::data::model::LaunchDataset;

pub const DEFAULT_DATA_PATH: &str = "spacex_launch_dash.csv";

/// SpaceX launch records dashboard.
#[derive(Debug, Parser)]
#[command(name = "launch-dash", version, about)]
pub struct Cli {
    /// Launch records file (.csv, .json or .parquet).
    #[arg(value_name = "PATH", default_value = DEFAULT_DATA_PATH)]
    pub data: PathBuf,

    /// Initially selected launch site, or ALL.
    #[arg(long, default_value = ALL_SITES)]
    pub site: String,

    /// Initial lower payload bound in kg (defaults to the dataset minimum).
    #[arg(long, value_name = "KG")]
    pub min_payload: Option<f64>,

    /// Initial upper payload bound in kg (defaults to the dataset maximum).
    #[arg(long, value_name = "KG")]
    pub max_payload: Option<f64>,

    /// Payload slider step in kg.
    #[arg(long, value_name = "KG", default_value_t = 1000.0, value_parser = parse_step)]
    pub step: f64,

    /// Print the chart data as JSON and exit instead of opening a window.
    #[arg(long)]
    pub report: bool,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Cli {
    pub fn initial_site(&self) -> SiteSelection {
        SiteSelection::parse(&self.site)
    }

    /// The range requested on the command line, clamped to the dataset's
    /// payload extent.
    pub fn initial_range(&self, dataset: &LaunchDataset) -> Result<PayloadRange, InvalidRangeError> {
        let (min, max) = (dataset.min_payload(), dataset.max_payload());
        let low = self.min_payload.unwrap_or(min);
        let high = self.max_payload.unwrap_or(max);
        if low < min || high > max {
            log::warn!("payload range [{low}, {high}] clamped to dataset extent [{min}, {max}]");
        }
        PayloadRange::new(low.clamp(min, max), high.clamp(min, max))
    }
}

fn parse_step(s: &str) -> Result<f64, String> {
    let step: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if step.is_finite() && step > 0.0 {
        Ok(step)
    } else {
        Err(format!("step must be a positive number of kg, got {s}"))
    }
}

//! Build features CLI command.
//!
//! Loads the speech corpus and the price series, runs every feature stage
//! and writes the joined table as CSV.

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use clap::Args;
use speech_align_core::{AppConfig, Interval, SpeechCorpusLoader};
use speech_align_data::{CsvPriceProvider, CsvSpeechLoader, CsvStorage};
use speech_align_features::ReturnFeatureBuilder;
use std::path::Path;

/// Arguments for the build-features command.
///
/// Flags override the values loaded from the configuration file.
#[derive(Args, Debug, Clone)]
pub struct BuildFeaturesArgs {
    /// Config file path
    #[arg(short, long, default_value = "config/Config.toml")]
    pub config: String,

    /// Profile overlay (loads Config.{profile}.toml next to the config file)
    #[arg(long, env = "SPEECH_PROFILE")]
    pub profile: Option<String>,

    /// Directory of scraped speech CSV files
    #[arg(long)]
    pub speeches: Option<String>,

    /// Directory of {ticker}_{interval}.csv price files
    #[arg(long)]
    pub prices: Option<String>,

    /// Market ticker (e.g. "^GSPC")
    #[arg(long)]
    pub ticker: Option<String>,

    /// Bar interval (1m, 5m, 15m, 30m, 1h, 4h, 1d, 1w, 1M)
    #[arg(long)]
    pub interval: Option<String>,

    /// First speech date to keep (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<String>,

    /// Last speech date to keep (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<String>,

    /// Moving-average window in periods
    #[arg(long)]
    pub window: Option<usize>,

    /// Outlier quantile in (0, 1)
    #[arg(long)]
    pub quantile: Option<f64>,

    /// Output CSV file path
    #[arg(short, long)]
    pub output: String,
}

impl BuildFeaturesArgs {
    /// Applies command-line overrides on top of the loaded configuration.
    ///
    /// # Errors
    /// Returns error if an interval or date flag cannot be parsed
    pub fn apply(&self, config: &mut AppConfig) -> Result<()> {
        if let Some(dir) = &self.speeches {
            config.data.speeches_dir.clone_from(dir);
        }
        if let Some(dir) = &self.prices {
            config.data.prices_dir.clone_from(dir);
        }
        if let Some(ticker) = &self.ticker {
            config.data.ticker.clone_from(ticker);
        }
        if let Some(interval) = &self.interval {
            config.data.interval = interval.parse::<Interval>()?;
        }
        if let Some(start) = &self.start {
            config.data.start = Some(parse_date(start, "start")?);
        }
        if let Some(end) = &self.end {
            config.data.end = Some(parse_date(end, "end")?);
        }
        if let Some(window) = self.window {
            config.features.window = window;
        }
        if let Some(quantile) = self.quantile {
            config.features.quantile = quantile;
        }
        Ok(())
    }
}

fn parse_date(value: &str, flag: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| anyhow!("Invalid --{flag} date '{value}'. Use YYYY-MM-DD"))
}

/// Runs the build-features command.
///
/// # Errors
/// Returns error if loading, any feature stage, or writing the output fails
pub fn run_build_features(args: BuildFeaturesArgs) -> Result<()> {
    let mut config = super::load_config(&args.config, args.profile.as_deref())?;
    args.apply(&mut config)?;
    let data = &config.data;

    tracing::info!(
        "Building features for {} ({}) with window {} and quantile {}",
        data.ticker,
        data.interval,
        config.features.window,
        config.features.quantile
    );

    let corpus = CsvSpeechLoader::new()
        .with_window(data.start, data.end)
        .load(Path::new(&data.speeches_dir))?;

    let provider = CsvPriceProvider::new(&data.prices_dir);
    let mut builder =
        ReturnFeatureBuilder::new(&provider, data.interval, data.ticker.as_str(), corpus)?;
    let table = builder.run_all(&config.features)?;

    let returns = builder
        .normalized()
        .ok_or_else(|| anyhow!("Normalized returns missing after a full run"))?;
    CsvStorage::write_features(&args.output, returns, &table)
        .with_context(|| format!("Failed to write features to {}", args.output))?;

    let speech_days = table.rows.iter().filter(|r| r.aligned.is_speech).count();
    let outliers = table.rows.iter().filter(|r| r.aligned.flags.binary).count();
    tracing::info!(
        "Wrote {} rows ({} speech days, {} outlier days, {} speakers) to {}",
        table.rows.len(),
        speech_days,
        outliers,
        table.speakers.len(),
        args.output
    );

    Ok(())
}

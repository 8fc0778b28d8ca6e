//! CLI commands for the speech alignment pipeline.

pub mod build_features;
pub mod score_sentiment;

pub use build_features::{run_build_features, BuildFeaturesArgs};
pub use score_sentiment::{run_score_sentiment, ScoreSentimentArgs};

use anyhow::{Context, Result};
use speech_align_core::{AppConfig, ConfigLoader};

/// Loads the layered configuration, with an optional profile overlay.
pub(crate) fn load_config(path: &str, profile: Option<&str>) -> Result<AppConfig> {
    let config = match profile {
        Some(profile) => ConfigLoader::load_with_profile(path, profile),
        None => ConfigLoader::load(path),
    }
    .with_context(|| format!("Failed to load configuration from {path}"))?;

    tracing::debug!("Loaded configuration: {:?}", config);
    Ok(config)
}

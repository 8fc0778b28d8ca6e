use crate::interval::Interval;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data: DataConfig,
    pub features: FeatureConfig,
    pub sentiment: SentimentConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Directory holding the scraped speech CSV files
    pub speeches_dir: String,
    /// Directory holding `{ticker}_{interval}.csv` price files
    pub prices_dir: String,
    pub ticker: String,
    pub interval: Interval,
    /// Optional inclusive window applied to the speech corpus
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Moving-average window in periods
    pub window: usize,
    /// Outlier quantile in (0, 1)
    pub quantile: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentConfig {
    pub max_attempts: u32,
    pub backoff_ms: u64,
    pub timeout_secs: u64,
    /// Progress is logged once every `log_every` scored documents
    pub log_every: usize,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            speeches_dir: "data/speeches".to_string(),
            prices_dir: "data/prices".to_string(),
            ticker: "^GSPC".to_string(),
            interval: Interval::OneDay,
            start: None,
            end: None,
        }
    }
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            window: 5,
            quantile: 0.9,
        }
    }
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            backoff_ms: 100,
            timeout_secs: 30,
            log_every: 500,
        }
    }
}

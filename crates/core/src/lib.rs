//! Core types, traits and errors shared by the speech/return alignment crates.

pub mod config;
pub mod config_loader;
pub mod error;
pub mod interval;
pub mod traits;
pub mod types;

pub use config::{AppConfig, DataConfig, FeatureConfig, SentimentConfig};
pub use config_loader::ConfigLoader;
pub use error::{FeatureError, JoinSide, Stage};
pub use interval::Interval;
pub use traits::{PriceSeriesProvider, SpeechCorpusLoader};
pub use types::{
    AlignedRecord, BinaryFlags, OhlcvBar, PriceBar, ReturnRecord, SpeakerRow, SpeakerTable,
    SpeechCorpus, SpeechEvent,
};

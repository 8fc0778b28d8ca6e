//! Data access for the speech/return alignment pipeline.
//!
//! This crate provides:
//! - A CSV loader for scraped speech records
//! - A CSV-backed price series provider
//! - CSV export for the joined feature table

pub mod csv_storage;
pub mod price_provider;
pub mod speech_loader;

pub use csv_storage::CsvStorage;
pub use price_provider::CsvPriceProvider;
pub use speech_loader::CsvSpeechLoader;

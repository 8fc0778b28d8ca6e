//! Lexicon-based sentiment scoring for speech documents.
//!
//! Documents are fetched over HTTP with a bounded retry policy, reduced to
//! text by a [`TextExtractor`], and scored against a word-valence lexicon.
//! Any failure along the way yields a missing score rather than an error.

pub mod error;
pub mod extract;
pub mod fetcher;
pub mod lexicon;
pub mod scorer;

pub use error::SentimentError;
pub use extract::{PlainTextExtractor, TextExtractor};
pub use fetcher::{DocumentFetcher, HttpFetcher, RetryPolicy};
pub use lexicon::{ensure_resource_loaded, Lexicon};
pub use scorer::{SentimentLabel, SentimentScore, SentimentScorer};

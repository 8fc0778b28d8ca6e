//! Per-document sentiment scoring.

use crate::error::SentimentError;
use crate::extract::TextExtractor;
use crate::fetcher::DocumentFetcher;
use crate::lexicon::{ensure_resource_loaded, Lexicon};
use serde::Serialize;
use std::fmt;
use tracing::{info, warn};
use url::Url;

const DEFAULT_LOG_EVERY: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Pos,
    Neg,
}

impl SentimentLabel {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pos => "pos",
            Self::Neg => "neg",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SentimentScore {
    pub label: SentimentLabel,
    /// Compound polarity in `[-1, 1]`
    pub compound: f64,
    /// 1 when the label is positive, else 0
    pub binary: u8,
}

impl SentimentScore {
    /// Labels a compound polarity; zero counts as negative.
    #[must_use]
    pub fn from_compound(compound: f64) -> Self {
        let label = if compound > 0.0 {
            SentimentLabel::Pos
        } else {
            SentimentLabel::Neg
        };
        Self {
            label,
            compound,
            binary: u8::from(label == SentimentLabel::Pos),
        }
    }
}

/// Fetches, extracts and scores speech documents.
pub struct SentimentScorer<F, E> {
    fetcher: F,
    extractor: E,
    lexicon: &'static Lexicon,
    log_every: usize,
}

impl<F: DocumentFetcher, E: TextExtractor> SentimentScorer<F, E> {
    pub fn new(fetcher: F, extractor: E) -> Self {
        Self {
            fetcher,
            extractor,
            lexicon: ensure_resource_loaded(),
            log_every: DEFAULT_LOG_EVERY,
        }
    }

    /// Sets the progress log cadence; zero disables progress logs.
    #[must_use]
    pub fn with_log_every(mut self, log_every: usize) -> Self {
        self.log_every = log_every;
        self
    }

    /// Scores one document link.
    ///
    /// # Errors
    /// Fails if the link is not a PDF URL, the download fails, or the
    /// document has no text.
    pub async fn try_score(&self, link: &str) -> Result<SentimentScore, SentimentError> {
        let url = Url::parse(link).map_err(|e| SentimentError::InvalidUrl(format!("{link}: {e}")))?;
        if !is_document_link(&url) {
            return Err(SentimentError::NotADocument(link.to_string()));
        }

        let bytes = self.fetcher.fetch(&url).await?;
        let pages = self.extractor.extract(&bytes)?;
        let text = pages.join("\n");

        Ok(SentimentScore::from_compound(self.lexicon.compound(&text)))
    }

    /// Scores one document link, or `None` if it cannot be scored.
    pub async fn score(&self, link: Option<&str>) -> Option<SentimentScore> {
        let link = link?;
        match self.try_score(link).await {
            Ok(score) => Some(score),
            Err(e) => {
                warn!("Could not score {}: {}", link, e);
                None
            }
        }
    }

    /// Scores links in order, one result per input.
    pub async fn score_all<'a, I>(&self, links: I) -> Vec<Option<SentimentScore>>
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        let mut scores = Vec::new();
        for (index, link) in links.into_iter().enumerate() {
            if self.log_every > 0 && index % self.log_every == 0 {
                info!("Scoring document {}", index);
            }
            scores.push(self.score(link).await);
        }

        let scored = scores.iter().filter(|s| s.is_some()).count();
        info!("Scored {} of {} documents", scored, scores.len());
        scores
    }
}

/// True when some dot-separated piece of the path is `pdf`.
fn is_document_link(url: &Url) -> bool {
    url.path()
        .split('.')
        .any(|piece| piece.eq_ignore_ascii_case("pdf"))
}

use crate::interval::Interval;
use crate::types::{OhlcvBar, SpeechCorpus};
use anyhow::Result;
use chrono::NaiveDate;
use std::path::Path;

/// Produces a date-sorted, deduplicated speech corpus.
pub trait SpeechCorpusLoader {
    fn load(&self, path: &Path) -> Result<SpeechCorpus>;
}

/// Returns OHLCV bars for a ticker whose calendar day lies in `[start, end]`.
///
/// Implementations own any retry policy; callers treat an error as terminal.
pub trait PriceSeriesProvider {
    fn fetch(
        &self,
        ticker: &str,
        interval: Interval,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<OhlcvBar>>;
}

impl<P: PriceSeriesProvider + ?Sized> PriceSeriesProvider for &P {
    fn fetch(
        &self,
        ticker: &str,
        interval: Interval,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<OhlcvBar>> {
        (**self).fetch(ticker, interval, start, end)
    }
}

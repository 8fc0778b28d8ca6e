//! Data model shared by the loaders, the feature builder and the exporters.

use chrono::{DateTime, FixedOffset, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// A single speech, keyed by the calendar day it was given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechEvent {
    /// Calendar day of the speech
    pub date: NaiveDate,
    /// Speech title, unique within a deduplicated corpus
    pub title: String,
    /// Speaker name
    pub name: String,
    /// Link to the speech document, if the source provided one
    pub url: Option<String>,
}

impl SpeechEvent {
    /// Creates a speech event without a document link.
    pub fn new(date: NaiveDate, title: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            date,
            title: title.into(),
            name: name.into(),
            url: None,
        }
    }

    /// Builder method to add the document link.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// Speech events sorted ascending by date.
///
/// `new` only sorts; `deduplicated` also drops repeated titles. Loaders are
/// expected to hand the builder a deduplicated corpus.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeechCorpus {
    events: Vec<SpeechEvent>,
}

impl SpeechCorpus {
    /// Creates a corpus, sorting events by date. Same-day order is preserved.
    #[must_use]
    pub fn new(mut events: Vec<SpeechEvent>) -> Self {
        events.sort_by_key(|e| e.date);
        Self { events }
    }

    /// Creates a corpus keeping only the first occurrence of each title.
    #[must_use]
    pub fn deduplicated(mut events: Vec<SpeechEvent>) -> Self {
        let mut seen = HashSet::new();
        events.retain(|e| seen.insert(e.title.clone()));
        Self::new(events)
    }

    /// Restricts the corpus to an inclusive date window. Absent bounds are open.
    #[must_use]
    pub fn within(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        let events = self
            .events
            .iter()
            .filter(|e| start.map_or(true, |s| e.date >= s) && end.map_or(true, |en| e.date <= en))
            .cloned()
            .collect();
        Self { events }
    }

    #[must_use]
    pub fn events(&self) -> &[SpeechEvent] {
        &self.events
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Returns the first and last speech day, or `None` for an empty corpus.
    #[must_use]
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.events.first()?;
        let last = self.events.last()?;
        Some((first.date, last.date))
    }

    /// Returns the set of days with at least one speech.
    #[must_use]
    pub fn speech_days(&self) -> HashSet<NaiveDate> {
        self.events.iter().map(|e| e.date).collect()
    }

    /// Returns the distinct speaker names in lexical order.
    #[must_use]
    pub fn speakers(&self) -> Vec<String> {
        self.events
            .iter()
            .map(|e| e.name.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Returns the date of the first repeated (date, title) pair, if any.
    #[must_use]
    pub fn first_duplicate_key(&self) -> Option<NaiveDate> {
        let mut seen = HashSet::new();
        self.events
            .iter()
            .find(|e| !seen.insert((e.date, e.title.as_str())))
            .map(|e| e.date)
    }
}

/// A raw bar as returned by a price provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OhlcvBar {
    /// Bar open time in the provider's local offset
    pub timestamp: DateTime<FixedOffset>,
    pub symbol: String,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
}

/// A bar reduced to the fields the builder reads, keyed by calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: Decimal,
    pub close: Decimal,
}

impl From<&OhlcvBar> for PriceBar {
    /// Keeps the local calendar day of the bar, dropping time and offset.
    fn from(bar: &OhlcvBar) -> Self {
        Self {
            date: bar.timestamp.date_naive(),
            open: bar.open,
            close: bar.close,
        }
    }
}

/// One row of the raw/normalized return table.
///
/// `return_diff` and `return_norm` stay `None` until the normalized stage
/// runs, and wherever the moving average is undefined.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReturnRecord {
    pub date: NaiveDate,
    /// close / open - 1
    pub rate_of_return: f64,
    pub abs_return: f64,
    /// Trailing mean of `rate_of_return`
    pub moving_average: Option<f64>,
    /// |return - moving_average|
    pub return_diff: Option<f64>,
    /// |return / moving_average|, undefined when the average is zero
    pub return_norm: Option<f64>,
}

/// Quantile outlier flags for one trading day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryFlags {
    pub date: NaiveDate,
    pub binary: bool,
    pub binary_diff: bool,
    pub binary_norm: bool,
}

/// Outlier flags plus speech presence on the day and its neighbouring rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignedRecord {
    pub flags: BinaryFlags,
    pub is_speech: bool,
    /// Speech on the previous trading row
    pub speech_was_yesterday: bool,
    /// Speech on the next trading row
    pub speech_will_be_tomorrow: bool,
}

impl AlignedRecord {
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.flags.date
    }
}

/// An aligned row with one indicator per speaker column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeakerRow {
    pub aligned: AlignedRecord,
    /// Indicators in the order of `SpeakerTable::speakers`
    pub indicators: Vec<bool>,
}

/// Event-aligned table joined with one-hot speaker columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeakerTable {
    /// Column names, one per distinct speaker, sorted
    pub speakers: Vec<String>,
    pub rows: Vec<SpeakerRow>,
}

impl SpeakerTable {
    /// Returns the indicator column for a speaker.
    #[must_use]
    pub fn column(&self, speaker: &str) -> Option<Vec<bool>> {
        let idx = self.speakers.iter().position(|s| s == speaker)?;
        Some(self.rows.iter().map(|r| r.indicators[idx]).collect())
    }

    /// Returns the row for a date, if present.
    #[must_use]
    pub fn row(&self, date: NaiveDate) -> Option<&SpeakerRow> {
        self.rows.iter().find(|r| r.aligned.date() == date)
    }
}

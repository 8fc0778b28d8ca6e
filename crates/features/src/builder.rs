//! Staged builder for the speech/return feature tables.
//!
//! Each stage reads the stored output of the previous one and returns an
//! owned copy of its own table. Re-running a stage discards every later
//! stage; a failed call leaves stored state untouched.

use crate::calendar::{normalize_bars, shift_flags, speech_presence};
use crate::one_hot::one_hot_join;
use crate::quantile::threshold_flags;
use crate::returns::{self, normalize_returns};
use chrono::NaiveDate;
use speech_align_core::{
    AlignedRecord, BinaryFlags, FeatureConfig, FeatureError, Interval, PriceBar,
    PriceSeriesProvider, ReturnRecord, SpeakerTable, SpeechCorpus, Stage,
};
use std::collections::HashSet;
use tracing::{debug, info, warn};

pub struct ReturnFeatureBuilder {
    ticker: String,
    interval: Interval,
    corpus: SpeechCorpus,
    speech_days: HashSet<NaiveDate>,
    prices: Vec<PriceBar>,
    returns: Option<Vec<ReturnRecord>>,
    normalized: Option<Vec<ReturnRecord>>,
    flags: Option<Vec<BinaryFlags>>,
    aligned: Option<Vec<AlignedRecord>>,
}

impl ReturnFeatureBuilder {
    /// Fetches prices covering the corpus date range and normalizes them to calendar days.
    ///
    /// # Errors
    /// - `EmptyCorpus` if the corpus has no rows
    /// - `Provider` if the provider call fails (not retried here)
    /// - `NoPriceData` if the provider returns zero bars
    pub fn new<P>(
        provider: &P,
        interval: Interval,
        ticker: impl Into<String>,
        corpus: SpeechCorpus,
    ) -> Result<Self, FeatureError>
    where
        P: PriceSeriesProvider + ?Sized,
    {
        let ticker = ticker.into();
        let (start, end) = corpus.date_range().ok_or(FeatureError::EmptyCorpus)?;

        debug!("Fetching {} {} bars from {} to {}", ticker, interval, start, end);

        let bars = provider
            .fetch(&ticker, interval, start, end)
            .map_err(|e| FeatureError::Provider {
                ticker: ticker.clone(),
                message: format!("{e:#}"),
            })?;

        if bars.is_empty() {
            return Err(FeatureError::NoPriceData {
                ticker,
                interval: interval.to_string(),
                start,
                end,
            });
        }

        if interval.is_intraday() {
            warn!(
                "{} bars share calendar days; the speaker join rejects repeated dates",
                interval
            );
        }

        let prices = normalize_bars(&bars);
        let speech_days = corpus.speech_days();

        info!(
            "Loaded {} price bars for {} against {} speeches on {} days",
            prices.len(),
            ticker,
            corpus.len(),
            speech_days.len()
        );

        Ok(Self {
            ticker,
            interval,
            corpus,
            speech_days,
            prices,
            returns: None,
            normalized: None,
            flags: None,
            aligned: None,
        })
    }

    /// Computes the raw return table with a trailing moving average of `window` periods.
    ///
    /// # Errors
    /// Returns `InvalidParameter` for a zero window or a non-positive open price.
    pub fn compute_returns(&mut self, window: usize) -> Result<Vec<ReturnRecord>, FeatureError> {
        let table = returns::compute_returns(&self.prices, window)?;

        info!(
            "Computed {} returns for {} (window {})",
            table.len(),
            self.ticker,
            window
        );

        self.returns = Some(table.clone());
        self.normalized = None;
        self.flags = None;
        self.aligned = None;
        Ok(table)
    }

    /// Extends the raw return table with `return_diff` and `return_norm`.
    ///
    /// # Errors
    /// Returns `PrecomputeRequired` if `compute_returns` has not run.
    pub fn compute_normalized(&mut self) -> Result<Vec<ReturnRecord>, FeatureError> {
        let raw = self
            .returns
            .as_ref()
            .ok_or_else(|| FeatureError::precompute(Stage::Normalized, Stage::Returns))?;

        let table = normalize_returns(raw);
        let undefined_norm = table.iter().filter(|r| r.return_norm.is_none()).count();
        debug!("Normalized returns: {} rows with undefined ratio", undefined_norm);

        self.normalized = Some(table.clone());
        self.flags = None;
        self.aligned = None;
        Ok(table)
    }

    /// Flags values above the `quantile` of their own column.
    ///
    /// Undefined values are left out of the quantile estimate and flagged 0.
    ///
    /// # Errors
    /// - `PrecomputeRequired` if `compute_normalized` has not run
    /// - `InvalidParameter` if `quantile` is not strictly between 0 and 1
    pub fn compute_binary_flags(&mut self, quantile: f64) -> Result<Vec<BinaryFlags>, FeatureError> {
        let normalized = self
            .normalized
            .as_ref()
            .ok_or_else(|| FeatureError::precompute(Stage::BinaryFlags, Stage::Normalized))?;

        if !(quantile > 0.0 && quantile < 1.0) {
            return Err(FeatureError::invalid(
                "quantile",
                format!("must be in (0, 1), got {quantile}"),
            ));
        }

        let rates: Vec<Option<f64>> = normalized.iter().map(|r| Some(r.rate_of_return)).collect();
        let diffs: Vec<Option<f64>> = normalized.iter().map(|r| r.return_diff).collect();
        let norms: Vec<Option<f64>> = normalized.iter().map(|r| r.return_norm).collect();

        let (binary, t_rate) = threshold_flags(&rates, quantile);
        let (binary_diff, t_diff) = threshold_flags(&diffs, quantile);
        let (binary_norm, t_norm) = threshold_flags(&norms, quantile);

        debug!(
            "Quantile {} thresholds: return={:?} diff={:?} norm={:?}",
            quantile, t_rate, t_diff, t_norm
        );

        let table: Vec<BinaryFlags> = normalized
            .iter()
            .enumerate()
            .map(|(i, r)| BinaryFlags {
                date: r.date,
                binary: binary[i],
                binary_diff: binary_diff[i],
                binary_norm: binary_norm[i],
            })
            .collect();

        info!(
            "Flagged outliers: {} return, {} diff, {} norm of {} rows",
            binary.iter().filter(|&&f| f).count(),
            binary_diff.iter().filter(|&&f| f).count(),
            binary_norm.iter().filter(|&&f| f).count(),
            table.len()
        );

        self.flags = Some(table.clone());
        self.aligned = None;
        Ok(table)
    }

    /// Adds speech presence on each trading row and on its neighbouring rows.
    ///
    /// # Errors
    /// Returns `PrecomputeRequired` if `compute_binary_flags` has not run.
    pub fn compute_speech_alignment(&mut self) -> Result<Vec<AlignedRecord>, FeatureError> {
        let flags = self.flags.as_ref().ok_or_else(|| {
            FeatureError::precompute(Stage::SpeechAlignment, Stage::BinaryFlags)
        })?;

        let dates: Vec<NaiveDate> = flags.iter().map(|f| f.date).collect();
        let is_speech = speech_presence(&dates, &self.speech_days);
        let yesterday = shift_flags(&is_speech, 1);
        let tomorrow = shift_flags(&is_speech, -1);

        let table: Vec<AlignedRecord> = flags
            .iter()
            .enumerate()
            .map(|(i, f)| AlignedRecord {
                flags: *f,
                is_speech: is_speech[i],
                speech_was_yesterday: yesterday[i],
                speech_will_be_tomorrow: tomorrow[i],
            })
            .collect();

        let trading_days: HashSet<&NaiveDate> = dates.iter().collect();
        let unmatched = self
            .speech_days
            .iter()
            .filter(|d| !trading_days.contains(d))
            .count();
        if unmatched > 0 {
            debug!("{} speech days have no trading row", unmatched);
        }
        info!(
            "Aligned {} trading days, {} with a speech",
            table.len(),
            is_speech.iter().filter(|&&s| s).count()
        );

        self.aligned = Some(table.clone());
        Ok(table)
    }

    /// Joins one indicator column per speaker onto the event-aligned table.
    ///
    /// # Errors
    /// - `PrecomputeRequired` if `compute_speech_alignment` has not run
    /// - `AmbiguousJoinKey` if either side repeats its join key
    pub fn one_hot_speaker_join(&self) -> Result<SpeakerTable, FeatureError> {
        let aligned = self.aligned.as_ref().ok_or_else(|| {
            FeatureError::precompute(Stage::SpeakerJoin, Stage::SpeechAlignment)
        })?;

        let table = one_hot_join(aligned, &self.corpus)?;
        info!(
            "Joined {} speaker columns onto {} rows",
            table.speakers.len(),
            table.rows.len()
        );
        Ok(table)
    }

    /// Runs every stage in order with the given parameters.
    ///
    /// # Errors
    /// Returns the first stage error.
    pub fn run_all(&mut self, config: &FeatureConfig) -> Result<SpeakerTable, FeatureError> {
        self.compute_returns(config.window)?;
        self.compute_normalized()?;
        self.compute_binary_flags(config.quantile)?;
        self.compute_speech_alignment()?;
        self.one_hot_speaker_join()
    }

    #[must_use]
    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    #[must_use]
    pub fn interval(&self) -> Interval {
        self.interval
    }

    #[must_use]
    pub fn corpus(&self) -> &SpeechCorpus {
        &self.corpus
    }

    /// Working price series, one bar per row, ascending by date.
    #[must_use]
    pub fn prices(&self) -> &[PriceBar] {
        &self.prices
    }

    #[must_use]
    pub fn returns(&self) -> Option<&[ReturnRecord]> {
        self.returns.as_deref()
    }

    #[must_use]
    pub fn normalized(&self) -> Option<&[ReturnRecord]> {
        self.normalized.as_deref()
    }

    #[must_use]
    pub fn binary_flags(&self) -> Option<&[BinaryFlags]> {
        self.flags.as_deref()
    }

    #[must_use]
    pub fn aligned(&self) -> Option<&[AlignedRecord]> {
        self.aligned.as_deref()
    }
}

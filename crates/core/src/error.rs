//! Error types for the return-feature pipeline.
//!
//! Every failure the builder can produce is a distinct variant so callers
//! can match on the kind instead of parsing a message.

use chrono::NaiveDate;
use std::fmt;
use thiserror::Error;

/// Pipeline stages, in the order they must run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    /// Raw return table.
    Returns,
    /// Normalized return table.
    Normalized,
    /// Quantile outlier flags.
    BinaryFlags,
    /// Speech presence and shift columns.
    SpeechAlignment,
    /// One-hot speaker join.
    SpeakerJoin,
}

impl Stage {
    /// Returns the operation name for this stage.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Returns => "compute_returns",
            Stage::Normalized => "compute_normalized",
            Stage::BinaryFlags => "compute_binary_flags",
            Stage::SpeechAlignment => "compute_speech_alignment",
            Stage::SpeakerJoin => "one_hot_speaker_join",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which side of the speaker join held a duplicated key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinSide {
    /// The event-aligned binary table.
    Aligned,
    /// The speech corpus.
    Corpus,
}

impl fmt::Display for JoinSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinSide::Aligned => f.write_str("event-aligned table"),
            JoinSide::Corpus => f.write_str("speech corpus"),
        }
    }
}

/// Errors raised by the return-feature builder.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    /// The speech corpus has no rows, so no price range can be derived.
    #[error("speech corpus is empty: no price date range can be derived")]
    EmptyCorpus,

    /// The price provider returned zero bars for the resolved range.
    #[error("no price data for {ticker} at {interval} between {start} and {end}")]
    NoPriceData {
        /// Requested ticker.
        ticker: String,
        /// Requested bar interval.
        interval: String,
        /// First day of the range (inclusive).
        start: NaiveDate,
        /// Last day of the range (inclusive).
        end: NaiveDate,
    },

    /// A window, quantile or price value is outside its valid domain.
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// A stage was called before the stage it depends on.
    #[error("{stage} requires {required} to run first")]
    PrecomputeRequired {
        /// Stage that was called.
        stage: Stage,
        /// Stage that has not run yet.
        required: Stage,
    },

    /// The date join key is not unique on one side of the speaker join.
    #[error("join key {date} is not unique in the {side}")]
    AmbiguousJoinKey {
        /// Duplicated date.
        date: NaiveDate,
        /// Side holding the duplicate.
        side: JoinSide,
    },

    /// The price provider failed; the builder does not retry.
    #[error("price provider failed for {ticker}: {message}")]
    Provider {
        /// Requested ticker.
        ticker: String,
        /// Rendered provider error chain.
        message: String,
    },
}

impl FeatureError {
    /// Creates an invalid parameter error.
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// Creates a stage-ordering error.
    #[must_use]
    pub fn precompute(stage: Stage, required: Stage) -> Self {
        Self::PrecomputeRequired { stage, required }
    }

    /// Returns true if this error is a stage-ordering violation.
    #[must_use]
    pub fn is_precompute_required(&self) -> bool {
        matches!(self, Self::PrecomputeRequired { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precompute_message_names_both_stages() {
        let err = FeatureError::precompute(Stage::BinaryFlags, Stage::Normalized);
        assert_eq!(
            err.to_string(),
            "compute_binary_flags requires compute_normalized to run first"
        );
        assert!(err.is_precompute_required());
    }

    #[test]
    fn ambiguous_join_key_message() {
        let err = FeatureError::AmbiguousJoinKey {
            date: NaiveDate::from_ymd_opt(2020, 1, 2).unwrap(),
            side: JoinSide::Corpus,
        };
        assert_eq!(
            err.to_string(),
            "join key 2020-01-02 is not unique in the speech corpus"
        );
    }

    #[test]
    fn stages_are_ordered() {
        assert!(Stage::Returns < Stage::Normalized);
        assert!(Stage::SpeechAlignment < Stage::SpeakerJoin);
    }

    #[test]
    fn first_stage_is_compute_returns() {
        let stages = [
            Stage::SpeakerJoin,
            Stage::Normalized,
            Stage::Returns,
            Stage::SpeechAlignment,
            Stage::BinaryFlags,
        ];
        assert_eq!(stages.iter().min(), Some(&Stage::Returns));
        assert_eq!(Stage::Returns.to_string(), "compute_returns");
    }
}

//! One-hot speaker encoding joined onto the event-aligned table.

use chrono::NaiveDate;
use speech_align_core::{AlignedRecord, FeatureError, JoinSide, SpeakerRow, SpeakerTable, SpeechCorpus};
use std::collections::{HashMap, HashSet};

/// Left-joins per-speaker indicator columns onto `aligned` by date.
///
/// Columns are the corpus's distinct speakers in lexical order. A day with
/// speeches by several speakers sets every matching column.
///
/// # Errors
/// Returns `AmbiguousJoinKey` if `aligned` repeats a date or the corpus
/// repeats a (date, title) pair.
pub fn one_hot_join(
    aligned: &[AlignedRecord],
    corpus: &SpeechCorpus,
) -> Result<SpeakerTable, FeatureError> {
    let mut seen = HashSet::with_capacity(aligned.len());
    if let Some(record) = aligned.iter().find(|r| !seen.insert(r.date())) {
        return Err(FeatureError::AmbiguousJoinKey {
            date: record.date(),
            side: JoinSide::Aligned,
        });
    }
    if let Some(date) = corpus.first_duplicate_key() {
        return Err(FeatureError::AmbiguousJoinKey {
            date,
            side: JoinSide::Corpus,
        });
    }

    let speakers = corpus.speakers();
    let column: HashMap<&str, usize> = speakers
        .iter()
        .enumerate()
        .map(|(i, s)| (s.as_str(), i))
        .collect();

    let mut by_day: HashMap<NaiveDate, Vec<bool>> = HashMap::new();
    for event in corpus.events() {
        let indicators = by_day
            .entry(event.date)
            .or_insert_with(|| vec![false; speakers.len()]);
        if let Some(&idx) = column.get(event.name.as_str()) {
            indicators[idx] = true;
        }
    }

    let rows = aligned
        .iter()
        .map(|record| SpeakerRow {
            aligned: *record,
            indicators: by_day
                .get(&record.date())
                .cloned()
                .unwrap_or_else(|| vec![false; speakers.len()]),
        })
        .collect();

    Ok(SpeakerTable { speakers, rows })
}

//! Calendar alignment between price bars and speech days.
//!
//! Shifts move values by row position in the trading-day sequence, so
//! "yesterday" is the previous trading row, not the previous calendar day.

use chrono::NaiveDate;
use speech_align_core::{OhlcvBar, PriceBar};
use std::collections::HashSet;

/// Reduces provider bars to calendar-day keyed price bars, ascending by date.
#[must_use]
pub fn normalize_bars(bars: &[OhlcvBar]) -> Vec<PriceBar> {
    let mut prices: Vec<PriceBar> = bars.iter().map(PriceBar::from).collect();
    // stable: intraday bars of one day keep their provider order
    prices.sort_by_key(|p| p.date);
    prices
}

/// Marks each date that has at least one speech.
#[must_use]
pub fn speech_presence(dates: &[NaiveDate], speech_days: &HashSet<NaiveDate>) -> Vec<bool> {
    dates.iter().map(|d| speech_days.contains(d)).collect()
}

/// Shifts a flag column by `offset` rows.
///
/// A positive offset pulls values from earlier rows (`out[i] = values[i - offset]`),
/// a negative one from later rows. Rows with nothing at the offset are `false`.
#[must_use]
pub fn shift_flags(values: &[bool], offset: isize) -> Vec<bool> {
    (0..values.len())
        .map(|i| {
            i.checked_add_signed(-offset)
                .and_then(|src| values.get(src))
                .copied()
                .unwrap_or(false)
        })
        .collect()
}

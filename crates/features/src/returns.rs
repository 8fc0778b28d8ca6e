//! Raw and normalized return tables.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use speech_align_core::{FeatureError, PriceBar, ReturnRecord};
use std::collections::VecDeque;

/// Trailing mean over `window` periods; `None` until the window is full.
///
/// The sum is recomputed from the window on every step so long series do
/// not accumulate drift.
#[must_use]
pub fn moving_average(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut buffer: VecDeque<f64> = VecDeque::with_capacity(window.min(values.len()));
    let mut out = Vec::with_capacity(values.len());

    for &value in values {
        buffer.push_back(value);
        if buffer.len() > window {
            buffer.pop_front();
        }

        if window == 0 || buffer.len() < window {
            out.push(None);
        } else {
            out.push(Some(buffer.iter().sum::<f64>() / window as f64));
        }
    }

    out
}

fn bar_return(bar: &PriceBar) -> Result<f64, FeatureError> {
    if bar.open <= Decimal::ZERO {
        return Err(FeatureError::invalid(
            "open",
            format!("open price on {} must be positive, got {}", bar.date, bar.open),
        ));
    }

    bar.close
        .checked_div(bar.open)
        .and_then(|ratio| (ratio - Decimal::ONE).to_f64())
        .ok_or_else(|| {
            FeatureError::invalid(
                "close",
                format!("return on {} is not representable", bar.date),
            )
        })
}

/// Builds the raw return table: return, absolute return and moving average.
///
/// # Errors
/// Returns `InvalidParameter` if `window` is zero or a bar has a non-positive open.
pub fn compute_returns(
    prices: &[PriceBar],
    window: usize,
) -> Result<Vec<ReturnRecord>, FeatureError> {
    if window == 0 {
        return Err(FeatureError::invalid(
            "window",
            "moving average window must be at least 1",
        ));
    }

    let rates = prices.iter().map(bar_return).collect::<Result<Vec<_>, _>>()?;
    let averages = moving_average(&rates, window);

    Ok(prices
        .iter()
        .zip(rates)
        .zip(averages)
        .map(|((bar, rate), moving_average)| ReturnRecord {
            date: bar.date,
            rate_of_return: rate,
            abs_return: rate.abs(),
            moving_average,
            return_diff: None,
            return_norm: None,
        })
        .collect())
}

/// Adds `return_diff` and `return_norm` to a raw return table.
///
/// A zero moving average leaves `return_norm` undefined instead of infinite.
#[must_use]
pub fn normalize_returns(raw: &[ReturnRecord]) -> Vec<ReturnRecord> {
    raw.iter()
        .map(|record| {
            let ma = record.moving_average;
            ReturnRecord {
                return_diff: ma.map(|m| (record.rate_of_return - m).abs()),
                return_norm: ma
                    .filter(|m| *m != 0.0)
                    .map(|m| (record.rate_of_return / m).abs()),
                ..*record
            }
        })
        .collect()
}

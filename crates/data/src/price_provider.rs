use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate};
use rust_decimal::Decimal;
use speech_align_core::{Interval, OhlcvBar, PriceSeriesProvider};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Serves price history from `{dir}/{ticker}_{interval}.csv` files.
///
/// Format: timestamp,symbol,open,high,low,close,volume (RFC 3339 timestamps)
pub struct CsvPriceProvider {
    dir: PathBuf,
}

impl CsvPriceProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the file backing a ticker/interval pair.
    #[must_use]
    pub fn path_for(&self, ticker: &str, interval: Interval) -> PathBuf {
        self.dir.join(format!("{ticker}_{interval}.csv"))
    }

    /// Reads every bar in a file, sorted by timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The CSV file cannot be opened
    /// - The CSV file has invalid format
    /// - Timestamp parsing fails
    /// - Decimal parsing fails for OHLCV values
    pub fn read_file(path: &Path) -> Result<Vec<OhlcvBar>> {
        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("Failed to open price file: {}", path.display()))?;

        let mut bars = Vec::new();
        for (line, result) in reader.records().enumerate() {
            let record = result
                .with_context(|| format!("Invalid price row {} in {}", line + 1, path.display()))?;
            let bar = Self::parse_record(&record)
                .with_context(|| format!("Invalid price row {} in {}", line + 1, path.display()))?;
            bars.push(bar);
        }

        bars.sort_by_key(|b| b.timestamp);
        Ok(bars)
    }

    // CSV format: timestamp,symbol,open,high,low,close,volume
    fn parse_record(record: &csv::StringRecord) -> Result<OhlcvBar> {
        if record.len() < 7 {
            anyhow::bail!("expected 7 columns, got {}", record.len());
        }
        Ok(OhlcvBar {
            timestamp: DateTime::parse_from_rfc3339(&record[0])?,
            symbol: record[1].to_string(),
            open: Decimal::from_str(&record[2])?,
            high: Decimal::from_str(&record[3])?,
            low: Decimal::from_str(&record[4])?,
            close: Decimal::from_str(&record[5])?,
            volume: Decimal::from_str(&record[6])?,
        })
    }
}

impl PriceSeriesProvider for CsvPriceProvider {
    fn fetch(
        &self,
        ticker: &str,
        interval: Interval,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<OhlcvBar>> {
        let path = self.path_for(ticker, interval);
        let bars: Vec<OhlcvBar> = Self::read_file(&path)?
            .into_iter()
            .filter(|b| b.symbol == ticker)
            .filter(|b| {
                let day = b.timestamp.date_naive();
                day >= start && day <= end
            })
            .collect();

        tracing::debug!(
            "Read {} {} bars for {} between {} and {}",
            bars.len(),
            interval,
            ticker,
            start,
            end
        );

        Ok(bars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::fs;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    const BARS: &str = "timestamp,symbol,open,high,low,close,volume
2020-01-06T00:00:00-05:00,^GSPC,3217.55,3246.84,3214.64,3246.28,3674070000
2020-01-02T00:00:00-05:00,^GSPC,3244.67,3258.14,3235.53,3257.85,3458250000
2020-01-03T00:00:00-05:00,^GSPC,3226.36,3246.15,3222.34,3234.85,3461290000
2020-01-03T00:00:00-05:00,^DJI,28634.88,28872.80,28627.77,28868.80,251820000
";

    #[test]
    fn filters_range_and_symbol_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("^GSPC_1d.csv"), BARS).unwrap();
        let provider = CsvPriceProvider::new(dir.path());

        let bars = provider
            .fetch("^GSPC", Interval::OneDay, day(2020, 1, 2), day(2020, 1, 3))
            .unwrap();

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].timestamp.date_naive(), day(2020, 1, 2));
        assert_eq!(bars[1].close, dec!(3234.85));
        assert!(bars.iter().all(|b| b.symbol == "^GSPC"));
    }

    #[test]
    fn range_is_inclusive_of_end_day() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("^GSPC_1d.csv"), BARS).unwrap();
        let provider = CsvPriceProvider::new(dir.path());

        let bars = provider
            .fetch("^GSPC", Interval::OneDay, day(2020, 1, 6), day(2020, 1, 6))
            .unwrap();
        assert_eq!(bars.len(), 1);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let provider = CsvPriceProvider::new(dir.path());
        let err = provider
            .fetch("^GSPC", Interval::OneHour, day(2020, 1, 2), day(2020, 1, 3))
            .unwrap_err();
        assert!(format!("{err:#}").contains("^GSPC_1h.csv"));
    }
}

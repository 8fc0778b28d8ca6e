use anyhow::{anyhow, Context, Result};
use csv::Writer;
use speech_align_core::{ReturnRecord, SpeakerTable};
use std::fs::File;
use std::path::Path;

pub struct CsvStorage;

fn optional(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn flag(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

impl CsvStorage {
    /// Writes the joined feature table, one row per trading day.
    ///
    /// Undefined return values are written as empty fields; flags as 0/1.
    /// Speaker columns follow the fixed columns in table order.
    ///
    /// # Errors
    /// Returns error if the two tables are not aligned row by row, or writing fails
    pub fn write_features(
        path: impl AsRef<Path>,
        returns: &[ReturnRecord],
        table: &SpeakerTable,
    ) -> Result<()> {
        if returns.len() != table.rows.len() {
            return Err(anyhow!(
                "Return table has {} rows but feature table has {}",
                returns.len(),
                table.rows.len()
            ));
        }

        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
        let mut writer = Writer::from_writer(file);

        let mut header: Vec<&str> = vec![
            "Date",
            "rates_of_return",
            "absolute_rates_of_return",
            "moving_average",
            "rates_of_return_diff",
            "rates_of_return_norm",
            "binary",
            "binary_diff",
            "binary_norm",
            "is_speech",
            "speech_was_yesterday",
            "speech_will_be_tomorrow",
        ];
        header.extend(table.speakers.iter().map(String::as_str));
        writer.write_record(&header)?;

        for (ret, row) in returns.iter().zip(&table.rows) {
            let aligned = &row.aligned;
            if ret.date != aligned.date() {
                return Err(anyhow!(
                    "Row date mismatch: return table has {}, feature table has {}",
                    ret.date,
                    aligned.date()
                ));
            }

            let mut record = vec![
                ret.date.to_string(),
                ret.rate_of_return.to_string(),
                ret.abs_return.to_string(),
                optional(ret.moving_average),
                optional(ret.return_diff),
                optional(ret.return_norm),
                flag(aligned.flags.binary).to_string(),
                flag(aligned.flags.binary_diff).to_string(),
                flag(aligned.flags.binary_norm).to_string(),
                flag(aligned.is_speech).to_string(),
                flag(aligned.speech_was_yesterday).to_string(),
                flag(aligned.speech_will_be_tomorrow).to_string(),
            ];
            record.extend(row.indicators.iter().map(|&i| flag(i).to_string()));
            writer.write_record(&record)?;
        }

        writer.flush()?;
        tracing::info!("Wrote {} feature rows to {}", returns.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use speech_align_core::{AlignedRecord, BinaryFlags, SpeakerRow};
    use std::fs;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 1, d).unwrap()
    }

    fn aligned(d: u32, is_speech: bool) -> AlignedRecord {
        AlignedRecord {
            flags: BinaryFlags {
                date: day(d),
                binary: !is_speech,
                binary_diff: false,
                binary_norm: false,
            },
            is_speech,
            speech_was_yesterday: false,
            speech_will_be_tomorrow: !is_speech,
        }
    }

    fn ret(d: u32, ma: Option<f64>) -> ReturnRecord {
        ReturnRecord {
            date: day(d),
            rate_of_return: 0.01,
            abs_return: 0.01,
            moving_average: ma,
            return_diff: ma.map(|m| (0.01 - m).abs()),
            return_norm: None,
        }
    }

    #[test]
    fn writes_features_with_blank_undefined_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("features.csv");
        let table = SpeakerTable {
            speakers: vec!["Draghi".to_string(), "Powell".to_string()],
            rows: vec![
                SpeakerRow {
                    aligned: aligned(2, true),
                    indicators: vec![true, false],
                },
                SpeakerRow {
                    aligned: aligned(3, false),
                    indicators: vec![false, false],
                },
            ],
        };

        CsvStorage::write_features(&path, &[ret(2, None), ret(3, Some(0.01))], &table).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert!(lines[0].starts_with("Date,rates_of_return"));
        assert!(lines[0].ends_with("speech_will_be_tomorrow,Draghi,Powell"));
        assert_eq!(lines[1], "2020-01-02,0.01,0.01,,,,0,0,0,1,0,0,1,0");
        assert!(lines[2].starts_with("2020-01-03,0.01,0.01,0.01,0,"));
    }

    #[test]
    fn rejects_misaligned_tables() {
        let dir = tempfile::tempdir().unwrap();
        let table = SpeakerTable {
            speakers: Vec::new(),
            rows: vec![SpeakerRow {
                aligned: aligned(3, false),
                indicators: Vec::new(),
            }],
        };
        let err = CsvStorage::write_features(dir.path().join("f.csv"), &[ret(2, None)], &table)
            .unwrap_err();
        assert!(err.to_string().contains("Row date mismatch"));
    }
}

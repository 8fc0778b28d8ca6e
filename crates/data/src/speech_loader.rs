//! Loader for scraped speech records.
//!
//! The scraper writes one CSV per page; the loader concatenates them into a
//! single corpus, drops repeated titles and sorts by date.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use speech_align_core::{SpeechCorpus, SpeechCorpusLoader, SpeechEvent};
use std::fs;
use std::path::{Path, PathBuf};

/// Row layout of a scraped speech CSV. Extra columns are ignored.
#[derive(Debug, Deserialize)]
struct SpeechRow {
    #[serde(rename = "Date", alias = "date")]
    date: NaiveDate,
    #[serde(rename = "Title", alias = "title")]
    title: String,
    #[serde(rename = "Name", alias = "name")]
    name: String,
    #[serde(rename = "Url", alias = "url", alias = "Link", default)]
    url: Option<String>,
}

impl From<SpeechRow> for SpeechEvent {
    fn from(row: SpeechRow) -> Self {
        Self {
            date: row.date,
            title: row.title,
            name: row.name,
            url: row.url.filter(|u| !u.trim().is_empty()),
        }
    }
}

/// Loads every `*.csv` file in a directory into one deduplicated corpus.
#[derive(Debug, Clone, Default)]
pub struct CsvSpeechLoader {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

impl CsvSpeechLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the loaded corpus to an inclusive date window.
    #[must_use]
    pub fn with_window(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    /// Reads the events of a single CSV file in file order.
    ///
    /// # Errors
    /// Returns error if the file cannot be opened or a row fails to parse
    pub fn read_file(path: &Path) -> Result<Vec<SpeechEvent>> {
        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("Failed to open speech file: {}", path.display()))?;

        let mut events = Vec::new();
        for (line, result) in reader.deserialize::<SpeechRow>().enumerate() {
            let row = result.with_context(|| {
                format!("Invalid speech row {} in {}", line + 1, path.display())
            })?;
            events.push(SpeechEvent::from(row));
        }
        Ok(events)
    }

    fn csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files: Vec<PathBuf> = fs::read_dir(dir)
            .with_context(|| format!("Failed to read speech directory: {}", dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "csv"))
            .collect();
        // Directory order is platform dependent; first-title-wins needs a stable order
        files.sort();
        Ok(files)
    }
}

impl SpeechCorpusLoader for CsvSpeechLoader {
    fn load(&self, path: &Path) -> Result<SpeechCorpus> {
        let files = Self::csv_files(path)?;

        let mut events = Vec::new();
        for file in &files {
            events.extend(Self::read_file(file)?);
        }
        let raw = events.len();

        let corpus = SpeechCorpus::deduplicated(events);
        let duplicates = raw - corpus.len();
        let corpus = if self.start.is_some() || self.end.is_some() {
            corpus.within(self.start, self.end)
        } else {
            corpus
        };

        tracing::info!(
            "Loaded {} speeches from {} files ({} duplicate titles dropped)",
            corpus.len(),
            files.len(),
            duplicates
        );

        Ok(corpus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn write(dir: &Path, name: &str, body: &str) {
        fs::write(dir.join(name), body).unwrap();
    }

    #[test]
    fn concatenates_dedups_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "page_1.csv",
            "Date,Title,Name,Url\n2020-01-03,Rates,Lagarde,https://bis.org/a.pdf\n2020-01-02,Outlook,Powell,\n",
        );
        write(
            dir.path(),
            "page_2.csv",
            "Date,Title,Name,Url\n2020-01-05,Rates,Kuroda,\n2020-01-01,Banks,Powell,\n",
        );

        let corpus = CsvSpeechLoader::new().load(dir.path()).unwrap();

        let titles: Vec<_> = corpus.events().iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Banks", "Outlook", "Rates"]);
        // First occurrence of "Rates" (page_1) wins
        assert_eq!(corpus.events()[2].name, "Lagarde");
        assert_eq!(
            corpus.events()[2].url.as_deref(),
            Some("https://bis.org/a.pdf")
        );
        assert!(corpus.events()[1].url.is_none());
    }

    #[test]
    fn ignores_extra_columns_and_non_csv_files() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "page.csv",
            "Date,Title,Description,Name\n2020-02-01,Speech,long text,Draghi\n",
        );
        write(dir.path(), "notes.txt", "not a csv");

        let corpus = CsvSpeechLoader::new().load(dir.path()).unwrap();
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus.events()[0].name, "Draghi");
        assert_eq!(corpus.events()[0].date, day(2020, 2, 1));
    }

    #[test]
    fn applies_inclusive_window() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "page.csv",
            "Date,Title,Name\n2020-01-01,A,X\n2020-01-02,B,X\n2020-01-03,C,X\n2020-01-04,D,X\n",
        );

        let corpus = CsvSpeechLoader::new()
            .with_window(Some(day(2020, 1, 2)), Some(day(2020, 1, 3)))
            .load(dir.path())
            .unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.date_range(), Some((day(2020, 1, 2), day(2020, 1, 3))));
    }

    #[test]
    fn empty_directory_yields_empty_corpus() {
        let dir = tempfile::tempdir().unwrap();
        let corpus = CsvSpeechLoader::new().load(dir.path()).unwrap();
        assert!(corpus.is_empty());
    }

    #[test]
    fn malformed_date_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "page.csv", "Date,Title,Name\n02/01/2020,A,X\n");
        let err = CsvSpeechLoader::new().load(dir.path()).unwrap_err();
        assert!(format!("{err:#}").contains("Invalid speech row 1"));
    }
}

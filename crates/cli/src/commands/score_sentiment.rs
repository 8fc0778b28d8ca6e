//! Score sentiment CLI command.
//!
//! Downloads each speech document in the corpus and writes one sentiment
//! row per speech. Speeches that cannot be scored get blank score fields.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;
use speech_align_core::{SpeechCorpus, SpeechCorpusLoader};
use speech_align_data::CsvSpeechLoader;
use speech_align_sentiment::{HttpFetcher, PlainTextExtractor, SentimentScore, SentimentScorer};
use std::path::Path;

/// Arguments for the score-sentiment command.
#[derive(Args, Debug, Clone)]
pub struct ScoreSentimentArgs {
    /// Config file path
    #[arg(short, long, default_value = "config/Config.toml")]
    pub config: String,

    /// Profile overlay (loads Config.{profile}.toml next to the config file)
    #[arg(long, env = "SPEECH_PROFILE")]
    pub profile: Option<String>,

    /// Directory of scraped speech CSV files
    #[arg(long)]
    pub speeches: Option<String>,

    /// Output CSV file path
    #[arg(short, long)]
    pub output: String,
}

#[derive(Debug, Serialize)]
struct SentimentRow<'a> {
    #[serde(rename = "Date")]
    date: NaiveDate,
    #[serde(rename = "Title")]
    title: &'a str,
    label: Option<&'static str>,
    compound: Option<f64>,
    binary: Option<u8>,
}

/// Runs the score-sentiment command.
///
/// # Errors
/// Returns error if the corpus cannot be loaded or the output cannot be written.
/// Individual documents that fail to score do not fail the command.
pub async fn run_score_sentiment(args: ScoreSentimentArgs) -> Result<()> {
    let mut config = super::load_config(&args.config, args.profile.as_deref())?;
    if let Some(dir) = &args.speeches {
        config.data.speeches_dir.clone_from(dir);
    }

    let corpus = CsvSpeechLoader::new()
        .with_window(config.data.start, config.data.end)
        .load(Path::new(&config.data.speeches_dir))?;

    let fetcher = HttpFetcher::from_config(&config.sentiment)?;
    let scorer = SentimentScorer::new(fetcher, PlainTextExtractor)
        .with_log_every(config.sentiment.log_every);

    tracing::info!("Scoring {} speech documents", corpus.len());
    let scores = scorer
        .score_all(corpus.events().iter().map(|e| e.url.as_deref()))
        .await;

    write_scores(Path::new(&args.output), &corpus, &scores)
        .with_context(|| format!("Failed to write sentiment to {}", args.output))?;

    let positive = scores.iter().flatten().filter(|s| s.binary == 1).count();
    tracing::info!(
        "Wrote {} sentiment rows ({} scored, {} positive) to {}",
        scores.len(),
        scores.iter().flatten().count(),
        positive,
        args.output
    );
    Ok(())
}

fn write_scores(path: &Path, corpus: &SpeechCorpus, scores: &[Option<SentimentScore>]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    writer.write_record(["Date", "Title", "label", "compound", "binary"])?;

    for (event, score) in corpus.events().iter().zip(scores.iter().copied()) {
        writer.serialize(SentimentRow {
            date: event.date,
            title: &event.title,
            label: score.map(|s| s.label.as_str()),
            compound: score.map(|s| s.compound),
            binary: score.map(|s| s.binary),
        })?;
    }

    writer.flush()?;
    Ok(())
}

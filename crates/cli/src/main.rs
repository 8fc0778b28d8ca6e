use clap::{Parser, Subcommand};

mod commands;

use commands::{BuildFeaturesArgs, ScoreSentimentArgs};

#[derive(Parser)]
#[command(name = "speech-align")]
#[command(about = "Align central-bank speeches with market return features", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the return/speech feature table and write it as CSV
    BuildFeatures(BuildFeaturesArgs),
    /// Score the sentiment of each speech document and write it as CSV
    ScoreSentiment(ScoreSentimentArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match cli.command {
        Commands::BuildFeatures(args) => {
            commands::run_build_features(args)?;
        }
        Commands::ScoreSentiment(args) => {
            commands::run_score_sentiment(args).await?;
        }
    }

    Ok(())
}

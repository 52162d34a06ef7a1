//! Discourse decoder command line tool
//!
//! Decodes every document of a datapack with the configured reference
//! decoder and writes the predicted edges, or scores the decoded structures
//! against the gold.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use discourse_core::{
    decode_fold, decode_to_file, Count, Datapack, DecodeConfig, DecodeContext, JobRunner,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, Level};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "discourse-decoder")]
#[command(about = "Decode discourse structures from scored EDU pairs", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Set log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Configuration file (defaults are used if it does not exist)
    #[arg(short, long, env = "DISCOURSE_DECODER_CONFIG", default_value = "decoder.toml")]
    config: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode every document and write the predicted edges
    Decode {
        /// Datapack in JSON form
        #[arg(short, long)]
        input: PathBuf,

        /// Where to write the predictions (one line per EDU pair)
        #[arg(short, long)]
        output: PathBuf,

        /// Override the number of workers from the configuration
        #[arg(short, long)]
        workers: Option<usize>,
    },

    /// Decode every document and print the summed counts as JSON
    Score {
        /// Datapack in JSON form
        #[arg(short, long)]
        input: PathBuf,

        /// Also print the counts of each document
        #[arg(long)]
        per_document: bool,
    },
}

fn parse_level(level: &str) -> Level {
    match level {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

async fn run_decode(config: DecodeConfig, input: &Path, output: &Path) -> Result<()> {
    let dpack = Datapack::from_json_file(input).with_context(|| format!("reading datapack {:?}", input))?;
    let mpack = dpack.to_multipack()?;
    info!("Decoding {} documents with {} workers", mpack.len(), config.workers);

    let ctx = Arc::new(DecodeContext {
        models: config.build_models()?,
        decoder: config.build_decoder(),
        mode: config.mode,
        max_dist: config.max_dist_by_label.clone(),
    });
    let runner = JobRunner::new(config.workers);
    let reports = decode_to_file(&mpack, ctx, &runner, output).await?;

    let edges: usize = reports.iter().map(|r| r.edges).sum();
    println!("Decoded {} documents ({} edges) into {}", reports.len(), edges, output.display());
    Ok(())
}

fn run_score(config: DecodeConfig, input: &Path, per_document: bool) -> Result<()> {
    let dpack = Datapack::from_json_file(input).with_context(|| format!("reading datapack {:?}", input))?;
    let models = config.build_models()?;
    let decoder = config.build_decoder();

    let scores = decode_fold(&dpack, &models, &decoder, config.mode, config.max_dist_by_label.as_ref())?;
    if per_document {
        for score in &scores {
            println!("{}", serde_json::to_string(score)?);
        }
    }
    let total: Count = scores.iter().map(|s| s.count).sum();
    println!("{}", serde_json::to_string_pretty(&total)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = parse_level(&cli.log_level);
    let filter = EnvFilter::new(format!("discourse_core={0},discourse_decoder={0}", level.as_str().to_lowercase()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr) // Write logs to stderr, not stdout
        .init();

    debug!("discourse-decoder v{} starting...", env!("CARGO_PKG_VERSION"));

    let mut config = DecodeConfig::load(&cli.config)?;

    match cli.command {
        Commands::Decode { input, output, workers } => {
            if let Some(workers) = workers {
                config.workers = workers;
                config.validate()?;
            }
            run_decode(config, &input, &output).await
        }
        Commands::Score { input, per_document } => run_score(config, &input, per_document),
    }
}

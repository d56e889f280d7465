//! sketch-to-voice: upload a sketch, read its text and speak it.
//!
//! Runs with no arguments using the defaults; environment variables (or a
//! `.env` file) and the flags below override them.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use sketchvoice_cli::{init_tracing, load_aws_config, log_run_error, Overrides};
use sketchvoice_core::PipelineConfig;
use sketchvoice_pipeline::PipelineRunner;
use sketchvoice_services::{create_recognizer, create_synthesizer};
use sketchvoice_storage::create_storage;

#[derive(Parser)]
#[command(name = "sketch-to-voice", about = "Turn a sketch into speech")]
struct Cli {
    /// Image to process (default: sample.png, or SOURCE_FILE)
    #[arg(long)]
    source: Option<PathBuf>,
    /// Bucket receiving the sketch and text (default: project-sketch-to-voice, or S3_BUCKET)
    #[arg(long)]
    bucket: Option<String>,
    /// Store the audio in the bucket instead of on disk
    #[arg(long)]
    audio_to_bucket: bool,
    /// Directory for the audio file when writing to disk
    #[arg(long)]
    audio_dir: Option<PathBuf>,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize run report")?;
    println!("{}", out);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before the subscriber so RUST_LOG from the file applies.
    dotenvy::dotenv().ok();
    init_tracing();
    let cli = Cli::parse();

    let config = PipelineConfig::from_env().context("Failed to load configuration")?;
    let config = Overrides {
        source: cli.source,
        bucket: cli.bucket,
        audio_to_bucket: cli.audio_to_bucket,
        audio_dir: cli.audio_dir,
    }
    .apply(config);
    config.validate().context("Invalid configuration")?;

    let sdk_config = load_aws_config(config.aws_region()).await;
    let storage = create_storage(&config, &sdk_config)
        .await
        .context("Failed to initialize storage")?;
    let recognizer = create_recognizer(&config, &sdk_config);
    let synthesizer = create_synthesizer(&config, &sdk_config);

    let backend = storage.backend_type();
    let recognizer_name = recognizer.name();
    let synthesizer_name = synthesizer.name();
    let runner = PipelineRunner::new(config, storage, recognizer, synthesizer);

    tracing::info!(
        source = %runner.config().source_file.display(),
        bucket = %runner.config().bucket,
        storage = %backend,
        recognizer = recognizer_name,
        synthesizer = synthesizer_name,
        "Starting sketch-to-voice"
    );

    let report = match runner.run().await {
        Ok(report) => report,
        Err(err) => {
            log_run_error(&err);
            return Err(err).context("sketch-to-voice run failed");
        }
    };

    print_json(&report)?;
    Ok(())
}

pub mod api;
pub mod config;
pub mod error;
pub mod filter;
pub mod ingest;
pub mod load_config;
pub mod model;
pub mod resolve;
pub mod storage;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

use api::HttpIngestionApiClient;
use ingest::Ingestor;
use load_config::load_config;
use resolve::RecordingMetadataResolver;
use storage::BlobStorageClient;

/// CLI for recording-ingestor: submit newly appeared source recordings
/// to the recording-management API.
#[derive(Parser)]
#[clap(
    name = "recording-ingestor",
    version,
    about = "Discover recording files at the source and submit their metadata downstream"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one ingestion batch using the given config file
    Ingest {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
        /// Override the configured per-run batch cap
        #[clap(long)]
        max_files: Option<usize>,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Ingest { config, max_files } => {
            let config = load_config(config)?;

            let storage = Arc::new(BlobStorageClient::new(
                config.storage.base_url,
                config.storage.sas_token,
            )?);
            let api = HttpIngestionApiClient::new(
                config.api.base_url,
                config.api.subscription_key,
            )?;
            let resolver = RecordingMetadataResolver::new(storage.clone());
            let ingestor = Ingestor::new(storage, api, resolver, config.max_files_per_batch);

            println!("Ingestion starting...");
            let summary = match max_files {
                Some(max) => ingestor.ingest_up_to(max).await,
                None => ingestor.ingest().await,
            };
            match summary {
                Ok(summary) => {
                    println!("Ingestion complete.\nSummary:");
                    println!("{summary:#?}");
                    Ok(())
                }
                Err(e) => Err(anyhow::Error::new(e).context("Ingestion failed")),
            }
        }
    }
}

//! Runtime configuration for one ingestor process.
//!
//! The static parts come from a YAML file; secrets are injected from
//! the environment by [`crate::load_config`]. Nothing here reads the
//! environment itself.

use tracing::{debug, info};

/// Fully merged configuration handed to the wiring in `run`.
#[derive(Debug)]
pub struct IngestionConfig {
    pub storage: StorageConfig,
    pub api: ApiConfig,
    /// Global cap on files attempted per run, across all folders.
    /// Validated to be at least 1 at load time.
    pub max_files_per_batch: usize,
}

impl IngestionConfig {
    pub fn trace_loaded(&self) {
        info!(
            storage_base_url = %self.storage.base_url,
            api_base_url = %self.api.base_url,
            max_files_per_batch = self.max_files_per_batch,
            "Loaded ingestion config"
        );
        // Secrets stay out of the logs; lengths are enough to confirm
        // they were injected.
        debug!(
            subscription_key_len = self.api.subscription_key.len(),
            sas_token_set = self.storage.sas_token.is_some(),
            "Ingestion config secrets present"
        );
    }
}

/// Where the source recordings live.
#[derive(Debug)]
pub struct StorageConfig {
    pub base_url: String,
    /// Optional pre-signed query token appended to storage requests.
    pub sas_token: Option<String>,
}

/// Where resolved metadata is submitted.
#[derive(Debug)]
pub struct ApiConfig {
    pub base_url: String,
    pub subscription_key: String,
}

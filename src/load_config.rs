//! Loads the static YAML config file (no secrets) and injects required
//! env vars for secrets, producing a fully merged [`IngestionConfig`].

use std::fs;
use std::path::Path;

use anyhow::Result;
use serde::Deserialize;
use tracing::{error, info};

use crate::config::{ApiConfig, IngestionConfig, StorageConfig};

/// Env var holding the downstream API subscription key. Required.
pub const API_SUBSCRIPTION_KEY_VAR: &str = "INGESTION_API_SUBSCRIPTION_KEY";
/// Env var holding an optional pre-signed token for storage requests.
pub const STORAGE_SAS_TOKEN_VAR: &str = "SOURCE_STORAGE_SAS_TOKEN";

#[derive(Deserialize)]
struct StaticConfig {
    storage: StorageSection,
    api: ApiSection,
    ingestion: IngestionSection,
}

#[derive(Deserialize)]
struct StorageSection {
    base_url: String,
}

#[derive(Deserialize)]
struct ApiSection {
    base_url: String,
}

#[derive(Deserialize)]
struct IngestionSection {
    max_files_per_batch: usize,
}

/// Loads and validates configuration. The batch cap must be a positive
/// integer: a run that can never attempt anything is a misconfiguration,
/// not something to discover in production logs.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<IngestionConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => content,
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    let static_conf: StaticConfig = match serde_yaml::from_str(&config_content) {
        Ok(conf) => conf,
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    if static_conf.ingestion.max_files_per_batch == 0 {
        error!("ingestion.max_files_per_batch must be at least 1");
        anyhow::bail!("ingestion.max_files_per_batch must be at least 1");
    }

    let subscription_key = match std::env::var(API_SUBSCRIPTION_KEY_VAR) {
        Ok(key) => key,
        Err(e) => {
            error!(error = ?e, "{API_SUBSCRIPTION_KEY_VAR} environment variable not set");
            return Err(anyhow::anyhow!(
                "{API_SUBSCRIPTION_KEY_VAR} environment variable not set: {e}"
            ));
        }
    };

    let sas_token = std::env::var(STORAGE_SAS_TOKEN_VAR).ok();

    let config = IngestionConfig {
        storage: StorageConfig {
            base_url: static_conf.storage.base_url,
            sas_token,
        },
        api: ApiConfig {
            base_url: static_conf.api.base_url,
            subscription_key,
        },
        max_files_per_batch: static_conf.ingestion.max_files_per_batch,
    };

    config.trace_loaded();

    Ok(config)
}

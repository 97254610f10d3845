//! Source storage collaborator: folder enumeration, per-folder listings
//! and content reads.
//!
//! The trait is what the orchestrator and resolver depend on; the
//! concrete [`BlobStorageClient`] speaks the storage gateway's JSON
//! listing API over HTTP. Both real and mocked implementations satisfy
//! the same contract, so orchestration tests never touch the network.

use std::time::Duration;

use async_trait::async_trait;
#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::StorageError;
use crate::model::{SourceItem, SourceItemSet};

/// Default timeout for storage requests. Content reads of large
/// recordings dominate, hence the generous value.
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Read access to the source storage tree.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait SourceStorageClient: Send + Sync {
    /// List every folder in the source tree. Failure here is fatal to an
    /// ingestion run: without the folder list nothing can proceed.
    async fn list_folders(&self) -> Result<Vec<String>, StorageError>;

    /// List the items currently present in one folder.
    async fn list_items(&self, folder: &str) -> Result<SourceItemSet, StorageError>;

    /// Read the full content behind a previously listed item's
    /// `location_uri`. Used by metadata resolution for hashing.
    async fn read_content(&self, location_uri: &str) -> Result<Vec<u8>, StorageError>;
}

#[derive(Deserialize)]
struct ItemEntry {
    filename: String,
    uri: String,
    #[serde(default)]
    content_hash: String,
}

/// HTTP client for the storage gateway's listing API.
pub struct BlobStorageClient {
    client: reqwest::Client,
    base_url: String,
    sas_token: Option<String>,
}

impl BlobStorageClient {
    pub fn new(base_url: impl Into<String>, sas_token: Option<String>) -> Result<Self, StorageError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;
        let base_url = base_url.into();
        info!(base_url = %base_url, sas_token_set = sas_token.is_some(), "Initialised storage client");
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            sas_token,
        })
    }

    fn with_token(&self, url: &str) -> String {
        match &self.sas_token {
            Some(token) if url.contains('?') => format!("{url}&{token}"),
            Some(token) => format!("{url}?{token}"),
            None => url.to_string(),
        }
    }
}

#[async_trait]
impl SourceStorageClient for BlobStorageClient {
    async fn list_folders(&self) -> Result<Vec<String>, StorageError> {
        let url = self.with_token(&format!("{}/folders", self.base_url));
        let folders: Vec<String> = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        debug!(count = folders.len(), "Listed source folders");
        Ok(folders)
    }

    async fn list_items(&self, folder: &str) -> Result<SourceItemSet, StorageError> {
        let url = self.with_token(&format!("{}/folders/{folder}/items", self.base_url));
        let entries: Vec<ItemEntry> = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        debug!(folder, count = entries.len(), "Listed folder items");
        // The gateway guarantees filenames are unique per folder; bail
        // out if that guarantee was broken upstream rather than diffing
        // against an ambiguous listing.
        let unique: std::collections::HashSet<&str> =
            entries.iter().map(|e| e.filename.as_str()).collect();
        if unique.len() != entries.len() {
            return Err(StorageError::Listing {
                context: folder.to_string(),
                detail: format!(
                    "{} entries but only {} distinct filenames",
                    entries.len(),
                    unique.len()
                ),
            });
        }
        Ok(entries
            .into_iter()
            .map(|e| SourceItem::new(e.filename, e.uri, e.content_hash))
            .collect())
    }

    async fn read_content(&self, location_uri: &str) -> Result<Vec<u8>, StorageError> {
        let url = self.with_token(location_uri);
        let bytes = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        debug!(location_uri, size = bytes.len(), "Read item content");
        Ok(bytes.to_vec())
    }
}

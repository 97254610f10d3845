//! Metadata resolution: turn one listed source item into the
//! submission-ready [`Metadata`] the downstream API expects.
//!
//! Recording filenames encode everything except the checksum:
//!
//! ```text
//! {case_ref}_{YYYY-MM-DD-HH.MM.SS.mmm}-UTC_{segment}.mp4
//! e.g. cf-0266-hu-02785-2020_2020-07-16-10.07.31.680-UTC_0.mp4
//! ```
//!
//! The checksum normally arrives with the storage listing; when it does
//! not, the resolver reads the content back from storage and hashes it
//! itself.

use std::sync::Arc;
use std::sync::OnceLock;

use async_trait::async_trait;
use chrono::NaiveDateTime;
#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;
use regex::Regex;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::ResolutionError;
use crate::model::{Metadata, SourceItem};
use crate::storage::SourceStorageClient;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H.%M.%S%.3f";

fn filename_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^(?P<case>.+)_(?P<ts>\d{4}-\d{2}-\d{2}-\d{2}\.\d{2}\.\d{2}\.\d{3})-UTC_(?P<seg>\d+)\.mp4$",
        )
        .expect("recording filename pattern is valid")
    })
}

/// Derives submission metadata for one source item. Never mutates the
/// item; failure is a structured [`ResolutionError`] the orchestrator
/// can isolate to the file.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait MetadataResolver: Send + Sync {
    async fn resolve(&self, folder: &str, item: &SourceItem)
        -> Result<Metadata, ResolutionError>;
}

/// Default resolver: filename parsing plus, when the listing carried no
/// checksum, a content read through the storage client for hashing.
pub struct RecordingMetadataResolver<S> {
    storage: Arc<S>,
}

impl<S> RecordingMetadataResolver<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl<S> MetadataResolver for RecordingMetadataResolver<S>
where
    S: SourceStorageClient,
{
    async fn resolve(
        &self,
        folder: &str,
        item: &SourceItem,
    ) -> Result<Metadata, ResolutionError> {
        let captures = filename_pattern()
            .captures(&item.filename)
            .ok_or_else(|| ResolutionError::MalformedFilename(item.filename.clone()))?;

        let case_ref = captures["case"].to_string();

        let raw_ts = &captures["ts"];
        let recording_datetime = NaiveDateTime::parse_from_str(raw_ts, TIMESTAMP_FORMAT)
            .map_err(|_| ResolutionError::InvalidTimestamp {
                filename: item.filename.clone(),
                value: raw_ts.to_string(),
            })?
            .and_utc();

        let raw_seg = &captures["seg"];
        let segment: u32 = raw_seg
            .parse()
            .map_err(|_| ResolutionError::InvalidSegment {
                filename: item.filename.clone(),
                value: raw_seg.to_string(),
            })?;

        let content_hash = if item.content_hash.is_empty() {
            self.hash_content(item).await?
        } else {
            item.content_hash.clone()
        };

        debug!(
            folder,
            filename = %item.filename,
            case_ref = %case_ref,
            segment,
            "Resolved metadata"
        );

        Ok(Metadata {
            folder: folder.to_string(),
            filename: item.filename.clone(),
            source_url: item.location_uri.clone(),
            content_hash,
            case_ref,
            recording_datetime,
            segment,
        })
    }
}

impl<S> RecordingMetadataResolver<S>
where
    S: SourceStorageClient,
{
    async fn hash_content(&self, item: &SourceItem) -> Result<String, ResolutionError> {
        let content = self
            .storage
            .read_content(&item.location_uri)
            .await
            .map_err(|source| ResolutionError::ContentUnavailable {
                filename: item.filename.clone(),
                source,
            })?;
        if content.is_empty() {
            return Err(ResolutionError::EmptyContent {
                filename: item.filename.clone(),
            });
        }
        let mut hasher = Sha256::new();
        hasher.update(&content);
        Ok(format!("{:x}", hasher.finalize()))
    }
}

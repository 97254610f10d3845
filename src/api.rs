//! Downstream recording-management API collaborator.
//!
//! Two calls matter to the pipeline: what a folder already has
//! (`ingested_filenames`, consumed by the filter) and accepting one
//! file's metadata (`submit`). The concrete client speaks JSON over
//! HTTP and authenticates with a subscription-key header.

use std::time::Duration;

use async_trait::async_trait;
#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::model::{IngestedFileSet, Metadata};

const DEFAULT_TIMEOUT_SECS: u64 = 60;

const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// The downstream API as the pipeline sees it.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait IngestionApiClient: Send + Sync {
    /// Filenames the downstream system already accepted for `folder`.
    async fn ingested_filenames(&self, folder: &str) -> Result<IngestedFileSet, ApiError>;

    /// Submit one file's resolved metadata. A non-success response is an
    /// [`ApiError`] carrying the status code and response body.
    async fn submit(&self, metadata: &Metadata) -> Result<(), ApiError>;
}

/// Response of `GET /folders/{folder}`; the API echoes the folder name
/// back as `folder-name`, which the client has no use for.
#[derive(Deserialize)]
struct FolderFilesResponse {
    filenames: Vec<String>,
}

/// HTTP client for the recording-management API.
pub struct HttpIngestionApiClient {
    client: reqwest::Client,
    base_url: String,
    subscription_key: String,
}

impl HttpIngestionApiClient {
    pub fn new(
        base_url: impl Into<String>,
        subscription_key: impl Into<String>,
    ) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;
        let base_url = base_url.into();
        info!(base_url = %base_url, "Initialised ingestion API client");
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            subscription_key: subscription_key.into(),
        })
    }

    /// Turn a non-success response into a structured [`ApiError`],
    /// draining the body so the log record carries the API's own detail.
    async fn error_from_response(response: reqwest::Response) -> ApiError {
        let code = response.status().as_u16();
        let message = response
            .status()
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_string();
        let body = response.text().await.unwrap_or_default();
        ApiError::new(code, message, body)
    }
}

#[async_trait]
impl IngestionApiClient for HttpIngestionApiClient {
    async fn ingested_filenames(&self, folder: &str) -> Result<IngestedFileSet, ApiError> {
        let url = format!("{}/folders/{folder}", self.base_url);
        let response = self
            .client
            .get(&url)
            .header(SUBSCRIPTION_KEY_HEADER, &self.subscription_key)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }
        let parsed: FolderFilesResponse = response.json().await?;
        debug!(folder, count = parsed.filenames.len(), "Fetched ingested filenames");
        Ok(parsed.filenames.into_iter().collect())
    }

    async fn submit(&self, metadata: &Metadata) -> Result<(), ApiError> {
        let url = format!("{}/segments", self.base_url);
        let response = self
            .client
            .post(&url)
            .header(SUBSCRIPTION_KEY_HEADER, &self.subscription_key)
            .json(metadata)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }
        debug!(
            folder = %metadata.folder,
            filename = %metadata.filename,
            "Submitted metadata"
        );
        Ok(())
    }
}

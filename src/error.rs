//! Error taxonomy for the ingestion pipeline.
//!
//! The orchestrator pattern-matches on these to decide what is fatal and
//! what is isolated: a failed folder enumeration kills the run, a failed
//! folder collection skips the folder, a failed resolution or submission
//! skips the file. Keeping the kinds as distinct types (rather than one
//! boxed error) is what makes that choice explicit at each call site.

use thiserror::Error;

/// Source storage failure: enumeration, per-folder listing or content
/// reads. Fatal when listing folders; otherwise isolated to the folder
/// or file being processed.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("storage listing for {context} returned an unusable payload: {detail}")]
    Listing { context: String, detail: String },
}

/// Downstream recording-management API failure, carrying the HTTP status
/// and response body so the log record is enough to diagnose. Never
/// fatal to a run.
#[derive(Error, Debug)]
#[error("api error: status {code}: {message}")]
pub struct ApiError {
    pub code: u16,
    pub message: String,
    /// Raw response body, useful when the API returns structured detail.
    pub body: String,
}

impl ApiError {
    pub fn new(code: u16, message: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            body: body.into(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        let code = e.status().map(|s| s.as_u16()).unwrap_or(0);
        Self {
            code,
            message: e.to_string(),
            body: String::new(),
        }
    }
}

/// Metadata could not be derived from a source item. Isolated to the
/// file; the run carries on with the next one.
#[derive(Error, Debug)]
pub enum ResolutionError {
    #[error("filename {0:?} does not match the recording naming pattern")]
    MalformedFilename(String),

    #[error("filename {filename:?} carries an invalid recording timestamp {value:?}")]
    InvalidTimestamp { filename: String, value: String },

    #[error("filename {filename:?} carries an invalid segment number {value:?}")]
    InvalidSegment { filename: String, value: String },

    #[error("content for {filename:?} could not be read for hashing: {source}")]
    ContentUnavailable {
        filename: String,
        #[source]
        source: StorageError,
    },

    #[error("content for {filename:?} is empty; refusing to hash an empty recording")]
    EmptyContent { filename: String },
}

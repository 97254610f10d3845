//! Value types shared across the ingestion pipeline.
//!
//! Everything here is plain data: items discovered at the source, the
//! downstream system's record of what it already holds, resolved
//! submission metadata and the per-run summary. All of it is constructed
//! fresh per run (or per folder, or per file) and discarded afterwards.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One ingestible recording file discovered at the source.
///
/// Identity for diffing purposes is the `filename` within its folder;
/// `location_uri` and `content_hash` are carried data.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceItem {
    /// File name, unique within its folder.
    pub filename: String,
    /// Opaque address the content can be retrieved from.
    pub location_uri: String,
    /// Checksum reported by the source listing; empty when unavailable.
    pub content_hash: String,
}

impl SourceItem {
    pub fn new(
        filename: impl Into<String>,
        location_uri: impl Into<String>,
        content_hash: impl Into<String>,
    ) -> Self {
        Self {
            filename: filename.into(),
            location_uri: location_uri.into(),
            content_hash: content_hash.into(),
        }
    }
}

/// The set of source items found in one folder. The source guarantees
/// filenames are unique per folder, so a plain set suffices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceItemSet {
    pub items: HashSet<SourceItem>,
}

impl SourceItemSet {
    pub fn new(items: HashSet<SourceItem>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<SourceItem> for SourceItemSet {
    fn from_iter<I: IntoIterator<Item = SourceItem>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

/// Filenames the downstream API already knows for one folder. Presence
/// or absence of a name is all the filter needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestedFileSet {
    pub filenames: HashSet<String>,
}

impl IngestedFileSet {
    pub fn new(filenames: HashSet<String>) -> Self {
        Self { filenames }
    }

    pub fn contains(&self, filename: &str) -> bool {
        self.filenames.contains(filename)
    }

    pub fn len(&self) -> usize {
        self.filenames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filenames.is_empty()
    }
}

impl FromIterator<String> for IngestedFileSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            filenames: iter.into_iter().collect(),
        }
    }
}

/// Submission-ready description of one recording file, derived from its
/// filename (and, when needed, its content). Built once per file and
/// consumed by a single submit call.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Metadata {
    pub folder: String,
    pub filename: String,
    /// Retrieval address of the recording at the source.
    pub source_url: String,
    /// SHA-256 of the content, hex-encoded.
    pub content_hash: String,
    /// Case reference parsed from the filename.
    pub case_ref: String,
    /// Recording start time parsed from the filename, always UTC.
    pub recording_datetime: DateTime<Utc>,
    /// Zero-based segment number within the recording session.
    pub segment: u32,
}

/// Aggregate result of one ingestion run.
///
/// The counter invariant `files_submitted_ok <= files_resolved_ok <=
/// files_attempted` holds at all times.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Files for which an ingestion attempt was started.
    pub files_attempted: usize,
    /// Files whose metadata resolved successfully.
    pub files_resolved_ok: usize,
    /// Files accepted by the downstream API.
    pub files_submitted_ok: usize,
    /// Whether the run stopped early because the batch cap was hit.
    pub batch_cap_reached: bool,
}

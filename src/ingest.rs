//! Orchestration of one ingestion run: enumerate source folders, diff
//! each against the downstream record, resolve and submit what is
//! missing, and stop once the batch cap is reached.
//!
//! # Failure semantics
//! - Folder enumeration failing is fatal: without the folder list there
//!   is nothing to process.
//! - A folder whose listings cannot be collected contributes zero
//!   candidates; the run continues with the next folder.
//! - A file whose resolution or submission fails is logged and skipped;
//!   no single bad file can abort a run.
//!
//! # Batch cap
//! The cap is checked once per folder and again per file, which bounds
//! per-file work to `max_files` attempts while still paying one cheap
//! listing round-trip per folder already visited. Counters live in a
//! [`RunState`] owned by the invocation, so nothing is shared between
//! runs.
//!
//! Processing is strictly sequential: every collaborator call is
//! awaited before the next starts, and the folder/item orders are
//! whatever the listing and the set iteration hand out.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{error, info};

use crate::api::IngestionApiClient;
use crate::error::StorageError;
use crate::filter::filter;
use crate::model::{RunSummary, SourceItem};
use crate::resolve::MetadataResolver;
use crate::storage::SourceStorageClient;

/// Per-invocation counter state, folded into the [`RunSummary`] at the
/// end of the run.
#[derive(Debug, Default)]
struct RunState {
    attempted: usize,
    resolved_ok: usize,
    submitted_ok: usize,
}

/// Drives the end-to-end ingestion run against the three collaborators.
pub struct Ingestor<S, A, R> {
    storage: Arc<S>,
    api: A,
    resolver: R,
    max_files_per_batch: usize,
}

impl<S, A, R> Ingestor<S, A, R>
where
    S: SourceStorageClient,
    A: IngestionApiClient,
    R: MetadataResolver,
{
    pub fn new(storage: Arc<S>, api: A, resolver: R, max_files_per_batch: usize) -> Self {
        Self {
            storage,
            api,
            resolver,
            max_files_per_batch,
        }
    }

    /// Run one ingestion batch with the configured default cap.
    pub async fn ingest(&self) -> Result<RunSummary, StorageError> {
        self.ingest_up_to(self.max_files_per_batch).await
    }

    /// Run one ingestion batch attempting at most `max_files` files
    /// across all folders combined. A cap of zero means the run is
    /// immediately capped and attempts nothing; it is not an error.
    ///
    /// Only folder enumeration failure is fatal; everything else is
    /// logged and isolated.
    pub async fn ingest_up_to(&self, max_files: usize) -> Result<RunSummary, StorageError> {
        let mut state = RunState::default();
        info!(max_files, "Ingestion started");

        let folders = self.storage.list_folders().await?;
        info!(count = folders.len(), "Folders found at source");

        for folder in &folders {
            if state.attempted >= max_files {
                break;
            }
            info!(folder = %folder, "Inspecting folder");
            let to_ingest = self.files_to_ingest(folder).await;
            for item in &to_ingest {
                if state.attempted >= max_files {
                    break;
                }
                state.attempted += 1;
                self.resolve_and_submit(folder, item, &mut state).await;
            }
            info!(
                attempted = state.attempted,
                "Running total of files attempted"
            );
        }

        let batch_cap_reached = state.attempted >= max_files;
        if batch_cap_reached {
            info!(max_files, "Batch processing limit reached");
        }
        info!(
            attempted = state.attempted,
            resolved_ok = state.resolved_ok,
            submitted_ok = state.submitted_ok,
            "Ingestion complete"
        );

        Ok(RunSummary {
            files_attempted: state.attempted,
            files_resolved_ok: state.resolved_ok,
            files_submitted_ok: state.submitted_ok,
            batch_cap_reached,
        })
    }

    /// Collect both listings for one folder and diff them. Either call
    /// failing means this folder contributes nothing this run.
    async fn files_to_ingest(&self, folder: &str) -> HashSet<SourceItem> {
        let source_set = match self.storage.list_items(folder).await {
            Ok(set) => set,
            Err(e) => {
                error!(folder, error = %e, "Listing source items failed; skipping folder");
                return HashSet::new();
            }
        };
        let ingested_set = match self.api.ingested_filenames(folder).await {
            Ok(set) => set,
            Err(e) => {
                error!(
                    folder,
                    code = e.code,
                    message = %e.message,
                    body = %e.body,
                    "Fetching ingested filenames failed; skipping folder"
                );
                return HashSet::new();
            }
        };
        let to_ingest = filter(&source_set, &ingested_set);
        info!(
            folder,
            source_files = source_set.len(),
            ingested_files = ingested_set.len(),
            to_ingest = to_ingest.len(),
            "Folder diff computed"
        );
        to_ingest
    }

    /// Resolve one file's metadata and submit it, recording the counter
    /// effects. Every failure path ends here, logged with the folder and
    /// filename it belongs to.
    async fn resolve_and_submit(&self, folder: &str, item: &SourceItem, state: &mut RunState) {
        info!(folder, filename = %item.filename, "Resolving file");
        let metadata = match self.resolver.resolve(folder, item).await {
            Ok(metadata) => metadata,
            Err(e) => {
                error!(folder, filename = %item.filename, error = %e, "Metadata resolution failed");
                return;
            }
        };
        state.resolved_ok += 1;

        match self.api.submit(&metadata).await {
            Ok(()) => state.submitted_ok += 1,
            Err(e) => {
                error!(
                    folder,
                    filename = %item.filename,
                    code = e.code,
                    message = %e.message,
                    body = %e.body,
                    "Metadata submission failed"
                );
            }
        }
    }
}

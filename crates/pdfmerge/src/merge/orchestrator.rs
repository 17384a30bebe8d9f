//! Merge orchestration.
//!
//! Fetches the content of every document in a [`MergeRequest`], hands the
//! buffers to the merge primitive in input order, and packages the result as
//! a [`MergedArtifact`]. Any failure aborts the whole invocation; no partial
//! artifact is ever returned.

use futures::{StreamExt, TryStreamExt, stream};
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::config::ConnectorConfig;
use crate::document::{DocumentReference, MergeRequest, MergedArtifact};
use crate::error::{MergeFailure, PdfMergeError};
use crate::merge::{MergeStage, MergedPdf, PdfMerger};
use crate::store::ContentStore;
use crate::utils::format_file_size;

/// Statistics about a merge operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeStatistics {
    /// Number of documents merged.
    pub documents_merged: usize,

    /// Total number of pages in the merged document.
    pub total_pages: usize,

    /// Total size of the fetched content.
    pub input_size: u64,

    /// Size of the merged document.
    pub output_size: u64,

    /// Time taken to fetch all content.
    pub fetch_time: Duration,

    /// Time taken by the merge primitive.
    pub merge_time: Duration,
}

impl MergeStatistics {
    /// Format input size as human-readable string.
    pub fn format_input_size(&self) -> String {
        format_file_size(self.input_size)
    }

    /// Format output size as human-readable string.
    pub fn format_output_size(&self) -> String {
        format_file_size(self.output_size)
    }
}

/// Result of a merge operation.
#[derive(Debug, Clone)]
pub struct MergeResult {
    /// The merged document.
    pub artifact: MergedArtifact,

    /// Statistics about the merge.
    pub statistics: MergeStatistics,
}

/// Orchestrates fetch-then-merge for a validated request.
#[derive(Debug, Clone)]
pub struct MergeOrchestrator {
    merger: PdfMerger,
    deadline: Option<Duration>,
    fetch_concurrency: usize,
}

impl MergeOrchestrator {
    /// Create an orchestrator with default settings: sequential fetches, no
    /// deadline, standard compression.
    pub fn new() -> Self {
        Self {
            merger: PdfMerger::new(),
            deadline: None,
            fetch_concurrency: 1,
        }
    }

    /// Create an orchestrator from a connector configuration.
    pub fn from_config(config: &ConnectorConfig) -> Self {
        Self {
            merger: PdfMerger::new()
                .with_compression(config.compression)
                .with_metadata(config.metadata.clone()),
            deadline: config.deadline(),
            fetch_concurrency: config.fetch_concurrency.max(1),
        }
    }

    /// Set the deadline for a whole invocation.
    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Set how many documents are fetched at once.
    pub fn with_fetch_concurrency(mut self, fetch_concurrency: usize) -> Self {
        self.fetch_concurrency = fetch_concurrency.max(1);
        self
    }

    /// Merge the request's documents into one PDF.
    ///
    /// # Errors
    ///
    /// See [`merge_with_stats`](Self::merge_with_stats).
    pub async fn merge<S>(
        &self,
        request: &MergeRequest,
        store: &S,
    ) -> Result<MergedArtifact, MergeFailure>
    where
        S: ContentStore + ?Sized,
    {
        self.merge_with_stats(request, store)
            .await
            .map(|result| result.artifact)
    }

    /// Merge the request's documents into one PDF and report statistics.
    ///
    /// Documents are fetched in input order (or with bounded concurrency,
    /// reassembled in input order) and merged on a blocking worker.
    ///
    /// # Arguments
    ///
    /// * `request` - Validated merge request
    /// * `store` - Content store holding the documents' bytes
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A fetch fails (the first failure in input order is reported)
    /// - The merge primitive rejects a document
    /// - The deadline expires
    /// - The merge worker dies
    pub async fn merge_with_stats<S>(
        &self,
        request: &MergeRequest,
        store: &S,
    ) -> Result<MergeResult, MergeFailure>
    where
        S: ContentStore + ?Sized,
    {
        let started = Instant::now();

        info!(
            "Merging {} PDF documents into '{}'",
            request.len(),
            request.output_file_name()
        );

        let result = self.run(request, store, started).await;

        match &result {
            Ok(result) => info!(
                documents = result.statistics.documents_merged,
                pages = result.statistics.total_pages,
                size = %result.statistics.format_output_size(),
                "Merged PDF documents into '{}'",
                request.output_file_name()
            ),
            Err(e) => warn!(stage = %e.stage(), "{e}"),
        }

        result
    }

    async fn run<S>(
        &self,
        request: &MergeRequest,
        store: &S,
        started: Instant,
    ) -> Result<MergeResult, MergeFailure>
    where
        S: ContentStore + ?Sized,
    {
        debug!(stage = %MergeStage::Fetching, store = store.name(), "stage transition");
        let buffers = self
            .within_deadline(started, MergeStage::Fetching, self.fetch_all(request, store))
            .await??;
        let fetch_time = started.elapsed();

        let input_size: u64 = buffers.iter().map(|b| b.len() as u64).sum();

        debug!(stage = %MergeStage::Merging, bytes = input_size, "stage transition");
        let merge_started = Instant::now();
        let merged = self
            .within_deadline(started, MergeStage::Merging, self.merge_buffers(buffers))
            .await??
            .map_err(|source| Self::merge_failure(request, source))?;
        let merge_time = merge_started.elapsed();

        debug!(stage = %MergeStage::Completed, "stage transition");

        let statistics = MergeStatistics {
            documents_merged: request.len(),
            total_pages: merged.page_count,
            input_size,
            output_size: merged.bytes.len() as u64,
            fetch_time,
            merge_time,
        };

        Ok(MergeResult {
            artifact: MergedArtifact::pdf(merged.bytes, request.output_file_name()),
            statistics,
        })
    }

    /// Fetch every document's content, returned in input order.
    async fn fetch_all<S>(
        &self,
        request: &MergeRequest,
        store: &S,
    ) -> Result<Vec<Vec<u8>>, MergeFailure>
    where
        S: ContentStore + ?Sized,
    {
        if self.fetch_concurrency <= 1 {
            let mut buffers = Vec::with_capacity(request.len());
            for document in request.documents() {
                buffers.push(Self::fetch_one(store, document).await?);
            }
            return Ok(buffers);
        }

        stream::iter(request.documents())
            .map(|document| Self::fetch_one(store, document))
            .buffered(self.fetch_concurrency)
            .try_collect()
            .await
    }

    async fn fetch_one<S>(store: &S, document: &DocumentReference) -> Result<Vec<u8>, MergeFailure>
    where
        S: ContentStore + ?Sized,
    {
        debug!(document = %document.id, locator = %document.locator, "adding document to merge queue");

        store
            .fetch(&document.locator)
            .await
            .map_err(|source| MergeFailure::FetchFailed {
                document_id: document.id.clone(),
                source,
            })
    }

    /// Run the merge primitive on a blocking worker.
    async fn merge_buffers(
        &self,
        buffers: Vec<Vec<u8>>,
    ) -> Result<Result<MergedPdf, PdfMergeError>, MergeFailure> {
        let merger = self.merger.clone();

        tokio::task::spawn_blocking(move || merger.merge_in_order(&buffers))
            .await
            .map_err(|e| MergeFailure::Aborted {
                reason: format!("merge worker stopped: {e}"),
            })
    }

    /// Await `fut` within what is left of the deadline.
    async fn within_deadline<F, T>(
        &self,
        started: Instant,
        stage: MergeStage,
        fut: F,
    ) -> Result<T, MergeFailure>
    where
        F: Future<Output = T>,
    {
        let Some(deadline) = self.deadline else {
            return Ok(fut.await);
        };

        let remaining = deadline.saturating_sub(started.elapsed());
        tokio::time::timeout(remaining, fut)
            .await
            .map_err(|_| MergeFailure::Timeout { deadline, stage })
    }

    fn merge_failure(request: &MergeRequest, source: PdfMergeError) -> MergeFailure {
        let document = match &source {
            PdfMergeError::Malformed { index, .. } => request
                .documents()
                .get(*index)
                .map(|doc| doc.display_name().to_string()),
            _ => None,
        };

        MergeFailure::MergeMalformed { document, source }
    }
}

impl Default for MergeOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

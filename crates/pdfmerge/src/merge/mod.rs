//! PDF merging operations.
//!
//! This module provides:
//! - The merge primitive ([`PdfMerger`]), which concatenates PDF byte streams
//! - The orchestrator ([`MergeOrchestrator`]), which fetches each document's
//!   content from a store and feeds it to the primitive in input order
//! - Metadata management for the merged document
//!
//! # Examples
//!
//! ```no_run
//! use pdfmerge::document::{DocumentReference, MergeRequest};
//! use pdfmerge::merge::MergeOrchestrator;
//! use pdfmerge::store::DirectoryContentStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let request = MergeRequest::new(
//!     vec![
//!         DocumentReference::pdf("a.pdf", "inbox/a.pdf"),
//!         DocumentReference::pdf("b.pdf", "inbox/b.pdf"),
//!     ],
//!     "merged.pdf",
//! )?;
//!
//! let store = DirectoryContentStore::new("/srv/documents");
//! let result = MergeOrchestrator::new().merge_with_stats(&request, &store).await?;
//! println!("Merged {} pages", result.statistics.total_pages);
//! # Ok(())
//! # }
//! ```

pub mod merger;
pub mod metadata;
pub mod orchestrator;
mod outlines;

pub use merger::{MergedPdf, PdfMerger};
pub use metadata::MetadataManager;
pub use orchestrator::{MergeOrchestrator, MergeResult, MergeStatistics};

use serde::Serialize;
use std::fmt;

/// Stage of a merge invocation.
///
/// ```text
/// NotStarted -> Validating -> Rejected
///                          -> Fetching -> FetchFailed
///                                      -> Merging -> MergeFailed
///                                                 -> Completed
/// Fetching | Merging -> TimedOut
/// ```
///
/// `Rejected`, `FetchFailed`, `MergeFailed`, `TimedOut` and `Completed` are
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeStage {
    /// Nothing has happened yet.
    NotStarted,
    /// Inputs are being checked.
    Validating,
    /// Inputs were rejected.
    Rejected,
    /// Document content is being fetched.
    Fetching,
    /// A fetch failed.
    FetchFailed,
    /// Fetched content is being merged.
    Merging,
    /// The merge primitive failed.
    MergeFailed,
    /// The artifact was produced.
    Completed,
    /// The deadline expired.
    TimedOut,
}

impl MergeStage {
    /// Check if no further transition is possible.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Rejected | Self::FetchFailed | Self::MergeFailed | Self::Completed | Self::TimedOut
        )
    }

    /// Check if the stage is a failure.
    pub fn is_failure(&self) -> bool {
        self.is_terminal() && *self != Self::Completed
    }
}

impl fmt::Display for MergeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NotStarted => "not_started",
            Self::Validating => "validating",
            Self::Rejected => "rejected",
            Self::Fetching => "fetching",
            Self::FetchFailed => "fetch_failed",
            Self::Merging => "merging",
            Self::MergeFailed => "merge_failed",
            Self::Completed => "completed",
            Self::TimedOut => "timed_out",
        };
        f.write_str(name)
    }
}

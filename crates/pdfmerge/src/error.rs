//! Error types for pdfmerge.
//!
//! Errors are split by the phase that produces them:
//!
//! - **Validation Errors**: the connector inputs are malformed. Detected before
//!   any I/O and never retried.
//! - **Store Errors**: the content store could not return a document's bytes.
//! - **PDF Merge Errors**: the merge primitive rejected a byte stream or could
//!   not serialize the result.
//! - **Merge Failures**: execution-time failures as seen by the caller. Each
//!   cause keeps its own variant but renders one combined message.
//!
//! [`ConnectorError`] is the top-level type returned by the connector surface.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crate::merge::MergeStage;

/// Result type alias for pdfmerge operations.
pub type Result<T> = std::result::Result<T, ConnectorError>;

/// Prefix shared by every execution failure message.
pub const MERGE_FAILURE_PREFIX: &str = "Failed to merge PDF documents";

/// Input-shape problems detected by the validator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A mandatory parameter is absent, null, empty or blank.
    #[error("Mandatory parameter '{name}' is missing or empty.")]
    MissingParameter {
        /// Name of the missing parameter.
        name: &'static str,
    },

    /// Fewer documents than a merge needs.
    #[error("At least {required} documents are required to merge, got {found}.")]
    InsufficientDocuments {
        /// Minimum number of documents.
        required: usize,
        /// Number of documents supplied.
        found: usize,
    },

    /// A parameter value has the wrong shape.
    #[error("Invalid value for parameter '{parameter}': {detail}")]
    InvalidInputType {
        /// Name of the offending parameter.
        parameter: &'static str,
        /// Position of the offending entry for list parameters.
        index: Option<usize>,
        /// What was wrong with it.
        detail: String,
    },

    /// A document is neither typed nor named as a PDF.
    #[error("Document '{file_name}' is not a PDF. Only PDF documents can be merged.")]
    NotAPdf {
        /// File name of the offending document (its id when it has none).
        file_name: String,
    },
}

/// Errors raised by a content store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No content is stored under the locator.
    #[error("document content not found: {locator}")]
    NotFound {
        /// Locator that was requested.
        locator: String,
    },

    /// The locator cannot be used with this store.
    #[error("invalid content locator '{locator}': {reason}")]
    InvalidLocator {
        /// Locator that was requested.
        locator: String,
        /// Why it was refused.
        reason: String,
    },

    /// Reading the content failed.
    #[error("failed to read content '{locator}': {source}")]
    Io {
        /// Locator that was requested.
        locator: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    /// Create a NotFound error.
    pub fn not_found(locator: impl Into<String>) -> Self {
        Self::NotFound {
            locator: locator.into(),
        }
    }

    /// Create an InvalidLocator error.
    pub fn invalid_locator(locator: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidLocator {
            locator: locator.into(),
            reason: reason.into(),
        }
    }

    /// Check if the error means the content does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Errors raised by the PDF merge primitive.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PdfMergeError {
    /// A source byte stream is not a usable PDF.
    #[error("document #{} is not a valid PDF: {reason}", .index + 1)]
    Malformed {
        /// Zero-based position of the source in the merge order.
        index: usize,
        /// What the parser reported.
        reason: String,
    },

    /// Nothing to merge.
    #[error("no PDF documents to merge")]
    NoSources,

    /// The merged document could not be serialized.
    #[error("failed to write merged PDF: {reason}")]
    Write {
        /// What the writer reported.
        reason: String,
    },
}

impl PdfMergeError {
    /// Create a Malformed error.
    pub fn malformed(index: usize, reason: impl Into<String>) -> Self {
        Self::Malformed {
            index,
            reason: reason.into(),
        }
    }
}

/// Execution failure of a merge, wrapping the underlying cause.
///
/// No variant ever comes with a partial artifact.
#[derive(Debug, thiserror::Error)]
pub enum MergeFailure {
    /// Fetching a document's content failed.
    #[error("Failed to merge PDF documents: {source}")]
    FetchFailed {
        /// Id of the document whose fetch failed.
        document_id: String,
        /// Store error.
        #[source]
        source: StoreError,
    },

    /// The merge primitive rejected the fetched content.
    #[error("Failed to merge PDF documents: {source}")]
    MergeMalformed {
        /// File name (or id) of the rejected document, when one is to blame.
        document: Option<String>,
        /// Merge primitive error.
        #[source]
        source: PdfMergeError,
    },

    /// The deadline expired before the merge completed.
    #[error("Failed to merge PDF documents: operation exceeded its deadline of {}ms", .deadline.as_millis())]
    Timeout {
        /// Configured deadline.
        deadline: Duration,
        /// Stage that was running when the deadline hit.
        stage: MergeStage,
    },

    /// The merge worker stopped before producing a result.
    #[error("Failed to merge PDF documents: {reason}")]
    Aborted {
        /// What happened to the worker.
        reason: String,
    },
}

impl MergeFailure {
    /// Terminal stage of the merge state machine for this failure.
    pub fn stage(&self) -> MergeStage {
        match self {
            Self::FetchFailed { .. } => MergeStage::FetchFailed,
            Self::MergeMalformed { .. } | Self::Aborted { .. } => MergeStage::MergeFailed,
            Self::Timeout { .. } => MergeStage::TimedOut,
        }
    }
}

/// Top-level error type of the connector.
#[derive(Debug, thiserror::Error)]
pub enum ConnectorError {
    /// The inputs were rejected before execution.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Execution failed.
    #[error(transparent)]
    Execution(#[from] MergeFailure),

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// The artifact would overwrite an existing file.
    #[error("Output file already exists: {}\n  Use --force to overwrite or choose a different output directory", .path.display())]
    OutputExists {
        /// Path of the existing file.
        path: PathBuf,
    },

    /// Writing the artifact failed.
    #[error("Failed to write output file: {}\n  Reason: {source}", .path.display())]
    FailedToWrite {
        /// Path being written to.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl ConnectorError {
    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Check if the error was raised before any I/O happened.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Terminal stage of the merge state machine, for validation and
    /// execution errors.
    pub fn stage(&self) -> Option<MergeStage> {
        match self {
            Self::Validation(_) => Some(MergeStage::Rejected),
            Self::Execution(failure) => Some(failure.stage()),
            _ => None,
        }
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Execution(MergeFailure::FetchFailed { .. }) => 3,
            Self::Execution(MergeFailure::MergeMalformed { .. }) => 7,
            Self::Execution(MergeFailure::Timeout { .. }) => 124,
            Self::Execution(MergeFailure::Aborted { .. }) => 6,
            Self::InvalidConfig { .. } => 1,
            Self::OutputExists { .. } => 4,
            Self::FailedToWrite { .. } | Self::Io(_) => 5,
        }
    }
}

//! The merge connector.
//!
//! [`MergePdfConnector`] is what the process engine talks to. It takes a
//! parameter map with two inputs, `documents` and `outputFileName`, and
//! produces one output, `mergedDocument`. Validation always runs first and
//! never touches the content store.

use tracing::{debug, warn};

use crate::config::ConnectorConfig;
use crate::document::{MergeRequest, MergedArtifact};
use crate::error::Result;
use crate::merge::{MergeOrchestrator, MergeStage, MergeStatistics};
use crate::store::ContentStore;
use crate::validation::{InputParameters, Validator};

/// Name of the input holding the documents to merge.
pub const DOCUMENTS_INPUT: &str = "documents";

/// Name of the input holding the merged document's file name.
pub const OUTPUT_FILE_NAME_INPUT: &str = "outputFileName";

/// Name of the output holding the merged document.
pub const MERGED_DOCUMENT_OUTPUT: &str = "mergedDocument";

/// Outputs of a successful execution.
#[derive(Debug, Clone)]
pub struct ConnectorOutputs {
    merged_document: MergedArtifact,
    statistics: MergeStatistics,
}

impl ConnectorOutputs {
    /// Look up an output by name.
    pub fn output(&self, name: &str) -> Option<&MergedArtifact> {
        (name == MERGED_DOCUMENT_OUTPUT).then_some(&self.merged_document)
    }

    /// The merged document.
    pub fn merged_document(&self) -> &MergedArtifact {
        &self.merged_document
    }

    /// Statistics about the merge.
    pub fn statistics(&self) -> &MergeStatistics {
        &self.statistics
    }

    /// Consume the outputs, keeping the merged document.
    pub fn into_merged_document(self) -> MergedArtifact {
        self.merged_document
    }
}

/// Connector that merges PDF documents from a content store.
///
/// # Examples
///
/// ```
/// use pdfmerge::connector::{MergePdfConnector, DOCUMENTS_INPUT, OUTPUT_FILE_NAME_INPUT};
/// use pdfmerge::store::MemoryContentStore;
/// use pdfmerge::validation::InputParameters;
/// use serde_json::json;
///
/// let connector = MergePdfConnector::new(MemoryContentStore::new());
/// let params = InputParameters::new()
///     .with(DOCUMENTS_INPUT, json!([{"id": "d1", "fileName": "a.pdf", "locator": "a"}]))
///     .with(OUTPUT_FILE_NAME_INPUT, "merged.pdf");
///
/// let err = connector.validate_input_parameters(&params).unwrap_err();
/// assert!(err.is_validation());
/// ```
#[derive(Debug)]
pub struct MergePdfConnector<S> {
    store: S,
    validator: Validator,
    orchestrator: MergeOrchestrator,
}

impl<S: ContentStore> MergePdfConnector<S> {
    /// Create a connector with the default configuration.
    pub fn new(store: S) -> Self {
        Self {
            store,
            validator: Validator::new(),
            orchestrator: MergeOrchestrator::new(),
        }
    }

    /// Create a connector with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn with_config(store: S, config: &ConnectorConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            store,
            validator: Validator::new(),
            orchestrator: MergeOrchestrator::from_config(config),
        })
    }

    /// The content store documents are fetched from.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Check the inputs without performing any I/O.
    ///
    /// # Errors
    ///
    /// Returns a validation error describing the first problem found.
    pub fn validate_input_parameters(&self, params: &InputParameters) -> Result<MergeRequest> {
        debug!(stage = %MergeStage::Validating, "stage transition");

        self.validator.validate(params).map_err(|e| {
            warn!(stage = %MergeStage::Rejected, "{e}");
            e.into()
        })
    }

    /// Validate the inputs, then fetch and merge the documents.
    ///
    /// # Errors
    ///
    /// Returns a validation error before any fetch happens, or an execution
    /// failure whose message starts with "Failed to merge PDF documents: ".
    pub async fn execute(&self, params: &InputParameters) -> Result<ConnectorOutputs> {
        let request = self.validate_input_parameters(params)?;
        self.execute_request(&request).await
    }

    /// Fetch and merge the documents of an already validated request.
    ///
    /// # Errors
    ///
    /// Returns an execution failure wrapping the cause.
    pub async fn execute_request(&self, request: &MergeRequest) -> Result<ConnectorOutputs> {
        let result = self
            .orchestrator
            .merge_with_stats(request, &self.store)
            .await?;

        Ok(ConnectorOutputs {
            merged_document: result.artifact,
            statistics: result.statistics,
        })
    }
}

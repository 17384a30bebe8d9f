//! Document references, merge requests and merged artifacts.
//!
//! A [`MergeRequest`] can only be obtained through validation, so holding one
//! proves the inputs satisfy every invariant the orchestrator relies on.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::validation;

/// MIME type of PDF content, and of every merged artifact.
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Reference to a document held by the content store.
///
/// Field names follow the engine's document model; the short forms are
/// accepted as aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentReference {
    /// Opaque document identifier.
    pub id: String,

    /// File name of the stored content.
    #[serde(default, alias = "contentFileName")]
    pub file_name: Option<String>,

    /// MIME type of the stored content.
    #[serde(default, alias = "contentMimeType")]
    pub mime_type: Option<String>,

    /// Content-store key of the document's bytes.
    #[serde(alias = "contentStorageId")]
    pub locator: String,
}

impl DocumentReference {
    /// Create a reference with a file name and MIME type.
    pub fn new(
        id: impl Into<String>,
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        locator: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            file_name: Some(file_name.into()),
            mime_type: Some(mime_type.into()),
            locator: locator.into(),
        }
    }

    /// Create a PDF reference whose file name doubles as its id.
    pub fn pdf(file_name: impl Into<String>, locator: impl Into<String>) -> Self {
        let file_name = file_name.into();
        Self {
            id: file_name.clone(),
            file_name: Some(file_name),
            mime_type: Some(PDF_MIME_TYPE.to_string()),
            locator: locator.into(),
        }
    }

    /// Check whether the MIME type or the file extension says PDF.
    ///
    /// Both comparisons ignore ASCII case. The MIME type must match exactly
    /// otherwise; surrounding whitespace is not stripped.
    pub fn is_pdf(&self) -> bool {
        let by_mime = self
            .mime_type
            .as_deref()
            .is_some_and(|mime| mime.eq_ignore_ascii_case(PDF_MIME_TYPE));

        let by_name = self
            .file_name
            .as_deref()
            .is_some_and(|name| name.to_ascii_lowercase().ends_with(".pdf"));

        by_mime || by_name
    }

    /// Name used in messages: the file name, or the id when there is none.
    pub fn display_name(&self) -> &str {
        self.file_name.as_deref().unwrap_or(&self.id)
    }
}

/// A validated request to merge documents, in order, into one PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeRequest {
    documents: Vec<DocumentReference>,
    output_file_name: String,
}

impl MergeRequest {
    /// Build a request from typed inputs.
    ///
    /// # Errors
    ///
    /// Returns the first failed check: missing documents, fewer than two
    /// documents, a non-PDF document, or a blank output file name.
    pub fn new(
        documents: Vec<DocumentReference>,
        output_file_name: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let output_file_name = output_file_name.into();

        validation::check_document_count(documents.len())?;
        validation::check_all_pdf(&documents)?;
        validation::check_output_file_name(Some(&output_file_name))?;

        Ok(Self::new_unchecked(documents, output_file_name))
    }

    /// Assemble a request whose parts already passed validation.
    pub(crate) fn new_unchecked(documents: Vec<DocumentReference>, output_file_name: String) -> Self {
        Self {
            documents,
            output_file_name,
        }
    }

    /// Documents to merge, in merge order.
    pub fn documents(&self) -> &[DocumentReference] {
        &self.documents
    }

    /// Requested file name of the merged document, as supplied.
    pub fn output_file_name(&self) -> &str {
        &self.output_file_name
    }

    /// Number of documents in the request.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Always false for a validated request; present for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// The merged document handed back to the caller.
#[derive(Clone, PartialEq, Eq)]
pub struct MergedArtifact {
    content: Vec<u8>,
    mime_type: String,
    file_name: String,
}

impl MergedArtifact {
    /// Wrap merged PDF bytes under the given file name.
    pub fn pdf(content: Vec<u8>, file_name: impl Into<String>) -> Self {
        Self {
            content,
            mime_type: PDF_MIME_TYPE.to_string(),
            file_name: file_name.into(),
        }
    }

    /// Merged PDF bytes.
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Consume the artifact, keeping only its bytes.
    pub fn into_content(self) -> Vec<u8> {
        self.content
    }

    /// MIME type, always `application/pdf`.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// File name of the merged document.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Size of the content in bytes.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Check if the content is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

impl std::fmt::Debug for MergedArtifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MergedArtifact")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.content.len())
            .finish()
    }
}

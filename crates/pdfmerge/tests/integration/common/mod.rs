//! Shared helpers for the integration tests.
//!
//! PDFs come from the crate's test fixtures, one page per marker string, so
//! tests can check page order by extracting each page's text.

use pdfmerge::store::MemoryContentStore;
use pdfmerge::validation::InputParameters;
use serde_json::{Value, json};

pub(crate) use crate::testing::{outline_entries, page_texts, pdf_with_outline, pdf_with_pages};

/// Content that no PDF parser accepts.
pub const NOT_A_PDF: &[u8] = b"This is not a PDF file, just plain text";

/// A document reference in the engine's JSON shape.
pub fn pdf_reference(id: &str, file_name: &str, locator: &str) -> Value {
    json!({
        "id": id,
        "contentFileName": file_name,
        "contentMimeType": "application/pdf",
        "contentStorageId": locator,
    })
}

/// Connector inputs for the given document references.
pub fn merge_params(documents: Vec<Value>, output_file_name: &str) -> InputParameters {
    InputParameters::new()
        .with("documents", documents)
        .with("outputFileName", output_file_name)
}

/// Store holding the two-document scenario: "FIRST" under `storage-1`,
/// "SECOND" under `storage-2`.
pub fn scenario_store() -> MemoryContentStore {
    MemoryContentStore::new()
        .with("storage-1", pdf_with_pages(&["FIRST"]))
        .with("storage-2", pdf_with_pages(&["SECOND"]))
}

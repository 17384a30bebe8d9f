//! pdfmerge - Merge PDF documents from a content store into one document.
//!
//! This library implements a process-engine connector that takes a list of
//! document references and an output file name, fetches each document's
//! content from a content store, and concatenates the PDFs in input order.
//! It provides:
//!
//! - Strict, I/O-free validation of the connector inputs
//! - Ordered fetching with optional bounded concurrency
//! - Page-tree grafting that keeps inherited page attributes intact
//! - An optional deadline for the whole invocation
//! - Atomic persistence of the merged artifact
//!
//! # Examples
//!
//! ## Running the Connector
//!
//! ```no_run
//! use pdfmerge::connector::{MergePdfConnector, MERGED_DOCUMENT_OUTPUT};
//! use pdfmerge::store::DirectoryContentStore;
//! use pdfmerge::validation::InputParameters;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let params = InputParameters::from_json(r#"{
//!     "documents": [
//!         {"id": "d1", "fileName": "a.pdf", "mimeType": "application/pdf", "locator": "a.pdf"},
//!         {"id": "d2", "fileName": "b.pdf", "mimeType": "application/pdf", "locator": "b.pdf"}
//!     ],
//!     "outputFileName": "merged.pdf"
//! }"#)?;
//!
//! let connector = MergePdfConnector::new(DirectoryContentStore::new("/srv/documents"));
//! let outputs = connector.execute(&params).await?;
//! let merged = outputs.output(MERGED_DOCUMENT_OUTPUT).unwrap();
//! println!("{} ({} bytes)", merged.file_name(), merged.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Using Individual Components
//!
//! ```no_run
//! use pdfmerge::merge::PdfMerger;
//!
//! # fn example(a: Vec<u8>, b: Vec<u8>) -> Result<(), Box<dyn std::error::Error>> {
//! let merged = PdfMerger::new().merge_in_order(&[a, b])?;
//! println!("{} pages", merged.page_count);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod connector;
pub mod document;
pub mod error;
pub mod io;
pub mod merge;
pub mod store;
pub mod utils;
pub mod validation;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use config::ConnectorConfig;
pub use connector::{ConnectorOutputs, MergePdfConnector};
pub use document::{DocumentReference, MergeRequest, MergedArtifact};
pub use error::{ConnectorError, MergeFailure, Result, ValidationError};
pub use store::ContentStore;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

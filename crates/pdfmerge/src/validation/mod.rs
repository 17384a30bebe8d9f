//! Input validation for pdfmerge.
//!
//! The engine hands the connector a loosely typed parameter map. This module
//! turns that map into a [`MergeRequest`] or the first [`ValidationError`] it
//! finds. Checks run in a fixed order and stop at the first failure:
//!
//! 1. `documents` is present and non-empty
//! 2. `documents` holds at least [`MIN_DOCUMENTS`] entries
//! 3. every entry is a document reference
//! 4. every document is a PDF (by MIME type or file extension)
//! 5. `outputFileName` is present and not blank
//!
//! Validation is pure: it never touches the content store.
//!
//! # Examples
//!
//! ```
//! use pdfmerge::validation::{InputParameters, Validator};
//! use serde_json::json;
//!
//! let params = InputParameters::new()
//!     .with("documents", json!([
//!         {"id": "d1", "fileName": "a.pdf", "locator": "a"},
//!         {"id": "d2", "fileName": "b.pdf", "locator": "b"},
//!     ]))
//!     .with("outputFileName", "merged.pdf");
//!
//! let request = Validator::new().validate(&params).unwrap();
//! assert_eq!(request.len(), 2);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::connector::{DOCUMENTS_INPUT, OUTPUT_FILE_NAME_INPUT};
use crate::document::{DocumentReference, MergeRequest};
use crate::error::{ConnectorError, ValidationError};

/// Minimum number of documents a merge accepts.
pub const MIN_DOCUMENTS: usize = 2;

/// Named input parameters, as supplied by the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputParameters(Map<String, Value>);

impl InputParameters {
    /// Create an empty parameter map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Set a parameter, returning the previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(name.into(), value.into())
    }

    /// Get a parameter value.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Parse a JSON object of parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not JSON or not a JSON object.
    pub fn from_json(text: &str) -> Result<Self, ConnectorError> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| ConnectorError::invalid_config(format!("Invalid parameter file: {e}")))?;

        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(ConnectorError::invalid_config(format!(
                "Parameter file must hold a JSON object, found {}",
                json_kind(&other)
            ))),
        }
    }
}

impl From<Map<String, Value>> for InputParameters {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Validator for connector input parameters.
#[derive(Debug, Clone, Default)]
pub struct Validator;

impl Validator {
    /// Create a new validator.
    pub fn new() -> Self {
        Self
    }

    /// Validate the parameters and build a merge request from them.
    ///
    /// # Errors
    ///
    /// Returns the first failed check, in the order listed in the module
    /// documentation.
    pub fn validate(&self, params: &InputParameters) -> Result<MergeRequest, ValidationError> {
        let entries = document_entries(params.get(DOCUMENTS_INPUT))?;
        check_document_count(entries.len())?;

        let documents = parse_documents(entries)?;
        check_all_pdf(&documents)?;

        let output_file_name = output_file_name(params.get(OUTPUT_FILE_NAME_INPUT))?;
        check_output_file_name(Some(&output_file_name))?;

        debug!(
            documents = documents.len(),
            output = %output_file_name,
            "input parameters validated"
        );

        Ok(MergeRequest::new_unchecked(documents, output_file_name))
    }
}

/// Check the number of documents: zero is missing, one is insufficient.
pub(crate) fn check_document_count(count: usize) -> Result<(), ValidationError> {
    if count == 0 {
        return Err(ValidationError::MissingParameter {
            name: DOCUMENTS_INPUT,
        });
    }

    if count < MIN_DOCUMENTS {
        return Err(ValidationError::InsufficientDocuments {
            required: MIN_DOCUMENTS,
            found: count,
        });
    }

    Ok(())
}

/// Check that every document is a PDF, reporting the first that is not.
pub(crate) fn check_all_pdf(documents: &[DocumentReference]) -> Result<(), ValidationError> {
    match documents.iter().find(|doc| !doc.is_pdf()) {
        Some(doc) => Err(ValidationError::NotAPdf {
            file_name: doc.display_name().to_string(),
        }),
        None => Ok(()),
    }
}

/// Check that the output file name is present and not blank.
pub(crate) fn check_output_file_name(name: Option<&str>) -> Result<(), ValidationError> {
    match name {
        Some(name) if !name.trim().is_empty() => Ok(()),
        _ => Err(ValidationError::MissingParameter {
            name: OUTPUT_FILE_NAME_INPUT,
        }),
    }
}

fn document_entries(value: Option<&Value>) -> Result<&[Value], ValidationError> {
    match value {
        None | Some(Value::Null) => Err(ValidationError::MissingParameter {
            name: DOCUMENTS_INPUT,
        }),
        Some(Value::Array(entries)) => Ok(entries),
        Some(other) => Err(ValidationError::InvalidInputType {
            parameter: DOCUMENTS_INPUT,
            index: None,
            detail: format!("expected a list of documents, found {}", json_kind(other)),
        }),
    }
}

fn parse_documents(entries: &[Value]) -> Result<Vec<DocumentReference>, ValidationError> {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            DocumentReference::deserialize(entry).map_err(|e| {
                ValidationError::InvalidInputType {
                    parameter: DOCUMENTS_INPUT,
                    index: Some(index),
                    detail: format!(
                        "all items in the documents list must be documents; item {index} is not: {e}"
                    ),
                }
            })
        })
        .collect()
}

fn output_file_name(value: Option<&Value>) -> Result<String, ValidationError> {
    match value {
        None | Some(Value::Null) => Err(ValidationError::MissingParameter {
            name: OUTPUT_FILE_NAME_INPUT,
        }),
        Some(Value::String(name)) => Ok(name.clone()),
        Some(other) => Err(ValidationError::InvalidInputType {
            parameter: OUTPUT_FILE_NAME_INPUT,
            index: None,
            detail: format!("expected a string, found {}", json_kind(other)),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

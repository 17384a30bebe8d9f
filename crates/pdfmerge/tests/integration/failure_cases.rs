//! Integration tests for rejected inputs and failed executions.

use async_trait::async_trait;
use pdfmerge::config::ConnectorConfig;
use pdfmerge::connector::MergePdfConnector;
use pdfmerge::error::{
    ConnectorError, MERGE_FAILURE_PREFIX, MergeFailure, PdfMergeError, StoreError, ValidationError,
};
use pdfmerge::merge::MergeStage;
use pdfmerge::store::{ContentStore, MemoryContentStore};
use pdfmerge::validation::InputParameters;
use serde_json::json;
use std::time::Duration;

use crate::common::{NOT_A_PDF, merge_params, pdf_reference, pdf_with_pages, scenario_store};

/// Store that takes longer than any deadline used here.
struct SlowStore;

#[async_trait]
impl ContentStore for SlowStore {
    fn name(&self) -> &'static str {
        "slow"
    }

    async fn fetch(&self, _locator: &str) -> Result<Vec<u8>, StoreError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(pdf_with_pages(&["LATE"]))
    }
}

#[tokio::test]
async fn test_single_document_is_rejected_without_fetching() {
    let connector = MergePdfConnector::new(scenario_store());
    let params = merge_params(
        vec![pdf_reference("d1", "first.pdf", "storage-1")],
        "merged.pdf",
    );

    let err = connector.execute(&params).await.unwrap_err();

    assert!(matches!(
        err,
        ConnectorError::Validation(ValidationError::InsufficientDocuments {
            required: 2,
            found: 1
        })
    ));
    assert!(connector.store().requests().is_empty());
    assert_eq!(err.exit_code(), 2);
}

#[tokio::test]
async fn test_non_pdf_document_is_named() {
    let connector = MergePdfConnector::new(scenario_store());
    let params = merge_params(
        vec![
            pdf_reference("d1", "first.pdf", "storage-1"),
            json!({
                "id": "d3",
                "contentFileName": "notes.txt",
                "contentMimeType": "text/plain",
                "contentStorageId": "storage-3",
            }),
        ],
        "merged.pdf",
    );

    let err = connector.execute(&params).await.unwrap_err();

    match err {
        ConnectorError::Validation(ValidationError::NotAPdf { file_name }) => {
            assert_eq!(file_name, "notes.txt");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(connector.store().requests().is_empty());
}

#[tokio::test]
async fn test_blank_output_file_name() {
    let connector = MergePdfConnector::new(scenario_store());
    let params = merge_params(
        vec![
            pdf_reference("d1", "first.pdf", "storage-1"),
            pdf_reference("d2", "second.pdf", "storage-2"),
        ],
        "   ",
    );

    let err = connector.validate_input_parameters(&params).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Mandatory parameter 'outputFileName' is missing or empty."
    );
}

#[tokio::test]
async fn test_missing_documents_parameter() {
    let connector = MergePdfConnector::new(scenario_store());
    let params = InputParameters::new().with("outputFileName", "merged.pdf");

    let err = connector.execute(&params).await.unwrap_err();
    assert!(matches!(
        err,
        ConnectorError::Validation(ValidationError::MissingParameter { name: "documents" })
    ));
}

#[tokio::test]
async fn test_fetch_failure_after_successful_fetch() {
    let connector = MergePdfConnector::new(scenario_store());
    let params = merge_params(
        vec![
            pdf_reference("d1", "first.pdf", "storage-1"),
            pdf_reference("d2", "second.pdf", "invalid-storage-id"),
        ],
        "merged.pdf",
    );

    let err = connector.execute(&params).await.unwrap_err();

    assert!(err.to_string().starts_with(MERGE_FAILURE_PREFIX));
    assert!(err.to_string().contains("invalid-storage-id"));
    assert_eq!(err.stage(), Some(MergeStage::FetchFailed));
    assert_eq!(err.exit_code(), 3);
    match err {
        ConnectorError::Execution(MergeFailure::FetchFailed {
            document_id,
            source,
        }) => {
            assert_eq!(document_id, "d2");
            assert!(source.is_not_found());
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(
        connector.store().requests(),
        vec!["storage-1", "invalid-storage-id"]
    );
}

#[tokio::test]
async fn test_concurrent_fetch_reports_first_failure_in_order() {
    let store = MemoryContentStore::new().with("ok", pdf_with_pages(&["OK"]));
    let config = ConnectorConfig {
        fetch_concurrency: 3,
        ..Default::default()
    };
    let connector = MergePdfConnector::with_config(store, &config).unwrap();
    let params = merge_params(
        vec![
            pdf_reference("d1", "ok.pdf", "ok"),
            pdf_reference("d2", "gone.pdf", "gone-1"),
            pdf_reference("d3", "gone.pdf", "gone-2"),
        ],
        "merged.pdf",
    );

    let err = connector.execute(&params).await.unwrap_err();
    match err {
        ConnectorError::Execution(MergeFailure::FetchFailed { document_id, .. }) => {
            assert_eq!(document_id, "d2");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_invalid_pdf_content() {
    let store = scenario_store().with("storage-3", NOT_A_PDF.to_vec());
    let connector = MergePdfConnector::new(store);
    let params = merge_params(
        vec![
            pdf_reference("d1", "first.pdf", "storage-1"),
            pdf_reference("d3", "broken.pdf", "storage-3"),
        ],
        "merged.pdf",
    );

    let err = connector.execute(&params).await.unwrap_err();

    assert!(err.to_string().starts_with(MERGE_FAILURE_PREFIX));
    assert_eq!(err.stage(), Some(MergeStage::MergeFailed));
    match err {
        ConnectorError::Execution(MergeFailure::MergeMalformed { document, source }) => {
            assert_eq!(document.as_deref(), Some("broken.pdf"));
            assert!(matches!(source, PdfMergeError::Malformed { index: 1, .. }));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_deadline_exceeded() {
    let config = ConnectorConfig {
        deadline_ms: Some(50),
        ..Default::default()
    };
    let connector = MergePdfConnector::with_config(SlowStore, &config).unwrap();
    let params = merge_params(
        vec![
            pdf_reference("d1", "first.pdf", "storage-1"),
            pdf_reference("d2", "second.pdf", "storage-2"),
        ],
        "merged.pdf",
    );

    let err = connector.execute(&params).await.unwrap_err();

    assert!(matches!(
        err,
        ConnectorError::Execution(MergeFailure::Timeout {
            stage: MergeStage::Fetching,
            ..
        })
    ));
    assert_eq!(err.stage(), Some(MergeStage::TimedOut));
    assert_eq!(err.exit_code(), 124);
    assert!(err.to_string().contains("50ms"));
}

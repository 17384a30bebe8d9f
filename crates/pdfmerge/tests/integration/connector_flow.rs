//! End-to-end connector runs that succeed.

use pdfmerge::config::{CompressionLevel, ConnectorConfig, Metadata};
use pdfmerge::connector::{MERGED_DOCUMENT_OUTPUT, MergePdfConnector};
use pdfmerge::merge::MetadataManager;
use pdfmerge::store::{DirectoryContentStore, MemoryContentStore};
use rstest::rstest;
use tempfile::TempDir;

use crate::common::{
    merge_params, outline_entries, page_texts, pdf_reference, pdf_with_outline, pdf_with_pages,
    scenario_store,
};

#[tokio::test]
async fn test_merge_two_documents() {
    let connector = MergePdfConnector::new(scenario_store());
    let params = merge_params(
        vec![
            pdf_reference("d1", "first.pdf", "storage-1"),
            pdf_reference("d2", "second.pdf", "storage-2"),
        ],
        "merged.pdf",
    );

    let outputs = connector.execute(&params).await.unwrap();
    let merged = outputs.output(MERGED_DOCUMENT_OUTPUT).unwrap();

    assert_eq!(merged.file_name(), "merged.pdf");
    assert_eq!(merged.mime_type(), "application/pdf");
    assert_eq!(page_texts(merged.content()), vec!["FIRST", "SECOND"]);
    assert_eq!(
        connector.store().requests(),
        vec!["storage-1", "storage-2"]
    );
}

#[tokio::test]
async fn test_merge_reversed_order() {
    let connector = MergePdfConnector::new(scenario_store());
    let params = merge_params(
        vec![
            pdf_reference("d2", "second.pdf", "storage-2"),
            pdf_reference("d1", "first.pdf", "storage-1"),
        ],
        "reversed.pdf",
    );

    let outputs = connector.execute(&params).await.unwrap();
    assert_eq!(
        page_texts(outputs.merged_document().content()),
        vec!["SECOND", "FIRST"]
    );
}

#[rstest]
#[case::sequential(1)]
#[case::concurrent(4)]
#[tokio::test]
async fn test_page_counts_add_up(#[case] fetch_concurrency: usize) {
    let store = MemoryContentStore::new()
        .with("one", pdf_with_pages(&["1a"]))
        .with("two", pdf_with_pages(&["2a", "2b"]))
        .with("three", pdf_with_pages(&["3a", "3b", "3c"]));

    let config = ConnectorConfig {
        fetch_concurrency,
        ..Default::default()
    };
    let connector = MergePdfConnector::with_config(store, &config).unwrap();

    let params = merge_params(
        vec![
            pdf_reference("d1", "one.pdf", "one"),
            pdf_reference("d2", "two.pdf", "two"),
            pdf_reference("d3", "three.pdf", "three"),
        ],
        "bundle.pdf",
    );

    let outputs = connector.execute(&params).await.unwrap();
    assert_eq!(outputs.statistics().total_pages, 6);
    assert_eq!(
        page_texts(outputs.merged_document().content()),
        vec!["1a", "2a", "2b", "3a", "3b", "3c"]
    );
}

#[tokio::test]
async fn test_output_file_name_kept_as_supplied() {
    let connector = MergePdfConnector::new(scenario_store());
    let params = merge_params(
        vec![
            pdf_reference("d1", "first.pdf", "storage-1"),
            pdf_reference("d2", "second.pdf", "storage-2"),
        ],
        "  Quarterly Report.pdf",
    );

    let outputs = connector.execute(&params).await.unwrap();
    assert_eq!(
        outputs.merged_document().file_name(),
        "  Quarterly Report.pdf"
    );
}

#[tokio::test]
async fn test_metadata_and_compression_from_config() {
    let config = ConnectorConfig {
        compression: CompressionLevel::None,
        metadata: Metadata::new(
            Some("Board Pack".to_string()),
            Some("Records Office".to_string()),
            None,
            None,
        ),
        ..Default::default()
    };
    let connector = MergePdfConnector::with_config(scenario_store(), &config).unwrap();
    let params = merge_params(
        vec![
            pdf_reference("d1", "first.pdf", "storage-1"),
            pdf_reference("d2", "second.pdf", "storage-2"),
        ],
        "merged.pdf",
    );

    let outputs = connector.execute(&params).await.unwrap();
    let doc = lopdf::Document::load_mem(outputs.merged_document().content()).unwrap();
    let metadata = MetadataManager::new().get_metadata(&doc);

    assert_eq!(metadata.title.as_deref(), Some("Board Pack"));
    assert_eq!(metadata.author.as_deref(), Some("Records Office"));
}

#[tokio::test]
async fn test_merge_from_directory_store() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join("inbox")).unwrap();
    std::fs::write(dir.path().join("inbox/a.pdf"), pdf_with_pages(&["ALPHA"])).unwrap();
    std::fs::write(dir.path().join("b.pdf"), pdf_with_pages(&["BETA"])).unwrap();

    let connector = MergePdfConnector::new(DirectoryContentStore::new(dir.path()));
    let params = merge_params(
        vec![
            pdf_reference("a", "a.pdf", "inbox/a.pdf"),
            pdf_reference("b", "b.pdf", "b.pdf"),
        ],
        "merged.pdf",
    );

    let outputs = connector.execute(&params).await.unwrap();
    assert_eq!(
        page_texts(outputs.merged_document().content()),
        vec!["ALPHA", "BETA"]
    );
}

#[tokio::test]
async fn test_source_bookmarks_survive_the_merge() {
    let store = MemoryContentStore::new()
        .with("minutes", pdf_with_outline(&["M-1", "M-2"], &[("Minutes", 0), ("Actions", 1)]))
        .with("budget", pdf_with_outline(&["B-1"], &[("Budget", 0)]));
    let connector = MergePdfConnector::new(store);
    let params = merge_params(
        vec![
            pdf_reference("m", "minutes.pdf", "minutes"),
            pdf_reference("b", "budget.pdf", "budget"),
        ],
        "board-pack.pdf",
    );

    let outputs = connector.execute(&params).await.unwrap();
    let entries = outline_entries(outputs.merged_document().content());

    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0], ("Minutes".to_string(), "M-1".to_string()));
    assert_eq!(entries[1], ("Actions".to_string(), "M-2".to_string()));
    assert_eq!(entries[2], ("Budget".to_string(), "B-1".to_string()));
}

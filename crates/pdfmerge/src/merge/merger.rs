//! PDF merge primitive.
//!
//! Concatenates PDF byte streams with `lopdf`. Each source keeps its own page
//! tree: the trees are grafted, in input order, under a new root node, so
//! attributes that pages inherit from their tree (resources, media box,
//! rotation) stay attached to the right pages. Source outlines are kept and
//! chained under one outline root.

use lopdf::{Document, Object, ObjectId, dictionary};
use tracing::debug;

use crate::config::{CompressionLevel, Metadata};
use crate::error::PdfMergeError;
use crate::merge::metadata::MetadataManager;
use crate::merge::outlines::OutlineMerger;

/// PDF version written when every source is older.
const MIN_OUTPUT_VERSION: &str = "1.5";

/// A merged PDF document, serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedPdf {
    /// Serialized document.
    pub bytes: Vec<u8>,

    /// Total number of pages.
    pub page_count: usize,

    /// PDF version of the output.
    pub version: String,
}

/// A parsed source, ready to be grafted.
struct Source {
    document: Document,
    page_count: usize,
}

/// PDF merger that concatenates documents in order.
#[derive(Debug, Clone, Default)]
pub struct PdfMerger {
    compression: CompressionLevel,
    metadata: Metadata,
    metadata_manager: MetadataManager,
}

impl PdfMerger {
    /// Create a new merger with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the compression level of the output.
    pub fn with_compression(mut self, compression: CompressionLevel) -> Self {
        self.compression = compression;
        self
    }

    /// Set the metadata written to the output.
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Merge PDF byte streams into one document, in the given order.
    ///
    /// # Arguments
    ///
    /// * `sources` - Serialized PDFs, in merge order
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `sources` is empty
    /// - A source cannot be parsed, is still encrypted, or has no pages
    /// - The merged document cannot be serialized
    pub fn merge_in_order<B: AsRef<[u8]>>(&self, sources: &[B]) -> Result<MergedPdf, PdfMergeError> {
        if sources.is_empty() {
            return Err(PdfMergeError::NoSources);
        }

        let mut merged = Document::with_version(MIN_OUTPUT_VERSION);
        let mut kids = Vec::with_capacity(sources.len());
        let mut outlines = OutlineMerger::new();
        let mut total_pages = 0;
        let mut next_id = 1;

        for (index, bytes) in sources.iter().enumerate() {
            let Source {
                mut document,
                page_count,
            } = Self::load_source(index, bytes.as_ref())?;

            // Shift ids past everything merged so far.
            document.renumber_objects_with(next_id);
            next_id = document.max_id + 1;

            let (catalog, pages_root) = Self::page_tree_root(&document, index)?;
            outlines.collect(&document, catalog);
            document.objects.remove(&catalog);

            if version_key(&document.version) > version_key(&merged.version) {
                merged.version = document.version.clone();
            }

            debug!(index, pages = page_count, "grafting source page tree");

            merged.objects.extend(document.objects);
            kids.push(pages_root);
            total_pages += page_count;
        }

        merged.max_id = next_id - 1;
        let pages_id = merged.new_object_id();

        for kid in &kids {
            if let Ok(Object::Dictionary(node)) = merged.get_object_mut(*kid) {
                node.set("Parent", pages_id);
            }
        }

        merged.objects.insert(
            pages_id,
            dictionary! {
                "Type" => "Pages",
                "Kids" => kids.iter().copied().map(Object::Reference).collect::<Vec<_>>(),
                "Count" => total_pages as i64,
            }
            .into(),
        );

        let catalog_id = merged.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        merged.trailer.set("Root", catalog_id);

        let outline_items = outlines.len();
        if outlines.attach(&mut merged, catalog_id).is_some() {
            debug!(items = outline_items, "carried over source outlines");
        }

        self.metadata_manager.set_metadata(&mut merged, &self.metadata);

        merged.prune_objects();
        merged.renumber_objects();

        if self.compression == CompressionLevel::Standard {
            merged.compress();
        }

        let mut bytes = Vec::new();
        merged.save_to(&mut bytes).map_err(|e| PdfMergeError::Write {
            reason: e.to_string(),
        })?;

        Ok(MergedPdf {
            bytes,
            page_count: total_pages,
            version: merged.version,
        })
    }

    /// Parse one source and locate its page tree.
    fn load_source(index: usize, bytes: &[u8]) -> Result<Source, PdfMergeError> {
        let document =
            Document::load_mem(bytes).map_err(|e| PdfMergeError::malformed(index, e.to_string()))?;

        if document.is_encrypted() {
            return Err(PdfMergeError::malformed(index, "document is encrypted"));
        }

        let (_, pages_root) = Self::page_tree_root(&document, index)?;
        if document.get_dictionary(pages_root).is_err() {
            return Err(PdfMergeError::malformed(index, "page tree root is not a dictionary"));
        }

        let page_count = document.get_pages().len();
        if page_count == 0 {
            return Err(PdfMergeError::malformed(index, "document has no pages"));
        }

        Ok(Source {
            document,
            page_count,
        })
    }

    /// Ids of a document's catalog and page tree root.
    fn page_tree_root(
        document: &Document,
        index: usize,
    ) -> Result<(ObjectId, ObjectId), PdfMergeError> {
        let catalog = document
            .trailer
            .get(b"Root")
            .and_then(Object::as_reference)
            .map_err(|_| PdfMergeError::malformed(index, "document has no catalog"))?;

        let pages_root = document
            .get_dictionary(catalog)
            .and_then(|catalog| catalog.get(b"Pages"))
            .and_then(Object::as_reference)
            .map_err(|_| PdfMergeError::malformed(index, "document has no page tree"))?;

        Ok((catalog, pages_root))
    }
}

/// Order PDF versions numerically ("1.10" after "1.9").
fn version_key(version: &str) -> (u32, u32) {
    let mut parts = version.trim().splitn(2, '.');
    let major = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
    let minor = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
    (major, minor)
}

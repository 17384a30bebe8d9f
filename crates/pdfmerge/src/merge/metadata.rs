//! PDF metadata management.
//!
//! Writes the merged document's Info dictionary: title, author, subject and
//! keywords when configured, and always the producer and dates.

use chrono::{DateTime, Utc};
use lopdf::{Dictionary, Document, Object, StringFormat};

use crate::config::Metadata;

/// Producer recorded in every merged document.
pub const PRODUCER: &str = concat!("pdfmerge ", env!("CARGO_PKG_VERSION"));

/// Manager for PDF metadata.
#[derive(Debug, Clone, Default)]
pub struct MetadataManager;

impl MetadataManager {
    /// Create a new metadata manager.
    pub fn new() -> Self {
        Self
    }

    /// Set metadata on a document.
    ///
    /// Creates the Info dictionary if the document has none. Only the fields
    /// present in `metadata` are written; the producer and the creation and
    /// modification dates are always written.
    ///
    /// # Arguments
    ///
    /// * `doc` - Document to update
    /// * `metadata` - Metadata to set
    ///
    /// # Examples
    ///
    /// ```
    /// # use pdfmerge::merge::MetadataManager;
    /// # use pdfmerge::config::Metadata;
    /// # use lopdf::Document;
    /// let mut doc = Document::with_version("1.5");
    /// let metadata = Metadata::new(Some("Minutes".to_string()), None, None, None);
    ///
    /// let manager = MetadataManager::new();
    /// manager.set_metadata(&mut doc, &metadata);
    /// assert_eq!(manager.get_metadata(&doc).title.as_deref(), Some("Minutes"));
    /// ```
    pub fn set_metadata(&self, doc: &mut Document, metadata: &Metadata) {
        let date = format_pdf_date(Utc::now());

        let existing = doc
            .trailer
            .get(b"Info")
            .and_then(Object::as_reference)
            .ok()
            .filter(|id| matches!(doc.objects.get(id), Some(Object::Dictionary(_))));

        let info_id = match existing {
            Some(id) => id,
            None => {
                let id = doc.add_object(Dictionary::new());
                doc.trailer.set("Info", id);
                id
            }
        };

        let Some(Object::Dictionary(info)) = doc.objects.get_mut(&info_id) else {
            return;
        };

        let fields = [
            ("Title", &metadata.title),
            ("Author", &metadata.author),
            ("Subject", &metadata.subject),
            ("Keywords", &metadata.keywords),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                info.set(key, text(value));
            }
        }

        info.set("Producer", text(PRODUCER));
        info.set("CreationDate", text(&date));
        info.set("ModDate", text(&date));
    }

    /// Get metadata from a document.
    ///
    /// # Returns
    ///
    /// Metadata extracted from the document's Info dictionary, or empty
    /// metadata if it has none.
    pub fn get_metadata(&self, doc: &Document) -> Metadata {
        let Some(info) = Self::info_dictionary(doc) else {
            return Metadata::default();
        };

        Metadata::new(
            Self::get_string_field(info, b"Title"),
            Self::get_string_field(info, b"Author"),
            Self::get_string_field(info, b"Subject"),
            Self::get_string_field(info, b"Keywords"),
        )
    }

    /// Producer recorded in a document, if any.
    pub fn get_producer(&self, doc: &Document) -> Option<String> {
        Self::info_dictionary(doc).and_then(|info| Self::get_string_field(info, b"Producer"))
    }

    fn info_dictionary(doc: &Document) -> Option<&Dictionary> {
        let id = doc.trailer.get(b"Info").and_then(Object::as_reference).ok()?;
        doc.get_dictionary(id).ok()
    }

    fn get_string_field(dict: &Dictionary, key: &[u8]) -> Option<String> {
        match dict.get(key).ok()? {
            Object::String(bytes, _) => String::from_utf8(bytes.clone()).ok(),
            _ => None,
        }
    }
}

fn text(value: &str) -> Object {
    Object::String(value.as_bytes().to_vec(), StringFormat::Literal)
}

/// Format a UTC timestamp as a PDF date string.
///
/// PDF date format: D:YYYYMMDDHHmmSSZ
pub(crate) fn format_pdf_date(time: DateTime<Utc>) -> String {
    time.format("D:%Y%m%d%H%M%SZ").to_string()
}

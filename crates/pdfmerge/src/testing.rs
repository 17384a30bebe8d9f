//! PDF fixtures shared by the unit tests, integration tests, benches and the
//! CLI tests.
//!
//! Every page shows one marker string, so tests can check page order by
//! extracting each page's text.

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream, dictionary};

/// Build a PDF with one page per marker, each page showing its marker.
pub(crate) fn pdf_with_pages(markers: &[&str]) -> Vec<u8> {
    build("1.5", markers, &[])
}

/// Build a PDF with the given header version.
pub(crate) fn pdf_with_version(version: &str, markers: &[&str]) -> Vec<u8> {
    build(version, markers, &[])
}

/// Build a PDF with a flat outline: one item per `(title, page index)`.
pub(crate) fn pdf_with_outline(markers: &[&str], items: &[(&str, usize)]) -> Vec<u8> {
    build("1.5", markers, items)
}

/// Text of every page of a serialized PDF, in page order, trimmed.
pub(crate) fn page_texts(bytes: &[u8]) -> Vec<String> {
    let doc = Document::load_mem(bytes).unwrap();
    doc.get_pages()
        .keys()
        .map(|page| doc.extract_text(&[*page]).unwrap().trim().to_string())
        .collect()
}

/// Titles of the top-level outline items of a serialized PDF, each with the
/// text of the page it points to.
pub(crate) fn outline_entries(bytes: &[u8]) -> Vec<(String, String)> {
    let doc = Document::load_mem(bytes).unwrap();
    let texts = page_texts(bytes);
    let pages: Vec<ObjectId> = doc.get_pages().into_values().collect();

    let Ok(root) = doc
        .catalog()
        .and_then(|catalog| catalog.get(b"Outlines"))
        .and_then(Object::as_reference)
        .and_then(|id| doc.get_dictionary(id))
    else {
        return Vec::new();
    };

    let mut entries = Vec::new();
    let mut next = root.get(b"First").and_then(Object::as_reference).ok();
    while let Some(id) = next {
        let item = doc.get_dictionary(id).unwrap();
        let title = match item.get(b"Title").unwrap() {
            Object::String(bytes, _) => String::from_utf8_lossy(bytes).into_owned(),
            other => panic!("unexpected outline title: {other:?}"),
        };
        let target = item.get(b"Dest").unwrap().as_array().unwrap()[0]
            .as_reference()
            .unwrap();
        let page = pages.iter().position(|page| *page == target).unwrap();

        entries.push((title, texts[page].clone()));
        next = item.get(b"Next").and_then(Object::as_reference).ok();
    }
    entries
}

fn build(version: &str, markers: &[&str], outline: &[(&str, usize)]) -> Vec<u8> {
    let mut doc = Document::with_version(version);
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let page_ids: Vec<ObjectId> = markers
        .iter()
        .map(|marker| {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*marker)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(
                dictionary! {},
                content.encode().unwrap(),
            ));
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            })
        })
        .collect();

    // Resources and media box are inherited from the tree root.
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids.iter().copied().map(Object::Reference).collect::<Vec<_>>(),
            "Count" => page_ids.len() as i64,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    if !outline.is_empty() {
        let root_id = doc.new_object_id();
        let item_ids: Vec<ObjectId> = outline
            .iter()
            .map(|(title, page)| {
                doc.add_object(dictionary! {
                    "Title" => Object::string_literal(*title),
                    "Parent" => root_id,
                    "Dest" => vec![
                        page_ids[*page].into(),
                        "XYZ".into(),
                        Object::Null,
                        Object::Null,
                        Object::Null,
                    ],
                })
            })
            .collect();

        for (pos, id) in item_ids.iter().enumerate() {
            if let Ok(Object::Dictionary(item)) = doc.get_object_mut(*id) {
                if pos > 0 {
                    item.set("Prev", item_ids[pos - 1]);
                }
                if let Some(next) = item_ids.get(pos + 1) {
                    item.set("Next", *next);
                }
            }
        }

        doc.objects.insert(
            root_id,
            Object::Dictionary(dictionary! {
                "Type" => "Outlines",
                "First" => item_ids[0],
                "Last" => item_ids[item_ids.len() - 1],
                "Count" => item_ids.len() as i64,
            }),
        );
        if let Ok(Object::Dictionary(catalog)) = doc.get_object_mut(catalog_id) {
            catalog.set("Outlines", root_id);
        }
    }

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

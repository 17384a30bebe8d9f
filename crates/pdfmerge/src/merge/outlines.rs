//! Outline (bookmark) carry-over for merged documents.
//!
//! The top-level outline items of every source are chained, in merge order,
//! under one outline root in the merged catalog. Nested items stay attached
//! to their parents, and destinations keep pointing at the right pages
//! because pages and outline items are renumbered together.

use lopdf::{Dictionary, Document, Object, ObjectId, dictionary};
use std::collections::HashSet;

/// Collects source outlines and grafts them under one root.
#[derive(Debug, Default)]
pub(crate) struct OutlineMerger {
    items: Vec<ObjectId>,
    visible: i64,
}

impl OutlineMerger {
    /// Create an empty outline merger.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Record the top-level outline items of a source.
    ///
    /// `catalog` is the source's catalog id, already renumbered into the
    /// merged id space. Sources without an outline are skipped.
    pub(crate) fn collect(&mut self, document: &Document, catalog: ObjectId) {
        let Ok(root) = document
            .get_dictionary(catalog)
            .and_then(|catalog| catalog.get(b"Outlines"))
            .and_then(Object::as_reference)
            .and_then(|id| document.get_dictionary(id))
        else {
            return;
        };

        let items = top_level_items(document, root);
        if items.is_empty() {
            return;
        }

        // Count on the root is the number of visible items; absent or
        // invalid counts fall back to the top level alone.
        let visible = root
            .get(b"Count")
            .and_then(Object::as_i64)
            .ok()
            .filter(|count| *count > 0)
            .unwrap_or(items.len() as i64);

        self.visible += visible;
        self.items.extend(items);
    }

    /// Number of top-level items collected so far.
    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    /// Link the collected items under a new outline root and attach it to
    /// the merged catalog. Returns the root id, or `None` when no source had
    /// an outline.
    pub(crate) fn attach(self, merged: &mut Document, catalog: ObjectId) -> Option<ObjectId> {
        let (first, last) = (*self.items.first()?, *self.items.last()?);
        let root_id = merged.new_object_id();

        for (pos, id) in self.items.iter().enumerate() {
            let Ok(Object::Dictionary(item)) = merged.get_object_mut(*id) else {
                continue;
            };

            item.set("Parent", root_id);
            match pos.checked_sub(1).map(|prev| self.items[prev]) {
                Some(prev) => item.set("Prev", prev),
                None => {
                    item.remove(b"Prev");
                }
            }
            match self.items.get(pos + 1) {
                Some(next) => item.set("Next", *next),
                None => {
                    item.remove(b"Next");
                }
            }
        }

        merged.objects.insert(
            root_id,
            dictionary! {
                "Type" => "Outlines",
                "First" => first,
                "Last" => last,
                "Count" => self.visible,
            }
            .into(),
        );

        if let Ok(Object::Dictionary(catalog)) = merged.get_object_mut(catalog) {
            catalog.set("Outlines", root_id);
        }

        Some(root_id)
    }
}

/// Walk the First/Next chain of an outline root.
fn top_level_items(document: &Document, root: &Dictionary) -> Vec<ObjectId> {
    let mut items = Vec::new();
    let mut seen = HashSet::new();
    let mut next = root.get(b"First").and_then(Object::as_reference).ok();

    while let Some(id) = next {
        if !seen.insert(id) {
            break;
        }
        let Ok(item) = document.get_dictionary(id) else {
            break;
        };

        items.push(id);
        next = item.get(b"Next").and_then(Object::as_reference).ok();
    }

    items
}

//! Document-level container.

use serde::{Deserialize, Serialize};

use super::object::{names, SpatialObject};

/// A document: an ordered list of page objects.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    /// Pages in reading order
    pub pages: Vec<SpatialObject>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self { pages: Vec::new() }
    }

    /// Add a page; it gets the next page number, propagated to its subtree.
    pub fn add_page(&mut self, mut page: SpatialObject) -> u32 {
        let number = self.pages.len() as u32 + 1;
        if page.name.is_empty() {
            page.name = names::PAGE.to_string();
        }
        page.set_page(Some(number));
        self.pages.push(page);
        number
    }

    /// Get the number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Get a page by number (1-indexed).
    pub fn page(&self, number: u32) -> Option<&SpatialObject> {
        if number == 0 {
            return None;
        }
        self.pages.get((number - 1) as usize)
    }

    /// Get a mutable page by number (1-indexed).
    pub fn page_mut(&mut self, number: u32) -> Option<&mut SpatialObject> {
        if number == 0 {
            return None;
        }
        self.pages.get_mut((number - 1) as usize)
    }

    /// The page an object belongs to.
    pub fn page_of(&self, object: &SpatialObject) -> Option<&SpatialObject> {
        object.page.and_then(|n| self.page(n))
    }

    /// All objects with the given name on a page, in document order.
    pub fn named_objects(&self, page: u32, name: &str) -> Vec<&SpatialObject> {
        self.page(page)
            .map(|p| p.all_named_objects(name))
            .unwrap_or_default()
    }

    /// Check if the document has any pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Concatenated text content of every object with the given name.
    pub fn plain_text(&self, name: &str) -> String {
        self.pages
            .iter()
            .map(|page| {
                page.all_named_objects(name)
                    .iter()
                    .filter_map(|o| o.content.as_deref())
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BoundingBox;

    #[test]
    fn test_document_new() {
        let doc = Document::new();
        assert!(doc.is_empty());
        assert_eq!(doc.page_count(), 0);
        assert!(doc.page(0).is_none());
        assert!(doc.page(1).is_none());
    }

    #[test]
    fn test_page_numbers_and_lookup() {
        let mut doc = Document::new();
        doc.add_page(SpatialObject::new(names::PAGE));
        let second = SpatialObject::new(names::PAGE).with_child(
            SpatialObject::new(names::TEXT)
                .with_id("t1")
                .with_bbox(BoundingBox::new(0.0, 0.0, 1.0, 1.0))
                .with_content("hi"),
        );
        assert_eq!(doc.add_page(second), 2);

        let texts = doc.named_objects(2, names::TEXT);
        assert_eq!(texts.len(), 1);
        assert_eq!(texts[0].page, Some(2));

        let page = doc.page_of(texts[0]).unwrap();
        assert_eq!(page.page, Some(2));
        assert!(doc.named_objects(9, names::TEXT).is_empty());
    }

    #[test]
    fn test_plain_text() {
        let mut doc = Document::new();
        doc.add_page(
            SpatialObject::new(names::PAGE)
                .with_child(SpatialObject::new(names::TEXT).with_content("a"))
                .with_child(SpatialObject::new(names::TEXT).with_content("b")),
        );
        doc.add_page(SpatialObject::new(names::PAGE).with_child(SpatialObject::new(names::TEXT).with_content("c")));
        assert_eq!(doc.plain_text(names::TEXT), "a\nb\n\nc");
    }
}

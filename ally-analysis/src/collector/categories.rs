//! Element categories and the per-scan registry.

use ally_core::NodeId;
use rustc_hash::FxHashMap;

/// The element categories the checker collects, one registry entry each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Paragraph,
    Heading,
    Image,
    Link,
    ListItem,
    Blockquote,
    Iframe,
    Audio,
    Video,
    Table,
    EditableRegion,
}

impl Category {
    /// All categories, collection order.
    pub fn all() -> &'static [Category] {
        &[
            Self::Paragraph,
            Self::Heading,
            Self::Image,
            Self::Link,
            Self::ListItem,
            Self::Blockquote,
            Self::Iframe,
            Self::Audio,
            Self::Video,
            Self::Table,
            Self::EditableRegion,
        ]
    }

    /// Configuration key for this category's ignore selector.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Paragraph => "paragraph",
            Self::Heading => "heading",
            Self::Image => "image",
            Self::Link => "link",
            Self::ListItem => "list_item",
            Self::Blockquote => "blockquote",
            Self::Iframe => "iframe",
            Self::Audio => "audio",
            Self::Video => "video",
            Self::Table => "table",
            Self::EditableRegion => "editable_region",
        }
    }

    /// The selector that finds this category's elements.
    pub fn selector(&self) -> &'static str {
        match self {
            Self::Paragraph => "p",
            Self::Heading => "h1, h2, h3, h4, h5, h6, [role=heading]",
            Self::Image => "img",
            Self::Link => "a[href]",
            Self::ListItem => "li",
            Self::Blockquote => "blockquote",
            Self::Iframe => "iframe, embed, object",
            Self::Audio => "audio",
            Self::Video => "video",
            Self::Table => "table",
            Self::EditableRegion => "[contenteditable], textarea",
        }
    }
}

/// Per-scan element sets, recomputed by the collector and never persisted.
#[derive(Default)]
pub struct ElementRegistry {
    by_category: FxHashMap<Category, Vec<NodeId>>,
}

impl ElementRegistry {
    pub fn insert(&mut self, category: Category, elements: Vec<NodeId>) {
        self.by_category.insert(category, elements);
    }

    pub fn get(&self, category: Category) -> &[NodeId] {
        self.by_category
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Total collected elements across all categories.
    pub fn element_count(&self) -> usize {
        self.by_category.values().map(Vec::len).sum()
    }
}

use serde::{Deserialize, Serialize};

/// One line of a daily outline.
///
/// Hierarchy is implicit: a block's logical parent is the nearest preceding
/// block whose level is exactly one less.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutlineBlock {
    pub id: String,
    pub content: String,
    pub level: usize,
}

impl OutlineBlock {
    /// Create a new block with a generated id
    pub fn new(content: impl Into<String>, level: usize) -> Self {
        Self::with_id(super::new_id(), content, level)
    }

    /// Create a block with a caller-chosen id
    pub fn with_id(id: impl Into<String>, content: impl Into<String>, level: usize) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            level,
        }
    }

    /// Create an empty level-0 block
    pub fn empty() -> Self {
        Self::new(String::new(), 0)
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Number of characters (not bytes) in the content
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }

    /// Byte index of the given character offset, clamped to the content end
    pub fn byte_offset(&self, cursor: usize) -> usize {
        self.content
            .char_indices()
            .map(|(i, _)| i)
            .nth(cursor)
            .unwrap_or(self.content.len())
    }

    /// Check whether the content references the given `[[YYYY-MM-DD]]` link
    pub fn links_to(&self, link: &str) -> bool {
        self.content.contains(link)
    }
}

use super::OutlineBlock;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The outline for one calendar day.
///
/// The block list is never empty and every block sits at most one level
/// deeper than the block before it. The fields are private so that the only
/// ways to build an entry either seed it or normalize it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyEntry {
    date: NaiveDate,
    #[serde(alias = "nodes")]
    blocks: Vec<OutlineBlock>,
}

impl DailyEntry {
    /// Create a new daily entry seeded with one empty top-level block
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            blocks: vec![OutlineBlock::empty()],
        }
    }

    /// Build an entry from existing blocks, repairing anything that breaks
    /// the shape invariants
    pub fn from_blocks(date: NaiveDate, blocks: Vec<OutlineBlock>) -> Self {
        let mut entry = Self { date, blocks };
        entry.normalize();
        entry
    }

    /// Replace the block list of an already valid entry
    pub(crate) fn with_blocks(&self, blocks: Vec<OutlineBlock>) -> Self {
        debug_assert!(!blocks.is_empty(), "an entry must keep at least one block");
        Self {
            date: self.date,
            blocks,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Format the date as YYYY-MM-DD
    pub fn date_string(&self) -> String {
        super::format_date(self.date)
    }

    pub fn blocks(&self) -> &[OutlineBlock] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Index of the block with the given id
    pub fn position_of(&self, block_id: &str) -> Option<usize> {
        self.blocks.iter().position(|b| b.id == block_id)
    }

    pub fn block(&self, block_id: &str) -> Option<&OutlineBlock> {
        self.blocks.iter().find(|b| b.id == block_id)
    }

    pub fn block_at(&self, index: usize) -> Option<&OutlineBlock> {
        self.blocks.get(index)
    }

    pub fn first_block(&self) -> &OutlineBlock {
        &self.blocks[0]
    }

    pub fn last_block(&self) -> &OutlineBlock {
        &self.blocks[self.blocks.len() - 1]
    }

    /// Check whether any block references the given link text
    pub fn links_to(&self, link: &str) -> bool {
        self.blocks.iter().any(|b| b.links_to(link))
    }

    /// Check the level-jump invariant over the whole entry
    pub fn levels_are_consistent(&self) -> bool {
        match self.blocks.first() {
            None => false,
            Some(first) if first.level != 0 => false,
            Some(_) => self
                .blocks
                .windows(2)
                .all(|pair| pair[1].level <= pair[0].level + 1),
        }
    }

    /// Reseed an empty entry and clamp levels so that no block is indented
    /// more than one step past its predecessor. Returns true when anything changed.
    pub fn normalize(&mut self) -> bool {
        if self.blocks.is_empty() {
            self.blocks.push(OutlineBlock::empty());
            return true;
        }

        let mut changed = false;
        let mut ceiling = 0;
        for block in &mut self.blocks {
            if block.level > ceiling {
                block.level = ceiling;
                changed = true;
            }
            ceiling = block.level + 1;
        }
        changed
    }
}

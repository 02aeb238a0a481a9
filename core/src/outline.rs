//! Structural editing of a daily outline.
//!
//! Blocks live in a flat list and hierarchy comes from each block's `level`.
//! Every operation reads the current [`DailyEntry`] and either produces a new
//! one (plus where the caret should go next) or returns `None` when its
//! preconditions are not met. A `None` leaves the caller's entry untouched, so
//! stale ids from a racing re-render are harmless.
//!
//! A block's descendants are the contiguous run of blocks after it with a
//! deeper level. Indent moves only the target block; outdent moves that run
//! along with the block, and removing a block promotes the run when it would
//! otherwise sit two levels below its new predecessor.

use crate::models::{DailyEntry, OutlineBlock};
use log::debug;

/// Where the caret lands inside the focused block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Caret {
    Start,
    End,
    /// Character offset into the content
    At(usize),
    /// Focus without moving the caret
    Preserve,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusTarget {
    pub block_id: String,
    pub caret: Caret,
}

impl FocusTarget {
    pub fn new(block_id: impl Into<String>, caret: Caret) -> Self {
        Self {
            block_id: block_id.into(),
            caret,
        }
    }
}

/// Result of an accepted structural edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineEdit {
    pub entry: DailyEntry,
    pub focus: Option<FocusTarget>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// One editing request against a single entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutlineCommand {
    InsertAfter { block_id: String },
    Split { block_id: String, cursor: usize },
    Indent { block_id: String },
    Outdent { block_id: String },
    MergeWithPrevious { block_id: String },
    Remove { block_id: String },
    SetContent { block_id: String, content: String },
    MoveFocus { block_id: String, direction: Direction, cursor: usize },
}

impl OutlineCommand {
    pub fn block_id(&self) -> &str {
        match self {
            Self::InsertAfter { block_id }
            | Self::Split { block_id, .. }
            | Self::Indent { block_id }
            | Self::Outdent { block_id }
            | Self::MergeWithPrevious { block_id }
            | Self::Remove { block_id }
            | Self::SetContent { block_id, .. }
            | Self::MoveFocus { block_id, .. } => block_id,
        }
    }
}

/// What an accepted command produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The entry changed
    Edited(OutlineEdit),
    /// Only the focus moved
    Focus(FocusTarget),
}

/// Run one command. `None` means the command was rejected and nothing changed.
pub fn apply(entry: &DailyEntry, command: &OutlineCommand) -> Option<Outcome> {
    let outcome = match command {
        OutlineCommand::InsertAfter { block_id } => {
            insert_block_after(entry, block_id).map(Outcome::Edited)
        }
        OutlineCommand::Split { block_id, cursor } => {
            split_block(entry, block_id, *cursor).map(Outcome::Edited)
        }
        OutlineCommand::Indent { block_id } => indent(entry, block_id).map(Outcome::Edited),
        OutlineCommand::Outdent { block_id } => outdent(entry, block_id).map(Outcome::Edited),
        OutlineCommand::MergeWithPrevious { block_id } => {
            merge_with_previous(entry, block_id).map(Outcome::Edited)
        }
        OutlineCommand::Remove { block_id } => remove_block(entry, block_id).map(Outcome::Edited),
        OutlineCommand::SetContent { block_id, content } => {
            set_content(entry, block_id, content).map(Outcome::Edited)
        }
        OutlineCommand::MoveFocus {
            block_id,
            direction,
            cursor,
        } => move_focus(entry, block_id, *direction, *cursor).map(Outcome::Focus),
    };

    if outcome.is_none() {
        debug!(
            "outline command ignored: date={} block={} command={:?}",
            entry.date_string(),
            command.block_id(),
            command
        );
    }
    outcome
}

/// Insert an empty block after `after_id` at the same level and focus it
pub fn insert_block_after(entry: &DailyEntry, after_id: &str) -> Option<OutlineEdit> {
    let block = entry.block(after_id)?;
    split_block(entry, after_id, block.char_len())
}

/// Split a block at a character offset. Text after the caret moves into a new
/// block right below, at the same level, and the caret goes to its start.
pub fn split_block(entry: &DailyEntry, block_id: &str, cursor: usize) -> Option<OutlineEdit> {
    let index = entry.position_of(block_id)?;
    let current = &entry.blocks()[index];
    let split_at = current.byte_offset(cursor);

    let head = OutlineBlock {
        content: current.content[..split_at].to_string(),
        ..current.clone()
    };
    let tail = OutlineBlock::new(&current.content[split_at..], current.level);
    let focus = FocusTarget::new(tail.id.clone(), Caret::Start);

    let mut blocks = entry.blocks().to_vec();
    blocks[index] = head;
    blocks.insert(index + 1, tail);

    Some(OutlineEdit {
        entry: entry.with_blocks(blocks),
        focus: Some(focus),
    })
}

/// Indent a block one level, never deeper than one past its predecessor.
/// The first block cannot be indented.
pub fn indent(entry: &DailyEntry, block_id: &str) -> Option<OutlineEdit> {
    let index = entry.position_of(block_id)?;
    if index == 0 {
        return None;
    }

    let blocks = entry.blocks();
    let ceiling = blocks[index - 1].level + 1;
    if blocks[index].level >= ceiling {
        return None;
    }

    let mut blocks = blocks.to_vec();
    blocks[index].level += 1;

    Some(OutlineEdit {
        entry: entry.with_blocks(blocks),
        focus: Some(FocusTarget::new(block_id, Caret::Preserve)),
    })
}

/// Outdent a block one level, floored at zero
pub fn outdent(entry: &DailyEntry, block_id: &str) -> Option<OutlineEdit> {
    let index = entry.position_of(block_id)?;
    if entry.blocks()[index].level == 0 {
        return None;
    }

    let mut blocks = entry.blocks().to_vec();
    let end = subtree_end(&blocks, index);
    for block in &mut blocks[index..end] {
        block.level -= 1;
    }

    Some(OutlineEdit {
        entry: entry.with_blocks(blocks),
        focus: Some(FocusTarget::new(block_id, Caret::Preserve)),
    })
}

/// Backspace on an empty block: drop it and put the caret at the end of the
/// previous block. The first block of an entry is never merged away.
pub fn merge_with_previous(entry: &DailyEntry, block_id: &str) -> Option<OutlineEdit> {
    let index = entry.position_of(block_id)?;
    if index == 0 || !entry.blocks()[index].is_empty() {
        return None;
    }
    remove_at(entry, index)
}

/// Delete a block outright. The sole block of an entry is kept.
pub fn remove_block(entry: &DailyEntry, block_id: &str) -> Option<OutlineEdit> {
    let index = entry.position_of(block_id)?;
    remove_at(entry, index)
}

fn remove_at(entry: &DailyEntry, index: usize) -> Option<OutlineEdit> {
    if entry.len() <= 1 {
        return None;
    }

    let mut blocks = entry.blocks().to_vec();
    let removed = blocks.remove(index);
    promote_orphans(&mut blocks, index, removed.level);

    let focus = if index > 0 {
        FocusTarget::new(blocks[index - 1].id.clone(), Caret::End)
    } else {
        FocusTarget::new(blocks[0].id.clone(), Caret::Start)
    };

    Some(OutlineEdit {
        entry: entry.with_blocks(blocks),
        focus: Some(focus),
    })
}

/// Replace a block's text. Unchanged text is a no-op.
pub fn set_content(entry: &DailyEntry, block_id: &str, content: &str) -> Option<OutlineEdit> {
    let index = entry.position_of(block_id)?;
    if entry.blocks()[index].content == content {
        return None;
    }

    let mut blocks = entry.blocks().to_vec();
    blocks[index].content = content.to_string();

    Some(OutlineEdit {
        entry: entry.with_blocks(blocks),
        focus: None,
    })
}

/// Arrow-key traversal. Movement only happens when the caret already sits on
/// the content boundary facing the direction of travel.
pub fn move_focus(
    entry: &DailyEntry,
    block_id: &str,
    direction: Direction,
    cursor: usize,
) -> Option<FocusTarget> {
    let index = entry.position_of(block_id)?;
    let at_start = cursor == 0;
    let at_end = cursor >= entry.blocks()[index].char_len();

    let (target, caret) = match direction {
        Direction::Up if at_start => (index.checked_sub(1)?, Caret::Preserve),
        Direction::Left if at_start => (index.checked_sub(1)?, Caret::End),
        Direction::Down if at_end => (index + 1, Caret::Preserve),
        Direction::Right if at_end => (index + 1, Caret::Start),
        _ => return None,
    };

    entry
        .block_at(target)
        .map(|block| FocusTarget::new(block.id.clone(), caret))
}

/// Ids of every block between two blocks, both ends included, in outline order
pub fn select_range(entry: &DailyEntry, anchor_id: &str, target_id: &str) -> Vec<String> {
    let (Some(a), Some(b)) = (entry.position_of(anchor_id), entry.position_of(target_id)) else {
        return Vec::new();
    };
    let (from, to) = if a <= b { (a, b) } else { (b, a) };
    entry.blocks()[from..=to]
        .iter()
        .map(|block| block.id.clone())
        .collect()
}

/// Index just past the block's descendants
fn subtree_end(blocks: &[OutlineBlock], index: usize) -> usize {
    let level = blocks[index].level;
    blocks[index + 1..]
        .iter()
        .position(|b| b.level <= level)
        .map_or(blocks.len(), |offset| index + 1 + offset)
}

/// After removing a block at `index`, lift its former descendants (now
/// starting at `index`) just enough to satisfy the level-jump rule again.
fn promote_orphans(blocks: &mut [OutlineBlock], index: usize, removed_level: usize) {
    let Some(first) = blocks.get(index) else {
        return;
    };
    let allowed = if index == 0 { 0 } else { blocks[index - 1].level + 1 };
    if first.level <= allowed {
        return;
    }

    let lift = first.level - allowed;
    let end = blocks[index..]
        .iter()
        .position(|b| b.level <= removed_level)
        .map_or(blocks.len(), |offset| index + offset);
    for block in &mut blocks[index..end] {
        block.level -= lift;
    }
}

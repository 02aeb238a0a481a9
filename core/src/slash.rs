//! Slash-command lookup for the outline editor.
//!
//! Typing the trigger character inside a block opens a menu over a command
//! catalog. [`detect_trigger`] finds the query being typed, [`search`]
//! narrows the catalog, and a [`CatalogStack`] tracks drill-down into
//! sub-commands. Nothing here mutates the catalog; every step returns a new
//! view and reports how long it is so the caller can re-clamp its selection.

use crate::models::{CommandAction, SlashCommand};

/// Default trigger character
pub const TRIGGER: char = '/';

/// The slash query the caret is currently inside
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlashQuery {
    /// Character offset of the trigger
    pub start: usize,
    /// Text typed after the trigger, up to the caret
    pub term: String,
}

/// Find an open slash query ending at `cursor` (a character offset).
///
/// The trigger may sit anywhere in the text, but nothing between it and
/// the caret may be whitespace.
pub fn detect_trigger(content: &str, cursor: usize, trigger: char) -> Option<SlashQuery> {
    let chars: Vec<char> = content.chars().collect();
    let cursor = cursor.min(chars.len());

    let mut start = cursor;
    loop {
        if start == 0 {
            return None;
        }
        start -= 1;
        let ch = chars[start];
        if ch.is_whitespace() {
            return None;
        }
        if ch == trigger {
            break;
        }
    }

    Some(SlashQuery {
        start,
        term: chars[start + 1..cursor].iter().collect(),
    })
}

/// Replace the query (trigger included) with `text`.
/// Returns the new content and the caret offset just after the inserted text.
pub fn complete(content: &str, query: &SlashQuery, cursor: usize, text: &str) -> (String, usize) {
    let chars: Vec<char> = content.chars().collect();
    let cursor = cursor.clamp(query.start, chars.len());

    let mut out: String = chars[..query.start].iter().collect();
    out.push_str(text);
    out.extend(&chars[cursor..]);
    (out, query.start + text.chars().count())
}

/// Filter a catalog by a case-insensitive substring.
///
/// A command with matching descendants is kept with its sub-commands
/// narrowed to those matches. A command that matches only by name keeps
/// its whole sub-tree. A blank term returns the catalog unchanged.
pub fn search(catalog: &[SlashCommand], term: &str) -> Vec<SlashCommand> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return catalog.to_vec();
    }
    search_lowered(catalog, &term)
}

fn search_lowered(catalog: &[SlashCommand], term: &str) -> Vec<SlashCommand> {
    catalog
        .iter()
        .filter_map(|command| {
            let narrowed = search_lowered(&command.sub_commands, term);
            if !narrowed.is_empty() {
                Some(SlashCommand {
                    sub_commands: narrowed,
                    ..command.clone()
                })
            } else if command.name_matches(term) {
                Some(command.clone())
            } else {
                None
            }
        })
        .collect()
}

/// Drill-down state of an open slash menu. The bottom level is the
/// (possibly filtered) root catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogStack {
    levels: Vec<Vec<SlashCommand>>,
}

impl CatalogStack {
    pub fn new(root: Vec<SlashCommand>) -> Self {
        Self { levels: vec![root] }
    }

    /// The list currently shown
    pub fn current(&self) -> &[SlashCommand] {
        self.levels.last().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.current().len()
    }

    pub fn is_empty(&self) -> bool {
        self.current().is_empty()
    }

    /// How many levels below the root we are
    pub fn depth(&self) -> usize {
        self.levels.len() - 1
    }

    pub fn is_root(&self) -> bool {
        self.levels.len() == 1
    }
}

/// Result of choosing a command from the menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// The command has sub-commands; show this stack next
    Descend(CatalogStack),
    /// Run this action and close the menu
    Execute(CommandAction),
}

/// Choose a command: drill into its sub-commands, or hand back its action
pub fn navigate(stack: &CatalogStack, command: &SlashCommand) -> Navigation {
    if command.has_sub_commands() {
        let mut next = stack.clone();
        next.levels.push(command.sub_commands.clone());
        Navigation::Descend(next)
    } else {
        Navigation::Execute(command.action.clone())
    }
}

/// Go up one level. At the root this returns the same stack.
pub fn back(stack: &CatalogStack) -> CatalogStack {
    let mut next = stack.clone();
    if !next.is_root() {
        next.levels.pop();
    }
    next
}

/// Clamp a selection index to a list of `len` items
pub fn clamp_selection(selected: usize, len: usize) -> usize {
    selected.min(len.saturating_sub(1))
}

/// The commands the journal offers out of the box
pub fn default_catalog() -> Vec<SlashCommand> {
    vec![
        SlashCommand::new("Add task", CommandAction::InsertTask),
        SlashCommand::submenu(
            "Insert date",
            vec![
                SlashCommand::new("Today", CommandAction::InsertToday),
                SlashCommand::new("Start time", CommandAction::Named("start_time".to_string())),
                SlashCommand::new("End time", CommandAction::Named("end_time".to_string())),
                SlashCommand::new("Link to today", CommandAction::InsertDateLink),
            ],
        ),
        SlashCommand::new("Insert todo", CommandAction::InsertText("[ ] ".to_string())),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date_catalog() -> Vec<SlashCommand> {
        vec![SlashCommand::submenu(
            "Date",
            vec![
                SlashCommand::new("Start time", CommandAction::Named("start".to_string())),
                SlashCommand::new("End time", CommandAction::Named("end".to_string())),
            ],
        )]
    }

    #[test]
    fn test_search_keeps_parent_of_matching_child() {
        let result = search(&date_catalog(), "start");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Date");
        let names: Vec<&str> = result[0].sub_commands.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Start time"]);
    }

    #[test]
    fn test_search_name_match_keeps_full_subtree() {
        let result = search(&date_catalog(), "DAT");
        assert_eq!(result, date_catalog());
    }

    #[test]
    fn test_search_children_win_over_parent_name() {
        let result = search(&date_catalog(), "time");
        assert_eq!(result[0].sub_commands.len(), 2);

        let catalog = vec![SlashCommand::submenu(
            "Time",
            vec![
                SlashCommand::new("Start time", CommandAction::Named("start".to_string())),
                SlashCommand::new("Deadline", CommandAction::Named("deadline".to_string())),
            ],
        )];
        let result = search(&catalog, "time");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].sub_commands.len(), 1);
        assert_eq!(result[0].sub_commands[0].name, "Start time");
    }

    #[test]
    fn test_search_is_recursive() {
        let catalog = vec![SlashCommand::submenu(
            "Insert",
            vec![SlashCommand::submenu(
                "Date",
                vec![SlashCommand::new("Tomorrow", CommandAction::Named("tomorrow".to_string()))],
            )],
        )];
        let result = search(&catalog, "tomorrow");
        assert_eq!(result[0].sub_commands[0].sub_commands[0].name, "Tomorrow");
        assert!(search(&catalog, "yesterday").is_empty());
    }

    #[test]
    fn test_search_empty_term_and_no_match() {
        assert_eq!(search(&date_catalog(), ""), date_catalog());
        assert_eq!(search(&date_catalog(), "   "), date_catalog());
        assert!(search(&date_catalog(), "zzz").is_empty());
    }

    #[test]
    fn test_search_does_not_touch_catalog() {
        let catalog = default_catalog();
        let before = catalog.clone();
        let _ = search(&catalog, "today");
        assert_eq!(catalog, before);
    }

    #[test]
    fn test_navigate_and_back() {
        let stack = CatalogStack::new(date_catalog());
        assert!(stack.is_root());

        let Navigation::Descend(inner) = navigate(&stack, &stack.current()[0]) else {
            panic!("expected to descend into Date");
        };
        assert_eq!(inner.depth(), 1);
        assert_eq!(inner.len(), 2);
        assert_eq!(
            navigate(&inner, &inner.current()[0]),
            Navigation::Execute(CommandAction::Named("start".to_string()))
        );

        let up = back(&inner);
        assert_eq!(up, stack);
        assert_eq!(back(&up), stack);
    }

    #[test]
    fn test_clamp_selection() {
        assert_eq!(clamp_selection(5, 2), 1);
        assert_eq!(clamp_selection(1, 3), 1);
        assert_eq!(clamp_selection(3, 0), 0);
    }

    #[test]
    fn test_detect_trigger() {
        assert_eq!(
            detect_trigger("/da", 3, TRIGGER),
            Some(SlashQuery { start: 0, term: "da".to_string() })
        );
        assert_eq!(
            detect_trigger("note /", 6, TRIGGER),
            Some(SlashQuery { start: 5, term: String::new() })
        );
        assert_eq!(
            detect_trigger("and/or", 6, TRIGGER),
            Some(SlashQuery { start: 3, term: "or".to_string() })
        );
        assert_eq!(
            detect_trigger("and/", 4, TRIGGER),
            Some(SlashQuery { start: 3, term: String::new() })
        );
        assert!(detect_trigger("/date today", 11, TRIGGER).is_none());
        assert!(detect_trigger("plain", 5, TRIGGER).is_none());
        assert!(detect_trigger("", 0, TRIGGER).is_none());
    }

    #[test]
    fn test_detect_trigger_uses_cursor_not_end() {
        let query = detect_trigger("/to rest", 3, TRIGGER).unwrap();
        assert_eq!(query.term, "to");
    }

    #[test]
    fn test_complete() {
        let query = detect_trigger("buy /to milk", 7, TRIGGER).unwrap();
        let (content, caret) = complete("buy /to milk", &query, 7, "2024-01-01");
        assert_eq!(content, "buy 2024-01-01 milk");
        assert_eq!(caret, 14);
    }
}

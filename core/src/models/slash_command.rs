use serde::{Deserialize, Serialize};

/// What happens when a slash command is chosen. The resolver hands this back
/// to the caller and never interprets it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CommandAction {
    /// Insert literal text at the trigger position
    InsertText(String),
    /// Insert today's date as YYYY-MM-DD
    InsertToday,
    /// Insert a `[[YYYY-MM-DD]]` link to today's entry
    InsertDateLink,
    /// Turn the block's text into a new task
    InsertTask,
    /// Drill into the sub-commands
    OpenSubmenu,
    /// Anything else, resolved by name
    Named(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SlashCommand {
    pub name: String,
    pub action: CommandAction,
    #[serde(default)]
    pub sub_commands: Vec<SlashCommand>,
}

impl SlashCommand {
    pub fn new(name: impl Into<String>, action: CommandAction) -> Self {
        Self {
            name: name.into(),
            action,
            sub_commands: Vec::new(),
        }
    }

    /// A command whose only job is to open a nested list
    pub fn submenu(name: impl Into<String>, sub_commands: Vec<SlashCommand>) -> Self {
        Self {
            name: name.into(),
            action: CommandAction::OpenSubmenu,
            sub_commands,
        }
    }

    pub fn has_sub_commands(&self) -> bool {
        !self.sub_commands.is_empty()
    }

    /// Case-insensitive match of the name against an already lowercased term
    pub(crate) fn name_matches(&self, lowered_term: &str) -> bool {
        self.name.to_lowercase().contains(lowered_term)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submenu() {
        let cmd = SlashCommand::submenu(
            "Date",
            vec![SlashCommand::new("Today", CommandAction::InsertToday)],
        );
        assert!(cmd.has_sub_commands());
        assert_eq!(cmd.action, CommandAction::OpenSubmenu);
        assert!(!cmd.sub_commands[0].has_sub_commands());
    }

    #[test]
    fn test_name_matches() {
        let cmd = SlashCommand::new("Start time", CommandAction::Named("start".to_string()));
        assert!(cmd.name_matches("start"));
        assert!(cmd.name_matches("time"));
        assert!(!cmd.name_matches("end"));
    }
}

mod outline_block;
mod daily_entry;
mod journal;
mod task_node;
mod slash_command;

pub use outline_block::OutlineBlock;
pub use daily_entry::DailyEntry;
pub use journal::Journal;
pub use task_node::{TaskNode, TaskPriority, TaskStatus};
pub use slash_command::{CommandAction, SlashCommand};

use chrono::NaiveDate;

/// Date format used for entry keys and `[[...]]` cross-links
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Format a date as YYYY-MM-DD
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a YYYY-MM-DD date, returning None for anything else
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

/// Build the `[[YYYY-MM-DD]]` reference text for a date
pub fn date_link(date: NaiveDate) -> String {
    format!("[[{}]]", format_date(date))
}

/// Generate a fresh opaque identifier
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_round_trip() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(format_date(date), "2024-01-01");
        assert_eq!(parse_date("2024-01-01"), Some(date));
        assert_eq!(parse_date("01/01/2024"), None);
    }

    #[test]
    fn test_date_link() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(date_link(date), "[[2024-03-09]]");
    }
}

//! Command-line arguments.

use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

/// dayline - a daily journal outliner with a task tree
#[derive(Parser, Debug)]
#[command(name = "dayline", version, about, long_about = None)]
pub struct Args {
    /// Database file holding the journal and tasks
    #[arg(long, default_value = "dayline.db")]
    pub db: PathBuf,

    /// Config file (defaults to config.toml next to the database)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory for log files (defaults to logs/ next to the database)
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Log level: error, warn, info, debug or trace
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Open the journal as if today were this date (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

impl Args {
    fn data_dir(&self) -> PathBuf {
        self.db
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| self.data_dir().join("config.toml"))
    }

    pub fn log_dir(&self) -> PathBuf {
        self.log_dir
            .clone()
            .unwrap_or_else(|| self.data_dir().join("logs"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["dayline"]);
        assert_eq!(args.db, PathBuf::from("dayline.db"));
        assert_eq!(args.config_path(), PathBuf::from("./config.toml"));
        assert_eq!(args.log_dir(), PathBuf::from("./logs"));
        assert_eq!(args.log_level, "info");
        assert!(args.date.is_none());
    }

    #[test]
    fn test_paths_follow_database() {
        let args = Args::parse_from(["dayline", "--db", "/tmp/journal/day.db", "--date", "2024-01-01"]);
        assert_eq!(args.config_path(), PathBuf::from("/tmp/journal/config.toml"));
        assert_eq!(args.log_dir(), PathBuf::from("/tmp/journal/logs"));
        assert_eq!(args.date, NaiveDate::from_ymd_opt(2024, 1, 1));
    }

    #[test]
    fn test_bad_date_is_rejected() {
        assert!(Args::try_parse_from(["dayline", "--date", "yesterday"]).is_err());
    }
}

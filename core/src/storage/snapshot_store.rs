use super::{Connection, Database, SnapshotRepository};
use crate::models::{Journal, TaskNode};
use crate::Result;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Snapshot key for the daily journal
pub const JOURNAL_KEY: &str = "daily_entries";
/// Snapshot key for the task forest
pub const FOREST_KEY: &str = "task_forest";

/// Keyed, whole-snapshot persistence.
///
/// Implementations store opaque JSON text; callers go through
/// [`load_snapshot`] and [`save_snapshot`] for typed access.
pub trait SnapshotStore {
    /// Last value saved under `key`, or None if nothing was saved yet
    fn load(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value saved under `key`
    fn save(&mut self, key: &str, value: &str) -> Result<()>;
}

impl<S: SnapshotStore + ?Sized> SnapshotStore for Box<S> {
    fn load(&self, key: &str) -> Result<Option<String>> {
        (**self).load(key)
    }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).save(key, value)
    }
}

/// The journal as it is persisted
pub type JournalSnapshot = Journal;

/// The task forest as it is persisted
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ForestSnapshot {
    pub forest: Vec<TaskNode>,
}

/// Load and decode a snapshot
pub fn load_snapshot<T, S>(store: &S, key: &str) -> Result<Option<T>>
where
    T: DeserializeOwned,
    S: SnapshotStore + ?Sized,
{
    match store.load(key)? {
        Some(text) => Ok(Some(serde_json::from_str(&text)?)),
        None => Ok(None),
    }
}

/// Encode and save a snapshot
pub fn save_snapshot<T, S>(store: &mut S, key: &str, value: &T) -> Result<()>
where
    T: Serialize,
    S: SnapshotStore + ?Sized,
{
    let text = serde_json::to_string(value)?;
    store.save(key, &text)
}

/// SQLite-backed store, one row per key
pub struct SqliteSnapshotStore {
    conn: Connection,
}

impl SqliteSnapshotStore {
    /// Open (or create) the database file at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Database::new(path).open()?;
        Ok(Self { conn })
    }

    /// Store backed by a private in-memory database
    pub fn in_memory() -> Result<Self> {
        Ok(Self {
            conn: Database::in_memory()?,
        })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl SnapshotStore for SqliteSnapshotStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        SnapshotRepository::find(&self.conn, key)
    }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        SnapshotRepository::put(&self.conn, key, value)
    }
}

/// Volatile store for tests and throwaway sessions
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `save` calls so far
    pub fn save_count(&self) -> usize {
        self.saves
    }

    /// Raw text saved under `key`
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Seed a raw value, bypassing the save counter
    pub fn insert_raw(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DailyEntry;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    #[test]
    fn test_sqlite_store_round_trip() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("dayline.db");
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        {
            let mut store = SqliteSnapshotStore::open(&db_path).unwrap();
            save_snapshot(&mut store, JOURNAL_KEY, &Journal::seeded(date)).unwrap();
        }

        let store = SqliteSnapshotStore::open(&db_path).unwrap();
        let journal: Journal = load_snapshot(&store, JOURNAL_KEY).unwrap().unwrap();
        assert_eq!(journal.len(), 1);
        assert!(journal.get(date).is_some());
    }

    #[test]
    fn test_missing_snapshot_is_none() {
        let store = SqliteSnapshotStore::in_memory().unwrap();
        let forest: Option<ForestSnapshot> = load_snapshot(&store, FOREST_KEY).unwrap();
        assert!(forest.is_none());
    }

    #[test]
    fn test_corrupt_snapshot_is_an_error() {
        let mut store = MemoryStore::new();
        store.insert_raw(JOURNAL_KEY, "{not json");
        let result: Result<Option<Journal>> = load_snapshot(&store, JOURNAL_KEY);
        assert!(matches!(result, Err(crate::Error::Serialization(_))));
    }

    #[test]
    fn test_journal_snapshot_shape() {
        let mut store = MemoryStore::new();
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let journal = Journal::from_entries(vec![DailyEntry::new(date)]);
        save_snapshot(&mut store, JOURNAL_KEY, &journal).unwrap();

        let value: serde_json::Value = serde_json::from_str(store.raw(JOURNAL_KEY).unwrap()).unwrap();
        assert_eq!(value["entries"][0]["date"], "2024-01-01");
        assert_eq!(value["entries"][0]["blocks"][0]["level"], 0);
        assert_eq!(store.save_count(), 1);
    }
}

use crate::{Error, Result};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};

pub struct SnapshotRepository;

impl SnapshotRepository {
    /// Insert or overwrite the snapshot stored under `key`
    pub fn put(conn: &Connection, key: &str, value: &str) -> Result<()> {
        if key.trim().is_empty() {
            return Err(Error::InvalidInput("Snapshot key cannot be empty".to_string()));
        }

        conn.execute(
            "INSERT INTO snapshots (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, Utc::now().timestamp()],
        )?;
        
        Ok(())
    }

    /// Get a snapshot by key
    pub fn get(conn: &Connection, key: &str) -> Result<String> {
        Self::find(conn, key)?
            .ok_or_else(|| Error::NotFound(format!("Snapshot not found: {}", key)))
    }

    /// Get a snapshot by key, or None when nothing was saved yet
    pub fn find(conn: &Connection, key: &str) -> Result<Option<String>> {
        let value = conn
            .query_row(
                "SELECT value FROM snapshots WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        
        Ok(value)
    }

    /// All stored keys, alphabetically
    pub fn keys(conn: &Connection) -> Result<Vec<String>> {
        let mut stmt = conn.prepare("SELECT key FROM snapshots ORDER BY key")?;
        
        let keys = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        
        Ok(keys)
    }

    /// Delete a snapshot
    pub fn delete(conn: &Connection, key: &str) -> Result<()> {
        let rows_affected = conn.execute("DELETE FROM snapshots WHERE key = ?1", params![key])?;
        
        if rows_affected == 0 {
            return Err(Error::NotFound(format!("Snapshot not found: {}", key)));
        }
        
        Ok(())
    }
}

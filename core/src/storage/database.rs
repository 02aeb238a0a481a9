use crate::{Error, Result};
use rusqlite::Connection as SqliteConnection;
use std::path::{Path, PathBuf};

pub type Connection = SqliteConnection;

/// Schema version this build reads and writes
pub const SCHEMA_VERSION: i32 = 1;

/// SQLite file holding the journal and task snapshots
pub struct Database {
    db_path: PathBuf,
}

impl Database {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Self {
        Self {
            db_path: db_path.as_ref().to_path_buf(),
        }
    }

    /// Open the file, creating it and its parent directories when missing.
    ///
    /// The schema is applied on every open (it only creates what is absent).
    /// A file written by a newer schema is refused rather than overwritten.
    pub fn open(&self) -> Result<Connection> {
        if let Some(parent) = self.db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let created = !self.db_path.exists();
        let conn = SqliteConnection::open(&self.db_path)?;
        bootstrap(&conn)?;
        if created {
            log::info!("Created snapshot database at {}", self.db_path.display());
        }
        Ok(conn)
    }

    /// A private database that lives as long as the connection
    pub fn in_memory() -> Result<Connection> {
        let conn = SqliteConnection::open_in_memory()?;
        bootstrap(&conn)?;
        Ok(conn)
    }

    pub fn exists(&self) -> bool {
        self.db_path.exists()
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }
}

/// Read the schema version recorded in `metadata`
pub fn schema_version(conn: &Connection) -> Result<i32> {
    let version: String = conn.query_row(
        "SELECT value FROM metadata WHERE key = 'schema_version'",
        [],
        |row| row.get(0),
    )?;

    version
        .parse::<i32>()
        .map_err(|_| Error::InvalidInput(format!("Invalid schema version: {}", version)))
}

fn bootstrap(conn: &Connection) -> Result<()> {
    conn.execute_batch(include_str!("../../schema.sql"))?;

    let version = schema_version(conn)?;
    if version > SCHEMA_VERSION {
        return Err(Error::InvalidInput(format!(
            "Database schema version {} is newer than supported version {}",
            version, SCHEMA_VERSION
        )));
    }
    Ok(())
}

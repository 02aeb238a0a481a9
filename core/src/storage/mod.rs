mod database;
mod snapshot_repository;
mod snapshot_store;

pub use database::{schema_version, Connection, Database, SCHEMA_VERSION};
pub use snapshot_repository::SnapshotRepository;
pub use snapshot_store::{
    load_snapshot, save_snapshot, ForestSnapshot, JournalSnapshot, MemoryStore, SnapshotStore,
    SqliteSnapshotStore, FOREST_KEY, JOURNAL_KEY,
};

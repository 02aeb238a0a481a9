//! The single place where journal and task state change.
//!
//! A [`Session`] owns the loaded journal, the task forest and the store they
//! came from. Commands go in through [`Session::dispatch_outline`] and
//! [`Session::dispatch_task`]; accepted ones replace the in-memory state and
//! are saved right away. Rejected ones leave everything as it was.

use crate::models::{DailyEntry, Journal, TaskNode};
use crate::outline::{self, OutlineCommand, Outcome};
use crate::storage::{
    load_snapshot, save_snapshot, ForestSnapshot, SnapshotStore, FOREST_KEY, JOURNAL_KEY,
};
use crate::tasks::{self, TaskCommand};
use crate::Result;
use chrono::NaiveDate;
use log::{info, warn};

pub struct Session<S: SnapshotStore> {
    store: S,
    journal: Journal,
    forest: Vec<TaskNode>,
    load_errors: Vec<String>,
}

impl<S: SnapshotStore> Session<S> {
    /// Load both snapshots from `store` and make sure `today` has an entry.
    ///
    /// A snapshot that cannot be read or decoded is replaced by the default
    /// (a seeded journal, an empty forest) and recorded in [`Self::load_errors`].
    /// Only saving can fail here.
    pub fn open(store: S, today: NaiveDate) -> Result<Self> {
        let mut load_errors = Vec::new();

        let mut journal = match load_snapshot::<Journal, _>(&store, JOURNAL_KEY) {
            Ok(Some(journal)) => journal,
            Ok(None) => {
                info!("No journal snapshot yet, starting a new one");
                Journal::seeded(today)
            }
            Err(e) => {
                warn!("Failed to load journal, starting fresh: {}", e);
                load_errors.push(format!("journal: {}", e));
                Journal::seeded(today)
            }
        };

        let mut forest = match load_snapshot::<ForestSnapshot, _>(&store, FOREST_KEY) {
            Ok(Some(snapshot)) => snapshot.forest,
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Failed to load task forest, starting empty: {}", e);
                load_errors.push(format!("tasks: {}", e));
                Vec::new()
            }
        };

        let mut forest_repaired = false;
        if !tasks::has_unique_ids(&forest) {
            let (deduped, dropped) = tasks::dedupe_ids(&forest);
            warn!("Task forest had {} duplicate ids, keeping the first of each", dropped);
            load_errors.push(format!("tasks: dropped {} tasks with duplicate ids", dropped));
            forest = deduped;
            forest_repaired = true;
        }

        let repaired = journal.normalize();
        if repaired {
            warn!("Journal snapshot needed repair");
        }
        let (_, created) = journal.get_or_create(today);

        info!(
            "Session opened: {} entries, {} root tasks",
            journal.len(),
            forest.len()
        );

        let mut session = Self {
            store,
            journal,
            forest,
            load_errors,
        };
        if repaired || created {
            session.save_journal()?;
        }
        if forest_repaired {
            session.save_forest()?;
        }
        Ok(session)
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    pub fn forest(&self) -> &[TaskNode] {
        &self.forest
    }

    pub fn entry(&self, date: NaiveDate) -> Option<&DailyEntry> {
        self.journal.get(date)
    }

    /// Entries that link to `date`, newest first
    pub fn backlinks(&self, date: NaiveDate) -> Vec<&DailyEntry> {
        self.journal.backlinks(date)
    }

    /// Problems met while loading, for the UI to surface
    pub fn load_errors(&self) -> &[String] {
        &self.load_errors
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get the entry for `date`, creating and saving a seeded one if needed
    pub fn ensure_entry(&mut self, date: NaiveDate) -> Result<&DailyEntry> {
        let (_, created) = self.journal.get_or_create(date);
        if created {
            info!("Created entry for {}", date);
            self.save_journal()?;
        }
        self.journal
            .get(date)
            .ok_or_else(|| crate::Error::NotFound(format!("Entry not found: {}", date)))
    }

    /// Run an outline command against the entry for `date`.
    ///
    /// Returns `Ok(None)` when the date has no entry or the command was
    /// rejected. Edits are saved before returning.
    pub fn dispatch_outline(
        &mut self,
        date: NaiveDate,
        command: &OutlineCommand,
    ) -> Result<Option<Outcome>> {
        let Some(entry) = self.journal.get(date) else {
            return Ok(None);
        };
        let Some(outcome) = outline::apply(entry, command) else {
            return Ok(None);
        };

        if let Outcome::Edited(edit) = &outcome {
            self.journal.replace(edit.entry.clone());
            self.save_journal()?;
        }
        Ok(Some(outcome))
    }

    /// Run a task command. Returns whether the forest changed.
    pub fn dispatch_task(&mut self, command: &TaskCommand) -> Result<bool> {
        let Some(forest) = tasks::apply(&self.forest, command) else {
            return Ok(false);
        };

        self.forest = forest;
        self.save_forest()?;
        Ok(true)
    }

    fn save_journal(&mut self) -> Result<()> {
        save_snapshot(&mut self.store, JOURNAL_KEY, &self.journal)
    }

    fn save_forest(&mut self) -> Result<()> {
        let snapshot = ForestSnapshot {
            forest: self.forest.clone(),
        };
        save_snapshot(&mut self.store, FOREST_KEY, &snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OutlineBlock, TaskStatus};
    use crate::outline::{Caret, FocusTarget};
    use crate::storage::{MemoryStore, SqliteSnapshotStore};
    use tempfile::tempdir;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn shape(entry: &DailyEntry) -> Vec<(String, usize)> {
        entry
            .blocks()
            .iter()
            .map(|b| (b.content.clone(), b.level))
            .collect()
    }

    #[test]
    fn test_open_empty_store_seeds_today() {
        let session = Session::open(MemoryStore::new(), day(1)).unwrap();

        let entry = session.entry(day(1)).unwrap();
        assert_eq!(entry.len(), 1);
        assert!(entry.blocks()[0].is_empty());
        assert!(session.forest().is_empty());
        assert!(session.load_errors().is_empty());
        assert_eq!(session.store().save_count(), 1);
    }

    #[test]
    fn test_typing_scenario() {
        let mut session = Session::open(MemoryStore::new(), day(1)).unwrap();
        let first = session.entry(day(1)).unwrap().blocks()[0].id.clone();

        session
            .dispatch_outline(
                day(1),
                &OutlineCommand::SetContent {
                    block_id: first.clone(),
                    content: "Hello".to_string(),
                },
            )
            .unwrap();

        let outcome = session
            .dispatch_outline(
                day(1),
                &OutlineCommand::Split {
                    block_id: first.clone(),
                    cursor: 5,
                },
            )
            .unwrap();
        let Some(Outcome::Edited(edit)) = outcome else {
            panic!("split should edit the entry");
        };
        let second = edit.focus.unwrap().block_id;
        assert_ne!(second, first);

        session
            .dispatch_outline(day(1), &OutlineCommand::Indent { block_id: second.clone() })
            .unwrap();
        session
            .dispatch_outline(
                day(1),
                &OutlineCommand::SetContent {
                    block_id: second,
                    content: "World".to_string(),
                },
            )
            .unwrap();

        assert_eq!(
            shape(session.entry(day(1)).unwrap()),
            vec![("Hello".to_string(), 0), ("World".to_string(), 1)]
        );
    }

    #[test]
    fn test_rejected_command_does_not_save() {
        let mut session = Session::open(MemoryStore::new(), day(1)).unwrap();
        let first = session.entry(day(1)).unwrap().blocks()[0].id.clone();
        let saves = session.store().save_count();

        let outcome = session
            .dispatch_outline(day(1), &OutlineCommand::Indent { block_id: first })
            .unwrap();
        assert!(outcome.is_none());

        let outcome = session
            .dispatch_outline(day(2), &OutlineCommand::Remove { block_id: "x".to_string() })
            .unwrap();
        assert!(outcome.is_none());
        assert_eq!(session.store().save_count(), saves);
    }

    #[test]
    fn test_focus_moves_are_not_saved() {
        let mut session = Session::open(MemoryStore::new(), day(1)).unwrap();
        let first = session.entry(day(1)).unwrap().blocks()[0].id.clone();
        let Some(Outcome::Edited(edit)) = session
            .dispatch_outline(day(1), &OutlineCommand::InsertAfter { block_id: first.clone() })
            .unwrap()
        else {
            panic!("insert should edit the entry");
        };
        let second = edit.focus.unwrap().block_id;
        let saves = session.store().save_count();

        let outcome = session
            .dispatch_outline(
                day(1),
                &OutlineCommand::MoveFocus {
                    block_id: second,
                    direction: crate::outline::Direction::Up,
                    cursor: 0,
                },
            )
            .unwrap();
        assert_eq!(
            outcome,
            Some(Outcome::Focus(FocusTarget::new(first, Caret::Preserve)))
        );
        assert_eq!(session.store().save_count(), saves);
    }

    #[test]
    fn test_dispatch_task() {
        let mut session = Session::open(MemoryStore::new(), day(1)).unwrap();

        let parent = TaskNode::with_id("p", "Plan week");
        assert!(session
            .dispatch_task(&TaskCommand::Add { task: parent, parent_id: None })
            .unwrap());
        assert!(session
            .dispatch_task(&TaskCommand::Add {
                task: TaskNode::with_id("c", "Book room"),
                parent_id: Some("p".to_string()),
            })
            .unwrap());
        assert!(!session
            .dispatch_task(&TaskCommand::Delete { task_id: "missing".to_string() })
            .unwrap());

        assert!(session
            .dispatch_task(&TaskCommand::SetStatus {
                task_id: "p".to_string(),
                status: TaskStatus::Completed,
                cascade: true,
            })
            .unwrap());

        let parent = tasks::find_task(session.forest(), "p").unwrap();
        assert!(parent.is_completed());
        assert!(parent.children[0].is_completed());

        let saved: ForestSnapshot = load_snapshot(session.store(), FOREST_KEY).unwrap().unwrap();
        assert_eq!(saved.forest, session.forest());
    }

    #[test]
    fn test_corrupt_snapshot_falls_back() {
        let mut store = MemoryStore::new();
        store.insert_raw(JOURNAL_KEY, "[[[");
        store.insert_raw(FOREST_KEY, "{\"forest\": 3}");

        let session = Session::open(store, day(1)).unwrap();
        assert_eq!(session.journal().len(), 1);
        assert!(session.forest().is_empty());
        assert_eq!(session.load_errors().len(), 2);
    }

    #[test]
    fn test_loaded_journal_is_repaired() {
        let mut store = MemoryStore::new();
        store.insert_raw(
            JOURNAL_KEY,
            r#"{"entries":[
                {"date":"2024-01-01","blocks":[]},
                {"date":"2024-01-01","blocks":[{"id":"a","content":"dup","level":0}]},
                {"date":"2024-01-02","nodes":[{"id":"b","content":"x","level":3}]}
            ]}"#,
        );

        let session = Session::open(store, day(2)).unwrap();
        assert_eq!(session.journal().len(), 2);
        assert_eq!(session.entry(day(1)).unwrap().len(), 1);
        assert_eq!(session.entry(day(2)).unwrap().blocks()[0].level, 0);
        assert!(session.load_errors().is_empty());
    }

    #[test]
    fn test_forest_with_duplicate_ids_is_repaired() {
        let mut store = MemoryStore::new();
        store.insert_raw(
            FOREST_KEY,
            r#"{"forest":[
                {"id":"a","title":"A"},
                {"id":"b","title":"B","children":[{"id":"a","title":"again"}]},
                {"id":"c","title":"C"}
            ]}"#,
        );

        let mut session = Session::open(store, day(1)).unwrap();
        assert!(tasks::has_unique_ids(session.forest()));
        assert_eq!(session.load_errors().len(), 1);
        let saved: ForestSnapshot = load_snapshot(session.store(), FOREST_KEY).unwrap().unwrap();
        assert_eq!(saved.forest, session.forest());

        let changed = session
            .dispatch_task(&TaskCommand::SetStatus {
                task_id: "c".into(),
                status: TaskStatus::Completed,
                cascade: false,
            })
            .unwrap();
        assert!(changed);
        assert!(tasks::find_task(session.forest(), "c").unwrap().is_completed());
    }

    #[test]
    fn test_ensure_entry_and_backlinks() {
        let mut session = Session::open(MemoryStore::new(), day(2)).unwrap();
        let created = session.ensure_entry(day(1)).unwrap().clone();
        assert_eq!(created.len(), 1);
        let block = created.blocks()[0].id.clone();

        session
            .dispatch_outline(
                day(1),
                &OutlineCommand::SetContent {
                    block_id: block,
                    content: "see [[2024-01-02]]".to_string(),
                },
            )
            .unwrap();

        let links: Vec<NaiveDate> = session.backlinks(day(2)).iter().map(|e| e.date()).collect();
        assert_eq!(links, vec![day(1)]);
        assert!(session.backlinks(day(1)).is_empty());
    }

    #[test]
    fn test_state_survives_reopen() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("dayline.db");

        {
            let store = SqliteSnapshotStore::open(&db_path).unwrap();
            let mut session = Session::open(store, day(1)).unwrap();
            let first = session.entry(day(1)).unwrap().blocks()[0].id.clone();
            session
                .dispatch_outline(
                    day(1),
                    &OutlineCommand::SetContent {
                        block_id: first,
                        content: "kept".to_string(),
                    },
                )
                .unwrap();
            session
                .dispatch_task(&TaskCommand::Add {
                    task: TaskNode::new("Water plants"),
                    parent_id: None,
                })
                .unwrap();
        }

        let store = SqliteSnapshotStore::open(&db_path).unwrap();
        let session = Session::open(store, day(1)).unwrap();
        let blocks: Vec<OutlineBlock> = session.entry(day(1)).unwrap().blocks().to_vec();
        assert_eq!(blocks[0].content, "kept");
        assert_eq!(session.forest()[0].title, "Water plants");
    }
}

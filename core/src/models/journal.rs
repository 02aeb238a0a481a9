use super::{date_link, DailyEntry};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Every daily entry the user has written, at most one per date.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Journal {
    entries: Vec<DailyEntry>,
}

impl Journal {
    /// Create an empty journal
    pub fn new() -> Self {
        Self::default()
    }

    /// The default journal: one entry for `today` with one empty block
    pub fn seeded(today: NaiveDate) -> Self {
        Self {
            entries: vec![DailyEntry::new(today)],
        }
    }

    /// Build a journal from loaded entries, dropping duplicate dates
    /// (the first occurrence wins) and repairing each entry's shape
    pub fn from_entries(entries: Vec<DailyEntry>) -> Self {
        let mut journal = Self { entries };
        journal.normalize();
        journal
    }

    pub fn entries(&self) -> &[DailyEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, date: NaiveDate) -> Option<&DailyEntry> {
        self.entries.iter().find(|e| e.date() == date)
    }

    /// Get the entry for a date, creating a seeded one on first access.
    /// Returns the entry and whether it was just created.
    pub fn get_or_create(&mut self, date: NaiveDate) -> (&DailyEntry, bool) {
        match self.entries.iter().position(|e| e.date() == date) {
            Some(index) => (&self.entries[index], false),
            None => {
                self.entries.push(DailyEntry::new(date));
                let last = self.entries.len() - 1;
                (&self.entries[last], true)
            }
        }
    }

    /// Swap in a new value for the entry with the same date.
    /// Returns false when the journal has no entry for that date.
    pub fn replace(&mut self, entry: DailyEntry) -> bool {
        match self.entries.iter_mut().find(|e| e.date() == entry.date()) {
            Some(slot) => {
                *slot = entry;
                true
            }
            None => false,
        }
    }

    /// Entries sorted with the most recent date first
    pub fn newest_first(&self) -> Vec<&DailyEntry> {
        let mut sorted: Vec<&DailyEntry> = self.entries.iter().collect();
        sorted.sort_by(|a, b| b.date().cmp(&a.date()));
        sorted
    }

    /// Other entries that reference `[[date]]` somewhere in their blocks,
    /// most recent first
    pub fn backlinks(&self, date: NaiveDate) -> Vec<&DailyEntry> {
        let link = date_link(date);
        self.newest_first()
            .into_iter()
            .filter(|e| e.date() != date && e.links_to(&link))
            .collect()
    }

    /// Drop duplicate dates and repair every entry. Returns true when anything changed.
    pub fn normalize(&mut self) -> bool {
        let before = self.entries.len();
        let mut seen = HashSet::new();
        self.entries.retain(|e| seen.insert(e.date()));

        let mut changed = before != self.entries.len();
        for entry in &mut self.entries {
            changed |= entry.normalize();
        }
        changed
    }
}

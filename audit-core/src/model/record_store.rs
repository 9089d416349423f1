//! src/model/record_store.rs
//! ============================================================================
//! # RecordStore: owner of the flat record collection
//!
//! CRUD plus the two path mutations that back renames and moves. Id-keyed
//! edits on an unknown id are silent no-ops (they return `false`/`None`),
//! since UI state may briefly reference a record that was just deleted.
//!
//! Path uniqueness is enforced for interactive edits (`add`, renames, prefix
//! rewrites). Bulk `replace_all` accepts duplicate paths as-is so legacy
//! imports still load; the tree keeps such records as distinct leaves.

use ahash::{AHashMap, AHashSet};
use chrono::{DateTime, Utc};
use tracing::{debug, trace};

use crate::{
    error::StoreError,
    model::{
        path,
        record::{FileRecord, Priority, RecordId},
    },
};

#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<FileRecord>,
    index: AHashMap<RecordId, usize>,
    /// Bumped on every mutation; persistence keys off it.
    revision: u64,
}

impl RecordStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from an existing collection (see [`Self::replace_all`]).
    #[must_use]
    pub fn from_records(records: Vec<FileRecord>) -> Self {
        let mut store = Self::new();
        store.replace_all(records);
        store.revision = 0;
        store
    }

    /// Records in insertion order.
    #[must_use]
    pub fn records(&self) -> &[FileRecord] {
        &self.records
    }

    #[must_use]
    pub fn get(&self, id: &RecordId) -> Option<&FileRecord> {
        self.index.get(id).map(|&idx| &self.records[idx])
    }

    #[must_use]
    pub fn find_by_path(&self, path: &str) -> Option<&FileRecord> {
        self.records.iter().find(|record| record.path == path)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Add a record, rejecting empty paths and path/id collisions.
    pub fn add(&mut self, record: FileRecord) -> Result<RecordId, StoreError> {
        if record.path.trim().is_empty() {
            return Err(StoreError::EmptyPath);
        }
        if self.find_by_path(&record.path).is_some() {
            return Err(StoreError::DuplicatePath(record.path));
        }
        if self.index.contains_key(&record.id) {
            return Err(StoreError::DuplicateId(record.id.to_string()));
        }

        debug!(id = %record.id, path = %record.path, "record added");
        let id = record.id.clone();
        self.index.insert(id.clone(), self.records.len());
        self.records.push(record);
        self.touch();
        Ok(id)
    }

    /// Remove a record. Irreversible; `None` when the id is unknown.
    pub fn delete(&mut self, id: &RecordId) -> Option<FileRecord> {
        let Some(idx) = self.index.get(id).copied() else {
            debug!(%id, "delete ignored: unknown record");
            return None;
        };

        let removed = self.records.remove(idx);
        self.reindex();
        self.touch();
        debug!(%id, path = %removed.path, "record deleted");
        Some(removed)
    }

    /// Set the checked flag, stamping `checked_at` with the current time.
    pub fn set_checked(&mut self, id: &RecordId, checked: bool) -> bool {
        self.set_checked_at(id, checked, Utc::now())
    }

    /// Set the checked flag with an explicit clock reading.
    pub fn set_checked_at(&mut self, id: &RecordId, checked: bool, now: DateTime<Utc>) -> bool {
        let changed = self
            .record_mut(id)
            .is_some_and(|record| record.set_checked(checked, now));
        if changed {
            self.touch();
        }
        changed
    }

    /// Flip the checked flag. Returns the new value, `None` for unknown ids.
    pub fn toggle_checked(&mut self, id: &RecordId, now: DateTime<Utc>) -> Option<bool> {
        let target = !self.get(id)?.checked;
        self.set_checked_at(id, target, now);
        Some(target)
    }

    pub fn set_notes(&mut self, id: &RecordId, notes: impl Into<String>) -> bool {
        let notes = notes.into();
        self.update(id, |record| {
            if record.notes == notes {
                return false;
            }
            record.notes = notes;
            true
        })
    }

    pub fn set_priority(&mut self, id: &RecordId, priority: Priority) -> bool {
        self.update(id, |record| {
            let changed = record.priority != priority;
            record.priority = priority;
            changed
        })
    }

    pub fn set_has_changes(&mut self, id: &RecordId, has_changes: bool) -> bool {
        self.update(id, |record| {
            let changed = record.has_changes != has_changes;
            record.has_changes = has_changes;
            changed
        })
    }

    /// Drop every record. Returns how many were removed.
    pub fn clear_all(&mut self) -> usize {
        let removed = self.records.len();
        self.records.clear();
        self.index.clear();
        self.touch();
        debug!(removed, "record store cleared");
        removed
    }

    /// Replace the whole collection (import).
    ///
    /// Colliding ids are regenerated so id-keyed edits stay unambiguous.
    pub fn replace_all(&mut self, records: Vec<FileRecord>) {
        let mut seen: AHashSet<RecordId> = AHashSet::with_capacity(records.len());
        self.records = records
            .into_iter()
            .map(|mut record| {
                if !seen.insert(record.id.clone()) {
                    trace!(id = %record.id, "regenerating duplicate record id");
                    record.id = RecordId::generate();
                    seen.insert(record.id.clone());
                }
                record
            })
            .collect();
        self.reindex();
        self.touch();
        debug!(count = self.records.len(), "record collection replaced");
    }

    /// Give one record a new path.
    ///
    /// `Ok(false)` for unknown ids or an unchanged path.
    pub fn rename_record_path(
        &mut self,
        id: &RecordId,
        new_path: impl Into<String>,
    ) -> Result<bool, StoreError> {
        let new_path = new_path.into();
        if new_path.trim().is_empty() {
            return Err(StoreError::EmptyPath);
        }
        let Some(current) = self.get(id) else {
            debug!(%id, "rename ignored: unknown record");
            return Ok(false);
        };
        if current.path == new_path {
            return Ok(false);
        }
        if self.find_by_path(&new_path).is_some() {
            return Err(StoreError::DuplicatePath(new_path));
        }

        debug!(%id, %new_path, "record path renamed");
        self.update(id, |record| {
            record.path = new_path;
            true
        });
        Ok(true)
    }

    /// Rewrite the leading `old_prefix` of every matching path.
    ///
    /// A path matches when it equals `old_prefix` or starts with
    /// `old_prefix/`; the remainder is kept verbatim. All-or-nothing: if any
    /// rewritten path collides with a record outside the moved set, nothing
    /// changes. Returns the number of rewritten records.
    pub fn rewrite_path_prefix(
        &mut self,
        old_prefix: &str,
        new_prefix: &str,
    ) -> Result<usize, StoreError> {
        if old_prefix.is_empty() || old_prefix == new_prefix {
            return Ok(0);
        }
        if new_prefix.trim().is_empty() {
            return Err(StoreError::EmptyPath);
        }

        let rewrites: Vec<(usize, String)> = self
            .records
            .iter()
            .enumerate()
            .filter_map(|(idx, record)| {
                path::rewrite_prefix(&record.path, old_prefix, new_prefix).map(|p| (idx, p))
            })
            .collect();
        if rewrites.is_empty() {
            return Ok(0);
        }

        let moved: AHashSet<usize> = rewrites.iter().map(|(idx, _)| *idx).collect();
        let untouched: AHashSet<&str> = self
            .records
            .iter()
            .enumerate()
            .filter(|(idx, _)| !moved.contains(idx))
            .map(|(_, record)| record.path.as_str())
            .collect();
        if let Some((_, clash)) = rewrites.iter().find(|(_, p)| untouched.contains(p.as_str())) {
            return Err(StoreError::DuplicatePath(clash.clone()));
        }

        let count = rewrites.len();
        for (idx, new_path) in rewrites {
            self.records[idx].path = new_path;
        }
        self.touch();
        debug!(old_prefix, new_prefix, count, "path prefix rewritten");
        Ok(count)
    }

    fn record_mut(&mut self, id: &RecordId) -> Option<&mut FileRecord> {
        match self.index.get(id) {
            Some(&idx) => Some(&mut self.records[idx]),
            None => {
                debug!(%id, "edit ignored: unknown record");
                None
            }
        }
    }

    fn update<F>(&mut self, id: &RecordId, edit: F) -> bool
    where
        F: FnOnce(&mut FileRecord) -> bool,
    {
        let changed = self.record_mut(id).is_some_and(edit);
        if changed {
            self.touch();
        }
        changed
    }

    fn reindex(&mut self) {
        self.index = self
            .records
            .iter()
            .enumerate()
            .map(|(idx, record)| (record.id.clone(), idx))
            .collect();
    }

    const fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(paths: &[&str]) -> RecordStore {
        RecordStore::from_records(
            paths
                .iter()
                .enumerate()
                .map(|(idx, p)| FileRecord::new(*p).with_id(idx.to_string()))
                .collect(),
        )
    }

    fn paths(store: &RecordStore) -> Vec<&str> {
        let mut out: Vec<&str> = store.records().iter().map(|r| r.path.as_str()).collect();
        out.sort_unstable();
        out
    }

    #[test]
    fn test_add_rejects_duplicate_path() {
        let mut store = store_with(&["a/x.txt"]);

        let err = store.add(FileRecord::new("a/x.txt")).unwrap_err();
        assert_eq!(err, StoreError::DuplicatePath("a/x.txt".into()));
        assert_eq!(store.add(FileRecord::new("  ")), Err(StoreError::EmptyPath));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_unknown_id_edits_are_noops() {
        let mut store = store_with(&["a/x.txt"]);
        let ghost = RecordId::from("missing");
        let rev = store.revision();

        assert!(!store.set_checked(&ghost, true));
        assert!(!store.set_notes(&ghost, "hi"));
        assert!(!store.set_priority(&ghost, Priority::High));
        assert!(!store.set_has_changes(&ghost, true));
        assert!(store.delete(&ghost).is_none());
        assert_eq!(store.rename_record_path(&ghost, "b.txt"), Ok(false));
        assert_eq!(store.revision(), rev);
    }

    #[test]
    fn test_set_checked_stamps_timestamp() {
        let mut store = store_with(&["a/x.txt"]);
        let id = RecordId::from("0");
        let now = Utc::now();

        assert!(store.set_checked_at(&id, true, now));
        assert_eq!(store.get(&id).unwrap().checked_at, Some(now));
        assert_eq!(store.toggle_checked(&id, now), Some(false));
        assert!(store.get(&id).unwrap().checked_at.is_none());
    }

    #[test]
    fn test_delete_keeps_index_consistent() {
        let mut store = store_with(&["a.txt", "b.txt", "c.txt"]);

        let removed = store.delete(&RecordId::from("0")).unwrap();
        assert_eq!(removed.path, "a.txt");
        assert_eq!(store.get(&RecordId::from("2")).unwrap().path, "c.txt");
        assert!(store.set_notes(&RecordId::from("1"), "still reachable"));
    }

    #[test]
    fn test_rewrite_path_prefix_exact_and_nested() {
        let mut store = store_with(&["src/a.js", "src/lib/b.js", "srcx/c.js", "src"]);

        let count = store.rewrite_path_prefix("src", "dst/src").unwrap();
        assert_eq!(count, 3);
        assert_eq!(paths(&store), vec!["dst/src", "dst/src/a.js", "dst/src/lib/b.js", "srcx/c.js"]);
    }

    #[test]
    fn test_rewrite_path_prefix_collision_is_all_or_nothing() {
        let mut store = store_with(&["src/a.js", "src/b.js", "dst/src/b.js"]);

        let err = store.rewrite_path_prefix("src", "dst/src").unwrap_err();
        assert_eq!(err, StoreError::DuplicatePath("dst/src/b.js".into()));
        assert_eq!(paths(&store), vec!["dst/src/b.js", "src/a.js", "src/b.js"]);
    }

    #[test]
    fn test_replace_all_regenerates_colliding_ids() {
        let mut store = RecordStore::new();
        store.replace_all(vec![
            FileRecord::new("a.txt").with_id("1"),
            FileRecord::new("b.txt").with_id("1"),
        ]);

        assert_eq!(store.len(), 2);
        assert_ne!(store.records()[0].id, store.records()[1].id);
        assert_eq!(store.get(&RecordId::from("1")).unwrap().path, "a.txt");
    }

    #[test]
    fn test_clear_all() {
        let mut store = store_with(&["a.txt", "b/c.txt"]);
        assert_eq!(store.clear_all(), 2);
        assert!(store.is_empty());
    }
}

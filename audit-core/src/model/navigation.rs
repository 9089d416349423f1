//! src/model/navigation.rs
//! ============================================================================
//! # NavigationState: folder selection, highlighted file, expanded folders
//!
//! Plain state object mutated by tree interactions. It never reads ambient
//! UI state; callers pass the current records where an operation needs them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::trace;

use crate::model::{
    path,
    record::{FileRecord, RecordId},
    tree,
};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NavigationState {
    /// `None` is the "All Files" scope.
    pub selected_folder: Option<String>,

    pub active_file_id: Option<RecordId>,

    pub expanded_folders: BTreeSet<String>,

    /// Set once the first-load expansion has been applied.
    initialized: bool,
}

impl NavigationState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// One-time first-load setup: open every depth-1 folder.
    ///
    /// No-op once applied (including for state restored from storage), so
    /// later record changes never re-expand folders the user closed.
    pub fn ensure_initialized(&mut self, records: &[FileRecord]) {
        if self.initialized {
            return;
        }
        if self.expanded_folders.is_empty() {
            self.expanded_folders = tree::top_level_folders(records);
        }
        self.initialized = true;
    }

    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Scope the file list to a folder (or "All Files"); clears the highlight.
    pub fn select_folder(&mut self, folder: Option<String>) {
        trace!(?folder, "folder selected");
        self.selected_folder = folder;
        self.active_file_id = None;
    }

    /// Open a closed folder or close an open one. Returns the new state.
    pub fn toggle_folder_expand(&mut self, folder: &str) -> bool {
        if self.expanded_folders.remove(folder) {
            false
        } else {
            self.expanded_folders.insert(folder.to_string());
            true
        }
    }

    pub fn expand_folder(&mut self, folder: &str) {
        self.expanded_folders.insert(folder.to_string());
    }

    pub fn collapse_all(&mut self) {
        self.expanded_folders.clear();
    }

    #[must_use]
    pub fn is_expanded(&self, folder: &str) -> bool {
        self.expanded_folders.contains(folder)
    }

    /// Open every ancestor of the record, scope to its parent, highlight it.
    pub fn reveal_file(&mut self, record: &FileRecord) {
        self.expanded_folders
            .extend(path::ancestor_folders(&record.path).map(str::to_string));
        self.selected_folder = record.folder().map(str::to_string);
        self.active_file_id = Some(record.id.clone());
        trace!(id = %record.id, "file revealed");
    }

    /// Re-scan: drop selection and highlight, reopen exactly the depth-1
    /// folders of the current records.
    pub fn refresh(&mut self, records: &[FileRecord]) {
        self.selected_folder = None;
        self.active_file_id = None;
        self.expanded_folders = tree::top_level_folders(records);
        self.initialized = true;
    }

    /// Follow a folder move/rename: rewrite selected and expanded paths
    /// under `old_prefix` so the relocated subtree stays open.
    pub fn rewrite_folder_prefix(&mut self, old_prefix: &str, new_prefix: &str) {
        if let Some(selected) = self.selected_folder.as_deref()
            && let Some(moved) = path::rewrite_prefix(selected, old_prefix, new_prefix)
        {
            self.selected_folder = Some(moved);
        }

        self.expanded_folders = std::mem::take(&mut self.expanded_folders)
            .into_iter()
            .map(|folder| path::rewrite_prefix(&folder, old_prefix, new_prefix).unwrap_or(folder))
            .collect();

        // keep the new parent chain open
        self.expanded_folders
            .extend(path::ancestor_folders(new_prefix).map(str::to_string));
    }

    /// Forget a highlight that points at a record that no longer exists.
    pub fn forget_record(&mut self, id: &RecordId) {
        if self.active_file_id.as_ref() == Some(id) {
            self.active_file_id = None;
        }
    }
}

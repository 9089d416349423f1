//! src/controller/session.rs
//! ============================================================================
//! # AuditSession: one checklist, its view state and its pending writes
//!
//! The session owns the record store (single source of truth) plus the
//! navigation, filter and drag state that front ends drive. Every change
//! goes through [`AuditSession::dispatch`]; derived data (tree, completion,
//! visible list) is recomputed from the records on demand.
//!
//! Debounced work (notes typing, search typing, persistence) is held in
//! caller-driven [`PendingWrite`] slots. The owner calls [`AuditSession::poll`]
//! from its timer and [`AuditSession::flush`] on focus loss or shutdown;
//! either returns `true` when the record collection should be written out.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::{
    config::DebounceSettings,
    controller::{
        actions::Action,
        move_engine::{self, DragState, MoveOp, NodeRef},
    },
    error::AppError,
    exchange::{
        export::{ExportDocument, export_file_name},
        import::parse_import,
    },
    model::{
        filter::{AuditStats, FilterState, FilteredView, audit_stats, compute_visible},
        navigation::NavigationState,
        path,
        record::{FileRecord, RecordId},
        record_store::RecordStore,
        tree::{self, FileTree, FolderCompletion},
    },
    util::debounce::PendingWrite,
};

/// Navigation plus filters: the part of the UI state worth restoring.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewState {
    pub navigation: NavigationState,
    pub filter: FilterState,
}

/// Wall-clock and monotonic time of one event.
#[derive(Debug, Clone, Copy)]
pub struct Moment {
    /// Stamps `checkedAt`, imports and exports.
    pub wall: DateTime<Utc>,
    /// Drives the debounce timers.
    pub instant: Instant,
}

impl Moment {
    #[must_use]
    pub fn now() -> Self {
        Self {
            wall: Utc::now(),
            instant: Instant::now(),
        }
    }
}

/// What a dispatched action did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing changed (unknown id, value already set, ...).
    Unchanged,
    Updated,
    Added(RecordId),
    Removed(FileRecord),
    /// New checked flag after a toggle.
    Checked(bool),
    /// Number of records whose path changed.
    Moved(usize),
    /// Collection replaced by an import of this many records.
    Replaced(usize),
    Cleared(usize),
    /// Drag hover: whether the target is highlighted as a valid drop.
    Highlighted(bool),
    /// Input buffered until its debounce window passes.
    Pending,
}

#[derive(Debug)]
pub struct AuditSession {
    store: RecordStore,
    navigation: NavigationState,
    filter: FilterState,
    drag: DragState,
    notes_input: PendingWrite<(RecordId, String)>,
    search_input: PendingWrite<String>,
    persist: PendingWrite<u64>,
}

impl AuditSession {
    /// Start a session over a loaded collection and restored view state.
    #[must_use]
    pub fn new(records: Vec<FileRecord>, view: ViewState, debounce: &DebounceSettings) -> Self {
        let store = RecordStore::from_records(records);
        let ViewState {
            mut navigation,
            filter,
        } = view;
        navigation.ensure_initialized(store.records());

        info!(records = store.len(), "audit session started");
        Self {
            store,
            navigation,
            filter,
            drag: DragState::default(),
            notes_input: PendingWrite::new(debounce.notes),
            search_input: PendingWrite::new(debounce.search),
            persist: PendingWrite::new(debounce.persist),
        }
    }

    /* ----------------------------- reads ------------------------------ */

    #[must_use]
    pub fn records(&self) -> &[FileRecord] {
        self.store.records()
    }

    #[must_use]
    pub const fn store(&self) -> &RecordStore {
        &self.store
    }

    #[must_use]
    pub const fn navigation(&self) -> &NavigationState {
        &self.navigation
    }

    #[must_use]
    pub const fn filter(&self) -> &FilterState {
        &self.filter
    }

    #[must_use]
    pub const fn drag(&self) -> &DragState {
        &self.drag
    }

    #[must_use]
    pub fn view_state(&self) -> ViewState {
        ViewState {
            navigation: self.navigation.clone(),
            filter: self.filter.clone(),
        }
    }

    #[must_use]
    pub fn tree(&self) -> FileTree<'_> {
        tree::build_tree(self.store.records())
    }

    #[must_use]
    pub fn completion(&self) -> FolderCompletion {
        tree::folder_completion(self.store.records())
    }

    /// Records visible under the current folder scope and filters.
    #[must_use]
    pub fn visible(&self) -> FilteredView<'_> {
        compute_visible(
            self.store.records(),
            self.navigation.selected_folder.as_deref(),
            &self.filter,
        )
    }

    #[must_use]
    pub fn stats(&self) -> AuditStats {
        audit_stats(self.store.records())
    }

    /// Parent folders offered by the add-file folder picker.
    #[must_use]
    pub fn unique_folders(&self) -> Vec<String> {
        tree::unique_folders(self.store.records())
    }

    /// Snapshot of the visible records, with its suggested file name.
    #[must_use]
    pub fn export(&self, now: DateTime<Utc>) -> (String, ExportDocument) {
        let selected = self.navigation.selected_folder.as_deref();
        let doc = ExportDocument::from_visible(self.visible().visible, selected, now);
        (export_file_name(selected, now), doc)
    }

    /* --------------------------- dispatch ----------------------------- */

    pub fn dispatch(&mut self, action: Action) -> Result<Outcome, AppError> {
        self.dispatch_at(action, Moment::now())
    }

    /// Apply one action at a given time.
    ///
    /// Errors are recoverable rejections: the records are left as they were
    /// and any drag gesture is back to idle.
    pub fn dispatch_at(&mut self, action: Action, now: Moment) -> Result<Outcome, AppError> {
        if action.is_view_only() {
            trace!(?action, "dispatch");
        } else {
            debug!(?action, "dispatch");
        }

        let revision = self.store.revision();
        let outcome = self.apply(action, now);
        self.schedule_persist_if_changed(revision, now.instant);
        outcome
    }

    fn apply(&mut self, action: Action, now: Moment) -> Result<Outcome, AppError> {
        let outcome = match action {
            Action::AddFile(path) => {
                Outcome::Added(self.store.add(FileRecord::new(path.trim()))?)
            }
            Action::AddFileInFolder { folder, name } => {
                Outcome::Added(self.add_file_in_folder(&folder, &name)?)
            }
            Action::CreateFolder(name) => Outcome::Added(self.create_folder(&name)?),
            Action::Delete(id) => self.delete(&id),
            Action::SetChecked { id, checked } => {
                changed(self.store.set_checked_at(&id, checked, now.wall))
            }
            Action::ToggleChecked(id) => self
                .store
                .toggle_checked(&id, now.wall)
                .map_or(Outcome::Unchanged, Outcome::Checked),
            Action::SetNotes { id, notes } => {
                self.settle_notes(&id);
                changed(self.store.set_notes(&id, notes))
            }
            Action::NotesInput { id, text } => self.notes_input(id, text, now.instant),
            Action::SetPriority { id, priority } => changed(self.store.set_priority(&id, priority)),
            Action::SetHasChanges { id, has_changes } => {
                changed(self.store.set_has_changes(&id, has_changes))
            }
            Action::ClearAll => {
                self.notes_input.cancel();
                self.navigation.active_file_id = None;
                Outcome::Cleared(self.store.clear_all())
            }
            Action::RenameRecord { id, path } => {
                changed(self.store.rename_record_path(&id, path.trim())?)
            }
            Action::RenameFolder { old, new } => Outcome::Moved(self.rename_folder(&old, &new)?),
            Action::Import(text) => Outcome::Replaced(self.import_text(&text, now.wall)?),

            Action::Move { source, target } => {
                let op = move_engine::plan_move(&self.store, Some(&source), Some(&target))?;
                Outcome::Moved(self.apply_move(&op)?)
            }
            Action::DragStart(source) => {
                self.drag.drag_start(source);
                Outcome::Updated
            }
            Action::DragOver(target) => Outcome::Highlighted(self.drag.drag_over(&self.store, target)),
            Action::DragLeave => {
                self.drag.drag_leave();
                Outcome::Updated
            }
            Action::Drop(target) => {
                let op = self.drag.drop_on(&self.store, target.as_ref())?;
                Outcome::Moved(self.apply_move(&op)?)
            }
            Action::DragEnd => {
                self.drag.drag_end();
                Outcome::Updated
            }

            Action::SelectFolder(folder) => {
                self.navigation.select_folder(folder);
                Outcome::Updated
            }
            Action::ToggleFolder(folder) => {
                self.navigation.toggle_folder_expand(&folder);
                Outcome::Updated
            }
            Action::ExpandFolder(folder) => {
                self.navigation.expand_folder(&folder);
                Outcome::Updated
            }
            Action::CollapseAll => {
                self.navigation.collapse_all();
                Outcome::Updated
            }
            Action::RevealFile(id) => match self.store.get(&id) {
                Some(record) => {
                    self.navigation.reveal_file(record);
                    Outcome::Updated
                }
                None => Outcome::Unchanged,
            },
            Action::Refresh => {
                self.navigation.refresh(self.store.records());
                Outcome::Updated
            }

            Action::SetStatusFilter(status) => {
                self.filter.status_filter = status;
                Outcome::Updated
            }
            Action::SetPriorityFilter(priority) => {
                self.filter.priority_filter = priority;
                Outcome::Updated
            }
            Action::SetSearch(text) => {
                self.search_input.cancel();
                self.filter.search_text = text;
                Outcome::Updated
            }
            Action::SearchInput(text) => {
                self.search_input.schedule(text, now.instant);
                Outcome::Pending
            }
        };
        Ok(outcome)
    }

    /* ------------------------ composite edits ------------------------- */

    /// Add `name` under `folder` and open that folder in the tree.
    fn add_file_in_folder(&mut self, folder: &str, name: &str) -> Result<RecordId, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::invalid_input("name", "file name must not be empty"));
        }
        let folder = folder.trim().trim_end_matches(path::SEPARATOR);
        let full_path = path::join(folder, name);

        let id = self.store.add(FileRecord::new(full_path.as_str()))?;
        self.expand_ancestors(&full_path);
        Ok(id)
    }

    /// Placeholder-backed empty folder.
    fn create_folder(&mut self, name: &str) -> Result<RecordId, AppError> {
        let folder = name.trim().trim_matches(path::SEPARATOR);
        if folder.is_empty() {
            return Err(AppError::invalid_input("folder", "folder name must not be empty"));
        }

        let placeholder = FileRecord::folder_placeholder(folder);
        let placeholder_path = placeholder.path.clone();
        let id = self.store.add(placeholder)?;
        self.expand_ancestors(&placeholder_path);
        Ok(id)
    }

    fn rename_folder(&mut self, old: &str, new: &str) -> Result<usize, AppError> {
        let old = old.trim().trim_end_matches(path::SEPARATOR);
        let new = new.trim().trim_end_matches(path::SEPARATOR);
        if new.is_empty() {
            return Err(AppError::invalid_input("folder", "new folder name must not be empty"));
        }

        let moved = self.store.rewrite_path_prefix(old, new)?;
        if moved > 0 {
            self.navigation.rewrite_folder_prefix(old, new);
        }
        Ok(moved)
    }

    fn delete(&mut self, id: &RecordId) -> Outcome {
        let Some(removed) = self.store.delete(id) else {
            return Outcome::Unchanged;
        };
        self.navigation.forget_record(id);
        self.settle_notes(id);
        Outcome::Removed(removed)
    }

    /// All-or-nothing: a rejected document leaves every record in place.
    fn import_text(&mut self, text: &str, now: DateTime<Utc>) -> Result<usize, AppError> {
        let records = parse_import(text, now)?;
        let count = records.len();

        self.notes_input.cancel();
        self.store.replace_all(records);
        self.navigation.refresh(self.store.records());
        info!(count, "checklist imported");
        Ok(count)
    }

    fn apply_move(&mut self, op: &MoveOp) -> Result<usize, AppError> {
        let moved = move_engine::apply_move(&mut self.store, op)?;
        match op {
            MoveOp::Folder {
                old_prefix,
                new_prefix,
            } => self.navigation.rewrite_folder_prefix(old_prefix, new_prefix),
            MoveOp::File { new_path, .. } => self.expand_ancestors(new_path),
        }
        Ok(moved)
    }

    fn expand_ancestors(&mut self, record_path: &str) {
        for folder in path::ancestor_folders(record_path) {
            self.navigation.expand_folder(folder);
        }
    }

    /* ---------------------------- timers ------------------------------ */

    fn notes_input(&mut self, id: RecordId, text: String, now: Instant) -> Outcome {
        // one pending slot: typing into another record commits the previous one
        if self
            .notes_input
            .pending()
            .is_some_and(|(pending, _)| *pending != id)
        {
            self.settle_notes(&id);
        }
        self.notes_input.schedule((id, text), now);
        Outcome::Pending
    }

    /// Commit pending notes unless they belong to `superseded`, whose
    /// pending text is discarded.
    fn settle_notes(&mut self, superseded: &RecordId) {
        match self.notes_input.flush() {
            Some((pending, text)) if pending != *superseded => {
                trace!(%pending, "pending notes committed");
                self.store.set_notes(&pending, text);
            }
            Some(_) => trace!("pending notes superseded"),
            None => {}
        }
    }

    fn schedule_persist_if_changed(&mut self, before: u64, now: Instant) {
        let revision = self.store.revision();
        if revision != before {
            self.persist.schedule(revision, now);
        }
    }

    fn commit_notes(&mut self, pending: Option<(RecordId, String)>) {
        if let Some((id, text)) = pending {
            self.store.set_notes(&id, text);
        }
    }

    fn commit_search(&mut self, pending: Option<String>) {
        if let Some(text) = pending {
            self.filter.search_text = text;
        }
    }

    /// Commit debounced input whose window has passed. Returns `true` when
    /// the record collection is due to be written.
    pub fn poll(&mut self, now: Instant) -> bool {
        let revision = self.store.revision();
        let notes = self.notes_input.poll(now);
        self.commit_notes(notes);
        let search = self.search_input.poll(now);
        self.commit_search(search);
        self.schedule_persist_if_changed(revision, now);

        self.persist
            .poll(now)
            .inspect(|revision| debug!(revision, "persist due"))
            .is_some()
    }

    /// Commit everything pending now (focus loss, shutdown). Returns `true`
    /// when the record collection should be written.
    pub fn flush(&mut self) -> bool {
        let revision = self.store.revision();
        let notes = self.notes_input.flush();
        self.commit_notes(notes);
        let search = self.search_input.flush();
        self.commit_search(search);

        let due = self.persist.flush().is_some() || self.store.revision() != revision;
        if due {
            debug!(revision = self.store.revision(), "persist flushed");
        }
        due
    }

    /// Next time [`Self::poll`] has work to do.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        [
            self.notes_input.deadline(),
            self.search_input.deadline(),
            self.persist.deadline(),
        ]
        .into_iter()
        .flatten()
        .min()
    }
}

const fn changed(flag: bool) -> Outcome {
    if flag { Outcome::Updated } else { Outcome::Unchanged }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::{ImportError, InvalidMove},
        model::{filter::StatusFilter, record::Priority, tree::NodeKind},
    };
    use std::time::Duration;

    const MS: fn(u64) -> Duration = Duration::from_millis;

    fn session(paths: &[&str]) -> AuditSession {
        let records = paths
            .iter()
            .enumerate()
            .map(|(idx, p)| FileRecord::new(*p).with_id(format!("r{idx}")))
            .collect();
        AuditSession::new(records, ViewState::default(), &DebounceSettings::default())
    }

    fn id(raw: &str) -> RecordId {
        RecordId::from(raw)
    }

    fn paths(session: &AuditSession) -> Vec<&str> {
        let mut out: Vec<&str> = session.records().iter().map(|r| r.path.as_str()).collect();
        out.sort_unstable();
        out
    }

    #[test]
    fn test_first_load_expands_top_level_folders() {
        let s = session(&["src/a.js", "src/lib/b.js", "docs/x.md", "README.md"]);
        let expanded: Vec<&str> = s
            .navigation()
            .expanded_folders
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(expanded, vec!["docs", "src"]);
    }

    #[test]
    fn test_add_file_in_folder_composes_path() {
        let mut s = session(&["README.md"]);
        s.dispatch(Action::CollapseAll).unwrap();

        let outcome = s
            .dispatch(Action::AddFileInFolder {
                folder: "src/components/".into(),
                name: " Header.js ".into(),
            })
            .unwrap();
        assert!(matches!(outcome, Outcome::Added(_)));
        assert!(s.store().find_by_path("src/components/Header.js").is_some());
        assert!(s.navigation().is_expanded("src"));
        assert!(s.navigation().is_expanded("src/components"));

        s.dispatch(Action::AddFileInFolder {
            folder: String::new(),
            name: "root.txt".into(),
        })
        .unwrap();
        assert!(s.store().find_by_path("root.txt").is_some());

        let err = s.dispatch(Action::AddFileInFolder {
            folder: "src".into(),
            name: "   ".into(),
        });
        assert!(matches!(err, Err(AppError::InvalidInput { .. })));
    }

    #[test]
    fn test_create_folder_uses_placeholder() {
        let mut s = session(&[]);
        s.dispatch(Action::CreateFolder("assets/".into())).unwrap();

        let placeholder = s.store().find_by_path("assets/.keep").unwrap();
        assert_eq!(placeholder.notes, "Folder created");
        assert!(s.navigation().is_expanded("assets"));
        assert!(s.tree().find_folder("assets").is_some());

        assert!(matches!(
            s.dispatch(Action::CreateFolder("assets".into())),
            Err(AppError::Store(_))
        ));
    }

    #[test]
    fn test_folder_drag_follows_navigation() {
        let mut s = session(&["src/a.js", "src/lib/b.js", "dst/keep.txt"]);
        s.dispatch(Action::SelectFolder(Some("src/lib".into()))).unwrap();
        s.dispatch(Action::ExpandFolder("src/lib".into())).unwrap();

        s.dispatch(Action::DragStart(NodeRef::folder("src"))).unwrap();
        assert_eq!(
            s.dispatch(Action::DragOver(NodeRef::folder("src/lib"))).unwrap(),
            Outcome::Highlighted(false)
        );
        assert_eq!(
            s.dispatch(Action::DragOver(NodeRef::folder("dst"))).unwrap(),
            Outcome::Highlighted(true)
        );
        assert_eq!(
            s.dispatch(Action::Drop(Some(NodeRef::folder("dst")))).unwrap(),
            Outcome::Moved(2)
        );

        assert_eq!(paths(&s), vec!["dst/keep.txt", "dst/src/a.js", "dst/src/lib/b.js"]);
        assert_eq!(s.navigation().selected_folder.as_deref(), Some("dst/src/lib"));
        assert!(s.navigation().is_expanded("dst/src/lib"));
        assert!(!s.navigation().is_expanded("src"));
        assert_eq!(*s.drag(), DragState::Idle);
    }

    #[test]
    fn test_rejected_drop_resets_drag_and_keeps_records() {
        let mut s = session(&["src/a.js", "src/lib/b.js"]);
        s.dispatch(Action::DragStart(NodeRef::folder("src"))).unwrap();

        let err = s.dispatch(Action::Drop(Some(NodeRef::folder("src/lib"))));
        assert!(matches!(err, Err(AppError::Move(InvalidMove::CircularMove))));
        assert_eq!(paths(&s), vec!["src/a.js", "src/lib/b.js"]);
        assert_eq!(*s.drag(), DragState::Idle);
        assert!(!s.flush());
    }

    #[test]
    fn test_file_move_onto_file_is_rejected() {
        let mut s = session(&["a.js", "b.js"]);
        let err = s.dispatch(Action::Move {
            source: NodeRef::file(&id("r0")),
            target: NodeRef {
                id: "r1".into(),
                kind: NodeKind::File,
            },
        });
        assert!(matches!(err, Err(AppError::Move(InvalidMove::NotAFolder))));
    }

    #[test]
    fn test_rename_folder_rewrites_records_and_view() {
        let mut s = session(&["src/a.js", "src/lib/b.js", "srcx/c.js"]);
        s.dispatch(Action::SelectFolder(Some("src".into()))).unwrap();

        let outcome = s
            .dispatch(Action::RenameFolder {
                old: "src".into(),
                new: "app/".into(),
            })
            .unwrap();
        assert_eq!(outcome, Outcome::Moved(2));
        assert_eq!(paths(&s), vec!["app/a.js", "app/lib/b.js", "srcx/c.js"]);
        assert_eq!(s.navigation().selected_folder.as_deref(), Some("app"));
    }

    #[test]
    fn test_import_is_all_or_nothing() {
        let mut s = session(&["keep/me.txt"]);

        let err = s.dispatch(Action::Import("{broken".into()));
        assert!(matches!(err, Err(AppError::Import(ImportError::MalformedJson(_)))));
        assert_eq!(paths(&s), vec!["keep/me.txt"]);

        let err = s.dispatch(Action::Import("[]".into()));
        assert!(matches!(err, Err(AppError::Import(ImportError::EmptyResult))));
        assert!(!s.flush());

        let outcome = s
            .dispatch(Action::Import(
                r#"{"files": [{"name": "new/a.rs"}, {"path": "new/b.rs", "checked": true}]}"#.into(),
            ))
            .unwrap();
        assert_eq!(outcome, Outcome::Replaced(2));
        assert_eq!(paths(&s), vec!["new/a.rs", "new/b.rs"]);
        assert!(s.completion().iter().any(|(folder, done)| folder == "new" && !done));
        assert!(s.flush());
    }

    #[test]
    fn test_notes_input_is_debounced() {
        let mut s = session(&["a.js", "b.js"]);
        let start = Instant::now();
        let at = |offset: u64| Moment {
            wall: Utc::now(),
            instant: start + MS(offset),
        };

        s.dispatch_at(
            Action::NotesInput {
                id: id("r0"),
                text: "che".into(),
            },
            at(0),
        )
        .unwrap();
        s.dispatch_at(
            Action::NotesInput {
                id: id("r0"),
                text: "check this".into(),
            },
            at(100),
        )
        .unwrap();

        assert!(!s.poll(start + MS(200)));
        assert_eq!(s.store().get(&id("r0")).unwrap().notes, "");

        // notes commit at 400ms, which schedules the persist write
        assert!(!s.poll(start + MS(400)));
        assert_eq!(s.store().get(&id("r0")).unwrap().notes, "check this");
        assert!(s.next_deadline().is_some());
        assert!(s.poll(start + MS(700)));
        assert!(s.next_deadline().is_none());
    }

    #[test]
    fn test_notes_switching_records_commits_previous() {
        let mut s = session(&["a.js", "b.js"]);
        s.dispatch(Action::NotesInput {
            id: id("r0"),
            text: "first".into(),
        })
        .unwrap();
        s.dispatch(Action::NotesInput {
            id: id("r1"),
            text: "second".into(),
        })
        .unwrap();

        assert_eq!(s.store().get(&id("r0")).unwrap().notes, "first");
        assert_eq!(s.store().get(&id("r1")).unwrap().notes, "");

        assert!(s.flush());
        assert_eq!(s.store().get(&id("r1")).unwrap().notes, "second");
    }

    #[test]
    fn test_search_input_commits_on_flush() {
        let mut s = session(&["src/app.js", "src/util.js"]);
        s.dispatch(Action::SearchInput("APP".into())).unwrap();
        assert_eq!(s.visible().visible.len(), 2);

        assert!(!s.flush());
        let view = s.visible();
        assert_eq!(view.visible.len(), 1);
        assert_eq!(view.visible[0].path, "src/app.js");
    }

    #[test]
    fn test_view_actions_do_not_schedule_persist() {
        let mut s = session(&["src/a.js"]);
        s.dispatch(Action::SelectFolder(Some("src".into()))).unwrap();
        s.dispatch(Action::SetStatusFilter(StatusFilter::Completed)).unwrap();
        s.dispatch(Action::ToggleFolder("src".into())).unwrap();
        assert!(s.next_deadline().is_none());

        s.dispatch(Action::SetPriority {
            id: id("r0"),
            priority: Priority::High,
        })
        .unwrap();
        assert!(s.next_deadline().is_some());
    }

    #[test]
    fn test_checked_toggle_and_delete() {
        let mut s = session(&["src/a.js"]);
        s.dispatch(Action::RevealFile(id("r0"))).unwrap();
        assert_eq!(s.navigation().active_file_id, Some(id("r0")));

        assert_eq!(
            s.dispatch(Action::ToggleChecked(id("r0"))).unwrap(),
            Outcome::Checked(true)
        );
        assert!(s.completion().is_complete("src"));
        assert_eq!(s.stats().percentage, 100);

        assert!(matches!(
            s.dispatch(Action::Delete(id("r0"))).unwrap(),
            Outcome::Removed(_)
        ));
        assert_eq!(s.navigation().active_file_id, None);
        assert_eq!(s.dispatch(Action::Delete(id("r0"))).unwrap(), Outcome::Unchanged);
        assert_eq!(
            s.dispatch(Action::ToggleChecked(id("gone"))).unwrap(),
            Outcome::Unchanged
        );
    }

    #[test]
    fn test_export_uses_scope_and_filters() {
        let mut s = session(&["src/a.js", "src/b.js", "README.md"]);
        s.dispatch(Action::SelectFolder(Some("src".into()))).unwrap();
        s.dispatch(Action::SetChecked {
            id: id("r0"),
            checked: true,
        })
        .unwrap();
        s.dispatch(Action::SetStatusFilter(StatusFilter::Pending)).unwrap();

        let (name, doc) = s.export(Utc::now());
        assert!(name.starts_with("checklist-src-"));
        assert_eq!(doc.section, "src");
        assert_eq!(doc.total_files, 1);
        assert_eq!(doc.files[0].path, "src/b.js");
    }
}

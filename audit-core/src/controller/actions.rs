//! src/controller/actions.rs
//! ============================================================================
//! # Actions: Centralized Checklist Commands
//!
//! Defines the `Action` enum, which represents every mutation and view
//! change the checklist can respond to. Front ends translate clicks,
//! keystrokes, drops and CLI arguments into actions and hand them to
//! [`AuditSession::dispatch`](crate::controller::session::AuditSession::dispatch).

use crate::{
    controller::move_engine::NodeRef,
    model::{
        filter::{PriorityFilter, StatusFilter},
        record::{Priority, RecordId},
    },
};

/// Represents a high-level action against the checklist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Add a record with a user-entered path.
    AddFile(String),

    /// Add `name` inside `folder` (empty folder means the root).
    AddFileInFolder {
        folder: String,
        name: String,
    },

    /// Drop every record.
    ClearAll,

    /// Collapse every folder in the tree.
    CollapseAll,

    /// Make an empty folder visible through a placeholder record.
    CreateFolder(String),

    Delete(RecordId),

    /// Pointer left the highlighted drop target.
    DragLeave,

    /// Drag gesture ended (drop or cancel).
    DragEnd,

    /// Pointer hovers over a potential drop target.
    DragOver(NodeRef),

    DragStart(NodeRef),

    /// Drop the dragged node; `None` when released outside any node.
    Drop(Option<NodeRef>),

    ExpandFolder(String),

    /// Replace the whole collection from an import document.
    Import(String),

    /// Explicit move, as from a "move to..." menu.
    Move {
        source: NodeRef,
        target: NodeRef,
    },

    /// Keystroke in the notes editor; committed after the notes debounce.
    NotesInput {
        id: RecordId,
        text: String,
    },

    /// Re-scan: clear selection and reopen the top-level folders.
    Refresh,

    RenameFolder {
        old: String,
        new: String,
    },

    RenameRecord {
        id: RecordId,
        path: String,
    },

    /// Select a record's parent folder, expand its ancestors, highlight it.
    RevealFile(RecordId),

    /// Keystroke in the search box; committed after the search debounce.
    SearchInput(String),

    /// Scope the file list to a folder, or `None` for "All Files".
    SelectFolder(Option<String>),

    SetChecked {
        id: RecordId,
        checked: bool,
    },

    SetHasChanges {
        id: RecordId,
        has_changes: bool,
    },

    SetNotes {
        id: RecordId,
        notes: String,
    },

    SetPriority {
        id: RecordId,
        priority: Priority,
    },

    SetPriorityFilter(PriorityFilter),

    SetSearch(String),

    SetStatusFilter(StatusFilter),

    ToggleChecked(RecordId),

    ToggleFolder(String),
}

impl Action {
    /// True for actions that only touch navigation, filter or drag state.
    #[must_use]
    pub const fn is_view_only(&self) -> bool {
        matches!(
            self,
            Self::CollapseAll
                | Self::DragLeave
                | Self::DragEnd
                | Self::DragOver(_)
                | Self::DragStart(_)
                | Self::ExpandFolder(_)
                | Self::Refresh
                | Self::RevealFile(_)
                | Self::SearchInput(_)
                | Self::SelectFolder(_)
                | Self::SetPriorityFilter(_)
                | Self::SetSearch(_)
                | Self::SetStatusFilter(_)
                | Self::ToggleFolder(_)
        )
    }
}

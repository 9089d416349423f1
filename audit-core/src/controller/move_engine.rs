//! src/controller/move_engine.rs
//! ============================================================================
//! # Move/Drag Engine: validated relocation of files and folders
//!
//! A move is planned first ([`plan_move`]) and only then applied to the
//! store ([`apply_move`]), so a rejected move never touches a record.
//! [`DragState`] tracks a single drag gesture and re-plans at drop time,
//! since the records may have changed between hover and drop.

use tracing::{debug, trace};

use crate::{
    error::InvalidMove,
    model::{
        path,
        record::RecordId,
        record_store::RecordStore,
        tree::{NodeKind, TreeNode},
    },
};

/// A tree node as seen by the move engine (source or drop target).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRef {
    /// Folder path for folders, record id for files.
    pub id: String,
    pub kind: NodeKind,
}

impl NodeRef {
    #[must_use]
    pub fn folder(folder: impl Into<String>) -> Self {
        Self {
            id: folder.into(),
            kind: NodeKind::Folder,
        }
    }

    #[must_use]
    pub fn file(id: &RecordId) -> Self {
        Self {
            id: id.to_string(),
            kind: NodeKind::File,
        }
    }
}

impl From<&TreeNode<'_>> for NodeRef {
    fn from(node: &TreeNode<'_>) -> Self {
        Self {
            id: node.id.clone(),
            kind: node.kind,
        }
    }
}

/// A validated relocation, ready to apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOp {
    /// `rename_record_path(id, new_path)`
    File { id: RecordId, new_path: String },

    /// `rewrite_path_prefix(old_prefix, new_prefix)`
    Folder {
        old_prefix: String,
        new_prefix: String,
    },
}

/// Validate a move and compute the path rewrite it implies.
///
/// Checks run in order: missing source/target, self drop, folder into its
/// own subtree, non-folder target. A file source must name a record in the
/// store; an unknown record counts as a missing source.
pub fn plan_move(
    store: &RecordStore,
    source: Option<&NodeRef>,
    target: Option<&NodeRef>,
) -> Result<MoveOp, InvalidMove> {
    let (Some(source), Some(target)) = (source, target) else {
        return Err(InvalidMove::MissingTarget);
    };
    if source.id.is_empty() || target.id.is_empty() {
        return Err(InvalidMove::MissingTarget);
    }
    if source.id == target.id {
        return Err(InvalidMove::SelfDrop);
    }
    if source.kind == NodeKind::Folder
        && (target.id == source.id || path::is_descendant_of(&target.id, &source.id))
    {
        return Err(InvalidMove::CircularMove);
    }
    if target.kind != NodeKind::Folder {
        return Err(InvalidMove::NotAFolder);
    }

    let op = match source.kind {
        NodeKind::File => {
            let id = RecordId::from(source.id.as_str());
            let record = store.get(&id).ok_or(InvalidMove::MissingTarget)?;
            MoveOp::File {
                new_path: path::join(&target.id, record.name()),
                id,
            }
        }
        NodeKind::Folder => MoveOp::Folder {
            new_prefix: path::join(&target.id, path::base_name(&source.id)),
            old_prefix: source.id.clone(),
        },
    };
    trace!(?op, "move planned");
    Ok(op)
}

/// Apply a planned move. Returns how many records changed paths.
///
/// Destination collisions reject the whole move with
/// [`InvalidMove::PathCollision`] and leave the store untouched.
pub fn apply_move(store: &mut RecordStore, op: &MoveOp) -> Result<usize, InvalidMove> {
    let moved = match op {
        MoveOp::File { id, new_path } => {
            usize::from(store.rename_record_path(id, new_path.as_str())?)
        }
        MoveOp::Folder {
            old_prefix,
            new_prefix,
        } => store.rewrite_path_prefix(old_prefix, new_prefix)?,
    };
    debug!(?op, moved, "move applied");
    Ok(moved)
}

/// Phase of a single drag gesture.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,

    Dragging {
        source: NodeRef,
    },

    TargetHighlighted {
        source: NodeRef,
        target: NodeRef,
    },
}

impl DragState {
    /// Begin dragging `source`, discarding any stale gesture.
    pub fn drag_start(&mut self, source: NodeRef) {
        trace!(?source, "drag started");
        *self = Self::Dragging { source };
    }

    /// Hover over `target`. Highlights it when the drop would be valid;
    /// otherwise falls back to plain dragging. Returns whether it's highlighted.
    pub fn drag_over(&mut self, store: &RecordStore, target: NodeRef) -> bool {
        let Some(source) = self.source().cloned() else {
            return false;
        };

        if plan_move(store, Some(&source), Some(&target)).is_ok() {
            *self = Self::TargetHighlighted { source, target };
            true
        } else {
            *self = Self::Dragging { source };
            false
        }
    }

    /// Pointer left the highlighted target.
    pub fn drag_leave(&mut self) {
        *self = match std::mem::take(self) {
            Self::TargetHighlighted { source, .. } => Self::Dragging { source },
            other => other,
        };
    }

    /// Drop on `target`: re-validates against the current store and always
    /// returns to `Idle`.
    pub fn drop_on(
        &mut self,
        store: &RecordStore,
        target: Option<&NodeRef>,
    ) -> Result<MoveOp, InvalidMove> {
        let gesture = std::mem::take(self);
        let source = match &gesture {
            Self::Idle => None,
            Self::Dragging { source } | Self::TargetHighlighted { source, .. } => Some(source),
        };

        let planned = plan_move(store, source, target);
        if let Err(reason) = &planned {
            debug!(%reason, "drop rejected");
        }
        planned
    }

    /// Gesture ended without a drop (or after one); clears everything.
    pub fn drag_end(&mut self) {
        *self = Self::Idle;
    }

    #[must_use]
    pub const fn source(&self) -> Option<&NodeRef> {
        match self {
            Self::Idle => None,
            Self::Dragging { source } | Self::TargetHighlighted { source, .. } => Some(source),
        }
    }

    #[must_use]
    pub const fn highlighted(&self) -> Option<&NodeRef> {
        match self {
            Self::TargetHighlighted { target, .. } => Some(target),
            _ => None,
        }
    }
}

pub mod error;

pub mod config;

pub mod controller {
    pub mod actions;
    pub use actions::Action;

    pub mod move_engine;
    pub use move_engine::{DragState, MoveOp, NodeRef};

    pub mod session;
    pub use session::{AuditSession, Moment, Outcome, ViewState};
}

pub mod model {
    pub mod path;

    pub mod record;
    pub use record::{FileRecord, Priority, RecordId};

    pub mod record_store;
    pub use record_store::RecordStore;

    pub mod tree;
    pub use tree::{FileTree, FolderCompletion, NodeKind, TreeNode};

    pub mod filter;
    pub use filter::{AuditStats, FilterState, FilteredView, PriorityFilter, StatusCounts, StatusFilter};

    pub mod navigation;
    pub use navigation::NavigationState;
}

pub mod exchange {
    pub mod export;
    pub use export::ExportDocument;

    pub mod import;
    pub use import::parse_import;
}

pub mod storage {
    pub mod kv_store;
    pub use kv_store::{DirStore, KeyValueStore, MemoryStore};

    pub mod persisted;
    pub use persisted::ChecklistStorage;
}

pub mod logging;
pub use logging::Logger;

pub mod util {
    pub mod debounce;
}

pub use error::{AppError, ImportError, InvalidMove, StoreError};

pub use controller::session::AuditSession;

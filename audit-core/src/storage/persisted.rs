//! src/storage/persisted.rs
//! ============================================================================
//! # Persisted state layout
//!
//! The checklist keeps its state under a few sibling keys of a
//! [`KeyValueStore`]:
//!
//! | key | content |
//! |---|---|
//! | `checklist-data` | the record collection (JSON array) |
//! | `fileAuditor_viewState` | navigation + filter state |
//! | `fileAuditor_notes` | free-form audit notes (not managed here) |
//! | `sidebarWidth` | layout preference (not managed here) |
//! | `fileAuditor_rightSidebarOpen` | layout preference (not managed here) |

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::{
    controller::session::ViewState,
    error::AppError,
    exchange::import::parse_import,
    model::record::{FileRecord, default_records},
    storage::kv_store::KeyValueStore,
};

pub const RECORDS_KEY: &str = "checklist-data";
pub const VIEW_STATE_KEY: &str = "fileAuditor_viewState";
pub const NOTES_KEY: &str = "fileAuditor_notes";
pub const SIDEBAR_WIDTH_KEY: &str = "sidebarWidth";
pub const RIGHT_SIDEBAR_KEY: &str = "fileAuditor_rightSidebarOpen";

/// Typed access to the checklist's keys.
#[derive(Debug)]
pub struct ChecklistStorage<S> {
    store: S,
    seed_defaults: bool,
}

impl<S: KeyValueStore> ChecklistStorage<S> {
    #[must_use]
    pub const fn new(store: S, seed_defaults: bool) -> Self {
        Self {
            store,
            seed_defaults,
        }
    }

    #[must_use]
    pub const fn inner(&self) -> &S {
        &self.store
    }

    /// Load the record collection.
    ///
    /// A missing key yields the sample checklist (or nothing, when seeding
    /// is off). Unreadable data is logged and replaced the same way, so a
    /// corrupt entry never blocks startup. Legacy shapes (numeric ids, a
    /// `filename` key) go through the import normalizer.
    pub async fn load_records(&self, now: DateTime<Utc>) -> Result<Vec<FileRecord>, AppError> {
        let Some(text) = self.store.get(RECORDS_KEY).await? else {
            info!(seeded = self.seed_defaults, "no stored checklist");
            return Ok(self.fallback(now));
        };

        if let Ok(records) = serde_json::from_str::<Vec<FileRecord>>(&text) {
            debug!(count = records.len(), "checklist loaded");
            return Ok(records);
        }

        match parse_import(&text, now) {
            Ok(records) => {
                info!(count = records.len(), "checklist loaded from legacy shape");
                Ok(records)
            }
            Err(e) => {
                warn!("stored checklist unreadable, starting over: {e}");
                Ok(self.fallback(now))
            }
        }
    }

    pub async fn save_records(&self, records: &[FileRecord]) -> Result<(), AppError> {
        let text = serde_json::to_string(records)?;
        self.store.set(RECORDS_KEY, &text).await?;
        debug!(count = records.len(), "checklist saved");
        Ok(())
    }

    /// Stored view state, or the default when missing or unreadable.
    pub async fn load_view(&self) -> Result<ViewState, AppError> {
        let Some(text) = self.store.get(VIEW_STATE_KEY).await? else {
            return Ok(ViewState::default());
        };
        Ok(serde_json::from_str(&text).unwrap_or_else(|e| {
            warn!("stored view state unreadable, using defaults: {e}");
            ViewState::default()
        }))
    }

    pub async fn save_view(&self, view: &ViewState) -> Result<(), AppError> {
        let text = serde_json::to_string(view)?;
        self.store.set(VIEW_STATE_KEY, &text).await
    }

    fn fallback(&self, now: DateTime<Utc>) -> Vec<FileRecord> {
        if self.seed_defaults {
            default_records(now)
        } else {
            Vec::new()
        }
    }
}

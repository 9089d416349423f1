//! src/exchange/export.rs
//! ============================================================================
//! # JSON export of the currently visible records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::record::FileRecord;

/// Section label used when no folder is selected.
pub const ALL_FILES_SECTION: &str = "All Files";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub export_date: DateTime<Utc>,

    /// Selected folder, or [`ALL_FILES_SECTION`].
    pub section: String,

    pub total_files: usize,

    pub changed_files: usize,

    pub files: Vec<FileRecord>,
}

impl ExportDocument {
    /// Snapshot the visible records for the given folder scope.
    #[must_use]
    pub fn from_visible<'a, I>(visible: I, selected_folder: Option<&str>, now: DateTime<Utc>) -> Self
    where
        I: IntoIterator<Item = &'a FileRecord>,
    {
        let files: Vec<FileRecord> = visible.into_iter().cloned().collect();

        Self {
            export_date: now,
            section: selected_folder.unwrap_or(ALL_FILES_SECTION).to_string(),
            total_files: files.len(),
            changed_files: files.iter().filter(|record| record.has_changes).count(),
            files,
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// `checklist-<section>-<YYYY-MM-DD>.json`, with `/` in folder names
/// replaced by `-`.
#[must_use]
pub fn export_file_name(selected_folder: Option<&str>, now: DateTime<Utc>) -> String {
    let section = selected_folder.map_or_else(|| "all-files".to_string(), |f| f.replace('/', "-"));
    format!("checklist-{section}-{}.json", now.format("%Y-%m-%d"))
}

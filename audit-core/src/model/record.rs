//! src/model/record.rs
//! ============================================================================
//! # FileRecord: one reviewable file in the audit checklist
//!
//! Records are the single source of truth. Everything else (tree, folder
//! completion, filtered views) is derived from a flat collection of them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

use crate::model::path;

/// Opaque, stable record identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Review priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(format!("unknown priority '{other}'")),
        }
    }
}

/// One reviewable file.
///
/// The path is serialized under `name`, the key the checklist has always
/// persisted and exported; `path` is accepted on input as well.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub id: RecordId,

    #[serde(rename = "name", alias = "path")]
    pub path: String,

    #[serde(default)]
    pub checked: bool,

    /// Set when `checked` flips to true, cleared when it flips back.
    #[serde(default)]
    pub checked_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub priority: Priority,

    #[serde(default)]
    pub notes: String,

    /// "Modified since last audit", independent of `checked`.
    #[serde(default)]
    pub has_changes: bool,
}

impl FileRecord {
    /// Unchecked, medium-priority record with a generated id.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            id: RecordId::generate(),
            path: path.into(),
            checked: false,
            checked_at: None,
            priority: Priority::Medium,
            notes: String::new(),
            has_changes: false,
        }
    }

    /// Placeholder record that makes an otherwise empty folder visible.
    #[must_use]
    pub fn folder_placeholder(folder: &str) -> Self {
        let mut record = Self::new(path::join(folder, FOLDER_PLACEHOLDER));
        record.notes = "Folder created".to_string();
        record
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<RecordId>) -> Self {
        self.id = id.into();
        self
    }

    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Mark checked with the given timestamp.
    #[must_use]
    pub fn checked_on(mut self, at: DateTime<Utc>) -> Self {
        self.checked = true;
        self.checked_at = Some(at);
        self
    }

    /// Display name (last path segment).
    #[must_use]
    pub fn name(&self) -> &str {
        path::base_name(&self.path)
    }

    /// Immediate parent folder, `None` at the root.
    #[must_use]
    pub fn folder(&self) -> Option<&str> {
        path::parent_folder(&self.path)
    }

    /// Apply a checked transition, stamping or clearing `checked_at`.
    ///
    /// Returns false when the flag already had the requested value.
    pub fn set_checked(&mut self, checked: bool, now: DateTime<Utc>) -> bool {
        if self.checked == checked {
            return false;
        }
        self.checked = checked;
        self.checked_at = checked.then_some(now);
        true
    }
}

/// File name used for empty-folder placeholders.
pub const FOLDER_PLACEHOLDER: &str = ".keep";

/// Sample checklist shown to a first-time user.
#[must_use]
pub fn default_records(now: DateTime<Utc>) -> Vec<FileRecord> {
    vec![
        FileRecord::new("index.html")
            .with_id("1")
            .with_priority(Priority::High)
            .with_notes("Main entry point validated")
            .checked_on(now),
        FileRecord::new("styles.css").with_id("2"),
        FileRecord::new("src/app.js")
            .with_id("3")
            .with_priority(Priority::High)
            .with_notes("Needs refactoring on line 45"),
        FileRecord::new("src/components/Header.js")
            .with_id("4")
            .with_priority(Priority::Low)
            .with_notes("Component finalized")
            .checked_on(now),
        FileRecord::new("src/utils/helpers.js").with_id("5"),
        FileRecord::new("README.md").with_id("6"),
    ]
}

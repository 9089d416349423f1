//! src/model/filter.rs
//! ============================================================================
//! # Filter/Search Engine: the visible record list and its badge counts
//!
//! `compute_visible` scopes the records to the selected folder (direct
//! children only), counts status buckets over that scope, then applies the
//! status, priority and search filters. Counts never depend on which filter
//! tab is active.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::model::{
    path,
    record::{FileRecord, Priority},
};

/// Status tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Completed,
    Changed,
}

impl StatusFilter {
    #[must_use]
    pub const fn matches(self, record: &FileRecord) -> bool {
        match self {
            Self::All => true,
            Self::Pending => !record.checked,
            Self::Completed => record.checked,
            Self::Changed => record.has_changes,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'_ str = match self {
            Self::All => "all",
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Changed => "changed",
        };

        write!(f, "{s}")
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "changed" => Ok(Self::Changed),
            other => Err(format!("unknown status filter '{other}'")),
        }
    }
}

/// Priority filter: everything, or one exact priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityFilter {
    #[default]
    All,
    Only(Priority),
}

impl PriorityFilter {
    #[must_use]
    pub fn matches(self, record: &FileRecord) -> bool {
        match self {
            Self::All => true,
            Self::Only(priority) => record.priority == priority,
        }
    }
}

impl FromStr for PriorityFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            s.parse::<Priority>().map(Self::Only)
        }
    }
}

impl fmt::Display for PriorityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(priority) => write!(f, "{priority}"),
        }
    }
}

/// Active status/priority/search filters.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterState {
    pub status_filter: StatusFilter,
    pub priority_filter: PriorityFilter,
    /// Case-insensitive substring matched against the full path.
    pub search_text: String,
}

impl FilterState {
    /// Priority and search checks (everything except status).
    fn matches_refinements(&self, record: &FileRecord, needle: Option<&str>) -> bool {
        self.priority_filter.matches(record)
            && needle.is_none_or(|needle| record.path.to_lowercase().contains(needle))
    }
}

/// Badge counts over the folder-scoped set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StatusCounts {
    pub all: usize,
    pub pending: usize,
    pub completed: usize,
    pub changed: usize,
}

/// Output of [`compute_visible`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredView<'a> {
    /// Visible records, sorted by path ascending (byte-wise).
    pub visible: Vec<&'a FileRecord>,
    pub counts: StatusCounts,
}

/// True when `record` belongs to the folder scope.
///
/// No folder means "All Files"; a folder keeps only its direct children.
#[must_use]
pub fn in_scope(record: &FileRecord, selected_folder: Option<&str>) -> bool {
    selected_folder.is_none_or(|folder| path::is_direct_child_of(&record.path, folder))
}

/// Derive the visible records and their counts.
#[must_use]
pub fn compute_visible<'a, I>(
    records: I,
    selected_folder: Option<&str>,
    filter: &FilterState,
) -> FilteredView<'a>
where
    I: IntoIterator<Item = &'a FileRecord>,
{
    let needle: Option<String> = Some(filter.search_text.as_str())
        .filter(|text| !text.trim().is_empty())
        .map(str::to_lowercase);

    let mut counts = StatusCounts::default();
    let mut visible: Vec<&'a FileRecord> = records
        .into_iter()
        .filter(|record| in_scope(record, selected_folder))
        .inspect(|record| {
            counts.all += 1;
            if record.checked {
                counts.completed += 1;
            } else {
                counts.pending += 1;
            }
            if record.has_changes {
                counts.changed += 1;
            }
        })
        .filter(|record| filter.status_filter.matches(record))
        .filter(|record| filter.matches_refinements(record, needle.as_deref()))
        .collect();

    visible.sort_by(|a, b| a.path.cmp(&b.path).then_with(|| a.id.cmp(&b.id)));

    FilteredView { visible, counts }
}

/// Whole-collection progress summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AuditStats {
    pub total: usize,
    pub checked: usize,
    /// Rounded to the nearest whole percent; 0 for an empty collection.
    pub percentage: u8,
}

#[must_use]
pub fn audit_stats(records: &[FileRecord]) -> AuditStats {
    let total = records.len();
    let checked = records.iter().filter(|record| record.checked).count();
    let percentage = if total == 0 {
        0
    } else {
        // (2c*100 + t) / 2t rounds half up without floats
        u8::try_from((checked * 200 + total) / (total * 2)).unwrap_or(100)
    };

    AuditStats {
        total,
        checked,
        percentage,
    }
}

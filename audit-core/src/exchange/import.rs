//! src/exchange/import.rs
//! ============================================================================
//! # JSON import: bare arrays and exported documents
//!
//! Accepts either a bare array of record-like objects or an export document
//! (`{ "files": [...], ... }`). Every item is normalized into a
//! [`FileRecord`]; any failure rejects the whole import so the caller can
//! leave its current records untouched.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    error::ImportError,
    model::record::{FileRecord, Priority, RecordId},
};

/// Path given to items that carry no usable name.
pub const UNKNOWN_FILE: &str = "Unknown File";

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ImportDocument {
    Bare(Vec<Value>),
    Wrapped { files: Vec<Value> },
}

/// One item as found in the wild. Loosely typed on purpose: older exports
/// carry numeric ids, a `filename` key, or truthy non-boolean flags.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawRecord {
    id: Option<Value>,
    name: Option<Value>,
    path: Option<Value>,
    filename: Option<Value>,
    checked: Option<Value>,
    checked_at: Option<Value>,
    priority: Option<Value>,
    notes: Option<Value>,
    has_changes: Option<Value>,
}

/// JavaScript-style truthiness, which is how old exports encoded flags.
fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_) | Value::Object(_)) => true,
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

impl RawRecord {
    fn normalize(self, now: DateTime<Utc>) -> FileRecord {
        let id = match &self.id {
            Some(Value::String(s)) if !s.is_empty() => RecordId::from(s.as_str()),
            Some(Value::Number(n)) => RecordId::from(n.to_string()),
            _ => RecordId::generate(),
        };

        let path = non_empty_str(self.name.as_ref())
            .or_else(|| non_empty_str(self.path.as_ref()))
            .or_else(|| non_empty_str(self.filename.as_ref()))
            .unwrap_or(UNKNOWN_FILE)
            .to_string();

        let checked = truthy(self.checked.as_ref());
        let checked_at = if checked {
            let parsed = non_empty_str(self.checked_at.as_ref())
                .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
                .map(|at| at.with_timezone(&Utc));
            Some(parsed.unwrap_or(now))
        } else {
            None
        };

        let priority = non_empty_str(self.priority.as_ref())
            .and_then(|raw| raw.parse::<Priority>().ok())
            .unwrap_or_default();

        FileRecord {
            id,
            path,
            checked,
            checked_at,
            priority,
            notes: non_empty_str(self.notes.as_ref()).unwrap_or_default().to_string(),
            has_changes: truthy(self.has_changes.as_ref()),
        }
    }
}

/// Parse and normalize an import document.
///
/// `now` stamps checked items that arrive without a usable `checkedAt`.
pub fn parse_import(text: &str, now: DateTime<Utc>) -> Result<Vec<FileRecord>, ImportError> {
    let value: Value = serde_json::from_str(text).map_err(|e| {
        warn!("import rejected: malformed JSON: {e}");
        ImportError::MalformedJson(e.to_string())
    })?;

    let items = match serde_json::from_value::<ImportDocument>(value) {
        Ok(ImportDocument::Bare(items) | ImportDocument::Wrapped { files: items }) => items,
        Err(_) => {
            warn!("import rejected: neither an array nor an object with a files array");
            return Err(ImportError::UnrecognizedShape(
                "expected an array or an object with a `files` array".to_string(),
            ));
        }
    };

    let records = items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| {
            serde_json::from_value::<RawRecord>(item)
                .map(|raw| raw.normalize(now))
                .map_err(|_| ImportError::UnrecognizedShape(format!("item {idx} is not an object")))
        })
        .collect::<Result<Vec<FileRecord>, ImportError>>()?;

    if records.is_empty() {
        warn!("import rejected: no records");
        return Err(ImportError::EmptyResult);
    }

    debug!(count = records.len(), "import parsed");
    Ok(records)
}

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::models::status::Status;

/// One row-object as returned by the storage API (key order preserved)
pub type RawRow = serde_json::Map<String, Value>;

/// Text of a raw cell: `null` is empty, other scalars are stringified
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A classified row of the loaded source
///
/// `cells` holds exactly the schema's columns, in schema order. When the
/// source has a status column, `status` carries the normalized value and the
/// status cell is kept in sync with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskRow {
    /// Position of the row in the batch it was loaded from
    pub index: usize,
    pub cells: IndexMap<String, String>,
    pub is_section_marker: bool,
    pub status: Option<String>,
}

impl TaskRow {
    /// Cell value, empty when the column is unknown
    pub fn get(&self, column: &str) -> &str {
        self.cells.get(column).map(String::as_str).unwrap_or("")
    }

    /// Cell value for an optional column handle
    pub fn value_of(&self, column: Option<&str>) -> &str {
        column.map(|c| self.get(c)).unwrap_or("")
    }

    /// Canonical status, if the normalized value is one of the three labels
    pub fn status_kind(&self) -> Option<Status> {
        self.status.as_deref().and_then(Status::from_label)
    }

    /// Overwrite the status in both the derived field and the cell
    pub fn set_status(&mut self, column: &str, label: &str) {
        if let Some(cell) = self.cells.get_mut(column) {
            *cell = label.to_string();
        }
        self.status = Some(label.to_string());
    }
}

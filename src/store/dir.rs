use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::models::{cell_text, RawRow};
use crate::store::{RowStore, RowUpdate};

/// Status reported for a missing snapshot file
const NOT_FOUND_STATUS: u16 = 404;

/// Local snapshot store: one `<source>.json` file per source, each holding a
/// JSON array of row-objects
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Snapshot file of a source; names that could escape the directory have none
    fn sheet_path(&self, sheet: &str) -> Option<PathBuf> {
        let invalid = sheet.trim().is_empty()
            || sheet.contains(['/', '\\'])
            || sheet == "."
            || sheet == "..";
        if invalid {
            None
        } else {
            Some(self.root.join(format!("{}.json", sheet)))
        }
    }

    fn existing_path(&self, sheet: &str) -> Result<PathBuf, StoreError> {
        match self.sheet_path(sheet) {
            Some(path) if path.is_file() => Ok(path),
            _ => Err(StoreError::NotFound {
                sheet: sheet.to_string(),
                status: NOT_FOUND_STATUS,
            }),
        }
    }

    fn read(path: &Path) -> Result<Vec<RawRow>, StoreError> {
        let text = fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(|e| StoreError::Decode(format!("{}: {}", path.display(), e)))
    }
}

fn row_matches(row: &RawRow, update: &RowUpdate) -> bool {
    update
        .condition
        .iter()
        .all(|(column, value)| row.get(column).map(cell_text).unwrap_or_default() == *value)
}

impl RowStore for DirStore {
    fn fetch_rows(&self, sheet: &str) -> Result<Vec<RawRow>, StoreError> {
        let path = self.existing_path(sheet)?;
        log::debug!("Reading snapshot {}", path.display());
        Self::read(&path)
    }

    fn update_rows(&self, sheet: &str, update: &RowUpdate) -> Result<(), StoreError> {
        let path = self.existing_path(sheet)?;
        let mut rows = Self::read(&path)?;

        match rows.iter_mut().find(|row| row_matches(row, update)) {
            Some(row) => {
                for (column, value) in &update.set {
                    row.insert(column.clone(), serde_json::Value::String(value.clone()));
                }
            }
            None => {
                log::warn!("No row of \"{}\" matches {:?}; nothing updated", sheet, update.condition);
                return Ok(());
            }
        }

        let text = serde_json::to_string_pretty(&rows).map_err(|e| StoreError::Decode(e.to_string()))?;
        fs::write(&path, text)?;
        Ok(())
    }
}

//! Error taxonomy for loading, filtering and updating a source

use thiserror::Error;

/// Failure reported by a row store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP {status} - source \"{sheet}\" not found or empty")]
    NotFound { sheet: String, status: u16 },
    #[error("update rejected (HTTP {status})")]
    Rejected { status: u16 },
    #[error("request failed: {0}")]
    Transport(String),
    #[error("invalid response: {0}")]
    Decode(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Dashboard-level errors, each recovered at the command that triggered it
#[derive(Debug, Error)]
pub enum DashError {
    #[error("no data in source \"{sheet}\"")]
    EmptySource { sheet: String },
    #[error("source \"{sheet}\" not found (HTTP {status}); check that the tab exists in the sheet")]
    SourceNotFound { sheet: String, status: u16 },
    #[error("source list unavailable: {0}")]
    ConfigUnavailable(String),
    #[error("no status column detected in this source")]
    NoStatusColumn,
    #[error("no description column detected; rows cannot be identified for update")]
    NoIdentityColumn,
    /// `row` is the 1-based row number as displayed
    #[error("row {row} is out of range (showing {len} rows)")]
    RowOutOfRange { row: usize, len: usize },
    /// `number` is a task number from the `#` column
    #[error("task #{number} is out of range ({count} tasks shown)")]
    TaskOutOfRange { number: usize, count: usize },
    #[error("row {row} is a section heading, not a task")]
    NotATask { row: usize },
    #[error("synchronisation failed for \"{description}\": {reason}")]
    MutationFailed { description: String, reason: String },
    #[error("no source selected")]
    NoSourceSelected,
    #[error(transparent)]
    Store(StoreError),
}

impl DashError {
    /// Map a read failure for `sheet` into the dashboard taxonomy
    pub fn from_read(sheet: &str, err: StoreError) -> Self {
        match err {
            StoreError::NotFound { status, .. } => DashError::SourceNotFound {
                sheet: sheet.to_string(),
                status,
            },
            other => DashError::Store(other),
        }
    }
}

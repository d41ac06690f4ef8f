use serde::Serialize;

use crate::filter::FilterSelection;
use crate::models::{Schema, TaskRow};
use crate::pipeline::FilterOptions;
use crate::render::{StatusCounts, TableView};

/// Mutable state of one dashboard session
///
/// `tasks` is the authoritative row set of the last load; `filtered` holds
/// positions into it for the rows passing the current selection.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub source: Option<String>,
    pub schema: Option<Schema>,
    pub tasks: Vec<TaskRow>,
    pub filtered: Vec<usize>,
    pub selection: FilterSelection,
    pub options: FilterOptions,
    pub visible: Vec<String>,
    /// Incremented by every load request
    pub generation: u64,
}

impl AppState {
    /// Drop everything derived from a load; the selection survives
    pub fn clear_loaded(&mut self) {
        self.schema = None;
        self.tasks.clear();
        self.filtered.clear();
        self.options = FilterOptions::default();
        self.visible.clear();
    }
}

/// Tag of an in-flight load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub source: String,
    pub generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Rows were loaded; counts are after classification and filtering
    Loaded { rows: usize, shown: usize },
    /// The source has no rows
    Empty,
    /// A newer load or another source superseded this response
    Stale,
}

/// Result of a successful status update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationOutcome {
    pub description: String,
    pub status: String,
}

/// Everything the output layer needs to draw the dashboard
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub source: Option<String>,
    pub table: TableView,
    pub counts: StatusCounts,
    pub options: FilterOptions,
    pub selection: FilterSelection,
    /// The status filter only applies when a status column exists
    pub status_filter: bool,
    pub shown: usize,
    pub total: usize,
}

use crate::app::state::{AppState, DashboardView, LoadOutcome, LoadRequest, MutationOutcome};
use crate::error::{DashError, StoreError};
use crate::filter::{filter_rows, FilterSelection};
use crate::models::{RawRow, Status, TaskRow};
use crate::pipeline::{build_filter_options, classify_rows, detect_schema, visible_columns};
use crate::render::{count_statuses, render_table, PresentationRow, StatusCounts, TableView, EMPTY_SOURCE_MESSAGE};
use crate::store::{RowStore, RowUpdate};

/// Controller for one dashboard session
#[derive(Debug, Default)]
pub struct Dashboard {
    state: AppState,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn source(&self) -> Option<&str> {
        self.state.source.as_deref()
    }

    /// Select the source the next load reads; the filter selection is kept
    pub fn select_source(&mut self, source: &str) {
        self.state.source = Some(source.to_string());
    }

    /// Tag a new load with the current source
    pub fn begin_load(&mut self) -> Result<LoadRequest, DashError> {
        let source = self.state.source.clone().ok_or(DashError::NoSourceSelected)?;
        self.state.generation += 1;
        Ok(LoadRequest {
            source,
            generation: self.state.generation,
        })
    }

    /// Apply the response of a load started with [`Dashboard::begin_load`]
    ///
    /// Responses for a source that is no longer selected, or superseded by a
    /// newer request, are discarded without touching the state.
    pub fn finish_load(
        &mut self,
        request: &LoadRequest,
        result: Result<Vec<RawRow>, StoreError>,
    ) -> Result<LoadOutcome, DashError> {
        if self.state.source.as_deref() != Some(request.source.as_str())
            || request.generation != self.state.generation
        {
            log::debug!("Discarding stale response for \"{}\"", request.source);
            return Ok(LoadOutcome::Stale);
        }

        match result {
            Ok(rows) => Ok(self.ingest(&request.source, &rows)),
            Err(err) => {
                self.state.clear_loaded();
                Err(DashError::from_read(&request.source, err))
            }
        }
    }

    /// Load the selected source from `store`
    pub fn load(&mut self, store: &dyn RowStore) -> Result<LoadOutcome, DashError> {
        let request = self.begin_load()?;
        let result = store.fetch_rows(&request.source);
        self.finish_load(&request, result)
    }

    /// Rebuild schema, rows and derived views from a fresh batch
    fn ingest(&mut self, source: &str, rows: &[RawRow]) -> LoadOutcome {
        log::debug!("Rows received for \"{}\": {}", source, rows.len());

        let schema = match detect_schema(source, rows) {
            Ok(schema) => schema,
            Err(_) => {
                self.state.clear_loaded();
                return LoadOutcome::Empty;
            }
        };

        let tasks = classify_rows(rows, &schema);
        self.state.options = build_filter_options(&tasks, &schema);
        self.state.visible = visible_columns(&tasks, &schema);

        // Selections for controls that disappeared no longer apply
        if schema.group_column().is_none() {
            self.state.selection.group = None;
        }
        if schema.assignee_column().is_none() {
            self.state.selection.assignee = None;
        }

        self.state.tasks = tasks;
        self.state.schema = Some(schema);
        self.apply_filters();

        LoadOutcome::Loaded {
            rows: self.state.tasks.len(),
            shown: self.state.filtered.len(),
        }
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.state.selection
    }

    /// Replace the filter selection and re-filter
    pub fn set_selection(&mut self, selection: FilterSelection) {
        self.state.selection = selection;
        self.apply_filters();
    }

    /// Recompute the filtered rows from the authoritative set
    pub fn apply_filters(&mut self) {
        self.state.filtered = match &self.state.schema {
            Some(schema) => filter_rows(&self.state.tasks, &self.state.selection, schema),
            None => Vec::new(),
        };
    }

    /// Rows passing the current selection, in display order
    pub fn filtered_rows(&self) -> Vec<&TaskRow> {
        self.state.filtered.iter().map(|&pos| &self.state.tasks[pos]).collect()
    }

    pub fn counts(&self) -> StatusCounts {
        match &self.state.schema {
            Some(schema) => count_statuses(&self.state.tasks, schema),
            None => StatusCounts::default(),
        }
    }

    /// Render the current state
    pub fn view(&self) -> DashboardView {
        let table = match &self.state.schema {
            Some(schema) => render_table(&self.filtered_rows(), &self.state.visible, schema),
            None => TableView {
                header: Vec::new(),
                rows: vec![PresentationRow::Empty {
                    message: EMPTY_SOURCE_MESSAGE.to_string(),
                    span: 0,
                }],
            },
        };

        DashboardView {
            source: self.state.source.clone(),
            table,
            counts: self.counts(),
            options: self.state.options.clone(),
            selection: self.state.selection.clone(),
            status_filter: self
                .state
                .schema
                .as_ref()
                .is_some_and(|s| s.status_column().is_some()),
            shown: self.state.filtered.len(),
            total: self.state.tasks.len(),
        }
    }

    /// Filtered position of the `number`-th task shown, counting from 1 and
    /// skipping section markers
    pub fn task_position(&self, number: usize) -> Result<usize, DashError> {
        let mut tasks = self
            .state
            .filtered
            .iter()
            .enumerate()
            .filter(|(_, &pos)| !self.state.tasks[pos].is_section_marker)
            .map(|(position, _)| position);
        let count = tasks.clone().count();
        number
            .checked_sub(1)
            .and_then(|n| tasks.nth(n))
            .ok_or(DashError::TaskOutOfRange { number, count })
    }

    /// Set the status of the row at `position` in the filtered rows
    ///
    /// The store is updated first, keyed on the row's description. Local rows
    /// change only once the store accepts the update; on failure the source is
    /// reloaded from the store and `MutationFailed` is returned.
    pub fn set_status(
        &mut self,
        store: &dyn RowStore,
        position: usize,
        status: Status,
    ) -> Result<MutationOutcome, DashError> {
        let schema = self.state.schema.as_ref().ok_or(DashError::NoStatusColumn)?;
        let status_column = schema.status_column().ok_or(DashError::NoStatusColumn)?.to_string();

        let task_pos = *self
            .state
            .filtered
            .get(position)
            .ok_or(DashError::RowOutOfRange {
                row: position + 1,
                len: self.state.filtered.len(),
            })?;
        if self.state.tasks[task_pos].is_section_marker {
            return Err(DashError::NotATask { row: position + 1 });
        }

        let description_column = schema
            .description_column()
            .ok_or(DashError::NoIdentityColumn)?
            .to_string();
        let description = self.state.tasks[task_pos].get(&description_column).to_string();
        let source = self.state.source.clone().ok_or(DashError::NoSourceSelected)?;
        let label = status.label();

        let update = RowUpdate::single(&description_column, &description, &status_column, label);
        if let Err(err) = store.update_rows(&source, &update) {
            log::error!("Failed to save status for \"{}\": {}", description, err);
            if let Err(reload_err) = self.load(store) {
                log::error!("Reload after failed update also failed: {}", reload_err);
            }
            return Err(DashError::MutationFailed {
                description,
                reason: err.to_string(),
            });
        }

        self.state.tasks[task_pos].set_status(&status_column, label);

        // The store updated the first row with this description
        if let Some(first) = self
            .state
            .tasks
            .iter()
            .position(|t| t.get(&description_column) == description)
        {
            if first != task_pos {
                log::warn!(
                    "Several rows share the description \"{}\"; the store updated the first one",
                    description
                );
                self.state.tasks[first].set_status(&status_column, label);
            }
        }

        self.apply_filters();
        log::info!("Status updated: \"{}\" -> {}", description, label);

        Ok(MutationOutcome {
            description,
            status: label.to_string(),
        })
    }
}

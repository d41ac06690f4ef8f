//! Filter engine
//!
//! Evaluates a [`FilterSelection`] against the classified rows of a source.
//!
//! # Rules
//!
//! - Section markers always pass, so headings keep separating the rows below
//!   them even when a filter empties their section.
//! - `group` matches the group cell exactly.
//! - `status` matches the normalized status exactly.
//! - `assignee` matches when the raw assignee cell contains the selection as
//!   a substring. This is looser than the option list, which offers split
//!   names: `Ann` also matches `Anna`.
//! - A selection whose column is absent from the schema is inert.

use crate::filter::parser::FilterSelection;
use crate::models::{Schema, TaskRow};

/// Check whether a single row passes the selection
pub fn row_matches(row: &TaskRow, selection: &FilterSelection, schema: &Schema) -> bool {
    if row.is_section_marker {
        return true;
    }

    let group_ok = match (selection.group.as_deref(), schema.group_column()) {
        (Some(wanted), Some(column)) => row.get(column) == wanted,
        _ => true,
    };

    let status_ok = match (selection.status.as_deref(), schema.status_column()) {
        (Some(wanted), Some(_)) => row.status.as_deref() == Some(wanted),
        _ => true,
    };

    let assignee_ok = match (selection.assignee.as_deref(), schema.assignee_column()) {
        (Some(wanted), Some(column)) => row.get(column).contains(wanted),
        _ => true,
    };

    group_ok && status_ok && assignee_ok
}

/// Positions (into `tasks`) of the rows passing the selection, in input order
pub fn filter_rows(tasks: &[TaskRow], selection: &FilterSelection, schema: &Schema) -> Vec<usize> {
    let filtered: Vec<usize> = tasks
        .iter()
        .enumerate()
        .filter(|(_, row)| row_matches(row, selection, schema))
        .map(|(pos, _)| pos)
        .collect();

    log::debug!("Filtering: {}/{} rows shown", filtered.len(), tasks.len());
    filtered
}

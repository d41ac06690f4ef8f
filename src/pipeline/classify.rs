//! Row classification
//!
//! Turns raw row-objects into [`TaskRow`]s: copies exactly the schema's
//! columns, decides whether a row is a section marker (a visual divider such
//! as `PHASE 2 - CONTENU` or `=====`), normalizes the status cell and drops
//! blank rows.

use std::sync::OnceLock;

use indexmap::IndexMap;
use regex::Regex;

use crate::models::{cell_text, normalize_status, RawRow, Schema, TaskRow, NOT_STARTED};

/// Keyword that marks a heading row
const PHASE_KEYWORD: &str = "PHASE";

/// Minimum length of an all-caps description to count as a heading
const ALL_CAPS_MIN_LEN: usize = 5;

/// Runs of three or more identical separator characters
fn separator_run() -> &'static Regex {
    static SEPARATOR_RUN: OnceLock<Regex> = OnceLock::new();
    SEPARATOR_RUN.get_or_init(|| Regex::new(r"={3,}|-{3,}|_{3,}").expect("valid separator regex"))
}

/// Any run of three or more separator characters, mixed or not
fn separator_punctuation() -> &'static Regex {
    static SEPARATOR_PUNCTUATION: OnceLock<Regex> = OnceLock::new();
    SEPARATOR_PUNCTUATION.get_or_init(|| Regex::new(r"[=\-_]{3,}").expect("valid punctuation regex"))
}

fn is_all_caps(text: &str) -> bool {
    text.chars().count() > ALL_CAPS_MIN_LEN
        && text.chars().any(char::is_uppercase)
        && text == text.to_uppercase()
}

/// Text heuristic for headings: a PHASE keyword, a separator run or an
/// all-caps description
fn looks_like_heading(description: &str, stage: &str) -> bool {
    description.to_uppercase().contains(PHASE_KEYWORD)
        || stage.to_uppercase().contains(PHASE_KEYWORD)
        || separator_run().is_match(description)
        || is_all_caps(description)
}

/// Classify one raw row
///
/// Returns `None` for rows with no text signal: an empty description that is
/// not a heading. Without a description column every description is empty,
/// so only headings are kept.
pub fn classify_row(index: usize, raw: &RawRow, schema: &Schema) -> Option<TaskRow> {
    let cells: IndexMap<String, String> = schema
        .names()
        .map(|name| {
            let value = raw.get(name).map(cell_text).unwrap_or_default();
            (name.to_string(), value)
        })
        .collect();

    let lookup = |column: Option<&str>| -> String {
        column
            .and_then(|c| cells.get(c))
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    };

    let description = lookup(schema.description_column());
    let stage = lookup(schema.stage_column());
    let assignee = lookup(schema.assignee_column());
    let raw_status = lookup(schema.status_column());

    // Missing assignee/status columns satisfy their half of the rule. Only the
    // exact sentinel counts as not started; "pas fait" is a started task.
    let unassigned = assignee.is_empty();
    let not_started = raw_status.is_empty()
        || schema
            .status_column()
            .and_then(|c| cells.get(c))
            .is_some_and(|v| v == NOT_STARTED);
    let is_section_marker = looks_like_heading(&description, &stage) && unassigned && not_started;

    if description.is_empty() && !is_section_marker {
        return None;
    }

    let mut row = TaskRow {
        index,
        cells,
        is_section_marker,
        status: None,
    };

    if let Some(column) = schema.status_column() {
        let label = if raw_status.is_empty() {
            NOT_STARTED.to_string()
        } else {
            normalize_status(&raw_status)
        };
        row.set_status(column, &label);
    }

    Some(row)
}

/// Classify a batch, preserving input order
pub fn classify_rows(rows: &[RawRow], schema: &Schema) -> Vec<TaskRow> {
    let tasks: Vec<TaskRow> = rows
        .iter()
        .enumerate()
        .filter_map(|(index, raw)| classify_row(index, raw, schema))
        .collect();

    let sections = tasks.iter().filter(|t| t.is_section_marker).count();
    log::debug!(
        "Classified {} of {} rows ({} section markers)",
        tasks.len(),
        rows.len(),
        sections
    );

    tasks
}

/// Display title of a section marker: the stage text when present, else the
/// description, with separator runs removed
pub fn section_title(row: &TaskRow, schema: &Schema) -> String {
    let stage = row.value_of(schema.stage_column()).trim();
    let source = if !stage.is_empty() {
        stage
    } else {
        row.value_of(schema.description_column())
    };
    separator_punctuation().replace_all(source, "").trim().to_string()
}

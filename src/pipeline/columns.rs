//! Visible column resolution

use crate::models::{Schema, TaskRow};
use crate::pipeline::options::PLACEHOLDER;
use crate::pipeline::schema::{matches_keywords, DESCRIPTION_KEYWORDS};

/// Columns worth a table column, in schema order
///
/// A column is kept when a non-marker row has a real value in it. Description
/// columns and the status column are always kept.
pub fn visible_columns(tasks: &[TaskRow], schema: &Schema) -> Vec<String> {
    let visible: Vec<String> = schema
        .columns
        .iter()
        .filter(|column| {
            let required = schema.status_column() == Some(column.name.as_str())
                || matches_keywords(&column.name, DESCRIPTION_KEYWORDS);
            required
                || tasks.iter().any(|t| {
                    let value = t.get(&column.name);
                    !t.is_section_marker && !value.trim().is_empty() && value != PLACEHOLDER
                })
        })
        .map(|column| column.name.clone())
        .collect();

    log::debug!("Visible columns: {:?}", visible);
    visible
}

//! Schema detection
//!
//! Column roles are inferred from column names by case-insensitive substring
//! match against the keyword tables below, never by position. This is the only
//! place the keyword tables are consulted; everything downstream reads the
//! resolved handles on [`Schema`].

use crate::error::DashError;
use crate::models::{Column, ColumnRole, RawRow, Schema};

pub const DESCRIPTION_KEYWORDS: &[&str] = &["description"];
pub const STATUS_KEYWORDS: &[&str] = &["avancement", "statut", "status"];
pub const GROUP_KEYWORDS: &[&str] = &["bu", "business"];
pub const ASSIGNEE_KEYWORDS: &[&str] = &["affectation", "assigné", "responsable"];
pub const STAGE_KEYWORDS: &[&str] = &["étape", "etape", "stage"];
pub const IMPORTANCE_KEYWORDS: &[&str] = &["importance", "priorité"];

/// Case-insensitive substring match of a column name against a keyword table
pub fn matches_keywords(column: &str, keywords: &[&str]) -> bool {
    let lower = column.to_lowercase();
    keywords.iter().any(|k| lower.contains(k))
}

fn first_matching(names: &[String], keywords: &[&str]) -> Option<String> {
    names.iter().find(|n| matches_keywords(n, keywords)).cloned()
}

/// Rendering role of a column; the status handle wins over name keywords
fn column_role(name: &str, status: Option<&str>) -> ColumnRole {
    if status == Some(name) {
        ColumnRole::Status
    } else if matches_keywords(name, DESCRIPTION_KEYWORDS) {
        ColumnRole::Description
    } else if matches_keywords(name, GROUP_KEYWORDS) {
        ColumnRole::Group
    } else if matches_keywords(name, IMPORTANCE_KEYWORDS) {
        ColumnRole::Importance
    } else if matches_keywords(name, ASSIGNEE_KEYWORDS) {
        ColumnRole::Assignee
    } else if matches_keywords(name, STAGE_KEYWORDS) {
        ColumnRole::Stage
    } else {
        ColumnRole::Other
    }
}

/// Detect the schema of a batch of rows loaded from `sheet`
///
/// The column set is the key set of the first row, in its key order, minus
/// keys that are blank after trimming. Later rows are not re-validated.
///
/// # Errors
///
/// `DashError::EmptySource` when the batch has no rows.
pub fn detect_schema(sheet: &str, rows: &[RawRow]) -> Result<Schema, DashError> {
    let first = rows.first().ok_or_else(|| DashError::EmptySource {
        sheet: sheet.to_string(),
    })?;

    let names: Vec<String> = first
        .keys()
        .filter(|k| !k.trim().is_empty())
        .cloned()
        .collect();

    let status = first_matching(&names, STATUS_KEYWORDS);
    let columns = names
        .iter()
        .map(|name| Column {
            name: name.clone(),
            role: column_role(name, status.as_deref()),
        })
        .collect();

    let schema = Schema {
        columns,
        description: first_matching(&names, DESCRIPTION_KEYWORDS),
        group: first_matching(&names, GROUP_KEYWORDS),
        assignee: first_matching(&names, ASSIGNEE_KEYWORDS),
        stage: first_matching(&names, STAGE_KEYWORDS),
        importance: first_matching(&names, IMPORTANCE_KEYWORDS),
        status,
    };

    log::debug!("Detected columns for \"{}\": {:?}", sheet, names);
    log::debug!("Status column: {:?}", schema.status);

    Ok(schema)
}

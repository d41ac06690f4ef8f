use serde::Serialize;

use crate::models::{Column, ColumnRole, Schema, Status, TaskRow};
use crate::pipeline::classify::section_title;
use crate::pipeline::options::PLACEHOLDER;

/// Shown instead of rows when no row passes the filters
pub const NO_MATCH_MESSAGE: &str = "No task matches the selected filters.";

/// Shown when the source itself has no rows
pub const EMPTY_SOURCE_MESSAGE: &str = "No data in this source.";

/// Title used for a heading row whose text is only separators
pub const BLANK_SECTION_TITLE: &str = "───────";

const DEFAULT_GLYPH: &str = "▸";

/// Heading glyphs keyed on phase keywords; first match wins
const SECTION_GLYPHS: &[(&[&str], &str)] = &[
    (&["PHASE 0", "PASSATION"], "◆"),
    (&["PHASE 1", "FONDATION"], "▸"),
    (&["PHASE 2", "CONTENU"], "▹"),
    (&["PHASE 3", "DÉVELOPPEMENT", "DEVELOPPEMENT"], "▸"),
    (&["PHASE 4"], "▹"),
    (&["PHASE 5"], "▸"),
];

/// Pick the decorative glyph for a heading title
pub fn section_glyph(title: &str) -> &'static str {
    let upper = title.to_uppercase();
    SECTION_GLYPHS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| upper.contains(k)))
        .map(|(_, glyph)| *glyph)
        .unwrap_or(DEFAULT_GLYPH)
}

/// Tri-state status control: at most one state is active
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusControl {
    pub active: Option<Status>,
    /// Normalized value, kept for statuses outside the three canonical labels
    pub value: String,
}

impl StatusControl {
    pub fn new(value: &str) -> Self {
        Self {
            active: Status::from_label(value),
            value: value.to_string(),
        }
    }

    pub fn is_active(&self, status: Status) -> bool {
        self.active == Some(status)
    }
}

/// One table cell; the variant carries the presentational treatment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Cell {
    Text { column: String, value: String },
    Description { column: String, value: String },
    Group { column: String, value: String },
    Badge { column: String, value: Option<String> },
    Status { column: String, control: StatusControl },
}

impl Cell {
    pub fn column(&self) -> &str {
        match self {
            Cell::Text { column, .. }
            | Cell::Description { column, .. }
            | Cell::Group { column, .. }
            | Cell::Badge { column, .. }
            | Cell::Status { column, .. } => column,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PresentationRow {
    /// Single merged row when nothing is shown
    Empty { message: String, span: usize },
    /// Heading spanning all visible columns
    Section { glyph: String, title: String, span: usize },
    /// A task; `position` is its index in the filtered rows, `number` its
    /// 1-based rank among the tasks shown (headings are not numbered)
    Task { position: usize, number: usize, cells: Vec<Cell> },
}

/// Rendered table: header plus rows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TableView {
    pub header: Vec<Column>,
    pub rows: Vec<PresentationRow>,
}

fn display_value(value: &str) -> String {
    if value.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        value.to_string()
    }
}

fn render_cell(row: &TaskRow, column: &str, schema: &Schema) -> Cell {
    let value = row.get(column);
    let column_name = column.to_string();

    if schema.status_column() == Some(column) {
        let status = row.status.as_deref().unwrap_or(value);
        return Cell::Status {
            column: column_name,
            control: StatusControl::new(status),
        };
    }

    match schema.role_of(column) {
        ColumnRole::Description => Cell::Description {
            column: column_name,
            value: display_value(value),
        },
        ColumnRole::Group => Cell::Group {
            column: column_name,
            value: display_value(value),
        },
        ColumnRole::Importance => Cell::Badge {
            column: column_name,
            value: if value.is_empty() || value == PLACEHOLDER {
                None
            } else {
                Some(value.to_string())
            },
        },
        _ => Cell::Text {
            column: column_name,
            value: display_value(value),
        },
    }
}

fn render_section(row: &TaskRow, schema: &Schema, span: usize) -> PresentationRow {
    let title = section_title(row, schema);
    if title.is_empty() {
        return PresentationRow::Section {
            glyph: String::new(),
            title: BLANK_SECTION_TITLE.to_string(),
            span,
        };
    }
    PresentationRow::Section {
        glyph: section_glyph(&title).to_string(),
        title,
        span,
    }
}

/// Render filtered rows against the visible columns
pub fn render_table(rows: &[&TaskRow], visible: &[String], schema: &Schema) -> TableView {
    let header: Vec<Column> = visible
        .iter()
        .map(|name| Column {
            name: name.clone(),
            role: schema.role_of(name),
        })
        .collect();
    let span = visible.len();

    if rows.is_empty() {
        return TableView {
            header,
            rows: vec![PresentationRow::Empty {
                message: NO_MATCH_MESSAGE.to_string(),
                span,
            }],
        };
    }

    let mut number = 0;
    let rows = rows
        .iter()
        .enumerate()
        .map(|(position, row)| {
            if row.is_section_marker {
                render_section(row, schema, span)
            } else {
                number += 1;
                PresentationRow::Task {
                    position,
                    number,
                    cells: visible.iter().map(|c| render_cell(row, c, schema)).collect(),
                }
            }
        })
        .collect();

    TableView { header, rows }
}

// Output formatting utilities

use std::io::IsTerminal;

use crate::app::DashboardView;
use crate::models::{ColumnRole, Schema, Status};
use crate::pipeline::{FilterChoice, FilterOptionList, FilterOptions};
use crate::render::{Cell, PresentationRow, StatusControl, StatusCounts, TableView};
use crate::sources::{SourceList, SourceOrigin};

// ANSI escape codes for terminal formatting
const ANSI_BOLD: &str = "\x1b[1m";
const ANSI_RESET: &str = "\x1b[0m";

// ANSI foreground colors (standard 16-color palette)
const ANSI_FG_GREEN: &str = "\x1b[32m";
const ANSI_FG_YELLOW: &str = "\x1b[33m";
const ANSI_FG_CYAN: &str = "\x1b[36m";
const ANSI_FG_BRIGHT_BLACK: &str = "\x1b[90m";

const ROW_NUMBER_LABEL: &str = "#";
const MIN_COLUMN_WIDTH: usize = 4;
const MIN_DESCRIPTION_WIDTH: usize = 12;
const ELLIPSIS: char = '…';

const GLYPH_ON: char = '●';
const GLYPH_OFF: char = '○';

/// Check if stdout is a terminal (TTY)
pub fn is_tty() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width dynamically
///
/// Uses the `terminal_size` crate for reliable detection, with fallback to
/// COLUMNS environment variable and a sensible default.
pub fn get_terminal_width() -> usize {
    if let Some((terminal_size::Width(w), _)) = terminal_size::terminal_size() {
        if w > 0 {
            return w as usize;
        }
    }

    if let Ok(cols) = std::env::var("COLUMNS") {
        if let Ok(width) = cols.parse::<usize>() {
            if width > 0 && width < 10000 {
                return width;
            }
        }
    }

    120
}

/// Apply bold formatting if in TTY mode
fn bold_if_tty(text: &str, is_tty: bool) -> String {
    if is_tty {
        format!("{}{}{}", ANSI_BOLD, text, ANSI_RESET)
    } else {
        text.to_string()
    }
}

fn color_if_tty(text: &str, color: &str, is_tty: bool) -> String {
    if is_tty {
        format!("{}{}{}", color, text, ANSI_RESET)
    } else {
        text.to_string()
    }
}

fn status_color(status: Option<Status>) -> &'static str {
    match status {
        Some(Status::NotStarted) => ANSI_FG_BRIGHT_BLACK,
        Some(Status::InProgress) => ANSI_FG_YELLOW,
        Some(Status::Done) => ANSI_FG_GREEN,
        None => ANSI_FG_CYAN,
    }
}

/// Tri-state glyphs for a status control, one per canonical status
///
/// `●○○` not started, `○●○` in progress, `○○●` done. An unrecognised value
/// shows all three off followed by the raw value.
pub fn format_status_control(control: &StatusControl) -> String {
    let glyphs: String = Status::ALL
        .iter()
        .map(|s| if control.is_active(*s) { GLYPH_ON } else { GLYPH_OFF })
        .collect();
    if control.active.is_some() || control.value.is_empty() {
        glyphs
    } else {
        format!("{} {}", glyphs, control.value)
    }
}

/// Plain text of a rendered cell
pub fn cell_display(cell: &Cell) -> String {
    match cell {
        Cell::Text { value, .. } | Cell::Description { value, .. } | Cell::Group { value, .. } => value.clone(),
        Cell::Badge { value, .. } => value.clone().unwrap_or_else(|| "-".to_string()),
        Cell::Status { control, .. } => format_status_control(control),
    }
}

/// Truncate by character count, marking the cut with an ellipsis
pub fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut truncated: String = value.chars().take(width - 1).collect();
    truncated.push(ELLIPSIS);
    truncated
}

fn total_width(widths: &[usize]) -> usize {
    if widths.is_empty() {
        return 0;
    }
    widths.iter().sum::<usize>() + widths.len() - 1
}

/// Shrink column widths until the table fits `target`
///
/// The description column gives way first, then the widest remaining column
/// one character at a time. The row number column (index 0) is never shrunk.
fn fit_widths(widths: &mut [usize], description: Option<usize>, target: usize) {
    if let Some(idx) = description {
        let excess = total_width(widths).saturating_sub(target);
        if excess > 0 {
            widths[idx] = widths[idx].saturating_sub(excess).max(MIN_DESCRIPTION_WIDTH.min(widths[idx]));
        }
    }

    while total_width(widths) > target {
        let widest = widths
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, w)| **w > MIN_COLUMN_WIDTH)
            .max_by_key(|(_, w)| **w)
            .map(|(idx, _)| idx);
        match widest {
            Some(idx) => widths[idx] -= 1,
            None => break,
        }
    }
}

/// Format the table as aligned text
///
/// Tasks are numbered in the `#` column from 1, skipping headings; `set`
/// takes the same numbers.
pub fn format_table(table: &TableView, tty: bool, terminal_width: usize) -> String {
    let mut output = String::new();

    if table.header.is_empty() {
        for row in &table.rows {
            if let PresentationRow::Empty { message, .. } = row {
                output.push_str(message);
                output.push('\n');
            }
        }
        return output;
    }

    let mut labels = vec![ROW_NUMBER_LABEL.to_string()];
    labels.extend(table.header.iter().map(|c| c.name.clone()));

    let data: Vec<Option<Vec<String>>> = table
        .rows
        .iter()
        .map(|row| match row {
            PresentationRow::Task { number, cells, .. } => {
                let mut values = vec![number.to_string()];
                values.extend(cells.iter().map(cell_display));
                Some(values)
            }
            _ => None,
        })
        .collect();

    let mut widths: Vec<usize> = labels.iter().map(|l| l.chars().count().max(1)).collect();
    for values in data.iter().flatten() {
        for (idx, value) in values.iter().enumerate() {
            widths[idx] = widths[idx].max(value.chars().count());
        }
    }

    let description = table
        .header
        .iter()
        .position(|c| c.role == ColumnRole::Description)
        .map(|idx| idx + 1);
    fit_widths(&mut widths, description, terminal_width);
    let line_width = total_width(&widths);

    let header_line: Vec<String> = labels
        .iter()
        .zip(&widths)
        .map(|(label, width)| format!("{:<width$}", truncate(label, *width), width = width))
        .collect();
    output.push_str(&bold_if_tty(header_line.join(" ").trim_end(), tty));
    output.push('\n');
    let separator: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
    output.push_str(&separator.join(" "));
    output.push('\n');

    for (row, values) in table.rows.iter().zip(&data) {
        match (row, values) {
            (PresentationRow::Task { cells, .. }, Some(values)) => {
                let mut line = Vec::with_capacity(values.len());
                for (idx, value) in values.iter().enumerate() {
                    let width = widths[idx];
                    let padded = format!("{:<width$}", truncate(value, width), width = width);
                    let formatted = match idx.checked_sub(1).and_then(|i| cells.get(i)) {
                        None => bold_if_tty(&padded, tty),
                        Some(Cell::Status { control, .. }) => {
                            color_if_tty(&padded, status_color(control.active), tty)
                        }
                        Some(_) => padded,
                    };
                    line.push(formatted);
                }
                output.push_str(line.join(" ").trim_end());
            }
            (PresentationRow::Section { glyph, title, .. }, _) => {
                let text = if glyph.is_empty() {
                    title.clone()
                } else {
                    format!("{} {}", glyph, title)
                };
                output.push_str(&bold_if_tty(&truncate(&text, line_width), tty));
            }
            (PresentationRow::Empty { message, .. }, _) => {
                output.push_str(&truncate(message, line_width.max(message.chars().count())));
            }
            (PresentationRow::Task { .. }, None) => {}
        }
        output.push('\n');
    }

    output
}

fn format_choices(list: &FilterOptionList, selected: Option<&str>) -> String {
    list.choices
        .iter()
        .map(|choice| match choice {
            FilterChoice::All if selected.is_none() => "[all]".to_string(),
            FilterChoice::All => "all".to_string(),
            FilterChoice::Value(v) if selected == Some(v.as_str()) => format!("[{}]", v),
            FilterChoice::Value(v) => v.clone(),
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Filter controls section; hidden controls are omitted
pub fn format_filter_controls(view: &DashboardView) -> String {
    let mut output = String::new();
    output.push_str("=== Filters ===\n");

    let controls = [
        ("group", &view.options.group, view.selection.group.as_deref()),
        ("assignee", &view.options.assignee, view.selection.assignee.as_deref()),
    ];
    let mut shown = 0;
    for (key, list, selected) in controls {
        if !list.is_visible() {
            continue;
        }
        let column = list.column.as_deref().unwrap_or(key);
        output.push_str(&format!("{} ({}): {}\n", key, column, format_choices(list, selected)));
        // Assignee selection is free text and may not be one of the listed names
        if let Some(text) = selected {
            if !list.contains(text) {
                output.push_str(&format!("  matching \"{}\"\n", text));
            }
        }
        shown += 1;
    }

    if view.status_filter {
        let selected = view.selection.status.as_deref();
        let mut choices = vec![if selected.is_none() { "[all]".to_string() } else { "all".to_string() }];
        for status in Status::ALL {
            let label = status.label();
            if selected == Some(label) {
                choices.push(format!("[{}]", label));
            } else {
                choices.push(label.to_string());
            }
        }
        output.push_str(&format!("status: {}\n", choices.join(" | ")));
        if let Some(label) = selected {
            if Status::from_label(label).is_none() {
                output.push_str(&format!("  matching \"{}\"\n", label));
            }
        }
        shown += 1;
    }

    if shown == 0 {
        output.push_str("No filters available for this source.\n");
    }
    output
}

/// Counters line, one entry per canonical status
pub fn format_counts(counts: &StatusCounts, tty: bool) -> String {
    Status::ALL
        .iter()
        .map(|s| {
            let entry = format!("{}: {}", s.label(), counts.get(*s));
            color_if_tty(&entry, status_color(Some(*s)), tty)
        })
        .collect::<Vec<_>>()
        .join("   ")
}

/// Full dashboard: table, filters and counters
pub fn format_dashboard(view: &DashboardView, tty: bool, terminal_width: usize) -> String {
    let mut output = String::new();

    let title = view.source.as_deref().unwrap_or("-");
    output.push_str(&bold_if_tty(&format!("=== {} ===", title), tty));
    output.push('\n');
    output.push_str(&format_table(&view.table, tty, terminal_width));
    output.push('\n');

    if view.total > 0 {
        output.push_str(&format!("Showing {} of {} rows\n\n", view.shown, view.total));
        output.push_str(&format_filter_controls(view));
        output.push('\n');
    }

    output.push_str("=== Status ===\n");
    output.push_str(&format_counts(&view.counts, tty));
    output.push('\n');
    output
}

/// Source list, marking the selected source
pub fn format_sources(list: &SourceList, selected: Option<&str>) -> String {
    let mut output = String::new();
    let width = list
        .entries
        .iter()
        .map(|e| e.value.chars().count())
        .max()
        .unwrap_or(0);

    for entry in &list.entries {
        let marker = if selected == Some(entry.value.as_str()) { "*" } else { " " };
        if entry.label == entry.value {
            output.push_str(&format!("{} {}\n", marker, entry.value));
        } else {
            output.push_str(&format!("{} {:<width$}  {}\n", marker, entry.value, entry.label, width = width));
        }
    }

    if list.origin == SourceOrigin::Defaults {
        output.push_str("(built-in defaults; source configuration unavailable)\n");
    }
    output
}

/// Detected columns, visible columns and filter option lists
pub fn format_schema(schema: &Schema, visible: &[String], options: &FilterOptions) -> String {
    let mut output = String::new();
    output.push_str("=== Columns ===\n");

    let width = schema
        .columns
        .iter()
        .map(|c| c.name.chars().count())
        .max()
        .unwrap_or(0)
        .max(MIN_COLUMN_WIDTH);
    for column in &schema.columns {
        let shown = if visible.contains(&column.name) { "" } else { "  (hidden)" };
        output.push_str(&format!(
            "{:<width$}  {}{}\n",
            column.name,
            column.role.as_str(),
            shown,
            width = width
        ));
    }

    output.push_str("\n=== Filter options ===\n");
    for (key, list) in [("group", &options.group), ("assignee", &options.assignee)] {
        if list.is_visible() {
            output.push_str(&format!("{}: {}\n", key, list.values().join(", ")));
        } else {
            output.push_str(&format!("{}: (hidden)\n", key));
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Dashboard;
    use crate::error::StoreError;
    use crate::filter::FilterSelection;
    use crate::models::RawRow;
    use crate::sources::{default_sources, SourceEntry};
    use crate::store::{RowStore, RowUpdate};
    use serde_json::json;

    struct StaticStore(serde_json::Value);

    impl RowStore for StaticStore {
        fn fetch_rows(&self, _sheet: &str) -> Result<Vec<RawRow>, StoreError> {
            serde_json::from_value(self.0.clone()).map_err(|e| StoreError::Decode(e.to_string()))
        }

        fn update_rows(&self, _sheet: &str, _update: &RowUpdate) -> Result<(), StoreError> {
            Ok(())
        }
    }

    fn load_dashboard(rows: serde_json::Value) -> Dashboard {
        let mut dashboard = Dashboard::new();
        dashboard.select_source("Tache du jour");
        dashboard.load(&StaticStore(rows)).unwrap();
        dashboard
    }

    fn sample() -> Dashboard {
        load_dashboard(json!([
            {"DESCRIPTION": "PHASE 1 - FONDATIONS", "BU": "", "AFFECTATION": "", "AVANCEMENT": ""},
            {"DESCRIPTION": "Prospection", "BU": "Sales", "AFFECTATION": "Alice", "AVANCEMENT": "fait"},
            {"DESCRIPTION": "Inventaire", "BU": "Ops", "AFFECTATION": "Bob", "AVANCEMENT": ""},
            {"DESCRIPTION": "Relecture", "BU": "Ops", "AFFECTATION": "", "AVANCEMENT": "bloqué"}
        ]))
    }

    #[test]
    fn test_status_control_glyphs() {
        assert_eq!(format_status_control(&StatusControl::new("PAS FAIT")), "●○○");
        assert_eq!(format_status_control(&StatusControl::new("EN COURS")), "○●○");
        assert_eq!(format_status_control(&StatusControl::new("FAIT")), "○○●");
        assert_eq!(format_status_control(&StatusControl::new("BLOQUÉ")), "○○○ BLOQUÉ");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Inventaire", 20), "Inventaire");
        assert_eq!(truncate("Inventaire", 6), "Inven…");
        assert_eq!(truncate("Étape", 5), "Étape");
        assert_eq!(truncate("abc", 0), "");
    }

    #[test]
    fn test_fit_widths_shrinks_description_first() {
        let mut widths = vec![1, 40, 10, 8];
        fit_widths(&mut widths, Some(1), 50);
        assert_eq!(widths, vec![1, 28, 10, 8]);

        let mut widths = vec![1, 40, 10, 8];
        fit_widths(&mut widths, Some(1), 30);
        assert!(total_width(&widths) <= 30);
        assert_eq!(widths[0], 1);
        assert!(widths[1] >= MIN_COLUMN_WIDTH);
    }

    #[test]
    fn test_table_text() {
        let view = sample().view();
        let text = format_table(&view.table, false, 120);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("#"));
        assert!(lines[0].contains("DESCRIPTION") && lines[0].contains("AVANCEMENT"));
        assert!(lines[1].starts_with("─"));
        assert_eq!(lines[2], "▸ PHASE 1 - FONDATIONS");
        // Headings take no number
        assert!(lines[3].starts_with("1 "));
        assert!(lines[3].contains("Prospection") && lines[3].ends_with("○○●"));
        assert!(lines[4].starts_with("2 "));
        assert!(lines[4].contains("Inventaire") && lines[4].ends_with("●○○"));
        assert!(lines[5].ends_with("○○○ BLOQUÉ"));
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn test_table_fits_narrow_terminal() {
        let view = sample().view();
        let text = format_table(&view.table, false, 40);
        for line in text.lines() {
            assert!(line.chars().count() <= 40, "{}", line);
        }
        assert!(text.contains('…'));
    }

    #[test]
    fn test_tty_adds_ansi() {
        let view = sample().view();
        let text = format_table(&view.table, true, 120);
        assert!(text.contains(ANSI_BOLD));
        assert!(text.contains(ANSI_FG_GREEN));
    }

    #[test]
    fn test_no_match_row() {
        let mut dashboard = sample();
        dashboard.set_selection(FilterSelection::default().with_group("Nobody"));
        // The marker still passes
        assert_eq!(dashboard.filtered_rows().len(), 1);

        let mut dashboard = load_dashboard(json!([{"DESCRIPTION": "a", "AVANCEMENT": "fait"}]));
        dashboard.set_selection(FilterSelection::default().with_status("PAS FAIT"));
        let text = format_table(&dashboard.view().table, false, 120);
        assert!(text.contains("No task matches the selected filters."));
    }

    #[test]
    fn test_empty_source_message() {
        let view = load_dashboard(json!([])).view();
        let text = format_dashboard(&view, false, 120);
        assert!(text.contains("No data in this source."));
        assert!(!text.contains("=== Filters ==="));
        assert!(text.contains("PAS FAIT: 0"));
    }

    #[test]
    fn test_filter_controls() {
        let mut dashboard = sample();
        dashboard.set_selection(FilterSelection::default().with_group("Ops").with_assignee("bo"));
        let text = format_filter_controls(&dashboard.view());
        assert!(text.contains("group (BU): all | [Ops] | Sales"));
        assert!(text.contains("assignee (AFFECTATION): all | Alice | Bob"));
        assert!(text.contains("matching \"bo\""));
        assert!(text.contains("status: [all] | PAS FAIT | EN COURS | FAIT"));
    }

    #[test]
    fn test_filter_controls_hidden() {
        let view = load_dashboard(json!([{"DESCRIPTION": "a", "NOTE": "x"}])).view();
        let text = format_filter_controls(&view);
        assert!(!text.contains("group"));
        assert!(!text.contains("status:"));
        assert!(text.contains("No filters available"));
    }

    #[test]
    fn test_counts_line() {
        let counts = StatusCounts { not_started: 2, in_progress: 0, done: 5 };
        assert_eq!(format_counts(&counts, false), "PAS FAIT: 2   EN COURS: 0   FAIT: 5");
    }

    #[test]
    fn test_dashboard_sections() {
        let text = format_dashboard(&sample().view(), false, 120);
        assert!(text.starts_with("=== Tache du jour ==="));
        assert!(text.contains("Showing 4 of 4 rows"));
        assert!(text.contains("=== Filters ==="));
        assert!(text.contains("PAS FAIT: 1   EN COURS: 0   FAIT: 1"));
    }

    #[test]
    fn test_sources_listing() {
        let list = SourceList {
            entries: default_sources(),
            origin: SourceOrigin::Defaults,
        };
        let text = format_sources(&list, Some("depot jeux"));
        assert!(text.contains("* depot jeux"));
        assert!(text.contains("Certeco & Veryproof"));
        assert!(text.contains("built-in defaults"));

        let list = SourceList {
            entries: vec![SourceEntry::new("Sprint", "Sprint")],
            origin: SourceOrigin::Config,
        };
        assert_eq!(format_sources(&list, None), "  Sprint\n");
    }

    #[test]
    fn test_schema_listing() {
        let dashboard = load_dashboard(json!([
            {"DESCRIPTION": "a", "BU": "", "NOTE": "", "AVANCEMENT": ""}
        ]));
        let state = dashboard.state();
        let schema = state.schema.as_ref().unwrap();
        let text = format_schema(schema, &state.visible, &state.options);
        assert!(text.contains("DESCRIPTION  description"));
        assert!(text.contains("NOTE         other  (hidden)"));
        assert!(text.contains("AVANCEMENT   status"));
        assert!(text.contains("group: (hidden)"));
    }
}

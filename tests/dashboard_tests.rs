use std::cell::RefCell;
use std::collections::HashMap;

use serde_json::{json, Value};
use sheetdash::app::{Dashboard, LoadOutcome};
use sheetdash::error::{DashError, StoreError};
use sheetdash::filter::FilterSelection;
use sheetdash::models::{RawRow, Status};
use sheetdash::render::{PresentationRow, StatusCounts};
use sheetdash::store::{RowStore, RowUpdate};

/// In-memory store keyed by source name, recording every request
#[derive(Default)]
struct MemoryStore {
    sheets: RefCell<HashMap<String, Vec<RawRow>>>,
    reject_updates: bool,
    fetched: RefCell<Vec<String>>,
    updates: RefCell<Vec<(String, RowUpdate)>>,
}

impl MemoryStore {
    fn with(sheet: &str, rows: Value) -> Self {
        let store = Self::default();
        store.put(sheet, rows);
        store
    }

    fn put(&self, sheet: &str, rows: Value) {
        let rows: Vec<RawRow> = serde_json::from_value(rows).unwrap();
        self.sheets.borrow_mut().insert(sheet.to_string(), rows);
    }

    fn cell(&self, sheet: &str, row: usize, column: &str) -> Value {
        self.sheets.borrow()[sheet][row][column].clone()
    }
}

impl RowStore for MemoryStore {
    fn fetch_rows(&self, sheet: &str) -> Result<Vec<RawRow>, StoreError> {
        self.fetched.borrow_mut().push(sheet.to_string());
        self.sheets
            .borrow()
            .get(sheet)
            .cloned()
            .ok_or(StoreError::NotFound { sheet: sheet.to_string(), status: 404 })
    }

    fn update_rows(&self, sheet: &str, update: &RowUpdate) -> Result<(), StoreError> {
        self.updates.borrow_mut().push((sheet.to_string(), update.clone()));
        if self.reject_updates {
            return Err(StoreError::Rejected { status: 500 });
        }
        let mut sheets = self.sheets.borrow_mut();
        let rows = sheets.get_mut(sheet).ok_or(StoreError::Rejected { status: 404 })?;
        if let Some(row) = rows.iter_mut().find(|row| {
            update
                .condition
                .iter()
                .all(|(k, v)| row.get(k).and_then(Value::as_str) == Some(v.as_str()))
        }) {
            for (k, v) in &update.set {
                row.insert(k.clone(), Value::String(v.clone()));
            }
        }
        Ok(())
    }
}

fn roadmap() -> Value {
    json!([
        {"ÉTAPE": "PHASE 0 - PASSATION", "DESCRIPTION": "", "BU": "", "AFFECTATION": "", "IMPORTANCE": "", "AVANCEMENT": "", "NOTES": ""},
        {"ÉTAPE": "", "DESCRIPTION": "Audit des accès", "BU": "Ops", "AFFECTATION": "Alice, Bob", "IMPORTANCE": "Haute", "AVANCEMENT": "fait", "NOTES": "-"},
        {"ÉTAPE": "", "DESCRIPTION": "Fiche produit", "BU": "Sales", "AFFECTATION": "Bob/Carol", "IMPORTANCE": "-", "AVANCEMENT": "", "NOTES": ""},
        {"ÉTAPE": "", "DESCRIPTION": "", "BU": "Sales", "AFFECTATION": "", "IMPORTANCE": "", "AVANCEMENT": "", "NOTES": ""},
        {"ÉTAPE": "", "DESCRIPTION": "=== CONTENU ===", "BU": "", "AFFECTATION": "", "IMPORTANCE": "", "AVANCEMENT": "PAS FAIT", "NOTES": ""},
        {"ÉTAPE": "", "DESCRIPTION": "Rédaction FAQ", "BU": "Sales", "AFFECTATION": "", "IMPORTANCE": "", "AVANCEMENT": "En cours", "NOTES": ""},
        {"ÉTAPE": "", "DESCRIPTION": "Traduction", "BU": "Ops", "AFFECTATION": "Annabelle", "IMPORTANCE": "", "AVANCEMENT": "à revoir", "NOTES": ""}
    ])
}

fn open(store: &MemoryStore, source: &str) -> Dashboard {
    let mut dashboard = Dashboard::new();
    dashboard.select_source(source);
    dashboard.load(store).unwrap();
    dashboard
}

fn descriptions(dashboard: &Dashboard) -> Vec<String> {
    dashboard
        .filtered_rows()
        .iter()
        .map(|row| row.get("DESCRIPTION").to_string())
        .collect()
}

#[test]
fn test_load_classifies_and_drops_blank_rows() {
    let store = MemoryStore::with("roadmap", roadmap());
    let dashboard = open(&store, "roadmap");
    let state = dashboard.state();

    assert_eq!(state.tasks.len(), 6);
    let markers: Vec<usize> = state
        .tasks
        .iter()
        .filter(|t| t.is_section_marker)
        .map(|t| t.index)
        .collect();
    assert_eq!(markers, vec![0, 4]);
    // Load indices survive the dropped blank row
    let indices: Vec<usize> = state.tasks.iter().map(|t| t.index).collect();
    assert_eq!(indices, vec![0, 1, 2, 4, 5, 6]);
    assert_eq!(state.tasks[4].status.as_deref(), Some("EN COURS"));
    assert_eq!(state.tasks[5].status.as_deref(), Some("À REVOIR"));
}

#[test]
fn test_visible_columns_and_options() {
    let store = MemoryStore::with("roadmap", roadmap());
    let dashboard = open(&store, "roadmap");
    let state = dashboard.state();

    // ÉTAPE only has text on a heading row; NOTES only has placeholders
    assert_eq!(
        state.visible,
        vec!["DESCRIPTION", "BU", "AFFECTATION", "IMPORTANCE", "AVANCEMENT"]
    );
    assert_eq!(state.options.group.values(), vec!["Ops", "Sales"]);
    assert_eq!(state.options.assignee.values(), vec!["Alice", "Annabelle", "Bob", "Carol"]);
}

#[test]
fn test_group_filter_keeps_markers() {
    let store = MemoryStore::with("roadmap", roadmap());
    let mut dashboard = open(&store, "roadmap");
    dashboard.set_selection(FilterSelection::default().with_group("Sales"));

    assert_eq!(
        descriptions(&dashboard),
        vec!["", "Fiche produit", "=== CONTENU ===", "Rédaction FAQ"]
    );
    // Counters ignore the selection
    assert_eq!(
        dashboard.counts(),
        StatusCounts { not_started: 1, in_progress: 1, done: 1 }
    );
}

#[test]
fn test_assignee_filter_is_substring() {
    let store = MemoryStore::with("roadmap", roadmap());
    let mut dashboard = open(&store, "roadmap");

    dashboard.set_selection(FilterSelection::default().with_assignee("Bob"));
    assert_eq!(
        descriptions(&dashboard),
        vec!["", "Audit des accès", "Fiche produit", "=== CONTENU ==="]
    );

    // "Ann" also matches "Annabelle"
    dashboard.set_selection(FilterSelection::default().with_assignee("Ann"));
    assert!(descriptions(&dashboard).contains(&"Traduction".to_string()));
}

#[test]
fn test_combined_filters() {
    let store = MemoryStore::with("roadmap", roadmap());
    let mut dashboard = open(&store, "roadmap");
    dashboard.set_selection(
        FilterSelection::default()
            .with_group("Sales")
            .with_status("todo")
            .with_assignee("Carol"),
    );
    assert_eq!(descriptions(&dashboard), vec!["", "Fiche produit", "=== CONTENU ==="]);
}

#[test]
fn test_view_section_rows() {
    let store = MemoryStore::with("roadmap", roadmap());
    let dashboard = open(&store, "roadmap");
    let view = dashboard.view();

    assert_eq!(view.table.header.len(), 5);
    match &view.table.rows[0] {
        PresentationRow::Section { glyph, title, span } => {
            assert_eq!(glyph, "◆");
            assert_eq!(title, "PHASE 0 - PASSATION");
            assert_eq!(*span, 5);
        }
        other => panic!("expected section, got {:?}", other),
    }
    match &view.table.rows[3] {
        PresentationRow::Section { glyph, title, .. } => {
            assert_eq!(glyph, "▹");
            assert_eq!(title, "CONTENU");
        }
        other => panic!("expected section, got {:?}", other),
    }
}

#[test]
fn test_set_status_round_trip() {
    let store = MemoryStore::with("roadmap", roadmap());
    let mut dashboard = open(&store, "roadmap");
    dashboard.set_selection(FilterSelection::default().with_group("Sales"));

    // Filtered: heading, Fiche produit, heading, Rédaction FAQ
    let outcome = dashboard.set_status(&store, 3, Status::Done).unwrap();
    assert_eq!(outcome.description, "Rédaction FAQ");

    let updates = store.updates.borrow();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].0, "roadmap");
    assert_eq!(
        updates[0].1,
        RowUpdate::single("DESCRIPTION", "Rédaction FAQ", "AVANCEMENT", "FAIT")
    );
    assert_eq!(store.cell("roadmap", 5, "AVANCEMENT"), "FAIT");
    assert_eq!(dashboard.counts().done, 2);

    // A fresh load agrees with the local state
    let reloaded = open(&store, "roadmap");
    assert_eq!(reloaded.state().tasks, dashboard.state().tasks);
}

#[test]
fn test_failed_update_reloads_from_store() {
    let store = MemoryStore {
        reject_updates: true,
        ..MemoryStore::default()
    };
    store.put("roadmap", roadmap());
    let mut dashboard = open(&store, "roadmap");

    let err = dashboard.set_status(&store, 2, Status::Done).unwrap_err();
    assert!(matches!(err, DashError::MutationFailed { .. }));
    assert!(err.to_string().contains("Fiche produit"));
    assert_eq!(*store.fetched.borrow(), vec!["roadmap", "roadmap"]);
    assert_eq!(dashboard.state().tasks[2].status.as_deref(), Some("PAS FAIT"));
}

#[test]
fn test_switching_sources() {
    let store = MemoryStore::with("roadmap", roadmap());
    store.put("backlog", json!([{"Description": "Idée", "Statut": "", "Business Unit": "R&D"}]));
    let mut dashboard = open(&store, "roadmap");
    dashboard.set_selection(FilterSelection::default().with_group("Sales").with_assignee("Bob"));

    dashboard.select_source("backlog");
    let outcome = dashboard.load(&store).unwrap();
    assert_eq!(outcome, LoadOutcome::Loaded { rows: 1, shown: 0 });
    // Group column still exists; assignee column does not
    assert_eq!(dashboard.selection().group.as_deref(), Some("Sales"));
    assert!(dashboard.selection().assignee.is_none());

    dashboard.set_selection(FilterSelection::default());
    assert_eq!(descriptions(&dashboard).len(), 1);
    assert_eq!(dashboard.filtered_rows()[0].get("Description"), "Idée");
}

#[test]
fn test_missing_source_clears_state() {
    let store = MemoryStore::with("roadmap", roadmap());
    let mut dashboard = open(&store, "roadmap");
    dashboard.select_source("absent");

    let err = dashboard.load(&store).unwrap_err();
    assert!(matches!(err, DashError::SourceNotFound { ref sheet, status: 404 } if sheet == "absent"));
    assert!(dashboard.state().tasks.is_empty());
    assert!(dashboard.state().schema.is_none());
}

#[test]
fn test_source_without_description_column() {
    let store = MemoryStore::with(
        "people",
        json!([
            {"ÉTAPE": "PHASE 1", "NOM": "", "STATUS": ""},
            {"ÉTAPE": "", "NOM": "Alice", "STATUS": "fait"},
            {"ÉTAPE": "", "NOM": "Bob", "STATUS": ""}
        ]),
    );
    let mut dashboard = open(&store, "people");
    // Rows without a description are dropped; only the heading survives
    assert_eq!(dashboard.state().tasks.len(), 1);
    assert!(dashboard.state().tasks[0].is_section_marker);
    assert_eq!(dashboard.counts(), StatusCounts::default());

    let err = dashboard.set_status(&store, 0, Status::Done).unwrap_err();
    assert!(matches!(err, DashError::NotATask { row: 1 }));
    assert!(store.updates.borrow().is_empty());
}

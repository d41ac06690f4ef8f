//! Source list configuration
//!
//! The selectable sources come from a side-loaded JSON document. Accepted
//! shapes, tried in order:
//!
//! 1. `{"onglets": [{"value": .., "label": ..}, ..]}` (key `sources` also
//!    accepted), or a bare array of such objects
//! 2. `{"pages": ["..", ..]}` (keys `sheets` and `tabs` also accepted), or a
//!    bare array of names
//! 3. the document's own top-level keys whose values are objects
//!
//! Anything else, including a missing or unparseable document, falls back to
//! [`default_sources`] with a warning.

use std::fs;
use std::path::PathBuf;

use serde::Serialize;
use serde_json::Value;

use crate::error::DashError;
use crate::models::cell_text;
use crate::store::http::fetch_document;

const ENTRY_LIST_KEYS: &[&str] = &["onglets", "sources"];
const NAME_LIST_KEYS: &[&str] = &["pages", "sheets", "tabs"];

/// One selectable source: `value` addresses the store, `label` is displayed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceEntry {
    pub value: String,
    pub label: String,
}

impl SourceEntry {
    pub fn new(value: &str, label: &str) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceOrigin {
    Config,
    Defaults,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceList {
    pub entries: Vec<SourceEntry>,
    pub origin: SourceOrigin,
}

impl SourceList {
    pub fn first(&self) -> Option<&SourceEntry> {
        self.entries.first()
    }

    /// Find a source by value, falling back to a case-insensitive label match
    pub fn find(&self, name: &str) -> Option<&SourceEntry> {
        self.entries
            .iter()
            .find(|e| e.value == name)
            .or_else(|| self.entries.iter().find(|e| e.label.eq_ignore_ascii_case(name)))
    }
}

/// Where the source list document lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourcesLocation {
    File(PathBuf),
    Url(String),
}

impl SourcesLocation {
    /// `http(s)://` locations are fetched, anything else is a file path
    pub fn parse(value: &str) -> Self {
        if value.starts_with("http://") || value.starts_with("https://") {
            SourcesLocation::Url(value.to_string())
        } else {
            SourcesLocation::File(PathBuf::from(value))
        }
    }
}

/// Built-in list used when the document is unusable
pub fn default_sources() -> Vec<SourceEntry> {
    vec![
        SourceEntry::new("Tache du jour", "Tâche du jour"),
        SourceEntry::new("depot jeux", "Dépôt Jeux"),
        SourceEntry::new("certeco", "Certeco & Veryproof"),
    ]
}

fn text_of(value: Option<&Value>) -> Option<String> {
    value.map(cell_text).filter(|s| !s.trim().is_empty())
}

fn entry_list(items: &[Value]) -> Vec<SourceEntry> {
    items
        .iter()
        .filter_map(|item| {
            let object = item.as_object()?;
            let value = text_of(object.get("value"));
            let label = text_of(object.get("label"));
            match (value, label) {
                (Some(value), Some(label)) => Some(SourceEntry { value, label }),
                (Some(value), None) => Some(SourceEntry { label: value.clone(), value }),
                (None, Some(label)) => Some(SourceEntry { value: label.clone(), label }),
                (None, None) => None,
            }
        })
        .collect()
}

fn name_list(items: &[Value]) -> Vec<SourceEntry> {
    items
        .iter()
        .filter(|item| !item.is_object())
        .filter_map(|item| text_of(Some(item)))
        .map(|name| SourceEntry::new(&name, &name))
        .collect()
}

/// Interpret a source list document
///
/// # Errors
///
/// `DashError::ConfigUnavailable` when no accepted shape yields a source.
pub fn parse_source_list(doc: &Value) -> Result<Vec<SourceEntry>, DashError> {
    if let Some(items) = doc.as_array() {
        let entries = entry_list(items);
        if !entries.is_empty() {
            return Ok(entries);
        }
        let names = name_list(items);
        if !names.is_empty() {
            return Ok(names);
        }
        return Err(DashError::ConfigUnavailable("no source list found in document".to_string()));
    }

    let object = doc
        .as_object()
        .ok_or_else(|| DashError::ConfigUnavailable("document is not a JSON object".to_string()))?;

    for key in ENTRY_LIST_KEYS {
        if let Some(items) = object.get(*key).and_then(Value::as_array) {
            let entries = entry_list(items);
            if !entries.is_empty() {
                log::debug!("Sources loaded from '{}'", key);
                return Ok(entries);
            }
        }
    }

    for key in NAME_LIST_KEYS {
        if let Some(items) = object.get(*key).and_then(Value::as_array) {
            let names = name_list(items);
            if !names.is_empty() {
                log::debug!("Sources loaded from '{}'", key);
                return Ok(names);
            }
        }
    }

    let keys: Vec<SourceEntry> = object
        .iter()
        .filter(|(_, value)| value.is_object())
        .map(|(key, _)| SourceEntry::new(key, key))
        .collect();
    if !keys.is_empty() {
        log::debug!("Sources loaded from top-level keys");
        return Ok(keys);
    }

    Err(DashError::ConfigUnavailable("no source list found in document".to_string()))
}

fn read_document(location: &SourcesLocation) -> Result<Value, DashError> {
    match location {
        SourcesLocation::File(path) => {
            let text = fs::read_to_string(path)
                .map_err(|e| DashError::ConfigUnavailable(format!("{}: {}", path.display(), e)))?;
            serde_json::from_str(&text)
                .map_err(|e| DashError::ConfigUnavailable(format!("{}: {}", path.display(), e)))
        }
        SourcesLocation::Url(url) => {
            fetch_document(url).map_err(|e| DashError::ConfigUnavailable(format!("{}: {}", url, e)))
        }
    }
}

/// Load the source list, falling back to the defaults on any failure
pub fn load_source_list(location: &SourcesLocation) -> SourceList {
    match read_document(location).and_then(|doc| parse_source_list(&doc)) {
        Ok(entries) => SourceList {
            entries,
            origin: SourceOrigin::Config,
        },
        Err(err) => {
            log::warn!("Could not load source list ({}); using default sources", err);
            SourceList {
                entries: default_sources(),
                origin: SourceOrigin::Defaults,
            }
        }
    }
}

//! Filter selection parser
//!
//! A selection has three independent parts, each optional. On the command
//! line they are given as `key=value` (or `key:value`) tokens.
//!
//! # Keys
//!
//! - `group=<value>` (alias `bu`) - exact match on the group column
//! - `status=<label>` (aliases `statut`, `avancement`) - exact match on the
//!   normalized status; canonical labels and their aliases are accepted
//! - `assignee=<text>` (alias `affectation`) - substring of the assignee cell
//!
//! # Examples
//!
//! ```text
//! group=Sales status=done
//! assignee:Bob "status=en cours"
//! ```

use serde::Serialize;

use crate::models::{normalize_status, Status};

/// Current filter selections; `None` means "all"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterSelection {
    pub group: Option<String>,
    pub status: Option<String>,
    pub assignee: Option<String>,
}

impl FilterSelection {
    pub fn is_empty(&self) -> bool {
        self.group.is_none() && self.status.is_none() && self.assignee.is_none()
    }

    pub fn with_group(mut self, group: &str) -> Self {
        self.group = non_empty(group);
        self
    }

    pub fn with_status(mut self, status: &str) -> Self {
        self.status = status_selection(status);
        self
    }

    pub fn with_assignee(mut self, assignee: &str) -> Self {
        self.assignee = non_empty(assignee);
        self
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Status selections compare against normalized (upper-case) statuses
fn status_selection(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        return None;
    }
    match Status::parse(value) {
        Some(status) => Some(status.label().to_string()),
        None => Some(normalize_status(value)),
    }
}

/// Known filter keys and their aliases
const FILTER_KEYS: &[&str] = &[
    "group", "bu", "status", "statut", "avancement", "assignee", "affectation",
];

/// Split `key=value` / `key:value` at the first separator
fn split_token(token: &str) -> Option<(&str, &str)> {
    let pos = token.find(|c: char| c == '=' || c == ':')?;
    let key = &token[..pos];
    if key.is_empty() {
        return None;
    }
    Some((key, &token[pos + 1..]))
}

/// Parse filter tokens into a selection
///
/// Later tokens override earlier ones for the same key. An empty value clears
/// the selection for that key.
///
/// # Example
///
/// ```
/// use sheetdash::filter::parse_selection;
///
/// let selection = parse_selection(&["group=Sales".to_string(), "status=fait".to_string()]).unwrap();
/// assert_eq!(selection.status.as_deref(), Some("FAIT"));
/// ```
pub fn parse_selection(tokens: &[String]) -> Result<FilterSelection, String> {
    let mut selection = FilterSelection::default();

    for token in tokens {
        let (key, value) = split_token(token)
            .ok_or_else(|| format!("Invalid filter token: '{}'. Expected key=value.", token))?;

        match key.to_lowercase().as_str() {
            "group" | "bu" => selection.group = non_empty(value),
            "status" | "statut" | "avancement" => selection.status = status_selection(value),
            "assignee" | "affectation" => selection.assignee = non_empty(value),
            _ => {
                return Err(format!(
                    "Unknown filter field '{}'. Known fields: {}",
                    key,
                    FILTER_KEYS.join(", ")
                ))
            }
        }
    }

    Ok(selection)
}

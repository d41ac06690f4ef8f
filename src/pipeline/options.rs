//! Filter option lists
//!
//! Derives the choices offered by the group and assignee filters from the
//! classified rows. Section markers never contribute values.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::models::{Schema, TaskRow};

/// Cell value meaning "not applicable"
pub const PLACEHOLDER: &str = "-";

/// One entry of a filter control
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum FilterChoice {
    /// No restriction
    All,
    Value(String),
}

/// Options for one filter control
///
/// `choices` is empty when the backing column is absent; otherwise it starts
/// with [`FilterChoice::All`] followed by the sorted distinct values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptionList {
    pub column: Option<String>,
    pub choices: Vec<FilterChoice>,
}

impl FilterOptionList {
    fn build(column: Option<&str>, values: BTreeSet<String>) -> Self {
        match column {
            None => Self::default(),
            Some(name) => {
                let mut choices = Vec::with_capacity(values.len() + 1);
                choices.push(FilterChoice::All);
                choices.extend(values.into_iter().map(FilterChoice::Value));
                Self {
                    column: Some(name.to_string()),
                    choices,
                }
            }
        }
    }

    /// Values only, without the "all" sentinel
    pub fn values(&self) -> Vec<&str> {
        self.choices
            .iter()
            .filter_map(|c| match c {
                FilterChoice::Value(v) => Some(v.as_str()),
                FilterChoice::All => None,
            })
            .collect()
    }

    /// A control is shown only when its column exists and carries data
    pub fn is_visible(&self) -> bool {
        self.choices.iter().any(|c| matches!(c, FilterChoice::Value(_)))
    }

    pub fn contains(&self, value: &str) -> bool {
        self.values().contains(&value)
    }
}

/// Option lists for the categorical filters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub group: FilterOptionList,
    pub assignee: FilterOptionList,
}

fn has_value(value: &str) -> bool {
    !value.trim().is_empty() && value != PLACEHOLDER
}

/// Separators between names in a multi-assignee cell
fn assignee_separator() -> &'static Regex {
    static ASSIGNEE_SEPARATOR: OnceLock<Regex> = OnceLock::new();
    ASSIGNEE_SEPARATOR.get_or_init(|| Regex::new(r"[,/]+").expect("valid assignee regex"))
}

/// Split a multi-assignee cell (`"Alice, Bob"`, `"Bob/Carol"`) into trimmed names
pub fn split_assignees(cell: &str) -> Vec<String> {
    assignee_separator()
        .split(cell)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Distinct group values, sorted, case-sensitive
pub fn group_options(tasks: &[TaskRow], schema: &Schema) -> FilterOptionList {
    let column = schema.group_column();
    let values: BTreeSet<String> = match column {
        Some(col) => tasks
            .iter()
            .filter(|t| !t.is_section_marker)
            .map(|t| t.get(col))
            .filter(|v| has_value(v))
            .map(str::to_string)
            .collect(),
        None => BTreeSet::new(),
    };
    FilterOptionList::build(column, values)
}

/// Distinct assignee names across all cells, sorted
pub fn assignee_options(tasks: &[TaskRow], schema: &Schema) -> FilterOptionList {
    let column = schema.assignee_column();
    let values: BTreeSet<String> = match column {
        Some(col) => tasks
            .iter()
            .filter(|t| !t.is_section_marker)
            .map(|t| t.get(col))
            .filter(|v| has_value(v))
            .flat_map(split_assignees)
            .collect(),
        None => BTreeSet::new(),
    };
    FilterOptionList::build(column, values)
}

pub fn build_filter_options(tasks: &[TaskRow], schema: &Schema) -> FilterOptions {
    FilterOptions {
        group: group_options(tasks, schema),
        assignee: assignee_options(tasks, schema),
    }
}

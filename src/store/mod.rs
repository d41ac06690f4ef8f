//! Row stores
//!
//! A source is an opaque, row-oriented collection exposing two operations:
//! read all rows, and update the first row matching a condition. The remote
//! storage API ([`HttpStore`]) and local JSON snapshots ([`DirStore`]) both
//! implement [`RowStore`].

pub mod dir;
pub mod http;

pub use dir::DirStore;
pub use http::HttpStore;

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::StoreError;
use crate::models::RawRow;

/// Conditional single-row update, serialized as the request body
/// `{"condition": {...}, "set": {...}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowUpdate {
    pub condition: IndexMap<String, String>,
    pub set: IndexMap<String, String>,
}

impl RowUpdate {
    /// Set `column` to `value` on the first row where `key_column == key_value`
    pub fn single(key_column: &str, key_value: &str, column: &str, value: &str) -> Self {
        let mut condition = IndexMap::new();
        condition.insert(key_column.to_string(), key_value.to_string());
        let mut set = IndexMap::new();
        set.insert(column.to_string(), value.to_string());
        Self { condition, set }
    }
}

pub trait RowStore {
    /// Read every row of `sheet`, in storage order
    fn fetch_rows(&self, sheet: &str) -> Result<Vec<RawRow>, StoreError>;

    /// Apply `update` to the first matching row of `sheet`
    fn update_rows(&self, sheet: &str, update: &RowUpdate) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_body_shape() {
        let update = RowUpdate::single("DESCRIPTION", "Fix login bug", "AVANCEMENT", "FAIT");
        let body = serde_json::to_value(&update).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "condition": {"DESCRIPTION": "Fix login bug"},
                "set": {"AVANCEMENT": "FAIT"}
            })
        );
    }
}

use serde::Serialize;

/// Role a column plays in the dashboard, inferred from its name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnRole {
    Status,
    Description,
    Group,
    Importance,
    Assignee,
    Stage,
    Other,
}

impl ColumnRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnRole::Status => "status",
            ColumnRole::Description => "description",
            ColumnRole::Group => "group",
            ColumnRole::Importance => "importance",
            ColumnRole::Assignee => "assignee",
            ColumnRole::Stage => "stage",
            ColumnRole::Other => "other",
        }
    }
}

/// A detected column: its name as it appears in the source and its rendering role
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub name: String,
    pub role: ColumnRole,
}

/// Detected shape of one loaded source
///
/// Built once per load by the schema detector. The role handles are
/// independent: the same column may be, say, both the status and the group
/// column if its name carries both keywords.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub columns: Vec<Column>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub group: Option<String>,
    pub assignee: Option<String>,
    pub stage: Option<String>,
    pub importance: Option<String>,
}

impl Schema {
    /// Column names in first-seen order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Rendering role of a column, `Other` for unknown names
    pub fn role_of(&self, column: &str) -> ColumnRole {
        self.columns
            .iter()
            .find(|c| c.name == column)
            .map(|c| c.role)
            .unwrap_or(ColumnRole::Other)
    }

    pub fn description_column(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn status_column(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn group_column(&self) -> Option<&str> {
        self.group.as_deref()
    }

    pub fn assignee_column(&self) -> Option<&str> {
        self.assignee.as_deref()
    }

    pub fn stage_column(&self) -> Option<&str> {
        self.stage.as_deref()
    }

    pub fn importance_column(&self) -> Option<&str> {
        self.importance.as_deref()
    }
}

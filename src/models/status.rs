use serde::{Deserialize, Serialize};

/// Canonical workflow status
///
/// The labels are the literal values stored in the remote sheet:
/// - NotStarted: `PAS FAIT` (also the default for an empty status cell)
/// - InProgress: `EN COURS`
/// - Done: `FAIT`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    NotStarted,
    InProgress,
    Done,
}

impl Status {
    /// All canonical statuses, in workflow order
    pub const ALL: [Status; 3] = [Status::NotStarted, Status::InProgress, Status::Done];

    pub fn label(&self) -> &'static str {
        match self {
            Status::NotStarted => "PAS FAIT",
            Status::InProgress => "EN COURS",
            Status::Done => "FAIT",
        }
    }

    /// Match a normalized (trimmed, upper-cased) cell value against the canonical labels
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "PAS FAIT" => Some(Status::NotStarted),
            "EN COURS" => Some(Status::InProgress),
            "FAIT" => Some(Status::Done),
            _ => None,
        }
    }

    /// Parse user input: canonical labels (any case) or a short alias
    pub fn parse(input: &str) -> Option<Self> {
        let normalized = normalize_status(input);
        if let Some(status) = Self::from_label(&normalized) {
            return Some(status);
        }
        match normalized.as_str() {
            "TODO" | "NOT-STARTED" | "NOT_STARTED" | "PAS-FAIT" => Some(Status::NotStarted),
            "IN-PROGRESS" | "IN_PROGRESS" | "DOING" | "EN-COURS" => Some(Status::InProgress),
            "DONE" => Some(Status::Done),
            _ => None,
        }
    }
}

/// Label used when a status column exists but the cell is empty
pub const NOT_STARTED: &str = "PAS FAIT";

/// Trim and upper-case a raw status cell
pub fn normalize_status(raw: &str) -> String {
    raw.trim().to_uppercase()
}

use serde::Serialize;

use crate::models::{Schema, Status, TaskRow};

/// Summary counters over the loaded tasks
///
/// Counts the whole task set regardless of the filter selection. Section
/// markers are excluded, and statuses outside the canonical labels fall in no
/// bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub not_started: usize,
    pub in_progress: usize,
    pub done: usize,
}

impl StatusCounts {
    pub fn get(&self, status: Status) -> usize {
        match status {
            Status::NotStarted => self.not_started,
            Status::InProgress => self.in_progress,
            Status::Done => self.done,
        }
    }

    pub fn total(&self) -> usize {
        self.not_started + self.in_progress + self.done
    }
}

pub fn count_statuses(tasks: &[TaskRow], schema: &Schema) -> StatusCounts {
    let mut counts = StatusCounts::default();
    if schema.status_column().is_none() {
        return counts;
    }

    for task in tasks.iter().filter(|t| !t.is_section_marker) {
        match task.status_kind() {
            Some(Status::NotStarted) => counts.not_started += 1,
            Some(Status::InProgress) => counts.in_progress += 1,
            Some(Status::Done) => counts.done += 1,
            None => {}
        }
    }
    counts
}

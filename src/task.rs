//! Task data structure.
//!
//! A task is the only entity of the application: a short piece of text with
//! a completion flag and a soft-delete flag.

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};

/// A single to-do record.
///
/// The `id` is the wall-clock reading in milliseconds at creation time and
/// doubles as the creation timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Task {
    pub id: i64,
    pub value: String,
    pub checked: bool,
    pub removed: bool,
}

impl Task {
    /// Build a fresh, unchecked task.
    pub fn new(id: i64, value: impl Into<String>) -> Self {
        Task {
            id,
            value: value.into(),
            checked: false,
            removed: false,
        }
    }

    /// Creation time in local time, if the id is a valid millisecond timestamp.
    pub fn created_at(&self) -> Option<DateTime<Local>> {
        Local.timestamp_millis_opt(self.id).single()
    }

    /// Whether the text of this task may be edited from a view.
    pub fn is_editable(&self) -> bool {
        !self.checked && !self.removed
    }
}

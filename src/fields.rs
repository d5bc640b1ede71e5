//! Enumerations and field types for the task list.
//!
//! `Filter` selects which projection of the collection a view shows, and
//! `TaskUpdate` is the closed set of field edits a view may request.

use std::fmt;

use clap::ValueEnum;

/// Named projection of the task collection. Display only, never persisted.
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum Filter {
    #[default]
    All,
    Active,
    Checked,
    Removed,
}

impl Filter {
    /// All filters, in drawer order.
    pub const ALL: [Filter; 4] = [Filter::All, Filter::Active, Filter::Checked, Filter::Removed];

    /// Toolbar title for this view.
    pub fn title(self) -> &'static str {
        match self {
            Filter::All => "All tasks",
            Filter::Active => "Active tasks",
            Filter::Checked => "Completed tasks",
            Filter::Removed => "Trash",
        }
    }

    /// Whether new tasks can be added while this view is shown.
    pub fn allows_add(self) -> bool {
        matches!(self, Filter::All | Filter::Active)
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Filter::All => "all",
            Filter::Active => "active",
            Filter::Checked => "checked",
            Filter::Removed => "removed",
        };
        f.write_str(s)
    }
}

/// A single field edit on an existing task. The id is never editable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskUpdate {
    SetValue(String),
    SetChecked(bool),
    SetRemoved(bool),
}

impl TaskUpdate {
    /// Field name, for log lines.
    pub fn field(&self) -> &'static str {
        match self {
            TaskUpdate::SetValue(_) => "value",
            TaskUpdate::SetChecked(_) => "checked",
            TaskUpdate::SetRemoved(_) => "removed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_is_all() {
        assert_eq!(Filter::default(), Filter::All);
    }

    #[test]
    fn add_is_only_offered_on_open_views() {
        assert!(Filter::All.allows_add());
        assert!(Filter::Active.allows_add());
        assert!(!Filter::Checked.allows_add());
        assert!(!Filter::Removed.allows_add());
    }

    #[test]
    fn display_matches_cli_value_names() {
        for filter in Filter::ALL {
            let parsed = Filter::from_str(&filter.to_string(), true).unwrap();
            assert_eq!(parsed, filter);
        }
    }
}

//! Enumerations for TUI state management.

/// Which screen or overlay currently receives input.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AppState {
    TaskList,
    /// Filter drawer open over the list.
    Drawer,
    AddTask,
    EditTask,
    /// Empty-trash confirmation.
    Confirm,
    Help,
}

impl AppState {
    /// Status bar label.
    pub fn label(self) -> &'static str {
        match self {
            AppState::TaskList => "Tasks",
            AppState::Drawer => "Choose a view",
            AppState::AddTask => "Add Task",
            AppState::EditTask => "Edit Task",
            AppState::Confirm => "Empty Trash",
            AppState::Help => "Help",
        }
    }
}

/// Outcome of handling a key.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Flow {
    Continue,
    Quit,
}

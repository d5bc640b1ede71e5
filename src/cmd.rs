//! Command implementations for the CLI interface.
//!
//! Each subcommand maps onto one session intent. Domain no-ops (empty text,
//! unknown ids, nothing to purge) print a short notice rather than failing.

use clap::Subcommand;
use clap_complete::{generate, Shell};

use crate::error::Result;
use crate::fields::{Filter, TaskUpdate};
use crate::session::Session;
use crate::task::Task;
use crate::tui::run::run_tui;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive UI.
    Ui,

    /// Add a new task.
    Add {
        /// Task text.
        text: String,
    },

    /// List tasks.
    List {
        /// Which tasks to show: all | active | checked | removed.
        #[arg(long, value_enum, default_value_t = Filter::All)]
        filter: Filter,
    },

    /// Replace the text of a task.
    Edit {
        id: i64,
        /// New text. May be empty.
        text: String,
    },

    /// Mark a task done.
    Check { id: i64 },

    /// Mark a task not done.
    Uncheck { id: i64 },

    /// Move a task to the trash.
    Remove { id: i64 },

    /// Bring a task back from the trash.
    Restore { id: i64 },

    /// Permanently delete everything in the trash.
    EmptyTrash,

    /// Generate shell completion scripts.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Launch the terminal user interface.
pub fn cmd_ui(session: Session) -> Result<()> {
    run_tui(session)?;
    Ok(())
}

/// Add a new task.
pub fn cmd_add(session: &mut Session, text: String) {
    match session.submit_text(&text) {
        Some(id) => println!("Added task {id}"),
        None => println!("Nothing to add."),
    }
}

/// List tasks under `filter`.
pub fn cmd_list(session: &mut Session, filter: Filter) {
    session.set_filter(filter);
    let visible = session.visible();
    println!("{} ({})", filter.title(), visible.len());
    if visible.is_empty() {
        return;
    }
    print_table(&visible);
}

/// Apply a single field edit and report whether anything changed.
pub fn cmd_update(session: &mut Session, id: i64, update: TaskUpdate) {
    let verb = match &update {
        TaskUpdate::SetValue(_) => "Edited",
        TaskUpdate::SetChecked(true) => "Checked",
        TaskUpdate::SetChecked(false) => "Unchecked",
        TaskUpdate::SetRemoved(true) => "Trashed",
        TaskUpdate::SetRemoved(false) => "Restored",
    };
    let Some(task) = session.tasks().get(id) else {
        println!("No task {id}.");
        return;
    };
    if matches!(update, TaskUpdate::SetValue(_)) && !task.is_editable() {
        println!("Task {id} is completed or in the trash; restore or uncheck it to edit.");
        return;
    }
    if matches!(update, TaskUpdate::SetChecked(_)) && task.removed {
        println!("Task {id} is in the trash; restore it first.");
        return;
    }
    if session.set_field(id, update) {
        println!("{verb} task {id}");
    } else {
        println!("Task {id} unchanged.");
    }
}

/// Purge every task in the trash.
pub fn cmd_empty_trash(session: &mut Session) {
    match session.empty_trash() {
        0 => println!("Trash is already empty."),
        n => println!("Deleted {n} task(s)."),
    }
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use crate::cli::Cli;
    use clap::CommandFactory;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}

/// Print tasks as a table.
pub fn print_table(tasks: &[&Task]) {
    println!("{:<15} {:<4} {:<16} {}", "ID", "Done", "Created", "Task");
    for t in tasks {
        println!(
            "{:<15} {:<4} {:<16} {}",
            t.id,
            if t.checked { "[x]" } else { "[ ]" },
            format_created(t),
            t.value
        );
    }
}

/// Creation time as `YYYY-MM-DD HH:MM`, or `-` for ids that are not timestamps.
pub fn format_created(task: &Task) -> String {
    task.created_at()
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".into())
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if width == 0 {
        String::new()
    } else if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}

//! Main application logic for the terminal user interface.
//!
//! This module contains the `App` struct which owns the session, turns key
//! presses into session intents, and renders the current view: the task
//! table, the filter drawer, the add/edit dialog, the empty-trash alert and
//! the help screen.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};

use crate::cmd::{format_created, truncate};
use crate::fields::{Filter, TaskUpdate};
use crate::session::Session;
use crate::task::Task;
use crate::tui::{
    colors::{filter_color, PRIMARY, PRIMARY_LIGHT, SECONDARY, SECONDARY_LIGHT},
    enums::{AppState, Flow},
    input::InputField,
    utils::{centered_rect, centered_rows},
};

/// Main application state for the terminal user interface.
pub struct App {
    session: Session,
    state: AppState,
    task_list_state: TableState,
    visible_ids: Vec<i64>,
    input: InputField,
    editing: Option<i64>,
    drawer_state: ListState,
    status_message: String,
}

impl App {
    /// Create an App driving `session`.
    pub fn new(session: Session) -> Self {
        let mut app = App {
            session,
            state: AppState::TaskList,
            task_list_state: TableState::default(),
            visible_ids: Vec::new(),
            input: InputField::new(),
            editing: None,
            drawer_state: ListState::default(),
            status_message: String::new(),
        };
        app.update_visible_tasks();
        app
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn state(&self) -> AppState {
        self.state
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    /// Recompute the visible rows, keeping the selection on the same task
    /// when it is still shown.
    fn update_visible_tasks(&mut self) {
        let old_selected_id = self.selected_id();

        self.visible_ids = self.session.visible().iter().map(|t| t.id).collect();

        let restored = old_selected_id.and_then(|id| self.visible_ids.iter().position(|&v| v == id));
        let selection = match restored {
            Some(idx) => Some(idx),
            None if self.visible_ids.is_empty() => None,
            None => Some(
                self.task_list_state
                    .selected()
                    .unwrap_or(0)
                    .min(self.visible_ids.len() - 1),
            ),
        };
        self.task_list_state.select(selection);
    }

    /// Id of the highlighted task, if any.
    pub fn selected_id(&self) -> Option<i64> {
        self.task_list_state
            .selected()
            .and_then(|idx| self.visible_ids.get(idx))
            .copied()
    }

    fn selected_task(&self) -> Option<&Task> {
        self.selected_id().and_then(|id| self.session.tasks().get(id))
    }

    fn set_status_message(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    fn set_filter(&mut self, filter: Filter) {
        self.session.set_filter(filter);
        self.update_visible_tasks();
        self.set_status_message(format!("{} ({})", filter.title(), self.visible_ids.len()));
    }

    fn apply(&mut self, id: i64, update: TaskUpdate) -> bool {
        let changed = self.session.set_field(id, update);
        self.update_visible_tasks();
        changed
    }

    fn open_add_dialog(&mut self) {
        if !self.session.filter().allows_add() {
            self.set_status_message("Switch to All or Active to add tasks");
            return;
        }
        self.input.clear();
        self.state = AppState::AddTask;
    }

    fn open_edit_dialog(&mut self) {
        let Some(task) = self.selected_task() else {
            return;
        };
        if !task.is_editable() {
            self.set_status_message("Completed and trashed tasks cannot be edited");
            return;
        }
        let (id, value) = (task.id, task.value.clone());
        self.input = InputField::with_value(&value);
        self.editing = Some(id);
        self.state = AppState::EditTask;
    }

    fn close_dialog(&mut self) {
        self.input.clear();
        self.editing = None;
        self.state = AppState::TaskList;
    }

    /// Submit the add or edit dialog. An empty add just closes the dialog.
    fn submit_dialog(&mut self) {
        let text = std::mem::take(&mut self.input.value);
        match self.editing {
            Some(id) => {
                if self.apply(id, TaskUpdate::SetValue(text)) {
                    self.set_status_message("Task updated");
                }
            }
            None => {
                if let Some(id) = self.session.submit_text(&text) {
                    self.update_visible_tasks();
                    if let Some(idx) = self.visible_ids.iter().position(|&v| v == id) {
                        self.task_list_state.select(Some(idx));
                    }
                    self.set_status_message(format!("Added \"{}\"", truncate(&text, 30)));
                }
            }
        }
        self.close_dialog();
    }

    fn toggle_checked(&mut self) {
        let Some(task) = self.selected_task() else {
            return;
        };
        if task.removed {
            self.set_status_message("Restore the task before checking it");
            return;
        }
        let (id, checked) = (task.id, !task.checked);
        self.apply(id, TaskUpdate::SetChecked(checked));
        self.set_status_message(if checked { "Marked done" } else { "Marked not done" });
    }

    fn toggle_removed(&mut self) {
        let Some(task) = self.selected_task() else {
            return;
        };
        let (id, removed) = (task.id, !task.removed);
        self.apply(id, TaskUpdate::SetRemoved(removed));
        self.set_status_message(if removed { "Moved to trash" } else { "Restored from trash" });
    }

    fn request_empty_trash(&mut self) {
        if self.session.filter() != Filter::Removed {
            self.set_status_message("Open the Trash view to empty it");
        } else if !self.session.tasks().has_removed() {
            self.set_status_message("Trash is already empty");
        } else {
            self.state = AppState::Confirm;
        }
    }

    fn move_selection(&mut self, down: bool) {
        if self.visible_ids.is_empty() {
            return;
        }
        let next = match (self.task_list_state.selected(), down) {
            (None, _) => 0,
            (Some(i), true) => (i + 1).min(self.visible_ids.len() - 1),
            (Some(i), false) => i.saturating_sub(1),
        };
        self.task_list_state.select(Some(next));
    }

    /// Handle keyboard input when in the task list view.
    fn handle_task_list_input(&mut self, key: KeyCode, modifiers: KeyModifiers) -> Flow {
        match key {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return Flow::Quit,
            KeyCode::Char('q') | KeyCode::Esc => return Flow::Quit,
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(false),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(true),
            KeyCode::Char('a') => self.open_add_dialog(),
            KeyCode::Char('e') | KeyCode::Enter => self.open_edit_dialog(),
            KeyCode::Char(' ') | KeyCode::Char('c') => self.toggle_checked(),
            KeyCode::Char('d') | KeyCode::Delete => self.toggle_removed(),
            KeyCode::Char('x') => self.request_empty_trash(),
            KeyCode::Char('f') | KeyCode::Tab => {
                let current = Filter::ALL
                    .iter()
                    .position(|&f| f == self.session.filter())
                    .unwrap_or(0);
                self.drawer_state.select(Some(current));
                self.state = AppState::Drawer;
            }
            KeyCode::Char(c @ '1'..='4') => {
                let idx = c as usize - '1' as usize;
                self.set_filter(Filter::ALL[idx]);
            }
            KeyCode::Char('h') | KeyCode::Char('?') => self.state = AppState::Help,
            _ => {}
        }
        Flow::Continue
    }

    /// Handle keyboard input in the filter drawer.
    fn handle_drawer_input(&mut self, key: KeyCode) -> Flow {
        let selected = self.drawer_state.selected().unwrap_or(0);
        match key {
            KeyCode::Esc | KeyCode::Char('f') | KeyCode::Tab => self.state = AppState::TaskList,
            KeyCode::Up | KeyCode::Char('k') => {
                self.drawer_state.select(Some(selected.saturating_sub(1)));
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.drawer_state
                    .select(Some((selected + 1).min(Filter::ALL.len() - 1)));
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.set_filter(Filter::ALL[selected]);
                self.state = AppState::TaskList;
            }
            _ => {}
        }
        Flow::Continue
    }

    /// Handle keyboard input in the add/edit dialog.
    fn handle_form_input(&mut self, key: KeyCode, modifiers: KeyModifiers) -> Flow {
        match key {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return Flow::Quit,
            KeyCode::Esc => self.close_dialog(),
            KeyCode::Enter => self.submit_dialog(),
            KeyCode::Backspace => self.input.handle_backspace(),
            KeyCode::Delete => self.input.handle_delete(),
            KeyCode::Left => self.input.move_cursor_left(),
            KeyCode::Right => self.input.move_cursor_right(),
            KeyCode::Home => self.input.move_home(),
            KeyCode::End => self.input.move_end(),
            KeyCode::Char(c) => self.input.handle_char(c),
            _ => {}
        }
        Flow::Continue
    }

    /// Handle keyboard input in the empty-trash confirmation.
    fn handle_confirm_input(&mut self, key: KeyCode) -> Flow {
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                let purged = self.session.empty_trash();
                self.update_visible_tasks();
                self.set_status_message(format!("Deleted {purged} task(s)"));
                self.state = AppState::TaskList;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.state = AppState::TaskList;
            }
            _ => {}
        }
        Flow::Continue
    }

    fn handle_help_input(&mut self, key: KeyCode) -> Flow {
        if matches!(key, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('h') | KeyCode::Char('?')) {
            self.state = AppState::TaskList;
        }
        Flow::Continue
    }

    /// Dispatch a key press according to the current state.
    pub fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) -> Flow {
        self.status_message.clear();
        match self.state {
            AppState::TaskList => self.handle_task_list_input(key, modifiers),
            AppState::Drawer => self.handle_drawer_input(key),
            AppState::AddTask | AppState::EditTask => self.handle_form_input(key, modifiers),
            AppState::Confirm => self.handle_confirm_input(key),
            AppState::Help => self.handle_help_input(key),
        }
    }

    /// Poll for and handle keyboard events.
    fn handle_input(&mut self) -> io::Result<Flow> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(self.handle_key(key.code, key.modifiers));
                }
            }
        }
        Ok(Flow::Continue)
    }

    /// Render the toolbar naming the current view.
    fn render_toolbar(&self, f: &mut Frame, area: Rect) {
        let filter = self.session.filter();
        let line = Line::from(vec![
            Span::styled("TODO", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(filter.title(), Style::default().add_modifier(Modifier::ITALIC)),
        ]);
        let toolbar = Paragraph::new(line)
            .style(Style::default().bg(filter_color(filter)).fg(Color::White))
            .alignment(Alignment::Left)
            .block(Block::default());
        f.render_widget(toolbar, area);
    }

    /// Render the main task table.
    fn render_task_list(&mut self, f: &mut Frame, area: Rect) {
        let filter = self.session.filter();
        let header = Row::new(["", "Task", "Created"].map(|h| {
            Cell::from(h).style(Style::default().add_modifier(Modifier::BOLD))
        }))
        .style(Style::default().bg(PRIMARY).fg(Color::White))
        .height(1);

        let rows: Vec<Row> = self
            .session
            .visible()
            .into_iter()
            .map(|task| {
                let mark = if task.checked { "[x]" } else { "[ ]" };
                let style = if task.removed {
                    Style::default().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT)
                } else if task.checked {
                    Style::default().fg(Color::DarkGray)
                } else {
                    Style::default().fg(Color::White)
                };
                Row::new(vec![
                    Cell::from(mark),
                    Cell::from(task.value.clone()),
                    Cell::from(format_created(task)),
                ])
                .style(style)
            })
            .collect();

        let widths = [
            Constraint::Length(3),
            Constraint::Min(20),
            Constraint::Length(16),
        ];

        let empty_hint = if self.visible_ids.is_empty() {
            match filter {
                Filter::Removed => " - trash is empty",
                _ => " - press 'a' to add one",
            }
        } else {
            ""
        };
        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL).title(format!(
                "{} ({}/{}){} - 'h' for help",
                filter.title(),
                self.visible_ids.len(),
                self.session.tasks().len(),
                empty_hint
            )))
            .row_highlight_style(Style::default().bg(PRIMARY_LIGHT).fg(Color::Black))
            .highlight_symbol(">> ");

        f.render_stateful_widget(table, area, &mut self.task_list_state);
    }

    /// Render the filter drawer on the left edge.
    fn render_drawer(&mut self, f: &mut Frame, area: Rect) {
        let width = area.width.min(28);
        let area = Rect { width, ..area };
        f.render_widget(Clear, area);

        let tasks = self.session.tasks();
        let items: Vec<ListItem> = Filter::ALL
            .iter()
            .enumerate()
            .map(|(i, &filter)| {
                ListItem::new(format!("{} {:<16} {:>3}", i + 1, filter.title(), tasks.count(filter)))
            })
            .collect();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Views"))
            .highlight_style(Style::default().bg(PRIMARY_LIGHT).fg(Color::Black))
            .highlight_symbol("> ");
        f.render_stateful_widget(list, area, &mut self.drawer_state);
    }

    /// Render the single-line add/edit dialog.
    fn render_form(&self, f: &mut Frame, area: Rect, is_edit: bool) {
        let area = centered_rows(60, 5, area);
        f.render_widget(Clear, area);

        let title = if is_edit { "Edit task" } else { "New task" };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(PRIMARY_LIGHT));
        let inner = block.inner(area);
        f.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(0)])
            .split(inner);

        let placeholder = self.input.value.is_empty();
        let text = if placeholder {
            Span::styled("Enter a task...", Style::default().fg(Color::DarkGray))
        } else {
            Span::raw(self.input.value.as_str())
        };
        f.render_widget(Paragraph::new(Line::from(text)), chunks[0]);
        f.render_widget(
            Paragraph::new("Enter to save  Esc to cancel")
                .style(Style::default().fg(SECONDARY_LIGHT))
                .alignment(Alignment::Right),
            chunks[1],
        );

        let prefix: String = self.input.value.chars().take(self.input.cursor).collect();
        let offset = ratatui::text::Line::from(prefix).width() as u16;
        f.set_cursor_position((chunks[0].x + offset.min(chunks[0].width), chunks[0].y));
    }

    /// Render the empty-trash confirmation.
    fn render_confirm(&self, f: &mut Frame, area: Rect) {
        let area = centered_rect(50, 30, area);
        f.render_widget(Clear, area);

        let count = self.session.tasks().count(Filter::Removed);
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Empty the trash?",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(format!("{count} task(s) will be deleted permanently.")),
            Line::from(""),
            Line::from("Press 'y' to confirm, 'n' to cancel"),
        ];
        let paragraph = Paragraph::new(text)
            .block(
                Block::default()
                    .title("Confirm")
                    .borders(Borders::ALL)
                    .style(Style::default().bg(SECONDARY).fg(Color::White)),
            )
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    fn render_help(&self, f: &mut Frame, area: Rect) {
        let help = [
            ("a", "add a task (All and Active views)"),
            ("e / Enter", "edit the selected task"),
            ("Space / c", "toggle done"),
            ("d / Del", "move to trash, or restore from trash"),
            ("x", "empty the trash (Trash view)"),
            ("f / Tab", "choose a view"),
            ("1-4", "All / Active / Completed / Trash"),
            ("Up/Down j/k", "move selection"),
            ("q / Esc", "quit"),
        ];
        let lines: Vec<Line> = help
            .iter()
            .map(|(keys, what)| {
                Line::from(vec![
                    Span::styled(format!("{keys:>12}  "), Style::default().fg(PRIMARY_LIGHT)),
                    Span::raw(*what),
                ])
            })
            .collect();
        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Help"));
        f.render_widget(paragraph, area);
    }

    /// Render the status bar at the bottom of the screen.
    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let text = if self.status_message.is_empty() {
            format!(
                "{} | {} visible | {} in trash",
                self.state.label(),
                self.visible_ids.len(),
                self.session.tasks().count(Filter::Removed)
            )
        } else {
            self.status_message.clone()
        };
        let status = Paragraph::new(text)
            .style(Style::default().bg(filter_color(self.session.filter())).fg(Color::White));
        f.render_widget(status, area);
    }

    /// Main render function that dispatches to the view renderers.
    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0), Constraint::Length(1)])
            .split(f.area());

        self.render_toolbar(f, chunks[0]);
        match self.state {
            AppState::Help => self.render_help(f, chunks[1]),
            AppState::TaskList => self.render_task_list(f, chunks[1]),
            AppState::Drawer => {
                self.render_task_list(f, chunks[1]);
                self.render_drawer(f, chunks[1]);
            }
            AppState::AddTask => {
                self.render_task_list(f, chunks[1]);
                self.render_form(f, chunks[1], false);
            }
            AppState::EditTask => {
                self.render_task_list(f, chunks[1]);
                self.render_form(f, chunks[1], true);
            }
            AppState::Confirm => {
                self.render_task_list(f, chunks[1]);
                self.render_confirm(f, chunks[1]);
            }
        }
        self.render_status_bar(f, chunks[2]);
    }

    /// Main event loop. Handles rendering and input until the user exits.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.handle_input()? == Flow::Quit {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::TaskList;
    use ratatui::backend::TestBackend;

    fn app() -> App {
        App::new(Session::detached(TaskList::default()).with_clock(|| 1_000))
    }

    fn press(app: &mut App, key: KeyCode) -> Flow {
        app.handle_key(key, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn add(app: &mut App, text: &str) {
        press(app, KeyCode::Char('a'));
        type_text(app, text);
        press(app, KeyCode::Enter);
    }

    #[test]
    fn add_dialog_creates_task_and_selects_it() {
        let mut app = app();
        add(&mut app, "buy milk");
        add(&mut app, "walk dog");
        assert_eq!(app.state(), AppState::TaskList);
        assert_eq!(app.session().tasks().len(), 2);
        assert_eq!(app.selected_id(), Some(1_001));
    }

    #[test]
    fn empty_submit_just_closes_dialog() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.state(), AppState::AddTask);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state(), AppState::TaskList);
        assert!(app.session().tasks().is_empty());
    }

    #[test]
    fn cancel_discards_typed_text() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "draft");
        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Enter);
        assert!(app.session().tasks().is_empty());
    }

    #[test]
    fn edit_replaces_text_unless_checked() {
        let mut app = app();
        add(&mut app, "milk");
        press(&mut app, KeyCode::Char('e'));
        for _ in 0..3 {
            press(&mut app, KeyCode::Backspace);
        }
        type_text(&mut app, "ilk!");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.session().tasks().get(1_000).unwrap().value, "milk!");

        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.state(), AppState::TaskList);
        assert!(!app.status_message().is_empty());
    }

    #[test]
    fn add_is_unavailable_in_trash_view() {
        let mut app = app();
        press(&mut app, KeyCode::Char('4'));
        assert_eq!(app.session().filter(), Filter::Removed);
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.state(), AppState::TaskList);
    }

    #[test]
    fn trash_and_empty_with_confirmation() {
        let mut app = app();
        add(&mut app, "a");
        add(&mut app, "b");
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.session().tasks().count(Filter::All), 1);

        // Empty trash is only offered from the Trash view.
        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.state(), AppState::TaskList);

        press(&mut app, KeyCode::Char('f'));
        assert_eq!(app.state(), AppState::Drawer);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.session().filter(), Filter::Removed);

        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.state(), AppState::Confirm);
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.session().tasks().len(), 2);

        press(&mut app, KeyCode::Char('x'));
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(app.session().tasks().len(), 1);
        assert_eq!(app.session().tasks().as_slice()[0].value, "a");
        assert_eq!(app.selected_id(), None);
    }

    #[test]
    fn removed_tasks_cannot_be_checked_but_can_be_restored() {
        let mut app = app();
        add(&mut app, "a");
        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('4'));
        press(&mut app, KeyCode::Char(' '));
        assert!(!app.session().tasks().get(1_000).unwrap().checked);
        press(&mut app, KeyCode::Char('d'));
        assert!(!app.session().tasks().get(1_000).unwrap().removed);
    }

    #[test]
    fn quit_keys() {
        let mut app = app();
        assert_eq!(press(&mut app, KeyCode::Char('q')), Flow::Quit);
        assert_eq!(
            app.handle_key(KeyCode::Char('c'), KeyModifiers::CONTROL),
            Flow::Quit
        );
    }

    #[test]
    fn renders_every_state_without_panicking() {
        let mut app = app();
        add(&mut app, "render me");
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        for key in [
            KeyCode::Char('h'),
            KeyCode::Esc,
            KeyCode::Char('f'),
            KeyCode::Esc,
            KeyCode::Char('a'),
        ] {
            press(&mut app, key);
            terminal.draw(|f| app.render(f)).unwrap();
        }
    }
}

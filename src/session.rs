//! Application state owned by a single view at a time.
//!
//! A `Session` holds the current task collection and filter. Each intent
//! computes a new collection with the pure operations in `list`, swaps it in,
//! and, when the collection actually changed, calls the change hook. The
//! hook is where persistence is wired in (see `Session::with_writer`).

use chrono::Utc;
use log::debug;

use crate::fields::{Filter, TaskUpdate};
use crate::list::{visible_tasks, TaskList};
use crate::persist::StoreWriter;
use crate::task::Task;

type ChangeHook = Box<dyn FnMut(&TaskList)>;

pub struct Session {
    tasks: TaskList,
    filter: Filter,
    on_change: ChangeHook,
    clock: fn() -> i64,
}

impl Session {
    /// Create a session seeded with `tasks`, calling `on_change` after every
    /// mutation of the collection.
    pub fn new(tasks: TaskList, on_change: impl FnMut(&TaskList) + 'static) -> Self {
        Session {
            tasks,
            filter: Filter::default(),
            on_change: Box::new(on_change),
            clock: now_ms,
        }
    }

    /// Create a session whose changes are persisted by `writer`.
    pub fn with_writer(tasks: TaskList, writer: StoreWriter) -> Self {
        Session::new(tasks, move |list| writer.enqueue(list))
    }

    /// Session with no persistence.
    pub fn detached(tasks: TaskList) -> Self {
        Session::new(tasks, |_| {})
    }

    /// Replace the clock used to stamp new task ids.
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    /// Tasks shown under the current filter.
    pub fn visible(&self) -> Vec<&Task> {
        visible_tasks(&self.tasks, self.filter)
    }

    /// Add a task. Returns its id, or `None` when `text` is empty.
    pub fn submit_text(&mut self, text: &str) -> Option<i64> {
        if text.is_empty() {
            debug!("event=submit module=session status=skipped reason=empty");
            return None;
        }
        let next = self.tasks.submit(text, (self.clock)());
        let id = next.as_slice().first().map(|t| t.id);
        self.replace(next);
        id
    }

    /// Apply a field edit. Returns whether the collection changed.
    pub fn set_field(&mut self, id: i64, update: TaskUpdate) -> bool {
        let field = update.field();
        let next = self.tasks.update(id, &update);
        let changed = self.replace(next);
        debug!("event=set_field module=session id={id} field={field} changed={changed}");
        changed
    }

    /// Purge the trash. Returns the number of tasks destroyed.
    pub fn empty_trash(&mut self) -> usize {
        let next = self.tasks.purge();
        let purged = self.tasks.len() - next.len();
        self.replace(next);
        debug!("event=empty_trash module=session purged={purged}");
        purged
    }

    /// Select which tasks are visible. Not persisted.
    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    fn replace(&mut self, next: TaskList) -> bool {
        if next == self.tasks {
            return false;
        }
        self.tasks = next;
        (self.on_change)(&self.tasks);
        true
    }
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

//! The in-memory task collection and its pure operations.
//!
//! Every operation borrows the current `TaskList` and returns a new one, so a
//! caller holding the previous collection never observes a change. Callers
//! (see `session`) swap the new collection in and trigger persistence.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::fields::{Filter, TaskUpdate};
use crate::task::Task;

/// Ordered task collection, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    /// Wrap an already trusted sequence of tasks.
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        TaskList { tasks }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }

    pub fn as_slice(&self) -> &[Task] {
        &self.tasks
    }

    /// Get a task by ID.
    pub fn get(&self, id: i64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Next id to hand out for a task created at `now_ms`.
    ///
    /// Uses the clock reading unless it would collide with (or fall behind)
    /// an id already in the collection. When `i64::MAX` is taken, the
    /// nearest free id below the clock reading is used instead.
    pub fn next_id(&self, now_ms: i64) -> i64 {
        let max = match self.tasks.iter().map(|t| t.id).max() {
            Some(max) if max >= now_ms => max,
            _ => return now_ms,
        };
        if let Some(id) = max.checked_add(1) {
            return id;
        }
        let taken: HashSet<i64> = self.tasks.iter().map(|t| t.id).collect();
        (i64::MIN..=now_ms)
            .rev()
            .chain(now_ms..=i64::MAX)
            .find(|id| !taken.contains(id))
            .unwrap_or(now_ms)
    }

    /// Prepend a new task holding `text`. Empty text leaves the collection unchanged.
    pub fn submit(&self, text: &str, now_ms: i64) -> TaskList {
        if text.is_empty() {
            return self.clone();
        }
        let mut tasks = Vec::with_capacity(self.tasks.len() + 1);
        tasks.push(Task::new(self.next_id(now_ms), text));
        tasks.extend(self.tasks.iter().cloned());
        TaskList { tasks }
    }

    /// Apply a single field edit to the task with `id`. Unknown ids are a no-op.
    pub fn update(&self, id: i64, update: &TaskUpdate) -> TaskList {
        let tasks = self
            .tasks
            .iter()
            .map(|t| {
                let mut t = t.clone();
                if t.id == id {
                    match update {
                        TaskUpdate::SetValue(v) => t.value = v.clone(),
                        TaskUpdate::SetChecked(c) => t.checked = *c,
                        TaskUpdate::SetRemoved(r) => t.removed = *r,
                    }
                }
                t
            })
            .collect();
        TaskList { tasks }
    }

    /// Drop every soft-deleted task, keeping the order of the rest.
    pub fn purge(&self) -> TaskList {
        TaskList {
            tasks: self.tasks.iter().filter(|t| !t.removed).cloned().collect(),
        }
    }

    /// Whether the trash holds anything.
    pub fn has_removed(&self) -> bool {
        self.tasks.iter().any(|t| t.removed)
    }

    /// Number of tasks shown under `filter`.
    pub fn count(&self, filter: Filter) -> usize {
        self.tasks.iter().filter(|t| is_visible(t, filter)).count()
    }
}

impl<'a> IntoIterator for &'a TaskList {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}

/// Whether `task` belongs to the projection selected by `filter`.
pub fn is_visible(task: &Task, filter: Filter) -> bool {
    match filter {
        Filter::All => !task.removed,
        Filter::Active => !task.removed && !task.checked,
        Filter::Checked => !task.removed && task.checked,
        Filter::Removed => task.removed,
    }
}

/// Tasks shown under `filter`, in collection order.
pub fn visible_tasks(list: &TaskList, filter: Filter) -> Vec<&Task> {
    list.iter().filter(|t| is_visible(t, filter)).collect()
}

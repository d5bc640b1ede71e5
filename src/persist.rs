//! Synchronization between the in-memory task list and the persistent store.
//!
//! The collection is read once at startup and written back in full after
//! every change. Writes go through a single background thread, so they land
//! in the order they were issued and never block the caller.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use log::{debug, info, warn};
use serde_json::Value;

use crate::list::TaskList;
use crate::store::KeyValueStore;
use crate::validate::{validate_task_list, Validated};

/// Key the task collection is stored under.
pub const STORAGE_KEY: &str = "20230104-todo";

/// Read the stored collection, falling back to an empty one when the entry is
/// absent, unreadable or malformed.
pub fn load_initial(store: &dyn KeyValueStore, key: &str) -> TaskList {
    let value = match store.get(key) {
        Ok(Some(value)) => value,
        Ok(None) => {
            info!("event=store_load module=persist status=empty key={key}");
            return TaskList::default();
        }
        Err(e) => {
            warn!("event=store_load module=persist status=error key={key} error={e}");
            return TaskList::default();
        }
    };

    match validate_task_list(&value) {
        Validated::Valid(list) => {
            info!(
                "event=store_load module=persist status=ok key={key} tasks={}",
                list.len()
            );
            list
        }
        Validated::Invalid(reason) => {
            warn!("event=store_load module=persist status=rejected key={key} reason={reason}");
            TaskList::default()
        }
    }
}

/// Fire-and-forget writer that owns the store on a background thread.
pub struct StoreWriter {
    tx: Option<Sender<Value>>,
    handle: Option<JoinHandle<()>>,
}

impl StoreWriter {
    /// Move `store` onto a writer thread that persists snapshots under `key`.
    pub fn spawn(store: Box<dyn KeyValueStore>, key: impl Into<String>) -> std::io::Result<Self> {
        let key = key.into();
        let (tx, rx) = mpsc::channel();
        let handle = thread::Builder::new()
            .name("todo-store-writer".to_string())
            .spawn(move || write_loop(store.as_ref(), &key, rx))?;
        Ok(StoreWriter {
            tx: Some(tx),
            handle: Some(handle),
        })
    }

    /// Queue a full snapshot of `tasks` for writing. Returns immediately.
    pub fn enqueue(&self, tasks: &TaskList) {
        let value = match serde_json::to_value(tasks) {
            Ok(value) => value,
            Err(e) => {
                warn!("event=store_write module=persist status=encode_error error={e}");
                return;
            }
        };
        let sent = self.tx.as_ref().map(|tx| tx.send(value).is_ok());
        if sent != Some(true) {
            warn!("event=store_write module=persist status=writer_gone");
        }
    }

    /// Flush pending writes and stop the writer thread.
    pub fn shutdown(mut self) {
        self.finish();
    }

    fn finish(&mut self) {
        drop(self.tx.take());
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("event=store_writer_join module=persist status=panicked");
            }
        }
    }
}

impl Drop for StoreWriter {
    fn drop(&mut self) {
        self.finish();
    }
}

fn write_loop(store: &dyn KeyValueStore, key: &str, rx: Receiver<Value>) {
    while let Ok(mut value) = rx.recv() {
        // Later snapshots supersede queued ones.
        let mut skipped = 0usize;
        while let Ok(newer) = rx.try_recv() {
            value = newer;
            skipped += 1;
        }
        match store.set(key, &value) {
            Ok(()) => debug!("event=store_write module=persist status=ok key={key} coalesced={skipped}"),
            Err(e) => warn!("event=store_write module=persist status=error key={key} error={e}"),
        }
    }
    debug!("event=store_writer_exit module=persist status=ok key={key}");
}

//! # todo - a small file-backed to-do list
//!
//! Tasks are short pieces of text that can be checked off, moved to a trash,
//! restored, and finally purged. The whole collection lives in one JSON file
//! in `~/.todo` and is rewritten after every change.
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the interactive UI
//! todo
//!
//! # Or drive it from the shell
//! todo add "buy milk"
//! todo list --filter active
//! todo check 1672790400000
//! todo remove 1672790400000
//! todo empty-trash
//! ```
//!
//! ## Layout
//!
//! - [`list`]: the task collection and its pure operations
//! - [`validate`]: shape checks for data read back from storage
//! - [`store`] and [`persist`]: key-value storage and the background writer
//! - [`session`]: owned application state dispatching user intents
//! - [`cmd`] and [`tui`]: the two views

pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod fields;
pub mod list;
pub mod logging;
pub mod persist;
pub mod session;
pub mod store;
pub mod task;
pub mod validate;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod input;
    pub mod run;
    pub mod utils;
}

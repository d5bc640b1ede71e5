//! Runtime configuration resolved from command-line flags and the environment.
//!
//! Data lives in `~/.todo` unless `--data-dir` says otherwise. Logs go to a
//! `logs` directory inside the data directory.

use std::path::{Path, PathBuf};

use crate::error::{Result, TodoError};
use crate::logging::{default_log_level, normalize_level};

const DATA_DIR_NAME: &str = ".todo";
const LOG_DIR_NAME: &str = "logs";

/// Resolved settings for one process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: &'static str,
}

impl Config {
    /// Resolve settings, preferring explicit flags over defaults.
    pub fn resolve(data_dir: Option<&Path>, log_level: Option<&str>) -> Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir.to_path_buf(),
            None => default_data_dir(std::env::var_os("HOME").map(PathBuf::from)),
        };
        let data_dir = absolute(data_dir)?;
        let log_level = match log_level {
            Some(level) => normalize_level(level).map_err(TodoError::Config)?,
            None => default_log_level(),
        };
        Ok(Config {
            log_dir: data_dir.join(LOG_DIR_NAME),
            data_dir,
            log_level,
        })
    }
}

fn default_data_dir(home: Option<PathBuf>) -> PathBuf {
    home.unwrap_or_else(|| PathBuf::from(".")).join(DATA_DIR_NAME)
}

fn absolute(path: PathBuf) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(path))
}

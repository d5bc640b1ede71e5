use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// File-backed to-do list.
/// Storage defaults to ~/.todo or a directory passed via --data-dir.
#[derive(Parser)]
#[command(name = "todo", version, about = "Small file-backed to-do list")]
pub struct Cli {
    /// Directory holding the task store and logs.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log level: trace | debug | info | warn | error | off.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Launches the interactive UI when omitted.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

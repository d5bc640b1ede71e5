use std::path::Path;

use clap::Parser;
use log::info;

use todo_list::cli::Cli;
use todo_list::cmd::*;
use todo_list::config::Config;
use todo_list::error::Result;
use todo_list::fields::TaskUpdate;
use todo_list::logging::init_logging;
use todo_list::persist::{load_initial, StoreWriter, STORAGE_KEY};
use todo_list::session::Session;
use todo_list::store::FileStore;

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let open = || open_session(cli.data_dir.as_deref(), cli.log_level.as_deref());

    // Sessions are dropped at the end of the match, which flushes the writer.
    match cli.command.unwrap_or(Commands::Ui) {
        // Completions need neither storage nor logging.
        Commands::Completions { shell } => cmd_completions(shell),
        Commands::Ui => cmd_ui(open()?)?,
        Commands::Add { text } => cmd_add(&mut open()?, text),
        Commands::List { filter } => cmd_list(&mut open()?, filter),
        Commands::Edit { id, text } => cmd_update(&mut open()?, id, TaskUpdate::SetValue(text)),
        Commands::Check { id } => cmd_update(&mut open()?, id, TaskUpdate::SetChecked(true)),
        Commands::Uncheck { id } => cmd_update(&mut open()?, id, TaskUpdate::SetChecked(false)),
        Commands::Remove { id } => cmd_update(&mut open()?, id, TaskUpdate::SetRemoved(true)),
        Commands::Restore { id } => cmd_update(&mut open()?, id, TaskUpdate::SetRemoved(false)),
        Commands::EmptyTrash => cmd_empty_trash(&mut open()?),
    }
    Ok(())
}

/// Resolve config, start logging, load the stored tasks and spawn the writer.
fn open_session(data_dir: Option<&Path>, log_level: Option<&str>) -> Result<Session> {
    let config = Config::resolve(data_dir, log_level)?;
    if let Err(e) = init_logging(config.log_level, &config.log_dir) {
        eprintln!("Logging disabled: {e}");
    }

    let store = FileStore::new(&config.data_dir);
    let tasks = load_initial(&store, STORAGE_KEY);
    let writer = StoreWriter::spawn(Box::new(store), STORAGE_KEY)?;
    let session = Session::with_writer(tasks, writer);
    info!(
        "event=session_start module=main data_dir={} tasks={}",
        config.data_dir.display(),
        session.tasks().len()
    );
    Ok(session)
}

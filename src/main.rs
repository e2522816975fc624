//! Binary entry point that glues the SQLite-backed store to the TUI: resolve
//! file locations, start logging, open the store, and drive the Ratatui event
//! loop until the user exits.
use clap::Parser;
use log::info;

use student_registry::config::{Cli, Config};
use student_registry::logging::init_logger;
use student_registry::{run_app, App, RegistrationService, StudentStore};

/// Returning a `Result` bubbles up fatal initialization problems (for example
/// an unwritable data directory) to the terminal instead of crashing silently.
fn main() -> anyhow::Result<()> {
    let config = Config::resolve(Cli::parse())?;
    init_logger(&config.log_path)?;
    info!("starting with database {}", config.db_path.display());

    let store = StudentStore::open(&config.db_path)?;
    let service = RegistrationService::new(store);

    let mut app = App::new(service);
    let result = run_app(&mut app);
    info!("shutting down");
    result
}

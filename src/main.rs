mod config;
mod db;
mod error;
mod export;
mod ledger;
mod logging;
mod models;
mod run;
mod session;
mod ui;

use anyhow::{Context, Result};

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (config, args) = config::Config::from_env(&args)?;
    logging::init(&config.log_filter);

    let db = db::Database::open(&config.db_path)?;
    tracing::debug!(path = %config.db_path.display(), "database opened");

    let mut session = session::Session::new(db);
    session.load_all().context("Failed to load transactions")?;

    if args.is_empty() {
        run::as_shell(session)
    } else {
        run::as_cli(&args, &mut session)
    }
}

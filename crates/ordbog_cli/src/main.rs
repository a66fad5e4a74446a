//! `ordbog` command-line entry point.
//!
//! # Responsibility
//! - Resolve configuration (environment, then flags) and start logging.
//! - Open both word stores on the configured backend and run one command.

mod cli;
mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use commands::{execute, Stores};
use ordbog_core::db::open_db;
use ordbog_core::{
    init_logging, CoreConfig, JsonFileEntryRepository, SqliteEntryRepository, StorageBackend,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    init_logging(&config.log_level, &config.log_dir).map_err(anyhow::Error::msg)?;

    let mut stdout = std::io::stdout().lock();
    match config.backend {
        StorageBackend::Sqlite => {
            let conn = open_db(config.database_path()).with_context(|| {
                format!(
                    "failed to open database `{}`",
                    config.database_path().display()
                )
            })?;
            let repo = SqliteEntryRepository::new(&conn);
            let mut stores = Stores::open(repo, repo)?;
            execute(&cli.command, cli.store, &mut stores, &mut stdout)
        }
        StorageBackend::Json => {
            let repo = JsonFileEntryRepository::open(&config.data_dir).with_context(|| {
                format!("failed to open store directory `{}`", config.data_dir.display())
            })?;
            let mut stores = Stores::open(repo.clone(), repo)?;
            execute(&cli.command, cli.store, &mut stores, &mut stdout)
        }
    }
}

fn resolve_config(cli: &Cli) -> Result<CoreConfig> {
    let mut config = CoreConfig::from_env()?;
    if let Some(data_dir) = &cli.data_dir {
        config = config.with_data_dir(data_dir)?;
    }
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(log_dir) = &cli.log_dir {
        config.log_dir = log_dir.clone();
    }
    Ok(config)
}

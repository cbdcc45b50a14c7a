use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use epoch_core::CachedAdjustments;
use epoch_db::Database;
use tracing_subscriber::EnvFilter;

use epoch_cli::commands::report::ReportOptions;
use epoch_cli::commands::{add, adjust, clear, edit, list, remove, report};
use epoch_cli::parse::Clock;
use epoch_cli::{AdjustAction, Cli, Commands, Config};

/// Load config and open database, ensuring the parent directory exists.
fn open_database(config_path: Option<&Path>) -> Result<(Database, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    let db = Database::open(&config.database_path).context("failed to open database")?;
    Ok((db, config))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let mut stdout = io::stdout().lock();

    match &cli.command {
        Some(Commands::Add { tlp, time, fields }) => {
            let (mut db, config) = open_database(cli.config.as_deref())?;
            let clock = Clock::local(config.afternoon_cutoff)?;
            add::run(&mut stdout, &mut db, &clock, tlp, time.as_deref(), fields)?;
        }
        Some(Commands::List { json }) => {
            let (db, _config) = open_database(cli.config.as_deref())?;
            list::run(&mut stdout, &db, *json)?;
        }
        Some(Commands::Remove { time }) => {
            let (mut db, config) = open_database(cli.config.as_deref())?;
            let clock = Clock::local(config.afternoon_cutoff)?;
            remove::run(&mut stdout, &mut db, &clock, time)?;
        }
        Some(Commands::Edit { time, tlp, fields }) => {
            let (mut db, config) = open_database(cli.config.as_deref())?;
            let clock = Clock::local(config.afternoon_cutoff)?;
            edit::run(&mut stdout, &mut db, &clock, time, tlp, fields)?;
        }
        Some(Commands::Clear) => {
            let (mut db, _config) = open_database(cli.config.as_deref())?;
            clear::run(&mut stdout, &mut db)?;
        }
        Some(Commands::Report { json, up, down }) => {
            let options = ReportOptions::from_args(*json, up, down)?;
            let (db, _config) = open_database(cli.config.as_deref())?;
            let adjustments =
                CachedAdjustments::new(db).context("failed to load stored drift")?;
            report::run(&mut stdout, adjustments.inner(), &adjustments, &options)?;
        }
        Some(Commands::Adjust(action)) => {
            let (mut db, _config) = open_database(cli.config.as_deref())?;
            match action {
                AdjustAction::Set {
                    tlp,
                    minutes,
                    fields,
                } => adjust::set(&mut stdout, &mut db, tlp, *minutes, fields)?,
                AdjustAction::List { json } => adjust::list(&mut stdout, &db, *json)?,
                AdjustAction::Remove { tlp, fields } => {
                    adjust::remove(&mut stdout, &mut db, tlp, fields)?;
                }
            }
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}

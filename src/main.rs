mod cli;
mod config;
mod db;
mod error;
mod models;
mod tui;
mod utils;
mod views;

use anyhow::{Context, Result};
use clap::Parser;

use cli::args::{Cli, Commands};
use cli::handlers::{self, EditArgs};
use config::AppConfig;
use db::{PrayerStorage, SqliteStore};

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = AppConfig::load().context("Loading config")?;

    // Ensure data directory exists and open DB
    let db_path = match cli.db {
        Some(path) => path,
        None => {
            AppConfig::ensure_data_dir()?;
            AppConfig::db_path()?
        }
    };
    log::debug!("Using database {:?}", db_path);
    let storage = PrayerStorage::new(SqliteStore::open(&db_path)?);

    match cli.command {
        Some(Commands::Add {
            member,
            details,
            category,
            notes,
        }) => {
            handlers::handle_add(
                &storage,
                &config,
                &member,
                &details,
                category.as_deref(),
                notes.as_deref(),
            )?;
        }
        Some(Commands::List {
            tab,
            search,
            category,
            member,
        }) => {
            handlers::handle_list(&storage, &config, &tab, search.as_deref(), &category, &member)?;
        }
        Some(Commands::Edit {
            id,
            member,
            category,
            details,
            notes,
            clear_notes,
            status,
            highlight,
            unhighlight,
        }) => {
            let args = EditArgs {
                member: member.as_deref(),
                category: category.as_deref(),
                details: details.as_deref(),
                notes: notes.as_deref(),
                clear_notes,
                status: status.as_deref(),
                highlight: if highlight {
                    Some(true)
                } else if unhighlight {
                    Some(false)
                } else {
                    None
                },
            };
            handlers::handle_edit(&storage, &id, &args)?;
        }
        Some(Commands::Delete { id }) => {
            handlers::handle_delete(&storage, &id)?;
        }
        Some(Commands::Members) => {
            handlers::handle_members(&storage)?;
        }
        Some(Commands::Stats) => {
            handlers::handle_stats(&storage, &config)?;
        }
        Some(Commands::Export { format, output }) => {
            handlers::handle_export(&storage, &format, output.as_deref())?;
        }
        Some(Commands::Import { file }) => {
            handlers::handle_import(&storage, &file)?;
        }
        Some(Commands::Config { init }) => {
            handlers::handle_config(&config, init)?;
        }

        // No subcommand → launch TUI
        None => {
            tui::app::run(&storage, &config)?;
        }
    }

    Ok(())
}

mod analytics;
mod auth;
mod composer;
mod config;
mod database;
mod error;
mod metrics;
mod models;
mod navigation;
mod store;
mod ui;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::{Arg, ArgAction, Command};
use std::fs::OpenOptions;
use std::sync::Arc;

use crate::analytics::LogAnalytics;
use crate::auth::ConfiguredAuth;
use crate::config::settings::Settings;
use crate::database::connection::Database;
use crate::navigation::location::Location;
use crate::navigation::navigator::SystemNavigator;
use crate::navigation::tabs::{DASHBOARD_PATH, TAB_PARAM};
use crate::store::record_store::{MemoryStore, RecordStore};
use crate::ui::app::{App, AppServices};

fn init_logging(debug_enabled: bool) -> Result<()> {
    if debug_enabled {
        let log_file = OpenOptions::new().create(true).append(true).open("app.log")?;

        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("prepwise=debug"))
            .target(env_logger::Target::Pipe(Box::new(log_file)))
            .init();

        log::info!("=== DEBUG LOGGING ENABLED ===");
        log::info!("Writing logs to app.log");
    } else {
        // The terminal belongs to the UI; stay quiet unless RUST_LOG asks otherwise
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("off")).init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("Prepwise")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Interview practice dashboard")
        .arg(
            Arg::new("tab")
                .long("tab")
                .value_name("TAB")
                .help("Initial tab: dashboard, mock-interview or coding-practice"),
        )
        .arg(
            Arg::new("url")
                .long("url")
                .value_name("HREF")
                .help("Initial location, e.g. /dashboard?tab=coding-practice (overrides --tab)"),
        )
        .arg(
            Arg::new("offline")
                .long("offline")
                .help("Keep sessions in memory instead of Postgres")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("init-db")
                .long("init-db")
                .help("Create the session tables and exit")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let settings = Settings::new()?;
    init_logging(settings.debug_logs)?;
    log::info!("Starting Prepwise");

    let remote: Arc<dyn RecordStore> = if matches.get_flag("offline") {
        log::info!("Running offline with an in-memory store");
        Arc::new(MemoryStore::new())
    } else {
        log::info!("Connecting to database...");
        let database = match Database::new(settings.require_database_url()?).await {
            Ok(db) => db,
            Err(e) => {
                log::error!("Database connection failed: {:?}", e);
                eprintln!("Failed to connect to database. Check DATABASE_URL in .env or run with --offline.");
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        };
        if matches.get_flag("init-db") {
            database.create_tables().await?;
            println!("Tables created.");
            return Ok(());
        }
        Arc::new(database)
    };

    let initial_location = match (
        matches.get_one::<String>("url"),
        matches.get_one::<String>("tab"),
    ) {
        (Some(href), _) => Location::parse(href),
        (None, Some(tab)) => Location::new(DASHBOARD_PATH).with_param(TAB_PARAM, tab),
        (None, None) => Location::new(DASHBOARD_PATH),
    };

    // A configured account counts as an existing session
    let auth = Arc::new(match settings.account.clone() {
        Some(account) => ConfiguredAuth::signed_in(account),
        None => ConfiguredAuth::new(None),
    });

    let services = AppServices {
        remote,
        auth,
        navigator: Arc::new(SystemNavigator::new(settings.app_base_url.clone())),
        analytics: Arc::new(LogAnalytics),
    };

    let mut app = App::new(services, initial_location);
    app.run().await?;

    Ok(())
}

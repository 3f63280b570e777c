pub mod cli;
pub mod config;
pub mod db;
pub mod lab;
pub mod models;
pub mod seed;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::config::DatabaseConfig;
use crate::db::SessionFactory;

pub fn run() -> ExitCode {
    // Parse first so --help and --version work without a database.
    let cli = cli::Cli::parse();

    // .env may carry RUST_LOG as well as DATABASE_URL.
    let db_config = DatabaseConfig::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let db_config = match db_config {
        Ok(db_config) => db_config,
        Err(e) => {
            tracing::error!("Refusing to start: {e}");
            return ExitCode::FAILURE;
        }
    };

    let sessions = SessionFactory::new(db_config);
    match cli::execute(cli, &sessions) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

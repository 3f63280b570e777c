use clap::{Parser, Subcommand};
use serde::Serialize;
use thiserror::Error;

use crate::db::{DatabaseError, SessionFactory};
use crate::lab;
use crate::models::DEFAULT_REPORT_LIMIT;
use crate::seed;

#[derive(Parser, Debug)]
#[command(name = "labsmart", version, about = "Laboratory information management backend")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the schema and insert the sample lab data
    Init {
        /// Only create the schema
        #[arg(long)]
        no_seed: bool,
    },
    /// Walk through registering a patient, ordering a test and recording its result
    Demo,
    /// Show the most requested tests
    Report {
        #[arg(long, default_value_t = DEFAULT_REPORT_LIMIT)]
        limit: u32,
    },
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Failed to render output: {0}")]
    Output(#[from] serde_json::Error),
}

pub fn execute(cli: Cli, sessions: &SessionFactory) -> Result<(), CliError> {
    match cli.command {
        Command::Init { no_seed } => {
            sessions.bootstrap()?;
            if !no_seed {
                print_json(&seed::seed_sample_data(sessions)?)?;
            }
            tracing::info!("Initialization complete");
        }
        Command::Demo => {
            print_json(&seed::run_demo(sessions)?)?;
        }
        Command::Report { limit } => {
            print_json(&lab::most_requested_tests(sessions, limit)?)?;
        }
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

//! Session provider.
//!
//! A session is one SQLite connection. Every operation opens its own,
//! does one unit of work and drops it, so the connection is closed on
//! every exit path including `?` returns.

use std::path::Path;

use rusqlite::Connection;

use super::{sqlite, DatabaseError};
use crate::config::DatabaseConfig;

/// Opens sessions against the configured database. Create one at startup
/// and pass it by reference to the operations in [`crate::lab`].
#[derive(Debug, Clone)]
pub struct SessionFactory {
    config: DatabaseConfig,
}

impl SessionFactory {
    pub fn new(config: DatabaseConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    pub fn db_path(&self) -> &Path {
        self.config.path()
    }

    /// Create the schema if absent. Safe to call on every start.
    pub fn bootstrap(&self) -> Result<(), DatabaseError> {
        tracing::info!("Bootstrapping schema at {}", self.db_path().display());
        sqlite::open_database(self.db_path())?;
        Ok(())
    }

    /// Open a fresh session.
    pub fn open_session(&self) -> Result<Connection, DatabaseError> {
        sqlite::open_connection(self.db_path())
    }
}

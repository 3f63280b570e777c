use std::path::{Path, PathBuf};

use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "LabSmart";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable holding the database location.
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "info,labsmart_lib=info"
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("DATABASE_URL not set (add it to the environment or a .env file)")]
    MissingDatabaseUrl,

    #[error("Unsupported database scheme '{0}': only sqlite is available")]
    UnsupportedScheme(String),

    #[error("In-memory databases cannot be shared between sessions; use a file path")]
    InMemoryUnsupported,
}

/// Where the lab database lives. Built once at startup and handed to
/// [`SessionFactory`](crate::db::SessionFactory).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

impl DatabaseConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read `DATABASE_URL`, loading a `.env` file from the working directory
    /// first if one exists. Existing environment variables win over `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("Loaded environment from {}", path.display());
        }
        let url = std::env::var(DATABASE_URL_ENV).map_err(|_| ConfigError::MissingDatabaseUrl)?;
        Self::from_url(&url)
    }

    /// Accepts `sqlite://<path>`, `sqlite:<path>` or a bare path.
    pub fn from_url(url: &str) -> Result<Self, ConfigError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ConfigError::MissingDatabaseUrl);
        }

        let path = if let Some(rest) = url
            .strip_prefix("sqlite://")
            .or_else(|| url.strip_prefix("sqlite:"))
        {
            // Drop connection options such as `?mode=rwc`.
            rest.split('?').next().unwrap_or(rest)
        } else if let Some((scheme, _)) = url.split_once("://") {
            return Err(ConfigError::UnsupportedScheme(scheme.to_string()));
        } else {
            url
        };

        if path.is_empty() {
            return Err(ConfigError::MissingDatabaseUrl);
        }
        if path == ":memory:" {
            return Err(ConfigError::InMemoryUnsupported);
        }

        Ok(Self::new(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

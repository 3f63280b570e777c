pub mod repository;
pub mod session;
pub mod sqlite;
pub mod timestamp;

pub use repository::*;
pub use session::*;
pub use sqlite::*;

use rusqlite::ffi;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Order {order_id} already completed")]
    OrderAlreadyCompleted { order_id: i64 },

    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },

    #[error("Invalid timestamp in {field}: {value}")]
    InvalidTimestamp { field: String, value: String },

    #[error("Migration failed at version {version}: {reason}")]
    MigrationFailed { version: i64, reason: String },
}

impl DatabaseError {
    pub fn not_found(entity_type: &str, id: i64) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    /// A UNIQUE constraint rejected the write (duplicate test type code,
    /// second result for the same order).
    pub fn is_unique_violation(&self) -> bool {
        self.constraint_code() == Some(ffi::SQLITE_CONSTRAINT_UNIQUE)
    }

    /// A FOREIGN KEY constraint rejected the write (unknown patient,
    /// test type, order or technician).
    pub fn is_foreign_key_violation(&self) -> bool {
        self.constraint_code() == Some(ffi::SQLITE_CONSTRAINT_FOREIGNKEY)
    }

    fn constraint_code(&self) -> Option<i32> {
        match self {
            Self::Sqlite(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Some(err.extended_code)
            }
            _ => None,
        }
    }
}

//! Error type shared by every storage module.

use thiserror::Error;

/// Errors surfaced by the storage layer.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Anything SQLx reports: bad connection, failed query, pool timeout.
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Schema migration failed at startup.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Lookup came back empty. `id` is a string because keys here are
    /// mixed: numeric rowids for agents and users, call SIDs and E.164
    /// numbers elsewhere.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Unique constraint hit on insert, for user emails and phone
    /// numbers.
    #[error("{entity} already exists: {id}")]
    AlreadyExists { entity: &'static str, id: String },
}

/// Result alias used throughout the storage modules.
pub type Result<T> = std::result::Result<T, DatabaseError>;

//! Core error types for balviz.
//!
//! This module defines database-agnostic error types. Storage-specific errors
//! (from Diesel, SQLite, etc.) are converted to these types by the storage layer.

use std::time::Duration;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the reporting backend.
///
/// `Validation` errors are caller mistakes (bad grouping key, malformed input).
/// `Database` errors cover everything that goes wrong while fetching or decoding
/// rows. Neither is retried.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl Error {
    /// True when the error came from the storage side rather than the caller.
    pub fn is_storage_failure(&self) -> bool {
        matches!(self, Error::Database(_))
    }
}

/// Database-agnostic error type for storage operations.
///
/// This enum uses `String` for error details, allowing the storage layer
/// to convert Diesel / r2d2 errors into this format.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to establish a database connection.
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Failed to create the pool or check a connection out of it.
    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(String),

    /// A database query failed to execute.
    #[error("Database query failed: {0}")]
    QueryFailed(String),

    /// A row was returned but one of its columns could not be decoded.
    #[error("Failed to decode row: {0}")]
    Decode(String),

    /// The storage fetch did not finish before its deadline.
    #[error("Database query timed out after {0:?}")]
    Timeout(Duration),

    /// Database migration failed.
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Internal/unexpected database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

/// Validation errors for request input.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Unsupported grouping key '{0}'")]
    UnsupportedGroupingKey(String),

    #[error("Unknown sign indicator '{0}'")]
    UnknownSignIndicator(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

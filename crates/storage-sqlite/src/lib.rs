//! SQLite storage implementation for balviz.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `balviz-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - The account / balance snapshot repository
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//! The core crate is database-agnostic and works with traits.
//!
//! ```text
//!        core (domain)
//!              │
//!              ▼
//!   storage-sqlite (this crate)
//!              │
//!              ▼
//!          SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;

// Repository implementations
pub mod accounts;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, ping, run_migrations, DbConnection, DbPool, PoolSettings,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from balviz-core for convenience
pub use balviz_core::errors::{DatabaseError, Error, Result};

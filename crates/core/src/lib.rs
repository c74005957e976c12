//! balviz core - domain entities, the aggregation pipeline, and storage traits.
//!
//! This crate is database-agnostic. It defines the account and balance models,
//! the repository trait implemented by the `storage-sqlite` crate, and the
//! service that reshapes rows into tree-map / heat-map payloads.

pub mod accounts;
pub mod aggregation;
pub mod constants;
pub mod errors;

// Re-export error types
pub use errors::Error;
pub use errors::Result;

//! Accounts module - account and balance snapshot models, repository trait.

mod accounts_model;
mod accounts_traits;


// Re-export the public interface
pub use accounts_model::{AccountRecord, BalanceSnapshot, SignIndicator};
pub use accounts_traits::AccountRepositoryTrait;

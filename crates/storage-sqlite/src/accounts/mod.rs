//! SQLite storage implementation for accounts and balance snapshots.

mod model;
mod repository;

pub use model::{AccountBalanceDB, AccountDB};
pub use repository::AccountRepository;

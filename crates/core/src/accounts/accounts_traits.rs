//! Account repository trait.
//!
//! The trait defines the read contract for account data without any
//! database-specific types, allowing for different storage implementations.

use super::accounts_model::{AccountRecord, BalanceSnapshot};
use crate::errors::Result;

/// Read-only access to the accounts and account_balance relations.
///
/// Methods are blocking; callers in async code are expected to run them on a
/// blocking thread.
pub trait AccountRepositoryTrait: Send + Sync {
    /// Lists every account, ordered by account number.
    fn list_accounts(&self) -> Result<Vec<AccountRecord>>;

    /// Lists the most recent balance snapshot of each account.
    ///
    /// Exactly one row per account number is returned. When two snapshots
    /// share the latest date, the one inserted last wins.
    fn list_latest_balances(&self) -> Result<Vec<BalanceSnapshot>>;

    /// Cheap round trip to the store.
    fn ping(&self) -> Result<()>;
}

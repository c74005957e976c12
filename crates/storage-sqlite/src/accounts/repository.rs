use diesel::prelude::*;
use diesel::sql_query;
use log::debug;
use std::sync::Arc;

use balviz_core::accounts::{AccountRecord, AccountRepositoryTrait, BalanceSnapshot};
use balviz_core::{Error, Result};

use super::model::{AccountBalanceDB, AccountDB};
use crate::db::{self, get_connection, DbPool};
use crate::errors::IntoCore;
use crate::schema::accounts;

/// Latest snapshot per account. Ties on date go to the most recently inserted row.
///
/// The schema only admits zero-padded `YYYY-MM-DD` dates, so text order is date order.
const LATEST_BALANCES_SQL: &str = "WITH ranked_balances AS ( \
        SELECT \
            id, account_no, snapshot_date, opening_balance_currency, country_id, \
            opening_balance_amount, opening_balance_indicator, \
            closing_balance_amount, closing_balance_indicator, \
            ROW_NUMBER() OVER (PARTITION BY account_no ORDER BY snapshot_date DESC, id DESC) AS rn \
        FROM account_balance \
    ) \
    SELECT \
        id, account_no, snapshot_date, opening_balance_currency, country_id, \
        opening_balance_amount, opening_balance_indicator, \
        closing_balance_amount, closing_balance_indicator \
    FROM ranked_balances \
    WHERE rn = 1 \
    ORDER BY account_no";

/// Repository for reading account data from the database
pub struct AccountRepository {
    pool: Arc<DbPool>,
}

impl AccountRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

impl AccountRepositoryTrait for AccountRepository {
    fn list_accounts(&self) -> Result<Vec<AccountRecord>> {
        let mut conn = get_connection(&self.pool)?;

        let rows = accounts::table
            .select(AccountDB::as_select())
            .order(accounts::account_no.asc())
            .load::<AccountDB>(&mut conn)
            .into_core()?;
        debug!("Loaded {} accounts", rows.len());

        rows.into_iter()
            .map(|row| AccountRecord::try_from(row).map_err(Error::from))
            .collect()
    }

    fn list_latest_balances(&self) -> Result<Vec<BalanceSnapshot>> {
        let mut conn = get_connection(&self.pool)?;

        let rows = sql_query(LATEST_BALANCES_SQL)
            .load::<AccountBalanceDB>(&mut conn)
            .into_core()?;
        debug!("Loaded {} latest balance snapshots", rows.len());

        rows.into_iter()
            .map(|row| BalanceSnapshot::try_from(row).map_err(Error::from))
            .collect()
    }

    fn ping(&self) -> Result<()> {
        db::ping(&self.pool)
    }
}

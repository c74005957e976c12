//! Database models for accounts and balance snapshots.

use std::str::FromStr;

use chrono::NaiveDate;
use diesel::prelude::*;
use rust_decimal::Decimal;

use balviz_core::accounts::{AccountRecord, BalanceSnapshot, SignIndicator};

use crate::errors::StorageError;

const SNAPSHOT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Database model for accounts
#[derive(Queryable, Selectable, Insertable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::accounts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AccountDB {
    pub account_no: String,
    pub account_ccy: String,
    pub account_country: String,
}

/// One row of `account_balance`, loaded by the latest-snapshot window query.
///
/// Amounts, dates and indicators are stored as TEXT and decoded strictly.
#[derive(QueryableByName, Queryable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::account_balance)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AccountBalanceDB {
    pub id: i32,
    pub account_no: String,
    pub snapshot_date: String,
    pub opening_balance_currency: String,
    pub country_id: String,
    pub opening_balance_amount: String,
    pub opening_balance_indicator: String,
    pub closing_balance_amount: String,
    pub closing_balance_indicator: String,
}

impl TryFrom<AccountDB> for AccountRecord {
    type Error = StorageError;

    fn try_from(db: AccountDB) -> Result<Self, Self::Error> {
        let record = AccountRecord {
            account_no: db.account_no,
            currency: db.account_ccy,
            country: db.account_country,
        };
        record
            .validate()
            .map_err(|e| StorageError::decode("account_no", e.to_string()))?;
        Ok(record)
    }
}

impl TryFrom<AccountBalanceDB> for BalanceSnapshot {
    type Error = StorageError;

    fn try_from(db: AccountBalanceDB) -> Result<Self, Self::Error> {
        let snapshot = BalanceSnapshot {
            snapshot_date: parse_date("snapshot_date", &db.snapshot_date)?,
            opening_amount: parse_amount("opening_balance_amount", &db.opening_balance_amount)?,
            opening_indicator: parse_indicator(
                "opening_balance_indicator",
                &db.opening_balance_indicator,
            )?,
            closing_amount: parse_amount("closing_balance_amount", &db.closing_balance_amount)?,
            closing_indicator: parse_indicator(
                "closing_balance_indicator",
                &db.closing_balance_indicator,
            )?,
            account_no: db.account_no,
            currency: db.opening_balance_currency,
            country: db.country_id,
        };
        snapshot
            .validate()
            .map_err(|e| StorageError::decode("account_no", e.to_string()))?;
        Ok(snapshot)
    }
}

/// Snapshot dates are ranked as text in SQL, so only the canonical zero-padded
/// form is accepted.
fn parse_date(column: &'static str, value: &str) -> Result<NaiveDate, StorageError> {
    let date = NaiveDate::parse_from_str(value, SNAPSHOT_DATE_FORMAT)
        .map_err(|e| StorageError::decode(column, format!("'{}': {}", value, e)))?;
    if date.format(SNAPSHOT_DATE_FORMAT).to_string() != value {
        return Err(StorageError::decode(
            column,
            format!("'{}' is not a zero-padded YYYY-MM-DD date", value),
        ));
    }
    Ok(date)
}

fn parse_amount(column: &'static str, value: &str) -> Result<Decimal, StorageError> {
    Decimal::from_str(value.trim())
        .map_err(|e| StorageError::decode(column, format!("'{}': {}", value, e)))
}

fn parse_indicator(column: &'static str, value: &str) -> Result<SignIndicator, StorageError> {
    value
        .parse::<SignIndicator>()
        .map_err(|e| StorageError::decode(column, e.to_string()))
}

//! Account domain models.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::aggregation::{compute_percent_change, normalize_signed_amount};
use crate::constants::{CREDIT_INDICATOR, DEBIT_INDICATOR};
use crate::{errors::ValidationError, Error, Result};

/// Whether a stored balance amount is a credit or a debit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignIndicator {
    #[serde(rename = "CRDT")]
    Credit,
    #[serde(rename = "DBIT")]
    Debit,
}

impl SignIndicator {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignIndicator::Credit => CREDIT_INDICATOR,
            SignIndicator::Debit => DEBIT_INDICATOR,
        }
    }
}

impl fmt::Display for SignIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignIndicator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            CREDIT_INDICATOR => Ok(SignIndicator::Credit),
            DEBIT_INDICATOR => Ok(SignIndicator::Debit),
            other => Err(ValidationError::UnknownSignIndicator(other.to_string()).into()),
        }
    }
}

/// One row of the accounts relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRecord {
    pub account_no: String,
    pub currency: String,
    pub country: String,
}

impl AccountRecord {
    pub fn validate(&self) -> Result<()> {
        validate_account_no(&self.account_no)
    }
}

/// The most recent balance snapshot of one account.
///
/// Amounts are stored as unsigned magnitudes; the indicator carries the sign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceSnapshot {
    pub account_no: String,
    pub snapshot_date: NaiveDate,
    pub currency: String,
    pub country: String,
    pub opening_amount: Decimal,
    pub opening_indicator: SignIndicator,
    pub closing_amount: Decimal,
    pub closing_indicator: SignIndicator,
}

impl BalanceSnapshot {
    pub fn validate(&self) -> Result<()> {
        validate_account_no(&self.account_no)
    }

    pub fn signed_opening(&self) -> Decimal {
        normalize_signed_amount(self.opening_amount, self.opening_indicator)
    }

    pub fn signed_closing(&self) -> Decimal {
        normalize_signed_amount(self.closing_amount, self.closing_indicator)
    }

    /// Percentage change from the signed opening to the signed closing balance.
    pub fn percent_change(&self) -> Result<Decimal> {
        compute_percent_change(self.signed_opening(), self.signed_closing())
    }
}

fn validate_account_no(account_no: &str) -> Result<()> {
    if account_no.trim().is_empty() {
        return Err(Error::Validation(ValidationError::InvalidInput(
            "Account number cannot be empty".to_string(),
        )));
    }
    Ok(())
}

//! Aggregation domain models.

use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::accounts::{AccountRecord, BalanceSnapshot};
use crate::{errors::ValidationError, Result};

/// Dimension used to partition accounts into top-level buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GroupingKey {
    Currency,
    Country,
}

impl GroupingKey {
    /// Parses the column name the account endpoints accept
    /// (`account_ccy` / `account_country`).
    pub fn from_account_column(value: &str) -> Result<Self> {
        match value {
            "account_ccy" => Ok(GroupingKey::Currency),
            "account_country" => Ok(GroupingKey::Country),
            other => Err(ValidationError::UnsupportedGroupingKey(other.to_string()).into()),
        }
    }

    /// Parses the column name the balance endpoints accept
    /// (`opening_balance_currency` / `country_id`).
    pub fn from_balance_column(value: &str) -> Result<Self> {
        match value {
            "opening_balance_currency" => Ok(GroupingKey::Currency),
            "country_id" => Ok(GroupingKey::Country),
            other => Err(ValidationError::UnsupportedGroupingKey(other.to_string()).into()),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GroupingKey::Currency => "currency",
            GroupingKey::Country => "country",
        }
    }
}

impl fmt::Display for GroupingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row that can be bucketed by [`GroupingKey`].
pub trait GroupSource {
    /// Unmasked identifier; also the sort key inside a group.
    fn identifier(&self) -> &str;

    fn dimension(&self, key: GroupingKey) -> &str;
}

impl GroupSource for AccountRecord {
    fn identifier(&self) -> &str {
        &self.account_no
    }

    fn dimension(&self, key: GroupingKey) -> &str {
        match key {
            GroupingKey::Currency => &self.currency,
            GroupingKey::Country => &self.country,
        }
    }
}

impl GroupSource for BalanceSnapshot {
    fn identifier(&self) -> &str {
        &self.account_no
    }

    fn dimension(&self, key: GroupingKey) -> &str {
        match key {
            GroupingKey::Currency => &self.currency,
            GroupingKey::Country => &self.country,
        }
    }
}

/// Measure attached to an identifier inside a group.
///
/// Serializes as a bare JSON number either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    /// Opaque magnitude with no persisted meaning
    Placeholder(u32),
    /// Percentage change between opening and closing balance, 3 decimal places
    PercentChange(Decimal),
}

/// Leaf of the payload: one account and its metric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeMapEntry {
    pub key: String,
    pub data: MetricValue,
}

/// One bucket of the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeMapGroup {
    pub key: String,
    pub data: Vec<TreeMapEntry>,
}

/// Groups sorted by key, members sorted by unmasked identifier.
pub type GroupedResult = Vec<TreeMapGroup>;

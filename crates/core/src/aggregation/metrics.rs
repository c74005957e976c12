//! Per-row metric derivation and the grouping pass.

use std::collections::BTreeMap;

use log::debug;
use rand::Rng;
use rust_decimal::{Decimal, RoundingStrategy};

use super::aggregation_model::{
    GroupSource, GroupedResult, GroupingKey, MetricValue, TreeMapEntry, TreeMapGroup,
};
use crate::accounts::SignIndicator;
use crate::constants::{
    MASK_LITERAL, MASK_MIN_LENGTH, MASK_VISIBLE_PREFIX, MASK_VISIBLE_SUFFIX,
    PERCENT_CHANGE_PRECISION, PLACEHOLDER_MAX, PLACEHOLDER_MIN,
};
use crate::{Error, Result};

/// Applies the indicator to an unsigned magnitude: credits are positive,
/// debits negative. Any sign already present on `amount` is discarded.
pub fn normalize_signed_amount(amount: Decimal, indicator: SignIndicator) -> Decimal {
    match indicator {
        SignIndicator::Credit => amount.abs(),
        SignIndicator::Debit => -amount.abs(),
    }
}

/// `(closing - opening) / closing * 100`, rounded to 3 places half away from zero.
///
/// A zero closing balance yields `0` instead of an error.
pub fn compute_percent_change(opening: Decimal, closing: Decimal) -> Result<Decimal> {
    if closing.is_zero() {
        return Ok(Decimal::ZERO);
    }

    let change = closing
        .checked_sub(opening)
        .and_then(|delta| delta.checked_div(closing))
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .ok_or_else(|| {
            Error::Unexpected(format!(
                "Percentage change overflows for opening {} and closing {}",
                opening, closing
            ))
        })?;

    Ok(round_percent(change))
}

pub fn round_percent(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(
        PERCENT_CHANGE_PRECISION,
        RoundingStrategy::MidpointAwayFromZero,
    )
}

/// Display-only redaction of an account number: `1234***12`.
///
/// Works on characters, not bytes. Identifiers shorter than six characters are
/// returned unchanged.
pub fn mask_identifier(id: &str) -> String {
    let chars: Vec<char> = id.chars().collect();
    if chars.len() < MASK_MIN_LENGTH {
        return id.to_string();
    }

    let prefix: String = chars[..MASK_VISIBLE_PREFIX].iter().collect();
    let suffix: String = chars[chars.len() - MASK_VISIBLE_SUFFIX..].iter().collect();
    format!("{}{}{}", prefix, MASK_LITERAL, suffix)
}

/// Draws a placeholder magnitude in `10..=60` from the supplied generator.
pub fn placeholder_metric<R: Rng + ?Sized>(rng: &mut R) -> MetricValue {
    MetricValue::Placeholder(rng.gen_range(PLACEHOLDER_MIN..=PLACEHOLDER_MAX))
}

/// Partitions `rows` by `key`, building one entry per row with `entry_for`.
///
/// Every row lands in exactly one group. Groups come out sorted by key and
/// members by unmasked identifier; rows are fed to `entry_for` in that order
/// so a seeded generator gives reproducible output.
pub fn group_by<T, F>(rows: Vec<T>, key: GroupingKey, mut entry_for: F) -> Result<GroupedResult>
where
    T: GroupSource,
    F: FnMut(&T) -> Result<TreeMapEntry>,
{
    let row_count = rows.len();
    let mut buckets: BTreeMap<String, Vec<T>> = BTreeMap::new();
    for row in rows {
        buckets
            .entry(row.dimension(key).to_string())
            .or_default()
            .push(row);
    }

    let mut groups = Vec::with_capacity(buckets.len());
    for (group_key, mut members) in buckets {
        members.sort_by(|a, b| a.identifier().cmp(b.identifier()));
        let data = members
            .iter()
            .map(&mut entry_for)
            .collect::<Result<Vec<_>>>()?;
        groups.push(TreeMapGroup {
            key: group_key,
            data,
        });
    }

    debug!(
        "Grouped {} rows into {} {} buckets",
        row_count,
        groups.len(),
        key
    );
    Ok(groups)
}

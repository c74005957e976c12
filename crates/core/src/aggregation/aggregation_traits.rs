//! Aggregation service trait.

use async_trait::async_trait;
use rand::RngCore;

use super::aggregation_model::{GroupedResult, GroupingKey};
use crate::errors::Result;

/// Trait defining the contract for the aggregation pipeline.
///
/// Each method reads a fresh snapshot from storage and returns the fully
/// grouped payload, or an error and nothing else.
#[async_trait]
pub trait AggregationServiceTrait: Send + Sync {
    /// All accounts grouped by currency with placeholder metrics.
    async fn tree_data(&self, rng: &mut (dyn RngCore + Send)) -> Result<GroupedResult>;

    /// All accounts grouped by `key` with placeholder metrics.
    async fn filter_data(
        &self,
        key: GroupingKey,
        rng: &mut (dyn RngCore + Send),
    ) -> Result<GroupedResult>;

    /// Latest balance snapshot per account grouped by `key`, with the
    /// percentage change between opening and closing balance as the metric.
    /// Account numbers are masked when `mask` is set.
    async fn heatmap(&self, key: GroupingKey, mask: bool) -> Result<GroupedResult>;

    /// Verifies the store is reachable.
    async fn check_ready(&self) -> Result<()>;
}

//! Aggregation module - groups account rows into tree-map / heat-map payloads.

mod aggregation_model;
mod aggregation_service;
mod aggregation_traits;
mod metrics;


// Re-export the public interface
pub use aggregation_model::{
    GroupSource, GroupedResult, GroupingKey, MetricValue, TreeMapEntry, TreeMapGroup,
};
pub use aggregation_service::AggregationService;
pub use aggregation_traits::AggregationServiceTrait;
pub use metrics::{
    compute_percent_change, group_by, mask_identifier, normalize_signed_amount,
    placeholder_metric, round_percent,
};

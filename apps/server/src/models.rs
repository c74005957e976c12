use balviz_core::aggregation as core_aggregation;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of `POST /api/filterdata`.
#[derive(Deserialize, ToSchema, Debug, Clone)]
pub struct FilterRequest {
    /// `account_ccy` or `account_country`
    pub filter: String,
}

/// Body of `POST /heatmap/filterdata`.
#[derive(Deserialize, ToSchema, Debug, Clone)]
pub struct HeatmapRequest {
    /// `opening_balance_currency` or `country_id`
    pub groupby: String,
    /// Overrides the configured default masking of account numbers.
    #[serde(default)]
    pub mask: Option<bool>,
}

#[derive(Serialize, ToSchema, Debug, Clone, PartialEq)]
pub struct TreeMapLeaf {
    pub key: String,
    #[schema(value_type = f64)]
    pub data: core_aggregation::MetricValue,
}

#[derive(Serialize, ToSchema, Debug, Clone, PartialEq)]
pub struct TreeMapNode {
    pub key: String,
    pub data: Vec<TreeMapLeaf>,
}

impl From<core_aggregation::TreeMapEntry> for TreeMapLeaf {
    fn from(e: core_aggregation::TreeMapEntry) -> Self {
        Self {
            key: e.key,
            data: e.data,
        }
    }
}

impl From<core_aggregation::TreeMapGroup> for TreeMapNode {
    fn from(g: core_aggregation::TreeMapGroup) -> Self {
        Self {
            key: g.key,
            data: g.data.into_iter().map(TreeMapLeaf::from).collect(),
        }
    }
}

pub fn to_nodes(groups: core_aggregation::GroupedResult) -> Vec<TreeMapNode> {
    groups.into_iter().map(TreeMapNode::from).collect()
}

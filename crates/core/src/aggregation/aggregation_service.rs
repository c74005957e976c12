use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use rand::RngCore;

use super::aggregation_model::{GroupedResult, GroupingKey, MetricValue, TreeMapEntry};
use super::aggregation_traits::AggregationServiceTrait;
use super::metrics::{group_by, mask_identifier, placeholder_metric};
use crate::accounts::AccountRepositoryTrait;
use crate::errors::{DatabaseError, Error, Result};

/// The one aggregation pipeline behind every endpoint.
///
/// Endpoints differ only in which rows are read, which dimension they are
/// grouped by, and which metric is attached to each row.
pub struct AggregationService {
    repository: Arc<dyn AccountRepositoryTrait>,
    query_timeout: Duration,
}

impl AggregationService {
    pub fn new(repository: Arc<dyn AccountRepositoryTrait>, query_timeout: Duration) -> Self {
        AggregationService {
            repository,
            query_timeout,
        }
    }

    /// Runs a blocking repository read on the blocking pool, bounded by the
    /// query timeout. On timeout the read is abandoned, not cancelled.
    async fn fetch<T, F>(&self, operation: &'static str, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn AccountRepositoryTrait) -> Result<T> + Send + 'static,
    {
        let repository = Arc::clone(&self.repository);
        let task = tokio::task::spawn_blocking(move || op(repository.as_ref()));

        match tokio::time::timeout(self.query_timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(Error::Unexpected(format!(
                "{} task failed: {}",
                operation, join_error
            ))),
            Err(_) => {
                warn!(
                    "{} did not finish within {:?}",
                    operation, self.query_timeout
                );
                Err(DatabaseError::Timeout(self.query_timeout).into())
            }
        }
    }
}

#[async_trait]
impl AggregationServiceTrait for AggregationService {
    async fn tree_data(&self, rng: &mut (dyn RngCore + Send)) -> Result<GroupedResult> {
        self.filter_data(GroupingKey::Currency, rng).await
    }

    async fn filter_data(
        &self,
        key: GroupingKey,
        rng: &mut (dyn RngCore + Send),
    ) -> Result<GroupedResult> {
        let accounts = self
            .fetch("list_accounts", |repo| repo.list_accounts())
            .await?;
        debug!("Building {} tree map from {} accounts", key, accounts.len());

        group_by(accounts, key, |account| {
            Ok(TreeMapEntry {
                key: account.account_no.clone(),
                data: placeholder_metric(&mut *rng),
            })
        })
    }

    async fn heatmap(&self, key: GroupingKey, mask: bool) -> Result<GroupedResult> {
        let balances = self
            .fetch("list_latest_balances", |repo| repo.list_latest_balances())
            .await?;
        debug!(
            "Building {} heat map from {} balance snapshots (masked: {})",
            key,
            balances.len(),
            mask
        );

        group_by(balances, key, |balance| {
            let display_key = if mask {
                mask_identifier(&balance.account_no)
            } else {
                balance.account_no.clone()
            };
            Ok(TreeMapEntry {
                key: display_key,
                data: MetricValue::PercentChange(balance.percent_change()?),
            })
        })
    }

    async fn check_ready(&self) -> Result<()> {
        self.fetch("ping", |repo| repo.ping()).await
    }
}

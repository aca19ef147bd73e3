use pfd_domain::{BudgetThresholds, Granularity};
use serde::{Deserialize, Serialize};

pub const TOP_TRANSACTIONS_LIMIT: usize = 5;
pub const TREND_MONTHS: u32 = 6;

/// What category-keyed breakdowns do with transactions whose category id
/// does not resolve.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum MissingCategoryPolicy {
    /// Leave them out of the groups.
    #[default]
    Drop,
    /// Collect them under a single "Uncategorized" group with a nil id.
    Uncategorized,
}

/// Tunables shared by the summary, breakdown and trend calculators.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsOptions {
    pub top_transactions_limit: usize,
    pub budget_thresholds: BudgetThresholds,
    pub missing_category: MissingCategoryPolicy,
    pub custom_granularity: Granularity,
}

impl Default for AnalyticsOptions {
    fn default() -> Self {
        Self {
            top_transactions_limit: TOP_TRANSACTIONS_LIMIT,
            budget_thresholds: BudgetThresholds::default(),
            missing_category: MissingCategoryPolicy::Drop,
            custom_granularity: Granularity::Day,
        }
    }
}

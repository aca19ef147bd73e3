//! Budget progress reporting structures.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Percentage boundaries used to classify budget usage.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetThresholds {
    pub warning: f64,
    pub over: f64,
}

impl Default for BudgetThresholds {
    fn default() -> Self {
        Self {
            warning: 80.0,
            over: 100.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
/// Describes how close a category is to its limit.
pub enum BudgetStatus {
    OnTrack,
    Warning,
    OverBudget,
}

impl BudgetStatus {
    /// Lower bounds are inclusive: exactly `warning` is a warning and exactly
    /// `over` is still a warning, anything above `over` is over budget.
    pub fn classify(percentage: f64, thresholds: &BudgetThresholds) -> Self {
        if percentage > thresholds.over {
            BudgetStatus::OverBudget
        } else if percentage >= thresholds.warning {
            BudgetStatus::Warning
        } else {
            BudgetStatus::OnTrack
        }
    }
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BudgetStatus::OnTrack => "On Track",
            BudgetStatus::Warning => "Warning",
            BudgetStatus::OverBudget => "Over Budget",
        };
        f.write_str(label)
    }
}

/// Spend against a configured limit for one category over one period.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetProgress {
    pub category_id: Uuid,
    pub category_name: String,
    pub budget_limit: f64,
    pub spent: f64,
    /// `budget_limit - spent`; negative once the limit is exceeded.
    pub remaining: f64,
    pub percentage: f64,
    pub status: BudgetStatus,
}

impl BudgetProgress {
    pub fn from_parts(
        category_id: Uuid,
        category_name: String,
        budget_limit: f64,
        spent: f64,
        thresholds: &BudgetThresholds,
    ) -> Self {
        let percentage = if budget_limit > 0.0 {
            (spent / budget_limit) * 100.0
        } else {
            0.0
        };
        Self {
            category_id,
            category_name,
            budget_limit,
            spent,
            remaining: budget_limit - spent,
            percentage,
            status: BudgetStatus::classify(percentage, thresholds),
        }
    }
}

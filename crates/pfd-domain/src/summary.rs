//! Monthly summary structures handed to the presentation layer.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{budget::BudgetProgress, transaction::TransactionType};

/// Aggregate root for one calendar month.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    pub period: SummaryPeriod,
    /// Running balance over the whole history up to "now", not just this month.
    pub total_balance: f64,
    pub monthly_income: f64,
    pub monthly_expenses: f64,
    pub net_savings: f64,
    pub savings_rate: f64,
    pub expense_breakdown: ExpenseBreakdown,
    pub income_breakdown: IncomeBreakdown,
    pub transaction_stats: MonthlyTransactionStats,
    pub budget_progress: Vec<BudgetProgress>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SummaryPeriod {
    pub month: u32,
    pub year: i32,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseBreakdown {
    pub total: f64,
    pub by_category: Vec<CategoryBreakdown>,
    pub by_subcategory: Vec<SubcategoryBreakdown>,
    pub top_expenses: Vec<TopTransaction>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IncomeBreakdown {
    pub total: f64,
    pub by_category: Vec<CategoryBreakdown>,
    pub by_subcategory: Vec<SubcategoryBreakdown>,
    pub top_income: Vec<TopTransaction>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    pub category_id: Uuid,
    pub category_name: String,
    pub amount: f64,
    pub percentage: f64,
    pub transaction_count: usize,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubcategoryBreakdown {
    pub subcategory_id: Uuid,
    pub subcategory_name: String,
    pub parent_id: Uuid,
    pub parent_name: String,
    pub amount: f64,
    pub percentage: f64,
    pub transaction_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TopTransaction {
    pub id: Uuid,
    pub description: String,
    pub amount: f64,
    pub category_id: Uuid,
    pub category_name: String,
    pub date: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TypeStats {
    pub count: usize,
    pub total: f64,
    pub average: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTransactionStats {
    pub total_transactions: usize,
    pub average_transaction_amount: f64,
    /// Always holds an entry for every [`TransactionType`].
    pub by_type: BTreeMap<TransactionType, TypeStats>,
}

impl MonthlyTransactionStats {
    pub fn for_type(&self, kind: TransactionType) -> TypeStats {
        self.by_type.get(&kind).copied().unwrap_or_default()
    }
}

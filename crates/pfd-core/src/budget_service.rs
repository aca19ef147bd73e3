use pfd_domain::{
    BudgetProgress, BudgetThresholds, Category, CurrencyCode, DateRange, Transaction,
    TransactionType,
};

use crate::filters;

pub struct BudgetService;

impl BudgetService {
    /// Spend against limit for every expense category carrying a positive
    /// budget, worst first. Only completed expenses in `currency` dated
    /// inside `range` count, matched on their own category id.
    pub fn progress(
        transactions: &[Transaction],
        categories: &[Category],
        range: &DateRange,
        currency: &CurrencyCode,
        thresholds: &BudgetThresholds,
    ) -> Vec<BudgetProgress> {
        let in_range = filters::by_period(transactions, range);
        let expenses: Vec<&Transaction> = in_range
            .into_iter()
            .filter(|txn| {
                txn.is_completed()
                    && txn.kind == TransactionType::Expense
                    && &txn.currency == currency
            })
            .collect();

        let mut progress: Vec<BudgetProgress> = categories
            .iter()
            .filter_map(|category| {
                let limit = category.effective_budget_limit()?;
                let spent: f64 = expenses
                    .iter()
                    .filter(|txn| txn.category_id == category.id)
                    .map(|txn| txn.amount)
                    .fold(0.0, |acc, amount| acc + amount);
                Some(BudgetProgress::from_parts(
                    category.id,
                    category.name.clone(),
                    limit,
                    spent,
                    thresholds,
                ))
            })
            .collect();
        progress.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));
        progress
    }
}

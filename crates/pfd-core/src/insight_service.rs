//! Dashboard alerts derived from the current and previous monthly summaries.

use std::fmt;

use pfd_domain::{BudgetStatus, CurrencyCode, MonthlySummary};
use serde::{Deserialize, Serialize};

use crate::format::format_currency;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum InsightKind {
    Positive,
    Negative,
    Info,
}

impl fmt::Display for InsightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            InsightKind::Positive => "positive",
            InsightKind::Negative => "negative",
            InsightKind::Info => "info",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub title: String,
    pub description: String,
}

impl Insight {
    fn new(
        id: &str,
        kind: InsightKind,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.to_string(),
            kind,
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Trigger levels, in percent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InsightThresholds {
    pub savings_up: f64,
    pub savings_down: f64,
    pub income_up: f64,
    pub expenses_up: f64,
    pub expenses_down: f64,
    pub top_category_share: f64,
    pub excellent_savings_rate: f64,
    pub low_savings_rate: f64,
    /// At most this many warning budgets produce an "approaching" alert.
    pub max_approaching_budgets: usize,
}

impl Default for InsightThresholds {
    fn default() -> Self {
        Self {
            savings_up: 10.0,
            savings_down: -10.0,
            income_up: 10.0,
            expenses_up: 15.0,
            expenses_down: -10.0,
            top_category_share: 30.0,
            excellent_savings_rate: 20.0,
            low_savings_rate: 10.0,
            max_approaching_budgets: 2,
        }
    }
}

/// `None` when there is no previous value to compare against.
fn change_from(current: f64, previous: Option<f64>) -> Option<f64> {
    match previous {
        Some(prev) if prev != 0.0 => Some(((current - prev) / prev) * 100.0),
        _ => None,
    }
}

pub struct InsightService;

impl InsightService {
    pub fn generate(
        current: &MonthlySummary,
        previous: Option<&MonthlySummary>,
        currency: &CurrencyCode,
        thresholds: &InsightThresholds,
    ) -> Vec<Insight> {
        let mut insights = Vec::new();
        let income_change = change_from(
            current.monthly_income,
            previous.map(|prev| prev.monthly_income),
        );
        let expenses_change = change_from(
            current.monthly_expenses,
            previous.map(|prev| prev.monthly_expenses),
        );
        let savings_change =
            change_from(current.net_savings, previous.map(|prev| prev.net_savings));

        match savings_change {
            Some(change) if change >= thresholds.savings_up => insights.push(Insight::new(
                "savings-up",
                InsightKind::Positive,
                "Great Savings!",
                format!(
                    "You saved {} this month - {change:.0}% more than last month.",
                    format_currency(current.net_savings, currency)
                ),
            )),
            Some(change) if change < thresholds.savings_down => insights.push(Insight::new(
                "savings-down",
                InsightKind::Negative,
                "Savings Decreased",
                format!(
                    "Your savings decreased by {:.0}% compared to last month.",
                    change.abs()
                ),
            )),
            _ => {}
        }

        if let Some(change) = income_change.filter(|&c| c > thresholds.income_up) {
            insights.push(Insight::new(
                "income-up",
                InsightKind::Positive,
                "Income Increased",
                format!("Your income increased by {change:.0}% compared to last month."),
            ));
        }

        let top_expense = current.expense_breakdown.by_category.first();
        match expenses_change {
            Some(change) if change > thresholds.expenses_up => insights.push(Insight::new(
                "expenses-up",
                InsightKind::Negative,
                "Spending Increased",
                format!(
                    "Your expenses increased by {change:.0}% compared to last month. Top category: {}.",
                    top_expense.map_or("N/A", |row| row.category_name.as_str())
                ),
            )),
            Some(change) if change < thresholds.expenses_down => insights.push(Insight::new(
                "expenses-down",
                InsightKind::Positive,
                "Reduced Spending",
                format!(
                    "Great job! Your expenses decreased by {:.0}% compared to last month.",
                    change.abs()
                ),
            )),
            _ => {}
        }

        let over_budget = current
            .budget_progress
            .iter()
            .filter(|row| row.status == BudgetStatus::OverBudget)
            .count();
        if over_budget > 0 {
            let subject = if over_budget == 1 {
                "category is"
            } else {
                "categories are"
            };
            insights.push(Insight::new(
                "over-budget",
                InsightKind::Negative,
                "Over Budget",
                format!("{over_budget} {subject} over budget this month."),
            ));
        }

        let warnings: Vec<&str> = current
            .budget_progress
            .iter()
            .filter(|row| row.status == BudgetStatus::Warning)
            .map(|row| row.category_name.as_str())
            .collect();
        if !warnings.is_empty() && warnings.len() <= thresholds.max_approaching_budgets {
            let subject = if warnings.len() > 1 {
                "These categories are"
            } else {
                "This category is"
            };
            insights.push(Insight::new(
                "approaching-budget",
                InsightKind::Info,
                "Approaching Budget",
                format!(
                    "Watch your spending in {}. {subject} approaching the budget limit.",
                    warnings.join(", ")
                ),
            ));
        }

        if let Some(top) = top_expense.filter(|row| row.percentage > thresholds.top_category_share)
        {
            insights.push(Insight::new(
                "top-category",
                InsightKind::Info,
                format!("High Spending in {}", top.category_name),
                format!(
                    "{} accounts for {:.0}% of your expenses this month.",
                    top.category_name, top.percentage
                ),
            ));
        }

        let rate = current.savings_rate;
        if rate >= thresholds.excellent_savings_rate {
            insights.push(Insight::new(
                "savings-rate-excellent",
                InsightKind::Positive,
                "Excellent Savings Rate",
                format!(
                    "Your savings rate is {rate:.0}%, above the recommended {:.0}%.",
                    thresholds.excellent_savings_rate
                ),
            ));
        } else if rate > 0.0 && rate < thresholds.low_savings_rate {
            insights.push(Insight::new(
                "savings-rate-low",
                InsightKind::Info,
                "Low Savings Rate",
                format!(
                    "Your savings rate is {rate:.0}%. Consider reducing expenses or increasing income to reach {:.0}%.",
                    thresholds.excellent_savings_rate
                ),
            ));
        }

        if insights.is_empty() {
            insights.push(Insight::new(
                "no-insights",
                InsightKind::Info,
                "Add More Transactions",
                "Continue tracking your transactions to receive personalized insights about your spending patterns.",
            ));
        }
        insights
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{summary_service::SummaryService, time::FixedClock};
    use chrono::NaiveDate;
    use pfd_domain::{Category, CategoryType, Transaction, TransactionType};

    fn summary_for(month: u32, income: f64, expenses: &[(f64, &Category)]) -> MonthlySummary {
        let date = NaiveDate::from_ymd_opt(2024, month, 10)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let salary = Category::new("Salary", CategoryType::Income);
        let mut txns = vec![Transaction::new(
            TransactionType::Income,
            income,
            "USD",
            date,
            "pay",
            salary.id,
        )];
        let mut categories = vec![salary];
        for (amount, category) in expenses {
            txns.push(Transaction::new(
                TransactionType::Expense,
                *amount,
                "USD",
                date,
                "spend",
                category.id,
            ));
            categories.push((*category).clone());
        }
        let clock = FixedClock::at_noon(2024, 12, 31).unwrap();
        SummaryService::monthly_summary(month, 2024, &txns, &categories, &CurrencyCode::new("USD"), &clock)
            .expect("summary")
    }

    fn ids(insights: &[Insight]) -> Vec<&str> {
        insights.iter().map(|insight| insight.id.as_str()).collect()
    }

    #[test]
    fn empty_month_yields_fallback() {
        let current = summary_for(3, 0.0, &[]);
        let insights = InsightService::generate(
            &current,
            None,
            &CurrencyCode::new("USD"),
            &InsightThresholds::default(),
        );
        assert_eq!(ids(&insights), vec!["no-insights"]);
    }

    #[test]
    fn month_over_month_changes_raise_alerts() {
        let rent = Category::new("Rent", CategoryType::Expense).with_budget_limit(1000.0);
        let food = Category::new("Food", CategoryType::Expense).with_budget_limit(250.0);
        let previous = summary_for(2, 2000.0, &[(800.0, &rent), (100.0, &food)]);
        let current = summary_for(3, 2500.0, &[(900.0, &rent), (110.0, &food)]);

        let insights = InsightService::generate(
            &current,
            Some(&previous),
            &CurrencyCode::new("USD"),
            &InsightThresholds::default(),
        );
        let found = ids(&insights);
        assert!(found.contains(&"savings-up"));
        assert!(found.contains(&"income-up"));
        assert!(!found.contains(&"expenses-up"));
        assert!(found.contains(&"approaching-budget"));
        assert!(found.contains(&"top-category"));
        assert!(found.contains(&"savings-rate-excellent"));
        let savings = insights.iter().find(|i| i.id == "savings-up").unwrap();
        assert!(savings.description.contains("$1490.00"));
    }
}

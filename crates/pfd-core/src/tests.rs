use chrono::{NaiveDate, NaiveDateTime};
use uuid::Uuid;

use crate::{
    breakdown_service::BreakdownService,
    budget_service::BudgetService,
    category_tree::CategoryTree,
    filters::{self, TransactionFilter},
    options::{AnalyticsOptions, MissingCategoryPolicy},
    periods,
    savings_service::SavingsService,
    summary_service::SummaryService,
    time::FixedClock,
    trend_service::TrendService,
};
use pfd_domain::{
    BudgetStatus, BudgetThresholds, Category, CategoryType, CurrencyCode, GoalStatus,
    SavingsGoal, Transaction, TransactionType,
};

fn at(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

fn usd() -> CurrencyCode {
    CurrencyCode::new("USD")
}

fn household() -> (Vec<Category>, Vec<Transaction>) {
    let salary = Category::new("Salary", CategoryType::Income);
    let food = Category::new("Food", CategoryType::Expense).with_budget_limit(300.0);
    let groceries = Category::new("Groceries", CategoryType::Expense).with_parent(food.id);
    let rent = Category::new("Rent", CategoryType::Expense).with_budget_limit(900.0);
    let txns = vec![
        Transaction::new(TransactionType::Income, 3000.0, "USD", at(2024, 3, 1), "Payroll", salary.id),
        Transaction::new(TransactionType::Expense, 900.0, "USD", at(2024, 3, 2), "Rent", rent.id),
        Transaction::new(TransactionType::Expense, 120.0, "USD", at(2024, 3, 5), "Market", food.id)
            .with_subcategory(groceries.id),
        Transaction::new(TransactionType::Expense, 45.5, "USD", at(2024, 3, 9), "Bakery", groceries.id),
        Transaction::new(TransactionType::Expense, 60.0, "USD", at(2024, 3, 12), "Takeout", Uuid::new_v4()),
        Transaction::new(TransactionType::Transfer, 500.0, "USD", at(2024, 3, 14), "To savings", salary.id),
    ];
    (vec![salary, food, groceries, rent], txns)
}

#[test]
fn scenario_monthly_summary_march_2024() {
    let salary = Category::new("Salary", CategoryType::Income);
    let food = Category::new("Food", CategoryType::Expense);
    let txns = vec![
        Transaction::new(TransactionType::Income, 1000.0, "USD", at(2024, 3, 15), "Pay", salary.id),
        Transaction::new(TransactionType::Expense, 400.0, "USD", at(2024, 3, 15), "Food", food.id),
    ];
    let categories = vec![salary, food];
    let clock = FixedClock::at_noon(2024, 3, 20).unwrap();

    let summary =
        SummaryService::monthly_summary(3, 2024, &txns, &categories, &usd(), &clock).expect("summary");
    assert_eq!(summary.monthly_income, 1000.0);
    assert_eq!(summary.monthly_expenses, 400.0);
    assert_eq!(summary.net_savings, 600.0);
    assert_eq!(summary.savings_rate, 60.0);
}

#[test]
fn calculators_are_idempotent() {
    let (categories, txns) = household();
    let clock = FixedClock::at_noon(2024, 3, 31).unwrap();
    let first = SummaryService::monthly_summary(3, 2024, &txns, &categories, &usd(), &clock)
        .expect("summary");
    let second = SummaryService::monthly_summary(3, 2024, &txns, &categories, &usd(), &clock)
        .expect("summary");
    assert_eq!(first, second);

    let trends_a = TrendService::monthly_trends(&txns, &categories, 4, &usd(), &clock).expect("trends");
    let trends_b = TrendService::monthly_trends(&txns, &categories, 4, &usd(), &clock).expect("trends");
    assert_eq!(trends_a, trends_b);
}

#[test]
fn category_percentages_conserve_when_every_category_resolves() {
    let (categories, mut txns) = household();
    txns.retain(|txn| txn.description != "Takeout");
    let tree = CategoryTree::build(&categories);
    let breakdown = BreakdownService::by_category(
        &txns,
        &tree,
        TransactionType::Expense,
        MissingCategoryPolicy::Drop,
    );
    let total: f64 = breakdown.iter().map(|row| row.percentage).sum();
    assert!((total - 100.0).abs() < 1e-9, "sum was {total}");
}

#[test]
fn uncategorized_policy_conserves_with_dangling_references() {
    let (categories, txns) = household();
    let clock = FixedClock::at_noon(2024, 3, 31).unwrap();
    let options = AnalyticsOptions {
        missing_category: MissingCategoryPolicy::Uncategorized,
        ..AnalyticsOptions::default()
    };
    let summary = SummaryService::monthly_summary_with(
        3,
        2024,
        &txns,
        &categories,
        &usd(),
        &clock,
        &options,
    )
    .expect("summary");
    let total: f64 = summary
        .expense_breakdown
        .by_category
        .iter()
        .map(|row| row.percentage)
        .sum();
    assert!((total - 100.0).abs() < 1e-9);
    assert!(summary
        .expense_breakdown
        .by_category
        .iter()
        .any(|row| row.category_id == Uuid::nil()));
}

#[test]
fn pass_through_filters_return_input_unchanged() {
    let (categories, txns) = household();
    let tree = CategoryTree::build(&categories);
    let expected: Vec<Uuid> = txns.iter().map(|txn| txn.id).collect();
    let ids = |kept: Vec<&Transaction>| kept.into_iter().map(|txn| txn.id).collect::<Vec<_>>();

    assert_eq!(ids(filters::by_category(&txns, &[], &tree)), expected);
    assert_eq!(ids(filters::by_types(&txns, &[])), expected);
    assert_eq!(ids(filters::by_search(&txns, "")), expected);
    assert_eq!(ids(TransactionFilter::default().apply(&txns, &tree)), expected);
}

#[test]
fn scenario_category_subtree_filter() {
    let parent = Category::new("P", CategoryType::Expense);
    let child = Category::new("C", CategoryType::Expense).with_parent(parent.id);
    let txn = Transaction::new(TransactionType::Expense, 10.0, "USD", at(2024, 1, 1), "x", child.id);
    let txns = vec![txn];
    let categories = vec![parent, child];
    let tree = CategoryTree::build(&categories);

    let kept = filters::by_category(&txns, &[categories[0].id], &tree);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].id, txns[0].id);
}

#[test]
fn budget_status_boundaries() {
    let categories: Vec<Category> = [80.0, 100.0, 100.01]
        .iter()
        .enumerate()
        .map(|(idx, _)| {
            Category::new(format!("Budget {idx}"), CategoryType::Expense).with_budget_limit(100.0)
        })
        .collect();
    let txns: Vec<Transaction> = [80.0, 100.0, 100.01]
        .iter()
        .zip(&categories)
        .map(|(&amount, category)| {
            Transaction::new(TransactionType::Expense, amount, "USD", at(2024, 3, 3), "spend", category.id)
        })
        .collect();
    let range = periods::month_range(3, 2024).expect("range");

    let progress =
        BudgetService::progress(&txns, &categories, &range, &usd(), &BudgetThresholds::default());
    let status_of = |name: &str| {
        progress
            .iter()
            .find(|row| row.category_name == name)
            .map(|row| row.status)
    };
    assert_eq!(status_of("Budget 0"), Some(BudgetStatus::Warning));
    assert_eq!(status_of("Budget 1"), Some(BudgetStatus::Warning));
    assert_eq!(status_of("Budget 2"), Some(BudgetStatus::OverBudget));
}

#[test]
fn savings_rate_zero_income_guard() {
    assert_eq!(SummaryService::savings_rate(0.0, 500.0), 0.0);
}

#[test]
fn scenario_trend_comparison_without_prior_period() {
    let (categories, txns) = household();
    let clock = FixedClock::at_noon(2024, 3, 31).unwrap();
    let trends = TrendService::monthly_trends(&txns, &categories, 1, &usd(), &clock).expect("trends");
    let comparison = TrendService::compare(&trends[0], None);
    assert_eq!(comparison.change.income, trends[0].income);
    assert_eq!(comparison.change.income_percentage, 0.0);
}

#[test]
fn scenario_goal_completion_beats_deadline() {
    let clock = FixedClock::at_noon(2024, 6, 1).unwrap();
    let goal = SavingsGoal::new("Emergency fund", 5000.0, "USD")
        .with_current_amount(5000.0)
        .with_deadline(at(2024, 1, 1));
    assert_eq!(SavingsService::progress(&goal, &clock).status, GoalStatus::Completed);
}

#[test]
fn monthly_summary_drops_unknown_categories_but_keeps_totals() {
    let (categories, txns) = household();
    let clock = FixedClock::at_noon(2024, 3, 31).unwrap();
    let summary = SummaryService::monthly_summary(3, 2024, &txns, &categories, &usd(), &clock)
        .expect("summary");

    assert_eq!(summary.monthly_expenses, 1125.5);
    let grouped: f64 = summary
        .expense_breakdown
        .by_category
        .iter()
        .map(|row| row.amount)
        .sum();
    assert_eq!(grouped, 1065.5);
    assert_eq!(summary.expense_breakdown.by_subcategory.len(), 1);
    assert_eq!(summary.expense_breakdown.by_subcategory[0].subcategory_name, "Groceries");
    assert_eq!(summary.transaction_stats.for_type(TransactionType::Transfer).count, 0);
    assert_eq!(summary.budget_progress[0].category_name, "Rent");
    assert_eq!(summary.budget_progress[0].percentage, 100.0);
}

#[test]
fn empty_month_reports_positive_zeroes() {
    let clock = FixedClock::at_noon(2024, 3, 20).unwrap();
    let summary = SummaryService::monthly_summary(3, 2024, &[], &[], &usd(), &clock).unwrap();
    assert!(summary.total_balance.is_sign_positive());
    assert!(summary.monthly_income.is_sign_positive());
    assert!(summary.monthly_expenses.is_sign_positive());
    assert_eq!(crate::format::format_currency(summary.monthly_income, &usd()), "$0.00");

    let json = serde_json::to_string(&summary).unwrap();
    assert!(!json.contains("-0.0"), "{json}");

    let (categories, _) = household();
    let range = periods::month_range(3, 2024).unwrap();
    let progress = BudgetService::progress(&[], &categories, &range, &usd(), &BudgetThresholds::default());
    assert!(progress.iter().all(|row| row.spent.is_sign_positive() && row.percentage.is_sign_positive()));
}

#[test]
fn lowercase_stored_currency_still_counts() {
    let salary = Category::new("Salary", CategoryType::Income);
    let stored = Transaction::new(TransactionType::Income, 1000.0, "USD", at(2024, 3, 4), "Pay", salary.id);
    let json = serde_json::to_string(&stored).unwrap().replace("\"USD\"", "\"usd\"");
    let loaded: Transaction = serde_json::from_str(&json).unwrap();
    assert_eq!(loaded.currency, usd());

    let clock = FixedClock::at_noon(2024, 3, 20).unwrap();
    let summary = SummaryService::monthly_summary(
        3,
        2024,
        &[loaded],
        &[salary],
        &CurrencyCode::new("usd"),
        &clock,
    )
    .unwrap();
    assert_eq!(summary.monthly_income, 1000.0);
}

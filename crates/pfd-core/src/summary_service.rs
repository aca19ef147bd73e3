use std::collections::BTreeMap;

use pfd_domain::{
    Category, CurrencyCode, ExpenseBreakdown, IncomeBreakdown, MonthlySummary,
    MonthlyTransactionStats, SummaryPeriod, Transaction, TransactionType, TypeStats,
};

use crate::{
    breakdown_service::BreakdownService, budget_service::BudgetService,
    category_tree::CategoryTree, filters, options::AnalyticsOptions, periods, time::Clock,
    CoreResult,
};

pub struct SummaryService;

impl SummaryService {
    /// `(income - expenses) / income` as a percentage; 0 when there is no income.
    pub fn savings_rate(income: f64, expenses: f64) -> f64 {
        if income <= 0.0 {
            return 0.0;
        }
        ((income - expenses) / income) * 100.0
    }

    /// Running balance over the whole history up to `now`, not scoped to any
    /// period. Completed transactions in `currency` only.
    pub fn total_balance(
        transactions: &[Transaction],
        currency: &CurrencyCode,
        now: chrono::NaiveDateTime,
    ) -> f64 {
        filters::monetary(transactions, currency)
            .into_iter()
            .filter(|txn| txn.date <= now)
            .map(Transaction::balance_effect)
            .fold(0.0, |acc, amount| acc + amount)
    }

    /// Count, total and average per type. Every type is present; averages are
    /// 0 for types without transactions.
    pub fn transaction_stats<'a, I>(transactions: I) -> MonthlyTransactionStats
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let mut by_type: BTreeMap<TransactionType, TypeStats> = TransactionType::ALL
            .iter()
            .map(|&kind| (kind, TypeStats::default()))
            .collect();
        let mut total_transactions = 0usize;
        let mut total_amount = 0.0;
        for txn in transactions {
            total_transactions += 1;
            total_amount += txn.amount;
            let stats = by_type.entry(txn.kind).or_default();
            stats.count += 1;
            stats.total += txn.amount;
        }
        for stats in by_type.values_mut() {
            if stats.count > 0 {
                stats.average = stats.total / stats.count as f64;
            }
        }
        MonthlyTransactionStats {
            total_transactions,
            average_transaction_amount: if total_transactions > 0 {
                total_amount / total_transactions as f64
            } else {
                0.0
            },
            by_type,
        }
    }

    pub fn monthly_summary(
        month: u32,
        year: i32,
        transactions: &[Transaction],
        categories: &[Category],
        currency: &CurrencyCode,
        clock: &dyn Clock,
    ) -> CoreResult<MonthlySummary> {
        Self::monthly_summary_with(
            month,
            year,
            transactions,
            categories,
            currency,
            clock,
            &AnalyticsOptions::default(),
        )
    }

    /// Full dashboard aggregate for one calendar month.
    #[allow(clippy::too_many_arguments)]
    pub fn monthly_summary_with(
        month: u32,
        year: i32,
        transactions: &[Transaction],
        categories: &[Category],
        currency: &CurrencyCode,
        clock: &dyn Clock,
        options: &AnalyticsOptions,
    ) -> CoreResult<MonthlySummary> {
        let range = periods::month_range(month, year)?;
        let tree = CategoryTree::build(categories);
        let in_month = filters::by_period(transactions, &range);
        let valid = filters::monetary(in_month, currency);

        let monthly_income = filters::sum_by_type(valid.iter().copied(), TransactionType::Income)
            + filters::sum_by_type(valid.iter().copied(), TransactionType::Refund);
        let monthly_expenses =
            filters::sum_by_type(valid.iter().copied(), TransactionType::Expense);
        let policy = options.missing_category;
        let limit = options.top_transactions_limit;

        let expense_breakdown = ExpenseBreakdown {
            total: monthly_expenses,
            by_category: BreakdownService::by_category(
                valid.iter().copied(),
                &tree,
                TransactionType::Expense,
                policy,
            ),
            by_subcategory: BreakdownService::by_subcategory(
                valid.iter().copied(),
                &tree,
                TransactionType::Expense,
                policy,
            ),
            top_expenses: BreakdownService::top_transactions(
                valid.iter().copied(),
                &tree,
                TransactionType::Expense,
                limit,
            ),
        };
        let income_breakdown = IncomeBreakdown {
            total: monthly_income,
            by_category: BreakdownService::by_category(
                valid.iter().copied(),
                &tree,
                TransactionType::Income,
                policy,
            ),
            by_subcategory: BreakdownService::by_subcategory(
                valid.iter().copied(),
                &tree,
                TransactionType::Income,
                policy,
            ),
            top_income: BreakdownService::top_transactions(
                valid.iter().copied(),
                &tree,
                TransactionType::Income,
                limit,
            ),
        };

        Ok(MonthlySummary {
            period: SummaryPeriod {
                month,
                year,
                start_date: range.start,
                end_date: range.end,
            },
            total_balance: Self::total_balance(transactions, currency, clock.now()),
            monthly_income,
            monthly_expenses,
            net_savings: monthly_income - monthly_expenses,
            savings_rate: Self::savings_rate(monthly_income, monthly_expenses),
            expense_breakdown,
            income_breakdown,
            transaction_stats: Self::transaction_stats(valid.iter().copied()),
            budget_progress: BudgetService::progress(
                transactions,
                categories,
                &range,
                currency,
                &options.budget_thresholds,
            ),
        })
    }
}

use chrono::{Datelike, Duration, NaiveDate};
use pfd_domain::{
    end_of_day, start_of_day, Category, CurrencyCode, DateRange, Granularity, MonthlyTrend,
    PeriodTrend, Transaction, TransactionType, TrendChange, TrendComparison,
};
use tracing::warn;

use crate::{
    filters, options::AnalyticsOptions, periods, summary_service::SummaryService, time::Clock,
    CoreResult,
};

/// Bucket counts above this are logged; the series is still produced.
pub const LARGE_SERIES_THRESHOLD: usize = 366;

/// Percentage change from `previous`, defined as 0 when `previous` is 0.
fn percentage_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return 0.0;
    }
    ((current - previous) / previous) * 100.0
}

pub struct TrendService;

impl TrendService {
    /// One point per month for the trailing `months` months, oldest first,
    /// ending with the clock's current month.
    pub fn monthly_trends(
        transactions: &[Transaction],
        categories: &[Category],
        months: u32,
        currency: &CurrencyCode,
        clock: &dyn Clock,
    ) -> CoreResult<Vec<MonthlyTrend>> {
        Self::monthly_trends_with(
            transactions,
            categories,
            months,
            currency,
            clock,
            &AnalyticsOptions::default(),
        )
    }

    pub fn monthly_trends_with(
        transactions: &[Transaction],
        categories: &[Category],
        months: u32,
        currency: &CurrencyCode,
        clock: &dyn Clock,
        options: &AnalyticsOptions,
    ) -> CoreResult<Vec<MonthlyTrend>> {
        let today = clock.today();
        (0..months as i32)
            .rev()
            .map(|back| -> CoreResult<MonthlyTrend> {
                let (month, year) = periods::shift_month(today.month(), today.year(), -back);
                let summary = SummaryService::monthly_summary_with(
                    month,
                    year,
                    transactions,
                    categories,
                    currency,
                    clock,
                    options,
                )?;
                Ok(MonthlyTrend {
                    month,
                    year,
                    period_label: summary.period.start_date.format("%b %Y").to_string(),
                    income: summary.monthly_income,
                    expenses: summary.monthly_expenses,
                    savings: summary.net_savings,
                    savings_rate: summary.savings_rate,
                })
            })
            .collect()
    }

    /// Deltas between two trend points. Without a previous point the deltas
    /// equal the current values and percentage deltas are 0.
    pub fn compare(current: &MonthlyTrend, previous: Option<&MonthlyTrend>) -> TrendComparison {
        let change = match previous {
            Some(prev) => TrendChange {
                income: current.income - prev.income,
                income_percentage: percentage_change(current.income, prev.income),
                expenses: current.expenses - prev.expenses,
                expenses_percentage: percentage_change(current.expenses, prev.expenses),
                savings: current.savings - prev.savings,
                savings_rate: current.savings_rate - prev.savings_rate,
            },
            None => TrendChange {
                income: current.income,
                income_percentage: 0.0,
                expenses: current.expenses,
                expenses_percentage: 0.0,
                savings: current.savings,
                savings_rate: current.savings_rate,
            },
        };
        TrendComparison {
            current: current.clone(),
            previous: previous.cloned(),
            change,
        }
    }

    /// Buckets completed monetary transactions in `currency` across `range`.
    /// Refunds count as income. Day buckets cover each calendar day, week
    /// buckets start on Monday, month buckets on the 1st; the first bucket
    /// may begin before `range.start`.
    pub fn period_trends(
        transactions: &[Transaction],
        range: &DateRange,
        granularity: Granularity,
        currency: &CurrencyCode,
    ) -> Vec<PeriodTrend> {
        let buckets = bucket_bounds(range, granularity);
        if buckets.len() > LARGE_SERIES_THRESHOLD {
            warn!(
                buckets = buckets.len(),
                %granularity,
                "period trend request produces a very long series"
            );
        }

        let mut trends: Vec<PeriodTrend> = buckets
            .iter()
            .map(|&(first, last)| PeriodTrend {
                label: bucket_label(first, granularity),
                start: start_of_day(first),
                end: end_of_day(last),
                income: 0.0,
                expenses: 0.0,
                savings: 0.0,
            })
            .collect();

        let valid = filters::monetary(filters::by_period(transactions, range), currency);
        for txn in valid {
            let day = txn.date.date();
            let idx = buckets.partition_point(|&(_, last)| last < day);
            let Some(trend) = trends.get_mut(idx) else {
                continue;
            };
            match txn.kind {
                TransactionType::Income | TransactionType::Refund => trend.income += txn.amount,
                TransactionType::Expense => trend.expenses += txn.amount,
                TransactionType::Transfer | TransactionType::Recurring => {}
            }
        }
        for trend in &mut trends {
            trend.savings = trend.income - trend.expenses;
        }
        trends
    }
}

/// Inclusive `(first day, last day)` pairs, ascending and contiguous.
fn bucket_bounds(range: &DateRange, granularity: Granularity) -> Vec<(NaiveDate, NaiveDate)> {
    let end = range.end.date();
    let mut cursor = match granularity {
        Granularity::Day => range.start.date(),
        Granularity::Week => periods::start_of_week(range.start.date()),
        Granularity::Month => periods::first_of_month(range.start.date()),
    };
    let mut buckets = Vec::new();
    while cursor <= end {
        let next = match granularity {
            Granularity::Day => cursor.succ_opt(),
            Granularity::Week => cursor.checked_add_signed(Duration::days(7)),
            Granularity::Month => {
                let (month, year) = periods::shift_month(cursor.month(), cursor.year(), 1);
                NaiveDate::from_ymd_opt(year, month, 1)
            }
        };
        let Some(next) = next else {
            buckets.push((cursor, end));
            break;
        };
        buckets.push((cursor, next.pred_opt().unwrap_or(cursor)));
        cursor = next;
    }
    buckets
}

fn bucket_label(first: NaiveDate, granularity: Granularity) -> String {
    match granularity {
        Granularity::Day | Granularity::Week => first.format("%b %-d").to_string(),
        Granularity::Month => first.format("%b %Y").to_string(),
    }
}

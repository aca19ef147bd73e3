//! Plain-text rendering of analytics results for the terminal.

use std::fmt::Write as _;
use std::io::IsTerminal;

use colored::Colorize;
use pfd_core::{
    format_date, format_percentage, CurrencyFormatter, Insight, InsightKind, SymbolFormatter,
};
use pfd_domain::{
    BudgetProgress, BudgetStatus, CurrencyCode, GoalStatus, MonthlySummary, MonthlyTrend,
    PeriodTrend, SavingsGoalProgress, TrendComparison,
};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Tone {
    Header,
    Good,
    Caution,
    Bad,
    Muted,
}

/// Whether stdout should receive ANSI colors: a terminal with `NO_COLOR` unset.
pub fn color_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
}

pub struct ReportRenderer {
    currency: CurrencyCode,
    formatter: Box<dyn CurrencyFormatter>,
    color: bool,
}

impl ReportRenderer {
    pub fn new(currency: CurrencyCode, color: bool) -> Self {
        Self {
            currency,
            formatter: Box::new(SymbolFormatter),
            color,
        }
    }

    pub fn plain(currency: CurrencyCode) -> Self {
        Self {
            currency,
            formatter: Box::new(SymbolFormatter),
            color: false,
        }
    }

    fn money(&self, amount: f64) -> String {
        self.formatter.format_amount(amount, &self.currency)
    }

    fn paint(&self, text: &str, tone: Tone) -> String {
        if !self.color {
            return text.to_string();
        }
        match tone {
            Tone::Header => text.bold().to_string(),
            Tone::Good => text.green().to_string(),
            Tone::Caution => text.yellow().to_string(),
            Tone::Bad => text.red().to_string(),
            Tone::Muted => text.dimmed().to_string(),
        }
    }

    fn header(&self, out: &mut String, title: &str) {
        let _ = writeln!(out, "{}", self.paint(&format!("=== {title} ==="), Tone::Header));
    }

    pub fn summary(&self, summary: &MonthlySummary) -> String {
        let mut out = String::new();
        let period = &summary.period;
        self.header(
            &mut out,
            &format!("Summary {}", period.start_date.format("%B %Y")),
        );
        let rate_tone = if summary.savings_rate < 0.0 {
            Tone::Bad
        } else {
            Tone::Good
        };
        let _ = writeln!(out, "Total balance:  {}", self.money(summary.total_balance));
        let _ = writeln!(out, "Income:         {}", self.money(summary.monthly_income));
        let _ = writeln!(out, "Expenses:       {}", self.money(summary.monthly_expenses));
        let _ = writeln!(out, "Net savings:    {}", self.money(summary.net_savings));
        let _ = writeln!(
            out,
            "Savings rate:   {}",
            self.paint(&format_percentage(summary.savings_rate), rate_tone)
        );

        if !summary.expense_breakdown.by_category.is_empty() {
            let _ = writeln!(out, "\nExpenses by category");
            for row in &summary.expense_breakdown.by_category {
                let _ = writeln!(
                    out,
                    "  {:<24} {:>14} {:>7}  ({} txns)",
                    row.category_name,
                    self.money(row.amount),
                    format_percentage(row.percentage),
                    row.transaction_count
                );
            }
        }
        if !summary.expense_breakdown.top_expenses.is_empty() {
            let _ = writeln!(out, "\nTop expenses");
            for txn in &summary.expense_breakdown.top_expenses {
                let _ = writeln!(
                    out,
                    "  {}  {:<24} {:>14}  {}",
                    format_date(txn.date.date()),
                    txn.description,
                    self.money(txn.amount),
                    self.paint(&txn.category_name, Tone::Muted)
                );
            }
        }
        let stats = &summary.transaction_stats;
        let _ = writeln!(
            out,
            "\n{} transactions, average {}",
            stats.total_transactions,
            self.money(stats.average_transaction_amount)
        );
        if !summary.budget_progress.is_empty() {
            out.push('\n');
            out.push_str(&self.budgets(&summary.budget_progress));
        }
        out
    }

    pub fn budgets(&self, progress: &[BudgetProgress]) -> String {
        let mut out = String::new();
        self.header(&mut out, "Budgets");
        if progress.is_empty() {
            let _ = writeln!(out, "No budgeted categories.");
            return out;
        }
        for row in progress {
            let tone = match row.status {
                BudgetStatus::OnTrack => Tone::Good,
                BudgetStatus::Warning => Tone::Caution,
                BudgetStatus::OverBudget => Tone::Bad,
            };
            let _ = writeln!(
                out,
                "  {:<24} {:>14} / {:<14} {:>7}  {}",
                row.category_name,
                self.money(row.spent),
                self.money(row.budget_limit),
                format_percentage(row.percentage),
                self.paint(&row.status.to_string(), tone)
            );
        }
        out
    }

    pub fn trends(&self, trends: &[MonthlyTrend], comparison: Option<&TrendComparison>) -> String {
        let mut out = String::new();
        self.header(&mut out, "Monthly trends");
        for point in trends {
            let _ = writeln!(
                out,
                "  {:<9} income {:>14}  expenses {:>14}  savings {:>14}  rate {:>7}",
                point.period_label,
                self.money(point.income),
                self.money(point.expenses),
                self.money(point.savings),
                format_percentage(point.savings_rate)
            );
        }
        if let Some(comparison) = comparison {
            let change = &comparison.change;
            let _ = writeln!(
                out,
                "\nvs previous month: income {} ({}), expenses {} ({}), savings {}",
                self.money(change.income),
                format_percentage(change.income_percentage),
                self.money(change.expenses),
                format_percentage(change.expenses_percentage),
                self.money(change.savings)
            );
        }
        out
    }

    pub fn series(&self, title: &str, series: &[PeriodTrend]) -> String {
        let mut out = String::new();
        self.header(&mut out, title);
        for point in series {
            let _ = writeln!(
                out,
                "  {:<9} income {:>14}  expenses {:>14}  savings {:>14}",
                point.label,
                self.money(point.income),
                self.money(point.expenses),
                self.money(point.savings)
            );
        }
        out
    }

    pub fn goals(&self, goals: &[SavingsGoalProgress]) -> String {
        let mut out = String::new();
        self.header(&mut out, "Savings goals");
        if goals.is_empty() {
            let _ = writeln!(out, "No savings goals.");
            return out;
        }
        for goal in goals {
            let tone = match goal.status {
                GoalStatus::Completed => Tone::Good,
                GoalStatus::InProgress => Tone::Caution,
                GoalStatus::Overdue => Tone::Bad,
                GoalStatus::NotStarted => Tone::Muted,
            };
            let deadline = goal
                .goal
                .deadline
                .map(|deadline| format!("due {}", format_date(deadline.date())))
                .unwrap_or_else(|| "no deadline".into());
            let _ = writeln!(
                out,
                "  {:<24} {:>14} of {:<14} {:>7}  {}  {}",
                goal.goal.name,
                self.money(goal.goal.current_amount),
                self.money(goal.goal.target_amount),
                format_percentage(goal.percentage),
                self.paint(&goal.status.to_string(), tone),
                deadline
            );
        }
        out
    }

    pub fn insights(&self, insights: &[Insight]) -> String {
        let mut out = String::new();
        self.header(&mut out, "Insights");
        for insight in insights {
            let (marker, tone) = match insight.kind {
                InsightKind::Positive => ("+", Tone::Good),
                InsightKind::Negative => ("!", Tone::Bad),
                InsightKind::Info => ("i", Tone::Muted),
            };
            let _ = writeln!(
                out,
                "[{}] {}\n    {}",
                self.paint(marker, tone),
                insight.title,
                insight.description
            );
        }
        out
    }
}

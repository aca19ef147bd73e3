//! Read-only reporting commands over a stored snapshot.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use pfd_config::{Config, ConfigManager};
use pfd_core::{
    periods, BudgetService, Clock, InsightService, InsightThresholds, InsightsPeriod,
    InsightsPeriodKind, SavingsService, Snapshot, SnapshotStorage, SummaryService, SystemClock,
    TrendService,
};
use pfd_domain::{CurrencyCode, DateRange};
use pfd_storage_json::JsonSnapshotStorage;
use serde_json::json;
use tracing::debug;

use crate::errors::{FinanceError, FinanceResult};
use crate::report::{color_enabled, ReportRenderer};

#[derive(Debug, Parser)]
#[command(
    name = "finance_core_cli",
    version,
    about = "Monthly summaries, trends, budgets and insights from a finance snapshot"
)]
pub struct Cli {
    /// Snapshot file to read; defaults to the configured location.
    #[arg(long, global = true, value_name = "PATH")]
    pub snapshot: Option<PathBuf>,

    /// Reporting currency; defaults to the configured base currency.
    #[arg(long, global = true, value_name = "CODE")]
    pub currency: Option<String>,

    /// Emit JSON instead of a text report.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Dashboard summary for one month.
    Summary {
        #[arg(long)]
        month: Option<u32>,
        #[arg(long)]
        year: Option<i32>,
    },
    /// Monthly income, expenses and savings for the trailing months.
    Trends {
        #[arg(long)]
        months: Option<u32>,
    },
    /// Spend against limit for budgeted expense categories.
    Budgets {
        #[arg(long)]
        month: Option<u32>,
        #[arg(long)]
        year: Option<i32>,
    },
    /// Savings goals ordered by urgency.
    Goals,
    /// Generated observations comparing a month with the one before.
    Insights {
        #[arg(long)]
        month: Option<u32>,
        #[arg(long)]
        year: Option<i32>,
    },
    /// Bucketed income and expenses for an insights period.
    Series {
        #[arg(long, value_enum, default_value_t = PeriodArg::ThisMonth)]
        period: PeriodArg,
        /// First day of a custom period (YYYY-MM-DD).
        #[arg(long, value_name = "DATE")]
        from: Option<NaiveDate>,
        /// Last day of a custom period (YYYY-MM-DD).
        #[arg(long, value_name = "DATE")]
        to: Option<NaiveDate>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PeriodArg {
    ThisWeek,
    ThisMonth,
    ThisYear,
    Custom,
}

impl From<PeriodArg> for InsightsPeriodKind {
    fn from(value: PeriodArg) -> Self {
        match value {
            PeriodArg::ThisWeek => InsightsPeriodKind::ThisWeek,
            PeriodArg::ThisMonth => InsightsPeriodKind::ThisMonth,
            PeriodArg::ThisYear => InsightsPeriodKind::ThisYear,
            PeriodArg::Custom => InsightsPeriodKind::Custom,
        }
    }
}

/// Parses the process arguments, runs the command and prints its output.
pub fn run_cli() -> FinanceResult<()> {
    let cli = Cli::parse();
    let config = ConfigManager::from_env()?.load()?;
    let output = execute_with(&cli, &config, &SystemClock, color_enabled())?;
    print!("{output}");
    Ok(())
}

/// Runs one command and returns its rendered output without colors.
pub fn execute(cli: &Cli, config: &Config, clock: &dyn Clock) -> FinanceResult<String> {
    execute_with(cli, config, clock, false)
}

fn execute_with(
    cli: &Cli,
    config: &Config,
    clock: &dyn Clock,
    color: bool,
) -> FinanceResult<String> {
    let snapshot_path = cli
        .snapshot
        .clone()
        .unwrap_or_else(|| config.resolve_snapshot_path());
    let snapshot = JsonSnapshotStorage::new(snapshot_path).load()?;
    debug!(command = ?cli.command, "running report command");

    let currency = cli
        .currency
        .as_deref()
        .map(CurrencyCode::new)
        .unwrap_or_else(|| config.currency());
    let ctx = Context {
        snapshot: &snapshot,
        config,
        clock,
        currency: &currency,
        json: cli.json,
        renderer: ReportRenderer::new(currency.clone(), color),
    };

    match &cli.command {
        Command::Summary { month, year } => ctx.summary(*month, *year),
        Command::Trends { months } => ctx.trends(*months),
        Command::Budgets { month, year } => ctx.budgets(*month, *year),
        Command::Goals => ctx.goals(),
        Command::Insights { month, year } => ctx.insights(*month, *year),
        Command::Series { period, from, to } => ctx.series(*period, *from, *to),
    }
}

struct Context<'a> {
    snapshot: &'a Snapshot,
    config: &'a Config,
    clock: &'a dyn Clock,
    currency: &'a CurrencyCode,
    json: bool,
    renderer: ReportRenderer,
}

impl Context<'_> {
    fn month_or_current(&self, month: Option<u32>, year: Option<i32>) -> (u32, i32) {
        let current = periods::current_month(self.clock.now());
        (month.unwrap_or(current.month), year.unwrap_or(current.year))
    }

    fn summary(&self, month: Option<u32>, year: Option<i32>) -> FinanceResult<String> {
        let (month, year) = self.month_or_current(month, year);
        let summary = SummaryService::monthly_summary_with(
            month,
            year,
            &self.snapshot.transactions,
            &self.snapshot.categories,
            self.currency,
            self.clock,
            &self.config.analytics_options(),
        )?;
        if self.json {
            return Ok(to_json(&summary)?);
        }
        Ok(self.renderer.summary(&summary))
    }

    fn trends(&self, months: Option<u32>) -> FinanceResult<String> {
        let months = months.unwrap_or(self.config.trend_months);
        if months == 0 {
            return Err(FinanceError::InvalidArgument(
                "--months must be at least 1".into(),
            ));
        }
        let trends = TrendService::monthly_trends_with(
            &self.snapshot.transactions,
            &self.snapshot.categories,
            months,
            self.currency,
            self.clock,
            &self.config.analytics_options(),
        )?;
        let comparison = trends.last().map(|current| {
            let previous = trends.len().checked_sub(2).and_then(|idx| trends.get(idx));
            TrendService::compare(current, previous)
        });
        if self.json {
            return Ok(to_json(&json!({ "trends": trends, "comparison": comparison }))?);
        }
        Ok(self.renderer.trends(&trends, comparison.as_ref()))
    }

    fn budgets(&self, month: Option<u32>, year: Option<i32>) -> FinanceResult<String> {
        let (month, year) = self.month_or_current(month, year);
        let range = periods::month_range(month, year)?;
        let progress = BudgetService::progress(
            &self.snapshot.transactions,
            &self.snapshot.categories,
            &range,
            self.currency,
            &self.config.analytics_options().budget_thresholds,
        );
        if self.json {
            return Ok(to_json(&progress)?);
        }
        Ok(self.renderer.budgets(&progress))
    }

    fn goals(&self) -> FinanceResult<String> {
        let mut goals = SavingsService::refresh_all(&self.snapshot.savings_goals, self.clock);
        SavingsService::sort_by_priority(&mut goals, self.clock);
        if self.json {
            return Ok(to_json(&goals)?);
        }
        Ok(self.renderer.goals(&goals))
    }

    fn insights(&self, month: Option<u32>, year: Option<i32>) -> FinanceResult<String> {
        let (month, year) = self.month_or_current(month, year);
        let previous_ref = periods::previous_month(month, year);
        let options = self.config.analytics_options();
        let summarize = |month: u32, year: i32| {
            SummaryService::monthly_summary_with(
                month,
                year,
                &self.snapshot.transactions,
                &self.snapshot.categories,
                self.currency,
                self.clock,
                &options,
            )
        };
        let current = summarize(month, year)?;
        let previous = summarize(previous_ref.month, previous_ref.year)?;
        let insights = InsightService::generate(
            &current,
            Some(&previous),
            self.currency,
            &InsightThresholds::default(),
        );
        if self.json {
            return Ok(to_json(&insights)?);
        }
        Ok(self.renderer.insights(&insights))
    }

    fn series(
        &self,
        period: PeriodArg,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> FinanceResult<String> {
        let custom_range = match (period, from, to) {
            (PeriodArg::Custom, Some(from), Some(to)) => Some(DateRange::from_dates(from, to)?),
            (PeriodArg::Custom, _, _) => {
                return Err(FinanceError::InvalidArgument(
                    "a custom period needs both --from and --to".into(),
                ))
            }
            _ => None,
        };
        let selection = InsightsPeriod {
            kind: period.into(),
            custom_range,
        };
        let range = selection.range(self.clock.now()).ok_or_else(|| {
            FinanceError::InvalidArgument("period does not resolve to a date range".into())
        })?;
        let granularity = selection
            .kind
            .granularity_with(self.config.custom_period_granularity);
        let series = TrendService::period_trends(
            &self.snapshot.transactions,
            &range,
            granularity,
            self.currency,
        );
        if self.json {
            return Ok(to_json(&series)?);
        }
        let title = format!("Series by {granularity}");
        Ok(self.renderer.series(&title, &series))
    }
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value).map(|mut text| {
        text.push('\n');
        text
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_series_requires_both_dates() {
        let cli = Cli::try_parse_from(["finance_core_cli", "series", "--period", "custom"])
            .expect("parse");
        match cli.command {
            Command::Series { period, from, to } => {
                assert_eq!(period, PeriodArg::Custom);
                assert!(from.is_none() && to.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from([
            "finance_core_cli",
            "summary",
            "--month",
            "3",
            "--year",
            "2024",
            "--json",
            "--currency",
            "EUR",
        ])
        .expect("parse");
        assert!(cli.json);
        assert_eq!(cli.currency.as_deref(), Some("EUR"));
        assert!(matches!(
            cli.command,
            Command::Summary {
                month: Some(3),
                year: Some(2024)
            }
        ));
    }

    #[test]
    fn period_arg_maps_onto_insights_kind() {
        assert_eq!(
            InsightsPeriodKind::from(PeriodArg::ThisYear),
            InsightsPeriodKind::ThisYear
        );
    }
}

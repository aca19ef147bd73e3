//! Trend series points and period-over-period comparisons.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One month projected out of a monthly summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTrend {
    pub month: u32,
    pub year: i32,
    /// Short month name and four-digit year, e.g. `Jan 2025`.
    pub period_label: String,
    pub income: f64,
    pub expenses: f64,
    pub savings: f64,
    pub savings_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrendComparison {
    pub current: MonthlyTrend,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<MonthlyTrend>,
    pub change: TrendChange,
}

/// Absolute deltas plus percentage deltas for income and expenses.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrendChange {
    pub income: f64,
    pub income_percentage: f64,
    pub expenses: f64,
    pub expenses_percentage: f64,
    pub savings: f64,
    pub savings_rate: f64,
}

/// Bucket width for sub-monthly trend series.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "camelCase")]
pub enum Granularity {
    #[default]
    Day,
    Week,
    Month,
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Granularity::Day => "day",
            Granularity::Week => "week",
            Granularity::Month => "month",
        };
        f.write_str(label)
    }
}

/// One bucket of a period trend series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PeriodTrend {
    pub label: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub income: f64,
    pub expenses: f64,
    pub savings: f64,
}

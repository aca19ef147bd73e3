//! Calendar periods: month ranges, preset ranges relative to "now", and
//! month navigation helpers.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use pfd_domain::{end_of_day, start_of_day, DateRange, Granularity};
use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult};

/// `[day 1 00:00:00.000, last day 23:59:59.999]` for the given month.
pub fn month_range(month: u32, year: i32) -> CoreResult<DateRange> {
    if !(1..=12).contains(&month) {
        return Err(CoreError::InvalidMonth(month));
    }
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or(CoreError::InvalidYear(year))?;
    let last = last_day_of_month(first).ok_or(CoreError::InvalidYear(year))?;
    Ok(DateRange::from_dates(first, last)?)
}

/// Day 0 of the following month.
fn last_day_of_month(first: NaiveDate) -> Option<NaiveDate> {
    let (year, month) = next_month_of(first.year(), first.month());
    NaiveDate::from_ymd_opt(year, month, 1)?.pred_opt()
}

fn next_month_of(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Monday on or before `date`.
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Steps `offset` months back (negative) or forward (positive) from the given month.
pub fn shift_month(month: u32, year: i32, offset: i32) -> (u32, i32) {
    let index = year * 12 + month as i32 - 1 + offset;
    ((index.rem_euclid(12) + 1) as u32, index.div_euclid(12))
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MonthRef {
    pub month: u32,
    pub year: i32,
}

pub fn previous_month(month: u32, year: i32) -> MonthRef {
    if month == 1 {
        MonthRef {
            month: 12,
            year: year - 1,
        }
    } else {
        MonthRef {
            month: month - 1,
            year,
        }
    }
}

/// The month after the given one, or `None` when it already equals `max`.
pub fn next_month(month: u32, year: i32, max: Option<MonthRef>) -> Option<MonthRef> {
    if max == Some(MonthRef { month, year }) {
        return None;
    }
    let (year, month) = next_month_of(year, month);
    Some(MonthRef { month, year })
}

pub fn current_month(now: NaiveDateTime) -> MonthRef {
    MonthRef {
        month: now.month(),
        year: now.year(),
    }
}

pub fn is_current_month(month: u32, year: i32, now: NaiveDateTime) -> bool {
    current_month(now) == MonthRef { month, year }
}

/// Quick-pick ranges offered by the transaction list filters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PresetRange {
    Today,
    ThisWeek,
    ThisMonth,
    ThisYear,
    AllTime,
    Custom,
}

impl PresetRange {
    /// Concrete range for `now`; `AllTime` and `Custom` carry none.
    pub fn range(self, now: NaiveDateTime) -> Option<DateRange> {
        let today = now.date();
        let (start, end) = match self {
            PresetRange::Today => (today, today),
            PresetRange::ThisWeek => {
                let monday = start_of_week(today);
                (monday, monday + Duration::days(6))
            }
            PresetRange::ThisMonth => {
                let first = first_of_month(today);
                (first, last_day_of_month(first)?)
            }
            PresetRange::ThisYear => (
                NaiveDate::from_ymd_opt(today.year(), 1, 1)?,
                NaiveDate::from_ymd_opt(today.year(), 12, 31)?,
            ),
            PresetRange::AllTime | PresetRange::Custom => return None,
        };
        Some(DateRange {
            start: start_of_day(start),
            end: end_of_day(end),
        })
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum InsightsPeriodKind {
    ThisWeek,
    #[default]
    ThisMonth,
    ThisYear,
    Custom,
}

impl InsightsPeriodKind {
    /// Fixed mapping: week and month are daily, year is monthly, custom is
    /// daily regardless of span.
    pub fn granularity(self) -> Granularity {
        self.granularity_with(Granularity::Day)
    }

    /// Same mapping with the custom bucket width supplied by configuration.
    pub fn granularity_with(self, custom: Granularity) -> Granularity {
        match self {
            InsightsPeriodKind::ThisWeek | InsightsPeriodKind::ThisMonth => Granularity::Day,
            InsightsPeriodKind::ThisYear => Granularity::Month,
            InsightsPeriodKind::Custom => custom,
        }
    }

    fn preset(self) -> PresetRange {
        match self {
            InsightsPeriodKind::ThisWeek => PresetRange::ThisWeek,
            InsightsPeriodKind::ThisMonth => PresetRange::ThisMonth,
            InsightsPeriodKind::ThisYear => PresetRange::ThisYear,
            InsightsPeriodKind::Custom => PresetRange::Custom,
        }
    }
}

/// Period selection on the insights screen.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct InsightsPeriod {
    #[serde(rename = "type")]
    pub kind: InsightsPeriodKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_range: Option<DateRange>,
}

impl InsightsPeriod {
    /// A custom period without a stored range falls back to this month.
    pub fn range(&self, now: NaiveDateTime) -> Option<DateRange> {
        if self.kind == InsightsPeriodKind::Custom {
            if let Some(range) = self.custom_range {
                return Some(range);
            }
        }
        self.kind
            .preset()
            .range(now)
            .or_else(|| PresetRange::ThisMonth.range(now))
    }
}

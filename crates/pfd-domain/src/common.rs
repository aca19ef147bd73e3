//! Shared traits, currency codes, and date ranges for the analytics domain.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Exposes a stable identifier for stored entities.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// ISO 4217 currency code. Codes are normalised to upper case, including
/// when read back from storage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(from = "String", into = "String")]
pub struct CurrencyCode(pub String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Looks the code up in the table of supported currencies.
    pub fn info(&self) -> Option<&'static CurrencyInfo> {
        SUPPORTED_CURRENCIES
            .iter()
            .find(|info| info.code == self.0.as_str())
    }

    pub fn is_supported(&self) -> bool {
        self.info().is_some()
    }

    /// Display symbol, falling back to the code itself for unknown currencies.
    pub fn symbol(&self) -> &str {
        self.info().map(|info| info.symbol).unwrap_or(self.as_str())
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new("USD")
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for CurrencyCode {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<CurrencyCode> for String {
    fn from(value: CurrencyCode) -> Self {
        value.0
    }
}

impl From<&str> for CurrencyCode {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyInfo {
    pub code: &'static str,
    pub symbol: &'static str,
    pub name: &'static str,
}

pub const SUPPORTED_CURRENCIES: &[CurrencyInfo] = &[
    CurrencyInfo { code: "USD", symbol: "$", name: "US Dollar" },
    CurrencyInfo { code: "EUR", symbol: "€", name: "Euro" },
    CurrencyInfo { code: "GBP", symbol: "£", name: "British Pound" },
    CurrencyInfo { code: "JPY", symbol: "¥", name: "Japanese Yen" },
    CurrencyInfo { code: "CAD", symbol: "$", name: "Canadian Dollar" },
    CurrencyInfo { code: "AUD", symbol: "$", name: "Australian Dollar" },
    CurrencyInfo { code: "CHF", symbol: "Fr", name: "Swiss Franc" },
    CurrencyInfo { code: "CNY", symbol: "¥", name: "Chinese Yuan" },
    CurrencyInfo { code: "INR", symbol: "₹", name: "Indian Rupee" },
    CurrencyInfo { code: "MXN", symbol: "$", name: "Mexican Peso" },
    CurrencyInfo { code: "BRL", symbol: "R$", name: "Brazilian Real" },
    CurrencyInfo { code: "KRW", symbol: "₩", name: "South Korean Won" },
    CurrencyInfo { code: "SGD", symbol: "$", name: "Singapore Dollar" },
    CurrencyInfo { code: "HKD", symbol: "$", name: "Hong Kong Dollar" },
    CurrencyInfo { code: "NZD", symbol: "$", name: "New Zealand Dollar" },
];

/// Closed interval of local date-times used by every period filter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateRange {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, DateRangeError> {
        if end < start {
            return Err(DateRangeError::InvalidRange);
        }
        Ok(Self { start, end })
    }

    /// Spans whole days: `start` at 00:00:00.000, `end` at 23:59:59.999.
    pub fn from_dates(start: NaiveDate, end: NaiveDate) -> Result<Self, DateRangeError> {
        Self::new(start_of_day(start), end_of_day(end))
    }

    /// Both bounds are inclusive.
    pub fn contains(&self, moment: NaiveDateTime) -> bool {
        moment >= self.start && moment <= self.end
    }
}

/// Midnight at the start of `date`.
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Last representable millisecond of `date`.
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    let last = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
    date.and_time(last)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Errors that can occur when constructing [`DateRange`] values.
pub enum DateRangeError {
    InvalidRange,
}

impl fmt::Display for DateRangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateRangeError::InvalidRange => f.write_str("date range end must not precede start"),
        }
    }
}

impl std::error::Error for DateRangeError {}

use chrono::NaiveDate;
use pfd_domain::CurrencyCode;

/// Formats currency amounts for presentation.
pub trait CurrencyFormatter: Send + Sync {
    fn format_amount(&self, amount: f64, currency: &CurrencyCode) -> String;
}

/// Formats dates for presentation.
pub trait DateFormatter: Send + Sync {
    fn format_date(&self, date: NaiveDate) -> String;
}

/// Symbol prefix and two decimals, e.g. `$12.50` or `-€3.00`. Codes
/// without a known symbol are written out followed by a space.
#[derive(Debug, Default, Clone, Copy)]
pub struct SymbolFormatter;

impl CurrencyFormatter for SymbolFormatter {
    fn format_amount(&self, amount: f64, currency: &CurrencyCode) -> String {
        let prefix = match currency.info() {
            Some(info) => info.symbol.to_string(),
            None => format!("{} ", currency.as_str()),
        };
        if amount < 0.0 {
            format!("-{prefix}{:.2}", amount.abs())
        } else {
            format!("{prefix}{amount:.2}")
        }
    }
}

/// "Mar 15, 2024".
#[derive(Debug, Default, Clone, Copy)]
pub struct ShortDateFormatter;

impl DateFormatter for ShortDateFormatter {
    fn format_date(&self, date: NaiveDate) -> String {
        date.format("%b %-d, %Y").to_string()
    }
}

pub fn format_currency(amount: f64, currency: &CurrencyCode) -> String {
    SymbolFormatter.format_amount(amount, currency)
}

pub fn format_date(date: NaiveDate) -> String {
    ShortDateFormatter.format_date(date)
}

pub fn format_percentage(value: f64) -> String {
    format!("{value:.1}%")
}

use std::{env, path::PathBuf};

use pfd_core::{AnalyticsOptions, MissingCategoryPolicy, TOP_TRANSACTIONS_LIMIT, TREND_MONTHS};
use pfd_domain::{BudgetThresholds, CurrencyCode, Granularity};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Overrides the default `~/.finance_core` base directory.
pub const BASE_DIR_ENV: &str = "FINANCE_CORE_HOME";
const BASE_DIR_NAME: &str = ".finance_core";
const SNAPSHOT_FILE: &str = "snapshot.json";

/// Stores user-configurable analytics preferences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default = "Config::default_base_currency")]
    pub base_currency: String,
    #[serde(default = "Config::default_locale")]
    pub locale: String,
    #[serde(default = "Config::default_trend_months")]
    pub trend_months: u32,
    #[serde(default = "Config::default_top_transactions_limit")]
    pub top_transactions_limit: usize,
    #[serde(default = "Config::default_budget_warning_threshold")]
    pub budget_warning_threshold: f64,
    #[serde(default = "Config::default_budget_over_threshold")]
    pub budget_over_threshold: f64,
    #[serde(default)]
    pub missing_category_policy: MissingCategoryPolicy,
    #[serde(default)]
    pub custom_period_granularity: Granularity,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Snapshot file read by the reporting CLI. Defaults to `<base>/snapshot.json`.
    pub snapshot_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_currency: Self::default_base_currency(),
            locale: Self::default_locale(),
            trend_months: Self::default_trend_months(),
            top_transactions_limit: Self::default_top_transactions_limit(),
            budget_warning_threshold: Self::default_budget_warning_threshold(),
            budget_over_threshold: Self::default_budget_over_threshold(),
            missing_category_policy: MissingCategoryPolicy::default(),
            custom_period_granularity: Granularity::default(),
            snapshot_path: None,
        }
    }
}

impl Config {
    pub fn default_base_currency() -> String {
        "USD".into()
    }

    pub fn default_locale() -> String {
        "en-US".into()
    }

    pub fn default_trend_months() -> u32 {
        TREND_MONTHS
    }

    pub fn default_top_transactions_limit() -> usize {
        TOP_TRANSACTIONS_LIMIT
    }

    pub fn default_budget_warning_threshold() -> f64 {
        BudgetThresholds::default().warning
    }

    pub fn default_budget_over_threshold() -> f64 {
        BudgetThresholds::default().over
    }

    pub fn currency(&self) -> CurrencyCode {
        CurrencyCode::new(self.base_currency.as_str())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_currency.trim().is_empty() {
            return Err(ConfigError::Invalid("base_currency must not be empty".into()));
        }
        if self.trend_months == 0 {
            return Err(ConfigError::Invalid("trend_months must be at least 1".into()));
        }
        if !(self.budget_warning_threshold.is_finite() && self.budget_over_threshold.is_finite()) {
            return Err(ConfigError::Invalid("budget thresholds must be finite".into()));
        }
        if self.budget_warning_threshold > self.budget_over_threshold {
            return Err(ConfigError::Invalid(format!(
                "budget_warning_threshold ({}) exceeds budget_over_threshold ({})",
                self.budget_warning_threshold, self.budget_over_threshold
            )));
        }
        Ok(())
    }

    pub fn analytics_options(&self) -> AnalyticsOptions {
        AnalyticsOptions {
            top_transactions_limit: self.top_transactions_limit,
            budget_thresholds: BudgetThresholds {
                warning: self.budget_warning_threshold,
                over: self.budget_over_threshold,
            },
            missing_category: self.missing_category_policy,
            custom_granularity: self.custom_period_granularity,
        }
    }

    pub fn resolve_snapshot_path(&self) -> PathBuf {
        if let Some(path) = &self.snapshot_path {
            return path.clone();
        }
        resolve_base_dir().join(SNAPSHOT_FILE)
    }
}

/// `$FINANCE_CORE_HOME` when set, otherwise `~/.finance_core`.
pub fn resolve_base_dir() -> PathBuf {
    if let Some(custom) = env::var_os(BASE_DIR_ENV).filter(|value| !value.is_empty()) {
        return PathBuf::from(custom);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(BASE_DIR_NAME)
}

use pfd_domain::{DateRange, Transaction, TransactionType};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::category_tree::CategoryTree;

/// Inclusive amount bounds; `None` leaves that side open.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct AmountRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl AmountRange {
    pub fn contains(&self, amount: f64) -> bool {
        self.min.map_or(true, |min| amount >= min) && self.max.map_or(true, |max| amount <= max)
    }
}

/// User-facing transaction list filter. Default values restrict nothing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
    #[serde(default)]
    pub categories: Vec<Uuid>,
    #[serde(default)]
    pub search_query: String,
    #[serde(default)]
    pub types: Vec<TransactionType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_range: Option<AmountRange>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl TransactionFilter {
    /// Applies period, category, search, types, amount, then tags.
    pub fn apply<'a, I>(&self, transactions: I, tree: &CategoryTree<'_>) -> Vec<&'a Transaction>
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let mut filtered: Vec<&'a Transaction> = match &self.date_range {
            Some(range) => super::by_period(transactions, range),
            None => transactions.into_iter().collect(),
        };
        filtered = super::by_category(filtered, &self.categories, tree);
        filtered = super::by_search(filtered, &self.search_query);
        filtered = super::by_types(filtered, &self.types);
        if let Some(range) = &self.amount_range {
            filtered = super::by_amount(filtered, range);
        }
        super::by_tags(filtered, &self.tags)
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

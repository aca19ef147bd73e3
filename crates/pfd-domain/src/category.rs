//! Domain types representing income and expense categories.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

pub const DEFAULT_CATEGORY_COLOR: &str = "#71717a";

/// Categorises transactions for breakdowns and budgeting. Categories form a
/// tree through `parent_id`; the tree is assumed to be acyclic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CategoryType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_limit: Option<f64>,
}

fn default_color() -> String {
    DEFAULT_CATEGORY_COLOR.to_string()
}

impl Category {
    pub fn new(name: impl Into<String>, kind: CategoryType) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
            icon: None,
            color: default_color(),
            parent_id: None,
            budget_limit: None,
        }
    }

    pub fn with_parent(mut self, parent_id: Uuid) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn with_budget_limit(mut self, limit: f64) -> Self {
        self.budget_limit = Some(limit);
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// The limit that budget tracking should use: only positive limits on
    /// expense categories count.
    pub fn effective_budget_limit(&self) -> Option<f64> {
        match (self.kind, self.budget_limit) {
            (CategoryType::Expense, Some(limit)) if limit > 0.0 => Some(limit),
            _ => None,
        }
    }
}

impl Identifiable for Category {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// Supported category types. Fixed at creation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum CategoryType {
    Income,
    Expense,
}

impl fmt::Display for CategoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CategoryType::Income => "Income",
            CategoryType::Expense => "Expense",
        };
        f.write_str(label)
    }
}

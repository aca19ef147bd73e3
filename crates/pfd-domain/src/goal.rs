//! Savings goals and their derived progress.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

/// A stored savings target. Status is never persisted; see
/// [`SavingsGoalProgress`] for the derived view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoal {
    pub id: Uuid,
    pub name: String,
    pub target_amount: f64,
    pub current_amount: f64,
    pub currency: CurrencyCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDateTime>,
}

impl SavingsGoal {
    pub fn new(
        name: impl Into<String>,
        target_amount: f64,
        currency: impl Into<CurrencyCode>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            target_amount,
            current_amount: 0.0,
            currency: currency.into(),
            deadline: None,
        }
    }

    pub fn with_current_amount(mut self, amount: f64) -> Self {
        self.current_amount = amount;
        self
    }

    pub fn with_deadline(mut self, deadline: NaiveDateTime) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

impl Identifiable for SavingsGoal {
    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum GoalStatus {
    NotStarted,
    InProgress,
    Completed,
    Overdue,
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            GoalStatus::NotStarted => "Not Started",
            GoalStatus::InProgress => "In Progress",
            GoalStatus::Completed => "Completed",
            GoalStatus::Overdue => "Overdue",
        };
        f.write_str(label)
    }
}

/// A goal together with the figures recomputed at read time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoalProgress {
    #[serde(flatten)]
    pub goal: SavingsGoal,
    pub percentage: f64,
    pub remaining: f64,
    pub status: GoalStatus,
}

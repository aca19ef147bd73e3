//! Domain models for recorded transactions.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

/// A single recorded money movement. Amounts are never negative; the
/// direction is implied by [`TransactionType`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub status: TransactionStatus,
    pub amount: f64,
    pub currency: CurrencyCode,
    pub date: NaiveDateTime,
    pub description: String,
    pub category_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transfer_to_account_id: Option<Uuid>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl Transaction {
    /// Creates a completed transaction. Negative amounts are clamped to zero.
    pub fn new(
        kind: TransactionType,
        amount: f64,
        currency: impl Into<CurrencyCode>,
        date: NaiveDateTime,
        description: impl Into<String>,
        category_id: Uuid,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            status: TransactionStatus::Completed,
            amount: amount.max(0.0),
            currency: currency.into(),
            date,
            description: description.into(),
            category_id,
            subcategory_id: None,
            account_id: None,
            transfer_to_account_id: None,
            metadata: Metadata::default(),
        }
    }

    pub fn with_status(mut self, status: TransactionStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_subcategory(mut self, subcategory_id: Uuid) -> Self {
        self.subcategory_id = Some(subcategory_id);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.metadata.notes = Some(notes.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.metadata.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_completed(&self) -> bool {
        self.status == TransactionStatus::Completed
    }

    /// Signed contribution to a running balance: income and refunds add,
    /// expenses subtract, everything else is neutral.
    pub fn balance_effect(&self) -> f64 {
        match self.kind {
            TransactionType::Income | TransactionType::Refund => self.amount,
            TransactionType::Expense => -self.amount,
            TransactionType::Transfer | TransactionType::Recurring => 0.0,
        }
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// Optional free-form details attached to a transaction.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum TransactionType {
    Income,
    Expense,
    Transfer,
    Refund,
    Recurring,
}

impl TransactionType {
    pub const ALL: [TransactionType; 5] = [
        TransactionType::Income,
        TransactionType::Expense,
        TransactionType::Transfer,
        TransactionType::Refund,
        TransactionType::Recurring,
    ];

    /// Types that participate in balance and summary arithmetic.
    pub const MONETARY: [TransactionType; 3] = [
        TransactionType::Income,
        TransactionType::Expense,
        TransactionType::Refund,
    ];

    pub fn is_monetary(self) -> bool {
        Self::MONETARY.contains(&self)
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionType::Income => "Income",
            TransactionType::Expense => "Expense",
            TransactionType::Transfer => "Transfer",
            TransactionType::Refund => "Refund",
            TransactionType::Recurring => "Recurring",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
/// Enumerates the lifecycle state of a transaction.
pub enum TransactionStatus {
    Pending,
    Completed,
    Cancelled,
    Failed,
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionStatus::Pending => "Pending",
            TransactionStatus::Completed => "Completed",
            TransactionStatus::Cancelled => "Cancelled",
            TransactionStatus::Failed => "Failed",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn serializes_with_ui_field_names() {
        let txn = Transaction::new(
            TransactionType::Refund,
            12.5,
            "usd",
            noon(),
            "Returned shoes",
            Uuid::nil(),
        )
        .with_tags(["shoes"]);
        let json = serde_json::to_value(&txn).expect("serialize");
        assert_eq!(json["type"], "refund");
        assert_eq!(json["status"], "completed");
        assert_eq!(json["currency"], "USD");
        assert_eq!(json["categoryId"], Uuid::nil().to_string());
        assert_eq!(json["metadata"]["tags"][0], "shoes");
        assert!(json.get("subcategoryId").is_none());
    }

    #[test]
    fn negative_amounts_are_clamped() {
        let txn = Transaction::new(
            TransactionType::Expense,
            -4.0,
            "USD",
            noon(),
            "Typo",
            Uuid::nil(),
        );
        assert_eq!(txn.amount, 0.0);
    }

    #[test]
    fn balance_effect_follows_type() {
        let base = Transaction::new(TransactionType::Income, 10.0, "USD", noon(), "", Uuid::nil());
        let mut expense = base.clone();
        expense.kind = TransactionType::Expense;
        let mut transfer = base.clone();
        transfer.kind = TransactionType::Transfer;
        assert_eq!(base.balance_effect(), 10.0);
        assert_eq!(expense.balance_effect(), -10.0);
        assert_eq!(transfer.balance_effect(), 0.0);
    }
}

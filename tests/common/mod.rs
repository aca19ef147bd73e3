use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};
use finance_core::analytics::{FixedClock, Snapshot, SnapshotStorage};
use finance_core::domain::{Category, CategoryType, SavingsGoal, Transaction, TransactionType};
use finance_core::storage::JsonSnapshotStorage;
use tempfile::TempDir;

pub fn at(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(9, 0, 0))
        .expect("valid date")
}

/// Frozen on 20 March 2024.
pub fn march_clock() -> FixedClock {
    FixedClock::at_noon(2024, 3, 20).expect("valid clock")
}

/// February and March 2024 of a household with one salary, rent and groceries.
pub fn household_snapshot() -> Snapshot {
    let salary = Category::new("Salary", CategoryType::Income);
    let housing = Category::new("Housing", CategoryType::Expense).with_budget_limit(1000.0);
    let food = Category::new("Food", CategoryType::Expense).with_budget_limit(250.0);

    let txn = |kind, amount, date, description: &str, category: &Category| {
        Transaction::new(kind, amount, "USD", date, description, category.id)
    };
    let transactions = vec![
        txn(TransactionType::Income, 3000.0, at(2024, 2, 1), "February pay", &salary),
        txn(TransactionType::Expense, 900.0, at(2024, 2, 3), "Rent", &housing),
        txn(TransactionType::Expense, 300.0, at(2024, 2, 12), "Groceries", &food),
        txn(TransactionType::Income, 3000.0, at(2024, 3, 1), "March pay", &salary),
        txn(TransactionType::Expense, 900.0, at(2024, 3, 3), "Rent", &housing),
        txn(TransactionType::Expense, 110.0, at(2024, 3, 10), "Groceries", &food),
    ];

    let goals = vec![
        SavingsGoal::new("Emergency fund", 1000.0, "USD").with_current_amount(1000.0),
        SavingsGoal::new("Holiday", 2000.0, "USD")
            .with_current_amount(500.0)
            .with_deadline(at(2024, 3, 25)),
    ];

    Snapshot::new(transactions, vec![salary, housing, food], goals)
}

/// Writes `snapshot` into a fresh temp dir; keep the guard alive for the test.
pub fn write_snapshot(snapshot: &Snapshot) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("snapshot.json");
    JsonSnapshotStorage::new(path.clone())
        .save(snapshot)
        .expect("save snapshot");
    (dir, path)
}

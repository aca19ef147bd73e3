//! Transaction filter primitives.
//!
//! Every primitive is a stable subset operation: it keeps the input order and
//! never clones a transaction. Empty selections (no categories, no types, no
//! tags, blank search) are pass-through values meaning "no restriction".

mod compose;

pub use compose::{AmountRange, TransactionFilter};

use pfd_domain::{CurrencyCode, DateRange, Transaction, TransactionStatus, TransactionType};
use uuid::Uuid;

use crate::category_tree::CategoryTree;

/// Keeps transactions dated inside the closed interval.
pub fn by_period<'a, I>(transactions: I, range: &DateRange) -> Vec<&'a Transaction>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions
        .into_iter()
        .filter(|txn| range.contains(txn.date))
        .collect()
}

/// Keeps transactions whose category is one of `selected` or a descendant of one.
pub fn by_category<'a, I>(
    transactions: I,
    selected: &[Uuid],
    tree: &CategoryTree<'_>,
) -> Vec<&'a Transaction>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    if selected.is_empty() {
        return transactions.into_iter().collect();
    }
    let allowed = tree.expand(selected);
    transactions
        .into_iter()
        .filter(|txn| allowed.contains(&txn.category_id))
        .collect()
}

/// Case-insensitive substring match on description or notes.
pub fn by_search<'a, I>(transactions: I, query: &str) -> Vec<&'a Transaction>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    if query.trim().is_empty() {
        return transactions.into_iter().collect();
    }
    let needle = query.to_lowercase();
    transactions
        .into_iter()
        .filter(|txn| {
            txn.description.to_lowercase().contains(&needle)
                || txn
                    .metadata
                    .notes
                    .as_deref()
                    .is_some_and(|notes| notes.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Inclusive bounds; an absent bound is unbounded on that side.
pub fn by_amount<'a, I>(transactions: I, range: &AmountRange) -> Vec<&'a Transaction>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions
        .into_iter()
        .filter(|txn| range.contains(txn.amount))
        .collect()
}

/// Keeps transactions carrying at least one of `tags`.
pub fn by_tags<'a, I>(transactions: I, tags: &[String]) -> Vec<&'a Transaction>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    if tags.is_empty() {
        return transactions.into_iter().collect();
    }
    transactions
        .into_iter()
        .filter(|txn| txn.metadata.tags.iter().any(|tag| tags.contains(tag)))
        .collect()
}

pub fn by_status<'a, I>(transactions: I, status: TransactionStatus) -> Vec<&'a Transaction>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions
        .into_iter()
        .filter(|txn| txn.status == status)
        .collect()
}

pub fn by_types<'a, I>(transactions: I, types: &[TransactionType]) -> Vec<&'a Transaction>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    if types.is_empty() {
        return transactions.into_iter().collect();
    }
    transactions
        .into_iter()
        .filter(|txn| types.contains(&txn.kind))
        .collect()
}

/// Keeps monetary transactions (income, expense, refund) in `currency`.
/// The type whitelist is fixed and never pass-through.
pub fn by_type_and_currency<'a, I>(transactions: I, currency: &CurrencyCode) -> Vec<&'a Transaction>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions
        .into_iter()
        .filter(|txn| &txn.currency == currency && txn.kind.is_monetary())
        .collect()
}

/// Completed, monetary, in `currency`: the set every monetary aggregate reads.
pub fn monetary<'a, I>(transactions: I, currency: &CurrencyCode) -> Vec<&'a Transaction>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    by_type_and_currency(by_status(transactions, TransactionStatus::Completed), currency)
}

pub fn sum_by_type<'a, I>(transactions: I, kind: TransactionType) -> f64
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions
        .into_iter()
        .filter(|txn| txn.kind == kind)
        .map(|txn| txn.amount)
        .fold(0.0, |acc, amount| acc + amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use pfd_domain::{Category, CategoryType};

    fn at(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    fn txn(kind: TransactionType, amount: f64, day: u32, description: &str) -> Transaction {
        Transaction::new(kind, amount, "USD", at(day), description, Uuid::nil())
    }

    fn ids(items: &[&Transaction]) -> Vec<Uuid> {
        items.iter().map(|txn| txn.id).collect()
    }

    #[test]
    fn period_filter_is_inclusive_and_stable() {
        let txns = vec![
            txn(TransactionType::Expense, 1.0, 5, "a"),
            txn(TransactionType::Expense, 2.0, 1, "b"),
            txn(TransactionType::Expense, 3.0, 20, "c"),
            txn(TransactionType::Expense, 4.0, 10, "d"),
        ];
        let range = DateRange::from_dates(
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
        )
        .unwrap();
        let kept = by_period(&txns, &range);
        assert_eq!(ids(&kept), vec![txns[0].id, txns[1].id, txns[3].id]);
    }

    #[test]
    fn empty_parameters_pass_everything_through() {
        let txns = vec![
            txn(TransactionType::Income, 1.0, 1, "salary"),
            txn(TransactionType::Transfer, 2.0, 2, "move"),
        ];
        let categories: Vec<Category> = Vec::new();
        let tree = CategoryTree::build(&categories);
        let all = ids(&txns.iter().collect::<Vec<_>>());

        assert_eq!(ids(&by_category(&txns, &[], &tree)), all);
        assert_eq!(ids(&by_types(&txns, &[])), all);
        assert_eq!(ids(&by_search(&txns, "")), all);
        assert_eq!(ids(&by_search(&txns, "   ")), all);
        assert_eq!(ids(&by_tags(&txns, &[])), all);
        assert_eq!(ids(&by_amount(&txns, &AmountRange::default())), all);
    }

    #[test]
    fn category_filter_expands_descendants() {
        let parent = Category::new("Food", CategoryType::Expense);
        let child = Category::new("Groceries", CategoryType::Expense).with_parent(parent.id);
        let other = Category::new("Rent", CategoryType::Expense);
        let mut in_child = txn(TransactionType::Expense, 10.0, 3, "market");
        in_child.category_id = child.id;
        let mut in_other = txn(TransactionType::Expense, 10.0, 3, "landlord");
        in_other.category_id = other.id;
        let categories = vec![parent.clone(), child, other];
        let tree = CategoryTree::build(&categories);
        let txns = vec![in_child.clone(), in_other];

        let kept = by_category(&txns, &[parent.id], &tree);
        assert_eq!(ids(&kept), vec![in_child.id]);
    }

    #[test]
    fn search_matches_description_or_notes_case_insensitively() {
        let txns = vec![
            txn(TransactionType::Expense, 1.0, 1, "Coffee Shop"),
            txn(TransactionType::Expense, 1.0, 1, "Lunch").with_notes("with COFFEE"),
            txn(TransactionType::Expense, 1.0, 1, "Tea"),
        ];
        let kept = by_search(&txns, "coffee");
        assert_eq!(ids(&kept), vec![txns[0].id, txns[1].id]);
    }

    #[test]
    fn amount_bounds_are_inclusive_and_optional() {
        let txns = vec![
            txn(TransactionType::Expense, 5.0, 1, "a"),
            txn(TransactionType::Expense, 10.0, 1, "b"),
            txn(TransactionType::Expense, 50.0, 1, "c"),
        ];
        let min_only = AmountRange {
            min: Some(10.0),
            max: None,
        };
        let both = AmountRange {
            min: Some(5.0),
            max: Some(10.0),
        };
        assert_eq!(ids(&by_amount(&txns, &min_only)), vec![txns[1].id, txns[2].id]);
        assert_eq!(ids(&by_amount(&txns, &both)), vec![txns[0].id, txns[1].id]);
    }

    #[test]
    fn tags_match_on_intersection() {
        let txns = vec![
            txn(TransactionType::Expense, 1.0, 1, "a").with_tags(["trip", "food"]),
            txn(TransactionType::Expense, 1.0, 1, "b").with_tags(["work"]),
            txn(TransactionType::Expense, 1.0, 1, "c"),
        ];
        let kept = by_tags(&txns, &["food".to_string(), "gift".to_string()]);
        assert_eq!(ids(&kept), vec![txns[0].id]);
    }

    #[test]
    fn currency_filter_restricts_to_monetary_types() {
        let mut euro = txn(TransactionType::Income, 1.0, 1, "eur");
        euro.currency = CurrencyCode::new("EUR");
        let txns = vec![
            txn(TransactionType::Income, 1.0, 1, "in"),
            txn(TransactionType::Transfer, 1.0, 1, "move"),
            txn(TransactionType::Refund, 1.0, 1, "back"),
            txn(TransactionType::Recurring, 1.0, 1, "sub"),
            euro,
        ];
        let kept = by_type_and_currency(&txns, &CurrencyCode::new("USD"));
        assert_eq!(ids(&kept), vec![txns[0].id, txns[2].id]);
    }

    #[test]
    fn monetary_requires_completed_status() {
        let txns = vec![
            txn(TransactionType::Expense, 1.0, 1, "done"),
            txn(TransactionType::Expense, 1.0, 1, "later").with_status(TransactionStatus::Pending),
            txn(TransactionType::Expense, 1.0, 1, "nope").with_status(TransactionStatus::Failed),
        ];
        let kept = monetary(&txns, &CurrencyCode::new("USD"));
        assert_eq!(ids(&kept), vec![txns[0].id]);
    }

    #[test]
    fn sum_by_type_ignores_other_types() {
        let txns = vec![
            txn(TransactionType::Income, 100.0, 1, "a"),
            txn(TransactionType::Income, 50.0, 1, "b"),
            txn(TransactionType::Expense, 30.0, 1, "c"),
        ];
        assert_eq!(sum_by_type(&txns, TransactionType::Income), 150.0);
        assert_eq!(sum_by_type(&txns, TransactionType::Refund), 0.0);
    }
}

use std::collections::HashMap;

use pfd_domain::{
    CategoryBreakdown, SubcategoryBreakdown, TopTransaction, Transaction, TransactionType,
    DEFAULT_CATEGORY_COLOR,
};
use tracing::debug;
use uuid::Uuid;

use crate::{category_tree::CategoryTree, options::MissingCategoryPolicy};

pub const UNCATEGORIZED_NAME: &str = "Uncategorized";
pub const UNKNOWN_CATEGORY_NAME: &str = "Unknown Category";
pub const UNKNOWN_SUBCATEGORY_NAME: &str = "Unknown Subcategory";

/// Running totals for one group, kept in first-seen order.
#[derive(Debug, Clone, Copy)]
struct Bucket {
    key: Uuid,
    parent: Uuid,
    amount: f64,
    count: usize,
}

#[derive(Default)]
struct Grouping {
    buckets: Vec<Bucket>,
    index: HashMap<Uuid, usize>,
}

impl Grouping {
    fn add(&mut self, key: Uuid, parent: Uuid, amount: f64) {
        match self.index.get(&key) {
            Some(&idx) => {
                let bucket = &mut self.buckets[idx];
                bucket.amount += amount;
                bucket.count += 1;
            }
            None => {
                self.index.insert(key, self.buckets.len());
                self.buckets.push(Bucket {
                    key,
                    parent,
                    amount,
                    count: 1,
                });
            }
        }
    }
}

fn percentage_of(amount: f64, total: f64) -> f64 {
    if total > 0.0 {
        (amount / total) * 100.0
    } else {
        0.0
    }
}

pub struct BreakdownService;

impl BreakdownService {
    /// Groups transactions of `kind` by category, largest amount first.
    ///
    /// Percentages are relative to the total of every transaction of `kind`,
    /// including ones whose category does not resolve; under
    /// [`MissingCategoryPolicy::Drop`] those are left out of the groups, so
    /// the percentages can sum to less than 100.
    pub fn by_category<'a, I>(
        transactions: I,
        tree: &CategoryTree<'_>,
        kind: TransactionType,
        policy: MissingCategoryPolicy,
    ) -> Vec<CategoryBreakdown>
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let mut grouping = Grouping::default();
        let mut total = 0.0;
        for txn in transactions.into_iter().filter(|txn| txn.kind == kind) {
            total += txn.amount;
            if tree.contains(txn.category_id) {
                grouping.add(txn.category_id, Uuid::nil(), txn.amount);
            } else if policy == MissingCategoryPolicy::Uncategorized {
                grouping.add(Uuid::nil(), Uuid::nil(), txn.amount);
            } else {
                debug!(
                    transaction = %txn.id,
                    category = %txn.category_id,
                    "dropping transaction with unknown category from breakdown"
                );
            }
        }

        let mut breakdown: Vec<CategoryBreakdown> = grouping
            .buckets
            .into_iter()
            .map(|bucket| {
                let (name, color) = match tree.get(bucket.key) {
                    Some(category) => (category.name.clone(), category.color.clone()),
                    None => (
                        UNCATEGORIZED_NAME.to_string(),
                        DEFAULT_CATEGORY_COLOR.to_string(),
                    ),
                };
                CategoryBreakdown {
                    category_id: bucket.key,
                    category_name: name,
                    amount: bucket.amount,
                    percentage: percentage_of(bucket.amount, total),
                    transaction_count: bucket.count,
                    color,
                }
            })
            .collect();
        breakdown.sort_by(|a, b| b.amount.total_cmp(&a.amount));
        breakdown
    }

    /// Groups transactions of `kind` that carry a subcategory. The parent is
    /// taken from the first transaction seen for each subcategory.
    pub fn by_subcategory<'a, I>(
        transactions: I,
        tree: &CategoryTree<'_>,
        kind: TransactionType,
        policy: MissingCategoryPolicy,
    ) -> Vec<SubcategoryBreakdown>
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let mut grouping = Grouping::default();
        let mut total = 0.0;
        for txn in transactions.into_iter().filter(|txn| txn.kind == kind) {
            let Some(subcategory) = txn.subcategory_id else {
                continue;
            };
            total += txn.amount;
            grouping.add(subcategory, txn.category_id, txn.amount);
        }

        let mut breakdown: Vec<SubcategoryBreakdown> = grouping
            .buckets
            .into_iter()
            .filter_map(|bucket| {
                let (parent_id, parent_name, subcategory_name) = match tree.get(bucket.parent) {
                    Some(parent) => (
                        parent.id,
                        parent.name.clone(),
                        tree.child_of(parent.id, bucket.key)
                            .map(|child| child.name.clone())
                            .unwrap_or_else(|| UNKNOWN_SUBCATEGORY_NAME.to_string()),
                    ),
                    None if policy == MissingCategoryPolicy::Uncategorized => (
                        Uuid::nil(),
                        UNCATEGORIZED_NAME.to_string(),
                        UNKNOWN_SUBCATEGORY_NAME.to_string(),
                    ),
                    None => {
                        debug!(
                            subcategory = %bucket.key,
                            parent = %bucket.parent,
                            "dropping subcategory group with unknown parent"
                        );
                        return None;
                    }
                };
                Some(SubcategoryBreakdown {
                    subcategory_id: bucket.key,
                    subcategory_name,
                    parent_id,
                    parent_name,
                    amount: bucket.amount,
                    percentage: percentage_of(bucket.amount, total),
                    transaction_count: bucket.count,
                })
            })
            .collect();
        breakdown.sort_by(|a, b| b.amount.total_cmp(&a.amount));
        breakdown
    }

    /// The `limit` largest transactions of `kind`; ties keep input order.
    pub fn top_transactions<'a, I>(
        transactions: I,
        tree: &CategoryTree<'_>,
        kind: TransactionType,
        limit: usize,
    ) -> Vec<TopTransaction>
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let mut matching: Vec<&Transaction> = transactions
            .into_iter()
            .filter(|txn| txn.kind == kind)
            .collect();
        matching.sort_by(|a, b| b.amount.total_cmp(&a.amount));
        matching
            .into_iter()
            .take(limit)
            .map(|txn| TopTransaction {
                id: txn.id,
                description: txn.description.clone(),
                amount: txn.amount,
                category_id: txn.category_id,
                category_name: tree
                    .get(txn.category_id)
                    .map(|category| category.name.clone())
                    .unwrap_or_else(|| UNKNOWN_CATEGORY_NAME.to_string()),
                date: txn.date,
            })
            .collect()
    }
}

use std::{collections::HashSet, path::Path};

use pfd_domain::{Category, SavingsGoal, Transaction};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{CoreError, CoreResult};

pub const CURRENT_SCHEMA_VERSION: u32 = 1;

fn default_schema_version() -> u32 {
    0
}

/// Everything the analytics engine reads, as handed over by the storage
/// collaborator in one piece.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub savings_goals: Vec<SavingsGoal>,
    /// Opaque application settings, carried through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Value>,
}

impl Snapshot {
    pub fn new(
        transactions: Vec<Transaction>,
        categories: Vec<Category>,
        savings_goals: Vec<SavingsGoal>,
    ) -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            transactions,
            categories,
            savings_goals,
            settings: None,
        }
    }

    /// Brings an older snapshot up to the current schema in memory; newer
    /// schemas are rejected.
    pub fn migrate(&mut self) -> CoreResult<()> {
        if self.schema_version > CURRENT_SCHEMA_VERSION {
            return Err(CoreError::Validation(format!(
                "snapshot schema {} is newer than supported schema {}",
                self.schema_version, CURRENT_SCHEMA_VERSION
            )));
        }
        self.schema_version = CURRENT_SCHEMA_VERSION;
        Ok(())
    }
}

/// Abstraction over persistence backends holding a snapshot.
pub trait SnapshotStorage: Send + Sync {
    fn load(&self) -> CoreResult<Snapshot>;
    fn save(&self, snapshot: &Snapshot) -> CoreResult<()>;
    fn export_to_path(&self, snapshot: &Snapshot, path: &Path) -> CoreResult<()>;
    fn import_from_path(&self, path: &Path) -> CoreResult<Snapshot>;
}

/// Lists references that do not resolve inside the snapshot.
pub fn snapshot_warnings(snapshot: &Snapshot) -> Vec<String> {
    let category_ids: HashSet<_> = snapshot.categories.iter().map(|c| c.id).collect();
    let mut warnings = Vec::new();

    for txn in &snapshot.transactions {
        if !category_ids.contains(&txn.category_id) {
            warnings.push(format!(
                "transaction {} references missing category {}",
                txn.id, txn.category_id
            ));
        }
        if let Some(subcategory) = txn.subcategory_id {
            if !category_ids.contains(&subcategory) {
                warnings.push(format!(
                    "transaction {} references missing subcategory {}",
                    txn.id, subcategory
                ));
            }
        }
    }

    for category in &snapshot.categories {
        if let Some(parent) = category.parent_id {
            if !category_ids.contains(&parent) {
                warnings.push(format!(
                    "category {} references missing parent {}",
                    category.name, parent
                ));
            }
        }
    }

    warnings
}

//! Arena-backed category hierarchy built once from the flat parent-id list.

use std::collections::{HashMap, HashSet};

use pfd_domain::{Category, CategoryType, Identifiable, Transaction};
use uuid::Uuid;

/// Read-only index over a category slice: parent/child links are resolved
/// once so subtree walks never rescan the full list.
#[derive(Debug, Clone)]
pub struct CategoryTree<'a> {
    nodes: Vec<&'a Category>,
    index: HashMap<Uuid, usize>,
    children: Vec<Vec<usize>>,
    roots: Vec<usize>,
}

/// Owned nested view of the hierarchy, for display.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryNode {
    pub category: Category,
    pub children: Vec<CategoryNode>,
}

impl<'a> CategoryTree<'a> {
    pub fn build(categories: &'a [Category]) -> Self {
        let mut nodes = Vec::with_capacity(categories.len());
        let mut index = HashMap::with_capacity(categories.len());
        for category in categories {
            if index.contains_key(&category.id()) {
                continue;
            }
            index.insert(category.id(), nodes.len());
            nodes.push(category);
        }

        let mut children = vec![Vec::new(); nodes.len()];
        let mut roots = Vec::new();
        for (idx, category) in nodes.iter().enumerate() {
            match category.parent_id.and_then(|parent| index.get(&parent)) {
                Some(&parent_idx) if parent_idx != idx => children[parent_idx].push(idx),
                _ => roots.push(idx),
            }
        }

        Self {
            nodes,
            index,
            children,
            roots,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&'a Category> {
        self.index.get(&id).map(|&idx| self.nodes[idx])
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.index.contains_key(&id)
    }

    pub fn roots(&self) -> Vec<&'a Category> {
        self.roots.iter().map(|&idx| self.nodes[idx]).collect()
    }

    pub fn children_of(&self, id: Uuid) -> Vec<&'a Category> {
        self.index
            .get(&id)
            .map(|&idx| self.children[idx].iter().map(|&c| self.nodes[c]).collect())
            .unwrap_or_default()
    }

    /// Returns `child_id` only when it is a direct child of `parent_id`.
    pub fn child_of(&self, parent_id: Uuid, child_id: Uuid) -> Option<&'a Category> {
        let parent_idx = *self.index.get(&parent_id)?;
        self.children[parent_idx]
            .iter()
            .map(|&idx| self.nodes[idx])
            .find(|category| category.id == child_id)
    }

    /// `id` followed by every descendant, depth first. Unknown ids still
    /// yield themselves so a filter on them matches exactly that id.
    pub fn subtree_ids(&self, id: Uuid) -> Vec<Uuid> {
        let mut ids = vec![id];
        let Some(&start) = self.index.get(&id) else {
            return ids;
        };
        let mut visited = HashSet::from([start]);
        let mut stack: Vec<usize> = self.children[start].iter().rev().copied().collect();
        while let Some(idx) = stack.pop() {
            if !visited.insert(idx) {
                continue;
            }
            ids.push(self.nodes[idx].id);
            stack.extend(self.children[idx].iter().rev().copied());
        }
        ids
    }

    pub fn descendant_ids(&self, id: Uuid) -> Vec<Uuid> {
        self.subtree_ids(id).into_iter().skip(1).collect()
    }

    /// Union of the subtrees of every selected id.
    pub fn expand(&self, selected: &[Uuid]) -> HashSet<Uuid> {
        selected
            .iter()
            .flat_map(|&id| self.subtree_ids(id))
            .collect()
    }

    pub fn nested(&self) -> Vec<CategoryNode> {
        let mut visited = HashSet::new();
        self.roots
            .iter()
            .map(|&idx| self.node_at(idx, &mut visited))
            .collect()
    }

    fn node_at(&self, idx: usize, visited: &mut HashSet<usize>) -> CategoryNode {
        visited.insert(idx);
        let children = self.children[idx]
            .iter()
            .filter(|&&child| !visited.contains(&child))
            .copied()
            .collect::<Vec<_>>()
            .into_iter()
            .map(|child| self.node_at(child, visited))
            .collect();
        CategoryNode {
            category: self.nodes[idx].clone(),
            children,
        }
    }

    /// Transactions referencing `id` as either category or subcategory.
    pub fn transaction_count(&self, id: Uuid, transactions: &[Transaction]) -> usize {
        transactions
            .iter()
            .filter(|txn| txn.category_id == id || txn.subcategory_id == Some(id))
            .count()
    }

    /// Like [`Self::transaction_count`], summed over the whole subtree.
    pub fn subtree_transaction_count(&self, id: Uuid, transactions: &[Transaction]) -> usize {
        self.subtree_ids(id)
            .into_iter()
            .map(|member| self.transaction_count(member, transactions))
            .sum()
    }

    pub fn find_by_name_and_kind(&self, name: &str, kind: CategoryType) -> Option<&'a Category> {
        self.nodes
            .iter()
            .copied()
            .find(|category| category.kind == kind && category.name == name)
    }

    /// The fallback category new entries land in ("Other Income" / "Other Expenses").
    pub fn default_for(&self, kind: CategoryType) -> Option<&'a Category> {
        let name = match kind {
            CategoryType::Income => "Other Income",
            CategoryType::Expense => "Other Expenses",
        };
        self.find_by_name_and_kind(name, kind)
    }
}

//! Chart-of-accounts hierarchy
//!
//! The account tree is self-referential through `parent_id`. Rather than
//! traversing live parent/child references, the hierarchy is materialized
//! once per query as a flat map plus an adjacency index, which keeps cycle
//! handling in one place.

use std::collections::{HashMap, HashSet};

use crate::types::*;

/// Adjacency view over a flat account collection
#[derive(Debug, Clone)]
pub struct AccountHierarchy {
    by_id: HashMap<String, Account>,
    children: HashMap<String, Vec<String>>,
    roots: Vec<String>,
}

impl AccountHierarchy {
    /// Build the hierarchy from a flat account list. Accounts whose parent
    /// id does not resolve are treated as roots.
    pub fn build(accounts: &[Account]) -> Self {
        let by_id: HashMap<String, Account> = accounts
            .iter()
            .map(|account| (account.id.clone(), account.clone()))
            .collect();

        let mut children: HashMap<String, Vec<String>> = HashMap::new();
        let mut roots = Vec::new();
        for account in accounts {
            match account.parent_id.as_ref().filter(|p| by_id.contains_key(*p)) {
                Some(parent_id) => children
                    .entry(parent_id.clone())
                    .or_default()
                    .push(account.id.clone()),
                None => roots.push(account.id.clone()),
            }
        }
        for ids in children.values_mut() {
            ids.sort();
        }
        roots.sort();

        Self {
            by_id,
            children,
            roots,
        }
    }

    /// Get an account by id
    pub fn get(&self, account_id: &str) -> Option<&Account> {
        self.by_id.get(account_id)
    }

    /// Ids of the top-level accounts
    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    /// Direct children of an account
    pub fn children(&self, account_id: &str) -> Vec<&Account> {
        self.children
            .get(account_id)
            .map(|ids| ids.iter().filter_map(|id| self.by_id.get(id)).collect())
            .unwrap_or_default()
    }

    /// Full path from the root down to the given account. A parent chain
    /// that loops back on itself is reported as an error instead of
    /// spinning forever.
    pub fn path_to(&self, account_id: &str) -> FinanceResult<Vec<&Account>> {
        let mut path = Vec::new();
        let mut seen = HashSet::new();
        let mut current = Some(account_id.to_string());

        while let Some(id) = current {
            if !seen.insert(id.clone()) {
                return Err(FinanceError::Storage(format!(
                    "account hierarchy cycle at '{id}'"
                )));
            }
            let account = self
                .by_id
                .get(&id)
                .ok_or_else(|| FinanceError::AccountNotFound(id.clone()))?;
            current = account
                .parent_id
                .as_ref()
                .filter(|p| self.by_id.contains_key(*p))
                .cloned();
            path.insert(0, account);
        }

        Ok(path)
    }
}

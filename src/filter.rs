//! Filtering applied to the flat account list before the tree is built
//!
//! A kept account whose parent was filtered out has a dangling parent id and
//! therefore shows up as a root of the filtered tree.

use serde::{Deserialize, Serialize};

use crate::collation::CodeOrdering;
use crate::entity::account::{self, AccountKind};

/// Search box, kind select and "analytic only" toggle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountFilter {
    pub search: Option<String>,
    pub kind: Option<AccountKind>,
    pub leaf_only: bool,
}

impl AccountFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn kind(mut self, kind: AccountKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn leaf_only(mut self, leaf_only: bool) -> Self {
        self.leaf_only = leaf_only;
        self
    }

    /// Case-insensitive substring match on code or name; blank terms match everything
    pub fn matches(&self, account: &account::Model) -> bool {
        if self.leaf_only && !account.is_leaf {
            return false;
        }
        if let Some(kind) = self.kind {
            if account.kind != kind {
                return false;
            }
        }
        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                account.code.to_lowercase().contains(&term)
                    || account.name.to_lowercase().contains(&term)
            }
        }
    }

    /// Keeps matching accounts, preserving input order
    pub fn apply<'a>(&self, accounts: &'a [account::Model]) -> Vec<&'a account::Model> {
        accounts.iter().filter(|a| self.matches(a)).collect()
    }
}

/// Select option for a posting target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingOption {
    pub id: String,
    pub code: String,
    pub label: String,
}

/// Leaf accounts only, ordered by code, labelled "code - name"
pub fn posting_targets(
    accounts: &[account::Model],
    ordering: &dyn CodeOrdering,
) -> Vec<PostingOption> {
    let mut leaves: Vec<&account::Model> = accounts.iter().filter(|a| a.is_leaf).collect();
    leaves.sort_by(|a, b| ordering.compare(&a.code, &b.code));
    leaves
        .into_iter()
        .map(|a| PostingOption {
            id: a.id.clone(),
            code: a.code.clone(),
            label: format!("{} - {}", a.code, a.name),
        })
        .collect()
}

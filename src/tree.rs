//! Chart of accounts tree
//!
//! Turns the flat account list returned by the backend into an ordered forest.
//! Construction is two passes over the input: index every account by id, then
//! attach each account to its parent (or to the roots when the parent cannot
//! be resolved). Siblings are then sorted recursively with the configured
//! [`CodeOrdering`].
//!
//! Nodes borrow the input accounts; nothing here mutates them.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::collation::{CodeOrdering, LocaleCollation};
use crate::entity::account;
use crate::error::TreeError;

/// What to do when two input accounts share an id
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Later records shadow earlier ones
    #[default]
    KeepLast,
    /// The first record wins, later ones are dropped
    KeepFirst,
    /// Fail with [`TreeError::DuplicateId`]
    Reject,
}

/// One account and its ordered children
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountNode<'a> {
    #[serde(flatten)]
    pub account: &'a account::Model,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<AccountNode<'a>>,
}

impl<'a> AccountNode<'a> {
    /// Number of nodes in this subtree, including self
    pub fn len(&self) -> usize {
        self.walk().count()
    }

    /// Depth of the deepest descendant, 0 for a node without children
    pub fn height(&self) -> usize {
        self.walk().map(|(depth, _)| depth).max().unwrap_or(0)
    }

    /// Pre-order walk of this subtree, self at depth 0
    pub fn walk(&self) -> Walk<'_, 'a> {
        Walk {
            stack: vec![(0, self)],
        }
    }
}

// Unlinks descendants one level at a time so long chains do not recurse on drop
impl Drop for AccountNode<'_> {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

/// Ordered collection of account trees
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Forest<'a> {
    roots: Vec<AccountNode<'a>>,
}

impl<'a> Forest<'a> {
    pub fn roots(&self) -> &[AccountNode<'a>] {
        &self.roots
    }

    pub fn into_roots(self) -> Vec<AccountNode<'a>> {
        self.roots
    }

    /// Total number of reachable nodes
    pub fn len(&self) -> usize {
        self.walk().count()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Deepest level in the forest (roots are level 0); None when empty
    pub fn max_depth(&self) -> Option<usize> {
        self.walk().map(|(depth, _)| depth).max()
    }

    /// Depth-first, pre-order walk yielding `(depth, node)`
    pub fn walk(&self) -> Walk<'_, 'a> {
        Walk {
            stack: self.roots.iter().rev().map(|n| (0, n)).collect(),
        }
    }

    /// Finds the node wrapping the account with the given id
    pub fn find(&self, id: &str) -> Option<&AccountNode<'a>> {
        self.walk()
            .map(|(_, node)| node)
            .find(|node| node.account.id == id)
    }
}

/// Iterator returned by [`Forest::walk`]
pub struct Walk<'f, 'a> {
    stack: Vec<(usize, &'f AccountNode<'a>)>,
}

impl<'f, 'a> Iterator for Walk<'f, 'a> {
    type Item = (usize, &'f AccountNode<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        self.stack
            .extend(node.children.iter().rev().map(|c| (depth + 1, c)));
        Some((depth, node))
    }
}

/// Result of resolving an account's parent reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParentLookup<'s> {
    /// No parent set
    Root,
    /// Parent present in the input, at this position
    Found(usize),
    /// Parent set but not present in the input
    NotFound(&'s str),
}

fn resolve_parent<'s>(index: &HashMap<&str, usize>, account: &'s account::Model) -> ParentLookup<'s> {
    match account.parent_id.as_deref() {
        None => ParentLookup::Root,
        Some(parent) => match index.get(parent) {
            Some(&pos) => ParentLookup::Found(pos),
            None => ParentLookup::NotFound(parent),
        },
    }
}

/// Builds account forests with an explicit ordering and duplicate policy
#[derive(Clone, Copy)]
pub struct TreeBuilder<'o> {
    ordering: &'o dyn CodeOrdering,
    duplicates: DuplicatePolicy,
    max_depth: Option<usize>,
}

impl Default for TreeBuilder<'static> {
    fn default() -> Self {
        Self::new(&LocaleCollation)
    }
}

impl<'o> TreeBuilder<'o> {
    pub fn new(ordering: &'o dyn CodeOrdering) -> Self {
        Self {
            ordering,
            duplicates: DuplicatePolicy::default(),
            max_depth: None,
        }
    }

    pub fn ordering<'n>(self, ordering: &'n dyn CodeOrdering) -> TreeBuilder<'n> {
        TreeBuilder {
            ordering,
            duplicates: self.duplicates,
            max_depth: self.max_depth,
        }
    }

    pub fn duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicates = policy;
        self
    }

    /// Deepest level allowed (roots are level 0); unlimited when None
    pub fn max_depth(mut self, limit: Option<usize>) -> Self {
        self.max_depth = limit;
        self
    }

    /// Builds the forest. Fails only under [`DuplicatePolicy::Reject`] or
    /// when a chain exceeds the configured depth limit.
    pub fn build<'a, I>(&self, accounts: I) -> Result<Forest<'a>, TreeError>
    where
        I: IntoIterator<Item = &'a account::Model>,
    {
        let accounts: Vec<&'a account::Model> = accounts.into_iter().collect();

        // Pass 1: one slot per distinct id
        let mut index: HashMap<&'a str, usize> = HashMap::with_capacity(accounts.len());
        for (pos, account) in accounts.iter().enumerate() {
            match index.entry(account.id.as_str()) {
                Entry::Vacant(slot) => {
                    slot.insert(pos);
                }
                Entry::Occupied(mut slot) => match self.duplicates {
                    DuplicatePolicy::KeepLast => {
                        warn!("Duplicate account id {}, earlier record shadowed", account.id);
                        slot.insert(pos);
                    }
                    DuplicatePolicy::KeepFirst => {
                        warn!("Duplicate account id {}, later record ignored", account.id);
                    }
                    DuplicatePolicy::Reject => {
                        return Err(TreeError::DuplicateId(account.id.clone()));
                    }
                },
            }
        }

        // Pass 2: attach to parent or roots
        let mut children: Vec<Vec<usize>> = vec![Vec::new(); accounts.len()];
        let mut roots: Vec<usize> = Vec::new();
        for (pos, account) in accounts.iter().enumerate() {
            if index.get(account.id.as_str()) != Some(&pos) {
                continue;
            }
            match resolve_parent(&index, account) {
                ParentLookup::Found(parent) => children[parent].push(pos),
                ParentLookup::NotFound(parent) => {
                    debug!("Account {} references missing parent {}, placed at root", account.id, parent);
                    roots.push(pos);
                }
                ParentLookup::Root => roots.push(pos),
            }
        }

        // Pre-order over reachable positions; members of a cycle are never reached
        let mut order: Vec<usize> = Vec::with_capacity(accounts.len());
        let mut stack: Vec<(usize, usize)> = roots.iter().map(|&pos| (pos, 0)).collect();
        while let Some((pos, depth)) = stack.pop() {
            if let Some(limit) = self.max_depth {
                if depth > limit {
                    return Err(TreeError::TooDeep {
                        id: accounts[pos].id.clone(),
                        limit,
                    });
                }
            }
            order.push(pos);
            stack.extend(children[pos].iter().map(|&child| (child, depth + 1)));
        }

        // Assemble bottom-up: every child comes after its parent in `order`
        let mut built: Vec<Option<AccountNode<'a>>> = (0..accounts.len()).map(|_| None).collect();
        for &pos in order.iter().rev() {
            let mut kids: Vec<AccountNode<'a>> = children[pos]
                .iter()
                .filter_map(|&child| built[child].take())
                .collect();
            self.sort(&mut kids);
            built[pos] = Some(AccountNode {
                account: accounts[pos],
                children: kids,
            });
        }

        let mut nodes: Vec<AccountNode<'a>> = roots
            .iter()
            .filter_map(|&pos| built[pos].take())
            .collect();
        self.sort(&mut nodes);

        Ok(Forest { roots: nodes })
    }

    // sort_by is stable: equal codes keep input order
    fn sort(&self, nodes: &mut [AccountNode<'_>]) {
        nodes.sort_by(|a, b| self.ordering.compare(&a.account.code, &b.account.code));
    }
}

/// Builds a forest with locale ordering and last-wins duplicates
pub fn organize(accounts: &[account::Model]) -> Forest<'_> {
    // KeepLast with no depth limit has no failing path
    TreeBuilder::default().build(accounts).unwrap_or_default()
}

/// Account whose parent id does not exist in the input
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DanglingParent {
    pub id: String,
    pub parent_id: String,
}

/// Data-quality findings, computed independently from tree construction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrityReport {
    pub duplicate_ids: Vec<String>,
    pub dangling_parents: Vec<DanglingParent>,
    /// Each cycle as the ids along the parent chain, starting at the smallest id
    pub cycles: Vec<Vec<String>>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.duplicate_ids.is_empty() && self.dangling_parents.is_empty() && self.cycles.is_empty()
    }

    /// Duplicates and cycles are errors; dangling parents are tolerated
    pub fn into_result(self) -> Result<(), TreeError> {
        if let Some(id) = self.duplicate_ids.into_iter().next() {
            return Err(TreeError::DuplicateId(id));
        }
        if let Some(ids) = self.cycles.into_iter().next() {
            return Err(TreeError::Cycle(ids));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// Checks ids and parent chains. Duplicate ids resolve last-wins, like the default builder.
pub fn verify(accounts: &[account::Model]) -> IntegrityReport {
    let mut report = IntegrityReport::default();

    let mut parents: HashMap<&str, Option<&str>> = HashMap::with_capacity(accounts.len());
    let mut reported: HashSet<&str> = HashSet::new();
    for account in accounts {
        let previous = parents.insert(account.id.as_str(), account.parent_id.as_deref());
        if previous.is_some() && reported.insert(account.id.as_str()) {
            report.duplicate_ids.push(account.id.clone());
        }
    }

    for account in accounts {
        if let Some(parent) = account.parent_id.as_deref() {
            if !parents.contains_key(parent) {
                report.dangling_parents.push(DanglingParent {
                    id: account.id.clone(),
                    parent_id: parent.to_string(),
                });
            }
        }
    }

    let mut marks: HashMap<&str, Mark> = HashMap::with_capacity(parents.len());
    for account in accounts {
        let mut path: Vec<&str> = Vec::new();
        let mut current = Some(account.id.as_str());

        while let Some(id) = current {
            match marks.get(id) {
                Some(Mark::Done) => break,
                Some(Mark::Visiting) => {
                    if let Some(start) = path.iter().position(|p| *p == id) {
                        report.cycles.push(normalize_cycle(&path[start..]));
                    }
                    break;
                }
                None => {}
            }
            marks.insert(id, Mark::Visiting);
            path.push(id);
            current = parents.get(id).copied().flatten().filter(|p| parents.contains_key(p));
        }

        for id in path {
            marks.insert(id, Mark::Done);
        }
    }

    if !report.is_clean() {
        debug!(
            "Integrity check: {} duplicate ids, {} dangling parents, {} cycles",
            report.duplicate_ids.len(),
            report.dangling_parents.len(),
            report.cycles.len()
        );
    }

    report
}

fn normalize_cycle(ids: &[&str]) -> Vec<String> {
    let start = ids
        .iter()
        .enumerate()
        .min_by_key(|(_, id)| **id)
        .map(|(pos, _)| pos)
        .unwrap_or(0);
    ids[start..]
        .iter()
        .chain(ids[..start].iter())
        .map(|id| id.to_string())
        .collect()
}

//! Ordered, duplicate-free set of selected node identifiers.
//!
//! The set is the authoritative record of a tree field's value: it is what
//! gets submitted with the form. It may hold identifiers of nodes that have
//! not been loaded yet, since the restored selection can reach deeper than
//! the currently materialized tree.

use serde::{Deserialize, Serialize};
use vtree_core::NodeId;

/// Selected identifiers in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectedSet {
    ids: Vec<NodeId>,
}

impl SelectedSet {
    /// Create an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self { ids: Vec::new() }
    }

    /// Seed from a previous selection, dropping duplicates and keeping the
    /// first occurrence of each identifier.
    #[must_use]
    pub fn from_values<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<NodeId>,
    {
        let mut set = Self::new();
        for value in values {
            set.insert(value.into());
        }
        set
    }

    /// Whether `id` is selected.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|selected| selected.as_str() == id)
    }

    /// Append `id` unless already present. Returns `true` when inserted.
    pub fn insert(&mut self, id: NodeId) -> bool {
        if self.contains(id.as_str()) {
            return false;
        }
        self.ids.push(id);
        true
    }

    /// Remove every entry equal to `id`. Returns the number removed.
    pub fn remove(&mut self, id: &str) -> usize {
        let before = self.ids.len();
        self.ids.retain(|selected| selected.as_str() != id);
        before - self.ids.len()
    }

    /// Remove everything.
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Selected identifiers in order.
    #[must_use]
    pub fn as_slice(&self) -> &[NodeId] {
        &self.ids
    }

    /// Iterate the identifiers in order.
    pub fn iter(&self) -> std::slice::Iter<'_, NodeId> {
        self.ids.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl<'a> IntoIterator for &'a SelectedSet {
    type Item = &'a NodeId;
    type IntoIter = std::slice::Iter<'a, NodeId>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter()
    }
}

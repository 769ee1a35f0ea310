//! Per-label property registries.
//!
//! For each `(graph, kind, label)` the store remembers which property
//! names have been seen on entities of that label. Collapsed-return
//! expansion is the only consumer; matching never reads these.

use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EntityKind {
    Node,
    Edge,
}

/// Property-name registry of one label, ordered lexicographically.
#[derive(Debug, Default)]
pub struct LabelStore {
    properties: BTreeSet<String>,
}

impl LabelStore {
    pub fn register(&mut self, property: &str) {
        self.properties.insert(property.to_string());
    }

    pub fn properties(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(String::as_str)
    }
}

#[derive(Debug, Default)]
pub struct LabelStores {
    stores: BTreeMap<(String, EntityKind, String), LabelStore>,
}

impl LabelStores {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, graph: &str, kind: EntityKind, label: &str, property: &str) {
        self.stores
            .entry((graph.to_string(), kind, label.to_string()))
            .or_default()
            .register(property);
    }

    pub fn get(&self, graph: &str, kind: EntityKind, label: &str) -> Option<&LabelStore> {
        self.stores
            .get(&(graph.to_string(), kind, label.to_string()))
    }

    /// Every store of the given kind in the graph, in label order.
    pub fn all(&self, graph: &str, kind: EntityKind) -> impl Iterator<Item = &LabelStore> {
        self.stores
            .iter()
            .filter(move |((g, k, _), _)| g == graph && *k == kind)
            .map(|(_, store)| store)
    }
}

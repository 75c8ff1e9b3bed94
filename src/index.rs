//! Global declaration indices
//!
//! Built once, in sorted file order, after every file's declarations are
//! known. Read-only afterwards.

use crate::namespace::{Accessor, NamespaceEntry};
use std::collections::{BTreeMap, HashMap};

/// FQTN → declared type, plus file → declared FQTNs
#[derive(Debug, Clone, Default)]
pub struct NamespaceIndex {
    by_fqtn: HashMap<String, NamespaceEntry>,
    by_file: BTreeMap<String, Vec<String>>,
}

impl NamespaceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry. The first declaration of an FQTN wins; a duplicate is
    /// logged and rejected.
    pub fn insert(&mut self, entry: NamespaceEntry) -> bool {
        if let Some(existing) = self.by_fqtn.get(&entry.fqtn) {
            tracing::warn!(
                "Duplicate declaration of {} in {} (keeping {})",
                entry.fqtn,
                entry.source,
                existing.source
            );
            return false;
        }
        self.by_file
            .entry(entry.source.clone())
            .or_default()
            .push(entry.fqtn.clone());
        self.by_fqtn.insert(entry.fqtn.clone(), entry);
        true
    }

    /// Get a declared type by FQTN
    pub fn get(&self, fqtn: &str) -> Option<&NamespaceEntry> {
        self.by_fqtn.get(fqtn)
    }

    /// Types declared by a file, in declaration order
    pub fn entries_of(&self, file: &str) -> Vec<&NamespaceEntry> {
        self.by_file
            .get(file)
            .map(|fqtns| fqtns.iter().filter_map(|f| self.by_fqtn.get(f)).collect())
            .unwrap_or_default()
    }

    /// Files with at least one declared type
    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.by_file.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_fqtn.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_fqtn.is_empty()
    }
}

/// Accessor name → every public member with that name
#[derive(Debug, Clone, Default)]
pub struct AccessorIndex {
    by_name: HashMap<String, Vec<Accessor>>,
}

impl AccessorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, accessor: Accessor) {
        self.by_name.entry(accessor.name.clone()).or_default().push(accessor);
    }

    /// All accessors with a name; colliding names across types are all kept
    pub fn get(&self, name: &str) -> &[Accessor] {
        self.by_name.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct accessor names
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// Both indices, frozen after phase one
#[derive(Debug, Clone, Default)]
pub struct GlobalIndex {
    pub namespaces: NamespaceIndex,
    pub accessors: AccessorIndex,
}

impl GlobalIndex {
    /// Build from every file's declarations. Files are inserted in the given
    /// order, so callers pass them sorted for a deterministic winner.
    pub fn build<'a>(entries: impl IntoIterator<Item = &'a NamespaceEntry>) -> Self {
        let mut index = Self::default();
        for entry in entries {
            index.insert(entry.clone());
        }
        tracing::debug!(
            "Indexed {} types and {} accessor names",
            index.namespaces.len(),
            index.accessors.len()
        );
        index
    }

    /// Insert a type and, if it is new, its accessors
    pub fn insert(&mut self, entry: NamespaceEntry) {
        let accessors = entry.accessors.clone();
        if self.namespaces.insert(entry) {
            for accessor in accessors {
                self.accessors.insert(accessor);
            }
        }
    }
}

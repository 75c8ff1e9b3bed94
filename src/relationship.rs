//! Resolved dependency edges

use crate::namespace::NamespaceEntry;
use crate::usage::UsageType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Relationships keyed by the file they originate from.
pub type DependencyTree = BTreeMap<String, Vec<Relationship>>;

/// Identity of a relationship for deduplication
pub type RelationshipKey = (String, String, UsageType);

/// A confirmed edge from one declared type to another
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Relationship {
    pub from_fqtn: String,
    pub from_file: String,
    pub from_class_name: String,
    pub to_fqtn: String,
    pub to_file: String,
    pub to_class_name: String,
    pub usage_type: UsageType,
}

impl Relationship {
    /// Create an edge between two declared types
    pub fn between(from: &NamespaceEntry, to: &NamespaceEntry, usage_type: UsageType) -> Self {
        Self {
            from_fqtn: from.fqtn.clone(),
            from_file: from.source.clone(),
            from_class_name: from.class_name.clone(),
            to_fqtn: to.fqtn.clone(),
            to_file: to.source.clone(),
            to_class_name: to.class_name.clone(),
            usage_type,
        }
    }

    /// Get the deduplication key
    pub fn key(&self) -> RelationshipKey {
        (self.from_fqtn.clone(), self.to_fqtn.clone(), self.usage_type)
    }

    /// Whether the edge points back at its own type
    pub fn is_self_edge(&self) -> bool {
        self.from_fqtn == self.to_fqtn
    }

    /// Whether the edge crosses a file boundary
    pub fn is_cross_file(&self) -> bool {
        self.from_file != self.to_file
    }
}

impl std::fmt::Display for Relationship {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} --{}--> {}", self.from_fqtn, self.usage_type, self.to_fqtn)
    }
}

/// Flatten a dependency tree into a sorted, duplicate-free edge list
pub fn flatten(tree: &DependencyTree) -> Vec<Relationship> {
    let mut all: Vec<Relationship> = tree.values().flatten().cloned().collect();
    all.sort();
    all.dedup();
    all
}

//! Direct relationships
//!
//! A usage candidate becomes a relationship only when its target is a known
//! type of the same language. Everything else is dropped without a trace.

use crate::index::NamespaceIndex;
use crate::language::LanguageId;
use crate::namespace::NamespaceEntry;
use crate::relationship::{Relationship, RelationshipKey};
use crate::usage::UsageCandidate;
use std::collections::HashSet;

/// Confirms usage candidates against the namespace index
pub struct DependencyLinker<'a> {
    namespaces: &'a NamespaceIndex,
}

impl<'a> DependencyLinker<'a> {
    pub fn new(namespaces: &'a NamespaceIndex) -> Self {
        Self { namespaces }
    }

    /// Link one file's candidates.
    ///
    /// `entries` are the file's own declarations, the possible origins.
    pub fn link(
        &self,
        entries: &[NamespaceEntry],
        language: LanguageId,
        candidates: &[UsageCandidate],
    ) -> Vec<Relationship> {
        let mut seen: HashSet<RelationshipKey> = HashSet::new();
        let mut relationships = Vec::new();

        for candidate in candidates {
            let Some(to) = self
                .namespaces
                .get(&candidate.used_namespace)
                .filter(|to| to.language == language)
            else {
                continue;
            };
            let Some(from) = entries.iter().find(|e| e.fqtn == candidate.from_namespace) else {
                continue;
            };

            let relationship = Relationship::between(from, to, candidate.usage_type);
            if relationship.is_self_edge() || !seen.insert(relationship.key()) {
                continue;
            }
            relationships.push(relationship);
        }

        relationships
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::GlobalIndex;
    use crate::usage::UsageType;

    fn candidate(used: &str, from: &str, usage_type: UsageType) -> UsageCandidate {
        UsageCandidate {
            used_namespace: used.to_string(),
            from_namespace: from.to_string(),
            source: "A.cs".to_string(),
            usage_type,
        }
    }

    #[test]
    fn test_only_known_targets_become_relationships() {
        let a = NamespaceEntry::new("App", "A", ".", "A.cs", LanguageId::CSharp);
        let b = NamespaceEntry::new("NS", "B", ".", "B.cs", LanguageId::CSharp);
        let index = GlobalIndex::build([&a, &b]);

        let candidates = vec![
            candidate("B", "App.A", UsageType::Usage),
            candidate("App.B", "App.A", UsageType::Usage),
            candidate("NS.B", "App.A", UsageType::Usage),
            candidate("System.NS.B", "App.A", UsageType::Usage),
            candidate("NS.B", "App.A", UsageType::Usage),
        ];

        let linked = DependencyLinker::new(&index.namespaces).link(
            std::slice::from_ref(&a),
            LanguageId::CSharp,
            &candidates,
        );

        assert_eq!(linked.len(), 1);
        assert_eq!(linked[0].to_fqtn, "NS.B");
        assert_eq!(linked[0].from_file, "A.cs");
        assert_eq!(linked[0].to_file, "B.cs");
    }

    #[test]
    fn test_usage_types_are_distinct_edges() {
        let a = NamespaceEntry::new("App", "A", ".", "A.cs", LanguageId::CSharp);
        let base = NamespaceEntry::new("App", "Base", ".", "Base.cs", LanguageId::CSharp);
        let index = GlobalIndex::build([&a, &base]);

        let linked = DependencyLinker::new(&index.namespaces).link(
            std::slice::from_ref(&a),
            LanguageId::CSharp,
            &[
                candidate("App.Base", "App.A", UsageType::Extends),
                candidate("App.Base", "App.A", UsageType::Usage),
            ],
        );

        assert_eq!(linked.len(), 2);
        assert_eq!(linked[0].usage_type, UsageType::Extends);
    }

    #[test]
    fn test_no_cross_language_or_self_edges() {
        let a = NamespaceEntry::new("App", "A", ".", "A.cs", LanguageId::CSharp);
        let php = NamespaceEntry::new("Lib", "Util", ".", "util.php", LanguageId::Php);
        let index = GlobalIndex::build([&a, &php]);

        let linked = DependencyLinker::new(&index.namespaces).link(
            std::slice::from_ref(&a),
            LanguageId::CSharp,
            &[
                candidate("Lib.Util", "App.A", UsageType::Usage),
                candidate("App.A", "App.A", UsageType::Usage),
            ],
        );

        assert!(linked.is_empty());
    }
}

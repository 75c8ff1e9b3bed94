//! Call-expression resolution
//!
//! Follows deferred member-access chains through the accessor index. Each hop
//! looks the segment up by name, keeps the accessors whose declaring type is
//! reachable from where the chain currently stands, and moves on to their
//! return type. A segment nobody declares ends the chain.

use crate::index::GlobalIndex;
use crate::namespace::{Accessor, NamespaceEntry, fqtn};
use crate::relationship::{DependencyTree, Relationship, RelationshipKey};
use crate::usage::{UnresolvedCallExpression, UsageType};
use std::collections::{BTreeMap, HashSet};

/// A type a chain can currently stand on
#[derive(Debug, Clone, PartialEq, Eq)]
struct TypeRef {
    fqtn: String,
    file: String,
    class_name: String,
}

impl TypeRef {
    fn from_entry(entry: &NamespaceEntry) -> Self {
        Self {
            fqtn: entry.fqtn.clone(),
            file: entry.source.clone(),
            class_name: entry.class_name.clone(),
        }
    }

    fn target_of(relationship: &Relationship) -> Self {
        Self {
            fqtn: relationship.to_fqtn.clone(),
            file: relationship.to_file.clone(),
            class_name: relationship.to_class_name.clone(),
        }
    }
}

/// Per-chain walk state
struct ChainWalk<'w> {
    origin: &'w NamespaceEntry,
    visited: HashSet<(String, String)>,
    seen: &'w mut HashSet<RelationshipKey>,
    found: Vec<Relationship>,
}

impl ChainWalk<'_> {
    fn emit(&mut self, to: &TypeRef) {
        if to.fqtn == self.origin.fqtn {
            return;
        }
        let relationship = Relationship {
            from_fqtn: self.origin.fqtn.clone(),
            from_file: self.origin.source.clone(),
            from_class_name: self.origin.class_name.clone(),
            to_fqtn: to.fqtn.clone(),
            to_file: to.file.clone(),
            to_class_name: to.class_name.clone(),
            usage_type: UsageType::Usage,
        };
        if self.seen.insert(relationship.key()) {
            self.found.push(relationship);
        }
    }
}

/// Resolves unresolved call expressions into transitive relationships
pub struct CallExpressionResolver<'a> {
    index: &'a GlobalIndex,
    tree: &'a DependencyTree,
}

impl<'a> CallExpressionResolver<'a> {
    /// Create a resolver over the frozen indices and the direct relationships
    pub fn new(index: &'a GlobalIndex, tree: &'a DependencyTree) -> Self {
        Self { index, tree }
    }

    /// Resolve the chains of every file, in path order.
    pub fn resolve_all(
        &self,
        unresolved: &BTreeMap<String, Vec<UnresolvedCallExpression>>,
        seen: &mut HashSet<RelationshipKey>,
    ) -> Vec<Relationship> {
        unresolved
            .iter()
            .flat_map(|(file, chains)| self.resolve_file(file, chains, seen))
            .collect()
    }

    /// Resolve one file's chains.
    ///
    /// Relationships whose key is already in `seen` are not emitted again.
    pub fn resolve_file(
        &self,
        file: &str,
        chains: &[UnresolvedCallExpression],
        seen: &mut HashSet<RelationshipKey>,
    ) -> Vec<Relationship> {
        let own_types = self.index.namespaces.entries_of(file);
        let Some(origin) = own_types.first().copied() else {
            return Vec::new();
        };

        // first hop: the file's dependencies and its own types
        let mut reachable: Vec<TypeRef> = self
            .relationships_of(file)
            .iter()
            .map(TypeRef::target_of)
            .collect();
        reachable.extend(own_types.iter().map(|e| TypeRef::from_entry(e)));

        let mut walk = ChainWalk {
            origin,
            visited: HashSet::new(),
            seen,
            found: Vec::new(),
        };

        for chain in chains {
            let segments = chain.accessor_segments();
            walk.visited.clear();
            self.hop(&mut walk, file, &reachable, &segments);
        }

        if !walk.found.is_empty() {
            tracing::debug!("{}: {} transitive relationships", file, walk.found.len());
        }
        walk.found
    }

    fn hop(&self, walk: &mut ChainWalk<'_>, context: &str, reachable: &[TypeRef], segments: &[&str]) {
        let Some((segment, rest)) = segments.split_first() else {
            return;
        };
        if !walk.visited.insert((context.to_string(), segment.to_string())) {
            tracing::debug!("Cycle at {} in {}, abandoning branch", segment, context);
            return;
        }

        for accessor in self.index.accessors.get(segment) {
            for declaring in &accessor.declaring_types {
                let Some(declaring) = reachable.iter().find(|t| &t.fqtn == declaring) else {
                    continue;
                };
                walk.emit(declaring);

                let Some(returned) = self.resolve_return_type(accessor, declaring) else {
                    continue;
                };
                walk.emit(&returned);

                let mut next = vec![returned.clone()];
                next.extend(self.supertypes_of(&returned));
                self.hop(walk, &returned.file, &next, rest);
            }
        }
    }

    /// Find the type an accessor returns, as seen from its declaring file
    fn resolve_return_type(&self, accessor: &Accessor, declaring: &TypeRef) -> Option<TypeRef> {
        if !accessor.has_return_type() {
            return None;
        }
        let return_type = accessor.return_type.as_str();

        if let Some(relationship) = self
            .relationships_of(&accessor.source)
            .iter()
            .find(|r| r.to_class_name == return_type || r.to_fqtn == return_type)
        {
            return Some(TypeRef::target_of(relationship));
        }

        let namespaces = &self.index.namespaces;
        let sibling = namespaces.get(&declaring.fqtn).and_then(|entry| {
            namespaces.get(&fqtn(&entry.namespace, &entry.namespace_delimiter, return_type))
        });

        sibling
            .or_else(|| namespaces.get(return_type))
            .map(TypeRef::from_entry)
    }

    /// Types a type extends or implements, per its file's relationships
    fn supertypes_of(&self, ty: &TypeRef) -> Vec<TypeRef> {
        self.relationships_of(&ty.file)
            .iter()
            .filter(|r| r.from_fqtn == ty.fqtn && r.usage_type.is_inheritance())
            .map(TypeRef::target_of)
            .collect()
    }

    fn relationships_of(&self, file: &str) -> &[Relationship] {
        self.tree.get(file).map(Vec::as_slice).unwrap_or(&[])
    }
}

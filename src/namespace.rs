//! Declared types - the nodes of the dependency graph
//!
//! A `NamespaceEntry` is one declared type (class, interface, struct, trait,
//! enum) together with its namespace, its unresolved base type names and the
//! public accessors usable as hops in a call chain.

use crate::language::LanguageId;
use serde::{Deserialize, Serialize};

/// Join a namespace and a class name into a fully-qualified type name.
///
/// Types outside any namespace are addressed by their bare name.
pub fn fqtn(namespace: &str, delimiter: &str, class_name: &str) -> String {
    if namespace.is_empty() {
        class_name.to_string()
    } else {
        format!("{}{}{}", namespace, delimiter, class_name)
    }
}

/// A public method or property usable as a hop in a call chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accessor {
    /// Member name as written in the declaration
    pub name: String,
    /// FQTNs of the types declaring this member
    pub declaring_types: Vec<String>,
    /// Declared return type as written; empty when none could be determined
    pub return_type: String,
    /// File declaring the member
    pub source: String,
}

impl Accessor {
    /// Create an accessor declared by a single type
    pub fn new(
        name: impl Into<String>,
        declaring_type: impl Into<String>,
        return_type: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            declaring_types: vec![declaring_type.into()],
            return_type: return_type.into(),
            source: source.into(),
        }
    }

    /// Whether the accessor can be followed to another type
    pub fn has_return_type(&self) -> bool {
        !self.return_type.is_empty()
    }
}

/// One declared type of a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceEntry {
    pub fqtn: String,
    pub namespace: String,
    pub class_name: String,
    pub namespace_delimiter: String,
    /// Base class name as written, resolved later like any other usage
    pub extended_class: Option<String>,
    /// Implemented interface names as written
    pub implemented_classes: Vec<String>,
    pub accessors: Vec<Accessor>,
    /// Declaring file
    pub source: String,
    pub language: LanguageId,
}

impl NamespaceEntry {
    /// Create an entry with no bases or accessors
    pub fn new(
        namespace: impl Into<String>,
        class_name: impl Into<String>,
        delimiter: impl Into<String>,
        source: impl Into<String>,
        language: LanguageId,
    ) -> Self {
        let namespace = namespace.into();
        let class_name = class_name.into();
        let namespace_delimiter = delimiter.into();
        Self {
            fqtn: fqtn(&namespace, &namespace_delimiter, &class_name),
            namespace,
            class_name,
            namespace_delimiter,
            extended_class: None,
            implemented_classes: Vec::new(),
            accessors: Vec::new(),
            source: source.into(),
            language,
        }
    }

    /// Set the extended class
    pub fn with_extends(mut self, base: impl Into<String>) -> Self {
        self.extended_class = Some(base.into());
        self
    }

    /// Add an implemented interface
    pub fn with_implements(mut self, interface: impl Into<String>) -> Self {
        self.implemented_classes.push(interface.into());
        self
    }

    /// Add a public accessor declared by this type
    pub fn with_accessor(mut self, name: impl Into<String>, return_type: impl Into<String>) -> Self {
        let accessor = Accessor::new(name, self.fqtn.clone(), return_type, self.source.clone());
        self.accessors.push(accessor);
        self
    }
}

//! Language registry
//!
//! Holds the per-language capability records together with their compiled
//! queries. Queries are compiled once per language and shared by every file.

use crate::syntax::QueryBuilder;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use tree_sitter::{Language, Query};

/// Languages with a registered profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageId {
    CSharp,
    Php,
}

impl LanguageId {
    /// Get the string representation of the language
    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageId::CSharp => "csharp",
            LanguageId::Php => "php",
        }
    }

    /// Get all language ids
    pub fn all() -> &'static [LanguageId] {
        &[LanguageId::CSharp, LanguageId::Php]
    }
}

impl FromStr for LanguageId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "csharp" | "c#" | "cs" | "c_sharp" => Ok(LanguageId::CSharp),
            "php" => Ok(LanguageId::Php),
            _ => Err(Error::UnsupportedLanguage(s.to_string())),
        }
    }
}

impl std::fmt::Display for LanguageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The four query texts a language supplies.
///
/// An empty string means the language has no such construct
/// (e.g. C# has no grouped imports).
#[derive(Debug, Clone, Copy, Default)]
pub struct QuerySet {
    pub imports: &'static str,
    pub grouped_imports: &'static str,
    pub usages: &'static str,
    pub declarations: &'static str,
}

/// Capability record describing how a language spells namespaces and calls.
#[derive(Debug, Clone)]
pub struct LanguageProfile {
    pub id: LanguageId,
    pub grammar: Language,
    /// Lowercase file extensions, without the dot
    pub extensions: &'static [&'static str],
    pub namespace_delimiter: &'static str,
    pub call_delimiter: &'static str,
    /// True when a call's receiver cannot be traced back to the import that
    /// introduced its type (C# `using System; Console.WriteLine()`).
    pub indirect_referencing: bool,
    /// Decorations stripped from the end of each name segment (`Foo[]`, `Foo?`)
    pub strip_suffixes: &'static [&'static str],
    pub queries: QuerySet,
}

impl LanguageProfile {
    /// Whether a called member name shares the delimiter of namespace segments,
    /// meaning the last segment of a call expression is not part of a type path
    pub fn call_shares_namespace_delimiter(&self) -> bool {
        self.namespace_delimiter == self.call_delimiter
    }
}

/// A profile plus its compiled queries.
pub struct CompiledLanguage {
    pub profile: LanguageProfile,
    pub imports: Option<Query>,
    pub grouped_imports: Option<Query>,
    pub usages: Option<Query>,
    pub declarations: Option<Query>,
}

impl CompiledLanguage {
    /// Compile every query of a profile, skipping patterns the grammar rejects
    pub fn compile(profile: LanguageProfile) -> Self {
        let build = |source: &str| QueryBuilder::new(&profile.grammar).with_source(source).build();

        let imports = build(profile.queries.imports);
        let grouped_imports = build(profile.queries.grouped_imports);
        let usages = build(profile.queries.usages);
        let declarations = build(profile.queries.declarations);

        Self {
            profile,
            imports,
            grouped_imports,
            usages,
            declarations,
        }
    }

    /// Get the language id
    pub fn id(&self) -> LanguageId {
        self.profile.id
    }
}

/// Registry of language profiles
#[derive(Default)]
pub struct LanguageRegistry {
    languages: Vec<CompiledLanguage>,
}

impl LanguageRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a profile, compiling its queries
    pub fn register(&mut self, profile: LanguageProfile) {
        tracing::debug!("Registering language {}", profile.id);
        self.languages.push(CompiledLanguage::compile(profile));
    }

    /// Get a language by id
    pub fn get(&self, id: LanguageId) -> Option<&CompiledLanguage> {
        self.languages.iter().find(|l| l.id() == id)
    }

    /// Find the language for a file extension, ignoring case
    pub fn find_by_extension(&self, ext: &str) -> Option<&CompiledLanguage> {
        let ext = ext.to_lowercase();
        self.languages
            .iter()
            .find(|l| l.profile.extensions.contains(&ext.as_str()))
    }

    /// Find the language for a file path
    pub fn find_by_path(&self, path: &Path) -> Option<&CompiledLanguage> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(|ext| self.find_by_extension(ext))
    }

    /// Get all registered languages
    pub fn languages(&self) -> &[CompiledLanguage] {
        &self.languages
    }
}

/// Create a default registry with all built-in languages
pub fn default_registry() -> LanguageRegistry {
    let mut registry = LanguageRegistry::new();
    registry.register(super::csharp::profile());
    registry.register(super::php::profile());
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_id_roundtrip() {
        for id in LanguageId::all() {
            let parsed: LanguageId = id.as_str().parse().unwrap();
            assert_eq!(*id, parsed);
        }
        assert!("cobol".parse::<LanguageId>().is_err());
    }

    #[test]
    fn test_find_by_extension_ignores_case() {
        let registry = default_registry();

        assert_eq!(registry.find_by_extension("cs").map(|l| l.id()), Some(LanguageId::CSharp));
        assert_eq!(registry.find_by_extension("CS").map(|l| l.id()), Some(LanguageId::CSharp));
        assert_eq!(
            registry.find_by_path(Path::new("src/Foo.PHP")).map(|l| l.id()),
            Some(LanguageId::Php)
        );
        assert!(registry.find_by_path(Path::new("README")).is_none());
        assert!(registry.find_by_path(Path::new("main.rs")).is_none());
    }

    #[test]
    fn test_default_registry_compiles_queries() {
        let registry = default_registry();
        let csharp = registry.get(LanguageId::CSharp).unwrap();

        assert!(csharp.imports.is_some());
        assert!(csharp.usages.is_some());
        assert!(csharp.declarations.is_some());
        // C# has no grouped import syntax
        assert!(csharp.grouped_imports.is_none());
    }

    #[test]
    fn test_call_delimiter_sharing() {
        let registry = default_registry();
        let csharp = &registry.get(LanguageId::CSharp).unwrap().profile;
        let php = &registry.get(LanguageId::Php).unwrap().profile;

        assert!(csharp.call_shares_namespace_delimiter());
        assert!(!php.call_shares_namespace_delimiter());
    }
}

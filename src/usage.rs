//! Usage facts - imports, usage candidates and deferred call chains

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How one type depends on another
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UsageType {
    /// Any reference: parameter, field, local, creation, static access, call
    Usage,
    /// Declared base class
    Extends,
    /// Declared interface
    Implements,
}

impl UsageType {
    /// Get the string representation of the usage type
    pub fn as_str(&self) -> &'static str {
        match self {
            UsageType::Usage => "usage",
            UsageType::Extends => "extends",
            UsageType::Implements => "implements",
        }
    }

    /// Get all usage types
    pub fn all() -> &'static [UsageType] {
        &[UsageType::Usage, UsageType::Extends, UsageType::Implements]
    }

    /// Check if this usage type is an inheritance edge
    pub fn is_inheritance(&self) -> bool {
        matches!(self, UsageType::Extends | UsageType::Implements)
    }
}

impl FromStr for UsageType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "usage" => Ok(UsageType::Usage),
            "extends" => Ok(UsageType::Extends),
            "implements" => Ok(UsageType::Implements),
            _ => Err(Error::Parse(format!("Unknown usage type: {}", s))),
        }
    }
}

impl std::fmt::Display for UsageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An import statement of one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReference {
    /// Imported namespace or type, fully written out
    pub used_namespace: String,
    /// Last delimiter-separated segment of `used_namespace`
    pub namespace_suffix: String,
    /// Alias declared for the import; empty when none
    pub alias: String,
    /// Importing file
    pub source: String,
}

impl ImportReference {
    /// Create an import without alias
    pub fn new(used_namespace: impl Into<String>, delimiter: &str, source: impl Into<String>) -> Self {
        let used_namespace = used_namespace.into();
        let namespace_suffix = used_namespace
            .rsplit(delimiter)
            .next()
            .unwrap_or(&used_namespace)
            .to_string();
        Self {
            used_namespace,
            namespace_suffix,
            alias: String::new(),
            source: source.into(),
        }
    }

    /// The key usages resolve through: the alias if declared, else the suffix
    pub fn lookup_key(&self) -> &str {
        if self.alias.is_empty() {
            &self.namespace_suffix
        } else {
            &self.alias
        }
    }
}

/// A speculative reference from a type to another, not yet confirmed
/// against the declaration index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UsageCandidate {
    /// Candidate FQTN of the used type
    pub used_namespace: String,
    /// FQTN of the using type
    pub from_namespace: String,
    /// Using file
    pub source: String,
    pub usage_type: UsageType,
}

/// A member-access chain whose receiver could not be tied to an import,
/// deferred to the global call-expression pass.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnresolvedCallExpression {
    /// Cleaned chain text, e.g. `myVariable.Foo.Bar`
    pub chain: String,
    pub namespace_delimiter: String,
    /// The first segment is a local receiver rather than an accessor
    pub variable_name_included: bool,
}

impl UnresolvedCallExpression {
    /// Accessor segments of the chain, receiver dropped when included
    pub fn accessor_segments(&self) -> Vec<&str> {
        let skip = usize::from(self.variable_name_included);
        self.chain
            .split(self.namespace_delimiter.as_str())
            .skip(skip)
            .map(|segment| segment.trim_end_matches('?'))
            .filter(|segment| !segment.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_type_roundtrip() {
        for usage_type in UsageType::all() {
            let parsed: UsageType = usage_type.as_str().parse().unwrap();
            assert_eq!(*usage_type, parsed);
        }
        assert!(UsageType::Extends.is_inheritance());
        assert!(!UsageType::Usage.is_inheritance());
    }

    #[test]
    fn test_import_suffix_and_key() {
        let mut import = ImportReference::new("System.Collections.Generic", ".", "A.cs");
        assert_eq!(import.namespace_suffix, "Generic");
        assert_eq!(import.lookup_key(), "Generic");

        import.alias = "G".to_string();
        assert_eq!(import.lookup_key(), "G");

        let php = ImportReference::new("App\\Models\\User", "\\", "a.php");
        assert_eq!(php.namespace_suffix, "User");
    }

    #[test]
    fn test_accessor_segments() {
        let with_receiver = UnresolvedCallExpression {
            chain: "myVariable?.Foo?.Bar".to_string(),
            namespace_delimiter: ".".to_string(),
            variable_name_included: true,
        };
        assert_eq!(with_receiver.accessor_segments(), vec!["Foo", "Bar"]);

        let without_receiver = UnresolvedCallExpression {
            chain: "Foo.Bar".to_string(),
            namespace_delimiter: ".".to_string(),
            variable_name_included: false,
        };
        assert_eq!(without_receiver.accessor_segments(), vec!["Foo", "Bar"]);
    }
}

//! Language profiles
//!
//! Each language is a data record: its namespace and call delimiters, whether
//! bare receivers can be traced back to an import, and a `.scm` query pack.
//! The resolution algorithm is generic over this record; no language gets its
//! own resolver.

pub mod registry;
pub mod csharp;
pub mod php;

pub use registry::{
    CompiledLanguage, LanguageId, LanguageProfile, LanguageRegistry, QuerySet, default_registry,
};

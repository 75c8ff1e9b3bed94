//! # Couplet - Cross-file coupling resolution
//!
//! Turns per-file syntactic facts into a resolved inter-type dependency graph,
//! without a type checker or symbol table.
//!
//! Couplet provides:
//! - Declaration, import and usage extraction driven by tree-sitter queries
//! - Data-driven language profiles (namespace/call delimiters, query packs)
//! - Heuristic candidate generation filtered against a global declaration index
//! - Transitive call-chain resolution over public accessors
//! - Fan-in / fan-out coupling metrics over the final relationship set

pub mod language;
pub mod syntax;
pub mod namespace;
pub mod usage;
pub mod relationship;
pub mod collector;
pub mod index;
pub mod linker;
pub mod pipeline;
pub mod coupling;
pub mod config;
pub mod discovery;

// Re-exports for convenient access
pub use language::{LanguageId, LanguageProfile, LanguageRegistry};
pub use namespace::{Accessor, NamespaceEntry};
pub use usage::{ImportReference, UnresolvedCallExpression, UsageCandidate, UsageType};
pub use relationship::Relationship;
pub use pipeline::{Pipeline, PipelineReport, FileError};

/// Result type alias for Couplet operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Couplet operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Language error: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported language for file: {0}")]
    UnsupportedLanguage(String),
}

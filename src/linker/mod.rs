//! Cross-file linking
//!
//! `dependency` confirms usage candidates against the global index,
//! `call_expression` follows deferred accessor chains over the result.

pub mod call_expression;
pub mod dependency;

pub use call_expression::CallExpressionResolver;
pub use dependency::DependencyLinker;

use serde::Serialize;
use std::fmt;

/// Counters for one resolution run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LinkerStats {
    pub files: usize,
    pub failed_files: usize,
    pub declarations: usize,
    pub candidates: usize,
    pub direct: usize,
    pub unresolved_call_expressions: usize,
    pub transitive: usize,
}

impl fmt::Display for LinkerStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Linker Stats:")?;
        writeln!(f, "  Files: {} ({} failed)", self.files, self.failed_files)?;
        writeln!(f, "  Declared Types: {}", self.declarations)?;
        writeln!(f, "  Usage Candidates: {}", self.candidates)?;
        writeln!(f, "  Direct Relationships: {}", self.direct)?;
        writeln!(f, "  Call Expressions: {}", self.unresolved_call_expressions)?;
        writeln!(f, "  Transitive Relationships: {}", self.transitive)
    }
}

//! Syntax collaborator
//!
//! Parses source text with the grammar of its language and runs compiled
//! queries against the tree. The resolution core only ever sees the ordered
//! capture lists produced here.

pub mod query_builder;
pub mod capture;
pub mod parsed_file;

pub use query_builder::{QueryBuilder, split_patterns};
pub use capture::{Capture, collect_captures};
pub use parsed_file::{ParsedFile, SourceFile};

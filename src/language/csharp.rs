//! C# language profile
//!
//! C# addresses types and members with the same `.` delimiter and lets a bare
//! receiver come from any `using` in scope, so unresolved usages are crossed
//! with every import of the file.

use super::registry::{LanguageId, LanguageProfile, QuerySet};

/// Create the C# profile with embedded queries
pub fn profile() -> LanguageProfile {
    LanguageProfile {
        id: LanguageId::CSharp,
        grammar: tree_sitter_c_sharp::LANGUAGE.into(),
        extensions: &["cs"],
        namespace_delimiter: ".",
        call_delimiter: ".",
        indirect_referencing: true,
        strip_suffixes: &["[]", "?"],
        queries: QuerySet {
            imports: include_str!("../../queries/csharp/imports.scm"),
            grouped_imports: "",
            usages: include_str!("../../queries/csharp/usages.scm"),
            declarations: include_str!("../../queries/csharp/declarations.scm"),
        },
    }
}

//! PHP language profile
//!
//! PHP separates namespaces with `\` and calls members with `->`, so a call
//! chain never doubles as a type path and imports must be explicit.

use super::registry::{LanguageId, LanguageProfile, QuerySet};

/// Create the PHP profile with embedded queries
pub fn profile() -> LanguageProfile {
    LanguageProfile {
        id: LanguageId::Php,
        grammar: tree_sitter_php::LANGUAGE_PHP.into(),
        extensions: &["php", "php3", "php4", "php5", "phtml"],
        namespace_delimiter: "\\",
        call_delimiter: "->",
        indirect_referencing: false,
        strip_suffixes: &["[]", "?"],
        queries: QuerySet {
            imports: include_str!("../../queries/php/imports.scm"),
            grouped_imports: include_str!("../../queries/php/grouped_imports.scm"),
            usages: include_str!("../../queries/php/usages.scm"),
            declarations: include_str!("../../queries/php/declarations.scm"),
        },
    }
}

//! Per-file collectors
//!
//! Everything here is a pure function of one file: its declarations, its
//! import table and its raw usage captures. The syntax tree is dropped once
//! the captures are taken.

pub mod declarations;
pub mod imports;
pub mod usages;

pub use declarations::extract_declarations;
pub use imports::{ImportTable, collect_grouped_imports, collect_imports};
pub use usages::{FileUsages, UsageCandidateBuilder, UsageOptions};

use crate::Result;
use crate::language::{CompiledLanguage, LanguageId};
use crate::namespace::NamespaceEntry;
use crate::syntax::{Capture, ParsedFile, SourceFile};

/// Syntactic facts of one file, gathered before any cross-file work
#[derive(Debug, Clone)]
pub struct FileFacts {
    pub path: String,
    pub language: LanguageId,
    pub entries: Vec<NamespaceEntry>,
    pub imports: ImportTable,
    pub usage_captures: Vec<Capture>,
}

impl FileFacts {
    /// Build the usage candidates of this file
    pub fn usages(&self, language: &CompiledLanguage, options: UsageOptions) -> FileUsages {
        UsageCandidateBuilder::new(&language.profile, &self.imports, &self.entries, &self.path)
            .with_options(options)
            .build(&self.usage_captures)
    }
}

/// Parse a file and collect its declarations, imports and usage captures
pub fn collect_file(file: &SourceFile, language: &CompiledLanguage) -> Result<FileFacts> {
    let parsed = ParsedFile::parse(&file.path, &file.content, language)?;
    if parsed.has_errors() {
        tracing::debug!("{}: syntax errors, collecting what parsed", file.path);
    }

    let profile = &language.profile;
    let delimiter = profile.namespace_delimiter;

    let declaration_captures = parsed.captures(language.declarations.as_ref());
    let entries = extract_declarations(&declaration_captures, profile, &file.path);

    let mut imports = ImportTable::new();
    collect_imports(
        &parsed.captures(language.imports.as_ref()),
        delimiter,
        &file.path,
        &mut imports,
    );
    collect_grouped_imports(
        &parsed.captures(language.grouped_imports.as_ref()),
        delimiter,
        &file.path,
        &mut imports,
    );

    if !imports.is_empty() {
        tracing::debug!("{}: {} imports", file.path, imports.len());
    }

    Ok(FileFacts {
        path: file.path.clone(),
        language: language.id(),
        entries,
        imports,
        usage_captures: parsed.captures(language.usages.as_ref()),
    })
}

//! Import resolution
//!
//! Builds a per-file lookup table from import captures. The table is a plain
//! value handed to the usage builder; nothing outlives the file's pass.

use crate::syntax::Capture;
use crate::usage::ImportReference;
use std::collections::HashMap;

/// The imports of one file, reachable by suffix or alias
#[derive(Debug, Clone, Default)]
pub struct ImportTable {
    references: Vec<ImportReference>,
    by_key: HashMap<String, usize>,
}

impl ImportTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the import a name's first segment refers to
    pub fn resolve(&self, key: &str) -> Option<&ImportReference> {
        self.by_key.get(key).map(|&i| &self.references[i])
    }

    /// All imports in statement order
    pub fn references(&self) -> &[ImportReference] {
        &self.references
    }

    pub fn len(&self) -> usize {
        self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    /// Add an import keyed by its alias, or its suffix when it has none
    pub fn push(&mut self, reference: ImportReference) {
        let index = self.references.len();
        self.by_key.insert(reference.lookup_key().to_string(), index);
        self.references.push(reference);
    }

    /// Alias the most recent import: the alias replaces the previous key.
    fn alias_last(&mut self, alias: &str) {
        let Some(index) = self.references.len().checked_sub(1) else {
            return;
        };
        let previous = self.references[index].lookup_key().to_string();
        if self.by_key.get(&previous) == Some(&index) {
            self.by_key.remove(&previous);
        }
        if alias.is_empty() {
            return;
        }
        self.references[index].alias = alias.to_string();
        self.by_key.insert(alias.to_string(), index);
    }
}

/// `as Foo` / `Foo`: the alias is the last whitespace-separated token
fn alias_token(text: &str) -> &str {
    text.split_whitespace().last().unwrap_or("")
}

/// Collect simple import statements.
///
/// An `namespace_use_alias_prefix` capture applies to the next import, a
/// `namespace_use_alias_suffix` capture to the previous one.
pub fn collect_imports(captures: &[Capture], delimiter: &str, source: &str, table: &mut ImportTable) {
    let mut pending_alias: Option<&str> = None;

    for capture in captures {
        match capture.name.as_str() {
            "namespace_use_alias_prefix" => pending_alias = Some(alias_token(&capture.text)),
            "namespace_use_alias_suffix" => table.alias_last(alias_token(&capture.text)),
            "namespace_use" => {
                table.push(ImportReference::new(capture.text.trim(), delimiter, source));
                if let Some(alias) = pending_alias.take() {
                    table.alias_last(alias);
                }
            }
            _ => {}
        }
    }
}

/// Collect grouped imports (`use NS\{X, Y as Z};`).
///
/// Each item joins the group header preceding it; an alias capture applies to
/// the item right before it.
pub fn collect_grouped_imports(
    captures: &[Capture],
    delimiter: &str,
    source: &str,
    table: &mut ImportTable,
) {
    let mut group: Option<&str> = None;

    for capture in captures {
        match capture.name.as_str() {
            "namespace_use_group_name" => {
                group = Some(capture.text.trim().trim_end_matches(delimiter));
            }
            "namespace_use_item_name" => {
                let Some(header) = group else {
                    tracing::debug!("{}: group item without header: {}", source, capture.text);
                    continue;
                };
                let item = capture.text.trim().trim_start_matches(delimiter);
                let used_namespace = format!("{}{}{}", header, delimiter, item);
                table.push(ImportReference::new(used_namespace, delimiter, source));
            }
            "namespace_use_alias_suffix" => table.alias_last(alias_token(&capture.text)),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cap(name: &str, text: &str) -> Capture {
        Capture::new(name, text, 1, 0, 0)
    }

    #[test]
    fn test_simple_imports_keyed_by_suffix() {
        let mut table = ImportTable::new();
        collect_imports(
            &[cap("namespace_use", "System.Text"), cap("namespace_use", "NS")],
            ".",
            "A.cs",
            &mut table,
        );

        assert_eq!(table.len(), 2);
        assert_eq!(table.resolve("Text").unwrap().used_namespace, "System.Text");
        assert_eq!(table.resolve("NS").unwrap().source, "A.cs");
        assert!(table.resolve("System").is_none());
    }

    #[test]
    fn test_alias_prefix_replaces_suffix_key() {
        let mut table = ImportTable::new();
        collect_imports(
            &[
                cap("namespace_use_alias_prefix", "Txt"),
                cap("namespace_use", "System.Text"),
                cap("namespace_use", "System.IO"),
            ],
            ".",
            "A.cs",
            &mut table,
        );

        assert_eq!(table.resolve("Txt").unwrap().used_namespace, "System.Text");
        assert!(table.resolve("Text").is_none());
        // prefix applies to one import only
        assert_eq!(table.resolve("IO").unwrap().alias, "");
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_alias_suffix_replaces_suffix_key() {
        let mut table = ImportTable::new();
        collect_imports(
            &[
                cap("namespace_use", "App\\Models\\User"),
                cap("namespace_use_alias_suffix", "Account"),
            ],
            "\\",
            "a.php",
            &mut table,
        );

        assert_eq!(table.resolve("Account").unwrap().used_namespace, "App\\Models\\User");
        assert!(table.resolve("User").is_none());
    }

    #[test]
    fn test_grouped_import_with_alias() {
        // use NS\{X, Y as Z};
        let mut table = ImportTable::new();
        collect_grouped_imports(
            &[
                cap("namespace_use_group_name", "NS"),
                cap("namespace_use_item_name", "X"),
                cap("namespace_use_item_name", "Y"),
                cap("namespace_use_alias_suffix", "as Z"),
            ],
            "\\",
            "a.php",
            &mut table,
        );

        let references = table.references();
        assert_eq!(references.len(), 2);
        assert_eq!(references[0].namespace_suffix, "X");
        assert_eq!(references[0].alias, "");
        assert_eq!(references[1].used_namespace, "NS\\Y");
        assert_eq!(references[1].alias, "Z");

        assert_eq!(table.resolve("X").unwrap().used_namespace, "NS\\X");
        assert_eq!(table.resolve("Z").unwrap().used_namespace, "NS\\Y");
        assert!(table.resolve("Y").is_none());
    }

    #[test]
    fn test_grouped_alias_before_later_items() {
        // use NS\{Y as Z, X};
        let mut table = ImportTable::new();
        collect_grouped_imports(
            &[
                cap("namespace_use_group_name", "NS\\"),
                cap("namespace_use_item_name", "Y"),
                cap("namespace_use_alias_suffix", "Z"),
                cap("namespace_use_item_name", "X"),
            ],
            "\\",
            "a.php",
            &mut table,
        );

        assert_eq!(table.resolve("Z").unwrap().used_namespace, "NS\\Y");
        assert_eq!(table.resolve("X").unwrap().used_namespace, "NS\\X");
    }

    #[test]
    fn test_aliased_import_resolves_like_plain_import() {
        let delimiter = ".";
        let mut plain = ImportTable::new();
        collect_imports(&[cap("namespace_use", "Lib.A")], delimiter, "a.cs", &mut plain);

        let mut aliased = ImportTable::new();
        collect_imports(
            &[cap("namespace_use_alias_prefix", "B"), cap("namespace_use", "Lib.A")],
            delimiter,
            "a.cs",
            &mut aliased,
        );

        assert_eq!(
            plain.resolve("A").unwrap().used_namespace,
            aliased.resolve("B").unwrap().used_namespace
        );
    }
}

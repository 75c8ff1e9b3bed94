//! Usage candidate building
//!
//! Each usage site is resolved against the file's import table. A hit yields
//! one candidate; a miss yields every plausible FQTN (literal, same namespace,
//! ancestor namespaces, crossed with imports) and leaves it to the global
//! index to tell which one exists.

use super::imports::ImportTable;
use crate::language::LanguageProfile;
use crate::namespace::NamespaceEntry;
use crate::syntax::Capture;
use crate::usage::{UnresolvedCallExpression, UsageCandidate, UsageType};
use std::collections::HashSet;

/// Tuning for candidate generation
#[derive(Debug, Clone, Copy, Default)]
pub struct UsageOptions {
    /// Ancestor namespaces to try, nearest first; `None` walks to the root
    pub max_ancestor_depth: Option<usize>,
}

/// Output of one file's usage pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileUsages {
    pub candidates: Vec<UsageCandidate>,
    pub unresolved: Vec<UnresolvedCallExpression>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SiteKind {
    QualifiedName,
    CallExpression,
}

/// One usage site: query capture or injected base type
#[derive(Debug, Clone)]
struct UsageSite<'a> {
    kind: SiteKind,
    text: &'a str,
    usage_type: UsageType,
    /// FQTN of the declaring type for injected bases
    source_fqtn: Option<&'a str>,
}

/// Builds usage candidates for one file
pub struct UsageCandidateBuilder<'a> {
    profile: &'a LanguageProfile,
    imports: &'a ImportTable,
    entries: &'a [NamespaceEntry],
    source: &'a str,
    options: UsageOptions,
}

impl<'a> UsageCandidateBuilder<'a> {
    /// Create a builder over a file's own declarations and imports
    pub fn new(
        profile: &'a LanguageProfile,
        imports: &'a ImportTable,
        entries: &'a [NamespaceEntry],
        source: &'a str,
    ) -> Self {
        Self {
            profile,
            imports,
            entries,
            source,
            options: UsageOptions::default(),
        }
    }

    pub fn with_options(mut self, options: UsageOptions) -> Self {
        self.options = options;
        self
    }

    /// Resolve every usage site of the file.
    ///
    /// Sites are deduplicated by their exact text: the first occurrence of a
    /// text decides its role, later occurrences are skipped.
    pub fn build(&self, captures: &'a [Capture]) -> FileUsages {
        let mut usages = FileUsages::default();

        // no declared type, nothing to attribute usages to
        let Some(first_entry) = self.entries.first() else {
            return usages;
        };

        let mut processed: HashSet<String> = HashSet::new();

        for site in self.sites(captures) {
            if !processed.insert(site.text.to_string()) {
                continue;
            }

            let from = site
                .source_fqtn
                .and_then(|fqtn| self.entries.iter().find(|e| e.fqtn == fqtn))
                .unwrap_or(first_entry);

            self.resolve_site(&site, from, &mut processed, &mut usages);
        }

        tracing::debug!(
            "{}: {} candidates, {} unresolved call expressions",
            self.source,
            usages.candidates.len(),
            usages.unresolved.len()
        );

        usages
    }

    /// Inheritance names first, then query captures in document order
    fn sites(&self, captures: &'a [Capture]) -> Vec<UsageSite<'a>> {
        let mut sites = Vec::new();

        for entry in self.entries {
            for implemented in &entry.implemented_classes {
                sites.push(UsageSite {
                    kind: SiteKind::QualifiedName,
                    text: implemented,
                    usage_type: UsageType::Implements,
                    source_fqtn: Some(&entry.fqtn),
                });
            }
            if let Some(extended) = &entry.extended_class {
                sites.push(UsageSite {
                    kind: SiteKind::QualifiedName,
                    text: extended,
                    usage_type: UsageType::Extends,
                    source_fqtn: Some(&entry.fqtn),
                });
            }
        }

        for capture in captures {
            let kind = match capture.name.as_str() {
                "qualified_name" => SiteKind::QualifiedName,
                "call_expression" => SiteKind::CallExpression,
                _ => continue,
            };
            sites.push(UsageSite {
                kind,
                text: &capture.text,
                usage_type: UsageType::Usage,
                source_fqtn: None,
            });
        }

        sites
    }

    fn resolve_site(
        &self,
        site: &UsageSite<'_>,
        from: &NamespaceEntry,
        processed: &mut HashSet<String>,
        usages: &mut FileUsages,
    ) {
        let delimiter = self.profile.namespace_delimiter;
        let is_call = site.kind == SiteKind::CallExpression;
        let drops_member = is_call && self.profile.call_shares_namespace_delimiter();

        let text = if is_call {
            strip_arguments(site.text)
        } else {
            site.text.trim().to_string()
        };
        let text = text.strip_prefix(delimiter).unwrap_or(&text);

        let mut segments: Vec<&str> = text
            .split(delimiter)
            .map(|segment| self.clean_segment(segment))
            .collect();
        let cleaned = segments.join(delimiter);

        let site_start = usages.candidates.len();
        let mut emit = |used_namespace: String| {
            let candidate = UsageCandidate {
                used_namespace,
                from_namespace: from.fqtn.clone(),
                source: self.source.to_string(),
                usage_type: site.usage_type,
            };
            if !usages.candidates[site_start..].contains(&candidate) {
                usages.candidates.push(candidate);
            }
        };

        if let Some(import) = self.imports.resolve(segments[0]) {
            let mut rest = segments.split_off(1);
            if drops_member {
                rest.pop();
            }
            let remainder = rest.join(delimiter);
            processed.insert(remainder.clone());

            if is_invalid_type_name(&remainder) {
                return;
            }

            if remainder.is_empty() {
                emit(import.used_namespace.clone());
            } else {
                emit(format!("{}{}{}", import.used_namespace, delimiter, remainder));
            }
            return;
        }

        if drops_member {
            segments.pop();
        }
        let name = segments.join(delimiter);
        processed.insert(name.clone());

        if is_invalid_type_name(&name) {
            return;
        }

        if is_call {
            usages.unresolved.push(UnresolvedCallExpression {
                chain: cleaned.clone(),
                namespace_delimiter: delimiter.to_string(),
                variable_name_included: self.profile.call_shares_namespace_delimiter(),
            });
        }

        if name.is_empty() {
            return;
        }

        // literal
        emit(name.clone());

        // same namespace
        if !from.namespace.is_empty() {
            emit(format!("{}{}{}", from.namespace, delimiter, name));
        }

        // ancestors, nearest first
        let mut parts: Vec<&str> = from.namespace.split(delimiter).collect();
        let mut depth = 0;
        while parts.len() > 1 {
            if self.options.max_ancestor_depth.is_some_and(|max| depth >= max) {
                break;
            }
            parts.pop();
            depth += 1;
            emit(format!("{}{}{}", parts.join(delimiter), delimiter, name));
        }

        // every import crossed with the name
        if self.profile.indirect_referencing {
            for import in self.imports.references() {
                emit(format!("{}{}{}", import.used_namespace, delimiter, name));
            }
        }
    }

    /// Strip one configured decoration (`Foo[]`, `Foo?`) from a segment
    fn clean_segment<'s>(&self, segment: &'s str) -> &'s str {
        for suffix in self.profile.strip_suffixes {
            if let Some(stripped) = segment.strip_suffix(suffix) {
                return stripped;
            }
        }
        segment
    }
}

/// Remove argument lists and whitespace from a call chain:
/// `b.Method(x, y)\n    .Other` becomes `b.Method.Other`.
/// Parentheses inside string and char literals of an argument list don't count.
fn strip_arguments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for c in text.chars() {
        if let Some(open) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == open {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' if depth > 0 => quote = Some(c),
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            c if depth == 0 && !c.is_whitespace() => out.push(c),
            _ => {}
        }
    }
    out
}

/// Names with whitespace or generic arguments cannot be type paths
fn is_invalid_type_name(name: &str) -> bool {
    name.contains(' ') || name.contains('<')
}

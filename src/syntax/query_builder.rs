//! Query builder
//!
//! A query pack may contain patterns written for several grammar revisions.
//! Every top-level pattern is compiled on its own first; patterns the grammar
//! rejects are dropped with a warning and the survivors are compiled together.

use tree_sitter::{Language, Query};

/// Builds a tree-sitter query from pattern statements, skipping broken ones
pub struct QueryBuilder<'a> {
    language: &'a Language,
    statements: Vec<String>,
}

impl<'a> QueryBuilder<'a> {
    /// Create a builder for a grammar
    pub fn new(language: &'a Language) -> Self {
        Self {
            language,
            statements: Vec::new(),
        }
    }

    /// Add every top-level pattern of a `.scm` source
    pub fn with_source(mut self, source: &str) -> Self {
        self.statements
            .extend(split_patterns(source).into_iter().map(str::to_string));
        self
    }

    /// Add a single pattern statement
    pub fn with_statement(mut self, statement: impl Into<String>) -> Self {
        self.statements.push(statement.into());
        self
    }

    /// Compile the statements that the grammar accepts.
    ///
    /// Returns `None` when no statement survives.
    pub fn build(&self) -> Option<Query> {
        let accepted: Vec<&str> = self
            .statements
            .iter()
            .filter(|statement| match Query::new(self.language, statement) {
                Ok(_) => true,
                Err(e) => {
                    tracing::warn!("Skipping query pattern: {} ({})", first_line(statement), e);
                    false
                }
            })
            .map(String::as_str)
            .collect();

        if accepted.is_empty() {
            return None;
        }

        match Query::new(self.language, &accepted.join("\n")) {
            Ok(query) => Some(query),
            Err(e) => {
                tracing::warn!("Accepted patterns failed to compile together: {}", e);
                None
            }
        }
    }
}

fn first_line(statement: &str) -> &str {
    statement.lines().next().unwrap_or(statement).trim()
}

/// Split a query source into its top-level patterns.
///
/// A pattern starts at a `(` or `[` at nesting depth zero and owns everything
/// up to the next such opener, so trailing captures and quantifiers stay
/// attached. Comments and string literals are skipped.
pub fn split_patterns(source: &str) -> Vec<&str> {
    let mut starts = Vec::new();
    let mut depth = 0usize;
    let mut chars = source.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        match c {
            ';' => {
                // comment runs to end of line
                while let Some(&(_, next)) = chars.peek() {
                    if next == '\n' {
                        break;
                    }
                    chars.next();
                }
            }
            '"' => {
                while let Some((_, next)) = chars.next() {
                    match next {
                        '\\' => {
                            chars.next();
                        }
                        '"' => break,
                        _ => {}
                    }
                }
            }
            '(' | '[' => {
                if depth == 0 {
                    starts.push(i);
                }
                depth += 1;
            }
            ')' | ']' => {
                depth = depth.saturating_sub(1);
            }
            _ => {}
        }
    }

    starts
        .iter()
        .enumerate()
        .map(|(n, &start)| {
            let end = starts.get(n + 1).copied().unwrap_or(source.len());
            strip_trailing_comments(&source[start..end])
        })
        .filter(|pattern| !pattern.is_empty())
        .collect()
}

/// Drop whole comment lines that trail a pattern (they belong to the next one)
fn strip_trailing_comments(pattern: &str) -> &str {
    let mut end = 0;
    let mut offset = 0;
    for line in pattern.split_inclusive('\n') {
        let trimmed = line.trim();
        if !trimmed.is_empty() && !trimmed.starts_with(';') {
            end = offset + line.len();
        }
        offset += line.len();
    }
    pattern[..end].trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn csharp() -> Language {
        tree_sitter_c_sharp::LANGUAGE.into()
    }

    #[test]
    fn test_split_patterns_keeps_trailing_captures() {
        let source = r#"
; a comment with (parens)
(class_declaration
  name: (identifier) @class_name) @class_definition

; second
(member_access_expression) @call_expression
[(identifier) (qualified_name)] @name
"#;
        let patterns = split_patterns(source);

        assert_eq!(patterns.len(), 3);
        assert!(patterns[0].starts_with("(class_declaration"));
        assert!(patterns[0].ends_with("@class_definition"));
        assert_eq!(patterns[1], "(member_access_expression) @call_expression");
        assert!(patterns[2].starts_with('['));
    }

    #[test]
    fn test_split_patterns_ignores_parens_in_strings() {
        let source = r#"((modifier) @m (#eq? @m "(")) (identifier) @i"#;
        let patterns = split_patterns(source);

        assert_eq!(patterns.len(), 2);
        assert_eq!(patterns[1], "(identifier) @i");
    }

    #[test]
    fn test_build_skips_invalid_patterns() {
        let language = csharp();
        let query = QueryBuilder::new(&language)
            .with_statement("(class_declaration name: (identifier) @class_name)")
            .with_statement("(no_such_node_kind) @broken")
            .build()
            .expect("valid pattern should survive");

        assert_eq!(query.pattern_count(), 1);
        assert_eq!(query.capture_names(), &["class_name"]);
    }

    #[test]
    fn test_build_without_valid_patterns() {
        let language = csharp();

        assert!(QueryBuilder::new(&language).build().is_none());
        assert!(QueryBuilder::new(&language)
            .with_statement("(no_such_node_kind) @broken")
            .build()
            .is_none());
    }
}

//! Parsed source files

use crate::language::{CompiledLanguage, LanguageId};
use crate::{Error, Result};
use super::capture::{Capture, collect_captures};
use tree_sitter::{Parser, Query, Tree};

/// A source file before parsing: an opaque path key and its text
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: String,
    pub content: String,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// A file with its syntax tree
pub struct ParsedFile {
    pub path: String,
    pub language: LanguageId,
    pub source: String,
    tree: Tree,
}

impl ParsedFile {
    /// Parse source text with the grammar of a language
    pub fn parse(path: &str, source: &str, language: &CompiledLanguage) -> Result<Self> {
        let mut parser = Parser::new();
        parser.set_language(&language.profile.grammar)?;

        let tree = parser
            .parse(source, None)
            .ok_or_else(|| Error::Parse(format!("Failed to parse {}", path)))?;

        Ok(Self {
            path: path.to_string(),
            language: language.id(),
            source: source.to_string(),
            tree,
        })
    }

    /// Run a compiled query; a language without that query yields no captures
    pub fn captures(&self, query: Option<&Query>) -> Vec<Capture> {
        match query {
            Some(query) => collect_captures(query, self.tree.root_node(), &self.source),
            None => Vec::new(),
        }
    }

    /// Whether the tree contains syntax errors
    pub fn has_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }
}

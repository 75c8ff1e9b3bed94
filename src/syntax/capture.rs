//! Query captures as plain data

use serde::Serialize;
use std::collections::HashSet;
use tree_sitter::{Node, Query, QueryCursor};

/// One capture of a query match: capture name, node text and position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Capture {
    pub name: String,
    pub text: String,
    /// 1-based line of the node start
    pub start_line: u32,
    pub start_byte: usize,
    pub end_byte: usize,
}

impl Capture {
    /// Create a capture
    pub fn new(
        name: impl Into<String>,
        text: impl Into<String>,
        start_line: u32,
        start_byte: usize,
        end_byte: usize,
    ) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            start_line,
            start_byte,
            end_byte,
        }
    }

    /// Whether this capture's node span encloses a byte offset
    pub fn encloses(&self, byte: usize) -> bool {
        self.start_byte <= byte && byte < self.end_byte
    }

    /// Span length in bytes
    pub fn span_len(&self) -> usize {
        self.end_byte - self.start_byte
    }
}

/// Run a query and return its captures in document order.
///
/// A node captured under the same name by several patterns is reported once.
pub fn collect_captures(query: &Query, root: Node<'_>, source: &str) -> Vec<Capture> {
    let names = query.capture_names();
    let mut cursor = QueryCursor::new();
    let mut seen = HashSet::new();
    let mut captures = Vec::new();

    for (query_match, index) in cursor.captures(query, root, source.as_bytes()) {
        let capture = query_match.captures[index];
        let node = capture.node;
        let name = names[capture.index as usize];

        if !seen.insert((name, node.start_byte(), node.end_byte())) {
            continue;
        }

        let text = node.utf8_text(source.as_bytes()).unwrap_or("");
        captures.push(Capture::new(
            name,
            text,
            node.start_position().row as u32 + 1,
            node.start_byte(),
            node.end_byte(),
        ));
    }

    captures
}

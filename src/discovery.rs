//! Source discovery
//!
//! Walks a sources root honouring `.gitignore`, `.ignore` and configured
//! exclusions, keeping files some registered language claims.

use crate::language::LanguageRegistry;
use crate::{Error, Result};
use ignore::WalkBuilder;
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::path::{Path, PathBuf};

/// Gitignore matcher for the sources root plus configured exclusions
#[derive(Clone)]
pub struct IgnoreFilter {
    inner: Gitignore,
}

impl IgnoreFilter {
    pub fn new(root: &Path, exclusions: &[String]) -> Self {
        let mut builder = GitignoreBuilder::new(root);

        builder.add(root.join(".gitignore"));
        builder.add(root.join(".ignore"));

        for pattern in [".git/", ".svn/", ".hg/"] {
            builder.add_line(None, pattern).ok();
        }

        for pattern in exclusions {
            if let Err(e) = builder.add_line(None, pattern) {
                tracing::warn!("Ignoring invalid exclusion {}: {}", pattern, e);
            }
        }

        Self {
            inner: builder.build().unwrap_or_else(|_| Gitignore::empty()),
        }
    }

    pub fn is_ignored(&self, path: &Path, is_dir: bool) -> bool {
        self.inner.matched(path, is_dir).is_ignore()
    }
}

/// Find every supported source file under `root`, sorted by path.
///
/// A `root` that is itself a supported file yields just that file.
pub fn discover(root: &Path, registry: &LanguageRegistry, exclusions: &[String]) -> Result<Vec<PathBuf>> {
    if root.is_file() {
        return Ok(registry
            .find_by_path(root)
            .map(|_| vec![root.to_path_buf()])
            .unwrap_or_default());
    }
    if !root.is_dir() {
        return Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("sources not found: {}", root.display()),
        )));
    }

    let filter = IgnoreFilter::new(root, exclusions);
    let walker = WalkBuilder::new(root)
        .hidden(false)
        .git_ignore(true)
        .require_git(false)
        .follow_links(false)
        .filter_entry(move |entry| {
            let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
            !filter.is_ignored(entry.path(), is_dir)
        })
        .build();

    let mut files = Vec::new();
    for entry in walker {
        match entry {
            Ok(entry) => {
                let path = entry.path();
                if entry.file_type().is_some_and(|t| t.is_file()) && registry.find_by_path(path).is_some() {
                    files.push(path.to_path_buf());
                }
            }
            Err(e) => tracing::warn!("Skipping unreadable entry: {}", e),
        }
    }

    files.sort();
    tracing::debug!("Discovered {} source files under {}", files.len(), root.display());
    Ok(files)
}

/// The path key a file is reported under
pub fn display_path(path: &Path, root: &Path, relative: bool) -> String {
    let shown = if relative {
        match path.strip_prefix(root) {
            Ok(stripped) if !stripped.as_os_str().is_empty() => stripped,
            _ => path.file_name().map(Path::new).unwrap_or(path),
        }
    } else {
        path
    };
    shown.to_string_lossy().replace('\\', "/")
}

//! Resolution pipeline
//!
//! Phase 1 parses every file in parallel and collects its declarations,
//! imports and usage captures. The global index is then built in path order.
//! Phase 2 turns usages into direct relationships against the frozen index,
//! phase 3 follows call-expression chains. A failing file is reported and
//! left out; the rest of the batch goes on.

use crate::collector::{FileFacts, UsageOptions, collect_file};
use crate::config::CoupletConfig;
use crate::coupling::{self, CouplingMetrics};
use crate::discovery::{discover, display_path};
use crate::index::GlobalIndex;
use crate::language::{LanguageRegistry, default_registry};
use crate::linker::{CallExpressionResolver, DependencyLinker, LinkerStats};
use crate::relationship::{DependencyTree, Relationship, RelationshipKey, flatten};
use crate::syntax::SourceFile;
use crate::usage::UnresolvedCallExpression;
use crate::{Error, Result};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// A file that could not be processed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileError {
    pub path: String,
    pub message: String,
}

impl FileError {
    pub fn new(path: impl Into<String>, error: impl std::fmt::Display) -> Self {
        Self {
            path: path.into(),
            message: error.to_string(),
        }
    }
}

/// Everything one run produces
#[derive(Debug, Clone, Default, Serialize)]
pub struct PipelineReport {
    /// Final relationship set, sorted and duplicate-free
    pub relationships: Vec<Relationship>,
    pub coupling: BTreeMap<String, CouplingMetrics>,
    pub errors: Vec<FileError>,
    pub stats: LinkerStats,
}

/// Phase 2 output for one file
struct LinkedFile {
    path: String,
    candidates: usize,
    relationships: Vec<Relationship>,
    unresolved: Vec<UnresolvedCallExpression>,
}

pub struct Pipeline {
    registry: LanguageRegistry,
    options: UsageOptions,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(default_registry())
    }
}

impl Pipeline {
    /// Create a pipeline over a language registry
    pub fn new(registry: LanguageRegistry) -> Self {
        Self {
            registry,
            options: UsageOptions::default(),
        }
    }

    /// Create a pipeline with the built-in languages, tuned by a config
    pub fn from_config(config: &CoupletConfig) -> Self {
        Self::default().with_options(UsageOptions {
            max_ancestor_depth: config.max_ancestor_depth,
        })
    }

    pub fn with_options(mut self, options: UsageOptions) -> Self {
        self.options = options;
        self
    }

    pub fn registry(&self) -> &LanguageRegistry {
        &self.registry
    }

    /// Discover, read and resolve every supported file under `root`
    pub fn run_path(&self, root: &Path, config: &CoupletConfig) -> Result<PipelineReport> {
        let paths = discover(root, &self.registry, &config.exclusions)?;
        tracing::info!("Resolving {} files under {}", paths.len(), root.display());

        let loaded: Vec<std::result::Result<SourceFile, FileError>> = paths
            .par_iter()
            .map(|path| {
                let key = display_path(path, root, config.relative_paths);
                match std::fs::read(path) {
                    Ok(bytes) => Ok(SourceFile::new(key, String::from_utf8_lossy(&bytes))),
                    Err(e) => Err(FileError::new(key, Error::Io(e))),
                }
            })
            .collect();

        let (files, read_errors): (Vec<_>, Vec<_>) = loaded.into_iter().partition(|r| r.is_ok());
        let files: Vec<SourceFile> = files.into_iter().filter_map(|r| r.ok()).collect();
        let read_errors: Vec<FileError> = read_errors.into_iter().filter_map(|r| r.err()).collect();

        let mut report = self.run(&files);
        report.stats.files += read_errors.len();
        report.stats.failed_files += read_errors.len();
        report.errors.extend(read_errors);
        report.errors.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(report)
    }

    /// Resolve a set of in-memory files
    pub fn run(&self, files: &[SourceFile]) -> PipelineReport {
        let mut sorted: Vec<&SourceFile> = files.iter().collect();
        sorted.sort_by(|a, b| a.path.cmp(&b.path));

        // phase 1
        let collected: Vec<std::result::Result<FileFacts, FileError>> = sorted
            .par_iter()
            .map(|file| self.collect(file))
            .collect();

        let mut facts = Vec::new();
        let mut errors = Vec::new();
        for result in collected {
            match result {
                Ok(f) => facts.push(f),
                Err(e) => {
                    tracing::warn!("{}: {}", e.path, e.message);
                    errors.push(e);
                }
            }
        }

        let index = GlobalIndex::build(facts.iter().flat_map(|f| f.entries.iter()));

        // phase 2
        let linker = DependencyLinker::new(&index.namespaces);
        let linked: Vec<LinkedFile> = facts
            .par_iter()
            .filter_map(|f| {
                let language = self.registry.get(f.language)?;
                let usages = f.usages(language, self.options);
                Some(LinkedFile {
                    path: f.path.clone(),
                    candidates: usages.candidates.len(),
                    relationships: linker.link(&f.entries, f.language, &usages.candidates),
                    unresolved: usages.unresolved,
                })
            })
            .collect();

        let mut stats = LinkerStats {
            files: files.len(),
            failed_files: errors.len(),
            declarations: index.namespaces.len(),
            ..Default::default()
        };

        let mut tree = DependencyTree::new();
        let mut unresolved: Vec<(String, Vec<UnresolvedCallExpression>)> = Vec::new();
        for file in linked {
            stats.candidates += file.candidates;
            stats.direct += file.relationships.len();
            stats.unresolved_call_expressions += file.unresolved.len();
            if !file.unresolved.is_empty() {
                unresolved.push((file.path.clone(), file.unresolved));
            }
            tree.insert(file.path, file.relationships);
        }

        // phase 3
        let resolver = CallExpressionResolver::new(&index, &tree);
        let transitive: Vec<(String, Vec<Relationship>)> = unresolved
            .par_iter()
            .map(|(path, chains)| {
                let mut seen: HashSet<RelationshipKey> = tree
                    .get(path)
                    .map(|rels| rels.iter().map(Relationship::key).collect())
                    .unwrap_or_default();
                (path.clone(), resolver.resolve_file(path, chains, &mut seen))
            })
            .collect();

        for (path, found) in transitive {
            stats.transitive += found.len();
            tree.entry(path).or_default().extend(found);
        }

        let relationships = flatten(&tree);
        let coupling = coupling::compute(&relationships);

        tracing::info!(
            "Resolved {} relationships ({} direct, {} transitive) across {} files",
            relationships.len(),
            stats.direct,
            stats.transitive,
            stats.files
        );

        PipelineReport {
            relationships,
            coupling,
            errors,
            stats,
        }
    }

    fn collect(&self, file: &SourceFile) -> std::result::Result<FileFacts, FileError> {
        let language = self
            .registry
            .find_by_path(Path::new(&file.path))
            .ok_or_else(|| FileError::new(&file.path, Error::UnsupportedLanguage(file.path.clone())))?;

        collect_file(file, language).map_err(|e| FileError::new(&file.path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usage::UsageType;
    use tempfile::TempDir;

    fn scenario() -> Vec<SourceFile> {
        vec![
            SourceFile::new(
                "A.cs",
                r#"using NS;

namespace App
{
    public class A
    {
        public void Run()
        {
            NS.B b = new NS.B();
            var d = b.Method().Other;
        }
    }
}
"#,
            ),
            SourceFile::new(
                "B.cs",
                r#"namespace NS
{
    public class B
    {
        public C Method() { return new C(); }
    }
}
"#,
            ),
            SourceFile::new(
                "C.cs",
                r#"namespace NS
{
    public class C
    {
        public D Other { get; set; }
    }
}
"#,
            ),
            SourceFile::new("D.cs", "namespace NS\n{\n    public class D\n    {\n    }\n}\n"),
        ]
    }

    fn edges(report: &PipelineReport) -> Vec<(&str, &str)> {
        report
            .relationships
            .iter()
            .map(|r| (r.from_fqtn.as_str(), r.to_fqtn.as_str()))
            .collect()
    }

    #[test]
    fn test_end_to_end_transitive() {
        let report = Pipeline::default().run(&scenario());
        let edges = edges(&report);

        assert!(report.errors.is_empty());
        assert!(edges.contains(&("App.A", "NS.B")));
        assert!(edges.contains(&("App.A", "NS.D")));
        assert!(edges.contains(&("NS.B", "NS.C")));
        assert!(edges.contains(&("NS.C", "NS.D")));
        assert!(report.stats.transitive >= 1);

        let direct = report
            .relationships
            .iter()
            .find(|r| r.to_fqtn == "NS.B")
            .unwrap();
        assert_eq!(direct.usage_type, UsageType::Usage);
        assert_eq!(direct.from_file, "A.cs");
        assert_eq!(direct.to_file, "B.cs");
    }

    #[test]
    fn test_run_twice_is_idempotent() {
        let pipeline = Pipeline::default();
        let mut files = scenario();

        let first = pipeline.run(&files);
        files.reverse();
        let second = pipeline.run(&files);

        assert_eq!(first.relationships, second.relationships);
        assert_eq!(first.coupling, second.coupling);
    }

    #[test]
    fn test_unsupported_file_is_isolated() {
        let mut files = scenario();
        files.push(SourceFile::new("notes.txt", "namespace nothing"));

        let report = Pipeline::default().run(&files);

        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].path, "notes.txt");
        assert!(edges(&report).contains(&("App.A", "NS.B")));
        assert_eq!(report.stats.failed_files, 1);
    }

    #[test]
    fn test_duplicate_fqtn_first_file_wins() {
        let files = vec![
            SourceFile::new("a/Dup.cs", "namespace NS { public class Dup { } }"),
            SourceFile::new("b/Dup.cs", "namespace NS { public class Dup { } }"),
            SourceFile::new("User.cs", "namespace NS { public class User { Dup d; } }"),
        ];

        let report = Pipeline::default().run(&files);
        let to_dup: Vec<_> = report
            .relationships
            .iter()
            .filter(|r| r.to_fqtn == "NS.Dup")
            .collect();

        assert_eq!(to_dup.len(), 1);
        assert_eq!(to_dup[0].to_file, "a/Dup.cs");
    }

    #[test]
    fn test_run_path_relative_keys() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        for file in scenario() {
            std::fs::write(dir.path().join(&file.path), &file.content).unwrap();
        }
        std::fs::create_dir_all(dir.path().join("node_modules")).unwrap();
        std::fs::write(dir.path().join("node_modules/X.cs"), "namespace NS { class X {} }").unwrap();

        let config = CoupletConfig {
            relative_paths: true,
            ..Default::default()
        };
        let report = Pipeline::from_config(&config)
            .run_path(dir.path(), &config)
            .expect("Failed to run");

        assert_eq!(report.stats.files, 4);
        assert!(report.coupling.contains_key("A.cs"));
        assert_eq!(report.coupling["D.cs"].efferent, 0);
        assert!(report.coupling["D.cs"].afferent >= 2);
    }
}

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directories skipped unless the configuration says otherwise
pub const DEFAULT_EXCLUSIONS: &[&str] = &["node_modules", ".idea", "dist", "build", "out", "vendor"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoupletConfig {
    /// Gitignore-style patterns excluded from discovery
    pub exclusions: Vec<String>,
    /// Report file paths relative to the sources root
    pub relative_paths: bool,
    /// Cap on ancestor namespaces tried for an unresolved usage
    pub max_ancestor_depth: Option<usize>,
    /// Worker threads, 0 for one per core
    pub threads: usize,
}

impl Default for CoupletConfig {
    fn default() -> Self {
        Self {
            exclusions: DEFAULT_EXCLUSIONS.iter().map(|s| s.to_string()).collect(),
            relative_paths: false,
            max_ancestor_depth: None,
            threads: 0,
        }
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("couplet.toml")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<CoupletConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: CoupletConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &CoupletConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

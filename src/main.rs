//! Couplet CLI - cross-file coupling resolution

use clap::{Parser, Subcommand};
use couplet::Pipeline;
use couplet::config::{self, CoupletConfig};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "couplet")]
#[command(version = "0.0.1")]
#[command(about = "Resolve type-level coupling across a codebase from tree-sitter queries")]
#[command(long_about = r#"
Couplet extracts declarations, imports and usages from every source file and
links them into a dependency graph between declared types, including
relationships reached through chained accessor calls.

Example usage:
  couplet resolve ./src -o coupling.json --relative-paths
  couplet languages
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve relationships and coupling for a directory or file
    Resolve {
        /// Sources root
        sources: PathBuf,

        /// Write the JSON report here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Extra exclusion patterns (comma separated)
        #[arg(short, long, value_delimiter = ',')]
        exclusions: Vec<String>,

        /// Report paths relative to the sources root
        #[arg(long)]
        relative_paths: bool,

        /// Configuration file (defaults to ./couplet.toml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// List supported languages and their file extensions
    Languages,

    /// Write a default couplet.toml
    Init {
        /// Target path
        #[arg(short, long, default_value = "couplet.toml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Resolve {
            sources,
            output,
            exclusions,
            relative_paths,
            config,
        } => {
            let mut settings = config::load_config(config.as_deref())?.unwrap_or_default();
            settings.exclusions.extend(exclusions);
            settings.relative_paths |= relative_paths;

            if settings.threads > 0 {
                if let Err(e) = rayon::ThreadPoolBuilder::new()
                    .num_threads(settings.threads)
                    .build_global()
                {
                    tracing::warn!("Could not size thread pool: {}", e);
                }
            }

            let report = Pipeline::from_config(&settings).run_path(&sources, &settings)?;
            for error in &report.errors {
                tracing::warn!("{}: {}", error.path, error.message);
            }
            tracing::debug!("{}", report.stats);

            let json = serde_json::to_string_pretty(&report)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    tracing::info!("Wrote report to {}", path.display());
                }
                None => println!("{}", json),
            }
        }

        Commands::Languages => {
            let pipeline = Pipeline::default();
            for language in pipeline.registry().languages() {
                let profile = &language.profile;
                println!(
                    "{:<8} {:<24} namespace '{}' call '{}'",
                    profile.id.as_str(),
                    profile.extensions.join(", "),
                    profile.namespace_delimiter,
                    profile.call_delimiter
                );
            }
        }

        Commands::Init { path, force } => {
            config::write_config(&path, &CoupletConfig::default(), force)?;
            println!("Wrote {}", path.display());
        }
    }

    Ok(())
}

//! Run configuration and optional tablecheck.toml overrides.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Configuration for one analysis run: the four input files plus output
/// and processing options. Built by the CLI from arguments and the
/// optional config file.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub tables_file: PathBuf,
    pub objects_file: PathBuf,
    pub table_dependencies_file: PathBuf,
    pub object_dependencies_file: PathBuf,

    /// Where to write the HTML report, if requested.
    pub output_file: Option<PathBuf>,
    pub console_output: bool,
    pub verbose: bool,

    /// Treat inactive dependency edges as active.
    pub include_inactive: bool,
}

impl AnalysisConfig {
    pub fn new(
        tables_file: impl Into<PathBuf>,
        objects_file: impl Into<PathBuf>,
        table_dependencies_file: impl Into<PathBuf>,
        object_dependencies_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            tables_file: tables_file.into(),
            objects_file: objects_file.into(),
            table_dependencies_file: table_dependencies_file.into(),
            object_dependencies_file: object_dependencies_file.into(),
            output_file: None,
            console_output: true,
            verbose: false,
            include_inactive: false,
        }
    }

    /// All four input files, for existence checks.
    pub fn input_files(&self) -> [&Path; 4] {
        [
            &self.tables_file,
            &self.objects_file,
            &self.table_dependencies_file,
            &self.object_dependencies_file,
        ]
    }
}

/// Main configuration structure for tablecheck.toml.
#[derive(Debug, Deserialize, Default)]
pub struct TablecheckConfig {
    /// Treat inactive dependency edges as active.
    pub include_inactive: Option<bool>,
    /// Output configuration.
    pub output: Option<OutputConfig>,
}

/// Output format configuration.
#[derive(Debug, Deserialize, Default)]
pub struct OutputConfig {
    /// Output format: "plain", "json" or "html".
    pub format: Option<String>,
}

/// Loads configuration from tablecheck.toml if it exists.
pub fn load_config(root: &Path) -> Result<Option<TablecheckConfig>> {
    let path = root.join("tablecheck.toml");
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(&path)?;
    let cfg = toml::from_str(&content).context("Invalid tablecheck.toml")?;
    Ok(Some(cfg))
}

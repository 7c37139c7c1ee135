//! Configuration handling for cmddocs
//!
//! Settings live in `cmddocs.toml`. Every field has a default, so a missing
//! file or an empty one describes the standard Atlas CLI doc build.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use cmddocs_core::{FirstClassPlugin, LongTextTable, Metadata, PluginRegistry, TransformConfig};

use crate::error::DocsError;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "cmddocs.toml";

/// Default output directory for generated pages.
pub const DEFAULT_OUTPUT_DIR: &str = "./docs/command";

/// Default root command name.
pub const DEFAULT_ROOT_NAME: &str = "atlas";

/// Subdirectory of the output directory receiving example include files.
pub const INCLUDES_DIR: &str = "includes";

/// cmddocs configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub docs: DocsConfig,

    /// First-class plugins; replaces the builtin list when present.
    #[serde(default = "PluginRegistry::builtin")]
    pub plugins: Vec<FirstClassPlugin>,

    /// Command path → extra long text, merged over the embedded defaults.
    #[serde(default)]
    pub long_texts: BTreeMap<String, String>,
}

/// Core doc build settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocsConfig {
    /// Name of the root command
    #[serde(default = "default_root_name")]
    pub root_name: String,

    /// Directory receiving generated pages (wiped on every run)
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Path example sections use to reference include files
    #[serde(default = "default_includes_import_path")]
    pub includes_import_path: String,

    /// JSON command tree manifest
    #[serde(default)]
    pub tree: Option<PathBuf>,

    /// JSON API metadata
    #[serde(default)]
    pub metadata: Option<PathBuf>,
}

fn default_root_name() -> String {
    DEFAULT_ROOT_NAME.to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

fn default_includes_import_path() -> String {
    cmddocs_core::transform::DEFAULT_INCLUDES_IMPORT_PATH.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            docs: DocsConfig::default(),
            plugins: PluginRegistry::builtin(),
            long_texts: BTreeMap::new(),
        }
    }
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            root_name: default_root_name(),
            output_dir: default_output_dir(),
            includes_import_path: default_includes_import_path(),
            tree: None,
            metadata: None,
        }
    }
}

impl DocsConfig {
    fn resolve_inputs(&mut self, base: &Path) {
        for input in [&mut self.tree, &mut self.metadata].into_iter().flatten() {
            if input.is_relative() {
                *input = base.join(&*input);
            }
        }
    }
}

impl Config {
    /// Load configuration from a file
    ///
    /// Relative `tree` and `metadata` paths are resolved against the
    /// directory holding the file.
    pub fn load(path: &Path) -> Result<Self, DocsError> {
        let content = fs::read_to_string(path).map_err(|e| {
            DocsError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let mut config: Config = toml::from_str(&content).map_err(|e| {
            DocsError::Config(format!("failed to parse {}: {}", path.display(), e))
        })?;
        if let Some(base) = path.parent() {
            config.docs.resolve_inputs(base);
        }
        Ok(config)
    }

    /// Load `path` if given, else `cmddocs.toml` from `dir` if it exists, else defaults.
    pub fn discover(path: Option<&Path>, dir: &Path) -> Result<Self, DocsError> {
        if let Some(path) = path {
            return Self::load(path);
        }
        let default_path = dir.join(DEFAULT_CONFIG_FILE);
        if default_path.is_file() {
            Self::load(&default_path)
        } else {
            Ok(Config::default())
        }
    }

    /// Build the transformer configuration around already loaded metadata.
    pub fn transform_config(&self, metadata: Metadata) -> TransformConfig {
        let mut long_texts = LongTextTable::with_api_docs(&self.docs.root_name);
        long_texts.extend(self.long_texts.clone());

        TransformConfig::new(self.docs.root_name.clone())
            .with_metadata(metadata)
            .with_plugins(PluginRegistry::new(self.plugins.clone()))
            .with_long_texts(long_texts)
            .with_includes_import_path(self.docs.includes_import_path.clone())
    }
}

//! Where the command tree and API metadata come from.
//!
//! The host CLI owns its command tree. A doc run gets it through a
//! [`CommandTreeSource`]: a JSON manifest exported by the host, or a
//! `clap::Command` when cmddocs is linked into the host binary.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use cmddocs_core::{Command, Metadata};

use crate::error::DocsError;

/// Produces the root of the command tree to document.
pub trait CommandTreeSource {
    fn build(&self) -> Result<Command, DocsError>;
}

/// Command tree read from a JSON manifest.
#[derive(Debug, Clone)]
pub struct JsonTreeSource {
    path: PathBuf,
}

impl JsonTreeSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonTreeSource { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CommandTreeSource for JsonTreeSource {
    fn build(&self) -> Result<Command, DocsError> {
        let tree_error = |reason: String| DocsError::Tree {
            path: self.path.clone(),
            reason,
        };
        let content = fs::read_to_string(&self.path).map_err(|e| tree_error(e.to_string()))?;
        let root: Command = serde_json::from_str(&content).map_err(|e| tree_error(e.to_string()))?;
        debug!(path = %self.path.display(), root = %root.name, "loaded command tree");
        Ok(root)
    }
}

/// Command tree converted from a clap definition.
#[derive(Debug, Clone)]
pub struct ClapTreeSource {
    command: clap::Command,
}

impl ClapTreeSource {
    pub fn new(command: clap::Command) -> Self {
        ClapTreeSource { command }
    }
}

impl CommandTreeSource for ClapTreeSource {
    fn build(&self) -> Result<Command, DocsError> {
        Ok(Command::from(&self.command))
    }
}

/// A tree built in memory; used when the caller already holds a [`Command`].
impl CommandTreeSource for Command {
    fn build(&self) -> Result<Command, DocsError> {
        Ok(self.clone())
    }
}

/// Load API metadata from a JSON file.
pub fn load_metadata(path: &Path) -> Result<Metadata, DocsError> {
    let metadata_error = |reason: String| DocsError::Metadata {
        path: path.to_path_buf(),
        reason,
    };
    let content = fs::read_to_string(path).map_err(|e| metadata_error(e.to_string()))?;
    let metadata = Metadata::from_json_str(&content).map_err(|e| metadata_error(e.to_string()))?;
    debug!(path = %path.display(), operations = metadata.len(), "loaded metadata");
    Ok(metadata)
}

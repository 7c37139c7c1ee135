//! Error types and exit codes for cmddocs.
//!
//! Every stage of a run is all-or-nothing: the first error aborts the run
//! and is reported with a stage-specific exit code.
//!
//! ## Exit Codes
//!
//! - `2`: configuration, command tree or metadata could not be loaded
//! - `3`: the output directory could not be prepared
//! - `4`: include files or pages could not be written
//! - `5`: first-class plugin docs could not be removed
//! - `10`: other I/O errors

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use cmddocs_core::ExportError;

/// Unified error type for a documentation run.
#[derive(Debug, Error)]
pub enum DocsError {
    /// Invalid or unreadable configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// The command tree manifest could not be read or parsed.
    #[error("failed to load command tree from {}: {reason}", path.display())]
    Tree { path: PathBuf, reason: String },

    /// The API metadata could not be read or parsed.
    #[error("failed to load metadata from {}: {reason}", path.display())]
    Metadata { path: PathBuf, reason: String },

    /// Wiping or recreating the output directory failed.
    #[error("failed to prepare output directory {}: {source}", path.display())]
    PrepareOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An example include file could not be written.
    #[error("failed to write include file {}: {source}", path.display())]
    WriteInclude {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The exporter failed.
    #[error("export failed: {0}")]
    Export(#[from] ExportError),

    /// A first-class plugin page was missing or could not be deleted.
    #[error("failed to remove first-class plugin doc {}: {source}", path.display())]
    RemovePluginDoc {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl DocsError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            DocsError::Config(_) | DocsError::Tree { .. } | DocsError::Metadata { .. } => 2,
            DocsError::PrepareOutput { .. } => 3,
            DocsError::WriteInclude { .. } | DocsError::Export(_) => 4,
            DocsError::RemovePluginDoc { .. } => 5,
            DocsError::Io(_) => 10,
        }
    }
}

//! Error types for the exporter.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure while exporting a command tree to documentation files.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Rendering a page failed (the example formatter reported an error).
    #[error("failed to render docs for '{command}': {source}")]
    Render {
        command: String,
        #[source]
        source: io::Error,
    },

    /// Writing a generated page failed.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The output directory is missing or not a directory.
    #[error("output directory not found: {}", path.display())]
    MissingOutputDir { path: PathBuf },
}

//! cmddocs: reference documentation for a CLI command tree
//!
//! Rewrites the host CLI's command tree for documentation, renders one
//! reStructuredText page per command and removes the pages of first-class
//! plugins, which are documented in their own repositories.

// Command model, transformer and exporter - re-exported from cmddocs-core
pub use cmddocs_core::command;
pub use cmddocs_core::examples;
pub use cmddocs_core::export;
pub use cmddocs_core::long_text;
pub use cmddocs_core::metadata;
pub use cmddocs_core::plugin;
pub use cmddocs_core::transform;

pub mod config;
pub mod driver;
pub mod error;
pub mod source;

pub use config::Config;
pub use driver::{Driver, RunSummary};
pub use error::DocsError;
pub use source::{load_metadata, ClapTreeSource, CommandTreeSource, JsonTreeSource};

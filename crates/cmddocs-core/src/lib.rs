//! cmddocs-core: command tree model, doc transformations and RST export.
//!
//! This crate holds everything that does not touch process state: the
//! [`Command`] tree, the lookup tables the transformations read, the
//! [`Transformer`] itself and the [`DocExporter`] abstraction with its
//! reStructuredText implementation.

/// Exporter error types
pub mod error;

/// Command tree model
pub mod command;

/// API operation metadata
pub mod metadata;

/// First-class plugin registry
pub mod plugin;

/// Supplementary long descriptions
pub mod long_text;

/// RST example sections for API commands
pub mod examples;

/// Doc-oriented tree rewrites
pub mod transform;

/// Page rendering and export
pub mod export;

// Re-exports for convenience
pub use command::{
    Command, CommandPath, Flag, COMPLETION_COMMAND, OPERATION_ID, PLUGIN_SOURCE_TYPE,
    SOURCE_PLUGIN_NAME, SOURCE_TYPE,
};
pub use error::ExportError;
pub use examples::{build_examples, ExamplesSection, IncludeFile};
pub use export::{
    default_example_formatter, CommandNode, DocExporter, ExampleFormatter, SnootyExporter,
};
pub use long_text::{LongTextTable, API_DOCS_LONG_TEXT};
pub use metadata::{Example, Metadata, OperationMetadata, ParameterMetadata};
pub use plugin::{FirstClassPlugin, PluginCommand, PluginRegistry};
pub use transform::{
    is_api_command, TransformConfig, TransformReport, Transformer, API_COMMAND,
    API_DOCS_LINK_LINE, CLI_DOCS_LINK_PREFIX, EXPERIMENTAL_NOTICE,
};

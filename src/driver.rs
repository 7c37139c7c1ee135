//! Doc export driver.
//!
//! A run has three gates, each all-or-nothing:
//!
//! 1. **prepare**: wipe and recreate the output directory
//! 2. **export**: build the tree, register the completion commands,
//!    transform, write example includes, render pages
//! 3. **cleanup**: delete the pages of first-class plugin commands
//!
//! A failure aborts the run. Nothing done by an earlier gate is rolled back.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use cmddocs_core::{
    default_example_formatter, DocExporter, IncludeFile, SnootyExporter, TransformConfig,
    TransformReport, Transformer,
};

use crate::config::INCLUDES_DIR;
use crate::error::DocsError;
use crate::source::CommandTreeSource;

/// Mode of the recreated output directory.
pub const OUTPUT_DIR_MODE: u32 = 0o766;

/// Mode of written include files.
pub const INCLUDE_FILE_MODE: u32 = 0o600;

/// Result of a completed run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub report: TransformReport,
    /// Pages written by the exporter, before cleanup.
    pub written: Vec<PathBuf>,
    /// First-class plugin pages deleted by cleanup.
    pub removed: Vec<PathBuf>,
}

/// Orchestrates a documentation run.
#[derive(Debug)]
pub struct Driver<E = SnootyExporter> {
    output_dir: PathBuf,
    transformer: Transformer,
    exporter: E,
}

impl Driver<SnootyExporter> {
    /// Driver rendering RST pages into `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>, config: TransformConfig) -> Self {
        Driver::with_exporter(output_dir, config, SnootyExporter::default())
    }
}

impl<E: DocExporter> Driver<E> {
    pub fn with_exporter(output_dir: impl Into<PathBuf>, config: TransformConfig, exporter: E) -> Self {
        Driver {
            output_dir: output_dir.into(),
            transformer: Transformer::new(config),
            exporter,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn includes_dir(&self) -> PathBuf {
        self.output_dir.join(INCLUDES_DIR)
    }

    pub fn transformer(&self) -> &Transformer {
        &self.transformer
    }

    /// Run all three gates in order.
    pub fn run(&self, source: &dyn CommandTreeSource) -> Result<RunSummary, DocsError> {
        self.prepare_output_dir()?;
        let (report, written) = self.run_export(source)?;
        let removed = self.remove_first_class_plugin_docs()?;
        info!(
            pages = written.len().saturating_sub(removed.len()),
            dir = %self.output_dir.display(),
            "documentation generated"
        );
        Ok(RunSummary {
            report,
            written,
            removed,
        })
    }

    /// Delete the output directory if present and recreate it empty.
    pub fn prepare_output_dir(&self) -> Result<(), DocsError> {
        let dir = &self.output_dir;
        let prepare_error = |source: io::Error| DocsError::PrepareOutput {
            path: dir.clone(),
            source,
        };

        match fs::remove_dir_all(dir) {
            Ok(()) => debug!(dir = %dir.display(), "removed previous output"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(prepare_error(e)),
        }
        fs::create_dir_all(dir).map_err(prepare_error)?;
        set_mode(dir, OUTPUT_DIR_MODE).map_err(prepare_error)?;

        info!(dir = %dir.display(), "prepared output directory");
        Ok(())
    }

    /// Build, transform and export the command tree.
    ///
    /// Returns the transformation report and the pages written.
    pub fn run_export(
        &self,
        source: &dyn CommandTreeSource,
    ) -> Result<(TransformReport, Vec<PathBuf>), DocsError> {
        let mut root = source.build()?;
        let root_name = &self.transformer.config().root_name;
        if &root.name != root_name {
            return Err(DocsError::Config(format!(
                "command tree root '{}' does not match configured root name '{}'",
                root.name, root_name
            )));
        }

        root.init_default_completion_cmd();

        let report = self.transformer.apply(&mut root);
        info!(
            visited = report.visited,
            pruned_plugins = report.pruned_plugins.len(),
            pruned_private_preview = report.pruned_private_preview.len(),
            flags_rewritten = report.flags_rewritten,
            "transformed command tree"
        );

        self.write_includes(&report.includes)?;

        let transformer = &self.transformer;
        let written = self.exporter.export(&root, &self.output_dir, &|w, node| {
            if transformer.is_api_command(node.path) {
                w.write_all(node.command.example.as_bytes())
            } else {
                default_example_formatter(w, node)
            }
        })?;
        info!(pages = written.len(), "exported pages");

        Ok((report, written))
    }

    /// Delete the page of every first-class plugin command.
    ///
    /// Each page must exist: a missing page means the plugin command was
    /// not exported, which fails the run.
    pub fn remove_first_class_plugin_docs(&self) -> Result<Vec<PathBuf>, DocsError> {
        let mut removed = Vec::new();
        for name in self.transformer.config().plugins.command_names() {
            let path = self.plugin_doc_path(name);
            fs::remove_file(&path).map_err(|source| DocsError::RemovePluginDoc {
                path: path.clone(),
                source,
            })?;
            debug!(file = %path.display(), "removed first-class plugin doc");
            removed.push(path);
        }
        Ok(removed)
    }

    /// `<output>/<root>-<command>.txt`
    pub fn plugin_doc_path(&self, command_name: &str) -> PathBuf {
        self.output_dir.join(format!(
            "{}-{}.txt",
            self.transformer.config().root_name,
            command_name
        ))
    }

    fn write_includes(&self, includes: &[IncludeFile]) -> Result<(), DocsError> {
        if includes.is_empty() {
            return Ok(());
        }

        let dir = self.includes_dir();
        fs::create_dir_all(&dir).map_err(|source| DocsError::WriteInclude {
            path: dir.clone(),
            source,
        })?;

        for include in includes {
            let path = dir.join(&include.name);
            fs::write(&path, &include.contents)
                .and_then(|()| set_mode(&path, INCLUDE_FILE_MODE))
                .map_err(|source| DocsError::WriteInclude {
                    path: path.clone(),
                    source,
                })?;
        }
        debug!(count = includes.len(), dir = %dir.display(), "wrote example includes");
        Ok(())
    }
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> io::Result<()> {
    Ok(())
}

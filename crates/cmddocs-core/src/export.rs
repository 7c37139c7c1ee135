//! Documentation exporter.
//!
//! [`DocExporter`] writes one page per command. The example section of each
//! page is delegated to an [`ExampleFormatter`] supplied by the caller, so the
//! driver can special-case command groups without the exporter knowing about
//! them. [`default_example_formatter`] renders plain example text as a shell
//! code block.
//!
//! [`SnootyExporter`] is the reStructuredText flavour consumed by the MongoDB
//! docs toolchain: `<dir>/<root>-<sub>-....txt` for every non-hidden command.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::command::{Command, CommandPath, Flag};
use crate::error::ExportError;

/// A command together with its position in the tree.
#[derive(Debug, Clone, Copy)]
pub struct CommandNode<'a> {
    pub path: &'a CommandPath,
    pub command: &'a Command,
}

/// Callback writing the examples section of a page.
pub type ExampleFormatter<'a> = dyn Fn(&mut dyn Write, &CommandNode<'_>) -> io::Result<()> + 'a;

/// Renders a command tree into documentation files.
pub trait DocExporter {
    /// Write pages for `root` and its descendants into `out_dir`.
    ///
    /// Returns the written files in traversal order.
    fn export(
        &self,
        root: &Command,
        out_dir: &Path,
        formatter: &ExampleFormatter<'_>,
    ) -> Result<Vec<PathBuf>, ExportError>;
}

/// Render the command's example text as a shell code block.
///
/// Writes nothing when the command has no example.
pub fn default_example_formatter(w: &mut dyn Write, node: &CommandNode<'_>) -> io::Result<()> {
    let example = node.command.example.trim_end();
    if example.is_empty() {
        return Ok(());
    }

    writeln!(w, "Examples")?;
    writeln!(w, "--------")?;
    writeln!(w)?;
    writeln!(w, ".. code-block:: shell")?;
    writeln!(w)?;
    for line in example.lines() {
        if line.trim().is_empty() {
            writeln!(w)?;
        } else {
            writeln!(w, "   {line}")?;
        }
    }
    writeln!(w)
}

// ============================================================================
// Snooty (RST) Exporter
// ============================================================================

/// reStructuredText exporter for the MongoDB docs toolchain.
#[derive(Debug, Clone)]
pub struct SnootyExporter {
    /// Name written into the auto-generated footer.
    generator: String,
}

impl SnootyExporter {
    pub fn new(generator: impl Into<String>) -> Self {
        SnootyExporter {
            generator: generator.into(),
        }
    }

    /// File name of the page for `path`.
    pub fn file_name(path: &CommandPath) -> String {
        format!("{}.txt", path.file_stem())
    }

    fn export_tree<'a>(
        &self,
        cmd: &'a Command,
        path: &CommandPath,
        inherited: &[&'a Flag],
        out_dir: &Path,
        formatter: &ExampleFormatter<'_>,
        written: &mut Vec<PathBuf>,
    ) -> Result<(), ExportError> {
        if cmd.hidden {
            debug!(command = %path, "skipping hidden command");
            return Ok(());
        }

        let mut page = Vec::new();
        self.render(cmd, path, inherited, formatter, &mut page)
            .map_err(|source| ExportError::Render {
                command: path.to_string(),
                source,
            })?;

        let file = out_dir.join(Self::file_name(path));
        fs::write(&file, page).map_err(|source| ExportError::Write {
            path: file.clone(),
            source,
        })?;
        debug!(command = %path, file = %file.display(), "wrote page");
        written.push(file);

        let mut child_inherited = inherited.to_vec();
        child_inherited.extend(cmd.flags.iter().filter(|f| f.persistent));
        for child in &cmd.children {
            self.export_tree(
                child,
                &path.child(&child.name),
                &child_inherited,
                out_dir,
                formatter,
                written,
            )?;
        }
        Ok(())
    }

    fn render(
        &self,
        cmd: &Command,
        path: &CommandPath,
        inherited: &[&Flag],
        formatter: &ExampleFormatter<'_>,
        w: &mut dyn Write,
    ) -> io::Result<()> {
        let title = path.to_string();
        let banner = "=".repeat(title.chars().count());

        writeln!(w, ".. _{}:\n", path.file_stem())?;
        writeln!(w, "{banner}\n{title}\n{banner}\n")?;
        writeln!(w, ".. default-domain:: mongodb\n")?;
        writeln!(w, ".. contents:: On this page")?;
        writeln!(w, "   :local:")?;
        writeln!(w, "   :backlinks: none")?;
        writeln!(w, "   :depth: 1")?;
        writeln!(w, "   :class: singlecol\n")?;

        if !cmd.short.is_empty() {
            writeln!(w, "{}\n", cmd.short)?;
        }
        if !cmd.long.is_empty() {
            writeln!(w, "{}\n", cmd.long.trim_end())?;
        }

        heading(w, "Syntax")?;
        writeln!(w, ".. code-block::")?;
        writeln!(w, "   :caption: Command Syntax\n")?;
        writeln!(w, "   {}\n", syntax_line(cmd, path))?;
        writeln!(w, ".. Code end marker, please don't delete this comment\n")?;

        heading(w, "Options")?;
        let own: Vec<&Flag> = cmd.flags.iter().collect();
        options_table(w, &own, Some(cmd.name.as_str()))?;

        if !inherited.is_empty() {
            heading(w, "Inherited Options")?;
            options_table(w, inherited, None)?;
        }

        formatter(w, &CommandNode { path, command: cmd })?;

        let mut related: Vec<&Command> = cmd.children.iter().filter(|c| !c.hidden).collect();
        if !related.is_empty() {
            related.sort_by(|a, b| a.name.cmp(&b.name));
            heading(w, "Related Commands")?;
            for child in &related {
                let child_path = path.child(&child.name);
                writeln!(w, "* :ref:`{}` - {}", child_path.file_stem(), child.short)?;
            }
            writeln!(w)?;
            writeln!(w, ".. toctree::")?;
            writeln!(w, "   :titlesonly:\n")?;
            for child in &related {
                let child_path = path.child(&child.name);
                writeln!(w, "   {} </command/{}>", child.name, child_path.file_stem())?;
            }
            writeln!(w)?;
        }

        if !cmd.disable_auto_gen_tag {
            let today = chrono::Local::now().format("%-d-%b-%Y");
            writeln!(w, ".. Auto generated by {} on {today}", self.generator)?;
        }

        Ok(())
    }
}

impl Default for SnootyExporter {
    fn default() -> Self {
        SnootyExporter::new("cmddocs")
    }
}

impl DocExporter for SnootyExporter {
    fn export(
        &self,
        root: &Command,
        out_dir: &Path,
        formatter: &ExampleFormatter<'_>,
    ) -> Result<Vec<PathBuf>, ExportError> {
        if !out_dir.is_dir() {
            return Err(ExportError::MissingOutputDir {
                path: out_dir.to_path_buf(),
            });
        }

        let mut written = Vec::new();
        let path = CommandPath::root(&root.name);
        self.export_tree(root, &path, &[], out_dir, formatter, &mut written)?;
        Ok(written)
    }
}

fn heading(w: &mut dyn Write, title: &str) -> io::Result<()> {
    writeln!(w, "{title}\n{}\n", "-".repeat(title.chars().count()))
}

/// `<path> [args] [options]`
fn syntax_line(cmd: &Command, path: &CommandPath) -> String {
    let mut line = path.to_string();
    if !cmd.args.is_empty() {
        line.push(' ');
        line.push_str(&cmd.args);
    }
    line.push_str(" [options]");
    line
}

/// Options list-table. `help_for` adds the implicit `-h, --help` row.
fn options_table(w: &mut dyn Write, flags: &[&Flag], help_for: Option<&str>) -> io::Result<()> {
    writeln!(w, ".. list-table::")?;
    writeln!(w, "   :header-rows: 1")?;
    writeln!(w, "   :widths: 20 10 10 60\n")?;
    writeln!(w, "   * - Name")?;
    writeln!(w, "     - Type")?;
    writeln!(w, "     - Required")?;
    writeln!(w, "     - Description")?;

    let mut sorted = flags.to_vec();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));
    for flag in sorted {
        let name = match flag.shorthand {
            Some(short) => format!("-{short}, --{}", flag.name),
            None => format!("--{}", flag.name),
        };
        let value_type = if flag.value_type == "bool" {
            ""
        } else {
            flag.value_type.as_str()
        };
        writeln!(w, "   * - {name}")?;
        writeln!(w, "     - {value_type}")?;
        writeln!(w, "     - {}", flag.required)?;
        writeln!(w, "     - {}", indent_continuation(&flag_description(flag)))?;
    }

    if let Some(command) = help_for {
        writeln!(w, "   * - -h, --help")?;
        writeln!(w, "     - ")?;
        writeln!(w, "     - false")?;
        writeln!(w, "     - help for {command}")?;
    }
    writeln!(w)
}

fn flag_description(flag: &Flag) -> String {
    let usage = flag.usage.trim_end();
    let has_default = !flag.default_value.is_empty()
        && !(flag.value_type == "bool" && flag.default_value == "false");
    if has_default {
        format!("{usage} This value defaults to {}.", flag.default_value)
    } else {
        usage.to_string()
    }
}

/// Indent every line after the first so it stays inside the table cell.
fn indent_continuation(text: &str) -> String {
    text.lines().collect::<Vec<_>>().join("\n       ")
}

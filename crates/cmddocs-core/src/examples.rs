//! RST example sections for API commands.
//!
//! Each metadata example becomes a shell command line (and, for operations
//! with a request body, a `payload.json`). Both are emitted as separate
//! include files and pulled into the page with `literalinclude`, so the
//! section text only references them. More than one example renders as a
//! `tabs` directive with one tab per example.

use std::collections::BTreeMap;

use crate::command::CommandPath;
use crate::metadata::Example;

/// Indentation of tab content inside `.. tabs::`.
const TAB_INDENT: &str = "      ";

/// A file referenced by a generated example section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeFile {
    /// File name relative to the includes directory.
    pub name: String,
    pub contents: String,
}

/// A rendered `Examples` section and the include files it references.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExamplesSection {
    pub text: String,
    pub includes: Vec<IncludeFile>,
}

/// Build the `Examples` section for the command at `path`.
///
/// Versions are emitted in sorted order. `import_path` is the directory the
/// RST build resolves `literalinclude` targets against.
pub fn build_examples(
    path: &CommandPath,
    examples: &BTreeMap<String, Vec<Example>>,
    import_path: &str,
) -> ExamplesSection {
    let count: usize = examples.values().map(Vec::len).sum();
    if count == 0 {
        return ExamplesSection::default();
    }

    let tabs = count != 1;
    let indent = if tabs { TAB_INDENT } else { "" };
    let stem = path.file_stem();
    let import_path = import_path.trim_end_matches('/');

    let mut section = ExamplesSection::default();
    let text = &mut section.text;
    text.push_str("Examples\n--------\n\n");
    if tabs {
        text.push_str(".. tabs::\n\n");
    }

    let mut unnamed = 0;
    for (version, version_examples) in examples {
        for example in version_examples {
            let source = example.source_slug();

            if tabs {
                text.push_str("   .. tab:: ");
                if example.name.is_empty() {
                    text.push_str("Example");
                    if unnamed > 0 {
                        text.push_str(&format!(" {unnamed}"));
                    }
                    unnamed += 1;
                } else {
                    text.push_str(&example.name);
                }
                text.push_str(&format!("\n{TAB_INDENT}:tabid: {version}_{source}\n\n"));
            }

            if !example.value.is_empty() {
                let payload = format!("{stem}-{version}-{source}-payload.json");
                text.push_str(&format!("{indent}{}\n\n", example.description));
                text.push_str(&format!(
                    "{indent}Create the file below and save it as ``payload.json``\n\n"
                ));
                text.push_str(&format!("{indent}.. literalinclude:: {import_path}/{payload}\n"));
                text.push_str(&format!("{indent}   :language: shell\n\n"));
                text.push_str(&format!(
                    "{indent}After creating ``payload.json``, run the command below in the same directory.\n\n"
                ));
                section.includes.push(IncludeFile {
                    name: payload,
                    contents: example.value.clone(),
                });
            }

            let script = format!("{stem}-{version}-{source}.sh");
            text.push_str(&format!("{indent}.. literalinclude:: {import_path}/{script}\n"));
            text.push_str(&format!("{indent}   :language: shell\n\n"));
            section.includes.push(IncludeFile {
                name: script,
                contents: command_line(path, version, example),
            });
        }
    }

    section
}

/// `<path> --version <version> --<flag> <value> ...`, flags in name order.
fn command_line(path: &CommandPath, version: &str, example: &Example) -> String {
    let mut line = format!("{path} --version {version}");
    for (flag, value) in &example.flags {
        line.push_str(&format!(" --{flag} {value}"));
    }
    line.push('\n');
    line
}

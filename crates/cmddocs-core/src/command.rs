//! Command tree model.
//!
//! A [`Command`] is the doc-generation view of one CLI command: its help
//! text, flags, annotations and child commands. The host application either
//! describes its tree as a JSON manifest (serde) or hands over a
//! `clap::Command`, which converts via `From<&clap::Command>`.
//!
//! Paths are not stored on the nodes. They are computed during traversal as
//! a typed [`CommandPath`], so re-parenting or pruning a subtree never leaves
//! a stale path behind.

use std::collections::BTreeMap;
use std::fmt;

use clap::ArgAction;
use serde::{Deserialize, Serialize};

// ============================================================================
// Annotation Keys
// ============================================================================

/// Annotation correlating a command with an API operation.
pub const OPERATION_ID: &str = "operationId";

/// Annotation naming where a command came from (`plugin` for plugin commands).
pub const SOURCE_TYPE: &str = "sourceType";

/// Annotation naming the plugin that contributed a command.
pub const SOURCE_PLUGIN_NAME: &str = "sourcePluginName";

/// `sourceType` value marking plugin-provided commands.
pub const PLUGIN_SOURCE_TYPE: &str = "plugin";

/// Name of the default shell completion command.
pub const COMPLETION_COMMAND: &str = "completion";

// ============================================================================
// Command Path
// ============================================================================

/// Sequence of command names from the root down to a command.
///
/// Displays as the space-separated command line (`atlas api clusters`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct CommandPath(Vec<String>);

impl CommandPath {
    /// Path of a root command.
    pub fn root(name: impl Into<String>) -> Self {
        CommandPath(vec![name.into()])
    }

    /// Path of a direct child of this path.
    pub fn child(&self, name: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(name.to_string());
        CommandPath(segments)
    }

    /// All segments, root first.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Number of segments (the root alone has depth 1).
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Name of the command this path points at.
    pub fn name(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// True when the leading segments equal `prefix`, segment by segment.
    ///
    /// `atlas api` is a prefix of `atlas api clusters` but not of
    /// `atlas apikeys`.
    pub fn starts_with<S: AsRef<str>>(&self, prefix: &[S]) -> bool {
        prefix.len() <= self.0.len()
            && prefix
                .iter()
                .zip(&self.0)
                .all(|(want, have)| want.as_ref() == have)
    }

    /// Dash-joined form used for file names and RST labels (`atlas-api-clusters`).
    pub fn file_stem(&self) -> String {
        self.0.join("-")
    }
}

impl fmt::Display for CommandPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" "))
    }
}

impl<S: Into<String>> FromIterator<S> for CommandPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        CommandPath(iter.into_iter().map(Into::into).collect())
    }
}

// ============================================================================
// Flag
// ============================================================================

/// A flag accepted by a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flag {
    /// Long name, without leading dashes.
    pub name: String,

    /// Optional one-letter alias.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shorthand: Option<char>,

    /// Value type shown in the options table (`string`, `bool`, `int`, ...).
    #[serde(default = "default_value_type", rename = "type")]
    pub value_type: String,

    /// Default value rendered into the description when non-empty.
    #[serde(default)]
    pub default_value: String,

    #[serde(default)]
    pub required: bool,

    /// Help text for the flag.
    #[serde(default)]
    pub usage: String,

    /// Persistent flags are inherited by every descendant command.
    #[serde(default)]
    pub persistent: bool,
}

fn default_value_type() -> String {
    "string".to_string()
}

impl Flag {
    /// A string-valued flag.
    pub fn new(name: impl Into<String>, usage: impl Into<String>) -> Self {
        Flag {
            name: name.into(),
            shorthand: None,
            value_type: default_value_type(),
            default_value: String::new(),
            required: false,
            usage: usage.into(),
            persistent: false,
        }
    }

    /// A boolean switch.
    pub fn bool(name: impl Into<String>, usage: impl Into<String>) -> Self {
        Flag {
            value_type: "bool".to_string(),
            default_value: "false".to_string(),
            ..Flag::new(name, usage)
        }
    }

    pub fn with_shorthand(mut self, shorthand: char) -> Self {
        self.shorthand = Some(shorthand);
        self
    }

    pub fn with_type(mut self, value_type: impl Into<String>) -> Self {
        self.value_type = value_type.into();
        self
    }

    pub fn with_default(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = default_value.into();
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn persistent(mut self) -> Self {
        self.persistent = true;
        self
    }
}

// ============================================================================
// Command
// ============================================================================

/// One node of the command tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub name: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,

    /// Positional argument synopsis appended to the syntax line (`<projectId>`).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub args: String,

    /// One-line description.
    #[serde(default)]
    pub short: String,

    /// Free-form long description.
    #[serde(default)]
    pub long: String,

    /// Example text. Plain shell lines for regular commands, a full RST
    /// section for API commands once examples have been rebuilt.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub example: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<Flag>,

    #[serde(default, rename = "commands", skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Command>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,

    /// Hidden commands are never exported.
    #[serde(default)]
    pub hidden: bool,

    /// Suppresses the "auto generated" footer on the exported page.
    #[serde(skip)]
    pub disable_auto_gen_tag: bool,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Command {
            name: name.into(),
            ..Command::default()
        }
    }

    pub fn with_short(mut self, short: impl Into<String>) -> Self {
        self.short = short.into();
        self
    }

    pub fn with_long(mut self, long: impl Into<String>) -> Self {
        self.long = long.into();
        self
    }

    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.example = example.into();
        self
    }

    pub fn with_args(mut self, args: impl Into<String>) -> Self {
        self.args = args.into();
        self
    }

    pub fn with_flag(mut self, flag: Flag) -> Self {
        self.flags.push(flag);
        self
    }

    pub fn with_child(mut self, child: Command) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.annotations.insert(key.into(), value.into());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Append a child command.
    pub fn add_child(&mut self, child: Command) {
        self.children.push(child);
    }

    /// Remove and return the direct child named `name`.
    pub fn remove_child(&mut self, name: &str) -> Option<Command> {
        let index = self.children.iter().position(|c| c.name == name)?;
        Some(self.children.remove(index))
    }

    /// Direct child named `name`.
    pub fn child(&self, name: &str) -> Option<&Command> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Descendant reached by following `names` from this command.
    pub fn find(&self, names: &[&str]) -> Option<&Command> {
        names
            .iter()
            .try_fold(self, |cmd, name| cmd.child(name))
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Annotation value for `key`, if present.
    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.annotations.get(key).map(String::as_str)
    }

    /// The operation identifier, treating an empty annotation as absent.
    pub fn operation_id(&self) -> Option<&str> {
        self.annotation(OPERATION_ID).filter(|id| !id.is_empty())
    }

    /// True for commands contributed by a plugin.
    pub fn is_plugin_command(&self) -> bool {
        self.annotation(SOURCE_TYPE) == Some(PLUGIN_SOURCE_TYPE)
    }

    /// Register the default `completion` command tree.
    ///
    /// Only applies to commands that already have children and do not define
    /// their own `completion` command.
    pub fn init_default_completion_cmd(&mut self) {
        if !self.has_children() || self.child(COMPLETION_COMMAND).is_some() {
            return;
        }

        let mut completion = Command::new(COMPLETION_COMMAND)
            .with_short("Generate the autocompletion script for the specified shell")
            .with_long(format!(
                "Generate the autocompletion script for {} for the specified shell.\n\
                 See each sub-command's help for details on how to use the generated script.\n",
                self.name
            ));

        for shell in ["bash", "fish", "powershell", "zsh"] {
            completion.add_child(
                Command::new(shell)
                    .with_short(format!("Generate the autocompletion script for {shell}"))
                    .with_long(format!(
                        "Generate the autocompletion script for the {shell} shell.\n\n\
                         To load completions in your current shell session:\n\n\
                         \t{} completion {shell}\n",
                        self.name
                    ))
                    .with_flag(Flag::bool(
                        "no-descriptions",
                        "disable completion descriptions",
                    )),
            );
        }

        self.add_child(completion);
    }
}

// ============================================================================
// clap Conversion
// ============================================================================

impl From<&clap::Command> for Command {
    fn from(cmd: &clap::Command) -> Self {
        let args = cmd
            .get_positionals()
            .map(|arg| format!("<{}>", arg.get_id()))
            .collect::<Vec<_>>()
            .join(" ");

        let flags = cmd
            .get_arguments()
            .filter(|arg| !arg.is_positional() && !arg.is_hide_set())
            .filter_map(|arg| {
                let name = arg.get_long()?;
                let value_type = match arg.get_action() {
                    ArgAction::SetTrue | ArgAction::SetFalse => "bool",
                    ArgAction::Count => "int",
                    ArgAction::Append => "strings",
                    _ => "string",
                };
                Some(Flag {
                    name: name.to_string(),
                    shorthand: arg.get_short(),
                    value_type: value_type.to_string(),
                    default_value: arg
                        .get_default_values()
                        .iter()
                        .map(|v| v.to_string_lossy().into_owned())
                        .collect::<Vec<_>>()
                        .join(","),
                    required: arg.is_required_set(),
                    usage: arg.get_help().map(ToString::to_string).unwrap_or_default(),
                    persistent: arg.is_global_set(),
                })
            })
            .collect();

        Command {
            name: cmd.get_name().to_string(),
            aliases: cmd.get_visible_aliases().map(str::to_string).collect(),
            args,
            short: cmd.get_about().map(ToString::to_string).unwrap_or_default(),
            long: cmd
                .get_long_about()
                .map(ToString::to_string)
                .unwrap_or_default(),
            example: cmd
                .get_after_long_help()
                .or_else(|| cmd.get_after_help())
                .map(ToString::to_string)
                .unwrap_or_default(),
            flags,
            children: cmd.get_subcommands().map(Command::from).collect(),
            annotations: BTreeMap::new(),
            hidden: cmd.is_hide_set(),
            disable_auto_gen_tag: false,
        }
    }
}

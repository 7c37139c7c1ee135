//! Doc-oriented rewrites of the command tree.
//!
//! The [`Transformer`] walks the tree once, depth first, applying a fixed
//! sequence of edits to each node before descending into its children:
//!
//! 1. disable the auto-generated footer
//! 2. prune plugin commands that are not first-class
//! 3. append supplementary long text
//! 4. for API commands: prune private-preview-only operations, mark the
//!    command experimental, replace the legacy docs link, rebuild examples
//! 5. replace flag usage text from the API metadata
//! 6. recurse into the children that were kept
//!
//! Pruning happens through `Vec::retain_mut` on the parent's children: each
//! child is visited exactly once and the visit decides whether it stays.
//!
//! Every lookup miss is a no-op. The transformer performs no I/O; include
//! files produced by example rebuilding are returned in the
//! [`TransformReport`] for the caller to write.
//!
//! Applying the transformer twice to the same tree is not supported (the
//! experimental notice would be added again).

use tracing::debug;

use crate::command::{Command, CommandPath};
use crate::examples::{build_examples, IncludeFile};
use crate::long_text::LongTextTable;
use crate::metadata::{Metadata, OperationMetadata};
use crate::plugin::PluginRegistry;

/// Name of the command group holding the generated API commands.
pub const API_COMMAND: &str = "api";

/// Prefix added to the short description of every API command.
pub const EXPERIMENTAL_NOTICE: &str =
    "`experimental <https://www.mongodb.com/docs/atlas/cli/current/command/atlas-api/>`_: ";

/// Start of the generated "see the CLI docs" line at the end of API command help.
pub const CLI_DOCS_LINK_PREFIX: &str =
    "For more information and examples, see: https://www.mongodb.com/docs/atlas/cli/current/command/";

/// Replacement for [`CLI_DOCS_LINK_PREFIX`] lines; the page itself is the CLI doc.
pub const API_DOCS_LINK_LINE: &str =
    "For more information and examples, see the referenced API documentation linked above.";

/// Default `literalinclude` root for example include files.
pub const DEFAULT_INCLUDES_IMPORT_PATH: &str = "/includes";

/// Lookup tables and settings for a transformation.
#[derive(Debug, Clone)]
pub struct TransformConfig {
    /// Name of the root command (`atlas`).
    pub root_name: String,
    pub metadata: Metadata,
    pub plugins: PluginRegistry,
    pub long_texts: LongTextTable,
    /// Path example sections use to reference include files.
    pub includes_import_path: String,
}

impl TransformConfig {
    /// Configuration with empty metadata, the builtin plugin registry and
    /// the embedded API long text.
    pub fn new(root_name: impl Into<String>) -> Self {
        let root_name = root_name.into();
        TransformConfig {
            long_texts: LongTextTable::with_api_docs(&root_name),
            root_name,
            metadata: Metadata::new(),
            plugins: PluginRegistry::default(),
            includes_import_path: DEFAULT_INCLUDES_IMPORT_PATH.to_string(),
        }
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_plugins(mut self, plugins: PluginRegistry) -> Self {
        self.plugins = plugins;
        self
    }

    pub fn with_long_texts(mut self, long_texts: LongTextTable) -> Self {
        self.long_texts = long_texts;
        self
    }

    pub fn with_includes_import_path(mut self, path: impl Into<String>) -> Self {
        self.includes_import_path = path.into();
        self
    }
}

/// What a transformation did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformReport {
    /// Nodes visited, pruned ones included.
    pub visited: usize,
    /// Paths of plugin commands removed from the tree.
    pub pruned_plugins: Vec<String>,
    /// Paths of private-preview API commands removed from the tree.
    pub pruned_private_preview: Vec<String>,
    /// Flags whose usage text was replaced.
    pub flags_rewritten: usize,
    /// Include files referenced by rebuilt example sections.
    pub includes: Vec<IncludeFile>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    Keep,
    Prune,
}

/// True for `<root> api` and every command below it.
pub fn is_api_command(path: &CommandPath, root_name: &str) -> bool {
    path.starts_with(&[root_name, API_COMMAND])
}

/// Applies the doc rewrites to a command tree.
#[derive(Debug, Clone)]
pub struct Transformer {
    config: TransformConfig,
}

impl Transformer {
    pub fn new(config: TransformConfig) -> Self {
        Transformer { config }
    }

    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    /// True for `<root> api` and every command below it.
    pub fn is_api_command(&self, path: &CommandPath) -> bool {
        is_api_command(path, &self.config.root_name)
    }

    /// Transform the tree rooted at `root` in place.
    ///
    /// The root itself has no parent and is never pruned.
    pub fn apply(&self, root: &mut Command) -> TransformReport {
        let mut report = TransformReport::default();
        let path = CommandPath::root(&root.name);
        self.visit(&path, root, false, &mut report);
        report
    }

    fn visit(
        &self,
        path: &CommandPath,
        cmd: &mut Command,
        removable: bool,
        report: &mut TransformReport,
    ) -> Visit {
        report.visited += 1;
        cmd.disable_auto_gen_tag = true;

        if removable && self.is_hidden_plugin(cmd) {
            debug!(command = %path, "removing plugin command");
            report.pruned_plugins.push(path.to_string());
            return Visit::Prune;
        }

        self.add_long_text(path, cmd);

        if self.is_api_command(path) {
            if removable && self.is_private_preview(cmd) {
                debug!(command = %path, "removing private preview command");
                report.pruned_private_preview.push(path.to_string());
                return Visit::Prune;
            }
            mark_experimental(cmd);
            replace_cli_docs_link(cmd);
            self.rebuild_examples(path, cmd, report);
        }

        self.replace_flag_usage(cmd, report);

        cmd.children.retain_mut(|child| {
            let child_path = path.child(&child.name);
            self.visit(&child_path, child, true, report) == Visit::Keep
        });

        Visit::Keep
    }

    fn is_hidden_plugin(&self, cmd: &Command) -> bool {
        cmd.is_plugin_command() && !self.config.plugins.is_first_class(&cmd.name)
    }

    fn operation<'s>(&'s self, cmd: &Command) -> Option<&'s OperationMetadata> {
        cmd.operation_id()
            .and_then(|id| self.config.metadata.get(id))
    }

    fn is_private_preview(&self, cmd: &Command) -> bool {
        self.operation(cmd)
            .is_some_and(|operation| operation.only_private_preview)
    }

    fn add_long_text(&self, path: &CommandPath, cmd: &mut Command) {
        if let Some(text) = self.config.long_texts.get(&path.to_string()) {
            cmd.long.push_str("\n\n");
            cmd.long.push_str(text);
        }
    }

    fn rebuild_examples(&self, path: &CommandPath, cmd: &mut Command, report: &mut TransformReport) {
        let Some(operation) = self.operation(cmd) else {
            return;
        };
        if operation.examples.is_empty() {
            return;
        }

        let section = build_examples(path, &operation.examples, &self.config.includes_import_path);
        cmd.example = section.text;
        report.includes.extend(section.includes);
    }

    fn replace_flag_usage(&self, cmd: &mut Command, report: &mut TransformReport) {
        let Some(operation) = self.operation(cmd) else {
            return;
        };

        for flag in &mut cmd.flags {
            if let Some(parameter) = operation.parameters.get(&flag.name) {
                flag.usage = parameter.sanitized_usage();
                report.flags_rewritten += 1;
            }
        }
    }
}

fn mark_experimental(cmd: &mut Command) {
    cmd.short.insert_str(0, EXPERIMENTAL_NOTICE);
}

/// Swap a trailing CLI docs link for the API docs sentence on leaf commands.
fn replace_cli_docs_link(cmd: &mut Command) {
    if cmd.has_children() {
        return;
    }

    let last_line = cmd.long.rfind('\n').map_or(0, |i| i + 1);
    if cmd.long[last_line..].starts_with(CLI_DOCS_LINK_PREFIX) {
        cmd.long.truncate(last_line);
        cmd.long.push_str(API_DOCS_LINK_LINE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{Flag, OPERATION_ID, PLUGIN_SOURCE_TYPE, SOURCE_TYPE};
    use crate::metadata::Example;
    use crate::plugin::FirstClassPlugin;

    fn plugin(name: &str) -> Command {
        Command::new(name).with_annotation(SOURCE_TYPE, PLUGIN_SOURCE_TYPE)
    }

    fn transformer() -> Transformer {
        Transformer::new(TransformConfig::new("atlas").with_long_texts(LongTextTable::new()))
    }

    mod tree_tests {
        use super::*;

        #[test]
        fn every_kept_node_disables_auto_gen_tag() {
            let mut root = Command::new("atlas")
                .with_child(Command::new("clusters").with_child(Command::new("list")));
            let report = transformer().apply(&mut root);

            assert!(root.disable_auto_gen_tag);
            assert!(root.find(&["clusters"]).unwrap().disable_auto_gen_tag);
            assert!(root.find(&["clusters", "list"]).unwrap().disable_auto_gen_tag);
            assert_eq!(report.visited, 3);
        }

        #[test]
        fn non_first_class_plugins_are_pruned() {
            let mut root = Command::new("atlas")
                .with_child(plugin("example").with_child(Command::new("nested")))
                .with_child(Command::new("clusters"))
                .with_child(plugin("kubernetes"))
                .with_child(plugin("other"));

            let report = transformer().apply(&mut root);

            let names: Vec<_> = root.children.iter().map(|c| c.name.as_str()).collect();
            assert_eq!(names, ["clusters", "kubernetes"]);
            assert_eq!(report.pruned_plugins, ["atlas example", "atlas other"]);
            // The pruned subtree is not descended into.
            assert_eq!(report.visited, 5);
        }

        #[test]
        fn adjacent_pruned_siblings_are_all_removed() {
            let mut root = Command::new("atlas")
                .with_child(plugin("a"))
                .with_child(plugin("b"))
                .with_child(plugin("c"));
            transformer().apply(&mut root);
            assert!(root.children.is_empty());
        }

        #[test]
        fn custom_registry_protects_its_commands() {
            let registry = PluginRegistry::new(vec![
                FirstClassPlugin::new("atlas-cli-plugin-gsa").with_command("gsa", "GSA"),
            ]);
            let t = Transformer::new(TransformConfig::new("atlas").with_plugins(registry));
            let mut root = Command::new("atlas")
                .with_child(plugin("gsa"))
                .with_child(plugin("kubernetes"));

            t.apply(&mut root);

            assert!(root.child("gsa").is_some());
            assert!(root.child("kubernetes").is_none());
        }

        #[test]
        fn root_plugin_is_not_pruned() {
            let mut root = plugin("atlas").with_child(Command::new("clusters"));
            let report = transformer().apply(&mut root);
            assert!(report.pruned_plugins.is_empty());
            assert_eq!(root.children.len(), 1);
        }
    }

    mod long_text_tests {
        use super::*;

        #[test]
        fn appends_text_with_blank_line() {
            let mut texts = LongTextTable::new();
            texts.insert("atlas api", "Extra text.");
            let t = Transformer::new(TransformConfig::new("atlas").with_long_texts(texts));
            let mut root = Command::new("atlas").with_child(
                Command::new("api")
                    .with_long("Access the API.")
                    .with_child(Command::new("clusters")),
            );

            t.apply(&mut root);

            assert_eq!(
                root.child("api").unwrap().long,
                "Access the API.\n\nExtra text."
            );
            assert_eq!(root.find(&["api", "clusters"]).unwrap().long, "");
        }

        #[test]
        fn default_config_appends_embedded_api_text() {
            let t = Transformer::new(TransformConfig::new("atlas"));
            let mut root = Command::new("atlas").with_child(Command::new("api").with_long("x"));
            t.apply(&mut root);
            let long = &root.child("api").unwrap().long;
            assert!(long.starts_with("x\n\n"));
            assert!(long.ends_with(crate::long_text::API_DOCS_LONG_TEXT));
        }
    }

    mod api_tests {
        use super::*;

        const LEGACY_LINK: &str = "For more information and examples, see: https://www.mongodb.com/docs/atlas/cli/current/command/atlas-api-project-list";

        fn api_tree(leaf: Command) -> Command {
            Command::new("atlas")
                .with_child(
                    Command::new("api")
                        .with_short("Access the API.")
                        .with_long(format!("Group.\n{LEGACY_LINK}"))
                        .with_child(Command::new("project").with_short("Projects.").with_child(leaf)),
                )
                .with_child(Command::new("apikeys").with_short("Manage keys."))
        }

        #[test]
        fn api_commands_marked_experimental_once() {
            let mut root = api_tree(Command::new("list").with_short("List projects."));
            transformer().apply(&mut root);

            assert_eq!(
                root.child("api").unwrap().short,
                format!("{EXPERIMENTAL_NOTICE}Access the API.")
            );
            assert_eq!(
                root.find(&["api", "project", "list"]).unwrap().short,
                format!("{EXPERIMENTAL_NOTICE}List projects.")
            );
            assert_eq!(root.child("apikeys").unwrap().short, "Manage keys.");
        }

        #[test]
        fn leaf_docs_link_replaced() {
            let leaf = Command::new("list").with_long(format!("List all projects.\n\n{LEGACY_LINK}"));
            let mut root = api_tree(leaf);
            transformer().apply(&mut root);

            assert_eq!(
                root.find(&["api", "project", "list"]).unwrap().long,
                format!("List all projects.\n\n{API_DOCS_LINK_LINE}")
            );
        }

        #[test]
        fn single_line_docs_link_replaced() {
            let mut root = api_tree(Command::new("list").with_long(LEGACY_LINK));
            transformer().apply(&mut root);
            assert_eq!(
                root.find(&["api", "project", "list"]).unwrap().long,
                API_DOCS_LINK_LINE
            );
        }

        #[test]
        fn group_docs_link_left_alone() {
            let mut root = api_tree(Command::new("list"));
            transformer().apply(&mut root);
            assert_eq!(root.child("api").unwrap().long, format!("Group.\n{LEGACY_LINK}"));
        }

        #[test]
        fn unexpected_last_line_left_alone() {
            let long = format!("{LEGACY_LINK}\nSee also the API reference.");
            let mut root = api_tree(Command::new("list").with_long(long.clone()));
            transformer().apply(&mut root);
            assert_eq!(root.find(&["api", "project", "list"]).unwrap().long, long);
        }

        #[test]
        fn non_api_leaf_docs_link_left_alone() {
            let mut root = Command::new("atlas")
                .with_child(Command::new("projects").with_long(LEGACY_LINK));
            transformer().apply(&mut root);
            assert_eq!(root.child("projects").unwrap().long, LEGACY_LINK);
        }

        #[test]
        fn private_preview_operations_pruned() {
            let mut metadata = Metadata::new();
            metadata.insert("createStreamConnection", OperationMetadata::default().private_preview());
            let t = Transformer::new(TransformConfig::new("atlas").with_metadata(metadata));

            let mut root = api_tree(
                Command::new("create").with_annotation(OPERATION_ID, "createStreamConnection"),
            );
            let report = t.apply(&mut root);

            assert!(root.find(&["api", "project"]).unwrap().children.is_empty());
            assert_eq!(report.pruned_private_preview, ["atlas api project create"]);
        }

        #[test]
        fn private_preview_outside_api_is_kept() {
            let mut metadata = Metadata::new();
            metadata.insert("listThings", OperationMetadata::default().private_preview());
            let t = Transformer::new(TransformConfig::new("atlas").with_metadata(metadata));

            let mut root = Command::new("atlas")
                .with_child(Command::new("things").with_annotation(OPERATION_ID, "listThings"));
            t.apply(&mut root);
            assert!(root.child("things").is_some());
        }

        #[test]
        fn examples_rebuilt_from_metadata() {
            let mut metadata = Metadata::new();
            metadata.insert(
                "listProjects",
                OperationMetadata::default().with_example(
                    "2024-08-05",
                    Example {
                        source: "-".to_string(),
                        flags: [("limit".to_string(), "10".to_string())].into_iter().collect(),
                        ..Example::default()
                    },
                ),
            );
            let t = Transformer::new(
                TransformConfig::new("atlas")
                    .with_metadata(metadata)
                    .with_includes_import_path("/includes"),
            );

            let mut root = api_tree(
                Command::new("list")
                    .with_example("old example")
                    .with_annotation(OPERATION_ID, "listProjects"),
            );
            let report = t.apply(&mut root);

            let list = root.find(&["api", "project", "list"]).unwrap();
            assert!(list.example.starts_with("Examples\n--------\n"));
            assert_eq!(report.includes.len(), 1);
            assert_eq!(
                report.includes[0].name,
                "atlas-api-project-list-2024-08-05-default.sh"
            );
            assert_eq!(
                report.includes[0].contents,
                "atlas api project list --version 2024-08-05 --limit 10\n"
            );
        }

        #[test]
        fn examples_kept_without_metadata_examples() {
            let mut metadata = Metadata::new();
            metadata.insert("listProjects", OperationMetadata::default());
            let t = Transformer::new(TransformConfig::new("atlas").with_metadata(metadata));
            let mut root = api_tree(
                Command::new("list")
                    .with_example("atlas api project list")
                    .with_annotation(OPERATION_ID, "listProjects"),
            );
            let report = t.apply(&mut root);
            assert_eq!(
                root.find(&["api", "project", "list"]).unwrap().example,
                "atlas api project list"
            );
            assert!(report.includes.is_empty());
        }

        #[test]
        fn is_api_command_matches_group_and_descendants() {
            let t = transformer();
            let api = CommandPath::root("atlas").child("api");
            assert!(t.is_api_command(&api));
            assert!(t.is_api_command(&api.child("clusters")));
            assert!(!t.is_api_command(&CommandPath::root("atlas")));
            assert!(!t.is_api_command(&CommandPath::root("atlas").child("apikeys")));
            assert!(!t.is_api_command(&CommandPath::root("mongocli").child("api")));
        }
    }

    mod flag_tests {
        use super::*;

        fn metadata() -> Metadata {
            let mut metadata = Metadata::new();
            metadata.insert(
                "X",
                OperationMetadata::default()
                    .with_parameter("limit", "Page limit (1-500)")
                    .with_parameter("roles", "Roles|---|---|---|---| to grant"),
            );
            metadata
        }

        fn limit() -> Flag {
            Flag::new("limit", "Original usage.")
        }

        #[test]
        fn usage_replaced_for_annotated_command() {
            let t = Transformer::new(TransformConfig::new("atlas").with_metadata(metadata()));
            let mut root = Command::new("atlas").with_child(
                Command::new("list")
                    .with_annotation(OPERATION_ID, "X")
                    .with_flag(limit())
                    .with_flag(Flag::new("roles", "r"))
                    .with_flag(Flag::new("output", "Output format.")),
            );

            let report = t.apply(&mut root);

            let flags = &root.child("list").unwrap().flags;
            assert_eq!(flags[0].usage, "Page limit (1-500)");
            assert_eq!(flags[1].usage, "Roles to grant");
            assert_eq!(flags[2].usage, "Output format.");
            assert_eq!(report.flags_rewritten, 2);
        }

        #[test]
        fn usage_untouched_without_operation_id() {
            let t = Transformer::new(TransformConfig::new("atlas").with_metadata(metadata()));
            let mut root = Command::new("atlas")
                .with_child(Command::new("list").with_flag(limit()))
                .with_child(
                    Command::new("empty")
                        .with_annotation(OPERATION_ID, "")
                        .with_flag(limit()),
                );

            let report = t.apply(&mut root);

            assert_eq!(root.child("list").unwrap().flags[0].usage, "Original usage.");
            assert_eq!(root.child("empty").unwrap().flags[0].usage, "Original usage.");
            assert_eq!(report.flags_rewritten, 0);
        }

        #[test]
        fn usage_untouched_for_unknown_operation() {
            let t = Transformer::new(TransformConfig::new("atlas").with_metadata(metadata()));
            let mut root = Command::new("atlas").with_child(
                Command::new("list")
                    .with_annotation(OPERATION_ID, "Y")
                    .with_flag(limit()),
            );
            t.apply(&mut root);
            assert_eq!(root.child("list").unwrap().flags[0].usage, "Original usage.");
        }
    }
}

//! First-class plugin registry.
//!
//! Plugin commands are normally left out of the generated reference. A
//! first-class plugin is one whose commands are documented as if they were
//! built in, so its commands survive the transformation.

use serde::{Deserialize, Serialize};

/// A command contributed by a first-class plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginCommand {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// A plugin promoted into the primary documentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirstClassPlugin {
    pub name: String,

    /// `owner/repo` of the plugin's GitHub repository.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,

    #[serde(default)]
    pub commands: Vec<PluginCommand>,
}

impl FirstClassPlugin {
    pub fn new(name: impl Into<String>) -> Self {
        FirstClassPlugin {
            name: name.into(),
            github: None,
            commands: Vec::new(),
        }
    }

    pub fn with_github(mut self, github: impl Into<String>) -> Self {
        self.github = Some(github.into());
        self
    }

    pub fn with_command(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.commands.push(PluginCommand {
            name: name.into(),
            description: description.into(),
        });
        self
    }
}

/// The set of first-class plugins known to the doc build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginRegistry {
    plugins: Vec<FirstClassPlugin>,
}

impl PluginRegistry {
    pub fn new(plugins: Vec<FirstClassPlugin>) -> Self {
        PluginRegistry { plugins }
    }

    /// A registry with no first-class plugins.
    pub fn empty() -> Self {
        PluginRegistry::new(Vec::new())
    }

    /// The plugins shipped with the Atlas CLI.
    pub fn builtin() -> Vec<FirstClassPlugin> {
        vec![
            FirstClassPlugin::new("atlas-cli-plugin-kubernetes")
                .with_github("mongodb/atlas-cli-plugin-kubernetes")
                .with_command("kubernetes", "Manage Kubernetes resources."),
        ]
    }

    pub fn plugins(&self) -> &[FirstClassPlugin] {
        &self.plugins
    }

    /// Every command name contributed by a first-class plugin.
    pub fn command_names(&self) -> impl Iterator<Item = &str> {
        self.plugins
            .iter()
            .flat_map(|p| p.commands.iter())
            .map(|c| c.name.as_str())
    }

    /// True when a first-class plugin provides a command named `name`.
    pub fn is_first_class(&self, name: &str) -> bool {
        self.command_names().any(|c| c == name)
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        PluginRegistry::new(PluginRegistry::builtin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_has_kubernetes() {
        let registry = PluginRegistry::default();
        assert!(registry.is_first_class("kubernetes"));
        assert!(!registry.is_first_class("example"));
    }

    #[test]
    fn command_names_span_all_plugins() {
        let registry = PluginRegistry::new(vec![
            FirstClassPlugin::new("one").with_command("a", "").with_command("b", ""),
            FirstClassPlugin::new("two").with_command("c", ""),
        ]);
        let names: Vec<_> = registry.command_names().collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn empty_registry_knows_nothing() {
        let registry = PluginRegistry::empty();
        assert_eq!(registry.command_names().count(), 0);
        assert!(!registry.is_first_class("kubernetes"));
    }
}

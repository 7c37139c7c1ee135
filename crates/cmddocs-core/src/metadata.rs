//! API operation metadata.
//!
//! Generated alongside the API commands, keyed by operation identifier. The
//! doc pipeline reads three things from it: per-parameter usage overrides,
//! request examples, and whether an operation is only in private preview.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Table row separator that the RST toolchain rejects as a substitution reference.
const TABLE_ROW_SEPARATOR: &str = "|---|---|---|---|";

/// Namespace placeholder that the RST toolchain parses as a malformed link.
const NAMESPACE_PLACEHOLDER: &str = "`<database>.<collection>`";
const NAMESPACE_LITERAL: &str = "``<database>.<collection>``";

/// Operation identifier → operation metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(BTreeMap<String, OperationMetadata>);

impl Metadata {
    pub fn new() -> Self {
        Metadata::default()
    }

    /// Parse metadata from its JSON form.
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn insert(&mut self, operation_id: impl Into<String>, operation: OperationMetadata) {
        self.0.insert(operation_id.into(), operation);
    }

    pub fn get(&self, operation_id: &str) -> Option<&OperationMetadata> {
        self.0.get(operation_id)
    }

    /// Usage override for `parameter` of `operation_id`, if both are known.
    pub fn parameter(&self, operation_id: &str, parameter: &str) -> Option<&ParameterMetadata> {
        self.get(operation_id)?.parameters.get(parameter)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, OperationMetadata)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (String, OperationMetadata)>>(iter: I) -> Self {
        Metadata(iter.into_iter().collect())
    }
}

/// Metadata for one API operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationMetadata {
    /// Parameter name → parameter metadata.
    #[serde(default)]
    pub parameters: BTreeMap<String, ParameterMetadata>,

    /// API version → examples for that version.
    #[serde(default)]
    pub examples: BTreeMap<String, Vec<Example>>,

    /// Operations only available in private preview are left out of the docs.
    #[serde(default)]
    pub only_private_preview: bool,
}

impl OperationMetadata {
    pub fn with_parameter(mut self, name: impl Into<String>, usage: impl Into<String>) -> Self {
        self.parameters.insert(
            name.into(),
            ParameterMetadata {
                usage: usage.into(),
            },
        );
        self
    }

    pub fn with_example(mut self, version: impl Into<String>, example: Example) -> Self {
        self.examples.entry(version.into()).or_default().push(example);
        self
    }

    pub fn private_preview(mut self) -> Self {
        self.only_private_preview = true;
        self
    }

    /// Total examples across all versions.
    pub fn example_count(&self) -> usize {
        self.examples.values().map(Vec::len).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterMetadata {
    #[serde(default)]
    pub usage: String,
}

impl ParameterMetadata {
    /// Usage text with the constructs the RST toolchain cannot build removed.
    pub fn sanitized_usage(&self) -> String {
        self.usage
            .replace(TABLE_ROW_SEPARATOR, "")
            .replace(NAMESPACE_PLACEHOLDER, NAMESPACE_LITERAL)
    }
}

/// A request example for one API version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    /// Where the example came from; `-` marks the default example.
    #[serde(default)]
    pub source: String,

    /// Tab title; unnamed examples get numbered titles.
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Request body. Empty for operations without a payload.
    #[serde(default)]
    pub value: String,

    /// Flag name → value passed on the example command line.
    #[serde(default)]
    pub flags: BTreeMap<String, String>,
}

impl Example {
    /// Identifier-safe form of `source` used in tab ids and include file names.
    pub fn source_slug(&self) -> String {
        if self.source == "-" {
            return "default".to_string();
        }
        self.source.replace(' ', "_").to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_json_metadata() {
        let json = r#"{
            "listClusters": {
                "parameters": {
                    "limit": {"usage": "Page limit (1-500)"}
                },
                "examples": {
                    "2024-08-05": [
                        {"source": "-", "flags": {"groupId": "32b6e34b3d91647abb20e7b8"}}
                    ]
                }
            },
            "createStreamProcessor": {"onlyPrivatePreview": true}
        }"#;
        let metadata = Metadata::from_json_str(json).unwrap();

        assert_eq!(metadata.len(), 2);
        assert_eq!(
            metadata
                .parameter("listClusters", "limit")
                .map(|p| p.usage.as_str()),
            Some("Page limit (1-500)")
        );
        assert_eq!(metadata.get("listClusters").unwrap().example_count(), 1);
        assert!(metadata.get("createStreamProcessor").unwrap().only_private_preview);
        assert!(metadata.parameter("listClusters", "missing").is_none());
        assert!(metadata.parameter("missing", "limit").is_none());
    }

    #[test]
    fn sanitized_usage_drops_table_rows() {
        let param = ParameterMetadata {
            usage: "Roles:|---|---|---|---| read, write".to_string(),
        };
        assert_eq!(param.sanitized_usage(), "Roles: read, write");
    }

    #[test]
    fn sanitized_usage_quotes_namespace() {
        let param = ParameterMetadata {
            usage: "Namespace as `<database>.<collection>`.".to_string(),
        };
        assert_eq!(
            param.sanitized_usage(),
            "Namespace as ``<database>.<collection>``."
        );
    }

    #[test]
    fn source_slug() {
        let mut example = Example {
            source: "-".to_string(),
            ..Example::default()
        };
        assert_eq!(example.source_slug(), "default");

        example.source = "Cluster Settings".to_string();
        assert_eq!(example.source_slug(), "cluster_settings");
    }
}

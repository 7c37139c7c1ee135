//! Supplementary long descriptions, keyed by command path.

use std::collections::BTreeMap;

/// Text appended to the long description of the `<root> api` command.
pub const API_DOCS_LONG_TEXT: &str = include_str!("../assets/api_docs_long_text.txt");

/// Full command path (`atlas api`) → text appended to that command's long description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LongTextTable(BTreeMap<String, String>);

impl LongTextTable {
    pub fn new() -> Self {
        LongTextTable::default()
    }

    /// Table holding the embedded API group text for `root_name`.
    pub fn with_api_docs(root_name: &str) -> Self {
        let mut table = LongTextTable::new();
        table.insert(format!("{root_name} api"), API_DOCS_LONG_TEXT);
        table
    }

    pub fn insert(&mut self, path: impl Into<String>, text: impl Into<String>) {
        self.0.insert(path.into(), text.into());
    }

    /// Text for `path`; empty entries count as missing.
    pub fn get(&self, path: &str) -> Option<&str> {
        self.0
            .get(path)
            .map(String::as_str)
            .filter(|text| !text.is_empty())
    }
}

impl Extend<(String, String)> for LongTextTable {
    fn extend<I: IntoIterator<Item = (String, String)>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_docs_keyed_on_root_name() {
        let table = LongTextTable::with_api_docs("atlas");
        assert_eq!(table.get("atlas api"), Some(API_DOCS_LONG_TEXT));
        assert!(table.get("mongocli api").is_none());
    }

    #[test]
    fn empty_entry_is_missing() {
        let mut table = LongTextTable::new();
        table.insert("atlas clusters", "");
        assert!(table.get("atlas clusters").is_none());
    }

    #[test]
    fn extend_overrides() {
        let mut table = LongTextTable::with_api_docs("atlas");
        table.extend([("atlas api".to_string(), "custom".to_string())]);
        assert_eq!(table.get("atlas api"), Some("custom"));
    }
}

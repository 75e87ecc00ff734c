// Template Entry - a single named item in the template
//
// An entry is immutable once created: this version has no edit or delete
// operation, so entries live as long as the model does.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A named entry of the template: a parameter, variable, function, or typed
/// resource, owned by one deployment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateEntry {
    /// Name of the owning deployment.
    pub deployment: String,

    /// Ordered, non-empty set of kind tags. Scalar entries carry exactly one
    /// tag; resource entries carry their subtype plus the `Resource` umbrella.
    pub classes: Vec<String>,

    /// Unique identifier across all entries in the model.
    pub name: String,

    /// Opaque payload. Unused in this version, always `None`.
    pub content: Option<serde_json::Value>,
}

impl TemplateEntry {
    pub fn new(deployment: impl Into<String>, classes: Vec<String>, name: impl Into<String>) -> Self {
        TemplateEntry {
            deployment: deployment.into(),
            classes,
            name: name.into(),
            content: None,
        }
    }

    /// The `objects` query predicate: deployment selected, at least one class
    /// tag selected, and the name contains `filter_text` as a contiguous
    /// substring. An empty filter matches everything.
    pub fn matches(
        &self,
        selected_deployments: &BTreeSet<String>,
        selected_kinds: &BTreeSet<String>,
        filter_text: &str,
    ) -> bool {
        selected_deployments.contains(&self.deployment)
            && self.classes.iter().any(|class| selected_kinds.contains(class))
            && self.name.contains(filter_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn vnet_entry() -> TemplateEntry {
        TemplateEntry::new(
            "<default>",
            vec!["Resource".to_string(), "VNet".to_string()],
            "cassandra-vnet",
        )
    }

    #[test]
    fn test_new_entry_has_no_content() {
        let entry = vnet_entry();
        assert!(entry.content.is_none());
        assert_eq!(entry.name, "cassandra-vnet");
        assert_eq!(entry.deployment, "<default>");
    }

    #[test]
    fn test_matches_requires_selected_deployment() {
        let entry = vnet_entry();
        assert!(entry.matches(&set(&["<default>"]), &set(&["Resource"]), ""));
        assert!(!entry.matches(&set(&["stress-set"]), &set(&["Resource"]), ""));
        assert!(!entry.matches(&set(&[]), &set(&["Resource"]), ""));
    }

    #[test]
    fn test_matches_on_any_shared_class_tag() {
        let entry = vnet_entry();
        let deployments = set(&["<default>"]);

        assert!(entry.matches(&deployments, &set(&["VNet"]), ""));
        assert!(entry.matches(&deployments, &set(&["Resource"]), ""));
        assert!(entry.matches(&deployments, &set(&["VNet", "Parameter"]), ""));
        assert!(!entry.matches(&deployments, &set(&["Parameter"]), ""));
        assert!(!entry.matches(&deployments, &set(&[]), ""));
    }

    #[test]
    fn test_matches_filter_substring() {
        let entry = vnet_entry();
        let deployments = set(&["<default>"]);
        let kinds = set(&["VNet"]);

        assert!(entry.matches(&deployments, &kinds, ""));
        assert!(entry.matches(&deployments, &kinds, "cass"));
        assert!(entry.matches(&deployments, &kinds, "-vnet"));
        assert!(!entry.matches(&deployments, &kinds, "nsg"));
        assert!(!entry.matches(&deployments, &kinds, "CASS")); // case-sensitive
    }
}

// Kind Taxonomy - the fixed classification tree for template entries
//
// Four top-level kinds: Parameter, Variable, Function, Resource. Resource is
// an umbrella over the concrete resource subtypes (VNet, Network Security
// Group). The tree is static for this version; no operation adds kinds at
// runtime.

use serde::{Deserialize, Serialize};

/// The umbrella tag every resource-subtype entry also carries.
pub const RESOURCE: &str = "Resource";

/// The three top-level kinds that are not resources. An entry of one of these
/// belongs to exactly that single kind.
pub const SCALAR_KINDS: [&str; 3] = ["Parameter", "Variable", "Function"];

// ============================================================================
// KIND TREE
// ============================================================================

/// One node of the kind taxonomy. Leaves have no children.
///
/// The tree is kept as ordered vectors rather than a map so browsers render
/// roots and subtypes in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindNode {
    pub name: String,
    pub children: Vec<KindNode>,
}

impl KindNode {
    fn leaf(name: &str) -> Self {
        KindNode {
            name: name.to_string(),
            children: Vec::new(),
        }
    }

    fn branch(name: &str, children: Vec<KindNode>) -> Self {
        KindNode {
            name: name.to_string(),
            children,
        }
    }
}

/// The built-in taxonomy. Constant across calls.
pub fn builtin() -> Vec<KindNode> {
    vec![
        KindNode::leaf("Parameter"),
        KindNode::leaf("Variable"),
        KindNode::leaf("Function"),
        KindNode::branch(
            RESOURCE,
            vec![KindNode::leaf("VNet"), KindNode::leaf("Network Security Group")],
        ),
    ]
}

/// Whether `kind` names any node of the tree, umbrella included.
pub fn contains(tree: &[KindNode], kind: &str) -> bool {
    tree.iter()
        .any(|node| node.name == kind || contains(&node.children, kind))
}

/// Whether `kind` is one of the three non-resource top-level kinds.
pub fn is_scalar(kind: &str) -> bool {
    SCALAR_KINDS.contains(&kind)
}

/// The class set for a new entry of `kind`: the kind alone for the scalar
/// kinds, the kind plus the `Resource` umbrella for resource subtypes.
/// `kind` must not be the umbrella itself; the model rejects that first.
pub fn classes_for(kind: &str) -> Vec<String> {
    if is_scalar(kind) {
        vec![kind.to_string()]
    } else {
        vec![kind.to_string(), RESOURCE.to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tree_shape() {
        let tree = builtin();

        let roots: Vec<&str> = tree.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(roots, ["Parameter", "Variable", "Function", "Resource"]);

        // Only Resource has children
        for node in &tree {
            if node.name == RESOURCE {
                let subtypes: Vec<&str> = node.children.iter().map(|n| n.name.as_str()).collect();
                assert_eq!(subtypes, ["VNet", "Network Security Group"]);
            } else {
                assert!(node.children.is_empty());
            }
        }
    }

    #[test]
    fn test_contains_covers_all_levels() {
        let tree = builtin();

        assert!(contains(&tree, "Parameter"));
        assert!(contains(&tree, "Resource"));
        assert!(contains(&tree, "VNet"));
        assert!(contains(&tree, "Network Security Group"));

        assert!(!contains(&tree, "Gateway"));
        assert!(!contains(&tree, ""));
        assert!(!contains(&tree, "vnet")); // tags are case-sensitive
    }

    #[test]
    fn test_classes_for_scalar_kinds() {
        assert_eq!(classes_for("Parameter"), vec!["Parameter"]);
        assert_eq!(classes_for("Variable"), vec!["Variable"]);
        assert_eq!(classes_for("Function"), vec!["Function"]);
    }

    #[test]
    fn test_classes_for_resource_subtypes() {
        assert_eq!(classes_for("VNet"), vec!["VNet", "Resource"]);
        assert_eq!(
            classes_for("Network Security Group"),
            vec!["Network Security Group", "Resource"]
        );
    }
}

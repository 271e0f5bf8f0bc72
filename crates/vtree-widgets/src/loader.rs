//! Lazy subtree loading: the child descriptors a data endpoint returns, and
//! the request the widget issues for them.
//!
//! # Example
//!
//! ```
//! use vtree_widgets::loader::parse_children;
//!
//! let children = parse_children(
//!     r#"[{"id": "ex:Agent", "text": "Agent", "children": [{"id": "ex:Person", "leaf": true}]}]"#,
//! )
//! .unwrap();
//! assert_eq!(children[0].id, "ex:Agent");
//! assert_eq!(children[0].children.as_ref().map(Vec::len), Some(1));
//! ```

use serde::{Deserialize, Serialize};
use vtree_core::NodeId;

/// One child node as delivered by the data endpoint.
///
/// `children`, when present, is materialized in the same load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDescriptor {
    /// Missing identifiers decode as blank and are rejected by the tree.
    #[serde(default)]
    pub id: NodeId,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub leaf: bool,
    /// UI node class; `"complete"` marks nodes whose checkbox stays live
    /// under a checked ancestor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cls: Option<String>,
    #[serde(
        default,
        rename = "iconCls",
        skip_serializing_if = "Option::is_none"
    )]
    pub icon_cls: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<NodeDescriptor>>,
}

impl NodeDescriptor {
    /// Create a descriptor with an identifier and label.
    #[must_use]
    pub fn new(id: impl Into<NodeId>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            ..Self::default()
        }
    }

    /// Mark as a leaf (no children to load).
    #[must_use]
    pub fn leaf(mut self) -> Self {
        self.leaf = true;
        self
    }

    /// Set the UI node class.
    #[must_use]
    pub fn with_class(mut self, cls: impl Into<String>) -> Self {
        self.cls = Some(cls.into());
        self
    }

    /// Set the icon class.
    #[must_use]
    pub fn with_icon(mut self, icon_cls: impl Into<String>) -> Self {
        self.icon_cls = Some(icon_cls.into());
        self
    }

    /// Add an inline child.
    #[must_use]
    pub fn child(mut self, node: NodeDescriptor) -> Self {
        self.children.get_or_insert_with(Vec::new).push(node);
        self
    }

    /// Total descriptors in this subtree, including `self`.
    #[must_use]
    pub fn subtree_len(&self) -> usize {
        1 + self
            .children
            .iter()
            .flatten()
            .map(NodeDescriptor::subtree_len)
            .sum::<usize>()
    }
}

/// Decode an endpoint response body into child descriptors.
pub fn parse_children(body: &str) -> Result<Vec<NodeDescriptor>, serde_json::Error> {
    serde_json::from_str(body)
}

/// A pending request for the children of `node`.
///
/// The current selection travels with the request so the endpoint can flag
/// branches that lead to selected nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadRequest {
    pub url: String,
    pub node: NodeId,
    #[serde(rename = "arrayOfValues")]
    pub array_of_values: Vec<NodeId>,
    /// Extra parameters, such as an upstream field's selection.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub context: Vec<(String, String)>,
}

impl LoadRequest {
    /// Form-encoded parameter pairs: `node`, then `arrayOfValues[<i>]` for
    /// every selected identifier, then the context pairs.
    #[must_use]
    pub fn params(&self) -> Vec<(String, String)> {
        let mut params =
            Vec::with_capacity(self.array_of_values.len() + self.context.len() + 1);
        params.push(("node".to_owned(), self.node.to_string()));
        for (index, id) in self.array_of_values.iter().enumerate() {
            params.push((format!("arrayOfValues[{index}]"), id.to_string()));
        }
        params.extend(self.context.iter().cloned());
        params
    }

    /// Attach `values` as `<name>[<i>]` context pairs.
    #[must_use]
    pub fn with_context(mut self, name: &str, values: &[NodeId]) -> Self {
        for (index, id) in values.iter().enumerate() {
            self.context.push((format!("{name}[{index}]"), id.to_string()));
        }
        self
    }
}

//! Call graph node representation.

use serde::{Deserialize, Serialize};

use crate::signature::ParsedLabel;

/// Unique identifier for a node in the call graph.
///
/// Identifiers take the form `node<N>` and are handed out in order of first
/// encounter within a single analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Creates the identifier for the `ordinal`-th distinct signature.
    #[must_use]
    pub fn from_ordinal(ordinal: usize) -> Self {
        Self(format!("node{ordinal}"))
    }

    /// Returns the string representation of this node ID.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Position of a node within the caller chain, derived from its degree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeType {
    /// No outgoing edges: the top of an explored caller chain.
    ///
    /// A freshly created node has no edges, so this is the default.
    #[default]
    Root,
    /// Outgoing edges but nothing calls into it.
    Leaf,
    /// Both called and calling within the graph.
    Intermediate,
}

impl NodeType {
    /// Classifies a node from its final degrees.
    #[must_use]
    pub const fn classify(in_degree: usize, out_degree: usize) -> Self {
        if out_degree == 0 {
            Self::Root
        } else if in_degree == 0 {
            Self::Leaf
        } else {
            Self::Intermediate
        }
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Root => "ROOT",
            Self::Leaf => "LEAF",
            Self::Intermediate => "INTERMEDIATE",
        };
        f.write_str(label)
    }
}

/// A node in the call graph representing one method signature.
///
/// Field names serialise in camelCase because graph viewers embed the JSON
/// payload verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallNode {
    id: NodeId,
    class_name: String,
    method_name: String,
    params: String,
    package_name: String,
    class_color: String,
    is_entry: bool,
    node_type: NodeType,
    is_override: bool,
}

impl CallNode {
    /// Creates a node from a parsed label.
    #[must_use]
    pub fn new(id: NodeId, label: ParsedLabel, class_color: impl Into<String>) -> Self {
        Self {
            id,
            class_name: label.class_name,
            method_name: label.method_name,
            params: label.params,
            package_name: label.package_name,
            class_color: class_color.into(),
            is_entry: false,
            node_type: NodeType::default(),
            is_override: label.is_override,
        }
    }

    /// Marks the node as an analysis entry point.
    #[must_use]
    pub const fn with_entry(mut self, is_entry: bool) -> Self {
        self.is_entry = is_entry;
        self
    }

    /// Returns the unique identifier for this node.
    #[must_use]
    pub const fn id(&self) -> &NodeId {
        &self.id
    }

    /// Returns the class name or anonymous context.
    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Returns the method name.
    #[must_use]
    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    /// Returns the HTML-escaped parameter list.
    #[must_use]
    pub fn params(&self) -> &str {
        &self.params
    }

    /// Returns the package name.
    #[must_use]
    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    /// Returns the colour shared by every node of the same class.
    #[must_use]
    pub fn class_color(&self) -> &str {
        &self.class_color
    }

    /// Returns whether the node was one of the chosen starting points.
    #[must_use]
    pub const fn is_entry(&self) -> bool {
        self.is_entry
    }

    /// Returns the node's classification.
    #[must_use]
    pub const fn node_type(&self) -> NodeType {
        self.node_type
    }

    /// Returns whether the label carried an `[Override]` marker.
    #[must_use]
    pub const fn is_override(&self) -> bool {
        self.is_override
    }

    /// Returns `Class.method`.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.class_name, self.method_name)
    }

    /// Escalates the entry flag. It never goes back to false.
    pub(crate) fn mark_entry(&mut self) {
        self.is_entry = true;
    }

    pub(crate) fn set_node_type(&mut self, node_type: NodeType) {
        self.node_type = node_type;
    }
}

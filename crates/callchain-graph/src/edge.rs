//! Call graph edge representation.

use serde::{Deserialize, Serialize};

use crate::node::NodeId;

/// A directed edge meaning "source calls target".
///
/// `recursive` is only set for back-edges recorded when cycles are marked
/// rather than dropped, and is omitted from the serialised form otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallEdge {
    source: NodeId,
    target: NodeId,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    recursive: bool,
}

impl CallEdge {
    /// Creates a new call edge from caller to callee.
    #[must_use]
    pub const fn new(caller: NodeId, callee: NodeId) -> Self {
        Self {
            source: caller,
            target: callee,
            recursive: false,
        }
    }

    /// Creates a back-edge closing a detected cycle.
    #[must_use]
    pub const fn recursive(caller: NodeId, callee: NodeId) -> Self {
        Self {
            source: caller,
            target: callee,
            recursive: true,
        }
    }

    /// Returns the caller node ID.
    #[must_use]
    pub const fn source(&self) -> &NodeId {
        &self.source
    }

    /// Returns the callee node ID.
    #[must_use]
    pub const fn target(&self) -> &NodeId {
        &self.target
    }

    /// Returns whether this edge closes a cycle.
    #[must_use]
    pub const fn is_recursive(&self) -> bool {
        self.recursive
    }

    /// Identity used for deduplication: the ordered pair rendered as
    /// `source->target`.
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}->{}", self.source, self.target)
    }

    pub(crate) fn references(&self, id: &NodeId) -> bool {
        &self.source == id || &self.target == id
    }
}

//! Node identity management for a single analysis run.
//!
//! The registry maps each distinct [`MethodSignature`] to a stable
//! [`NodeId`] and owns the node records plus the per-class colour palette.
//! One registry belongs to one run; nothing here is shared between runs.

use std::collections::{HashMap, HashSet};

use rand::Rng;
use rand::rngs::StdRng;
use tracing::warn;

use crate::color::DistinctColorGenerator;
use crate::node::{CallNode, NodeId};
use crate::signature::{MethodSignature, ParsedLabel};

const IDENTITY_TARGET: &str = "callchain_graph::identity";

/// Assigns node identities and class colours.
#[derive(Debug)]
pub struct NodeRegistry<R = StdRng> {
    ids: HashMap<MethodSignature, NodeId>,
    nodes: HashMap<NodeId, CallNode>,
    order: Vec<NodeId>,
    palette: ClassPalette<R>,
}

impl NodeRegistry<StdRng> {
    /// Creates an empty registry with an entropy-seeded palette.
    #[must_use]
    pub fn new() -> Self {
        Self::with_generator(DistinctColorGenerator::new())
    }

    /// Creates an empty registry whose palette is reproducible.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::with_generator(DistinctColorGenerator::seeded(seed))
    }
}

impl Default for NodeRegistry<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> NodeRegistry<R> {
    /// Creates an empty registry drawing colours from `generator`.
    #[must_use]
    pub fn with_generator(generator: DistinctColorGenerator<R>) -> Self {
        Self {
            ids: HashMap::new(),
            nodes: HashMap::new(),
            order: Vec::new(),
            palette: ClassPalette::new(generator),
        }
    }

    /// Returns the node for `signature`, creating it on first encounter.
    ///
    /// The entry flag only escalates: passing `true` marks an existing node
    /// as an entry, passing `false` never clears it. Labels that do not
    /// follow the grammar yield a degraded node rather than an error.
    pub fn get_or_create(&mut self, signature: &MethodSignature, is_entry: bool) -> &CallNode {
        let id = match self.ids.get(signature).cloned() {
            Some(id) => id,
            None => {
                let id = NodeId::from_ordinal(self.order.len() + 1);
                self.ids.insert(signature.clone(), id.clone());
                self.order.push(id.clone());
                id
            }
        };

        let palette = &mut self.palette;
        let node = self
            .nodes
            .entry(id)
            .or_insert_with_key(|id| build_node(id.clone(), signature, palette));
        if is_entry {
            node.mark_entry();
        }
        node
    }

    /// Returns the identifier already assigned to `signature`.
    #[must_use]
    pub fn id_of(&self, signature: &MethodSignature) -> Option<&NodeId> {
        self.ids.get(signature)
    }

    /// Returns the node with the given identifier.
    #[must_use]
    pub fn node(&self, id: &NodeId) -> Option<&CallNode> {
        self.nodes.get(id)
    }

    /// Returns the colour assigned to `class_name`, generating one if the
    /// class has not been seen yet.
    pub fn color_for_class(&mut self, class_name: &str) -> String {
        self.palette.color_for(class_name)
    }

    /// Number of distinct signatures seen.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns whether no signature has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Consumes the registry, yielding nodes in order of first encounter.
    #[must_use]
    pub fn into_nodes(mut self) -> Vec<CallNode> {
        self.order
            .iter()
            .filter_map(|id| self.nodes.remove(id))
            .collect()
    }
}

fn build_node<R: Rng>(
    id: NodeId,
    signature: &MethodSignature,
    palette: &mut ClassPalette<R>,
) -> CallNode {
    let label = signature.parse().unwrap_or_else(|| {
        warn!(
            target: IDENTITY_TARGET,
            label = %signature,
            "unable to parse method label; using placeholder node"
        );
        ParsedLabel::degraded(signature.as_str())
    });
    let color = palette.color_for(&label.class_name);
    CallNode::new(id, label, color)
}

/// Memoised class → colour assignments for one run.
#[derive(Debug)]
struct ClassPalette<R> {
    assigned: HashMap<String, String>,
    used: HashSet<String>,
    generator: DistinctColorGenerator<R>,
}

impl<R: Rng> ClassPalette<R> {
    fn new(generator: DistinctColorGenerator<R>) -> Self {
        Self {
            assigned: HashMap::new(),
            used: HashSet::new(),
            generator,
        }
    }

    fn color_for(&mut self, class_name: &str) -> String {
        if let Some(color) = self.assigned.get(class_name) {
            return color.clone();
        }
        let mut color = self.generator.generate(&self.used);
        // Sampling could in principle land on a used colour; retry so that no
        // two classes in one graph share a colour.
        while self.used.contains(&color) {
            color = self.generator.generate(&self.used);
        }
        self.used.insert(color.clone());
        self.assigned.insert(class_name.to_owned(), color.clone());
        color
    }
}

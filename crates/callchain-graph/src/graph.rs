//! Call graph structure and assembly.
//!
//! [`GraphAssembler`] accumulates edges while a traversal runs and
//! guarantees at most one edge per ordered `(source, target)` pair.
//! [`finalize`] turns the accumulated nodes and edges into an immutable
//! [`CallGraph`], classifying every node from its final degrees and
//! optionally pruning entry points that nothing calls.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::debug;

use crate::edge::CallEdge;
use crate::error::GraphError;
use crate::node::{CallNode, NodeId, NodeType};

const ASSEMBLER_TARGET: &str = "callchain_graph::assembler";

/// Accumulates edges discovered during a traversal.
#[derive(Debug, Clone, Default)]
pub struct GraphAssembler {
    edges: Vec<CallEdge>,
    positions: HashMap<(NodeId, NodeId), usize>,
}

impl GraphAssembler {
    /// Creates an empty assembler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an edge unless the same ordered pair was already recorded.
    ///
    /// A plain call edge replaces a recursive back-edge stored for the same
    /// pair, so the flag never depends on discovery order. Returns true when
    /// the pair was new.
    pub fn add_edge(&mut self, edge: CallEdge) -> bool {
        let pair = (edge.source().clone(), edge.target().clone());
        if let Some(&position) = self.positions.get(&pair) {
            if let Some(stored) = self.edges.get_mut(position)
                && stored.is_recursive()
                && !edge.is_recursive()
            {
                *stored = edge;
            }
            return false;
        }
        self.positions.insert(pair, self.edges.len());
        self.edges.push(edge);
        true
    }

    /// Returns whether an edge `source -> target` was recorded.
    #[must_use]
    pub fn contains_edge(&self, source: &NodeId, target: &NodeId) -> bool {
        self.positions.contains_key(&(source.clone(), target.clone()))
    }

    /// Returns the number of distinct edges recorded.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Consumes the assembler, yielding the deduplicated edges in discovery
    /// order.
    #[must_use]
    pub fn into_edges(self) -> Vec<CallEdge> {
        self.edges
    }
}

/// Builds the final graph from accumulated nodes and edges.
///
/// Duplicate edges collapse to one and edges referencing unknown nodes are
/// discarded. With `prune_uncalled_entries`, entry nodes with no incoming
/// edges are removed together with their edges, repeating until no such
/// entry remains, so that pruning a finished graph again changes nothing.
#[must_use]
pub fn finalize(nodes: Vec<CallNode>, edges: Vec<CallEdge>, prune_uncalled_entries: bool) -> CallGraph {
    let mut graph = CallGraph::from_parts(nodes, edges);
    if prune_uncalled_entries {
        graph.prune_uncalled_entries();
    }
    graph.classify();
    debug!(
        target: ASSEMBLER_TARGET,
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        pruned = prune_uncalled_entries,
        "graph finalised"
    );
    graph
}

/// A finished call graph: deduplicated nodes and edges, every node
/// classified.
///
/// Serialises as `{ "nodes": [...], "edges": [...] }`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CallGraph {
    nodes: Vec<CallNode>,
    edges: Vec<CallEdge>,
    #[serde(skip)]
    index: HashMap<NodeId, usize>,
}

impl CallGraph {
    /// Creates a new empty call graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn from_parts(nodes: Vec<CallNode>, edges: Vec<CallEdge>) -> Self {
        let mut graph = Self::default();
        for node in nodes {
            if graph.index.contains_key(node.id()) {
                continue;
            }
            graph.index.insert(node.id().clone(), graph.nodes.len());
            graph.nodes.push(node);
        }

        let mut assembler = GraphAssembler::new();
        for edge in edges {
            if graph.index.contains_key(edge.source()) && graph.index.contains_key(edge.target()) {
                assembler.add_edge(edge);
            }
        }
        graph.edges = assembler.into_edges();
        graph
    }

    fn prune_uncalled_entries(&mut self) {
        loop {
            let uncalled: HashSet<NodeId> = self
                .nodes
                .iter()
                .filter(|node| node.is_entry() && self.in_degree(node.id()) == 0)
                .map(|node| node.id().clone())
                .collect();
            if uncalled.is_empty() {
                return;
            }
            debug!(
                target: ASSEMBLER_TARGET,
                removed = uncalled.len(),
                "pruning uncalled entry methods"
            );
            self.nodes.retain(|node| !uncalled.contains(node.id()));
            self.edges
                .retain(|edge| !uncalled.iter().any(|id| edge.references(id)));
            self.reindex();
        }
    }

    fn reindex(&mut self) {
        self.index = self
            .nodes
            .iter()
            .enumerate()
            .map(|(position, node)| (node.id().clone(), position))
            .collect();
    }

    fn classify(&mut self) {
        let mut incoming: HashMap<NodeId, usize> = HashMap::new();
        let mut outgoing: HashMap<NodeId, usize> = HashMap::new();
        for edge in &self.edges {
            *outgoing.entry(edge.source().clone()).or_default() += 1;
            *incoming.entry(edge.target().clone()).or_default() += 1;
        }
        for node in &mut self.nodes {
            let in_degree = incoming.get(node.id()).copied().unwrap_or_default();
            let out_degree = outgoing.get(node.id()).copied().unwrap_or_default();
            node.set_node_type(NodeType::classify(in_degree, out_degree));
        }
    }

    /// Returns the node with the given ID.
    #[must_use]
    pub fn node(&self, id: &NodeId) -> Option<&CallNode> {
        self.index
            .get(id)
            .and_then(|&position| self.nodes.get(position))
    }

    /// Returns the node with the given ID, or an error if not found.
    ///
    /// # Errors
    /// Returns `GraphError::NodeNotFound` if no node with the given ID exists.
    pub fn get_node(&self, id: &NodeId) -> Result<&CallNode, GraphError> {
        self.node(id)
            .ok_or_else(|| GraphError::node_not_found(id.as_str()))
    }

    /// Returns the nodes in order of first discovery.
    #[must_use]
    pub fn nodes(&self) -> &[CallNode] {
        &self.nodes
    }

    /// Returns the number of nodes in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the edges in order of first discovery.
    #[must_use]
    pub fn edges(&self) -> &[CallEdge] {
        &self.edges
    }

    /// Returns the number of edges in the graph.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns whether the graph is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns whether the graph contains a node with the given ID.
    #[must_use]
    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.index.contains_key(id)
    }

    /// Returns whether the graph has an edge `source -> target`.
    #[must_use]
    pub fn contains_edge(&self, source: &NodeId, target: &NodeId) -> bool {
        self.edges
            .iter()
            .any(|edge| edge.source() == source && edge.target() == target)
    }

    /// Number of edges whose target is `id`.
    #[must_use]
    pub fn in_degree(&self, id: &NodeId) -> usize {
        self.edges.iter().filter(|edge| edge.target() == id).count()
    }

    /// Number of edges whose source is `id`.
    #[must_use]
    pub fn out_degree(&self, id: &NodeId) -> usize {
        self.edges.iter().filter(|edge| edge.source() == id).count()
    }

    /// Returns the nodes that call the given node.
    pub fn callers_of<'a>(&'a self, id: &'a NodeId) -> impl Iterator<Item = &'a CallNode> + 'a {
        self.edges
            .iter()
            .filter(move |edge| edge.target() == id)
            .filter_map(|edge| self.node(edge.source()))
    }

    /// Returns the nodes called by the given node.
    pub fn callees_of<'a>(&'a self, id: &'a NodeId) -> impl Iterator<Item = &'a CallNode> + 'a {
        self.edges
            .iter()
            .filter(move |edge| edge.source() == id)
            .filter_map(|edge| self.node(edge.target()))
    }

    /// Returns the nodes classified as [`NodeType::Root`].
    pub fn roots(&self) -> impl Iterator<Item = &CallNode> {
        self.nodes_of_type(NodeType::Root)
    }

    /// Returns the nodes classified as [`NodeType::Leaf`].
    pub fn leaves(&self) -> impl Iterator<Item = &CallNode> {
        self.nodes_of_type(NodeType::Leaf)
    }

    fn nodes_of_type(&self, node_type: NodeType) -> impl Iterator<Item = &CallNode> {
        self.nodes
            .iter()
            .filter(move |node| node.node_type() == node_type)
    }

    /// Finds a node by `Class.method` or bare method name.
    ///
    /// Returns the first match in discovery order.
    #[must_use]
    pub fn find_by_method(&self, name: &str) -> Option<&CallNode> {
        self.nodes
            .iter()
            .find(|node| node.method_name() == name || node.qualified_name() == name)
    }

    /// Re-runs pruning and classification on an already finished graph.
    #[must_use]
    pub fn refinalize(self, prune_uncalled_entries: bool) -> Self {
        finalize(self.nodes, self.edges, prune_uncalled_entries)
    }
}

//! Ingestion of indentation-based textual call hierarchies.
//!
//! Each non-blank line holds one method label. A line indented one level
//! deeper than the line above it is a caller of that line; lines at column
//! zero are entry methods. Cycles appear as marker lines of the form
//! `[... Recursive call to <label> ...]`.
//!
//! ```text
//! Foo.bar()  (com.example)
//!     Baz.qux()  (com.example)
//!         Main.main(String[])  (com.example)
//!     [... Recursive call to Foo.bar()  (com.example) ...]
//! ```

use tracing::debug;

use crate::edge::CallEdge;
use crate::explorer::CyclePolicy;
use crate::graph::{CallGraph, GraphAssembler, finalize};
use crate::identity::NodeRegistry;
use crate::node::NodeId;
use crate::signature::MethodSignature;

const TEXT_TARGET: &str = "callchain_graph::text";
const RECURSIVE_PREFIX: &str = "[... Recursive call to ";
const RECURSIVE_SUFFIX: &str = " ...]";

/// Default number of spaces per indentation level.
pub const DEFAULT_INDENT_WIDTH: usize = 4;

/// Builds a [`CallGraph`] from an indented call hierarchy.
#[derive(Debug, Clone)]
pub struct TextHierarchyBuilder {
    indent_width: usize,
    cycle_policy: CyclePolicy,
    color_seed: Option<u64>,
}

impl Default for TextHierarchyBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_INDENT_WIDTH)
    }
}

impl TextHierarchyBuilder {
    /// Creates a builder using `indent_width` spaces per level.
    ///
    /// A width of zero is treated as one.
    #[must_use]
    pub fn new(indent_width: usize) -> Self {
        Self {
            indent_width: indent_width.max(1),
            cycle_policy: CyclePolicy::default(),
            color_seed: None,
        }
    }

    /// Sets how recursive marker lines are recorded.
    #[must_use]
    pub const fn with_cycle_policy(mut self, cycle_policy: CyclePolicy) -> Self {
        self.cycle_policy = cycle_policy;
        self
    }

    /// Fixes the colour seed for reproducible output.
    #[must_use]
    pub const fn with_color_seed(mut self, seed: u64) -> Self {
        self.color_seed = Some(seed);
        self
    }

    /// Parses `text` and finalises the resulting graph.
    #[must_use]
    pub fn build(&self, text: &str, prune_uncalled_entries: bool) -> CallGraph {
        let mut registry = self
            .color_seed
            .map_or_else(NodeRegistry::new, NodeRegistry::seeded);
        let mut assembler = GraphAssembler::new();
        // Node of the most recent line at each depth.
        let mut ancestors: Vec<NodeId> = Vec::new();

        for (number, raw) in text.lines().enumerate() {
            let content = raw.trim();
            if content.is_empty() {
                continue;
            }

            let indent = raw.len() - raw.trim_start_matches(' ').len();
            let depth = indent
                .checked_div(self.indent_width)
                .unwrap_or_default()
                .min(ancestors.len());
            ancestors.truncate(depth);
            let parent = ancestors.last().cloned();

            if let Some(label) = recursive_target(content) {
                debug!(
                    target: TEXT_TARGET,
                    line = number + 1,
                    label,
                    "recursive call marker"
                );
                if let (Some(callee), CyclePolicy::Mark) = (&parent, self.cycle_policy) {
                    let source = registry
                        .get_or_create(&MethodSignature::new(label), false)
                        .id()
                        .clone();
                    assembler.add_edge(CallEdge::recursive(source, callee.clone()));
                }
                continue;
            }

            let is_entry = depth == 0;
            let id = registry
                .get_or_create(&MethodSignature::new(content), is_entry)
                .id()
                .clone();
            if let Some(callee) = parent {
                assembler.add_edge(CallEdge::new(id.clone(), callee));
            }
            ancestors.push(id);
        }

        finalize(
            registry.into_nodes(),
            assembler.into_edges(),
            prune_uncalled_entries,
        )
    }
}

fn recursive_target(content: &str) -> Option<&str> {
    content
        .strip_prefix(RECURSIVE_PREFIX)?
        .strip_suffix(RECURSIVE_SUFFIX)
        .map(str::trim)
}

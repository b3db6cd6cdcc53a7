//! Reverse call-chain exploration.
//!
//! Starting from one or more entry methods, the [`CallChainExplorer`] asks a
//! [`CallerResolver`] for the direct callers of each method and follows them
//! depth first until no new caller remains. The traversal keeps the chain
//! from the current entry to the method being expanded; a caller already on
//! that chain closes a cycle and is not followed again.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cancel::CancellationToken;
use crate::edge::CallEdge;
use crate::error::GraphError;
use crate::graph::{CallGraph, GraphAssembler, finalize};
use crate::identity::NodeRegistry;
use crate::node::NodeId;
use crate::signature::MethodSignature;

const EXPLORER_TARGET: &str = "callchain_graph::explorer";

/// Where a method's source lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// Production sources.
    Production,
    /// Test sources.
    Test,
    /// Classification unavailable.
    Unknown,
}

/// Which callers are accepted into the traversal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisScope {
    /// Every caller, regardless of origin.
    #[default]
    All,
    /// Callers from production sources only.
    ProductionOnly,
    /// Callers from test sources only.
    TestOnly,
}

impl AnalysisScope {
    /// Returns whether a caller of the given origin passes this scope.
    ///
    /// Outside [`AnalysisScope::All`], callers of unknown origin are
    /// rejected rather than guessed.
    #[must_use]
    pub const fn accepts(self, origin: Origin) -> bool {
        match self {
            Self::All => true,
            Self::ProductionOnly => matches!(origin, Origin::Production),
            Self::TestOnly => matches!(origin, Origin::Test),
        }
    }
}

impl fmt::Display for AnalysisScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::All => "all",
            Self::ProductionOnly => "production",
            Self::TestOnly => "test",
        };
        f.write_str(label)
    }
}

/// What to do with the back-edge when a caller closes a cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CyclePolicy {
    /// Stop recursing and leave the back-edge out of the graph.
    #[default]
    Drop,
    /// Stop recursing but record the back-edge, flagged as recursive.
    Mark,
}

/// External capability answering "who calls this method".
///
/// Implementations typically wrap an IDE reference search or a symbol
/// index; tests use in-memory maps.
pub trait CallerResolver {
    /// Failure raised by the backing index.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns the direct callers of `method`, in any order.
    ///
    /// # Errors
    /// Returns an error if the lookup fails.
    fn callers_of(&mut self, method: &MethodSignature) -> Result<Vec<MethodSignature>, Self::Error>;

    /// Classifies where `method` is declared.
    fn classify_origin(&self, method: &MethodSignature) -> Origin;
}

/// Tunables for one exploration.
#[derive(Debug, Clone, Default)]
pub struct ExploreOptions {
    /// Caller origin filter.
    pub scope: AnalysisScope,
    /// Back-edge handling.
    pub cycle_policy: CyclePolicy,
    /// Maximum number of caller hops from an entry; `None` is unbounded.
    pub max_depth: Option<u32>,
    /// Seed for class colours; `None` draws from system entropy.
    pub color_seed: Option<u64>,
}

/// Nodes and edges discovered by one exploration, ready for finalisation.
#[derive(Debug)]
pub struct Exploration {
    registry: NodeRegistry,
    assembler: GraphAssembler,
}

impl Exploration {
    /// Returns the registry holding every discovered node.
    #[must_use]
    pub const fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    /// Returns the accumulated edges.
    #[must_use]
    pub const fn assembler(&self) -> &GraphAssembler {
        &self.assembler
    }

    /// Finalises into a classified graph.
    #[must_use]
    pub fn into_graph(self, prune_uncalled_entries: bool) -> CallGraph {
        finalize(
            self.registry.into_nodes(),
            self.assembler.into_edges(),
            prune_uncalled_entries,
        )
    }
}

/// Depth-first reverse call-chain explorer.
pub struct CallChainExplorer<'a, C> {
    resolver: &'a mut C,
    options: ExploreOptions,
    cancel: CancellationToken,
}

struct Traversal {
    entries: HashSet<MethodSignature>,
    path: HashSet<MethodSignature>,
    registry: NodeRegistry,
    assembler: GraphAssembler,
}

impl Traversal {
    fn register(&mut self, method: &MethodSignature) -> NodeId {
        let is_entry = self.entries.contains(method);
        self.registry.get_or_create(method, is_entry).id().clone()
    }
}

impl<'a, C: CallerResolver> CallChainExplorer<'a, C> {
    /// Creates an explorer over `resolver`.
    #[must_use]
    pub fn new(resolver: &'a mut C, options: ExploreOptions, cancel: CancellationToken) -> Self {
        Self {
            resolver,
            options,
            cancel,
        }
    }

    /// Explores the callers of every entry method.
    ///
    /// # Errors
    /// Returns [`GraphError::Cancelled`] if the token trips, and
    /// [`GraphError::Resolver`] if a caller lookup fails. No partial result
    /// is returned in either case.
    pub fn explore(&mut self, entry_methods: &[MethodSignature]) -> Result<Exploration, GraphError> {
        let registry = self
            .options
            .color_seed
            .map_or_else(NodeRegistry::new, NodeRegistry::seeded);
        let mut traversal = Traversal {
            entries: entry_methods.iter().cloned().collect(),
            path: HashSet::new(),
            registry,
            assembler: GraphAssembler::new(),
        };

        for entry in entry_methods {
            traversal.path.clear();
            self.visit(&mut traversal, entry, 0)?;
        }

        Ok(Exploration {
            registry: traversal.registry,
            assembler: traversal.assembler,
        })
    }

    fn visit(
        &mut self,
        traversal: &mut Traversal,
        method: &MethodSignature,
        depth: u32,
    ) -> Result<(), GraphError> {
        self.cancel.check()?;
        let target = traversal.register(method);
        if self.options.max_depth.is_some_and(|max| depth >= max) {
            return Ok(());
        }

        // The current method joins the chain before its callers are checked,
        // so a method calling itself is caught on the first hop.
        traversal.path.insert(method.clone());
        let result = self.expand(traversal, method, &target, depth);
        traversal.path.remove(method);
        result
    }

    fn expand(
        &mut self,
        traversal: &mut Traversal,
        method: &MethodSignature,
        target: &NodeId,
        depth: u32,
    ) -> Result<(), GraphError> {
        let callers = self.callers_in_scope(method)?;
        debug!(
            target: EXPLORER_TARGET,
            method = %method,
            callers = callers.len(),
            depth,
            "expanding callers"
        );

        for caller in callers {
            if traversal.path.contains(&caller) {
                debug!(
                    target: EXPLORER_TARGET,
                    method = %method,
                    caller = %caller,
                    "recursive call detected"
                );
                if self.options.cycle_policy == CyclePolicy::Mark {
                    let source = traversal.register(&caller);
                    traversal
                        .assembler
                        .add_edge(CallEdge::recursive(source, target.clone()));
                }
                continue;
            }

            let source = traversal.register(&caller);
            traversal
                .assembler
                .add_edge(CallEdge::new(source, target.clone()));
            self.visit(traversal, &caller, depth.saturating_add(1))?;
        }
        Ok(())
    }

    fn callers_in_scope(&mut self, method: &MethodSignature) -> Result<Vec<MethodSignature>, GraphError> {
        self.cancel.check()?;
        let found = self
            .resolver
            .callers_of(method)
            .map_err(|error| GraphError::resolver_with_source(method.clone(), error))?;
        self.cancel.check()?;

        let mut seen = HashSet::new();
        let scope = self.options.scope;
        Ok(found
            .into_iter()
            .filter(|caller| seen.insert(caller.clone()))
            .filter(|caller| scope.accepts(self.resolver.classify_origin(caller)))
            .collect())
    }
}

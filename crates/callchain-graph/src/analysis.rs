//! Single entry point tying exploration, assembly, and rendering together.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::cancel::CancellationToken;
use crate::error::GraphError;
use crate::explorer::{AnalysisScope, CallChainExplorer, CallerResolver, CyclePolicy, ExploreOptions};
use crate::graph::CallGraph;
use crate::render::{OutputSink, RenderTarget};
use crate::signature::MethodSignature;

const ANALYSIS_TARGET: &str = "callchain_graph::analysis";

/// Everything the host supplies for one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    /// Methods whose callers are wanted.
    pub entry_methods: Vec<MethodSignature>,
    /// Caller origin filter.
    pub scope: AnalysisScope,
    /// Where the rendered graph goes.
    pub output: OutputSink,
    /// Drop entry methods that nothing calls.
    pub prune_uncalled_entries: bool,
    /// Back-edge handling for cycles.
    pub cycle_policy: CyclePolicy,
    /// Maximum caller hops from an entry.
    pub max_depth: Option<u32>,
    /// Seed for class colours.
    pub color_seed: Option<u64>,
}

impl AnalysisRequest {
    /// Creates a request with default scope, policy, and limits.
    #[must_use]
    pub fn new(entry_methods: Vec<MethodSignature>, output: OutputSink) -> Self {
        Self {
            entry_methods,
            scope: AnalysisScope::default(),
            output,
            prune_uncalled_entries: false,
            cycle_policy: CyclePolicy::default(),
            max_depth: None,
            color_seed: None,
        }
    }

    fn explore_options(&self) -> ExploreOptions {
        ExploreOptions {
            scope: self.scope,
            cycle_policy: self.cycle_policy,
            max_depth: self.max_depth,
            color_seed: self.color_seed,
        }
    }
}

/// Result of a completed run.
#[derive(Debug)]
pub struct AnalysisReport {
    /// The finished graph handed to the render target.
    pub graph: CallGraph,
    /// Path the render target wrote.
    pub written: PathBuf,
}

/// Explores and finalises without rendering.
///
/// # Errors
/// Returns [`GraphError::Cancelled`] when `cancel` trips and
/// [`GraphError::Resolver`] when a caller lookup fails.
pub fn build_graph<C: CallerResolver>(
    request: &AnalysisRequest,
    resolver: &mut C,
    cancel: &CancellationToken,
) -> Result<CallGraph, GraphError> {
    debug!(
        target: ANALYSIS_TARGET,
        entries = request.entry_methods.len(),
        scope = %request.scope,
        "starting call chain analysis"
    );

    let exploration = CallChainExplorer::new(resolver, request.explore_options(), cancel.clone())
        .explore(&request.entry_methods)
        .inspect_err(|error| {
            if error.is_cancellation() {
                debug!(target: ANALYSIS_TARGET, "analysis cancelled");
            }
        })?;
    let graph = exploration.into_graph(request.prune_uncalled_entries);

    info!(
        target: ANALYSIS_TARGET,
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "call chain analysis completed"
    );
    Ok(graph)
}

/// Runs one analysis and hands the finished graph to `target`.
///
/// Nothing is rendered when the run is cancelled or fails.
///
/// # Errors
/// Returns analysis errors as for [`build_graph`], and
/// [`GraphError::Render`] when the render target fails.
pub fn analyse<C, T>(
    request: &AnalysisRequest,
    resolver: &mut C,
    cancel: &CancellationToken,
    target: &mut T,
) -> Result<AnalysisReport, GraphError>
where
    C: CallerResolver,
    T: RenderTarget,
{
    let graph = build_graph(request, resolver, cancel)?;
    cancel.check()?;
    let written = target.render(&graph, &request.output)?;
    info!(
        target: ANALYSIS_TARGET,
        path = %written.display(),
        "graph rendered"
    );
    Ok(AnalysisReport { graph, written })
}

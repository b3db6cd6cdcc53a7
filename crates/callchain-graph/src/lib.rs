//! Reverse call-chain analysis for JVM-style method labels.
//!
//! Given one or more entry methods, this crate discovers every method that
//! calls them, transitively, and assembles the result into a classified call
//! graph ready for visualisation.
//!
//! # Core Types
//!
//! - [`MethodSignature`] - Canonical label identifying a method
//! - [`CallNode`] - A method in the graph, with its class colour
//! - [`CallEdge`] - A directed "caller calls callee" relation
//! - [`CallGraph`] - The finished graph with degree-based node types
//!
//! # Building Graphs
//!
//! The [`CallChainExplorer`] walks callers through a [`CallerResolver`]
//! supplied by the host. [`analyse`] wraps exploration, finalisation, and
//! rendering into one call. Graphs captured earlier as indented text can be
//! rebuilt with [`TextHierarchyBuilder`].
//!
//! # Example
//!
//! ```ignore
//! use callchain_graph::{AnalysisRequest, CancellationToken, JsonFileTarget, OutputSink, analyse};
//!
//! let request = AnalysisRequest::new(entries, OutputSink::new("out", "graph"));
//! let report = analyse(&request, &mut resolver, &CancellationToken::new(), &mut JsonFileTarget)?;
//! println!("wrote {}", report.written.display());
//! ```

mod analysis;
mod cancel;
mod color;
mod edge;
mod error;
mod explorer;
mod graph;
mod identity;
mod node;
mod render;
mod signature;
mod text;

pub use analysis::{AnalysisReport, AnalysisRequest, analyse, build_graph};
pub use cancel::CancellationToken;
pub use color::{CANDIDATE_COUNT, DistinctColorGenerator, Hsb};
pub use edge::CallEdge;
pub use error::{GraphError, RenderError};
pub use explorer::{
    AnalysisScope, CallChainExplorer, CallerResolver, CyclePolicy, ExploreOptions, Exploration,
    Origin,
};
pub use graph::{CallGraph, GraphAssembler, finalize};
pub use identity::NodeRegistry;
pub use node::{CallNode, NodeId, NodeType};
pub use render::{JsonFileTarget, OutputSink, RenderTarget, to_json};
pub use signature::{MethodSignature, ParsedLabel, UNKNOWN_CLASS};
pub use text::{DEFAULT_INDENT_WIDTH, TextHierarchyBuilder};

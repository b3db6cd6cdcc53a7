//! Error types for call chain analysis.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::signature::MethodSignature;

/// Errors returned by call chain analysis.
///
/// An empty graph is a valid outcome and never reported here. Malformed
/// method labels are recovered locally and never reach this type either.
#[derive(Debug, Error)]
pub enum GraphError {
    /// The external caller resolver failed while expanding a method.
    #[error("failed to resolve callers of '{method}': {message}")]
    Resolver {
        /// Method whose callers were being expanded.
        method: MethodSignature,
        /// Description supplied by the resolver.
        message: String,
        /// Underlying resolver failure, if any.
        #[source]
        source: Option<Arc<dyn std::error::Error + Send + Sync>>,
    },

    /// The analysis was cancelled before it completed.
    #[error("analysis cancelled")]
    Cancelled,

    /// The render target failed to accept the finished graph.
    #[error("failed to render graph: {0}")]
    Render(#[from] RenderError),

    /// The requested node was not found in the graph.
    #[error("node not found: {0}")]
    NodeNotFound(String),
}

impl GraphError {
    /// Creates a new `Resolver` error without an underlying source.
    #[must_use]
    pub fn resolver(method: MethodSignature, message: impl Into<String>) -> Self {
        Self::Resolver {
            method,
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new `Resolver` error wrapping the resolver's own failure.
    #[must_use]
    pub fn resolver_with_source<E>(method: MethodSignature, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Resolver {
            method,
            message: source.to_string(),
            source: Some(Arc::new(source)),
        }
    }

    /// Creates a new `NodeNotFound` error.
    #[must_use]
    pub fn node_not_found(node_id: impl Into<String>) -> Self {
        Self::NodeNotFound(node_id.into())
    }

    /// Returns true when the error is a clean cancellation rather than a
    /// failure.
    #[must_use]
    pub const fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Errors raised by render targets while writing a finished graph.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The graph could not be serialised.
    #[error("failed to serialise graph: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Writing to the output sink failed.
    #[error("failed to write {path}: {source}")]
    Io {
        /// Path that could not be written.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl RenderError {
    /// Creates a new `Io` error for the given path.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

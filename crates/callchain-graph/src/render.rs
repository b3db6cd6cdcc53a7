//! Render targets accepting finished graphs.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::RenderError;
use crate::graph::CallGraph;

/// Destination for a rendered graph: a directory and a base filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSink {
    /// Directory receiving the output. Created when missing.
    pub directory: PathBuf,
    /// File name without extension.
    pub filename: String,
}

impl OutputSink {
    /// Creates a new output sink.
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>, filename: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            filename: filename.into(),
        }
    }

    /// Full path for the given extension.
    #[must_use]
    pub fn path_with_extension(&self, extension: &str) -> PathBuf {
        self.directory.join(format!("{}.{extension}", self.filename))
    }
}

/// Consumer of finished graphs.
pub trait RenderTarget {
    /// Renders `graph` into `sink`, returning the path written.
    ///
    /// # Errors
    /// Returns an error if serialisation or writing fails.
    fn render(&mut self, graph: &CallGraph, sink: &OutputSink) -> Result<PathBuf, RenderError>;
}

/// Serialises a graph as the JSON payload embedded by graph viewers.
///
/// # Errors
/// Returns an error if serialisation fails.
pub fn to_json(graph: &CallGraph) -> Result<String, RenderError> {
    Ok(serde_json::to_string_pretty(graph)?)
}

/// Writes `<directory>/<filename>.json`.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonFileTarget;

impl RenderTarget for JsonFileTarget {
    fn render(&mut self, graph: &CallGraph, sink: &OutputSink) -> Result<PathBuf, RenderError> {
        let payload = to_json(graph)?;
        create_directory(&sink.directory)?;
        let path = sink.path_with_extension("json");
        fs::write(&path, payload).map_err(|source| RenderError::io(&path, source))?;
        Ok(path)
    }
}

fn create_directory(directory: &Path) -> Result<(), RenderError> {
    fs::create_dir_all(directory).map_err(|source| RenderError::io(directory, source))
}

//! Error types for the CLI runtime.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use callchain_graph::{GraphError, RenderError};
use thiserror::Error;

use crate::telemetry::TelemetryError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(Arc<ortho_config::OrthoError>),
    #[error("{0}")]
    CliUsage(clap::Error),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error("failed to install interrupt handler: {0}")]
    InstallSignalHandler(io::Error),
    #[error("failed to read call map {path}: {source}")]
    ReadCallMap { path: PathBuf, source: io::Error },
    #[error("failed to parse call map {path}: {source}")]
    ParseCallMap {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to read call hierarchy {path}: {source}")]
    ReadHierarchy { path: PathBuf, source: io::Error },
    #[error("call chain analysis failed: {0}")]
    Analysis(#[from] GraphError),
    #[error("failed to write graph: {0}")]
    Render(#[from] RenderError),
    #[error("failed to write summary: {0}")]
    WriteOutput(io::Error),
}

impl AppError {
    pub(crate) const fn is_cancellation(&self) -> bool {
        matches!(self, Self::Analysis(error) if error.is_cancellation())
    }
}

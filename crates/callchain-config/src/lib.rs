//! Shared configuration for the callchain binary.
//!
//! Values are layered by `ortho_config`: built-in defaults, then the
//! configuration file (`--config-path` or `CALLCHAIN_CONFIG_PATH`), then
//! `CALLCHAIN_*` environment variables, then command-line flags.

mod defaults;
mod logging;

use camino::{Utf8Path, Utf8PathBuf};
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_INDENT_WIDTH, DEFAULT_LOG_FILTER, DEFAULT_OUTPUT_DIR, default_indent_width,
    default_log_filter, default_log_filter_string, default_log_format, default_output_dir,
};
pub use logging::{LogFormat, LogFormatParseError};

/// Flags consumed by the configuration loader rather than by subcommands.
pub const CONFIG_CLI_FLAGS: &[&str] = &[
    "--config-path",
    "--log-filter",
    "--log-format",
    "--output-dir",
    "--indent-width",
];

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "CALLCHAIN")]
pub struct Config {
    /// Tracing filter directive, in `RUST_LOG` syntax.
    #[serde(default = "default_log_filter_string")]
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Log line format.
    #[serde(default = "default_log_format")]
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
    /// Directory receiving rendered graphs.
    #[serde(default = "default_output_dir")]
    #[ortho_config(default = default_output_dir())]
    pub output_dir: Utf8PathBuf,
    /// Spaces per level when importing indented hierarchies.
    #[serde(default = "default_indent_width")]
    #[ortho_config(default = default_indent_width())]
    pub indent_width: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            output_dir: default_output_dir(),
            indent_width: default_indent_width(),
        }
    }
}

impl Config {
    /// Tracing filter directive.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Log line format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Directory receiving rendered graphs.
    #[must_use]
    pub fn output_dir(&self) -> &Utf8Path {
        &self.output_dir
    }

    /// Spaces per indentation level, never less than one.
    #[must_use]
    pub fn indent_width(&self) -> usize {
        self.indent_width.max(1)
    }
}

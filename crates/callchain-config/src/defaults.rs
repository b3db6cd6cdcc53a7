use camino::Utf8PathBuf;

use crate::logging::LogFormat;

/// Default log filter expression used by the binary.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Directory receiving rendered graphs when none is configured.
pub const DEFAULT_OUTPUT_DIR: &str = "callchain-output";

/// Spaces per level in indented call hierarchies.
pub const DEFAULT_INDENT_WIDTH: usize = 4;

/// Default log filter expression used by the binary.
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the binary.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Compact
}

/// Default output directory for rendered graphs.
#[must_use]
pub fn default_output_dir() -> Utf8PathBuf {
    Utf8PathBuf::from(DEFAULT_OUTPUT_DIR)
}

/// Default indentation width for hierarchy import.
#[must_use]
pub const fn default_indent_width() -> usize {
    DEFAULT_INDENT_WIDTH
}

//! CLI entrypoint for the callchain analyser.
//!
//! The binary delegates to [`callchain_cli::run`], which loads configuration,
//! parses the subcommand, and writes the resulting call graph.

use std::io::{self, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    callchain_cli::run(std::env::args_os(), &mut stdout, &mut stderr)
}

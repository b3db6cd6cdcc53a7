//! Command-line runtime for the callchain analyser.
//!
//! The module owns argument parsing, configuration bootstrapping, telemetry,
//! and dispatch to the graph builders. IO streams and the configuration
//! loader are injectable so the runner can be exercised in-process by tests.

use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use callchain_config::Config;
use callchain_graph::{
    AnalysisRequest, CallGraph, CancellationToken, JsonFileTarget, MethodSignature, OutputSink,
    RenderTarget, TextHierarchyBuilder, analyse,
};
use clap::Parser;
use tracing::{debug, info};

mod cli;
mod config;
mod errors;
mod resolver;
mod telemetry;

use cli::{AnalyseArgs, Cli, CliCommand, ImportArgs};
use config::split_config_arguments;
pub(crate) use config::{ConfigLoader, OrthoConfigLoader};
pub(crate) use errors::AppError;
use resolver::CallMapResolver;

const CLI_TARGET: &str = "callchain_cli";

/// Exit status reported when the run was interrupted.
pub const EXIT_CANCELLED: u8 = 130;

/// Bundles the IO streams provided to the CLI runtime.
pub(crate) struct IoStreams<'a, W: Write, E: Write> {
    pub(crate) stdout: &'a mut W,
    pub(crate) stderr: &'a mut E,
}

impl<'a, W: Write, E: Write> IoStreams<'a, W, E> {
    pub(crate) const fn new(stdout: &'a mut W, stderr: &'a mut E) -> Self {
        Self { stdout, stderr }
    }
}

struct CliRunner<'a, W: Write, E: Write, L: ConfigLoader> {
    io: &'a mut IoStreams<'a, W, E>,
    loader: &'a L,
    cancel: CancellationToken,
}

impl<'a, W, E, L> CliRunner<'a, W, E, L>
where
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    fn new(io: &'a mut IoStreams<'a, W, E>, loader: &'a L, cancel: CancellationToken) -> Self {
        Self { io, loader, cancel }
    }

    fn run<I>(&mut self, args: I) -> ExitCode
    where
        I: IntoIterator<Item = OsString>,
    {
        let args: Vec<OsString> = args.into_iter().collect();
        let split = split_config_arguments(&args);

        let result = Cli::try_parse_from(split.command_arguments)
            .map_err(AppError::CliUsage)
            .and_then(|cli| {
                self.loader
                    .load(&split.config_arguments)
                    .map(|config| (cli, config))
            })
            .and_then(|(cli, config)| {
                telemetry::initialise(&config)?;
                self.execute(cli.command, &config)
            });

        match result {
            Ok(()) => ExitCode::SUCCESS,
            Err(AppError::CliUsage(error)) if !error.use_stderr() => {
                // Help and version requests are not failures.
                let _ = write!(self.io.stdout, "{error}");
                ExitCode::SUCCESS
            }
            Err(error) if error.is_cancellation() => {
                debug!(target: CLI_TARGET, "run interrupted");
                ExitCode::from(EXIT_CANCELLED)
            }
            Err(error) => {
                let _ = writeln!(self.io.stderr, "{error}");
                ExitCode::FAILURE
            }
        }
    }

    fn execute(&mut self, command: CliCommand, config: &Config) -> Result<(), AppError> {
        let graph_output = match command {
            CliCommand::Analyse(args) => self.run_analysis(&args, config)?,
            CliCommand::Import(args) => run_import(&args, config)?,
        };
        writeln!(
            self.io.stdout,
            "wrote {} ({} nodes, {} edges)",
            graph_output.path.display(),
            graph_output.nodes,
            graph_output.edges
        )
        .map_err(AppError::WriteOutput)
    }

    fn run_analysis(&self, args: &AnalyseArgs, config: &Config) -> Result<GraphOutput, AppError> {
        let mut resolver = CallMapResolver::load(&args.call_map)?;
        let mut request = AnalysisRequest::new(
            args.entries.iter().map(MethodSignature::new).collect(),
            output_sink(config, &args.graph.name),
        );
        request.scope = args.scope.into();
        request.prune_uncalled_entries = args.graph.prune;
        request.cycle_policy = args.graph.cycle_policy();
        request.max_depth = args.max_depth;
        request.color_seed = args.graph.seed;

        let report = analyse(&request, &mut resolver, &self.cancel, &mut JsonFileTarget)?;
        Ok(GraphOutput::new(&report.graph, report.written))
    }
}

struct GraphOutput {
    path: PathBuf,
    nodes: usize,
    edges: usize,
}

impl GraphOutput {
    fn new(graph: &CallGraph, path: PathBuf) -> Self {
        Self {
            path,
            nodes: graph.node_count(),
            edges: graph.edge_count(),
        }
    }
}

fn output_sink(config: &Config, name: &str) -> OutputSink {
    OutputSink::new(config.output_dir().as_std_path(), name)
}

fn run_import(args: &ImportArgs, config: &Config) -> Result<GraphOutput, AppError> {
    let text = fs::read_to_string(&args.input).map_err(|source| AppError::ReadHierarchy {
        path: args.input.clone(),
        source,
    })?;

    let mut builder = TextHierarchyBuilder::new(config.indent_width())
        .with_cycle_policy(args.graph.cycle_policy());
    if let Some(seed) = args.graph.seed {
        builder = builder.with_color_seed(seed);
    }
    let graph = builder.build(&text, args.graph.prune);

    let sink = output_sink(config, &args.graph.name);
    let path = JsonFileTarget.render(&graph, &sink)?;
    info!(
        target: CLI_TARGET,
        path = %path.display(),
        nodes = graph.node_count(),
        "hierarchy imported"
    );
    Ok(GraphOutput::new(&graph, path))
}

fn install_interrupt_handler(cancel: &CancellationToken) -> Result<(), AppError> {
    signal_hook::flag::register(signal_hook::consts::SIGINT, cancel.flag())
        .map(|_| ())
        .map_err(AppError::InstallSignalHandler)
}

/// Runs the CLI using the provided arguments and IO handles.
///
/// Ctrl-C trips the run's cancellation token; an interrupted analysis
/// writes nothing and exits with [`EXIT_CANCELLED`].
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    let cancel = CancellationToken::new();
    if let Err(error) = install_interrupt_handler(&cancel) {
        let _ = writeln!(stderr, "{error}");
        return ExitCode::FAILURE;
    }
    let mut io = IoStreams::new(stdout, stderr);
    run_with_loader(args, &mut io, &OrthoConfigLoader, cancel)
}

/// Runs the CLI with a custom configuration loader and cancellation token.
pub(crate) fn run_with_loader<'a, I, W, E, L>(
    args: I,
    io: &'a mut IoStreams<'a, W, E>,
    loader: &'a L,
    cancel: CancellationToken,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    CliRunner::new(io, loader, cancel).run(args)
}

#[cfg(test)]
mod tests;

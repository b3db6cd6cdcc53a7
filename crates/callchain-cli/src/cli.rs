//! Command-line argument definitions for the callchain analyser.

use std::path::PathBuf;

use callchain_graph::{AnalysisScope, CyclePolicy};
use clap::{Args, Parser, Subcommand, ValueEnum};

const DEFAULT_GRAPH_NAME: &str = "callchain";

/// Caller origin filter accepted on the command line.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub(crate) enum ScopeArg {
    /// Follow every caller.
    #[default]
    All,
    /// Follow callers declared in production sources only.
    Production,
    /// Follow callers declared in test sources only.
    Test,
}

impl From<ScopeArg> for AnalysisScope {
    fn from(value: ScopeArg) -> Self {
        match value {
            ScopeArg::All => Self::All,
            ScopeArg::Production => Self::ProductionOnly,
            ScopeArg::Test => Self::TestOnly,
        }
    }
}

/// Command-line interface for the callchain analyser.
#[derive(Parser, Debug)]
#[command(name = "callchain", disable_help_subcommand = true)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: CliCommand,
}

#[derive(Subcommand, Debug)]
pub(crate) enum CliCommand {
    /// Explores the callers of entry methods using a recorded call map.
    Analyse(AnalyseArgs),
    /// Rebuilds a graph from an indented call hierarchy.
    Import(ImportArgs),
}

/// Options shared by every graph-producing command.
#[derive(Args, Debug, Clone)]
pub(crate) struct GraphArgs {
    /// Base name of the output file, without extension.
    #[arg(long, default_value = DEFAULT_GRAPH_NAME)]
    pub(crate) name: String,
    /// Removes entry methods that nothing calls.
    #[arg(long)]
    pub(crate) prune: bool,
    /// Keeps cycle back-edges, flagged as recursive.
    #[arg(long)]
    pub(crate) mark_cycles: bool,
    /// Seeds the class colour palette for reproducible output.
    #[arg(long)]
    pub(crate) seed: Option<u64>,
}

impl GraphArgs {
    pub(crate) const fn cycle_policy(&self) -> CyclePolicy {
        if self.mark_cycles {
            CyclePolicy::Mark
        } else {
            CyclePolicy::Drop
        }
    }
}

#[derive(Args, Debug, Clone)]
pub(crate) struct AnalyseArgs {
    /// JSON file mapping each method label to its direct callers.
    #[arg(long, value_name = "PATH")]
    pub(crate) call_map: PathBuf,
    /// Entry method label. Repeat for several entries.
    #[arg(long = "entry", value_name = "LABEL", required = true)]
    pub(crate) entries: Vec<String>,
    /// Which callers to follow.
    #[arg(long, value_enum, default_value_t = ScopeArg::All)]
    pub(crate) scope: ScopeArg,
    /// Maximum caller hops from an entry.
    #[arg(long)]
    pub(crate) max_depth: Option<u32>,
    #[command(flatten)]
    pub(crate) graph: GraphArgs,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct ImportArgs {
    /// Text file holding the indented hierarchy.
    #[arg(long, value_name = "PATH")]
    pub(crate) input: PathBuf,
    #[command(flatten)]
    pub(crate) graph: GraphArgs,
}

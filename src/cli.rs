//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI parser for `agentid`.
#[derive(Debug, Parser)]
#[command(name = "agentid", version, about = "Stable per-host instance IDs for named agents")]
pub struct Cli {
    /// Storage root; takes precedence over --config and AGENTID_ROOT.
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// YAML config file providing `root`.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print a JSON object instead of plain text.
    #[arg(long, global = true)]
    pub json: bool,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// The (host, agent) pair every command operates on.
#[derive(Debug, Clone, Args)]
pub struct Target {
    /// Host UUID.
    pub host_id: String,
    /// Agent name.
    pub agent_name: String,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the agent's instance ID, creating it on first use.
    Get(Target),
    /// Print the agent's instance ID if one has been persisted.
    Show(Target),
    /// Print where the agent's identity record lives.
    Path(Target),
}

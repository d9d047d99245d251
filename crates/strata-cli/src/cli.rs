use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "strata",
    about = "Strata — run filter pipelines against an in-memory data structure",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML file with data structure settings
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Execute a pipeline script on a fresh data structure
    Run(ScriptArgs),
    /// Preflight a pipeline script without executing it
    Check(ScriptArgs),
    /// List registered filters
    Filters(FiltersArgs),
    /// Build the shared-child demo graph and walk through its removal
    Demo,
}

#[derive(Args)]
pub struct ScriptArgs {
    pub script: PathBuf,
}

#[derive(Args)]
pub struct FiltersArgs {
    /// Only show filters whose name contains this text
    pub query: Option<String>,
}

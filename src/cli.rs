//! CLI struct definitions for the hubcheck command-line interface.
//!
//! All clap-derived types live here. Dispatch logic lives in `lib.rs`.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "hubcheck",
    version = env!("CARGO_PKG_VERSION"),
    about = "Validates plugin metadata in a plugin registry and tags released plugin versions.",
    disable_version_flag = true
)]
pub(crate) struct Cli {
    /// Config file (defaults to ./hubcheck.toml when present).
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,
    /// Enable debug diagnostics on stderr.
    #[clap(long, short = 'v', global = true)]
    pub verbose: bool,
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Validate every plugin and tag released versions
    Check(CheckCli),
    /// Print the plugins touched by the changed-file list
    Changed(ChangedCli),
    /// Print a plugin's version at a committed reference
    PreviousVersion(PreviousVersionCli),
    /// Print the hubcheck version
    Version,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

#[derive(clap::Args, Debug)]
pub(crate) struct CheckCli {
    /// Plugins root, relative to the working directory.
    #[clap(long)]
    pub plugins_dir: Option<String>,
    /// Validate and report tags without creating them.
    #[clap(long)]
    pub dry_run: bool,
    /// Output format: 'text' or 'json'.
    #[clap(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(clap::Args, Debug)]
pub(crate) struct ChangedCli {
    /// Plugins root, relative to the working directory.
    #[clap(long)]
    pub plugins_dir: Option<String>,
}

#[derive(clap::Args, Debug)]
pub(crate) struct PreviousVersionCli {
    /// Plugin directory name.
    pub plugin: String,
    /// Reference to read from (defaults to `base_ref` from config).
    #[clap(long = "ref")]
    pub reference: Option<String>,
}

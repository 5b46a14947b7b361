//! hubcheck: metadata gatekeeper and release tagger for plugin registries.
//!
//! A plugin registry keeps one directory per plugin under a plugins root,
//! each with a `metadata.yaml`. On every change CI runs `hubcheck check`,
//! which:
//!
//! - resolves which plugins the change touches from `CHANGED_FILES`
//! - requires a non-empty `name` for every plugin
//! - requires a non-empty `version` for every plugin the change does not
//!   introduce, and tags it in git as `<plugin>|v<version>` if that tag is
//!   missing
//! - prints all problems at the end and exits non-zero if there were any
//!
//! Tags are created locally only. Pushing them is left to the workflow.
//!
//! # Examples
//!
//! ```bash
//! CHANGED_FILES="plugins/alpha/metadata.yaml" hubcheck check
//! hubcheck check --dry-run --format json
//! hubcheck changed
//! hubcheck previous-version beta --ref origin/main
//! ```
//!
//! # Crate Structure
//!
//! - [`core`]: change-set resolution, metadata validation, git access,
//!   tagging and the check run itself

mod cli;
pub mod core;

use crate::cli::{ChangedCli, CheckCli, Cli, Command, OutputFormat, PreviousVersionCli};
use crate::core::changeset::ChangeSet;
use crate::core::check::{self, CheckOptions};
use crate::core::config::HubConfig;
use crate::core::error::HubError;
use crate::core::history;
use crate::core::vcs::GitCli;
use clap::Parser;
use std::io::{self, Write};
use std::path::Path;
use tracing_subscriber::EnvFilter;

pub use crate::core::error;

/// Environment variable controlling the diagnostic filter.
pub const LOG_ENV: &str = "HUBCHECK_LOG";

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "hubcheck=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));
    // Diagnostics go to stderr; stdout carries the check results.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

/// Changed files from the environment variable named by `config`. Unset
/// means no changed files.
fn changed_files_from_env(config: &HubConfig) -> Vec<String> {
    std::env::var(&config.changed_files_env)
        .map(|raw| raw.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

pub fn run() -> Result<(), HubError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let current_dir = std::env::current_dir()?;

    match cli.command {
        Command::Version => {
            println!("v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Command::Check(check_cli) => {
            let config = HubConfig::load(&current_dir, cli.config.as_deref())?;
            run_check_cli(&current_dir, config, check_cli)
        }
        Command::Changed(changed_cli) => {
            let config = HubConfig::load(&current_dir, cli.config.as_deref())?;
            run_changed_cli(config, changed_cli)
        }
        Command::PreviousVersion(pv_cli) => {
            let config = HubConfig::load(&current_dir, cli.config.as_deref())?;
            run_previous_version_cli(&current_dir, config, pv_cli)
        }
    }
}

fn run_check_cli(work_dir: &Path, mut config: HubConfig, cli: CheckCli) -> Result<(), HubError> {
    if let Some(dir) = cli.plugins_dir {
        config.plugins_dir = dir;
    }

    let options = CheckOptions {
        plugins_path: config.plugins_path(work_dir)?,
        plugins_root_name: config.plugins_root_name(),
        metadata_file: config.metadata_file.clone(),
        dry_run: cli.dry_run,
    };
    let changed_files = changed_files_from_env(&config);
    let vcs = GitCli::new(work_dir);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let report = match cli.format {
        OutputFormat::Text => {
            let report = check::run_check(&vcs, &options, &changed_files, &mut out)?;
            check::write_errors(&report, &mut out)?;
            report
        }
        OutputFormat::Json => {
            let report = check::run_check(&vcs, &options, &changed_files, &mut io::sink())?;
            let status = if report.passed() { "pass" } else { "fail" };
            let mut value = serde_json::to_value(&report)?;
            if let Some(obj) = value.as_object_mut() {
                obj.insert("status".to_string(), serde_json::Value::from(status));
            }
            writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
            report
        }
    };
    out.flush()?;

    if report.passed() {
        Ok(())
    } else {
        Err(HubError::ValidationFailed(report.issues.len()))
    }
}

fn run_changed_cli(mut config: HubConfig, cli: ChangedCli) -> Result<(), HubError> {
    if let Some(dir) = cli.plugins_dir {
        config.plugins_dir = dir;
    }
    let raw = std::env::var(&config.changed_files_env).ok();
    let changes = ChangeSet::from_env_value(raw.as_deref(), &config.plugins_root_name());
    for plugin in changes.iter() {
        println!("{}", plugin);
    }
    Ok(())
}

fn run_previous_version_cli(
    work_dir: &Path,
    config: HubConfig,
    cli: PreviousVersionCli,
) -> Result<(), HubError> {
    let reference = cli.reference.unwrap_or_else(|| config.base_ref.clone());
    let vcs = GitCli::new(work_dir);
    if let Some(version) = history::previous_version(
        &vcs,
        &reference,
        &config.plugins_root_name(),
        &cli.plugin,
        &config.metadata_file,
    ) {
        println!("{}", version);
    }
    Ok(())
}

//! The check run: validate every plugin under the plugins root and tag
//! released versions.
//!
//! Per-plugin problems are collected and reported together once all plugins
//! have been visited. Tags for valid plugins are created as the run goes and
//! are kept even if a later plugin fails. Git failures while listing or
//! creating tags abort the run.

use crate::core::changeset::ChangeSet;
use crate::core::error::HubError;
use crate::core::metadata::{self, PluginIssue};
use crate::core::tagger::{self, TagOutcome};
use crate::core::vcs::VersionControl;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info_span};

#[derive(Debug, Clone)]
pub struct CheckOptions {
    /// Absolute plugins root.
    pub plugins_path: PathBuf,
    /// First path segment identifying files under the plugins root.
    pub plugins_root_name: String,
    pub metadata_file: String,
    pub dry_run: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckReport {
    pub plugins_checked: usize,
    #[serde(skip)]
    pub issues: Vec<PluginIssue>,
    pub errors: Vec<String>,
    pub tags_created: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags_pending: Vec<String>,
}

impl CheckReport {
    pub fn passed(&self) -> bool {
        self.issues.is_empty()
    }

    fn record_issues(&mut self, issues: Vec<PluginIssue>) {
        self.errors.extend(issues.iter().map(ToString::to_string));
        self.issues.extend(issues);
    }
}

/// Plugin directories directly under `root`, sorted by name. Non-directory
/// entries and names that are not valid UTF-8 are skipped.
pub fn plugin_dirs(root: &Path) -> Result<Vec<(String, PathBuf)>, HubError> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(root).map_err(HubError::IoError)? {
        let entry = entry.map_err(HubError::IoError)?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            debug!(path = %path.display(), "skipping non UTF-8 plugin directory");
            continue;
        };
        dirs.push((name, path));
    }
    dirs.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(dirs)
}

/// Run the check over every plugin directory.
///
/// `changed_files` are repository-relative paths touched by the change under
/// test. A tag notice line is written to `out` for each tag created (or, in
/// dry-run mode, each tag that would be created).
pub fn run_check(
    vcs: &dyn VersionControl,
    options: &CheckOptions,
    changed_files: &[String],
    out: &mut dyn Write,
) -> Result<CheckReport, HubError> {
    let changes = ChangeSet::from_paths(changed_files, &options.plugins_root_name);
    debug!(changed = changes.len(), "resolved change set");

    let mut report = CheckReport::default();

    for (name, path) in plugin_dirs(&options.plugins_path)? {
        let span = info_span!("plugin", plugin = %name);
        let _enter = span.enter();

        let is_new_plugin = changes.contains(&name);
        let check = metadata::check_plugin(&path, &options.metadata_file, is_new_plugin);
        debug!(
            is_new_plugin,
            issues = check.issues.len(),
            version = ?check.version,
            "checked metadata"
        );
        report.plugins_checked += 1;
        report.record_issues(check.issues);

        let Some(version) = check.version else {
            continue;
        };
        match tagger::ensure_tag(vcs, &name, &version, options.dry_run)? {
            TagOutcome::Created(tag) => {
                writeln!(out, "tagged: {}", tag)?;
                report.tags_created.push(tag);
            }
            TagOutcome::Pending(tag) => {
                writeln!(out, "would tag: {}", tag)?;
                report.tags_pending.push(tag);
            }
            TagOutcome::AlreadyExists(_) => {}
        }
    }

    Ok(report)
}

/// Write accumulated errors, one per line, in the order they were found.
pub fn write_errors(report: &CheckReport, out: &mut dyn Write) -> Result<(), HubError> {
    for error in &report.errors {
        writeln!(out, "{}", error)?;
    }
    Ok(())
}

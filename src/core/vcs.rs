//! Version-control capability used by the checker.
//!
//! The checker needs exactly three things from version control: the content
//! of a file at a historical reference, the list of tags, and tag creation.
//! [`GitCli`] provides them by invoking the `git` binary.

use crate::core::error::HubError;
use std::path::PathBuf;
use std::process::Command;
use tracing::debug;

pub trait VersionControl {
    /// Content of `path` at `reference`, or `None` when it cannot be read.
    fn show_file_at(&self, reference: &str, path: &str) -> Option<String>;

    /// Every tag name known to the repository.
    fn list_tags(&self) -> Result<Vec<String>, HubError>;

    /// Create a lightweight local tag at the current HEAD.
    fn create_tag(&self, name: &str) -> Result<(), HubError>;
}

/// `git` subprocess backend rooted at a working tree.
#[derive(Debug, Clone)]
pub struct GitCli {
    repo_root: PathBuf,
}

impl GitCli {
    pub fn new(repo_root: impl Into<PathBuf>) -> Self {
        Self {
            repo_root: repo_root.into(),
        }
    }

    fn run_git(&self, args: &[&str]) -> Result<String, HubError> {
        debug!(args = ?args, "running git");
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo_root)
            .output()
            .map_err(HubError::IoError)?;

        if !output.status.success() {
            return Err(HubError::GitError {
                command: args.join(" "),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

impl VersionControl for GitCli {
    fn show_file_at(&self, reference: &str, path: &str) -> Option<String> {
        match self.run_git(&["show", &format!("{}:{}", reference, path)]) {
            Ok(content) => Some(content),
            Err(e) => {
                debug!(reference, path, error = %e, "no committed copy");
                None
            }
        }
    }

    fn list_tags(&self) -> Result<Vec<String>, HubError> {
        let out = self.run_git(&["tag"])?;
        Ok(out
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn create_tag(&self, name: &str) -> Result<(), HubError> {
        self.run_git(&["tag", name]).map(|_| ())
    }
}

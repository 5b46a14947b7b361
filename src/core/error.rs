use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HubError {
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
    #[error("Config error in {path}: {message}")]
    ConfigError { path: String, message: String },
    #[error("Path error: {0}")]
    PathError(String),
    #[error("git {command} failed: {stderr}")]
    GitError { command: String, stderr: String },
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("{0} plugin check(s) failed")]
    ValidationFailed(usize),
}

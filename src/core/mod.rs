//! Core modules for hubcheck.
//!
//! Everything the check run needs lives here: resolving the change set,
//! reading and validating plugin metadata, git access and release tagging.

pub mod changeset;
pub mod check;
pub mod config;
pub mod error;
pub mod history;
pub mod metadata;
pub mod tagger;
pub mod vcs;

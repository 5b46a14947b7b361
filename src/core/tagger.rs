//! Release tagging for plugin versions.

use crate::core::error::HubError;
use crate::core::vcs::VersionControl;
use tracing::{debug, info};

/// Tag name recorded for a plugin release: `<plugin>|v<version>`.
pub fn tag_name(plugin: &str, version: &str) -> String {
    format!("{}|v{}", plugin, version)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagOutcome {
    Created(String),
    AlreadyExists(String),
    /// Dry run: the tag is absent and would have been created.
    Pending(String),
}

/// Ensure the release tag for `plugin` at `version` exists.
///
/// The full tag list is read before every attempt, so repeated calls with the
/// same arguments create the tag once and then report it as existing.
pub fn ensure_tag(
    vcs: &dyn VersionControl,
    plugin: &str,
    version: &str,
    dry_run: bool,
) -> Result<TagOutcome, HubError> {
    let tag = tag_name(plugin, version);
    let existing = vcs.list_tags()?;

    if existing.iter().any(|t| t == &tag) {
        debug!(plugin, tag = %tag, "tag already present");
        return Ok(TagOutcome::AlreadyExists(tag));
    }

    if dry_run {
        return Ok(TagOutcome::Pending(tag));
    }

    vcs.create_tag(&tag)?;
    info!(plugin, tag = %tag, "created release tag");
    Ok(TagOutcome::Created(tag))
}

//! Lookup of the version a plugin had at a committed reference.
//!
//! Informational only: the check run does not consult it when deciding
//! whether to tag.

use crate::core::metadata;
use crate::core::vcs::VersionControl;
use tracing::debug;

/// Version declared in the committed `metadata_file` of `plugin` at
/// `reference`. Any failure (no such commit, file absent, unparseable
/// document) reads as "no prior version".
pub fn previous_version(
    vcs: &dyn VersionControl,
    reference: &str,
    plugins_root: &str,
    plugin: &str,
    metadata_file: &str,
) -> Option<String> {
    let path = format!("{}/{}/{}", plugins_root, plugin, metadata_file);
    let content = vcs.show_file_at(reference, &path)?;
    match metadata::parse_metadata(&content).and_then(|doc| doc.version()) {
        Ok(version) => version,
        Err(e) => {
            debug!(plugin, reference, error = %e, "committed metadata unreadable");
            None
        }
    }
}

//! Resolution of changed file paths to the plugins they touch.

use std::collections::BTreeSet;

/// Separator used in repository-relative paths reported by CI.
const PATH_SEPARATOR: char = '/';

fn root_segments(root: &str) -> Vec<&str> {
    root.split(PATH_SEPARATOR)
        .filter(|s| !s.is_empty() && *s != ".")
        .collect()
}

/// `plugins_root` as it appears at the start of repository-relative paths:
/// no `./` prefix, no trailing or doubled separators.
pub fn normalize_root(plugins_root: &str) -> String {
    root_segments(plugins_root).join("/")
}

/// Plugin names touched by the current change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    plugins: BTreeSet<String>,
}

impl ChangeSet {
    /// Build the change set from repository-relative paths.
    ///
    /// A path contributes the segment right after `plugins_root`, which may
    /// span several segments (`registry/plugins`) and may carry a leading
    /// `./`. Shorter paths and paths elsewhere in the tree are ignored.
    pub fn from_paths<I, S>(paths: I, plugins_root: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let root = root_segments(plugins_root);
        let mut plugins = BTreeSet::new();
        for path in paths {
            let parts: Vec<&str> = path.as_ref().split(PATH_SEPARATOR).collect();
            if parts.len() > root.len() && parts[..root.len()] == root[..] {
                plugins.insert(parts[root.len()].to_string());
            }
        }
        Self { plugins }
    }

    /// Build the change set from a whitespace-separated list, as exported in
    /// the `CHANGED_FILES` environment value. `None` yields an empty set.
    pub fn from_env_value(value: Option<&str>, plugins_root: &str) -> Self {
        match value {
            Some(raw) => Self::from_paths(raw.split_whitespace(), plugins_root),
            None => Self::default(),
        }
    }

    pub fn contains(&self, plugin: &str) -> bool {
        self.plugins.contains(plugin)
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Plugin names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.plugins.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_second_segment_under_plugins_root() {
        let set = ChangeSet::from_paths(
            ["plugins/foo/metadata.yaml", "plugins/bar/a.txt", "other/foo/x"],
            "plugins",
        );
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["bar", "foo"]);
    }

    #[test]
    fn ignores_single_segment_paths() {
        let set = ChangeSet::from_paths(["plugins", "README.md"], "plugins");
        assert!(set.is_empty());
    }

    #[test]
    fn deduplicates_repeated_plugins() {
        let set = ChangeSet::from_paths(
            ["plugins/foo/a.go", "plugins/foo/b.go", "plugins/foo/metadata.yaml"],
            "plugins",
        );
        assert_eq!(set.len(), 1);
        assert!(set.contains("foo"));
    }

    #[test]
    fn unset_env_value_is_empty() {
        assert!(ChangeSet::from_env_value(None, "plugins").is_empty());
    }

    #[test]
    fn env_value_splits_on_any_whitespace() {
        let set = ChangeSet::from_env_value(
            Some("plugins/a/metadata.yaml\n plugins/b/x.go\tdocs/readme.md"),
            "plugins",
        );
        assert!(set.contains("a"));
        assert!(set.contains("b"));
        assert!(!set.contains("readme.md"));
    }

    #[test]
    fn dot_prefixed_root_matches_plain_paths() {
        let set = ChangeSet::from_paths(["plugins/alpha/metadata.yaml"], "./plugins/");
        assert!(set.contains("alpha"));
    }

    #[test]
    fn nested_root_uses_segment_after_root() {
        let set = ChangeSet::from_paths(
            [
                "registry/plugins/alpha/metadata.yaml",
                "registry/plugins",
                "registry/alpha/x",
                "plugins/beta/y",
            ],
            "registry/plugins",
        );
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["alpha"]);
    }

    #[test]
    fn normalize_root_strips_dots_and_slashes() {
        assert_eq!(normalize_root("./plugins/"), "plugins");
        assert_eq!(normalize_root("registry//plugins"), "registry/plugins");
        assert_eq!(normalize_root("./"), "");
    }

    #[test]
    fn root_name_is_matched_exactly() {
        let set = ChangeSet::from_paths(["plugins-old/foo/x", "./plugins/bar/y"], "plugins");
        assert!(set.is_empty());
    }
}

//! Plugin metadata loading and validation.
//!
//! Each plugin directory carries one `metadata.yaml`. Only two keys matter
//! here: `name`, which is always required, and `version`, which is required
//! for plugins that already exist in the registry and is ignored for plugins
//! introduced by the current change (they are not tagged until a later
//! release bumps them).

use serde_yml::Value;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_METADATA_FILE: &str = "metadata.yaml";

/// A parsed metadata document. Fields are read one at a time so that a
/// field the caller does not need is never type-checked.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataDoc {
    doc: Value,
}

impl MetadataDoc {
    pub fn name(&self) -> Result<Option<String>, ParseError> {
        field_text(&self.doc, "name")
    }

    pub fn version(&self) -> Result<Option<String>, ParseError> {
        field_text(&self.doc, "version")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
    MissingMetadata,
    Unparseable(String),
    EmptyName,
    EmptyVersion,
    NotScalar(&'static str),
}

/// A single validation problem for one plugin directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginIssue {
    pub plugin_dir: PathBuf,
    pub metadata_file: String,
    pub kind: IssueKind,
}

impl fmt::Display for PluginIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dir = self.plugin_dir.display();
        match &self.kind {
            IssueKind::MissingMetadata => {
                write!(f, "error: plugin {} is missing {}", dir, self.metadata_file)
            }
            IssueKind::Unparseable(reason) => write!(
                f,
                "error: plugin {} {} could not be parsed: {}",
                dir, self.metadata_file, reason
            ),
            IssueKind::EmptyName => write!(f, "error: plugin {} name must not be empty", dir),
            IssueKind::EmptyVersion => {
                write!(f, "error: plugin {} version must not be empty", dir)
            }
            IssueKind::NotScalar(field) => write!(
                f,
                "error: plugin {} field '{}' must be a scalar value",
                dir, field
            ),
        }
    }
}

/// Outcome of checking one plugin directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataCheck {
    pub issues: Vec<PluginIssue>,
    /// Declared version, returned only for pre-existing plugins.
    pub version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    Yaml(String),
    NotAMapping,
    NotScalar(&'static str),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Yaml(msg) => write!(f, "{}", msg),
            ParseError::NotAMapping => write!(f, "top level is not a mapping"),
            ParseError::NotScalar(field) => write!(f, "field '{}' is not a scalar", field),
        }
    }
}

/// Parse a metadata document. The top level must be a mapping.
pub fn parse_metadata(content: &str) -> Result<MetadataDoc, ParseError> {
    let doc: Value = serde_yml::from_str(content).map_err(|e| ParseError::Yaml(e.to_string()))?;
    if !matches!(doc, Value::Mapping(_)) {
        return Err(ParseError::NotAMapping);
    }
    Ok(MetadataDoc { doc })
}

/// Text of a scalar field, rendered the way YAML-loaded values print
/// (`2`, `1.1`, `True`). Values YAML treats as falsy (null, `false`, `0`,
/// empty strings and empty collections) read as absent.
fn field_text(doc: &Value, field: &'static str) -> Result<Option<String>, ParseError> {
    let Some(value) = doc.get(field) else {
        return Ok(None);
    };
    match value {
        Value::Null => Ok(None),
        Value::Bool(b) => Ok(b.then(|| "True".to_string())),
        Value::Number(n) => {
            let text = if let Some(i) = n.as_i64() {
                (i != 0).then(|| i.to_string())
            } else if let Some(u) = n.as_u64() {
                (u != 0).then(|| u.to_string())
            } else {
                // Debug keeps the fractional part, so `1.0` stays `1.0`.
                n.as_f64().filter(|f| *f != 0.0).map(|f| format!("{:?}", f))
            };
            Ok(text)
        }
        Value::String(s) => Ok((!s.is_empty()).then(|| s.clone())),
        Value::Sequence(seq) if seq.is_empty() => Ok(None),
        Value::Mapping(map) if map.is_empty() => Ok(None),
        _ => Err(ParseError::NotScalar(field)),
    }
}

/// Validate the metadata document in `plugin_dir`.
///
/// `is_new_plugin` is true when the plugin is part of the current change set.
/// Pre-existing plugins must declare a version; for new plugins the version is
/// neither read nor returned.
pub fn check_plugin(plugin_dir: &Path, metadata_file: &str, is_new_plugin: bool) -> MetadataCheck {
    let issue = |kind| PluginIssue {
        plugin_dir: plugin_dir.to_path_buf(),
        metadata_file: metadata_file.to_string(),
        kind,
    };

    let path = plugin_dir.join(metadata_file);
    if !path.is_file() {
        return MetadataCheck {
            issues: vec![issue(IssueKind::MissingMetadata)],
            version: None,
        };
    }

    let doc = match fs::read_to_string(&path) {
        Ok(content) => parse_metadata(&content),
        Err(e) => Err(ParseError::Yaml(e.to_string())),
    };
    let doc = match doc {
        Ok(d) => d,
        Err(e) => {
            return MetadataCheck {
                issues: vec![issue(IssueKind::Unparseable(e.to_string()))],
                version: None,
            };
        }
    };

    let mut issues = Vec::new();
    match doc.name() {
        Ok(Some(_)) => {}
        Ok(None) => issues.push(issue(IssueKind::EmptyName)),
        Err(_) => issues.push(issue(IssueKind::NotScalar("name"))),
    }

    let mut version = None;
    if !is_new_plugin {
        match doc.version() {
            Ok(Some(v)) => version = Some(v),
            Ok(None) => issues.push(issue(IssueKind::EmptyVersion)),
            Err(_) => issues.push(issue(IssueKind::NotScalar("version"))),
        }
    }

    MetadataCheck { issues, version }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn plugin_with(content: Option<&str>) -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        if let Some(body) = content {
            fs::write(dir.path().join(DEFAULT_METADATA_FILE), body).unwrap();
        }
        dir
    }

    #[test]
    fn missing_file_yields_single_issue_for_either_flag() {
        let dir = plugin_with(None);
        for is_new in [true, false] {
            let check = check_plugin(dir.path(), DEFAULT_METADATA_FILE, is_new);
            assert_eq!(check.issues.len(), 1);
            assert_eq!(check.issues[0].kind, IssueKind::MissingMetadata);
            assert!(check.issues[0].to_string().contains(&dir.path().display().to_string()));
            assert_eq!(check.version, None);
        }
    }

    #[test]
    fn empty_name_is_reported_for_new_and_existing() {
        let dir = plugin_with(Some("name: ''\nversion: '1.0.0'\n"));
        for is_new in [true, false] {
            let check = check_plugin(dir.path(), DEFAULT_METADATA_FILE, is_new);
            assert!(check.issues.iter().any(|i| i.kind == IssueKind::EmptyName));
        }
    }

    #[test]
    fn existing_plugin_requires_version() {
        let dir = plugin_with(Some("name: Gamma\n"));
        let check = check_plugin(dir.path(), DEFAULT_METADATA_FILE, false);
        assert_eq!(check.issues.len(), 1);
        assert_eq!(check.issues[0].kind, IssueKind::EmptyVersion);
        assert_eq!(check.version, None);
    }

    #[test]
    fn new_plugin_version_is_optional_and_not_returned() {
        let dir = plugin_with(Some("name: Alpha\nversion: 3\n"));
        let check = check_plugin(dir.path(), DEFAULT_METADATA_FILE, true);
        assert!(check.issues.is_empty());
        assert_eq!(check.version, None);
    }

    #[test]
    fn existing_plugin_returns_version_text() {
        let dir = plugin_with(Some("name: Beta\nversion: 2\n"));
        let check = check_plugin(dir.path(), DEFAULT_METADATA_FILE, false);
        assert!(check.issues.is_empty());
        assert_eq!(check.version.as_deref(), Some("2"));
    }

    #[test]
    fn malformed_yaml_is_a_plugin_issue() {
        let dir = plugin_with(Some("name: [unterminated\n"));
        let check = check_plugin(dir.path(), DEFAULT_METADATA_FILE, false);
        assert_eq!(check.issues.len(), 1);
        assert!(matches!(check.issues[0].kind, IssueKind::Unparseable(_)));
    }

    #[test]
    fn empty_document_is_unparseable() {
        assert!(parse_metadata("").is_err());
        assert_eq!(parse_metadata("- a\n- b\n"), Err(ParseError::NotAMapping));
    }

    #[test]
    fn scalar_rendering() {
        let m = parse_metadata("name: true\nversion: 1.10\n").unwrap();
        assert_eq!(m.name().unwrap().as_deref(), Some("True"));
        assert_eq!(m.version().unwrap().as_deref(), Some("1.1"));

        let m = parse_metadata("name: x\nversion: 0\n").unwrap();
        assert_eq!(m.version().unwrap(), None);

        let m = parse_metadata("name: x\nversion: \"1.2.3\"\n").unwrap();
        assert_eq!(m.version().unwrap().as_deref(), Some("1.2.3"));

        let m = parse_metadata("name: x\nversion: ~\n").unwrap();
        assert_eq!(m.version().unwrap(), None);
    }

    #[test]
    fn collection_field_is_rejected_on_read() {
        let m = parse_metadata("name: [a, b]\nversion: []\n").unwrap();
        assert_eq!(m.name(), Err(ParseError::NotScalar("name")));
        assert_eq!(m.version().unwrap(), None);
    }

    #[test]
    fn new_plugin_ignores_collection_version() {
        let dir = plugin_with(Some("name: Alpha\nversion: [1, 2]\n"));
        let check = check_plugin(dir.path(), DEFAULT_METADATA_FILE, true);
        assert!(check.issues.is_empty());
        assert_eq!(check.version, None);

        let check = check_plugin(dir.path(), DEFAULT_METADATA_FILE, false);
        assert_eq!(check.issues.len(), 1);
        assert_eq!(check.issues[0].kind, IssueKind::NotScalar("version"));
    }

    #[test]
    fn collection_name_still_returns_version() {
        let dir = plugin_with(Some("name: [Beta]\nversion: 2\n"));
        let check = check_plugin(dir.path(), DEFAULT_METADATA_FILE, false);
        assert_eq!(check.issues.len(), 1);
        assert_eq!(check.issues[0].kind, IssueKind::NotScalar("name"));
        assert_eq!(check.version.as_deref(), Some("2"));
    }

    #[test]
    fn boolean_version_renders_capitalized() {
        let dir = plugin_with(Some("name: x\nversion: true\n"));
        let check = check_plugin(dir.path(), DEFAULT_METADATA_FILE, false);
        assert!(check.issues.is_empty());
        assert_eq!(check.version.as_deref(), Some("True"));
    }
}

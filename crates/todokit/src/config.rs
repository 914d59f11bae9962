//! Config file loading and tree access
//!
//! Configs are JSON or YAML files holding a mapping of names to entries.
//! Both formats are read into the same [`Tree`] so the rest of the crate
//! never cares which one was on disk. Mapping order is preserved, which
//! makes "all entries" selections run in file order.

use crate::error::{Error, Result};
use serde_json::{Map, Value};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A parsed config document.
pub type Tree = Value;

/// Supported config formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.json`
    Json,
    /// `.yaml` or `.yml`
    Yaml,
}

impl ConfigFormat {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    /// Parse a document in this format.
    pub fn parse(self, content: &str) -> std::result::Result<Tree, String> {
        match self {
            Self::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            Self::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        }
    }
}

/// Loads config trees by path
///
/// Implement this trait to serve configs from somewhere other than disk.
pub trait ConfigSource {
    /// Load and parse the document at `path`
    fn load(&self, path: &Path) -> Result<Tree>;
}

/// Reads configs from the filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSource;

impl ConfigSource for FileSource {
    fn load(&self, path: &Path) -> Result<Tree> {
        let format = ConfigFormat::from_path(path).ok_or_else(|| Error::UnsupportedConfigFormat {
            path: path.to_path_buf(),
        })?;

        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                Error::ConfigNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                Error::io(path, e)
            }
        })?;

        log::debug!("Loaded {} ({:?})", path.display(), format);

        format.parse(&content).map_err(|message| Error::ConfigParse {
            path: path.to_path_buf(),
            message,
        })
    }
}

/// Expand a leading `~` in a path taken from configuration.
pub fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}

/// Human name of a tree value's type, for error messages.
pub fn type_name(value: &Tree) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}

fn root_mapping<'a>(tree: &'a Tree, kind: &'static str) -> Result<&'a Map<String, Value>> {
    tree.as_object()
        .ok_or_else(|| Error::invalid("<root>", type_name(tree), &format!("{kind} file")))
}

/// Select one entry from a top-level mapping.
///
/// With a name, that entry is returned. Without one, the mapping must
/// hold exactly one entry.
pub fn select<'a>(
    tree: &'a Tree,
    name: Option<&str>,
    kind: &'static str,
) -> Result<(&'a str, &'a Tree)> {
    let map = root_mapping(tree, kind)?;
    match name {
        Some(name) => map
            .iter()
            .find(|(k, _)| k.as_str() == name)
            .map(|(k, v)| (k.as_str(), v))
            .ok_or_else(|| Error::NameNotFound {
                kind,
                name: name.to_string(),
            }),
        None => {
            let mut entries = map.iter();
            match (entries.next(), entries.next()) {
                (Some((k, v)), None) => Ok((k.as_str(), v)),
                _ => Err(Error::AmbiguousSelection {
                    kind,
                    count: map.len(),
                }),
            }
        }
    }
}

/// Select several entries, in the order given; no names selects every
/// entry in file order.
pub fn select_many<'a>(
    tree: &'a Tree,
    names: &[String],
    kind: &'static str,
) -> Result<Vec<(&'a str, &'a Tree)>> {
    let map = root_mapping(tree, kind)?;
    if names.is_empty() {
        return Ok(map.iter().map(|(k, v)| (k.as_str(), v)).collect());
    }
    names
        .iter()
        .map(|name| select(tree, Some(name), kind))
        .collect()
}

/// Typed access to the keys of one mapping, with errors naming `context`.
///
/// A key holding `null` counts as absent.
#[derive(Debug, Clone)]
pub struct Fields<'a> {
    map: &'a Map<String, Value>,
    context: String,
}

impl<'a> Fields<'a> {
    /// View `value` as a mapping.
    pub fn of(value: &'a Tree, context: impl Into<String>) -> Result<Self> {
        let context = context.into();
        match value.as_object() {
            Some(map) => Ok(Self { map, context }),
            None => Err(Error::invalid("<entry>", type_name(value), &context)),
        }
    }

    /// Where these fields live, for error messages.
    pub fn context(&self) -> &str {
        &self.context
    }

    /// Raw value of a key.
    pub fn get(&self, key: &str) -> Option<&'a Tree> {
        self.map.get(key).filter(|v| !v.is_null())
    }

    /// Raw value of a required key.
    pub fn require(&self, key: &str) -> Result<&'a Tree> {
        self.get(key)
            .ok_or_else(|| Error::missing(key, &self.context))
    }

    /// Required string.
    pub fn str(&self, key: &str) -> Result<&'a str> {
        let value = self.require(key)?;
        value
            .as_str()
            .ok_or_else(|| Error::invalid(key, type_name(value), &self.context))
    }

    /// Optional string.
    pub fn opt_str(&self, key: &str) -> Result<Option<&'a str>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(Error::invalid(key, type_name(other), &self.context)),
        }
    }

    /// Optional boolean.
    pub fn opt_bool(&self, key: &str) -> Result<Option<bool>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(Error::invalid(key, type_name(other), &self.context)),
        }
    }

    /// Optional list of strings; absent means empty.
    pub fn str_list(&self, key: &str) -> Result<Vec<String>> {
        match self.get(key) {
            None => Ok(Vec::new()),
            Some(value) => string_list(value, key, &self.context),
        }
    }

    /// Required nested mapping.
    pub fn nested(&self, key: &str) -> Result<Fields<'a>> {
        let value = self.require(key)?;
        let context = format!("`{key}` of {}", self.context);
        match value.as_object() {
            Some(map) => Ok(Fields { map, context }),
            None => Err(Error::invalid(key, type_name(value), &self.context)),
        }
    }
}

/// Read a list of strings.
pub fn string_list(value: &Tree, field: &str, context: &str) -> Result<Vec<String>> {
    let items = value
        .as_array()
        .ok_or_else(|| Error::invalid(field, type_name(value), context))?;
    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| Error::invalid(field, format!("list containing {}", type_name(item)), context))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_load_json_and_yaml_agree() {
        let tmp = TempDir::new().unwrap();
        let json_path = tmp.path().join("pms.json");
        let yaml_path = tmp.path().join("pms.yml");
        fs::write(&json_path, r#"{"apt": {"install": "apt-get install -y", "sudo": true}}"#).unwrap();
        fs::write(&yaml_path, "apt:\n  install: apt-get install -y\n  sudo: true\n").unwrap();

        let from_json = FileSource.load(&json_path).unwrap();
        let from_yaml = FileSource.load(&yaml_path).unwrap();
        assert_eq!(from_json, from_yaml);
    }

    #[test]
    fn test_load_not_found() {
        let tmp = TempDir::new().unwrap();
        let result = FileSource.load(&tmp.path().join("missing.yaml"));
        assert!(matches!(result, Err(Error::ConfigNotFound { .. })));
    }

    #[test]
    fn test_load_unsupported_format() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "a = 1").unwrap();
        assert!(matches!(
            FileSource.load(&path),
            Err(Error::UnsupportedConfigFormat { .. })
        ));
    }

    #[test]
    fn test_load_parse_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        let err = FileSource.load(&path).unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }));
        assert!(err.is_config_error());
    }

    #[test]
    fn test_yaml_preserves_order() {
        let tree = ConfigFormat::Yaml.parse("zeta: 1\nalpha: 2\nmid: 3\n").unwrap();
        let names: Vec<_> = select_many(&tree, &[], "todo list")
            .unwrap()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_select_single_implicit() {
        let tree = json!({"only": [1]});
        let (name, entry) = select(&tree, None, "todo list").unwrap();
        assert_eq!(name, "only");
        assert_eq!(entry, &json!([1]));
    }

    #[test]
    fn test_select_ambiguous() {
        let tree = json!({"a": [], "b": []});
        assert!(matches!(
            select(&tree, None, "todo list"),
            Err(Error::AmbiguousSelection { count: 2, .. })
        ));
        let empty = json!({});
        assert!(matches!(
            select(&empty, None, "todo list"),
            Err(Error::AmbiguousSelection { count: 0, .. })
        ));
    }

    #[test]
    fn test_select_missing_name() {
        let tree = json!({"a": []});
        let err = select(&tree, Some("b"), "collection").unwrap_err();
        assert_eq!(err.to_string(), "collection `b` not found");
    }

    #[test]
    fn test_select_many_keeps_requested_order() {
        let tree = json!({"a": 1, "b": 2, "c": 3});
        let names = vec!["c".to_string(), "a".to_string()];
        let picked: Vec<_> = select_many(&tree, &names, "package manager")
            .unwrap()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(picked, vec!["c", "a"]);
    }

    #[test]
    fn test_select_rejects_non_mapping_root() {
        let tree = json!(["a", "b"]);
        assert!(matches!(
            select(&tree, None, "todo list"),
            Err(Error::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_fields_accessors() {
        let tree = json!({
            "url": "https://example.com/x.git",
            "sudo": true,
            "path": null,
            "names": ["a", "b"],
            "command": {"action": "clone"}
        });
        let fields = Fields::of(&tree, "step 1").unwrap();

        assert_eq!(fields.str("url").unwrap(), "https://example.com/x.git");
        assert_eq!(fields.opt_bool("sudo").unwrap(), Some(true));
        assert_eq!(fields.opt_str("path").unwrap(), None);
        assert_eq!(fields.str_list("names").unwrap(), vec!["a", "b"]);
        assert!(fields.str_list("absent").unwrap().is_empty());
        assert_eq!(fields.nested("command").unwrap().str("action").unwrap(), "clone");

        assert!(matches!(fields.str("path"), Err(Error::MissingField { .. })));
        assert!(matches!(fields.str("sudo"), Err(Error::InvalidValue { .. })));
        assert!(matches!(fields.opt_bool("url"), Err(Error::InvalidValue { .. })));
    }

    #[test]
    fn test_expand_path_tilde() {
        let expanded = expand_path("~/src");
        assert!(!expanded.starts_with("~"));
        assert_eq!(expand_path("/opt/tool"), PathBuf::from("/opt/tool"));
    }
}

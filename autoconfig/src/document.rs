//! Parsed settings document and case-insensitive section lookup

use crate::error::LoadError;
use serde_json::{Map, Value};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const INLINE_ORIGIN: &str = "<inline>";

/// Separator for addressing nested sections in a single key, e.g. `Logging:LogLevel`.
pub const KEY_DELIMITER: char = ':';

/// A parsed JSON settings document.
///
/// The root must be an object; its top-level keys are section names.
#[derive(Debug, Clone)]
pub struct SettingsDocument {
    root: Value,
    origin: String,
}

impl SettingsDocument {
    /// Read and parse a document from disk.
    ///
    /// # Errors
    ///
    /// - [`LoadError::DocumentNotFound`] if the file does not exist
    /// - [`LoadError::DocumentRead`] for any other I/O failure
    /// - [`LoadError::MalformedDocument`] if the content is not a JSON object
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => LoadError::DocumentNotFound {
                path: path.to_path_buf(),
            },
            _ => LoadError::DocumentRead {
                path: path.to_path_buf(),
                source: e,
            },
        })?;
        let origin = path.display().to_string();
        let root: Value =
            serde_json::from_str(&content).map_err(|e| LoadError::malformed(origin.as_str(), e))?;
        Self::with_origin(root, origin)
    }

    /// Wrap an already parsed JSON value.
    pub fn from_value(root: Value) -> Result<Self, LoadError> {
        Self::with_origin(root, INLINE_ORIGIN.to_string())
    }

    fn with_origin(root: Value, origin: String) -> Result<Self, LoadError> {
        if !root.is_object() {
            return Err(LoadError::malformed(
                origin,
                "the document root must be a JSON object",
            ));
        }
        Ok(Self { root, origin })
    }

    /// Where the document came from: its path, or `<inline>`.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Look up a section by key.
    ///
    /// Each `:`-separated name matches like a field name (see
    /// [`field_names_match`]), preferring a key that differs only in case.
    /// The returned section may not exist; binding it yields defaults.
    pub fn section(&self, key: &str) -> Section<'_> {
        let mut value = Some(&self.root);
        for name in key.split(KEY_DELIMITER) {
            value = value
                .and_then(Value::as_object)
                .and_then(|map| {
                    find_entry(map, name, str::eq_ignore_ascii_case)
                        .or_else(|| find_entry(map, name, field_names_match))
                });
        }
        Section {
            path: key.to_string(),
            value: value.filter(|v| !v.is_null()),
        }
    }
}

impl FromStr for SettingsDocument {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let root: Value = serde_json::from_str(s).map_err(|e| LoadError::malformed(INLINE_ORIGIN, e))?;
        Self::from_value(root)
    }
}

/// A named subtree of a [`SettingsDocument`].
#[derive(Debug, Clone)]
pub struct Section<'a> {
    path: String,
    value: Option<&'a Value>,
}

impl<'a> Section<'a> {
    /// A section that is absent from the document.
    pub fn missing(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            value: None,
        }
    }

    /// Full key path of this section.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether the document contains this section.
    pub fn exists(&self) -> bool {
        self.value.is_some()
    }

    /// Whether the section exists but holds a scalar or array instead of entries.
    pub fn is_scalar(&self) -> bool {
        self.value.is_some_and(|v| !v.is_object())
    }

    /// Raw entry for a field, matched by [`field_names_match`]. `null` counts as absent.
    pub fn get(&self, field: &str) -> Option<&'a Value> {
        let map = self.value?.as_object()?;
        map.get(field)
            .or_else(|| find_entry(map, field, field_names_match))
            .filter(|v| !v.is_null())
    }

    /// Child section for a nested field.
    pub fn child(&self, field: &str) -> Section<'a> {
        Section {
            path: format!("{}{}{}", self.path, KEY_DELIMITER, field),
            value: self.get(field),
        }
    }
}

fn find_entry<'a>(
    map: &'a Map<String, Value>,
    name: &str,
    matches: impl Fn(&str, &str) -> bool,
) -> Option<&'a Value> {
    map.iter()
        .find(|(key, _)| matches(key.as_str(), name))
        .map(|(_, value)| value)
}

/// Compare a document key with a field name.
///
/// ASCII case is ignored, as are `_` and `-`, so `max_connections`,
/// `MaxConnections` and `max-connections` all match.
pub fn field_names_match(key: &str, field: &str) -> bool {
    fn folded(s: &str) -> impl Iterator<Item = char> + '_ {
        s.chars()
            .filter(|c| *c != '_' && *c != '-')
            .map(|c| c.to_ascii_lowercase())
    }
    folded(key).eq(folded(field))
}

/// Resolve a document path against an optional base directory.
pub(crate) fn resolve_path(base: Option<&Path>, path: &Path) -> PathBuf {
    match base {
        Some(base) if path.is_relative() => base.join(path),
        _ => path.to_path_buf(),
    }
}

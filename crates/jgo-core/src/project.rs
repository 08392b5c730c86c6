//! The declarative project file (spec §6.2) and its editable sibling.
//!
//! [`ProjectFile`] is the typed, read-only view used by the resolver and
//! orchestrator. [`ProjectFileDocument`] wraps `toml_edit` for read-modify-
//! write operations (e.g. `jgo add`-style mutation) that must preserve
//! unrelated keys and comments — a plain serde round-trip through `toml`
//! would not.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use jgo_util::errors::JgoError;

/// The parsed representation of a project file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectFile {
    #[serde(default)]
    pub environment: EnvironmentSection,

    #[serde(default)]
    pub dependencies: DependenciesSection,

    #[serde(default)]
    pub java: JavaSection,

    #[serde(default)]
    pub entrypoints: BTreeMap<String, String>,

    #[serde(default)]
    pub settings: SettingsSection,

    #[serde(default)]
    pub repositories: BTreeMap<String, String>,

    #[serde(default)]
    pub shortcuts: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnvironmentSection {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DependenciesSection {
    #[serde(default)]
    pub coordinates: Vec<String>,
    #[serde(default)]
    pub exclusions: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JavaSection {
    #[serde(default)]
    pub gc: Option<String>,
    #[serde(default)]
    pub min_heap: Option<String>,
    #[serde(default)]
    pub max_heap: Option<String>,
    /// Raw `[java.properties]` table, possibly nested. Flatten with
    /// [`JavaSection::flattened_properties`] to get dotted `-D` keys.
    #[serde(default)]
    pub properties: toml::Table,
}

impl JavaSection {
    /// Flatten nested `[java.properties.*]` tables into dotted keys, e.g.
    /// `[java.properties.log4j] level = "info"` becomes `log4j.level`.
    pub fn flattened_properties(&self) -> BTreeMap<String, String> {
        let mut out = BTreeMap::new();
        flatten_table(&self.properties, "", &mut out);
        out
    }
}

fn flatten_table(table: &toml::Table, prefix: &str, out: &mut BTreeMap<String, String>) {
    for (key, value) in table {
        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            toml::Value::Table(nested) => flatten_table(nested, &full_key, out),
            toml::Value::String(s) => {
                out.insert(full_key, s.clone());
            }
            other => {
                out.insert(full_key, other.to_string());
            }
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsSection {
    #[serde(default, rename = "cache_dir")]
    pub cache_dir: Option<String>,
    #[serde(default, rename = "repo_cache")]
    pub repo_cache: Option<String>,
    /// Link strategy: `hard`, `soft`, `copy`, or `auto`.
    #[serde(default)]
    pub links: Option<String>,
}

impl ProjectFile {
    /// Load and parse a project file from the given path.
    pub fn from_path(path: &Path) -> Result<Self, JgoError> {
        let content = std::fs::read_to_string(path).map_err(|e| JgoError::ParseError {
            message: format!("failed to read {}: {e}", path.display()),
        })?;
        Self::parse_toml(&content)
    }

    /// Parse a project file from a string.
    pub fn parse_toml(content: &str) -> Result<Self, JgoError> {
        toml::from_str(content).map_err(|e| JgoError::ParseError {
            message: format!("failed to parse project file: {e}"),
        })
    }

    pub fn to_string_pretty(&self) -> Result<String, JgoError> {
        toml::to_string_pretty(self).map_err(|e| JgoError::Generic {
            message: format!("failed to serialize project file: {e}"),
        })
    }

    /// Resolve the entry point for `name`, following the `default` alias.
    pub fn entrypoint(&self, name: &str) -> Option<&str> {
        self.entrypoints.get(name).map(String::as_str)
    }

    /// Expand a coordinate/shortcut string: if it names a `[shortcuts]`
    /// entry, substitute the shortcut's endpoint string; otherwise return
    /// it unchanged (it is already a coordinate/endpoint string).
    pub fn expand_shortcut<'a>(&'a self, name_or_coord: &'a str) -> &'a str {
        self.shortcuts
            .get(name_or_coord)
            .map(String::as_str)
            .unwrap_or(name_or_coord)
    }
}

/// Read-modify-write wrapper over the project file preserving formatting
/// and comments for keys the caller does not touch.
pub struct ProjectFileDocument {
    doc: toml_edit::DocumentMut,
}

impl ProjectFileDocument {
    pub fn load(path: &Path) -> Result<Self, JgoError> {
        let content = std::fs::read_to_string(path).map_err(|e| JgoError::ParseError {
            message: format!("failed to read {}: {e}", path.display()),
        })?;
        let doc = content.parse::<toml_edit::DocumentMut>().map_err(|e| JgoError::ParseError {
            message: format!("failed to parse project file: {e}"),
        })?;
        Ok(Self { doc })
    }

    pub fn save(&self, path: &Path) -> Result<(), JgoError> {
        jgo_util::fs::write_atomic(path, self.doc.to_string().as_bytes())
    }

    /// Add or replace a coordinate under `[dependencies] coordinates = [...]`.
    pub fn add_coordinate(&mut self, coordinate: &str) {
        let deps = self.doc["dependencies"].or_insert(toml_edit::table());
        let arr = deps["coordinates"].or_insert(toml_edit::array());
        if let Some(arr) = arr.as_array_mut() {
            let already_present = arr.iter().any(|v| v.as_str() == Some(coordinate));
            if !already_present {
                arr.push(coordinate);
            }
        }
    }

    /// Remove a coordinate from `[dependencies] coordinates`.
    pub fn remove_coordinate(&mut self, coordinate: &str) {
        if let Some(arr) = self.doc["dependencies"]["coordinates"].as_array_mut() {
            arr.retain(|v| v.as_str() != Some(coordinate));
        }
    }

    /// Set `[entrypoints] <name> = "<main_class>"`.
    pub fn set_entrypoint(&mut self, name: &str, main_class: &str) {
        let entrypoints = self.doc["entrypoints"].or_insert(toml_edit::table());
        entrypoints[name] = toml_edit::value(main_class);
    }

    pub fn as_str(&self) -> String {
        self.doc.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_project_file() {
        let toml = r#"
            [environment]
            name = "demo"

            [dependencies]
            coordinates = ["org.python:jython-standalone:2.7.4"]
            exclusions = ["commons-logging:commons-logging"]

            [entrypoints]
            default = "org.python.util.jython"
        "#;
        let pf = ProjectFile::parse_toml(toml).unwrap();
        assert_eq!(pf.environment.name.as_deref(), Some("demo"));
        assert_eq!(pf.dependencies.coordinates.len(), 1);
        assert_eq!(pf.entrypoint("default"), Some("org.python.util.jython"));
    }

    #[test]
    fn flattens_nested_java_properties() {
        let toml = r#"
            [java.properties]
            "file.encoding" = "UTF-8"

            [java.properties.log4j]
            level = "info"
        "#;
        let pf = ProjectFile::parse_toml(toml).unwrap();
        let flat = pf.java.flattened_properties();
        assert_eq!(flat.get("file.encoding").map(String::as_str), Some("UTF-8"));
        assert_eq!(flat.get("log4j.level").map(String::as_str), Some("info"));
    }

    #[test]
    fn shortcut_expansion_falls_back_to_input() {
        let toml = r#"
            [shortcuts]
            jython = "org.python:jython-standalone:2.7.4"
        "#;
        let pf = ProjectFile::parse_toml(toml).unwrap();
        assert_eq!(
            pf.expand_shortcut("jython"),
            "org.python:jython-standalone:2.7.4"
        );
        assert_eq!(pf.expand_shortcut("g:a:1.0"), "g:a:1.0");
    }

    #[test]
    fn document_add_coordinate_preserves_unrelated_keys() {
        let toml = "# a comment\n[environment]\nname = \"demo\"\n";
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("project.toml");
        std::fs::write(&path, toml).unwrap();

        let mut doc = ProjectFileDocument::load(&path).unwrap();
        doc.add_coordinate("g:a:1.0");
        let rendered = doc.as_str();
        assert!(rendered.contains("# a comment"));
        assert!(rendered.contains("name = \"demo\""));
        assert!(rendered.contains("g:a:1.0"));
    }
}

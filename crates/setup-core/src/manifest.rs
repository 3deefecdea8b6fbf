//! `package.json` script patching.

use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the manifest inside a project directory.
pub const MANIFEST_FILE: &str = "package.json";

/// What setting a script did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptChange {
    /// The script did not exist before.
    Added,
    /// An existing script with a different command was overwritten.
    Replaced { previous: String },
    /// The script already had this exact command.
    Unchanged,
}

/// Errors that can occur when patching a manifest.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{} is not a JSON object", .path.display())]
    NotAnObject { path: PathBuf },
    #[error("failed to serialize {}: {source}", .path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A parsed `package.json`.
///
/// Only the `scripts` object is touched; every other field is carried
/// through untouched, in its original order.
#[derive(Debug, Clone)]
pub struct PackageManifest {
    path: PathBuf,
    root: Map<String, Value>,
}

impl PackageManifest {
    /// Load a manifest from a file path.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let path = path.as_ref().to_path_buf();
        let contents = fs::read_to_string(&path).map_err(|source| ManifestError::Read {
            path: path.clone(),
            source,
        })?;
        Self::parse(path, &contents)
    }

    /// Parse manifest text that was read from `path`.
    pub fn parse(path: impl Into<PathBuf>, contents: &str) -> Result<Self, ManifestError> {
        let path = path.into();
        let value: Value = serde_json::from_str(contents).map_err(|source| ManifestError::Parse {
            path: path.clone(),
            source,
        })?;

        match value {
            Value::Object(root) => Ok(Self { path, root }),
            _ => Err(ManifestError::NotAnObject { path }),
        }
    }

    /// Get a script command by name.
    pub fn script(&self, name: &str) -> Option<&str> {
        self.root
            .get("scripts")
            .and_then(Value::as_object)
            .and_then(|scripts| scripts.get(name))
            .and_then(Value::as_str)
    }

    /// Set `scripts[name] = command`, creating `scripts` if it is missing
    /// or not an object.
    pub fn set_script(&mut self, name: &str, command: &str) -> ScriptChange {
        let value = Value::String(command.to_string());
        let previous = match self.root.get_mut("scripts") {
            Some(Value::Object(scripts)) => scripts.insert(name.to_string(), value),
            _ => {
                let mut scripts = Map::new();
                scripts.insert(name.to_string(), value);
                self.root.insert("scripts".to_string(), Value::Object(scripts));
                None
            }
        };

        match previous {
            None => ScriptChange::Added,
            Some(Value::String(prev)) if prev == command => ScriptChange::Unchanged,
            Some(Value::String(previous)) => ScriptChange::Replaced { previous },
            Some(other) => ScriptChange::Replaced {
                previous: other.to_string(),
            },
        }
    }

    /// Serialize with two-space indentation and a trailing newline.
    pub fn to_json_string(&self) -> Result<String, ManifestError> {
        let mut out = serde_json::to_string_pretty(&self.root).map_err(|source| {
            ManifestError::Serialize {
                path: self.path.clone(),
                source,
            }
        })?;
        out.push('\n');
        Ok(out)
    }

    /// Write the manifest back to the path it was loaded from.
    pub fn write(&self) -> Result<(), ManifestError> {
        let contents = self.to_json_string()?;
        fs::write(&self.path, contents).map_err(|source| ManifestError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

/// Set several scripts with a single read and write.
///
/// The file is left untouched when every entry was already up to date.
pub fn set_scripts(
    path: &Path,
    entries: &[(&str, &str)],
) -> Result<Vec<(String, ScriptChange)>, ManifestError> {
    let mut manifest = PackageManifest::from_path(path)?;

    let changes: Vec<(String, ScriptChange)> = entries
        .iter()
        .map(|(name, command)| (name.to_string(), manifest.set_script(name, command)))
        .collect();

    if changes.iter().any(|(_, c)| *c != ScriptChange::Unchanged) {
        manifest.write()?;
    }

    Ok(changes)
}

/// Set one script in the manifest at `path`.
pub fn set_script(path: &Path, name: &str, command: &str) -> Result<ScriptChange, ManifestError> {
    let mut changes = set_scripts(path, &[(name, command)])?;
    Ok(changes
        .pop()
        .map(|(_, change)| change)
        .unwrap_or(ScriptChange::Unchanged))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn manifest(contents: &str) -> PackageManifest {
        PackageManifest::parse("package.json", contents).unwrap()
    }

    #[test]
    fn adds_scripts_section_when_missing() {
        let mut m = manifest(r#"{"name": "demo"}"#);
        assert_eq!(m.set_script("lint", "eslint . --fix"), ScriptChange::Added);

        let value: Value = serde_json::from_str(&m.to_json_string().unwrap()).unwrap();
        assert_eq!(value["scripts"], json!({"lint": "eslint . --fix"}));
        assert_eq!(value["name"], "demo");
    }

    #[test]
    fn replaces_non_object_scripts() {
        let mut m = manifest(r#"{"scripts": "oops"}"#);
        m.set_script("test", "vitest .");
        assert_eq!(m.script("test"), Some("vitest ."));
    }

    #[test]
    fn preserves_other_scripts_and_order() {
        let mut m = manifest(r#"{"scripts":{"build":"x"}}"#);
        m.set_script("lint", "eslint . --fix");

        let out = m.to_json_string().unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(
            value,
            json!({"scripts": {"build": "x", "lint": "eslint . --fix"}})
        );
        assert!(out.find("\"build\"").unwrap() < out.find("\"lint\"").unwrap());
    }

    #[test]
    fn overwrites_only_target_key() {
        let mut m = manifest(r#"{"scripts":{"lint":"old","build":"tsc"}}"#);
        assert_eq!(
            m.set_script("lint", "eslint . --fix"),
            ScriptChange::Replaced {
                previous: "old".to_string()
            }
        );
        assert_eq!(m.script("build"), Some("tsc"));
        assert_eq!(m.script("lint"), Some("eslint . --fix"));
    }

    #[test]
    fn same_command_is_unchanged() {
        let mut m = manifest(r#"{"scripts":{"release":"release-it"}}"#);
        assert_eq!(m.set_script("release", "release-it"), ScriptChange::Unchanged);
    }

    #[test]
    fn keeps_top_level_key_order() {
        let m = manifest(r#"{"version":"1.0.0","name":"z","scripts":{}}"#);
        let out = m.to_json_string().unwrap();
        let v = out.find("\"version\"").unwrap();
        let n = out.find("\"name\"").unwrap();
        assert!(v < n);
        assert!(out.ends_with("}\n"));
        assert!(out.contains("\n  \"name\""));
    }

    #[test]
    fn parse_error_is_reported() {
        let err = PackageManifest::parse("package.json", "{ not json").unwrap_err();
        assert!(matches!(err, ManifestError::Parse { .. }));

        let err = PackageManifest::parse("package.json", "[1, 2]").unwrap_err();
        assert!(matches!(err, ManifestError::NotAnObject { .. }));
    }

    #[test]
    fn set_scripts_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(MANIFEST_FILE);
        fs::write(&path, r#"{"name":"demo","scripts":{"build":"x"}}"#).unwrap();

        let changes = set_scripts(&path, &[("lint", "eslint . --fix"), ("build", "x")]).unwrap();
        assert_eq!(changes[0].1, ScriptChange::Added);
        assert_eq!(changes[1].1, ScriptChange::Unchanged);

        let reloaded = PackageManifest::from_path(&path).unwrap();
        assert_eq!(reloaded.script("lint"), Some("eslint . --fix"));
        assert_eq!(reloaded.script("build"), Some("x"));
    }

    #[test]
    fn unchanged_manifest_is_not_rewritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(MANIFEST_FILE);
        let original = r#"{"scripts":{"test":"vitest ."}}"#;
        fs::write(&path, original).unwrap();

        assert_eq!(
            set_script(&path, "test", "vitest .").unwrap(),
            ScriptChange::Unchanged
        );
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn missing_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let err = set_script(&dir.path().join(MANIFEST_FILE), "lint", "eslint .").unwrap_err();
        assert!(matches!(err, ManifestError::Read { .. }));
    }
}

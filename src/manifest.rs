//! Project manifest (`package.json`) access.
//!
//! The tool owns a single section of the manifest, `gitDependencies`, a map of
//! package name to reference string. Everything else in the file is carried
//! through untouched, in its original key order.

use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

pub const MANIFEST_FILE: &str = "package.json";
pub const GIT_DEPENDENCIES_KEY: &str = "gitDependencies";

/// Declared dependencies, name -> raw reference string, in manifest order.
pub type DeclaredDependencies = IndexMap<String, String>;

pub fn manifest_path(project_dir: &Path) -> PathBuf {
    project_dir.join(MANIFEST_FILE)
}

/// Read the declared dependency set.
///
/// Returns `Ok(None)` when the manifest has no `gitDependencies` section.
pub fn load_git_dependencies(project_dir: &Path) -> Result<Option<DeclaredDependencies>> {
    let path = manifest_path(project_dir);
    let document = read_document(project_dir)?;

    match document.get(GIT_DEPENDENCIES_KEY) {
        None | Some(Value::Null) => Ok(None),
        Some(section) => serde_json::from_value(section.clone())
            .map(Some)
            .map_err(|e| Error::InvalidManifest {
                path,
                message: format!("{} must map names to strings: {}", GIT_DEPENDENCIES_KEY, e),
            }),
    }
}

/// Add or update entries in `gitDependencies`, creating the section if needed.
///
/// The file is re-read before writing so entries that are not part of
/// `entries` are preserved.
pub fn save_git_dependencies(project_dir: &Path, entries: &DeclaredDependencies) -> Result<()> {
    let path = manifest_path(project_dir);
    let mut document = read_document(project_dir)?;

    let section = document
        .entry(GIT_DEPENDENCIES_KEY)
        .or_insert(Value::Null);
    if !section.is_object() {
        *section = Value::Object(Map::new());
    }
    if let Some(section) = section.as_object_mut() {
        for (name, reference) in entries {
            section.insert(name.clone(), Value::String(reference.clone()));
        }
    }

    let mut content =
        serde_json::to_string_pretty(&Value::Object(document)).map_err(|e| {
            Error::InvalidManifest {
                path: path.clone(),
                message: e.to_string(),
            }
        })?;
    content.push('\n');

    fs::write(&path, content)
        .map_err(|e| Error::io(format!("Failed to write {}", path.display()), e))?;
    tracing::debug!("saved {} entries to {}", entries.len(), path.display());
    Ok(())
}

fn read_document(project_dir: &Path) -> Result<Map<String, Value>> {
    let path = manifest_path(project_dir);
    if !path.exists() {
        return Err(Error::ManifestNotFound(project_dir.to_path_buf()));
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| Error::io(format!("Failed to read {}", path.display()), e))?;

    match serde_json::from_str::<Value>(&content) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(Error::InvalidManifest {
            path,
            message: "expected a JSON object".to_string(),
        }),
        Err(e) => Err(Error::InvalidManifest {
            path,
            message: e.to_string(),
        }),
    }
}

/// The fields of a package's own `package.json` that this tool looks at.
///
/// Fields are read leniently: a field of an unexpected type reads as absent
/// instead of failing the whole manifest.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(default, rename_all = "camelCase")]
pub struct PackageMetadata {
    #[serde(deserialize_with = "string_or_none")]
    pub name: Option<String>,
    #[serde(deserialize_with = "string_or_none")]
    pub version: Option<String>,
    #[serde(deserialize_with = "string_or_none")]
    pub description: Option<String>,
    pub dependencies: Option<Value>,
    pub dev_dependencies: Option<Value>,
}

fn string_or_none<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

impl PackageMetadata {
    /// Read `<dir>/package.json`. `Ok(None)` when the file does not exist.
    pub fn read(dir: &Path) -> Result<Option<Self>> {
        let path = dir.join(MANIFEST_FILE);
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)
            .map_err(|e| Error::io(format!("Failed to read {}", path.display()), e))?;
        let metadata = serde_json::from_str(&content).map_err(|e| Error::InvalidManifest {
            path,
            message: e.to_string(),
        })?;
        Ok(Some(metadata))
    }

    pub fn declares_dependencies(&self) -> bool {
        self.dependencies.is_some() || self.dev_dependencies.is_some()
    }

    /// Number of runtime dependencies, when they are declared as an object.
    pub fn dependency_count(&self) -> Option<usize> {
        self.dependencies
            .as_ref()
            .and_then(Value::as_object)
            .map(Map::len)
    }
}

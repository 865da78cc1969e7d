//! Settings files and the per-invocation run context.
//!
//! Settings are layered: built-in defaults, then the global
//! `<config_dir>/git-deps/config.toml`, then `git-deps.toml` in the project
//! directory. Each layer only overrides the fields it sets.

use crate::error::{Error, Result};
use crate::package_manager::PackageManager;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Project-level settings file, next to `package.json`.
pub const SETTINGS_FILE: &str = "git-deps.toml";

const DEFAULT_INSTALL_DIR: &str = "node_modules";

#[derive(Deserialize, Debug, Default)]
struct SettingsLayer {
    install_dir: Option<String>,
    package_manager: Option<PackageManager>,
    install_nested: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Package root, relative to the project directory.
    pub install_dir: String,
    /// Forces a host package manager instead of detecting one.
    pub package_manager: Option<PackageManager>,
    /// Run the host package manager inside each extracted package.
    pub install_nested: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            install_dir: DEFAULT_INSTALL_DIR.to_string(),
            package_manager: None,
            install_nested: true,
        }
    }
}

impl Settings {
    pub fn load(project_dir: &Path) -> Result<Self> {
        let mut settings = Self::default();
        if let Some(global) = global_settings_path() {
            settings.apply_file(&global)?;
        }
        settings.apply_file(&project_dir.join(SETTINGS_FILE))?;
        Ok(settings)
    }

    /// Overlay one settings file. A missing file leaves the settings untouched.
    pub fn apply_file(&mut self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }

        let content = fs::read_to_string(path).map_err(|e| Error::InvalidSettings {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let layer: SettingsLayer = toml::from_str(&content).map_err(|e| Error::InvalidSettings {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        tracing::debug!("loaded settings from {}", path.display());
        self.merge(layer);
        Ok(())
    }

    fn merge(&mut self, layer: SettingsLayer) {
        if let Some(dir) = layer.install_dir {
            self.install_dir = dir;
        }
        if layer.package_manager.is_some() {
            self.package_manager = layer.package_manager;
        }
        if let Some(nested) = layer.install_nested {
            self.install_nested = nested;
        }
    }
}

fn global_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("git-deps").join("config.toml"))
}

/// Everything one command invocation needs to know about its environment.
#[derive(Debug, Clone)]
pub struct Context {
    pub project_dir: PathBuf,
    pub verbose: bool,
    pub settings: Settings,
}

impl Context {
    pub fn new(project_dir: impl Into<PathBuf>, verbose: bool, settings: Settings) -> Self {
        Self {
            project_dir: project_dir.into(),
            verbose,
            settings,
        }
    }

    /// Directory packages are installed under, e.g. `<project>/node_modules`.
    pub fn install_root(&self) -> PathBuf {
        self.project_dir.join(&self.settings.install_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.install_dir, "node_modules");
        assert_eq!(settings.package_manager, None);
        assert!(settings.install_nested);
    }

    #[test]
    fn test_missing_file_is_ignored() {
        let temp = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.apply_file(&temp.path().join(SETTINGS_FILE)).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_project_file_overrides_fields_it_sets() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join(SETTINGS_FILE);
        fs::write(&path, "install_dir = \"vendor/js\"\npackage_manager = \"pnpm\"\n").unwrap();

        let mut settings = Settings::default();
        settings.apply_file(&path).unwrap();

        assert_eq!(settings.install_dir, "vendor/js");
        assert_eq!(settings.package_manager, Some(PackageManager::Pnpm));
        assert!(settings.install_nested);
    }

    #[test]
    fn test_later_layer_wins() {
        let temp = tempfile::tempdir().unwrap();
        let global = temp.path().join("global.toml");
        let project = temp.path().join(SETTINGS_FILE);
        fs::write(&global, "install_dir = \"a\"\ninstall_nested = false\n").unwrap();
        fs::write(&project, "install_dir = \"b\"\n").unwrap();

        let mut settings = Settings::default();
        settings.apply_file(&global).unwrap();
        settings.apply_file(&project).unwrap();

        assert_eq!(settings.install_dir, "b");
        assert!(!settings.install_nested);
    }

    #[test]
    fn test_malformed_file_is_rejected() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join(SETTINGS_FILE);
        fs::write(&path, "install_dir = [").unwrap();

        let err = Settings::default().apply_file(&path).unwrap_err();
        assert!(matches!(err, Error::InvalidSettings { .. }));
    }

    #[test]
    fn test_install_root_joins_project_dir() {
        let ctx = Context::new("/work/app", false, Settings::default());
        assert_eq!(ctx.install_root(), PathBuf::from("/work/app/node_modules"));
    }
}

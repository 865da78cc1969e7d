//! Host package manager integration.
//!
//! After a package is extracted, its own dependencies are installed by
//! whichever of npm, yarn or pnpm the project uses. Detection looks at the
//! project's lockfile first, then at what is on `PATH`.

use crate::config::Context;
use crate::error::{Error, Result};
use crate::manifest::PackageMetadata;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    Npm,
    Yarn,
    Pnpm,
}

impl PackageManager {
    /// Preference order for both lockfile and `PATH` detection.
    pub const DETECTION_ORDER: [PackageManager; 3] =
        [PackageManager::Pnpm, PackageManager::Yarn, PackageManager::Npm];

    pub fn command(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Yarn => "yarn",
            PackageManager::Pnpm => "pnpm",
        }
    }

    pub fn lockfile(&self) -> &'static str {
        match self {
            PackageManager::Npm => "package-lock.json",
            PackageManager::Yarn => "yarn.lock",
            PackageManager::Pnpm => "pnpm-lock.yaml",
        }
    }

    /// Flag that skips dev dependencies.
    pub fn production_flag(&self) -> &'static str {
        match self {
            PackageManager::Npm => "--omit=dev",
            PackageManager::Yarn => "--production",
            PackageManager::Pnpm => "--prod",
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command())
    }
}

/// Pick the package manager for `project_dir`.
pub fn detect_package_manager(project_dir: &Path) -> PackageManager {
    detect_with(project_dir, command_exists)
}

fn detect_with(project_dir: &Path, available: impl Fn(&str) -> bool) -> PackageManager {
    PackageManager::DETECTION_ORDER
        .into_iter()
        .find(|pm| project_dir.join(pm.lockfile()).exists() && available(pm.command()))
        .or_else(|| {
            PackageManager::DETECTION_ORDER
                .into_iter()
                .find(|pm| available(pm.command()))
        })
        .unwrap_or(PackageManager::Npm)
}

fn command_exists(cmd: &str) -> bool {
    let finder = if cfg!(windows) { "where" } else { "which" };
    Command::new(finder)
        .arg(cmd)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Installs the declared dependencies of an extracted package.
pub trait PackageInstallHook {
    fn install_dependencies_for(&self, package_dir: &Path) -> Result<()>;
}

/// Runs the project's host package manager inside the package directory.
#[derive(Debug, Clone)]
pub struct HostPackageManager {
    project_dir: PathBuf,
    verbose: bool,
    forced: Option<PackageManager>,
}

impl HostPackageManager {
    pub fn new(ctx: &Context) -> Self {
        Self {
            project_dir: ctx.project_dir.clone(),
            verbose: ctx.verbose,
            forced: ctx.settings.package_manager,
        }
    }

    fn run(&self, manager: PackageManager, package_dir: &Path) -> Result<()> {
        let failed = |message: String| Error::PackageInstallFailed {
            dir: package_dir.to_path_buf(),
            message,
        };

        let mut command = if cfg!(windows) {
            let mut c = Command::new("cmd");
            c.args(["/C", manager.command()]);
            c
        } else {
            Command::new(manager.command())
        };
        command
            .args(["install", manager.production_flag()])
            .current_dir(package_dir);

        if self.verbose {
            let status = command
                .status()
                .map_err(|e| failed(format!("could not run {}: {}", manager, e)))?;
            if !status.success() {
                return Err(failed(format!("{} install exited with {}", manager, status)));
            }
        } else {
            let output = command
                .stdin(Stdio::null())
                .output()
                .map_err(|e| failed(format!("could not run {}: {}", manager, e)))?;
            if !output.status.success() {
                let stderr = String::from_utf8_lossy(&output.stderr);
                return Err(failed(format!(
                    "{} install exited with {}: {}",
                    manager,
                    output.status,
                    stderr.trim()
                )));
            }
        }

        Ok(())
    }
}

impl PackageInstallHook for HostPackageManager {
    fn install_dependencies_for(&self, package_dir: &Path) -> Result<()> {
        let Some(metadata) = PackageMetadata::read(package_dir)? else {
            tracing::debug!("no package.json in {}, skipping", package_dir.display());
            return Ok(());
        };

        if !metadata.declares_dependencies() {
            tracing::debug!("No dependencies to install in {}, skipping", package_dir.display());
            return Ok(());
        }

        let manager = self
            .forced
            .unwrap_or_else(|| detect_package_manager(&self.project_dir));
        tracing::info!(
            "Installing dependencies in {} using {}...",
            package_dir.display(),
            manager
        );
        self.run(manager, package_dir)?;
        tracing::info!("Dependencies installed successfully");
        Ok(())
    }
}

/// Hook used when nested installs are turned off.
#[derive(Debug, Default, Clone, Copy)]
pub struct SkipPackageInstall;

impl PackageInstallHook for SkipPackageInstall {
    fn install_dependencies_for(&self, package_dir: &Path) -> Result<()> {
        tracing::debug!("nested install disabled, not installing {}", package_dir.display());
        Ok(())
    }
}

/// The hook selected by the settings in `ctx`.
pub fn hook_for(ctx: &Context) -> Box<dyn PackageInstallHook> {
    if ctx.settings.install_nested {
        Box::new(HostPackageManager::new(ctx))
    } else {
        Box::new(SkipPackageInstall)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use std::fs;

    #[test]
    fn test_detect_from_lockfile() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("yarn.lock"), "").unwrap();
        let pm = detect_with(temp.path(), |_| true);
        assert_eq!(pm, PackageManager::Yarn);
    }

    #[test]
    fn test_lockfile_ignored_when_command_missing() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("pnpm-lock.yaml"), "").unwrap();
        let pm = detect_with(temp.path(), |cmd| cmd == "npm");
        assert_eq!(pm, PackageManager::Npm);
    }

    #[test]
    fn test_detect_first_available_without_lockfile() {
        let temp = tempfile::tempdir().unwrap();
        let pm = detect_with(temp.path(), |cmd| cmd == "yarn" || cmd == "npm");
        assert_eq!(pm, PackageManager::Yarn);
    }

    #[test]
    fn test_default_to_npm() {
        let temp = tempfile::tempdir().unwrap();
        assert_eq!(detect_with(temp.path(), |_| false), PackageManager::Npm);
    }

    #[test]
    fn test_production_flags() {
        assert_eq!(PackageManager::Npm.production_flag(), "--omit=dev");
        assert_eq!(PackageManager::Pnpm.production_flag(), "--prod");
        assert_eq!(PackageManager::Yarn.production_flag(), "--production");
    }

    fn host(project: &Path) -> HostPackageManager {
        HostPackageManager::new(&Context::new(project, false, Settings::default()))
    }

    #[test]
    fn test_hook_skips_without_manifest() {
        let temp = tempfile::tempdir().unwrap();
        assert!(host(temp.path()).install_dependencies_for(temp.path()).is_ok());
    }

    #[test]
    fn test_hook_skips_without_dependencies() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("package.json"), r#"{"name":"leaf"}"#).unwrap();
        assert!(host(temp.path()).install_dependencies_for(temp.path()).is_ok());
    }

    #[test]
    fn test_hook_tolerates_unexpected_field_types() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(
            temp.path().join("package.json"),
            r#"{"name":"x","version":1,"description":{"text":"odd"}}"#,
        )
        .unwrap();
        assert!(host(temp.path()).install_dependencies_for(temp.path()).is_ok());
    }

    #[test]
    fn test_hook_rejects_malformed_manifest() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("package.json"), "{").unwrap();
        assert!(host(temp.path()).install_dependencies_for(temp.path()).is_err());
    }

    #[test]
    fn test_hook_for_respects_install_nested() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(
            temp.path().join("package.json"),
            r#"{"dependencies":{"left-pad":"1.3.0"}}"#,
        )
        .unwrap();
        let settings = Settings {
            install_nested: false,
            ..Settings::default()
        };
        let hook = hook_for(&Context::new(temp.path(), false, settings));
        assert!(hook.install_dependencies_for(temp.path()).is_ok());
    }
}

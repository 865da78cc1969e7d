//! Listing of declared dependencies and their installed state.
//!
//! The declared reference of every entry is always listed. Installed-state
//! inspection is best effort: a failure for one entry is logged at debug level
//! and only drops that entry's detail.

use super::plan::destination_path_for;
use super::reference::DependencyReference;
use crate::config::Context;
use crate::error::{Error, Result};
use crate::manifest::{self, PackageMetadata};
use std::path::Path;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// Inspect each dependency's install directory.
    pub detail: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallState {
    NotInstalled,
    Installed {
        version: Option<String>,
        description: Option<String>,
        dependency_count: Option<usize>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedDependency {
    pub name: String,
    pub reference: DependencyReference,
    /// `None` when detail was not requested or could not be gathered.
    pub state: Option<InstallState>,
}

pub fn list_dependencies(ctx: &Context, options: ListOptions) -> Result<Vec<ListedDependency>> {
    let declared = manifest::load_git_dependencies(&ctx.project_dir)?.unwrap_or_default();
    let install_root = ctx.install_root();

    let listed = declared
        .iter()
        .map(|(name, raw)| {
            let state = if options.detail {
                match inspect_installed(name, &install_root) {
                    Ok(state) => Some(state),
                    Err(e) => {
                        tracing::debug!("{}", e);
                        None
                    }
                }
            } else {
                None
            };

            ListedDependency {
                name: name.clone(),
                reference: DependencyReference::parse(raw),
                state,
            }
        })
        .collect();

    Ok(listed)
}

/// Installed state of `name` under `install_root`.
pub fn inspect_installed(name: &str, install_root: &Path) -> Result<InstallState> {
    let package_dir = destination_path_for(name, install_root)?;
    if !package_dir.exists() {
        return Ok(InstallState::NotInstalled);
    }

    let metadata = PackageMetadata::read(&package_dir)
        .map_err(|e| Error::DetailFetchFailed {
            name: name.to_string(),
            message: e.to_string(),
        })?
        .unwrap_or_default();

    Ok(InstallState::Installed {
        dependency_count: metadata.dependency_count(),
        version: metadata.version,
        description: metadata.description,
    })
}

//! Install planning: batching dependencies by repository and laying out
//! destination directories.

use super::reference::DependencyReference;
use crate::error::{Error, Result};
use crate::manifest::DeclaredDependencies;
use indexmap::IndexMap;
use std::path::{Component, Path, PathBuf};

/// One dependency inside a [`RepositoryGroup`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupMember {
    pub name: String,
    pub raw_reference: String,
    pub subpath: String,
}

/// Dependencies that share a repository URL and ref, fetched together once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryGroup {
    pub repository_url: String,
    pub git_ref: String,
    pub members: Vec<GroupMember>,
}

impl RepositoryGroup {
    pub fn key(&self) -> String {
        format!("{}#{}", self.repository_url, self.git_ref)
    }
}

/// Group `deps` by `(url, ref)`.
///
/// Groups come out in order of first appearance, and members keep their
/// order within a group.
pub fn group_by_repository(deps: &DeclaredDependencies) -> Vec<RepositoryGroup> {
    let mut groups: IndexMap<String, RepositoryGroup> = IndexMap::new();

    for (name, raw) in deps {
        let parsed = DependencyReference::parse(raw);
        let group = groups
            .entry(parsed.repository_key())
            .or_insert_with(|| RepositoryGroup {
                repository_url: parsed.repository_url.clone(),
                git_ref: parsed.git_ref.clone(),
                members: Vec::new(),
            });
        group.members.push(GroupMember {
            name: name.clone(),
            raw_reference: raw.clone(),
            subpath: parsed.subpath,
        });
    }

    groups.into_values().collect()
}

/// Install directory for a package name.
///
/// `@scope/pkg` is laid out two levels deep as `<root>/scope/pkg`; any other
/// name goes directly under `root`. Names that would resolve outside
/// `install_root` (empty, absolute, or with `.`/`..` segments) are rejected.
pub fn destination_path_for(name: &str, install_root: &Path) -> Result<PathBuf> {
    let relative = match name.strip_prefix('@').and_then(|s| s.split_once('/')) {
        Some((scope, unscoped)) => Path::new(scope).join(unscoped),
        None => PathBuf::from(name),
    };

    let invalid = |reason: &str| Error::InvalidPackageName {
        name: name.to_string(),
        reason: reason.to_string(),
    };
    if relative.as_os_str().is_empty() {
        return Err(invalid("name is empty"));
    }
    if !relative
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
    {
        return Err(invalid("name must be a relative path without '.' or '..' segments"));
    }

    Ok(install_root.join(relative))
}

/// True when `name` can be installed under an install root.
pub fn is_installable_name(name: &str) -> bool {
    destination_path_for(name, Path::new("")).is_ok()
}

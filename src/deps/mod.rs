//! Git dependency resolution and installation.
//!
//! This module handles the whole pipeline from a declared reference string to
//! an installed package directory:
//!
//! - **Parsing**: split `url#ref&path:subpath` into its parts
//! - **Planning**: batch dependencies by repository and ref
//! - **Fetching**: materialize each repository once per run
//! - **Extraction**: copy the referenced subtree into the package root
//! - **Listing**: report declared dependencies and their installed state
//!
//! ## Commands
//!
//! - `git-deps install [name|url]` - Install one or all dependencies
//! - `git-deps list [--detail]` - Show declared dependencies

mod extract;
mod fetch;
mod identity;
mod install;
mod list;
mod plan;
mod reference;

pub use extract::{extract, source_path};
pub use fetch::{Fetcher, GitFetcher, WorkingCopy};
pub use identity::{installable_name, resolve_name};
pub use install::{InstallOptions, InstallOutcome, Installer};
pub use list::{InstallState, ListOptions, ListedDependency, inspect_installed, list_dependencies};
pub use plan::{
    GroupMember, RepositoryGroup, destination_path_for, group_by_repository, is_installable_name,
};
pub use reference::{
    DEFAULT_REF, DependencyReference, ROOT_SUBPATH, is_commit_hash, is_git_reference,
    repository_name_from_url,
};

//! Error taxonomy for dependency installation and listing.
//!
//! Every failure the core can produce is one variant of [`Error`]. Whether a
//! variant is fatal depends on where it surfaces: `install` treats everything
//! that reaches it as terminal for the run, while `list` downgrades per-entry
//! introspection failures ([`Error::DetailFetchFailed`]) to debug notes.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// The project manifest (`package.json`) does not exist.
    #[error("package.json not found in {}", .0.display())]
    ManifestNotFound(PathBuf),

    /// The manifest exists but is not a JSON object of the expected shape.
    #[error("invalid manifest {}: {message}", path.display())]
    InvalidManifest { path: PathBuf, message: String },

    /// A settings file could not be read or parsed.
    #[error("invalid settings file {}: {message}", path.display())]
    InvalidSettings { path: PathBuf, message: String },

    /// Cloning, fetching or checking out a repository failed.
    #[error("Git fetch of {url}#{git_ref} failed: {message}")]
    FetchFailed {
        url: String,
        git_ref: String,
        message: String,
    },

    /// The declared subpath is missing from the fetched working copy.
    #[error("Source path {subpath} does not exist in the repository")]
    SourceNotFound { subpath: String },

    /// A package name that would not stay inside the install root.
    #[error("Invalid package name '{name}': {reason}")]
    InvalidPackageName { name: String, reason: String },

    /// A dependency name was requested that is not declared in the manifest.
    #[error("Dependency '{0}' not found in gitDependencies")]
    DependencyNotFound(String),

    /// Inspecting the installed state of one listed dependency failed.
    #[error("Failed to get detailed info for {name}: {message}")]
    DetailFetchFailed { name: String, message: String },

    /// The host package manager failed for an extracted package.
    #[error("Installing dependencies in {} failed: {message}", dir.display())]
    PackageInstallFailed { dir: PathBuf, message: String },

    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Error::Io {
            context: context.into(),
            source,
        }
    }
}

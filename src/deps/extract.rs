//! Subtree extraction from a working copy into a package directory.

use super::reference::ROOT_SUBPATH;
use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const GIT_DIR: &str = ".git";

/// Where `subpath` lives inside `working_copy`.
pub fn source_path(working_copy: &Path, subpath: &str) -> PathBuf {
    if subpath == ROOT_SUBPATH {
        working_copy.to_path_buf()
    } else {
        working_copy.join(subpath.trim_start_matches('/'))
    }
}

/// Copy `subpath` of `working_copy` into `destination`.
///
/// Any previous contents of `destination` are replaced, not merged. Fails
/// with [`Error::SourceNotFound`] before touching `destination` when the
/// subpath does not exist.
pub fn extract(working_copy: &Path, subpath: &str, destination: &Path) -> Result<()> {
    let source = source_path(working_copy, subpath);
    if !source.exists() {
        return Err(Error::SourceNotFound {
            subpath: subpath.to_string(),
        });
    }

    if destination.exists() {
        fs::remove_dir_all(destination).map_err(|e| {
            Error::io(format!("Failed to clear {}", destination.display()), e)
        })?;
    }
    fs::create_dir_all(destination)
        .map_err(|e| Error::io(format!("Failed to create {}", destination.display()), e))?;

    if source.is_file() {
        let file_name = source.file_name().unwrap_or(source.as_os_str());
        let target = destination.join(file_name);
        fs::copy(&source, &target)
            .map_err(|e| Error::io(format!("Failed to copy {}", source.display()), e))?;
        return Ok(());
    }

    copy_tree(&source, destination)
}

fn copy_tree(source: &Path, destination: &Path) -> Result<()> {
    let walker = WalkDir::new(source)
        .min_depth(1)
        .into_iter()
        .filter_entry(|entry| entry.file_name() != GIT_DIR);

    for entry in walker {
        let entry = entry.map_err(|e| {
            let message = e.to_string();
            Error::io(
                format!("Failed to walk {}", source.display()),
                e.into_io_error()
                    .unwrap_or_else(|| std::io::Error::other(message)),
            )
        })?;

        let relative = entry.path().strip_prefix(source).unwrap_or(entry.path());
        let target = destination.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .map_err(|e| Error::io(format!("Failed to create {}", target.display()), e))?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)
                    .map_err(|e| Error::io(format!("Failed to create {}", parent.display()), e))?;
            }
            if entry.path_is_symlink() {
                copy_symlink(entry.path(), &target)?;
            } else {
                fs::copy(entry.path(), &target).map_err(|e| {
                    Error::io(format!("Failed to copy {}", entry.path().display()), e)
                })?;
            }
        }
    }

    Ok(())
}

/// Recreate `link` at `target` with the same (possibly dangling) target.
#[cfg(unix)]
fn copy_symlink(link: &Path, target: &Path) -> Result<()> {
    let points_to = fs::read_link(link)
        .map_err(|e| Error::io(format!("Failed to read link {}", link.display()), e))?;
    std::os::unix::fs::symlink(&points_to, target)
        .map_err(|e| Error::io(format!("Failed to create link {}", target.display()), e))
}

#[cfg(not(unix))]
fn copy_symlink(link: &Path, _target: &Path) -> Result<()> {
    tracing::warn!("skipping symbolic link {}", link.display());
    Ok(())
}

//! Repository fetching.
//!
//! A fetch materializes one repository at one ref into a temporary working
//! copy. Branches and tags are fetched shallow and single-ref; full commit
//! hashes need history, so they fetch every branch in full and check the
//! commit out detached.

use super::reference::{DEFAULT_REF, is_commit_hash, is_scp_like};
use crate::error::{Error, Result};
use git2::build::CheckoutBuilder;
use git2::{Cred, CredentialType, FetchOptions, Oid, RemoteCallbacks, Repository};
use std::cell::Cell;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const TEMP_PREFIX: &str = "git-deps-";
const MAX_CREDENTIAL_ATTEMPTS: usize = 3;

/// A local checkout of a repository at a ref.
///
/// Temporary working copies are deleted when dropped.
#[derive(Debug)]
pub struct WorkingCopy {
    path: PathBuf,
    _temp: Option<TempDir>,
}

impl WorkingCopy {
    pub fn temporary(dir: TempDir) -> Self {
        Self {
            path: dir.path().to_path_buf(),
            _temp: Some(dir),
        }
    }

    /// Wrap an existing directory. It is left in place on drop.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _temp: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Materializes a repository at a ref.
pub trait Fetcher {
    fn fetch(&self, url: &str, git_ref: &str) -> Result<WorkingCopy>;
}

/// [`Fetcher`] backed by libgit2.
#[derive(Debug, Default, Clone, Copy)]
pub struct GitFetcher;

impl Fetcher for GitFetcher {
    fn fetch(&self, url: &str, git_ref: &str) -> Result<WorkingCopy> {
        let failed = |message: String| Error::FetchFailed {
            url: url.to_string(),
            git_ref: git_ref.to_string(),
            message,
        };

        let dir = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .tempdir()
            .map_err(|e| failed(format!("could not create temporary directory: {}", e)))?;

        tracing::debug!("fetching {}#{} into {}", url, git_ref, dir.path().display());
        let commit = fetch_into(dir.path(), url, git_ref).map_err(|e| failed(e.message().to_string()))?;
        tracing::debug!("checked out {} at {}", url, commit);

        Ok(WorkingCopy::temporary(dir))
    }
}

fn fetch_into(dir: &Path, url: &str, git_ref: &str) -> std::result::Result<Oid, git2::Error> {
    let repo = Repository::init(dir)?;
    let mut remote = repo.remote("origin", url)?;

    let pinned = is_commit_hash(git_ref);
    let mut options = FetchOptions::new();
    options.remote_callbacks(credential_callbacks());
    if !pinned && supports_shallow(url) {
        options.depth(1);
    }

    let refspecs = fetch_refspecs(git_ref, pinned);
    remote.fetch(&refspecs, Some(&mut options), None)?;

    let target = resolve_target(&repo, git_ref, pinned)?;
    checkout_detached(&repo, target)?;

    match repo.workdir() {
        Some(workdir) if workdir.exists() => Ok(target),
        _ => Err(git2::Error::from_str("fetch produced no working tree")),
    }
}

/// libgit2 refuses shallow fetches over the local transport.
fn supports_shallow(url: &str) -> bool {
    match url.split_once("://") {
        Some((scheme, _)) => scheme != "file",
        None => is_scp_like(url),
    }
}

fn fetch_refspecs(git_ref: &str, pinned: bool) -> Vec<String> {
    if pinned {
        vec![
            "+refs/heads/*:refs/remotes/origin/*".to_string(),
            "+refs/tags/*:refs/tags/*".to_string(),
        ]
    } else if git_ref == DEFAULT_REF {
        vec![DEFAULT_REF.to_string()]
    } else {
        vec![
            format!("+refs/heads/{0}:refs/remotes/origin/{0}", git_ref),
            format!("+refs/tags/{0}:refs/tags/{0}", git_ref),
        ]
    }
}

fn resolve_target(repo: &Repository, git_ref: &str, pinned: bool) -> std::result::Result<Oid, git2::Error> {
    if pinned {
        let oid = Oid::from_str(git_ref)?;
        return Ok(repo.find_commit(oid)?.id());
    }

    if git_ref == DEFAULT_REF {
        return fetched_head(repo);
    }

    for refname in [
        format!("refs/remotes/origin/{}", git_ref),
        format!("refs/tags/{}", git_ref),
    ] {
        if let Ok(reference) = repo.find_reference(&refname)
            && let Ok(commit) = reference.peel_to_commit()
        {
            return Ok(commit.id());
        }
    }

    Err(git2::Error::from_str(&format!(
        "no branch or tag named '{}'",
        git_ref
    )))
}

fn fetched_head(repo: &Repository) -> std::result::Result<Oid, git2::Error> {
    let mut head = None;
    repo.fetchhead_foreach(|_refname, _url, oid, _is_merge| {
        head = Some(*oid);
        false
    })
    .ok();

    head.ok_or_else(|| git2::Error::from_str("remote has no HEAD to check out"))
}

fn checkout_detached(repo: &Repository, oid: Oid) -> std::result::Result<(), git2::Error> {
    repo.set_head_detached(oid)?;
    let obj = repo.find_object(oid, None)?;
    let mut checkout_opts = CheckoutBuilder::new();
    checkout_opts.force();
    repo.checkout_tree(&obj, Some(&mut checkout_opts))
}

fn credential_callbacks<'a>() -> RemoteCallbacks<'a> {
    let attempts = Cell::new(0usize);
    let mut callbacks = RemoteCallbacks::new();
    callbacks.credentials(move |url, username, allowed| {
        attempts.set(attempts.get() + 1);
        if attempts.get() > MAX_CREDENTIAL_ATTEMPTS {
            return Err(git2::Error::from_str("authentication failed"));
        }

        if allowed.contains(CredentialType::SSH_KEY) {
            return Cred::ssh_key_from_agent(username.unwrap_or("git"));
        }
        if allowed.contains(CredentialType::USER_PASS_PLAINTEXT) {
            let config = git2::Config::open_default()?;
            return Cred::credential_helper(&config, url, username);
        }
        Cred::default()
    });
    callbacks
}

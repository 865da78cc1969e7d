//! Git dependency reference strings.
//!
//! A reference string packs three fields into one manifest value:
//!
//! ```text
//! <url>[#<ref>][&path:<subpath>]
//! https://github.com/user/monorepo.git#v1.0.0&path:/packages/lib
//! ```
//!
//! The `ref` and `path:` tokens may come in either order after `#`. Raw strings
//! are parsed into [`DependencyReference`] at the edge and never passed around
//! internally.

use regex::Regex;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

pub const DEFAULT_REF: &str = "HEAD";
pub const ROOT_SUBPATH: &str = "/";

const PATH_PREFIX: &str = "path:";
const UNKNOWN_REPO: &str = "unknown-repo";

static COMMIT_HASH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-f]{40}$").expect("valid regex"));
static SSH_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^git@[a-zA-Z0-9_.-]+:.+\.git$").expect("valid regex"));
static RELATIVE_GIT_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\.\.?/.*\.git$").expect("valid regex"));
static ABSOLUTE_GIT_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/.*\.git$").expect("valid regex"));
static SCP_LIKE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^/:@]+@[^/:]+:(?P<path>.+)$").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DependencyReference {
    /// Repository URL, never containing the `#` fragment.
    pub repository_url: String,
    /// Branch, tag or commit; `HEAD` when unspecified.
    pub git_ref: String,
    /// Subtree inside the repository; always starts with `/`.
    pub subpath: String,
}

impl DependencyReference {
    pub fn parse(raw: &str) -> Self {
        let Some((url, fragment)) = raw.split_once('#') else {
            return Self {
                repository_url: raw.to_string(),
                git_ref: DEFAULT_REF.to_string(),
                subpath: ROOT_SUBPATH.to_string(),
            };
        };

        let mut git_ref = DEFAULT_REF;
        let mut subpath = ROOT_SUBPATH.to_string();

        // Last non-path token wins.
        for token in fragment.split('&').filter(|t| !t.is_empty()) {
            match token.strip_prefix(PATH_PREFIX) {
                Some(path) => subpath = normalize_subpath(path),
                None => git_ref = token,
            }
        }

        Self {
            repository_url: url.to_string(),
            git_ref: git_ref.to_string(),
            subpath,
        }
    }

    pub fn is_root(&self) -> bool {
        self.subpath == ROOT_SUBPATH
    }

    /// Key identifying one fetch: `url#ref`.
    pub fn repository_key(&self) -> String {
        format!("{}#{}", self.repository_url, self.git_ref)
    }
}

impl FromStr for DependencyReference {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for DependencyReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.repository_url, self.git_ref)?;
        if !self.is_root() {
            write!(f, "&{}{}", PATH_PREFIX, self.subpath)?;
        }
        Ok(())
    }
}

fn normalize_subpath(path: &str) -> String {
    if path.is_empty() {
        ROOT_SUBPATH.to_string()
    } else if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

/// True when `git_ref` is a full 40-character commit hash.
pub fn is_commit_hash(git_ref: &str) -> bool {
    COMMIT_HASH.is_match(git_ref)
}

/// Distinguish "install by Git URL" from "install by declared name".
///
/// Only the URL part (before any `#` fragment) is inspected.
pub fn is_git_reference(input: &str) -> bool {
    let url = input.split('#').next().unwrap_or(input);
    url.starts_with("https://")
        || url.starts_with("http://")
        || url.starts_with("git://")
        || SSH_URL.is_match(url)
        || RELATIVE_GIT_PATH.is_match(url)
        || ABSOLUTE_GIT_PATH.is_match(url)
}

/// `user@host:path` syntax, as used by SSH remotes.
pub(crate) fn is_scp_like(url: &str) -> bool {
    SCP_LIKE.is_match(url)
}

/// Short repository name for a URL, used when a package declares no name.
///
/// `https://github.com/u/my-repo.git` and `git@github.com:u/my-repo.git` both
/// give `my-repo`. Never fails; unrecognisable input yields `unknown-repo`.
pub fn repository_name_from_url(url: &str) -> String {
    let url = url.split('#').next().unwrap_or(url);

    let path = if let Some((_, rest)) = url.split_once("://") {
        rest.split_once('/').map(|(_, path)| path).unwrap_or("")
    } else if let Some(caps) = SCP_LIKE.captures(url) {
        caps.name("path").map(|m| m.as_str()).unwrap_or("")
    } else {
        url
    };

    path.rsplit('/')
        .find(|segment| !segment.is_empty())
        .map(|segment| segment.strip_suffix(".git").unwrap_or(segment))
        .filter(|name| !name.is_empty())
        .unwrap_or(UNKNOWN_REPO)
        .to_string()
}

//! Installable package names.
//!
//! A fetched subtree is named by its own `package.json` when it declares a
//! name, and by the repository URL otherwise. The two steps are separate so
//! callers decide when to fall back.

use super::extract::source_path;
use super::plan::is_installable_name;
use super::reference::repository_name_from_url;
use crate::manifest::PackageMetadata;
use std::path::Path;

/// Name declared by the package manifest at `subpath`, if any.
///
/// A missing manifest, an unreadable one, one without a non-empty `name` and
/// one whose name would escape the install root all yield `None`; read errors
/// are only logged at debug level.
pub fn resolve_name(working_copy: &Path, subpath: &str) -> Option<String> {
    let dir = source_path(working_copy, subpath);
    match PackageMetadata::read(&dir) {
        Ok(metadata) => metadata
            .and_then(|m| m.name)
            .filter(|name| !name.trim().is_empty())
            .filter(|name| {
                let installable = is_installable_name(name);
                if !installable {
                    tracing::debug!("ignoring uninstallable package name '{}'", name);
                }
                installable
            }),
        Err(e) => {
            tracing::debug!("Failed to read package.json: {}", e);
            None
        }
    }
}

/// Declared name, falling back to the repository name derived from `url`.
pub fn installable_name(working_copy: &Path, subpath: &str, url: &str) -> String {
    resolve_name(working_copy, subpath).unwrap_or_else(|| repository_name_from_url(url))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_name_from_root_manifest() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("package.json"), r#"{"name":"test-package"}"#).unwrap();
        assert_eq!(resolve_name(temp.path(), "/").as_deref(), Some("test-package"));
    }

    #[test]
    fn test_name_from_subdirectory() {
        let temp = tempfile::tempdir().unwrap();
        fs::create_dir_all(temp.path().join("packages/sub")).unwrap();
        fs::write(
            temp.path().join("packages/sub/package.json"),
            r#"{"name":"@scope/sub-package"}"#,
        )
        .unwrap();
        assert_eq!(
            resolve_name(temp.path(), "/packages/sub").as_deref(),
            Some("@scope/sub-package")
        );
    }

    #[test]
    fn test_no_manifest_is_none() {
        let temp = tempfile::tempdir().unwrap();
        assert_eq!(resolve_name(temp.path(), "/"), None);
    }

    #[test]
    fn test_manifest_without_name_is_none() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("package.json"), r#"{"version":"1.0.0"}"#).unwrap();
        assert_eq!(resolve_name(temp.path(), "/"), None);
    }

    #[test]
    fn test_empty_name_is_none() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("package.json"), r#"{"name":""}"#).unwrap();
        assert_eq!(resolve_name(temp.path(), "/"), None);
    }

    #[test]
    fn test_malformed_manifest_is_none() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("package.json"), "{ not json").unwrap();
        assert_eq!(resolve_name(temp.path(), "/"), None);
    }

    #[test]
    fn test_installable_name_falls_back_to_url() {
        let temp = tempfile::tempdir().unwrap();
        assert_eq!(
            installable_name(temp.path(), "/", "https://github.com/user/new.git"),
            "new"
        );

        fs::write(temp.path().join("package.json"), r#"{"name":"declared"}"#).unwrap();
        assert_eq!(
            installable_name(temp.path(), "/", "https://github.com/user/new.git"),
            "declared"
        );
    }

    #[test]
    fn test_escaping_name_falls_back_to_url() {
        let temp = tempfile::tempdir().unwrap();
        for declared in ["/etc/x", "../x"] {
            let manifest = serde_json::json!({ "name": declared }).to_string();
            fs::write(temp.path().join("package.json"), manifest).unwrap();

            assert_eq!(resolve_name(temp.path(), "/"), None);
            assert_eq!(
                installable_name(temp.path(), "/", "https://github.com/user/safe.git"),
                "safe"
            );
        }
    }
}

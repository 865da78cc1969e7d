//! Shared fixtures: local Git repositories and npm projects in temp dirs.

#![allow(dead_code)]

use git2::{Oid, Repository, Signature};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A local repository usable as a dependency source.
///
/// The directory name ends in `.git` so absolute paths to it are accepted as
/// Git references on the command line.
pub struct Fixture {
    _temp: TempDir,
    pub path: PathBuf,
    pub repo: Repository,
}

impl Fixture {
    pub fn new(name: &str) -> Self {
        let temp = tempfile::tempdir().expect("Failed to create fixture dir");
        let path = temp.path().join(format!("{}.git", name));
        let repo = Repository::init(&path).expect("Failed to init fixture repo");
        Self {
            _temp: temp,
            path,
            repo,
        }
    }

    pub fn url(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }

    pub fn write(&self, relative: &str, contents: &str) {
        let file = self.path.join(relative);
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent).expect("Failed to create fixture subdir");
        }
        fs::write(file, contents).expect("Failed to write fixture file");
    }

    pub fn remove(&self, relative: &str) {
        fs::remove_file(self.path.join(relative)).expect("Failed to remove fixture file");
    }

    /// Stage everything and commit on the current branch.
    pub fn commit(&self, message: &str) -> Oid {
        let mut index = self.repo.index().unwrap();
        index
            .add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)
            .unwrap();
        index.update_all(["*"].iter(), None).unwrap();
        index.write().unwrap();
        let tree_id = index.write_tree().unwrap();
        let tree = self.repo.find_tree(tree_id).unwrap();
        let sig = Signature::now("Fixture", "fixture@example.com").unwrap();

        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();
        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .unwrap()
    }

    pub fn branch(&self, name: &str, at: Oid) {
        let commit = self.repo.find_commit(at).unwrap();
        self.repo.branch(name, &commit, true).unwrap();
    }

    pub fn tag(&self, name: &str, at: Oid) {
        let object = self.repo.find_object(at, None).unwrap();
        let sig = Signature::now("Fixture", "fixture@example.com").unwrap();
        self.repo.tag(name, &object, &sig, name, true).unwrap();
    }
}

/// A project directory holding a `package.json`.
pub fn create_project(manifest: &str) -> TempDir {
    let temp = tempfile::tempdir().expect("Failed to create project dir");
    fs::write(temp.path().join("package.json"), manifest).expect("Failed to write package.json");
    temp
}

pub fn read_manifest(project: &Path) -> serde_json::Value {
    let text = fs::read_to_string(project.join("package.json")).expect("Failed to read package.json");
    serde_json::from_str(&text).expect("package.json is not JSON")
}

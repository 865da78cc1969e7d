//! Install orchestration.
//!
//! One run goes through these steps:
//!
//! 1. **Load**: read `gitDependencies`, writing an empty section if it is absent.
//! 2. **Select**: all declared dependencies, one declared name, or one ad-hoc
//!    Git URL (fetched right away to learn its name, then recorded).
//! 3. **Plan**: group the work set by `(url, ref)`.
//! 4. **Process**: fetch each group once, then extract and install every member
//!    unless its destination already exists and `force` is off.
//!
//! Groups and members are processed strictly in order. The first fetch,
//! extraction or nested install error ends the run.

use super::extract::extract;
use super::fetch::{Fetcher, WorkingCopy};
use super::identity::installable_name;
use super::plan::{RepositoryGroup, destination_path_for, group_by_repository};
use super::reference::{DependencyReference, is_git_reference};
use crate::config::Context;
use crate::error::Result;
use crate::manifest::{self, DeclaredDependencies};
use crate::package_manager::PackageInstallHook;
use crate::report::{Event, Reporter};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstallOptions {
    /// Reinstall packages whose destination already exists.
    pub force: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    Completed { installed: usize, skipped: usize },
    NothingToInstall,
    /// The requested name is not declared. Informational, not a failure.
    DependencyNotFound(String),
}

#[derive(Default)]
struct Tally {
    installed: usize,
    skipped: usize,
}

pub struct Installer<'a> {
    project_dir: PathBuf,
    install_root: PathBuf,
    fetcher: &'a dyn Fetcher,
    hook: &'a dyn PackageInstallHook,
    reporter: &'a dyn Reporter,
}

impl<'a> Installer<'a> {
    pub fn new(
        ctx: &Context,
        fetcher: &'a dyn Fetcher,
        hook: &'a dyn PackageInstallHook,
        reporter: &'a dyn Reporter,
    ) -> Self {
        Self {
            project_dir: ctx.project_dir.clone(),
            install_root: ctx.install_root(),
            fetcher,
            hook,
            reporter,
        }
    }

    /// Install one dependency (by declared name or Git URL), or all of them.
    pub fn install(&self, dep_arg: Option<&str>, options: InstallOptions) -> Result<InstallOutcome> {
        let declared = self.load_declared()?;

        let mut prefetched: Option<(String, WorkingCopy)> = None;
        let work_set = match dep_arg {
            Some(raw) if is_git_reference(raw) => {
                let (name, key, working_copy) = self.record_git_reference(raw)?;
                prefetched = Some((key, working_copy));
                single(&name, raw)
            }
            Some(name) => match declared.get(name) {
                Some(raw) => single(name, raw),
                None => {
                    self.reporter.report(Event::DependencyNotFound {
                        name: name.to_string(),
                    });
                    return Ok(InstallOutcome::DependencyNotFound(name.to_string()));
                }
            },
            None => declared,
        };

        if work_set.is_empty() {
            self.reporter.report(Event::NothingToInstall);
            return Ok(InstallOutcome::NothingToInstall);
        }

        let mut tally = Tally::default();
        for group in group_by_repository(&work_set) {
            let working_copy = match prefetched.take() {
                Some((key, copy)) if key == group.key() => copy,
                _ => self.fetch_group(&group)?,
            };
            self.install_group(&group, &working_copy, options, &mut tally)?;
        }

        self.reporter.report(Event::Completed {
            installed: tally.installed,
            skipped: tally.skipped,
        });
        Ok(InstallOutcome::Completed {
            installed: tally.installed,
            skipped: tally.skipped,
        })
    }

    fn load_declared(&self) -> Result<DeclaredDependencies> {
        match manifest::load_git_dependencies(&self.project_dir)? {
            Some(declared) => Ok(declared),
            None => {
                manifest::save_git_dependencies(&self.project_dir, &DeclaredDependencies::new())?;
                self.reporter.report(Event::ManifestSectionCreated);
                Ok(DeclaredDependencies::new())
            }
        }
    }

    /// Fetch an ad-hoc Git URL, name it and persist it to the manifest.
    ///
    /// Returns the name, the group key and the working copy so the install
    /// step does not fetch the same repository again.
    fn record_git_reference(&self, raw: &str) -> Result<(String, String, WorkingCopy)> {
        let parsed = DependencyReference::parse(raw);
        self.reporter.report(Event::ResolvingUrl {
            url: parsed.repository_url.clone(),
        });

        let working_copy = self.fetch(&parsed.repository_url, &parsed.git_ref)?;
        let name = installable_name(working_copy.path(), &parsed.subpath, &parsed.repository_url);

        manifest::save_git_dependencies(&self.project_dir, &single(&name, raw))?;
        self.reporter.report(Event::DependencyRecorded {
            name: name.clone(),
            reference: raw.to_string(),
        });

        Ok((name, parsed.repository_key(), working_copy))
    }

    fn fetch_group(&self, group: &RepositoryGroup) -> Result<WorkingCopy> {
        self.reporter.report(Event::FetchStarted {
            url: group.repository_url.clone(),
            git_ref: group.git_ref.clone(),
        });
        let working_copy = self.fetch(&group.repository_url, &group.git_ref)?;
        self.reporter.report(Event::FetchFinished {
            url: group.repository_url.clone(),
            git_ref: group.git_ref.clone(),
        });
        Ok(working_copy)
    }

    fn fetch(&self, url: &str, git_ref: &str) -> Result<WorkingCopy> {
        self.fetcher.fetch(url, git_ref).inspect_err(|_| {
            self.reporter.report(Event::FetchFailed {
                url: url.to_string(),
                git_ref: git_ref.to_string(),
            })
        })
    }

    fn install_group(
        &self,
        group: &RepositoryGroup,
        working_copy: &WorkingCopy,
        options: InstallOptions,
        tally: &mut Tally,
    ) -> Result<()> {
        for member in &group.members {
            let destination = destination_path_for(&member.name, &self.install_root)?;

            if !options.force && destination.exists() {
                self.reporter.report(Event::Skipped {
                    name: member.name.clone(),
                });
                tally.skipped += 1;
                continue;
            }

            self.reporter.report(Event::Extracting {
                name: member.name.clone(),
                destination: destination.clone(),
            });
            extract(working_copy.path(), &member.subpath, &destination)?;
            self.hook.install_dependencies_for(&destination)?;

            self.reporter.report(Event::Installed {
                name: member.name.clone(),
            });
            tally.installed += 1;
        }
        Ok(())
    }
}

fn single(name: &str, raw: &str) -> DeclaredDependencies {
    let mut deps = DeclaredDependencies::new();
    deps.insert(name.to_string(), raw.to_string());
    deps
}

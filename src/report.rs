//! Progress and result events.
//!
//! The installer never prints. It emits [`Event`]s to a [`Reporter`]; the CLI
//! renders them with [`ConsoleReporter`], tests collect them with
//! [`RecordingReporter`].

use crate::error::Error;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::cell::RefCell;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The manifest had no `gitDependencies` section and an empty one was written.
    ManifestSectionCreated,
    /// An ad-hoc Git URL is being fetched to learn its package name.
    ResolvingUrl { url: String },
    /// A new entry was persisted to `gitDependencies`.
    DependencyRecorded { name: String, reference: String },
    NothingToInstall,
    DependencyNotFound { name: String },
    FetchStarted { url: String, git_ref: String },
    FetchFinished { url: String, git_ref: String },
    FetchFailed { url: String, git_ref: String },
    Skipped { name: String },
    Extracting { name: String, destination: PathBuf },
    Installed { name: String },
    Completed { installed: usize, skipped: usize },
}

pub trait Reporter {
    fn report(&self, event: Event);
}

/// Renders events to the terminal, with a spinner while fetching.
pub struct ConsoleReporter {
    verbose: bool,
    interactive: bool,
    spinner: RefCell<Option<ProgressBar>>,
}

impl ConsoleReporter {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            interactive: console::Term::stderr().is_term(),
            spinner: RefCell::new(None),
        }
    }

    fn start_spinner(&self, message: String) {
        if !self.interactive {
            println!("{} {}", "📦".blue(), message);
            return;
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.blue} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", ""]),
        );
        pb.set_message(message);
        pb.enable_steady_tick(Duration::from_millis(100));
        *self.spinner.borrow_mut() = Some(pb);
    }

    fn finish_spinner(&self, message: String) {
        match self.spinner.borrow_mut().take() {
            Some(pb) => pb.finish_with_message(message),
            None => println!("{}", message),
        }
    }
}

impl Reporter for ConsoleReporter {
    fn report(&self, event: Event) {
        match event {
            Event::ManifestSectionCreated => {
                if self.verbose {
                    println!("   {} Created empty gitDependencies section", "•".dimmed());
                }
            }
            Event::ResolvingUrl { url } => {
                self.start_spinner(format!("Resolving package name for {}...", url));
            }
            Event::DependencyRecorded { name, reference } => {
                self.finish_spinner(format!(
                    "{} Added {} to gitDependencies ({})",
                    "✓".green(),
                    name.bold(),
                    reference.dimmed()
                ));
            }
            Event::NothingToInstall => {
                println!("{} No git dependencies to install", "ℹ".blue());
            }
            Event::DependencyNotFound { name } => {
                println!("{} {}", "x".red(), Error::DependencyNotFound(name));
            }
            Event::FetchStarted { url, git_ref } => {
                self.start_spinner(format!("Processing repository: {}#{}", url, git_ref));
            }
            Event::FetchFinished { url, git_ref } => {
                self.finish_spinner(format!("{} Fetched {}#{}", "✓".green(), url, git_ref));
            }
            Event::FetchFailed { url, git_ref } => {
                self.finish_spinner(format!("{} Failed {}#{}", "x".red(), url, git_ref));
            }
            Event::Skipped { name } => {
                println!(
                    "   {} {} already exists, skipping (use --force to reinstall)",
                    "⚡".yellow(),
                    name
                );
            }
            Event::Extracting { name, destination } => {
                if self.verbose {
                    println!(
                        "   {} Extracting {} into {}",
                        "•".dimmed(),
                        name,
                        destination.display()
                    );
                }
            }
            Event::Installed { name } => {
                println!("   {} Installed {}", "✓".green(), name.bold());
            }
            Event::Completed { installed, skipped } => {
                println!(
                    "{} All git dependencies installed successfully ({} installed, {} skipped)",
                    "✓".green(),
                    installed,
                    skipped
                );
            }
        }
    }
}

impl Drop for ConsoleReporter {
    fn drop(&mut self) {
        if let Some(pb) = self.spinner.borrow_mut().take() {
            pb.finish_and_clear();
        }
    }
}

/// Collects events in memory.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    events: RefCell<Vec<Event>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    pub fn count(&self, predicate: impl Fn(&Event) -> bool) -> usize {
        self.events.borrow().iter().filter(|e| predicate(e)).count()
    }
}

impl Reporter for RecordingReporter {
    fn report(&self, event: Event) {
        self.events.borrow_mut().push(event);
    }
}

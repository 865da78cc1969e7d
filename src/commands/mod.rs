//! CLI command handlers.
//!
//! Each handler builds the real collaborators (libgit2 fetcher, host package
//! manager, console reporter) and drives the library. Failure policy lives
//! here: `install` errors end the process with status 1, `list` errors are
//! reported and swallowed.

pub mod install;
pub mod list;

use crate::config::{Context, Settings};
use anyhow::{Context as _, Result};
use colored::*;

pub use install::run_install;
pub use list::run_list;

/// Run context for the current working directory.
pub fn current_context(verbose: bool) -> Result<Context> {
    let project_dir = std::env::current_dir().context("Could not determine current directory")?;
    let settings = Settings::load(&project_dir).context("Failed to load settings")?;
    Ok(Context::new(project_dir, verbose, settings))
}

/// Print a failed command's error.
pub fn report_error(action: &str, err: &anyhow::Error, verbose: bool) {
    eprintln!("{}", error_message(action, err, verbose));
}

/// Only the top message is shown unless verbose, which adds the full cause
/// chain and the debug rendering.
fn error_message(action: &str, err: &anyhow::Error, verbose: bool) -> String {
    if verbose {
        format!(
            "{} {}: {:#}\n{}",
            "x".red(),
            action,
            err,
            format!("{:?}", err).red()
        )
    } else {
        format!("{} {}: {}", "x".red(), action, err)
    }
}

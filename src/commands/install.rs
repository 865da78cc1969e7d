//! `git-deps install [dep] [--force]`

use crate::config::Context;
use crate::deps::{GitFetcher, InstallOptions, InstallOutcome, Installer};
use crate::package_manager;
use crate::report::ConsoleReporter;
use anyhow::Result;

/// Install one dependency by name or Git URL, or every declared dependency.
///
/// An unknown dependency name is reported but is not an error.
pub fn run_install(ctx: &Context, dep: Option<&str>, force: bool) -> Result<InstallOutcome> {
    let fetcher = GitFetcher;
    let hook = package_manager::hook_for(ctx);
    let reporter = ConsoleReporter::new(ctx.verbose);

    let outcome = Installer::new(ctx, &fetcher, hook.as_ref(), &reporter)
        .install(dep, InstallOptions { force })?;
    tracing::debug!("install finished: {:?}", outcome);
    Ok(outcome)
}

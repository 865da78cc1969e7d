//! `git-deps list [--detail]`

use crate::config::Context;
use crate::deps::{InstallState, ListOptions, ListedDependency, list_dependencies};
use anyhow::Result;
use colored::*;
use std::io::{self, Write};

pub fn run_list(ctx: &Context, detail: bool) -> Result<()> {
    let listed = list_dependencies(ctx, ListOptions { detail })?;

    if listed.is_empty() {
        println!("{} No git dependencies found in package.json", "!".yellow());
        return Ok(());
    }

    let stdout = io::stdout();
    write_listing(&mut stdout.lock(), &listed)?;
    Ok(())
}

/// Render the listing. Entries without gathered detail print only their
/// declared reference.
pub fn write_listing(out: &mut impl Write, listed: &[ListedDependency]) -> io::Result<()> {
    writeln!(out, "\n{}", "Git Dependencies:".bold())?;
    writeln!(out, "{}", "----------------".bold())?;

    for entry in listed {
        writeln!(out, "{}", format!("{}:", entry.name).green())?;
        writeln!(out, "  Repository: {}", entry.reference.repository_url.blue())?;
        writeln!(out, "  Reference: {}", entry.reference.git_ref.yellow())?;
        writeln!(out, "  Path: {}", entry.reference.subpath)?;

        match &entry.state {
            Some(InstallState::NotInstalled) => {
                writeln!(out, "  Status: {}", "Not installed".red())?;
            }
            Some(InstallState::Installed {
                version,
                description,
                dependency_count,
            }) => {
                writeln!(out, "  Status: {}", "Installed".green())?;
                if let Some(version) = version {
                    writeln!(out, "  Version: {}", version)?;
                }
                if let Some(description) = description {
                    writeln!(out, "  Description: {}", description)?;
                }
                if let Some(count) = dependency_count {
                    writeln!(out, "  Dependencies: {}", count)?;
                }
            }
            None => {}
        }

        writeln!(out)?;
    }

    Ok(())
}

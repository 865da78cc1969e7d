//! # git-deps CLI Entry Point
//!
//! This is the main executable for the `git-deps` command-line tool.
//! It parses CLI arguments using clap and routes commands to the handlers in
//! [`git_deps::commands`].
//!
//! ## Commands
//!
//! - `install [dep] [--force]`: install one or all Git dependencies
//! - `list [--detail]`: show declared Git dependencies
//! - `completion <shell>`: print shell completions

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use tracing_subscriber::EnvFilter;

use git_deps::commands;

#[derive(Parser)]
#[command(name = "git-deps")]
#[command(about = "Install npm packages straight from Git repositories", version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Show detailed progress and full error chains
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Install Git dependencies declared in package.json
    Install {
        /// Dependency name or Git URL (installs everything when omitted)
        dep: Option<String>,
        /// Reinstall even if the package directory already exists
        #[arg(short, long)]
        force: bool,
    },
    /// List declared Git dependencies
    List {
        /// Show installed status, version and description
        #[arg(short, long)]
        detail: bool,
    },
    /// Generate shell completions
    Completion { shell: Shell },
}

fn init_logging(verbose: bool) {
    let default_directive = if verbose { "git_deps=debug" } else { "git_deps=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Some(Commands::Install { dep, force }) => {
            let result = commands::current_context(cli.verbose)
                .and_then(|ctx| commands::run_install(&ctx, dep.as_deref(), *force));
            if let Err(e) = result {
                commands::report_error("Installation failed", &e, cli.verbose);
                std::process::exit(1);
            }
            Ok(())
        }
        Some(Commands::List { detail }) => {
            let result = commands::current_context(cli.verbose)
                .and_then(|ctx| commands::run_list(&ctx, *detail));
            if let Err(e) = result {
                commands::report_error("Failed to list dependencies", &e, cli.verbose);
            }
            Ok(())
        }
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let bin_name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, bin_name, &mut std::io::stdout());
            Ok(())
        }
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    }
}

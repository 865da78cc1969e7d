//! # git-deps - Git dependencies for npm projects
//!
//! git-deps installs packages that live in Git repositories, including
//! packages nested inside monorepos, into the project's `node_modules`.
//! Dependencies are declared in a `gitDependencies` section of `package.json`:
//!
//! ```json
//! {
//!   "gitDependencies": {
//!     "ui-kit": "https://github.com/acme/monorepo.git#v2.1.0&path:/packages/ui-kit"
//!   }
//! }
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! # Install every declared dependency
//! git-deps install
//!
//! # Add and install a dependency straight from a URL
//! git-deps install https://github.com/acme/tool.git#main
//! ```
//!
//! ## Module Organization
//!
//! - [`deps`] - Reference parsing, fetching, extraction and installation
//! - [`manifest`] - `package.json` access
//! - [`config`] - Settings (`git-deps.toml`) and run context
//! - [`commands`] - CLI command handlers

/// CLI command handlers.
pub mod commands;

/// Settings files and the per-run context.
pub mod config;

/// Git dependency resolution, fetching and installation.
pub mod deps;

/// Error types.
pub mod error;

/// `package.json` reading and writing.
pub mod manifest;

/// Host package manager detection and nested installs.
pub mod package_manager;

/// Progress and status reporting.
pub mod report;

pub use error::{Error, Result};

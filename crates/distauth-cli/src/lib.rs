//! # distauth-cli — Territory Authorization Query Shell
//!
//! Provides the `distauth` command-line interface over `distauth-engine`.
//!
//! ## Subcommands
//!
//! - `distauth check` — Answer one query: may distributor X operate in
//!   region Y? Prompts on stdin for whatever is not given as a flag. This
//!   is also what runs when no subcommand is given.
//! - `distauth validate` — Load both input files and report what was loaded.
//!
//! ```bash
//! distauth check --distributor acme --region "Paris-Ile de France-France"
//! distauth --config distauth.yaml validate
//! ```
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from handlers; handlers delegate every
//!   decision to `distauth-engine`.
//! - Load failures are fatal (exit code 1, nothing answered). Every query
//!   outcome, including "not found", exits 0.
//! - stdout carries only prompts and answers; logs go to stderr.

pub mod check;
pub mod config;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use distauth_engine::{load_cities, load_distributors, DistributorRegistry, RegionCatalog};

use crate::config::Settings;

/// Resolve `path` against `base` unless it is already absolute.
pub fn resolve_path(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Load the region catalog and the distributor registry named in `settings`.
///
/// Cities are loaded first; either failure aborts before any query runs.
pub fn load_inputs(settings: &Settings) -> Result<(RegionCatalog, DistributorRegistry)> {
    let catalog = load_cities(&settings.cities).context("failed to load city records")?;
    let registry = load_distributors(&settings.distributors, settings.parent_linking)
        .context("failed to load distributor records")?;
    Ok((catalog, registry))
}

//! # Validate Subcommand
//!
//! Loads both input files exactly as `check` would and reports what was
//! loaded. Any load error (unreadable file, ragged row, invalid pattern,
//! unknown parent, parent cycle) fails the command.

use std::io::Write;

use anyhow::Result;
use clap::Args;

use distauth_engine::{DistributorRegistry, RegionCatalog};

use crate::config::Settings;
use crate::load_inputs;

/// Arguments for the validate subcommand.
#[derive(Args, Debug, Default)]
pub struct ValidateArgs {
    /// Also list every distributor with its parent and rule counts.
    #[arg(long)]
    pub list: bool,
}

/// Counts describing a loaded data set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    /// Distinct full region keys.
    pub regions: usize,
    /// Distinct distributors.
    pub distributors: usize,
    /// Distributors without a parent.
    pub roots: usize,
    /// Longest parent chain (a root alone has depth 0).
    pub max_depth: usize,
}

impl Summary {
    /// Summarize a loaded catalog and registry.
    pub fn of(catalog: &RegionCatalog, registry: &DistributorRegistry) -> Self {
        Self {
            regions: catalog.len(),
            distributors: registry.len(),
            roots: registry.roots().count(),
            max_depth: registry
                .iter()
                .map(|d| registry.ancestors(d).count())
                .max()
                .unwrap_or(0),
        }
    }
}

/// Execute the validate subcommand.
pub fn run_validate(args: &ValidateArgs, settings: &Settings) -> Result<u8> {
    let (catalog, registry) = load_inputs(settings)?;
    let stdout = std::io::stdout();
    report(args, settings, &catalog, &registry, &mut stdout.lock())?;
    Ok(0)
}

fn report<W: Write>(
    args: &ValidateArgs,
    settings: &Settings,
    catalog: &RegionCatalog,
    registry: &DistributorRegistry,
    output: &mut W,
) -> Result<()> {
    let summary = Summary::of(catalog, registry);

    writeln!(output, "  cities:        {}", settings.cities.display())?;
    writeln!(output, "  regions:       {}", summary.regions)?;
    writeln!(output, "  distributors:  {}", settings.distributors.display())?;
    writeln!(
        output,
        "  loaded:        {} ({} roots, max depth {})",
        summary.distributors, summary.roots, summary.max_depth
    )?;
    writeln!(output, "  linking:       {}", settings.parent_linking)?;

    if args.list {
        writeln!(output)?;
        for distributor in registry.iter() {
            let parent = distributor
                .parent_name()
                .map_or("-", |parent| parent.as_str());
            writeln!(
                output,
                "  {:<20} parent {:<20} include {:>3}  exclude {:>3}",
                distributor.name().as_str(),
                parent,
                distributor.include().len(),
                distributor.exclude().len()
            )?;
        }
    }

    writeln!(output)?;
    writeln!(output, "OK")?;
    Ok(())
}

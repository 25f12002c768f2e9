//! # distauth CLI entry point
//!
//! Parses command-line arguments, resolves settings and dispatches to the
//! subcommand handlers. Running without a subcommand is the same as
//! `distauth check`: load, prompt, answer.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use distauth_cli::check::{run_check, CheckArgs};
use distauth_cli::config::Settings;
use distauth_cli::validate::{run_validate, ValidateArgs};

/// Distributor territory authorization.
///
/// Loads city and distributor records and decides whether a distributor
/// may operate in a region, honouring parent delegation, exclusions and
/// inclusions.
#[derive(Parser, Debug)]
#[command(name = "distauth", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML settings file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// City records file (overrides settings).
    #[arg(long, global = true)]
    cities: Option<PathBuf>,

    /// Distributor records file (overrides settings).
    #[arg(long, global = true)]
    distributors: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Answer one authorization query.
    Check(CheckArgs),

    /// Load the input files and report what they contain.
    Validate(ValidateArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("distauth starting");

    let result = Settings::load(cli.config.as_deref())
        .map(|settings| settings.with_overrides(cli.cities, cli.distributors))
        .and_then(|settings| {
            tracing::debug!(?settings, "resolved settings");
            match cli.command.unwrap_or_else(|| Commands::Check(CheckArgs::default())) {
                Commands::Check(args) => run_check(&args, &settings),
                Commands::Validate(args) => run_validate(&args, &settings),
            }
        });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use distauth_cli::check::OutputFormat;

    #[test]
    fn cli_parse_no_subcommand_defaults_to_check() {
        let cli = Cli::try_parse_from(["distauth"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn cli_parse_check_with_flags() {
        let cli = Cli::try_parse_from([
            "distauth",
            "check",
            "--distributor",
            "acme",
            "--region",
            "Paris-IleDeFrance-France",
        ])
        .unwrap();
        if let Some(Commands::Check(args)) = cli.command {
            assert_eq!(args.distributor.as_deref(), Some("acme"));
            assert_eq!(args.region.as_deref(), Some("Paris-IleDeFrance-France"));
            assert_eq!(args.format, OutputFormat::Text);
        } else {
            panic!("expected check subcommand");
        }
    }

    #[test]
    fn cli_parse_check_short_flags_and_json() {
        let cli = Cli::try_parse_from([
            "distauth", "check", "-d", "acme", "-r", "FRANCE", "--format", "json",
        ])
        .unwrap();
        if let Some(Commands::Check(args)) = cli.command {
            assert_eq!(args.distributor.as_deref(), Some("acme"));
            assert_eq!(args.format, OutputFormat::Json);
        } else {
            panic!("expected check subcommand");
        }
    }

    #[test]
    fn cli_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "distauth",
            "validate",
            "--config",
            "distauth.yaml",
            "--cities",
            "c.csv",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("distauth.yaml")));
        assert_eq!(cli.cities, Some(PathBuf::from("c.csv")));
        assert!(cli.distributors.is_none());
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Some(Commands::Validate(_))));
    }

    #[test]
    fn cli_parse_validate_list() {
        let cli = Cli::try_parse_from(["distauth", "validate", "--list"]).unwrap();
        if let Some(Commands::Validate(args)) = cli.command {
            assert!(args.list);
        } else {
            panic!("expected validate subcommand");
        }
    }

    #[test]
    fn cli_parse_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["distauth", "check", "--format", "xml"]).is_err());
    }

    #[test]
    fn cli_parse_rejects_unknown_subcommand() {
        assert!(Cli::try_parse_from(["distauth", "serve"]).is_err());
    }
}

//! # Check Subcommand
//!
//! Answers a single authorization query. The distributor name and the
//! region are taken from flags when given, otherwise prompted for on stdin,
//! distributor first. An unknown distributor is reported before the region
//! is asked for, and the engine is never consulted for it.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use serde::Serialize;

use distauth_core::{normalize, RegionKey};
use distauth_engine::{AuthorizationEngine, Decision, DistributorRegistry, RegionCatalog};

use crate::config::Settings;
use crate::load_inputs;

const DISTRIBUTOR_PROMPT: &str = "Enter distributor name: ";
const REGION_PROMPT: &str = "Enter region (format CITY-STATE-COUNTRY): ";

/// Arguments for the check subcommand.
#[derive(Args, Debug, Default)]
pub struct CheckArgs {
    /// Distributor name. Prompted for when omitted.
    #[arg(short, long)]
    pub distributor: Option<String>,

    /// Region as CITY-STATE-COUNTRY, STATE-COUNTRY or COUNTRY. Prompted for
    /// when omitted.
    #[arg(short, long)]
    pub region: Option<String>,

    /// Output format of the answer line.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// How the answer is printed.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// One human-readable sentence.
    #[default]
    Text,
    /// One JSON object.
    Json,
}

/// Machine-readable answer.
#[derive(Serialize, Debug)]
struct CheckReport<'a> {
    distributor: &'a str,
    found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    region: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    allowed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    decision: Option<&'a Decision>,
}

/// Execute the check subcommand against the real stdin/stdout.
pub fn run_check(args: &CheckArgs, settings: &Settings) -> Result<u8> {
    let (catalog, registry) = load_inputs(settings)?;

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    answer(args, &catalog, &registry, &mut stdin.lock(), &mut stdout.lock())
}

/// Run one query over already-loaded data, reading prompts from `input`
/// and writing prompts and the answer to `output`.
pub fn answer<R: BufRead, W: Write>(
    args: &CheckArgs,
    catalog: &RegionCatalog,
    registry: &DistributorRegistry,
    input: &mut R,
    output: &mut W,
) -> Result<u8> {
    let raw_name = match &args.distributor {
        Some(name) => name.clone(),
        None => prompt(input, output, DISTRIBUTOR_PROMPT)?,
    };
    let name = normalize(&raw_name);

    let Some(distributor) = registry.lookup(&name) else {
        tracing::info!(distributor = %name, "distributor not found");
        match args.format {
            OutputFormat::Text => writeln!(output, "Distributor {name} not found")?,
            OutputFormat::Json => write_json(
                output,
                &CheckReport {
                    distributor: &name,
                    found: false,
                    region: None,
                    allowed: None,
                    reason: None,
                    decision: None,
                },
            )?,
        }
        return Ok(0);
    };

    let raw_region = match &args.region {
        Some(region) => region.clone(),
        None => prompt(input, output, REGION_PROMPT)?,
    };
    let region = RegionKey::new(&raw_region);

    let engine = AuthorizationEngine::new(catalog, registry);
    let decision = engine.authorize_key(distributor, &region);

    match args.format {
        OutputFormat::Text => {
            let verdict = if decision.is_allowed() {
                "is authorized"
            } else {
                "is NOT authorized"
            };
            writeln!(
                output,
                "{} {verdict} to distribute in {region}. Reason: {decision}",
                distributor.name()
            )?;
        }
        OutputFormat::Json => write_json(
            output,
            &CheckReport {
                distributor: distributor.name().as_str(),
                found: true,
                region: Some(region.as_str()),
                allowed: Some(decision.is_allowed()),
                reason: Some(decision.to_string()),
                decision: Some(&decision),
            },
        )?,
    }

    Ok(0)
}

/// Print `message`, then read one line. End of input reads as empty.
fn prompt<R: BufRead, W: Write>(input: &mut R, output: &mut W, message: &str) -> Result<String> {
    write!(output, "{message}")?;
    output.flush()?;

    let mut line = String::new();
    input
        .read_line(&mut line)
        .context("failed to read from stdin")?;
    Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string())
}

fn write_json<W: Write>(output: &mut W, report: &CheckReport<'_>) -> Result<()> {
    serde_json::to_writer(&mut *output, report).context("failed to encode answer")?;
    writeln!(output)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use distauth_engine::{read_cities, read_distributors, ParentLinking};

    fn fixtures() -> (RegionCatalog, DistributorRegistry) {
        let catalog = read_cities(
            "a,b,c,city,state,country\n\
             1,2,3,Paris,Ile De France,France\n\
             1,2,3,Lyon,Auvergne,France\n"
                .as_bytes(),
        )
        .unwrap();
        let registry = read_distributors(
            "name,include,exclude,parent\n\
             Acme,France,Lyon-Auvergne-France,\n\
             Sub,Ile De France-France,,Acme\n"
                .as_bytes(),
            ParentLinking::TwoPass,
        )
        .unwrap();
        (catalog, registry)
    }

    fn run(args: CheckArgs, stdin: &str) -> String {
        let (catalog, registry) = fixtures();
        let mut input = stdin.as_bytes();
        let mut output = Vec::new();
        let code = answer(&args, &catalog, &registry, &mut input, &mut output).unwrap();
        assert_eq!(code, 0);
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn interactive_prompts_then_authorizes() {
        let out = run(CheckArgs::default(), "acme\nParis-IleDeFrance-France\n");
        assert_eq!(
            out,
            "Enter distributor name: \
             Enter region (format CITY-STATE-COUNTRY): \
             ACME is authorized to distribute in PARIS-ILEDEFRANCE-FRANCE. \
             Reason: Explicitly included by distributor: ACME (rule FRANCE)\n"
        );
    }

    #[test]
    fn flags_skip_prompts() {
        let args = CheckArgs {
            distributor: Some("acme".into()),
            region: Some("lyon-auvergne-france".into()),
            ..CheckArgs::default()
        };
        let out = run(args, "");
        assert_eq!(
            out,
            "ACME is NOT authorized to distribute in LYON-AUVERGNE-FRANCE. \
             Reason: Explicitly excluded by distributor: ACME (rule LYON-AUVERGNE-FRANCE)\n"
        );
    }

    #[test]
    fn unknown_distributor_stops_before_region_prompt() {
        let out = run(CheckArgs::default(), "nobody\nParis-IleDeFrance-France\n");
        assert_eq!(out, "Enter distributor name: Distributor NOBODY not found\n");
    }

    #[test]
    fn child_denied_by_parent() {
        let args = CheckArgs {
            distributor: Some("sub".into()),
            region: Some("Lyon-Auvergne-France".into()),
            ..CheckArgs::default()
        };
        let out = run(args, "");
        assert!(out.starts_with("SUB is NOT authorized"));
        assert!(out.ends_with("Reason: Denied by parent distributor: ACME\n"));
    }

    #[test]
    fn unknown_region_reported() {
        let args = CheckArgs {
            distributor: Some("acme".into()),
            ..CheckArgs::default()
        };
        let out = run(args, "Madrid-Madrid-Spain\r\n");
        assert!(out.ends_with(
            "ACME is NOT authorized to distribute in MADRID-MADRID-SPAIN. \
             Reason: Region does not exist\n"
        ));
    }

    #[test]
    fn end_of_input_reads_as_empty_name() {
        let out = run(CheckArgs::default(), "");
        assert_eq!(out, "Enter distributor name: Distributor  not found\n");
    }

    #[test]
    fn json_answer() {
        let args = CheckArgs {
            distributor: Some("acme".into()),
            region: Some("Paris-Ile De France-France".into()),
            format: OutputFormat::Json,
        };
        let out = run(args, "");
        let value: serde_json::Value = serde_json::from_str(out.trim_end()).unwrap();
        assert_eq!(value["distributor"], "ACME");
        assert_eq!(value["found"], true);
        assert_eq!(value["region"], "PARIS-ILEDEFRANCE-FRANCE");
        assert_eq!(value["allowed"], true);
        assert_eq!(value["decision"]["outcome"], "included");
        assert_eq!(value["decision"]["pattern"], "FRANCE");
    }

    #[test]
    fn json_not_found() {
        let args = CheckArgs {
            distributor: Some("ghost".into()),
            format: OutputFormat::Json,
            ..CheckArgs::default()
        };
        let out = run(args, "");
        assert_eq!(out, "{\"distributor\":\"GHOST\",\"found\":false}\n");
    }
}

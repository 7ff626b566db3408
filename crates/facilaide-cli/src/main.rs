//! # facilaide CLI entry point
//!
//! Parses arguments, installs logging on stderr, loads the configuration
//! once and dispatches to the subcommand handler.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use facilaide_cli::benefits::{run_benefits, BenefitsArgs};
use facilaide_cli::config::{reference_date, resolve_sources};
use facilaide_cli::normalize::{run_labels, run_normalize, InputArgs};
use facilaide_cli::payload::{run_payload, run_request, RequestArgs};
use facilaide_cli::Session;

/// FacilAide: household descriptions to tax-benefit engine payloads.
#[derive(Parser, Debug)]
#[command(name = "facilaide", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Variable metadata JSON file (default: FACILAIDE_VARIABLES_META, then bundled).
    #[arg(long, global = true, value_name = "PATH")]
    variables_meta: Option<PathBuf>,

    /// OpenAPI document holding the payload schema (default: FACILAIDE_SCHEMA, then bundled).
    #[arg(long, global = true, value_name = "PATH")]
    schema: Option<PathBuf>,

    /// Simulation reference date, YYYY-MM-DD (default: today, UTC).
    #[arg(long, global = true, value_name = "DATE")]
    date: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the normalized household record.
    Normalize(InputArgs),

    /// Print the validated engine payload.
    Payload(InputArgs),

    /// Print the engine request envelope.
    Request(RequestArgs),

    /// Print the available benefits found in an engine result.
    Benefits(BenefitsArgs),

    /// Print display labels for the payload's individuals.
    Labels(InputArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

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

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<u8> {
    let date = reference_date(cli.date.as_deref())?;
    let sources = resolve_sources(cli.variables_meta.as_deref(), cli.schema.as_deref());
    let session = Session::new(&sources, date);
    tracing::debug!(date = %date, degraded = session.config.is_degraded(), "session ready");

    match &cli.command {
        Commands::Normalize(args) => run_normalize(args, &session),
        Commands::Payload(args) => run_payload(args, &session),
        Commands::Request(args) => run_request(args, &session),
        Commands::Benefits(args) => run_benefits(args, &session),
        Commands::Labels(args) => run_labels(args, &session),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parse_payload() {
        let cli = Cli::try_parse_from(["facilaide", "payload", "situation.json"]).unwrap();
        match cli.command {
            Commands::Payload(args) => assert_eq!(args.input, PathBuf::from("situation.json")),
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(cli.date.is_none());
    }

    #[test]
    fn cli_parse_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "facilaide",
            "normalize",
            "in.yaml",
            "--date",
            "2024-06-14",
            "--schema",
            "openapi.yaml",
            "--variables-meta",
            "meta.json",
        ])
        .unwrap();
        assert_eq!(cli.date.as_deref(), Some("2024-06-14"));
        assert_eq!(cli.schema, Some(PathBuf::from("openapi.yaml")));
        assert_eq!(cli.variables_meta, Some(PathBuf::from("meta.json")));
    }

    #[test]
    fn cli_parse_request_extra_variables() {
        let cli = Cli::try_parse_from([
            "facilaide",
            "request",
            "in.json",
            "--extra-variable",
            "ppa_eligibilite",
            "--extra-variable",
            "rsa_base_ressources",
        ])
        .unwrap();
        match cli.command {
            Commands::Request(args) => {
                assert_eq!(args.input.input, PathBuf::from("in.json"));
                assert_eq!(args.extra_variables, ["ppa_eligibilite", "rsa_base_ressources"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn cli_parse_benefits() {
        let cli =
            Cli::try_parse_from(["facilaide", "benefits", "result.json", "--payload", "p.json"])
                .unwrap();
        match cli.command {
            Commands::Benefits(args) => {
                assert_eq!(args.result, PathBuf::from("result.json"));
                assert_eq!(args.payload, Some(PathBuf::from("p.json")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn cli_parse_verbose_levels() {
        let cli = Cli::try_parse_from(["facilaide", "labels", "in.json"]).unwrap();
        assert_eq!(cli.verbose, 0);
        let cli = Cli::try_parse_from(["facilaide", "-vv", "labels", "in.json"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn cli_parse_missing_input_errors() {
        assert!(Cli::try_parse_from(["facilaide", "payload"]).is_err());
        assert!(Cli::try_parse_from(["facilaide"]).is_err());
    }
}

//! # Payload and Request
//!
//! `facilaide payload` assembles and validates the engine payload;
//! `facilaide request` wraps it in the envelope the local engine runner
//! reads. Schema violations are reported one per line and exit with 1.

use anyhow::{Context, Result};
use clap::Args;
use facilaide_payload::{parse_variable_list, run_at, PipelineOutput, SimulationRequest};

use crate::config::{Session, EXTRA_VARIABLES_ENV};
use crate::input::{print_json, read_document};
use crate::normalize::InputArgs;

/// Arguments for `facilaide request`.
#[derive(Args, Debug)]
pub struct RequestArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Additional variable to compute. Repeatable; also read as a comma
    /// list from FACILAIDE_EXTRA_VARIABLES.
    #[arg(long = "extra-variable", value_name = "NAME")]
    pub extra_variables: Vec<String>,
}

fn assemble(args: &InputArgs, session: &Session) -> Result<PipelineOutput> {
    let raw = read_document(&args.input)?;
    run_at(&raw, &session.config, session.date)
        .with_context(|| format!("cannot build payload for {}", args.input.display()))
}

/// Print the validated payload.
pub fn run_payload(args: &InputArgs, session: &Session) -> Result<u8> {
    let output = assemble(args, session)?;
    print_json(&output.payload)?;
    Ok(0)
}

/// Print the engine request envelope.
pub fn run_request(args: &RequestArgs, session: &Session) -> Result<u8> {
    let output = assemble(&args.input, session)?;
    let mut extras = args.extra_variables.clone();
    if let Ok(list) = std::env::var(EXTRA_VARIABLES_ENV) {
        extras.extend(parse_variable_list(&list));
    }
    let request = SimulationRequest::new(&output.payload, output.month, extras)
        .context("failed to render payload")?;
    print_json(&request)?;
    Ok(0)
}

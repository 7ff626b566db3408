//! `facilaide benefits`: list what an engine result grants.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use facilaide_payload::extract_available_benefits;

use crate::config::Session;
use crate::input::{print_json, read_document};

/// Arguments for `facilaide benefits`.
#[derive(Args, Debug)]
pub struct BenefitsArgs {
    /// Engine result (JSON or YAML).
    pub result: PathBuf,

    /// Payload the result was computed from; benefits it already declares
    /// as received are left out.
    #[arg(long)]
    pub payload: Option<PathBuf>,
}

/// Print the available benefits for the session month.
pub fn run_benefits(args: &BenefitsArgs, session: &Session) -> Result<u8> {
    let result = read_document(&args.result)?;
    let payload = args.payload.as_deref().map(read_document).transpose()?;
    let benefits = extract_available_benefits(
        &result,
        payload.as_ref(),
        &session.config.catalog,
        session.month(),
    );
    if benefits.is_empty() {
        tracing::info!("no available benefit in result");
    }
    print_json(&benefits)?;
    Ok(0)
}

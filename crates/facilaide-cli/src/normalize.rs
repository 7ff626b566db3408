//! # Normalize and Labels
//!
//! `facilaide normalize` prints what the resolver understood from a raw
//! household description; `facilaide labels` prints the display names of
//! the individuals the payload would contain.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use facilaide_resolver::{person_labels, InputResolver};

use crate::config::Session;
use crate::input::{print_json, read_document};

/// Arguments shared by the commands that read one household description.
#[derive(Args, Debug)]
pub struct InputArgs {
    /// Household description (JSON, or YAML for `.yaml`/`.yml`).
    pub input: PathBuf,
}

/// Print the normalized record.
pub fn run_normalize(args: &InputArgs, session: &Session) -> Result<u8> {
    let raw = read_document(&args.input)?;
    let record = InputResolver::at(session.date).resolve(&raw);
    print_json(&record)?;
    Ok(0)
}

/// Print display labels keyed by individual id.
pub fn run_labels(args: &InputArgs, session: &Session) -> Result<u8> {
    let raw = read_document(&args.input)?;
    let record = InputResolver::at(session.date).resolve(&raw);
    print_json(&person_labels(&raw, record.child_count()))?;
    Ok(0)
}

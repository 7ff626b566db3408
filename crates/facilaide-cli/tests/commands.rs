//! Subcommand handlers run against files on disk.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use facilaide_cli::benefits::{run_benefits, BenefitsArgs};
use facilaide_cli::normalize::{run_labels, run_normalize, InputArgs};
use facilaide_cli::payload::{run_payload, run_request, RequestArgs};
use facilaide_cli::Session;
use facilaide_payload::ConfigSources;

fn session() -> Session {
    Session::new(
        &ConfigSources::default(),
        NaiveDate::from_ymd_opt(2024, 6, 14).unwrap(),
    )
}

fn write(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, text).unwrap();
    path
}

#[test]
fn household_commands_succeed() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(
        dir.path(),
        "situation.yaml",
        "salaire_de_base: 800\nsituation:\n  statut_marital: celibataire\nenfants:\n  - prenom: Lina\n    age: 4\n",
    );
    let session = session();
    let args = InputArgs { input };

    assert_eq!(run_normalize(&args, &session).unwrap(), 0);
    assert_eq!(run_labels(&args, &session).unwrap(), 0);
    assert_eq!(run_payload(&args, &session).unwrap(), 0);
    let request = RequestArgs {
        input: args,
        extra_variables: vec!["ppa_eligibilite".to_string()],
    };
    assert_eq!(run_request(&request, &session).unwrap(), 0);
}

#[test]
fn missing_input_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let args = InputArgs {
        input: dir.path().join("absent.json"),
    };
    assert!(run_payload(&args, &session()).is_err());
}

#[test]
fn benefits_from_result_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = write(
        dir.path(),
        "result.json",
        r#"{"familles": {"famille_1": {"rsa": {"2024-06": 534.2}}}}"#,
    );
    let payload = write(
        dir.path(),
        "payload.json",
        r#"{"familles": {"famille_1": {"rsa": {"2024-06": null}}}}"#,
    );
    let args = BenefitsArgs {
        result,
        payload: Some(payload),
    };
    assert_eq!(run_benefits(&args, &session()).unwrap(), 0);

    let args = BenefitsArgs {
        result: dir.path().join("absent.json"),
        payload: None,
    };
    assert!(run_benefits(&args, &session()).is_err());
}

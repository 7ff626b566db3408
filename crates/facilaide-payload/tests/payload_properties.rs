//! # Payload Properties
//!
//! Behavioral checks on payloads assembled from raw household inputs through
//! the full pipeline, with the bundled metadata and schema. The reference
//! date is pinned to 14 June 2024.

use chrono::NaiveDate;
use facilaide_core::{HousingStatus, SimulationMonth, VariableCatalog};
use facilaide_payload::payload::{CLAIMANT_ID, FAMILY_ID, HOUSEHOLD_ID, PARTNER_ID};
use facilaide_payload::{
    run_at, AssemblyError, ConfigSources, EngineConfig, PayloadAssembler, SimulationRequest,
};
use facilaide_resolver::InputResolver;
use proptest::prelude::*;
use serde_json::{json, Value};

fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 14).unwrap()
}

fn june() -> SimulationMonth {
    SimulationMonth::containing(reference_date())
}

const BACKFILLED: [&str; 4] = ["2024-03", "2024-04", "2024-05", "2024-06"];

fn keys(values: &facilaide_payload::PeriodValues) -> Vec<&str> {
    values.keys().collect()
}

#[test]
fn resource_variables_carry_four_months() {
    let config = EngineConfig::bundled();
    let raw = json!({"salaire_de_base": 1500, "aah": 300, "age": 41});
    let output = run_at(&raw, &config, reference_date()).unwrap();
    let claimant = &output.payload.individus[CLAIMANT_ID];

    for variable in ["salaire_de_base", "aah"] {
        let values = claimant.variable(variable).unwrap();
        assert_eq!(keys(values), BACKFILLED, "{variable}");
    }
    let wage = claimant.variable("salaire_de_base").unwrap();
    assert!(wage.iter().all(|(_, v)| *v == json!(1500)));

    let age = claimant.variable("age").unwrap();
    assert_eq!(keys(age), ["2024-06"]);
    assert_eq!(age.get("2024-06"), Some(&json!(41)));

    // The absent partner still gets a full, zero wage history.
    let partner_wage = output.payload.individus[PARTNER_ID]
        .variable("salaire_de_base")
        .unwrap();
    assert_eq!(keys(partner_wage), BACKFILLED);
    assert!(partner_wage.iter().all(|(_, v)| *v == json!(0)));
}

#[test]
fn birthdate_age_at_end_of_month() {
    let config = EngineConfig::bundled();
    let output = run_at(
        &json!({"date_naissance": "1990-06-30", "age": 12}),
        &config,
        reference_date(),
    )
    .unwrap();
    let age = output.payload.individus[CLAIMANT_ID].variable("age").unwrap();
    assert_eq!(age.get("2024-06"), Some(&json!(34)));

    let raw = json!({"date_naissance": "1990-07-01"});
    let output = run_at(&raw, &config, reference_date()).unwrap();
    let age = output.payload.individus[CLAIMANT_ID].variable("age").unwrap();
    assert_eq!(age.get("2024-06"), Some(&json!(33)));
}

#[test]
fn same_child_through_two_conventions_yields_one_entity() {
    let config = EngineConfig::bundled();
    let raw = json!({
        "enfants": [{"age": 7}],
        "situation": {"enfants": [{"age": 7}]}
    });
    let payload = run_at(&raw, &config, reference_date()).unwrap().payload;
    assert_eq!(payload.child_ids(), ["enfant_1"]);
    assert_eq!(payload.individus.len(), 3);
    assert_eq!(
        payload.familles[FAMILY_ID].members("enfants").unwrap(),
        ["enfant_1"]
    );
}

#[test]
fn single_low_wage_claimant() {
    let config = EngineConfig::bundled();
    let raw = json!({
        "salaire_de_base": 800,
        "situation": {"statut_marital": "celibataire"}
    });
    let payload = run_at(&raw, &config, reference_date()).unwrap().payload;
    assert!(payload.child_ids().is_empty());

    let wage = payload.individus[CLAIMANT_ID]
        .variable("salaire_de_base")
        .unwrap();
    assert_eq!(keys(wage), BACKFILLED);
    assert!(wage.iter().all(|(_, v)| *v == json!(800)));

    // Means-tested benefits are left for the engine to compute.
    let rsa = payload.familles[FAMILY_ID].variable("rsa").unwrap();
    assert_eq!(keys(rsa), ["2024-06"]);
    assert_eq!(rsa.get("2024-06"), Some(&Value::Null));
}

#[test]
fn rent_present_only_for_tenants() {
    let config = EngineConfig::bundled();
    let cases = [
        ("locataire_vide", true),
        ("locataire meublé", true),
        ("proprietaire", false),
        ("hébergé gratuitement chez mes parents", false),
        ("dans une cabane", false),
    ];
    for (status, expect_rent) in cases {
        let raw = json!({"statut_occupation_logement": status, "loyer": 620});
        let payload = run_at(&raw, &config, reference_date()).unwrap().payload;
        let household = &payload.menages[HOUSEHOLD_ID];
        assert_eq!(household.variable("loyer").is_some(), expect_rent, "{status}");
    }
}

#[test]
fn gratuitous_hosting_is_normalized() {
    let config = EngineConfig::bundled();
    let raw = json!({"logement": {"statut": "hébergé gratuitement chez mes parents"}});
    let output = run_at(&raw, &config, reference_date()).unwrap();
    assert_eq!(output.record.housing.status, HousingStatus::LogeGratuitement);
    let status = output.payload.menages[HOUSEHOLD_ID]
        .variable("statut_occupation_logement")
        .unwrap();
    assert_eq!(
        status.get("2024-06"),
        Some(&json!(HousingStatus::LogeGratuitement.as_str()))
    );
}

#[test]
fn assembled_payload_passes_bundled_schema() {
    let config = EngineConfig::bundled();
    let schema = config.schema.as_ref().unwrap();
    let raw = json!({
        "salaire_de_base": "1234,50",
        "conjoint": {"salaire_de_base": 900, "age": 38},
        "enfants": [{"age": 3}, {"date_naissance": "2012-01-15"}],
        "statut_occupation_logement": "locataire",
        "loyer": 700,
        "prestations_recues": {"menage": {"af": 141.99, "rsa": true}}
    });
    let payload = run_at(&raw, &config, reference_date()).unwrap().payload;
    assert!(schema.violations(&payload.to_value().unwrap()).is_empty());
}

#[test]
fn schema_gate_reports_assembled_violations() {
    let config = EngineConfig::bundled();
    let schema = config.schema.as_ref().unwrap();
    let mut value = run_at(&json!({}), &config, reference_date())
        .unwrap()
        .payload
        .to_value()
        .unwrap();
    value["individus"] = json!("not a collection");
    assert!(!schema.violations(&value).is_empty());
    assert!(schema.validate(&value).is_err());
}

#[test]
fn degraded_configuration_still_assembles() {
    let dir = tempfile::tempdir().unwrap();
    let config = EngineConfig::load(&ConfigSources {
        variables_meta: Some(dir.path().join("variables_meta.json")),
        schema: Some(dir.path().join("openapi.yaml")),
    });
    assert!(config.is_degraded());
    assert!(config.schema.is_none());

    let payload = run_at(&json!({"salaire_de_base": 1000}), &config, reference_date())
        .unwrap()
        .payload;
    // Everything is monthly without metadata, including yearly benefits.
    let ars = payload.familles[FAMILY_ID].variable("ars").unwrap();
    assert_eq!(keys(ars), ["2024-06"]);
}

#[test]
fn yearly_resource_is_not_backfilled() {
    let catalog = VariableCatalog::from_value(&json!({
        "salaire_de_base": {"entity": "individu", "periodicity": "year"}
    }))
    .unwrap();
    let config = EngineConfig::new(catalog, None);
    let record = InputResolver::for_month(june()).resolve(&json!({"salaire_de_base": 20000}));
    let payload = PayloadAssembler::new(&config, june()).assemble(&record).unwrap();
    let wage = payload.individus[CLAIMANT_ID]
        .variable("salaire_de_base")
        .unwrap();
    assert_eq!(keys(wage), ["2024"]);
}

#[test]
fn mismatched_periods_abort_assembly() {
    let catalog = VariableCatalog::from_value(&json!({
        "age": {"entity": "individu", "periodicity": "month"}
    }))
    .unwrap();
    let config = EngineConfig::new(catalog, None);
    let record = InputResolver::for_month(june()).resolve(&json!({}));
    let mut payload = PayloadAssembler::new(&config, june()).build(&record);
    payload
        .individus
        .get_mut(CLAIMANT_ID)
        .unwrap()
        .set_variable("age", facilaide_payload::PeriodValues::single("2024", json!(30)));

    let err = facilaide_payload::check_period_consistency(&payload, &config.catalog).unwrap_err();
    assert!(matches!(err, AssemblyError::PeriodMismatch { .. }));
}

#[test]
fn request_envelope_lists_payload_variables() {
    let config = EngineConfig::bundled();
    let raw = json!({"loyer": 500, "statut_occupation_logement": "locataire"});
    let payload = run_at(&raw, &config, reference_date()).unwrap().payload;
    let request = SimulationRequest::new(&payload, june(), ["ppa_eligibilite"]).unwrap();
    assert_eq!(request.current_month, "2024-06");
    assert_eq!(request.current_year, "2024");
    for name in ["salaire_de_base", "age", "loyer", "depcom", "ppa_eligibilite", "asi"] {
        assert!(request.variables.iter().any(|v| v == name), "{name}");
    }
    assert!(!request.variables.iter().any(|v| v == "parents"));
}

proptest! {
    #[test]
    fn snapshot_round_trip_preserves_scalars(
        wage in 0u32..20_000,
        partner_wage in 0u32..20_000,
        age in 18u32..95,
        partner_age in 18u32..95,
        child_ages in proptest::collection::vec(0u32..25, 0..6),
    ) {
        let config = EngineConfig::bundled();
        let raw = json!({
            "salaire_de_base": wage,
            "age": age,
            "conjoint": {"salaire_de_base": partner_wage, "age": partner_age},
            "nombre_enfants": child_ages.len(),
            "enfants": child_ages.iter().map(|a| json!({"age": a})).collect::<Vec<_>>(),
        });
        let first = run_at(&raw, &config, reference_date()).unwrap();
        let snapshot = first.payload.scalar_snapshot(first.month);
        let again = InputResolver::for_month(first.month).resolve(&snapshot);

        prop_assert_eq!(again.claimant.wage, f64::from(wage));
        prop_assert_eq!(again.partner.wage, f64::from(partner_wage));
        prop_assert_eq!(again.claimant.age, f64::from(age));
        prop_assert_eq!(again.partner.age, f64::from(partner_age));
        prop_assert_eq!(again.child_count(), child_ages.len());
        let ages: Vec<f64> = again.children.iter().map(|c| c.age).collect();
        let expected: Vec<f64> = child_ages.iter().map(|a| f64::from(*a)).collect();
        prop_assert_eq!(ages, expected);
    }
}

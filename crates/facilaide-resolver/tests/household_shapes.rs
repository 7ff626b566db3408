//! # Household Shape Tests
//!
//! End-to-end resolution of realistic inputs in the shapes upstream producers
//! actually emit: flat, nested under `situation`/`menage`, role-prefixed, and
//! mixtures of the three. All tests pin June 2024 as the simulation month.

use chrono::NaiveDate;
use facilaide_core::{Beneficiary, BenefitId, HousingStatus, SimulationMonth};
use facilaide_resolver::{person_labels, InputResolver};
use proptest::prelude::*;
use serde_json::json;

fn june_2024() -> InputResolver {
    InputResolver::at(NaiveDate::from_ymd_opt(2024, 6, 14).unwrap())
}

#[test]
fn same_child_through_two_conventions_counts_once() {
    let raw = json!({
        "enfants": [{"age": 7}],
        "situation": {"enfants": [{"age": 7}]}
    });
    let record = june_2024().resolve(&raw);
    assert_eq!(record.child_count(), 1);
    assert_eq!(record.children[0].age, 7.0);
}

#[test]
fn flat_wage_with_marital_status() {
    let raw = json!({
        "salaire_de_base": 800,
        "situation": {"statut_marital": "celibataire"}
    });
    let record = june_2024().resolve(&raw);
    assert_eq!(record.claimant.wage, 800.0);
    assert_eq!(record.partner.wage, 0.0);
    assert_eq!(record.child_count(), 0);
}

#[test]
fn free_text_housing_status() {
    let raw = json!({"logement": {"statut": "hébergé gratuitement chez mes parents"}});
    assert_eq!(
        june_2024().resolve(&raw).housing.status,
        HousingStatus::LogeGratuitement
    );

    let raw = json!({"logement": {"statut": "dans une cabane"}});
    assert_eq!(june_2024().resolve(&raw).housing.status, HousingStatus::NonRenseigne);
}

#[test]
fn nested_family_description() {
    let raw = json!({
        "situation": {
            "demandeur": {"age": 38, "prenom": "Nadia"},
            "conjoint": {"date_naissance": "12/03/1985"},
            "enfants": [
                {"prenom": "Yanis", "date_naissance": "2016-09-02", "age": 8},
                {"prenom": "Lou", "age": 3}
            ]
        },
        "revenus": {"demandeur": {"salaire_de_base": 1450}},
        "logement": {"statut": "locataire HLM", "loyer": 520, "code_postal": "75011"},
        "prestations_recues": [
            {"nom": "allocations familiales", "beneficiaire": "foyer", "montant": 141.99}
        ],
        "prestations_a_demander": {"menage": {"prime d'activité": true}}
    });
    let record = june_2024().resolve(&raw);

    assert_eq!(record.claimant.age, 38.0);
    assert_eq!(record.claimant.wage, 1450.0);
    assert_eq!(record.claimant.first_name.as_deref(), Some("Nadia"));
    assert_eq!(record.partner.age, 39.0);

    assert_eq!(record.child_count(), 2);
    assert_eq!(record.children[0].age, 7.0);
    assert_eq!(record.children[0].first_name.as_deref(), Some("Yanis"));
    assert_eq!(record.children[1].age, 3.0);

    assert_eq!(record.housing.status, HousingStatus::LocataireHlm);
    assert_eq!(record.housing.rent, Some(520.0));

    let af = record.received.get(Beneficiary::Menage, BenefitId::Af).unwrap();
    assert_eq!(af.amount, Some(141.99));
    let ppa = record.requested.get(Beneficiary::Menage, BenefitId::Ppa).unwrap();
    assert!(ppa.mentioned);
    assert_eq!(ppa.amount, None);

    let labels = person_labels(&raw, record.child_count());
    assert_eq!(labels["individu_1"], "Nadia");
    assert_eq!(labels["individu_2"], "le conjoint");
    assert_eq!(labels["enfant_1"], "Yanis");
    assert_eq!(labels["enfant_2"], "Lou");
}

#[test]
fn explicit_count_pads_missing_children() {
    let raw = json!({"nombre_enfants": 3, "enfants": [{"age": 12}]});
    let record = june_2024().resolve(&raw);
    let ages: Vec<f64> = record.children.iter().map(|c| c.age).collect();
    assert_eq!(ages, vec![12.0, 5.0, 5.0]);
}

proptest! {
    #[test]
    fn birthdate_age_is_years_at_end_of_month(
        year in 1940i32..2023,
        month in 1u32..=12,
        day in 1u32..=28,
    ) {
        let birth = NaiveDate::from_ymd_opt(year, month, day).unwrap();
        let raw = json!({"date_naissance": birth.format("%Y-%m-%d").to_string(), "age": 99});
        let resolver = InputResolver::for_month(SimulationMonth::new(2024, 6).unwrap());
        let record = resolver.resolve(&raw);

        let end = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        let mut expected = 2024 - year;
        if (month, day) > (6, 30) {
            expected -= 1;
        }
        prop_assert!(birth <= end);
        prop_assert_eq!(record.claimant.age, f64::from(expected));
    }

    #[test]
    fn resolution_never_panics_on_arbitrary_scalars(n in any::<i64>(), s in ".{0,24}") {
        let raw = json!({
            "salaire_de_base": s.clone(),
            "age": n,
            "enfants": [n, s.clone()],
            "nombre_enfants": s,
            "logement": {"statut": n}
        });
        let record = june_2024().resolve(&raw);
        prop_assert!(record.child_count() <= facilaide_resolver::children::MAX_CHILDREN);
    }
}

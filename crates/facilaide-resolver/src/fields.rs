//! # Field Extraction Tables
//!
//! Ordered candidate paths for every scalar field of the normalized record.
//! Upstream producers put the same fact in many places (`age`,
//! `situation.demandeur.age`, `personnes.demandeur.age`, ...). Priority is
//! the order of the table; nothing else is guessed.

use chrono::NaiveDate;
use facilaide_core::coerce::{non_empty_text, to_number};
use facilaide_core::path::{FieldPath, FieldRule};
use facilaide_core::temporal::{is_valid_age, parse_date};
use serde_json::Value;

use crate::housing::{normalize_depcom, rent_amount};
use facilaide_core::Depcom;

// ---------------------------------------------------------------------------
// Coercions
// ---------------------------------------------------------------------------

/// Keys holding a first name inside a person object.
pub(crate) const FIRST_NAME_KEYS: &[&str] =
    &["prenom", "prénom", "first_name", "firstname", "firstName"];

/// A first name: a non-empty string, or an object carrying one under a
/// first-name key.
pub(crate) fn first_name(value: &Value) -> Option<String> {
    match value {
        Value::Object(map) => FIRST_NAME_KEYS
            .iter()
            .find_map(|key| map.get(*key).filter(|v| !v.is_null()))
            .and_then(first_name),
        other => non_empty_text(other),
    }
}

/// A usable age: numeric, finite and non-negative.
pub(crate) fn valid_age(value: &Value) -> Option<f64> {
    to_number(value).filter(|age| is_valid_age(*age))
}

// ---------------------------------------------------------------------------
// Adults
// ---------------------------------------------------------------------------

/// Extraction rules for one adult role.
#[derive(Debug, Clone, Copy)]
pub struct AdultRules {
    /// Monthly base wage.
    pub wage: FieldRule<f64>,
    /// Supplied age.
    pub age: FieldRule<f64>,
    /// Birthdate. Bare numbers here are epoch milliseconds.
    pub birthdate: FieldRule<NaiveDate>,
    /// First name.
    pub first_name: FieldRule<String>,
    /// Raw AAH amount outside the benefit declarations.
    pub disability_benefit: FieldRule<f64>,
}

/// Claimant (`individu_1`).
pub static CLAIMANT: AdultRules = AdultRules {
    wage: FieldRule::first_present(
        &[
            &["salaire_de_base"],
            &["revenu", "salaire_de_base"],
            &["revenus", "salaire_de_base"],
            &["revenu", "demandeur", "salaire_de_base"],
            &["revenus", "demandeur", "salaire_de_base"],
            &["situation", "revenu", "demandeur", "salaire_de_base"],
            &["situation", "demandeur", "revenu", "salaire_de_base"],
            &["personnes", "demandeur", "revenu", "salaire_de_base"],
            &["demandeur", "revenu", "salaire_de_base"],
            &["demandeur", "salaire_de_base"],
        ],
        to_number,
    ),
    age: FieldRule::first_present(
        &[
            &["age"],
            &["situation", "age"],
            &["situation", "demandeur", "age"],
            &["personnes", "demandeur", "age"],
            &["demandeur", "age"],
        ],
        valid_age,
    ),
    birthdate: FieldRule::first_present(
        &[
            &["date_naissance"],
            &["date_de_naissance"],
            &["situation", "date_naissance"],
            &["situation", "date_de_naissance"],
            &["situation", "demandeur", "date_naissance"],
            &["situation", "demandeur", "date_de_naissance"],
            &["demandeur", "date_naissance"],
            &["demandeur", "date_de_naissance"],
            &["personnes", "demandeur", "date_naissance"],
            &["personnes", "demandeur", "date_de_naissance"],
        ],
        parse_date,
    ),
    first_name: FieldRule::first_present(
        &[
            &["prenom_demandeur"],
            &["demandeur_prenom"],
            &["demandeur", "prenom"],
            &["demandeur", "prénom"],
            &["demandeur", "first_name"],
            &["demandeur", "firstname"],
            &["demandeur", "firstName"],
            &["personnes", "demandeur", "prenom"],
            &["personnes", "demandeur", "prénom"],
            &["personnes", "demandeur", "first_name"],
            &["personnes", "demandeur", "firstname"],
            &["personnes", "demandeur", "firstName"],
            &["situation", "demandeur", "prenom"],
            &["situation", "demandeur", "prénom"],
            &["situation", "demandeur", "first_name"],
            &["situation", "demandeur", "firstname"],
            &["situation", "demandeur", "firstName"],
            &["menage", "demandeur", "prenom"],
            &["menage", "demandeur", "first_name"],
            &["menage", "demandeur", "firstname"],
            &["menage", "demandeur", "firstName"],
        ],
        first_name,
    ),
    disability_benefit: FieldRule::first_present(
        &[
            &["aah"],
            &["prestations", "aah"],
            &["prestations", "demandeur", "aah"],
            &["prestations", "demandeur", "montant_aah"],
            &["prestations", "demandeur", "allocation_adulte_handicapee"],
            &["prestations", "demandeur", "allocation_aux_adultes_handicapes"],
            &["prestations_demandeur", "aah"],
            &["prestations_demandeur", "allocation_adulte_handicapee"],
            &["revenu", "demandeur", "aah"],
            &["revenus", "demandeur", "aah"],
            &["demandeur", "prestations", "aah"],
            &["demandeur", "aah"],
            &["personnes", "demandeur", "aah"],
        ],
        to_number,
    ),
};

/// Partner (`individu_2`).
pub static PARTNER: AdultRules = AdultRules {
    wage: FieldRule::first_present(
        &[
            &["salaire_de_base_conjoint"],
            &["revenu", "salaire_de_base_conjoint"],
            &["revenu", "conjoint", "salaire_de_base"],
            &["revenus", "conjoint", "salaire_de_base"],
            &["situation", "revenu", "conjoint", "salaire_de_base"],
            &["situation", "conjoint", "revenu", "salaire_de_base"],
            &["personnes", "conjoint", "revenu", "salaire_de_base"],
            &["conjoint", "revenu", "salaire_de_base"],
            &["conjoint", "salaire_de_base"],
        ],
        to_number,
    ),
    age: FieldRule::first_present(
        &[
            &["age_conjoint"],
            &["situation", "age_conjoint"],
            &["situation", "conjoint", "age"],
            &["personnes", "conjoint", "age"],
            &["conjoint", "age"],
        ],
        valid_age,
    ),
    birthdate: FieldRule::first_present(
        &[
            &["date_naissance_conjoint"],
            &["date_de_naissance_conjoint"],
            &["situation", "date_naissance_conjoint"],
            &["situation", "date_de_naissance_conjoint"],
            &["situation", "conjoint", "date_naissance"],
            &["situation", "conjoint", "date_de_naissance"],
            &["conjoint", "date_naissance"],
            &["conjoint", "date_de_naissance"],
            &["personnes", "conjoint", "date_naissance"],
            &["personnes", "conjoint", "date_de_naissance"],
        ],
        parse_date,
    ),
    first_name: FieldRule::first_present(
        &[
            &["prenom_conjoint"],
            &["conjoint_prenom"],
            &["conjoint", "prenom"],
            &["conjoint", "prénom"],
            &["conjoint", "first_name"],
            &["conjoint", "firstname"],
            &["conjoint", "firstName"],
            &["personnes", "conjoint", "prenom"],
            &["personnes", "conjoint", "prénom"],
            &["personnes", "conjoint", "first_name"],
            &["personnes", "conjoint", "firstname"],
            &["personnes", "conjoint", "firstName"],
            &["situation", "conjoint", "prenom"],
            &["situation", "conjoint", "prénom"],
            &["situation", "conjoint", "first_name"],
            &["situation", "conjoint", "firstname"],
            &["situation", "conjoint", "firstName"],
            &["menage", "conjoint", "prenom"],
            &["menage", "conjoint", "first_name"],
            &["menage", "conjoint", "firstname"],
            &["menage", "conjoint", "firstName"],
        ],
        first_name,
    ),
    disability_benefit: FieldRule::first_present(
        &[
            &["aah_conjoint"],
            &["prestations", "aah_conjoint"],
            &["prestations", "conjoint", "aah"],
            &["prestations", "conjoint", "montant_aah"],
            &["prestations", "conjoint", "allocation_adulte_handicapee"],
            &["prestations", "conjoint", "allocation_aux_adultes_handicapes"],
            &["prestations_conjoint", "aah"],
            &["prestations_conjoint", "allocation_adulte_handicapee"],
            &["revenu", "conjoint", "aah"],
            &["revenus", "conjoint", "aah"],
            &["conjoint", "prestations", "aah"],
            &["conjoint", "aah"],
            &["personnes", "conjoint", "aah"],
        ],
        to_number,
    ),
};

// ---------------------------------------------------------------------------
// Children
// ---------------------------------------------------------------------------

/// Locations that may hold a list (or indexed map) of children.
pub static CHILD_CONTAINERS: &[FieldPath] = &[
    &["enfants"],
    &["situation", "enfants"],
    &["situation", "personnes", "enfants"],
    &["situation", "foyer", "enfants"],
    &["personnes", "enfants"],
    &["menage", "enfants"],
];

/// Explicitly declared number of children.
pub static CHILD_COUNT: FieldRule<f64> = FieldRule::first_present(
    &[
        &["nombre_enfants"],
        &["situation", "nombre_enfants"],
        &["enfants", "nombre"],
        &["enfants", "count"],
        &["situation", "enfants", "nombre"],
        &["menage", "nombre_enfants"],
        &["personnes", "nombre_enfants"],
    ],
    to_number,
);

/// Keys holding a birthdate inside a child object.
pub(crate) const CHILD_BIRTHDATE_KEYS: &[&str] = &[
    "date_naissance",
    "date_de_naissance",
    "birthdate",
    "dateNaissance",
    "naissance",
];

// ---------------------------------------------------------------------------
// Housing
// ---------------------------------------------------------------------------

/// Sub-trees describing the dwelling.
pub static HOUSING_SECTION: &[FieldPath] = &[
    &["logement"],
    &["situation", "logement"],
    &["menage", "logement"],
    &["habitation"],
    &["housing"],
];

/// Raw housing status, in priority order.
pub static HOUSING_STATUS: &[FieldPath] = &[
    &["logement", "statut"],
    &["logement", "status"],
    &["logement", "statut_occupation"],
    &["logement", "statutOccupation"],
    &["logement", "occupation"],
    &["logement", "type"],
    &["logement", "statut_occupation_logement"],
    &["logement_statut"],
    &["logementStatus"],
    &["statut_logement"],
    &["statut_occupation_logement"],
    &["menage", "statut_occupation_logement"],
    &["menage", "statut"],
    &["menage", "logement", "statut"],
    &["situation", "logement", "statut"],
    &["situation", "logement", "status"],
    &["habitation", "statut"],
    &["habitation", "status"],
    &["housing", "status"],
    &["housing", "statut"],
];

/// Status keys searched inside the housing section itself.
pub static HOUSING_SECTION_STATUS: &[FieldPath] = &[
    &["statut"],
    &["status"],
    &["statut_occupation"],
    &["statutOccupation"],
    &["occupation"],
    &["type"],
    &["statut_occupation_logement"],
];

/// Municipality code. Each path is tried until one normalizes.
pub static DEPCOM: FieldRule<Depcom> = FieldRule::first_coercible(
    &[
        &["depcom"],
        &["code_insee"],
        &["codeInsee"],
        &["logement", "depcom"],
        &["logement", "code_insee"],
        &["logement", "codeInsee"],
        &["menage", "depcom"],
        &["menage", "code_insee"],
        &["menage", "codeInsee"],
        &["situation", "depcom"],
        &["situation", "code_insee"],
        &["situation", "codeInsee"],
        &["situation", "logement", "depcom"],
        &["situation", "logement", "code_insee"],
        &["situation", "logement", "codeInsee"],
        &["adresse", "depcom"],
        &["adresse", "code_insee"],
        &["adresse", "codeInsee"],
        &["commune", "depcom"],
        &["commune", "code_insee"],
        &["commune", "codeInsee"],
    ],
    normalize_depcom,
);

/// Monthly rent. Each path is tried until one yields an amount.
pub static RENT: FieldRule<f64> = FieldRule::first_coercible(
    &[
        &["loyer"],
        &["montant_loyer"],
        &["loyer_mensuel"],
        &["loyer", "montant"],
        &["loyer", "amount"],
        &["loyer", "value"],
        &["loyer", "valeur"],
        &["logement", "loyer"],
        &["logement", "montant_loyer"],
        &["logement", "loyer_mensuel"],
        &["logement", "loyer", "montant"],
        &["logement", "loyer", "amount"],
        &["logement", "loyer", "value"],
        &["logement", "loyer", "valeur"],
        &["menage", "loyer"],
        &["menage", "montant_loyer"],
        &["menage", "loyer_mensuel"],
        &["situation", "loyer"],
        &["situation", "montant_loyer"],
        &["situation", "loyer_mensuel"],
        &["situation", "logement", "loyer"],
        &["situation", "logement", "montant_loyer"],
        &["situation", "logement", "loyer_mensuel"],
        &["depenses", "logement", "loyer"],
        &["depenses", "logement", "montant_loyer"],
        &["depenses", "logement", "loyer_mensuel"],
        &["depenses_logement", "loyer"],
        &["depenses_logement", "montant_loyer"],
        &["depenses_logement", "loyer_mensuel"],
    ],
    rent_amount,
);

//! # Benefit Declarations
//!
//! Extracts "benefits already received" and "benefits to request" from the
//! raw input. Upstream producers describe them either as lists of entry
//! objects (`{"nom": "RSA", "beneficiaire": "ménage", "montant": 500}`) or as
//! nested maps keyed by beneficiary and benefit
//! (`{"conjoint": {"prime d'activité": 180}}`), freely mixed.
//!
//! ## Traversal
//!
//! A recursive walk carries a context of (beneficiary, benefit) discovered
//! from enclosing keys:
//!
//! - an object carrying any entry-shaped key (name, beneficiary or amount)
//!   is read as one entry; its own fields override the context;
//! - any other object propagates its keys into the context (a beneficiary
//!   alias first, otherwise a benefit alias) and recurses;
//! - a scalar leaf under a complete context is an entry: numbers and numeric
//!   strings give the amount, other strings and `true` mean "mentioned, amount
//!   unknown". `false` and `null` are ignored.
//!
//! The first occurrence of each (beneficiary, benefit) pair wins.

use facilaide_core::coerce::to_number;
use facilaide_core::path::{lookup, FieldPath};
use facilaide_core::text::{AliasTable, Folding};
use facilaide_core::{Beneficiary, BenefitDeclarations, BenefitId};
use serde_json::{Map, Value};

/// Benefit names, folded with spaces.
pub static BENEFIT_NAMES: AliasTable = AliasTable {
    folding: Folding::Spaced,
    entries: &[
        (
            "aah",
            &[
                "allocation adulte handicapee",
                "allocation aux adultes handicapes",
            ],
        ),
        ("rsa", &["revenu de solidarite active"]),
        (
            "aide_logement",
            &[
                "aide au logement",
                "aide logement",
                "allocation logement",
                "apl",
                "aides au logement",
            ],
        ),
        ("af", &["allocations familiales", "allocation familiale"]),
        (
            "ars",
            &[
                "allocation rentree scolaire",
                "prime de rentree scolaire",
            ],
        ),
        (
            "aspa",
            &[
                "allocation solidarite personnes agees",
                "allocation de solidarite aux personnes agees",
                "minimum vieillesse",
            ],
        ),
        ("asi", &["allocation supplementaire invalidite"]),
        (
            "paje_base",
            &[
                "paje",
                "paje base",
                "allocation de base de la paje",
                "prestation accueil du jeune enfant",
                "prestation d accueil du jeune enfant",
                "paje base allocation",
            ],
        ),
        (
            "ppa",
            &[
                "prime d activite",
                "prime activite",
                "prime pour l activite",
            ],
        ),
        (
            "cf",
            &[
                "complement familial",
                "allocation complement familial",
                "prestation complement familial",
            ],
        ),
    ],
    heuristics: &[],
};

/// Beneficiary roles, folded with spaces.
pub static BENEFICIARIES: AliasTable = AliasTable {
    folding: Folding::Spaced,
    entries: &[
        (
            "demandeur",
            &[
                "demandeuse",
                "applicant",
                "individu 1",
                "individu1",
                "titulaire",
                "moi",
                "adulte 1",
                "personne 1",
                "beneficiaire principal",
            ],
        ),
        (
            "conjoint",
            &[
                "conjointe",
                "epoux",
                "epouse",
                "partenaire",
                "individu 2",
                "individu2",
                "adulte 2",
                "personne 2",
                "compagnon",
                "compagne",
            ],
        ),
        (
            "menage",
            &[
                "household",
                "famille",
                "famille 1",
                "foyer",
                "foyer familial",
                "couple",
                "nous",
                "menage 1",
            ],
        ),
    ],
    heuristics: &[],
};

/// Where benefits already received are declared.
pub static RECEIVED: &[FieldPath] = &[
    &["prestations_recues"],
    &["prestations", "recues"],
    &["prestations", "perçues"],
    &["prestations", "percues"],
    &["aides", "recues"],
];

/// Where benefits to request are declared.
pub static REQUESTED: &[FieldPath] = &[
    &["prestations_a_demander"],
    &["prestations", "a_demander"],
    &["prestations", "souhaitees"],
    &["prestations", "souhaitées"],
    &["aides", "a_demander"],
];

const ENTRY_NAME_KEYS: &[&str] = &["nom", "name", "prestation", "prestation_nom", "type", "benefit"];
const ENTRY_BENEFICIARY_KEYS: &[&str] = &[
    "beneficiaire",
    "beneficiary",
    "personne",
    "personne_concernee",
    "cible",
    "beneficiaire_principal",
];
const ENTRY_AMOUNT_KEYS: &[&str] = &[
    "montant", "amount", "valeur", "value", "quantite", "somme", "montants",
];

/// Canonical benefit for a free-form label.
pub fn benefit_alias(label: &str) -> Option<BenefitId> {
    BENEFIT_NAMES.resolve(label).and_then(BenefitId::from_code)
}

/// Canonical beneficiary for a free-form label.
pub fn beneficiary_alias(label: &str) -> Option<Beneficiary> {
    BENEFICIARIES.resolve(label).and_then(Beneficiary::from_code)
}

#[derive(Debug, Clone, Copy, Default)]
struct Context {
    beneficiary: Option<Beneficiary>,
    benefit: Option<BenefitId>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Entry {
    beneficiary: Beneficiary,
    benefit: BenefitId,
    amount: Option<f64>,
}

fn label_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn first_non_null<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| map.get(*key))
        .find(|v| !v.is_null())
}

fn looks_like_entry(map: &Map<String, Value>) -> bool {
    ENTRY_NAME_KEYS
        .iter()
        .chain(ENTRY_BENEFICIARY_KEYS)
        .chain(ENTRY_AMOUNT_KEYS)
        .any(|key| map.contains_key(*key))
}

fn entry_from_object(map: &Map<String, Value>, ctx: Context) -> Option<Entry> {
    let beneficiary = match first_non_null(map, ENTRY_BENEFICIARY_KEYS) {
        Some(raw) => label_text(raw).as_deref().and_then(beneficiary_alias),
        None => ctx.beneficiary,
    }?;
    let benefit = match first_non_null(map, ENTRY_NAME_KEYS) {
        Some(raw) => label_text(raw).as_deref().and_then(benefit_alias),
        None => ctx.benefit,
    }?;
    let amount = first_non_null(map, ENTRY_AMOUNT_KEYS).and_then(to_number);
    Some(Entry {
        beneficiary,
        benefit,
        amount,
    })
}

fn traverse(value: &Value, ctx: Context, entries: &mut Vec<Entry>) {
    match value {
        Value::Array(items) => {
            for item in items {
                traverse(item, ctx, entries);
            }
        }
        Value::Object(map) if looks_like_entry(map) => {
            entries.extend(entry_from_object(map, ctx));
        }
        Value::Object(map) => {
            for (key, child) in map {
                let mut next = ctx;
                match (beneficiary_alias(key), benefit_alias(key)) {
                    (Some(b), _) if next.beneficiary.is_none() => next.beneficiary = Some(b),
                    (_, Some(p)) if next.benefit.is_none() => next.benefit = Some(p),
                    _ => {}
                }
                traverse(child, next, entries);
            }
        }
        Value::Number(_) | Value::String(_) | Value::Bool(true) => {
            if let (Some(beneficiary), Some(benefit)) = (ctx.beneficiary, ctx.benefit) {
                entries.push(Entry {
                    beneficiary,
                    benefit,
                    amount: to_number(value),
                });
            }
        }
        Value::Bool(false) | Value::Null => {}
    }
}

/// Collect declarations found under any of `paths`, first occurrence wins.
pub fn extract_declarations(raw: &Value, paths: &[FieldPath]) -> BenefitDeclarations {
    let mut declarations = BenefitDeclarations::default();
    for path in paths {
        let Some(section) = lookup(raw, path) else {
            continue;
        };
        let mut entries = Vec::new();
        traverse(section, Context::default(), &mut entries);
        for entry in entries {
            declarations.insert_first(entry.beneficiary, entry.benefit, entry.amount);
        }
    }
    declarations
}

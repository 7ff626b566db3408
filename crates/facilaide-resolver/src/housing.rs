//! # Housing Resolution
//!
//! Occupancy status, monthly rent and municipality code of the dwelling.

use facilaide_core::coerce::to_number;
use facilaide_core::domain::is_depcom_shape;
use facilaide_core::path::first_present;
use facilaide_core::text::{strip_diacritics, AliasTable, Folding, Heuristic};
use facilaide_core::{Depcom, HousingRecord, HousingStatus};
use serde_json::Value;

use crate::fields::{DEPCOM, HOUSING_SECTION, HOUSING_SECTION_STATUS, HOUSING_STATUS, RENT};

/// Free-form occupancy labels, folded with underscores.
pub static HOUSING_STATUS_ALIASES: AliasTable = AliasTable {
    folding: Folding::Underscored,
    entries: &[
        (
            "proprietaire",
            &[
                "proprietaire_occupant",
                "proprietaire_occupante",
                "proprio",
                "proprietaire_residence_principale",
            ],
        ),
        (
            "primo_accedant",
            &["primo_accedante", "primo_accedente"],
        ),
        (
            "locataire_vide",
            &[
                "locataire",
                "locataire_prive",
                "locataire_privee",
                "locataire_classique",
                "locataire_standard",
            ],
        ),
        (
            "locataire_meuble",
            &[
                "locataire_meublee",
                "locataire_meuble_prive",
                "locataire_meuble_privee",
            ],
        ),
        (
            "locataire_hlm",
            &[
                "logement_hlm",
                "locataire_logement_social",
                "locataire_social",
                "bailleur_social",
            ],
        ),
        (
            "locataire_foyer",
            &["foyer", "residence_sociale", "foyer_logement"],
        ),
        (
            "loge_gratuitement",
            &[
                "loge_gratuit",
                "heberge_gratuitement",
                "heberge_gratuitement_chez_parents",
                "heberge_chez_parents",
                "heberge_chez_ses_parents",
                "heberge_chez_un_ami",
                "heberge_chez_un_proche",
                "heberge",
                "loge_chez_amis",
                "loge_chez_parents",
                "loge_chez_proches",
            ],
        ),
        (
            "sans_domicile",
            &["sans_abri", "hebergement_urgence", "hebergement_durgence"],
        ),
        ("non_renseigne", &["autre"]),
    ],
    heuristics: &[
        Heuristic {
            all_of: &["heberge", "gratuit"],
            any_of: &[],
            canonical: "loge_gratuitement",
        },
        Heuristic {
            all_of: &["loge", "gratuit"],
            any_of: &[],
            canonical: "loge_gratuitement",
        },
        Heuristic {
            all_of: &["locataire", "hlm"],
            any_of: &[],
            canonical: "locataire_hlm",
        },
        Heuristic {
            all_of: &["locataire", "meuble"],
            any_of: &[],
            canonical: "locataire_meuble",
        },
        Heuristic {
            all_of: &["locataire", "foyer"],
            any_of: &[],
            canonical: "locataire_foyer",
        },
        Heuristic {
            all_of: &["locataire"],
            any_of: &[],
            canonical: "locataire_vide",
        },
        Heuristic {
            all_of: &["proprietaire"],
            any_of: &[],
            canonical: "proprietaire",
        },
        Heuristic {
            all_of: &["primo", "acced"],
            any_of: &[],
            canonical: "primo_accedant",
        },
        Heuristic {
            all_of: &["sans"],
            any_of: &["domicile", "abri"],
            canonical: "sans_domicile",
        },
    ],
};

/// Keys of a status object that carry the status itself, in priority order.
const STATUS_OBJECT_KEYS: &[&str] = &[
    "statut",
    "status",
    "statut_occupation",
    "statut_occupation_logement",
];

/// Normalize a raw occupancy status.
///
/// Objects are unwrapped through their status key. Anything unrecognized,
/// including absence, is [`HousingStatus::NonRenseigne`].
pub fn normalize_housing_status(value: Option<&Value>) -> HousingStatus {
    let label = match value {
        None | Some(Value::Null) => return HousingStatus::NonRenseigne,
        Some(Value::Object(map)) => {
            if let Some(key) = STATUS_OBJECT_KEYS.iter().find(|k| map.contains_key(**k)) {
                return normalize_housing_status(map.get(*key));
            }
            return HousingStatus::NonRenseigne;
        }
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Array(_)) => return HousingStatus::NonRenseigne,
    };
    HOUSING_STATUS_ALIASES
        .resolve(&label)
        .and_then(HousingStatus::from_code)
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Municipality code
// ---------------------------------------------------------------------------

/// Keys of a municipality object, in priority order.
const DEPCOM_OBJECT_KEYS: &[&str] = &["depcom", "code_insee", "codeInsee", "code", "value", "valeur"];

/// Normalize a raw municipality code candidate.
///
/// - numbers: integer part, zero-padded, last five digits (`6100` → `06100`);
/// - strings: the first `ddddd` or `ddLdd` window after diacritic stripping
///   and uppercasing (`"Paris 75056"` → `75056`, `"2a004"` → `2A004`),
///   else the digits it contains, truncated or zero-padded to five;
/// - objects: the first of `depcom`, `code_insee`, `codeInsee`, `code`,
///   `value`, `valeur` that normalizes.
pub fn normalize_depcom(value: &Value) -> Option<Depcom> {
    match value {
        Value::Number(n) => {
            let f = n.as_f64().filter(|f| f.is_finite())?;
            let digits = format!("{:.0}", f.abs().trunc());
            Depcom::new(&last_five_padded(&digits))
        }
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            let sanitized = strip_diacritics(trimmed).to_uppercase();
            if let Some(window) = sanitized
                .as_bytes()
                .windows(5)
                .find(|w| is_depcom_shape(w))
            {
                return std::str::from_utf8(window).ok().and_then(Depcom::new);
            }
            let digits: String = sanitized.chars().filter(char::is_ascii_digit).collect();
            if digits.is_empty() {
                return None;
            }
            let code = if digits.len() >= 5 {
                digits[..5].to_string()
            } else {
                format!("{digits:0>5}")
            };
            Depcom::new(&code)
        }
        Value::Object(map) => DEPCOM_OBJECT_KEYS
            .iter()
            .filter_map(|key| map.get(*key))
            .find_map(normalize_depcom),
        _ => None,
    }
}

fn last_five_padded(digits: &str) -> String {
    let padded = format!("{digits:0>5}");
    padded[padded.len() - 5..].to_string()
}

// ---------------------------------------------------------------------------
// Rent
// ---------------------------------------------------------------------------

/// Keys of a rent object carrying the amount, in priority order.
const RENT_OBJECT_KEYS: &[&str] = &["montant", "amount", "value", "valeur"];

/// Extract a rent amount from a scalar, a list, or an amount-bearing object.
pub fn rent_amount(value: &Value) -> Option<f64> {
    match value {
        Value::Number(_) | Value::String(_) => to_number(value),
        Value::Array(items) => items.iter().find_map(rent_amount),
        Value::Object(map) => RENT_OBJECT_KEYS
            .iter()
            .filter_map(|key| map.get(*key))
            .find_map(rent_amount),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// Resolve every housing attribute of `raw`.
pub fn resolve_housing(raw: &Value) -> HousingRecord {
    let section = first_present(raw, HOUSING_SECTION);

    let status_raw = first_present(raw, HOUSING_STATUS).or_else(|| match section {
        Some(v) if v.is_string() || v.is_number() => Some(v),
        Some(v) if v.is_object() => first_present(v, HOUSING_SECTION_STATUS),
        _ => None,
    });
    let status = normalize_housing_status(status_raw);

    let section_object = section.filter(|v| v.is_object());
    let depcom = DEPCOM
        .resolve(raw)
        .or_else(|| section_object.and_then(normalize_depcom))
        .unwrap_or_default();
    let rent = RENT.resolve(raw).or_else(|| {
        section_object
            .and_then(|s| s.get("loyer"))
            .and_then(rent_amount)
    });

    HousingRecord {
        status,
        rent,
        depcom,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn status(raw: Value) -> HousingStatus {
        normalize_housing_status(Some(&raw))
    }

    #[test]
    fn test_alias_variants_are_prefolded() {
        assert!(HOUSING_STATUS_ALIASES.unfolded_variants().is_empty());
    }

    #[test]
    fn test_every_canonical_is_a_status_code() {
        for (canonical, _) in HOUSING_STATUS_ALIASES.entries {
            assert!(HousingStatus::from_code(canonical).is_some(), "{canonical}");
        }
        for h in HOUSING_STATUS_ALIASES.heuristics {
            assert!(HousingStatus::from_code(h.canonical).is_some(), "{}", h.canonical);
        }
    }

    #[test]
    fn test_codes_and_aliases() {
        assert_eq!(status(json!("proprietaire")), HousingStatus::Proprietaire);
        assert_eq!(status(json!("Propriétaire occupant")), HousingStatus::Proprietaire);
        assert_eq!(status(json!("locataire")), HousingStatus::LocataireVide);
        assert_eq!(status(json!("Locataire meublée")), HousingStatus::LocataireMeuble);
        assert_eq!(status(json!("bailleur social")), HousingStatus::LocataireHlm);
        assert_eq!(status(json!("sans-abri")), HousingStatus::SansDomicile);
        assert_eq!(status(json!("autre")), HousingStatus::NonRenseigne);
    }

    #[test]
    fn test_heuristics() {
        assert_eq!(
            status(json!("hébergé gratuitement chez mes parents")),
            HousingStatus::LogeGratuitement
        );
        assert_eq!(status(json!("Je suis locataire d'un HLM")), HousingStatus::LocataireHlm);
        assert_eq!(status(json!("locataire en foyer jeunes travailleurs")), HousingStatus::LocataireFoyer);
        assert_eq!(status(json!("primo-accédant depuis 2021")), HousingStatus::PrimoAccedant);
        assert_eq!(status(json!("sans domicile fixe")), HousingStatus::SansDomicile);
    }

    #[test]
    fn test_unrecognized_is_non_renseigne() {
        assert_eq!(status(json!("caravane au fond du jardin")), HousingStatus::NonRenseigne);
        assert_eq!(status(json!("")), HousingStatus::NonRenseigne);
        assert_eq!(status(json!(["locataire"])), HousingStatus::NonRenseigne);
        assert_eq!(normalize_housing_status(None), HousingStatus::NonRenseigne);
    }

    #[test]
    fn test_status_objects_unwrap() {
        assert_eq!(status(json!({"statut": "locataire_hlm"})), HousingStatus::LocataireHlm);
        assert_eq!(
            status(json!({"statut_occupation": {"status": "proprio"}})),
            HousingStatus::Proprietaire
        );
        assert_eq!(status(json!({"statut": null, "status": "proprio"})), HousingStatus::NonRenseigne);
        assert_eq!(status(json!({"adresse": "x"})), HousingStatus::NonRenseigne);
    }

    #[test]
    fn test_depcom_numbers() {
        assert_eq!(normalize_depcom(&json!(75056)).unwrap().as_str(), "75056");
        assert_eq!(normalize_depcom(&json!(6100)).unwrap().as_str(), "06100");
        assert_eq!(normalize_depcom(&json!(1234567)).unwrap().as_str(), "34567");
        assert_eq!(normalize_depcom(&json!(-75056.9)).unwrap().as_str(), "75056");
    }

    #[test]
    fn test_depcom_strings() {
        assert_eq!(normalize_depcom(&json!("Paris 75056")).unwrap().as_str(), "75056");
        assert_eq!(normalize_depcom(&json!("2a004 Ajaccio")).unwrap().as_str(), "2A004");
        assert_eq!(normalize_depcom(&json!("69 3 8 1")).unwrap().as_str(), "69381");
        assert_eq!(normalize_depcom(&json!("code 13")).unwrap().as_str(), "00013");
        assert_eq!(normalize_depcom(&json!("Lyon")), None);
        assert_eq!(normalize_depcom(&json!("  ")), None);
    }

    #[test]
    fn test_depcom_objects() {
        let v = json!({"libelle": "Nice", "code_insee": "06088"});
        assert_eq!(normalize_depcom(&v).unwrap().as_str(), "06088");
        let v = json!({"depcom": "inconnu", "code": 33063});
        assert_eq!(normalize_depcom(&v).unwrap().as_str(), "33063");
        assert_eq!(normalize_depcom(&json!(true)), None);
    }

    #[test]
    fn test_rent_amount_shapes() {
        assert_eq!(rent_amount(&json!("910")), Some(910.0));
        assert_eq!(rent_amount(&json!({"montant": "650,50"})), Some(650.5));
        assert_eq!(rent_amount(&json!({"montant": null, "valeur": 400})), Some(400.0));
        assert_eq!(rent_amount(&json!([null, "x", {"amount": 300}])), Some(300.0));
        assert_eq!(rent_amount(&json!({"charges": 80})), None);
    }

    #[test]
    fn test_resolve_housing_nested_section() {
        let raw = json!({"logement": {"statut": "locataire_hlm", "loyer": {"montant": "910"}}});
        let housing = resolve_housing(&raw);
        assert_eq!(housing.status, HousingStatus::LocataireHlm);
        assert_eq!(housing.rent, Some(910.0));
        assert_eq!(housing.depcom.as_str(), "60100");
    }

    #[test]
    fn test_resolve_housing_section_as_string() {
        let raw = json!({"housing": "locataire meublé", "adresse": {"code_insee": 13055}});
        let housing = resolve_housing(&raw);
        assert_eq!(housing.status, HousingStatus::LocataireMeuble);
        assert_eq!(housing.depcom.as_str(), "13055");
        assert_eq!(housing.rent, None);
    }

    #[test]
    fn test_resolve_housing_section_depcom_fallback() {
        let raw = json!({"habitation": {"etat": "locataire", "code": "59350"}});
        let housing = resolve_housing(&raw);
        assert_eq!(housing.status, HousingStatus::NonRenseigne);
        assert_eq!(housing.depcom.as_str(), "59350");
    }
}
